//! FAQ widget: question buttons backed by a cache-first answer lookup.
//!
//! The host supplies the capabilities a browser would: an [`AnswerStore`]
//! for durable caching, a [`RelayTransport`] to reach the relay handler and a
//! [`Clipboard`]. [`Widget::begin_ask`] and [`Widget::complete_ask`] drive the
//! state machine without doing IO; [`Widget::ask`] wires them to the
//! transport.

mod config;
mod format;
mod store;
mod transport;

use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::debug;

pub use config::{
    default_questions, QuestionEntry, WidgetConfig, ENDPOINT_ATTRIBUTE, QUESTIONS_ATTRIBUTE,
};
pub use format::format_answer;
pub use store::{cache_key, AnswerStore, MemoryStore, KEY_PREFIX};
pub use transport::{HttpRelay, RelayCallError, RelayTransport};

pub const PLACEHOLDER: &str = "Pick a question to see the answer.";
pub const BUSY: &str = "Thinking…";
pub const APOLOGY: &str = "Sorry, we couldn’t fetch that right now. Please try again.";
pub const EMPTY_ANSWER: &str = "No answer.";
pub const COPY_LABEL: &str = "Copy";
pub const COPIED_LABEL: &str = "Copied!";
pub const COPY_CONFIRMATION: Duration = Duration::from_millis(900);

#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("Missing data-endpoint on widget.")]
    MissingEndpoint,

    #[error("unknown question: {0}")]
    UnknownQuestion(String),
}

#[derive(Debug, Error)]
#[error("clipboard unavailable: {0}")]
pub struct ClipboardError(pub String);

pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// A rendered answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub label: String,
    /// Plain text, as copied to the clipboard.
    pub text: String,
    pub html: String,
}

impl Answer {
    fn new(label: impl Into<String>, reply: &str) -> Self {
        let text = if reply.is_empty() { EMPTY_ANSWER } else { reply };
        Self {
            label: label.into(),
            text: text.to_string(),
            html: format_answer(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading { label: String },
    Answered(Answer),
    Failed { label: String },
}

/// What [`Widget::begin_ask`] decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskStep {
    /// Rendered from cache, nothing to fetch.
    Cached,
    /// The caller must send this prompt to the relay and hand the result to
    /// [`Widget::complete_ask`].
    Fetch { prompt: String },
    /// Another ask is in flight; the controls are disabled.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    NothingToCopy,
    Failed,
}

pub struct Widget<S, T> {
    config: WidgetConfig,
    store: S,
    transport: T,
    phase: Phase,
    copied_at: Option<Instant>,
}

impl<S: AnswerStore> Widget<S, HttpRelay> {
    /// A widget talking to the relay at its configured endpoint.
    pub fn connect(config: WidgetConfig, store: S) -> Self {
        let transport = HttpRelay::new(config.endpoint.clone());
        Self::new(config, store, transport)
    }
}

impl<S, T> Widget<S, T>
where
    S: AnswerStore,
    T: RelayTransport,
{
    pub fn new(config: WidgetConfig, store: S, transport: T) -> Self {
        Self {
            config,
            store,
            transport,
            phase: Phase::Idle,
            copied_at: None,
        }
    }

    pub fn questions(&self) -> &[QuestionEntry] {
        &self.config.questions
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Question buttons are disabled while any ask is pending.
    pub fn controls_disabled(&self) -> bool {
        matches!(self.phase, Phase::Loading { .. })
    }

    pub fn answer(&self) -> Option<&Answer> {
        match &self.phase {
            Phase::Answered(answer) => Some(answer),
            _ => None,
        }
    }

    /// Markup for the answer area.
    pub fn answer_html(&self) -> String {
        match &self.phase {
            Phase::Idle => format!("<span class=\"faq-muted\">{PLACEHOLDER}</span>"),
            Phase::Loading { .. } => {
                format!("<span class=\"faq-spinner\"></span><span>{BUSY}</span>")
            }
            Phase::Answered(answer) => answer.html.clone(),
            Phase::Failed { .. } => format!("<div class=\"faq-error\">{APOLOGY}</div>"),
        }
    }

    pub fn begin_ask(&mut self, label: &str) -> Result<AskStep, WidgetError> {
        if self.controls_disabled() {
            return Ok(AskStep::Ignored);
        }

        let question = self
            .config
            .question(label)
            .ok_or_else(|| WidgetError::UnknownQuestion(label.to_string()))?;

        if let Some(cached) = self.store.get(&cache_key(label)) {
            debug!(label, "answer served from cache");
            self.phase = Phase::Answered(Answer::new(label, &cached));
            return Ok(AskStep::Cached);
        }

        let prompt = question.prompt.clone();
        self.phase = Phase::Loading {
            label: label.to_string(),
        };
        Ok(AskStep::Fetch { prompt })
    }

    /// Finishes the pending ask. Only a successful reply reaches the cache.
    pub fn complete_ask(&mut self, result: Result<String, RelayCallError>) {
        let Phase::Loading { label } = &self.phase else {
            debug!("relay result arrived with no ask pending");
            return;
        };
        let label = label.clone();

        self.phase = match result {
            Ok(reply) => {
                let reply = reply.trim();
                self.store.set(&cache_key(&label), reply);
                Phase::Answered(Answer::new(label, reply))
            }
            Err(err) => {
                debug!(label = %label, error = %err, "relay call failed");
                Phase::Failed { label }
            }
        };
    }

    pub async fn ask(&mut self, label: &str) -> Result<AskStep, WidgetError> {
        let step = self.begin_ask(label)?;
        if let AskStep::Fetch { prompt } = &step {
            let result = self.transport.ask(prompt).await;
            self.complete_ask(result);
        }
        Ok(step)
    }

    /// Back to the placeholder. Cached answers stay; a pending ask is left
    /// alone.
    pub fn clear(&mut self) {
        if !self.controls_disabled() {
            self.phase = Phase::Idle;
        }
    }

    pub fn copy<C: Clipboard>(&mut self, clipboard: &mut C, now: Instant) -> CopyOutcome {
        let Some(answer) = self.answer() else {
            return CopyOutcome::NothingToCopy;
        };

        match clipboard.write_text(&answer.text) {
            Ok(()) => {
                self.copied_at = Some(now);
                CopyOutcome::Copied
            }
            Err(err) => {
                debug!(error = %err, "copy failed");
                CopyOutcome::Failed
            }
        }
    }

    pub fn copy_label(&self, now: Instant) -> &'static str {
        match self.copied_at {
            Some(at) if now.saturating_duration_since(at) < COPY_CONFIRMATION => COPIED_LABEL,
            _ => COPY_LABEL,
        }
    }
}
