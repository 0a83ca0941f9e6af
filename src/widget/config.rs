use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::WidgetError;

pub const ENDPOINT_ATTRIBUTE: &str = "data-endpoint";
pub const QUESTIONS_ATTRIBUTE: &str = "data-questions";

/// One question button. The label doubles as the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionEntry {
    pub label: String,
    pub prompt: String,
}

impl QuestionEntry {
    pub fn new(label: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            prompt: prompt.into(),
        }
    }
}

pub fn default_questions() -> Vec<QuestionEntry> {
    vec![
        QuestionEntry::new(
            "Where is my order?",
            "Where is my order? Keep it concise and friendly.",
        ),
        QuestionEntry::new(
            "Return policy",
            "What is your return policy? Summarize in 3-4 lines.",
        ),
        QuestionEntry::new(
            "Shipping times",
            "How long does shipping take within the US?",
        ),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    pub endpoint: String,
    pub questions: Vec<QuestionEntry>,
}

impl WidgetConfig {
    pub fn new(endpoint: impl Into<String>, questions: Vec<QuestionEntry>) -> Self {
        Self {
            endpoint: endpoint.into(),
            questions: normalize_questions(questions),
        }
    }

    /// Reads the widget configuration from its host element's attributes.
    ///
    /// A missing endpoint is fatal. A missing, malformed or empty question
    /// list falls back to [`default_questions`].
    pub fn from_attributes<F>(attribute: F) -> Result<Self, WidgetError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = attribute(ENDPOINT_ATTRIBUTE)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(WidgetError::MissingEndpoint)?;

        let questions = match attribute(QUESTIONS_ATTRIBUTE) {
            Some(raw) => serde_json::from_str::<Vec<QuestionEntry>>(&raw).unwrap_or_else(|err| {
                warn!(error = %err, "ignoring malformed {QUESTIONS_ATTRIBUTE}");
                Vec::new()
            }),
            None => Vec::new(),
        };

        Ok(Self::new(endpoint, questions))
    }

    pub fn question(&self, label: &str) -> Option<&QuestionEntry> {
        self.questions.iter().find(|question| question.label == label)
    }
}

/// Drops blank and duplicate labels (first wins); an empty result becomes
/// the default set.
fn normalize_questions(questions: Vec<QuestionEntry>) -> Vec<QuestionEntry> {
    let mut seen = HashSet::new();
    let questions: Vec<QuestionEntry> = questions
        .into_iter()
        .filter(|question| !question.label.trim().is_empty())
        .filter(|question| {
            let fresh = seen.insert(question.label.clone());
            if !fresh {
                warn!(label = %question.label, "dropping duplicate question label");
            }
            fresh
        })
        .collect();

    if questions.is_empty() {
        default_questions()
    } else {
        questions
    }
}
