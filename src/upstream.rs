use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::ApiKey;

pub const COMPLETIONS_PATH: &str = "/v1/chat/completions";
pub const MODEL: &str = "gpt-4o-mini";
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant for an e-commerce website.";
pub const TEMPERATURE: f64 = 0.7;
pub const MAX_TOKENS: u32 = 300;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream returned status {status}")]
    Rejected { status: u16, body: Value },

    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Sends one user prompt to a chat-completion service and returns the text
/// of the first completion.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, credential: &ApiKey, prompt: &str) -> Result<String, UpstreamError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Option<Vec<Option<Choice>>>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    fn into_reply(self) -> String {
        self.choices
            .unwrap_or_default()
            .into_iter()
            .next()
            .flatten()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default()
    }
}

/// Pulls a human-readable message out of a provider error body, e.g.
/// `{"error":{"message":"rate limited"}}`.
pub fn error_message(body: &Value) -> Option<&str> {
    let error = body.get("error")?;
    error
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| error.as_str())
        .filter(|message| !message.trim().is_empty())
}

/// OpenAI-compatible chat-completions client.
pub struct OpenAiClient {
    client: reqwest::Client,
    url: String,
}

impl OpenAiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: format!("{}{COMPLETIONS_PATH}", base_url.trim_end_matches('/')),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, credential: &ApiKey, prompt: &str) -> Result<String, UpstreamError> {
        debug!("POST {} prompt_len={}", self.url, prompt.len());

        let request = ChatRequest {
            model: MODEL,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(credential.expose())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;

        if !status.is_success() {
            let body = serde_json::from_str(&raw).unwrap_or(Value::String(raw));
            return Err(UpstreamError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        // `null` anywhere along choices[0].message.content reads as no text.
        let parsed: Option<ChatResponse> = serde_json::from_str(&raw)?;
        Ok(parsed.map(ChatResponse::into_reply).unwrap_or_default())
    }
}
