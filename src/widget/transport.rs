use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayCallError {
    #[error("relay request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("relay answered {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("relay response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

/// How the widget reaches the relay handler.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn ask(&self, prompt: &str) -> Result<String, RelayCallError>;
}

#[derive(Serialize)]
struct AskBody<'a> {
    prompt: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct RelayBody {
    #[serde(default)]
    reply: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Posts `{prompt}` to the relay endpoint and reads back `{reply}`.
pub struct HttpRelay {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRelay {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl RelayTransport for HttpRelay {
    async fn ask(&self, prompt: &str) -> Result<String, RelayCallError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&AskBody { prompt })
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;
        let body: RelayBody = serde_json::from_str(&raw)?;

        if !status.is_success() {
            return Err(RelayCallError::Rejected {
                status: status.as_u16(),
                message: body.error.unwrap_or_else(|| "Request failed".to_string()),
            });
        }

        Ok(body.reply.unwrap_or_default().trim().to_string())
    }
}
