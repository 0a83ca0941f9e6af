use axum::{
    body::to_bytes,
    extract::{Request, State},
    Json,
};
use tracing::error;

use crate::config::MissingPromptPolicy;
use crate::error::RelayError;
use crate::upstream::{self, UpstreamError};
use crate::AppState;

use super::models::{HealthResponse, HelloResponse, PromptRequest, ReplyResponse};

/// Largest request body the relay reads.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Forwards the caller's prompt upstream and answers `{reply}`.
///
/// The credential is checked before the body is read. The body is parsed as
/// JSON whatever its content type; an unparsable body is treated like an
/// empty object.
pub async fn relay(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<ReplyResponse>, RelayError> {
    let Some(credential) = state.config.api_key.as_ref() else {
        error!("relay called without OPENAI_API_KEY configured");
        return Err(RelayError::Misconfiguration);
    };

    let body = to_bytes(request.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(|err| {
            error!(error = %err, "failed to read request body");
            RelayError::PayloadTooLarge
        })?;

    let request: PromptRequest = serde_json::from_slice(&body).unwrap_or_default();
    let prompt = resolve_prompt(request.prompt, &state.config.missing_prompt)?;

    match state.client.complete(credential, &prompt).await {
        Ok(reply) => Ok(Json(ReplyResponse { reply })),
        Err(UpstreamError::Rejected { status, body }) => {
            error!(status, body = %body, "OpenAI API error");
            let message = match upstream::error_message(&body) {
                Some(detail) => format!("OpenAI API error: {detail}"),
                None => "OpenAI API error".to_string(),
            };
            Err(RelayError::Upstream {
                status,
                message,
                details: body,
            })
        }
        Err(err) => {
            error!(error = %err, "Server error");
            Err(RelayError::Internal)
        }
    }
}

fn resolve_prompt(
    prompt: Option<String>,
    policy: &MissingPromptPolicy,
) -> Result<String, RelayError> {
    let prompt = prompt
        .map(|prompt| prompt.trim().to_string())
        .filter(|prompt| !prompt.is_empty());

    match (prompt, policy) {
        (Some(prompt), _) => Ok(prompt),
        (None, MissingPromptPolicy::Substitute(default)) => Ok(default.clone()),
        (None, MissingPromptPolicy::Reject) => Err(RelayError::MissingPrompt),
    }
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        has_key: state.config.has_key(),
    })
}

pub async fn hello(State(state): State<AppState>) -> Json<HelloResponse> {
    Json(HelloResponse {
        ok: true,
        has_key: state.config.has_key(),
        version: env!("CARGO_PKG_VERSION"),
        now: chrono::Utc::now().to_rfc3339(),
    })
}

pub async fn method_not_allowed(State(state): State<AppState>) -> RelayError {
    RelayError::MethodNotAllowed {
        allow: state.config.allowed_methods(),
    }
}

pub async fn not_found() -> RelayError {
    RelayError::NotFound
}
