use axum::{
    http::{header::ALLOW, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use thiserror::Error;

use crate::api::ErrorResponse;

/// Every way a relay request can fail. Each variant maps to one status code
/// and one JSON body.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Missing OPENAI_API_KEY on server")]
    Misconfiguration,

    #[error("Missing \"prompt\" in JSON body")]
    MissingPrompt,

    #[error("{message}")]
    Upstream {
        status: u16,
        message: String,
        details: Value,
    },

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Server error")]
    Internal,

    #[error("Method not allowed")]
    MethodNotAllowed { allow: &'static str },

    #[error("Not found")]
    NotFound,
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Misconfiguration | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MissingPrompt => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = self.to_string();

        match self {
            Self::Upstream {
                status: upstream_status,
                details,
                ..
            } => (
                status,
                Json(ErrorResponse {
                    error,
                    status: Some(upstream_status),
                    details: Some(details),
                }),
            )
                .into_response(),
            Self::MethodNotAllowed { allow } => (
                status,
                [(ALLOW, HeaderValue::from_static(allow))],
                Json(ErrorResponse::new(error)),
            )
                .into_response(),
            _ => (status, Json(ErrorResponse::new(error))).into_response(),
        }
    }
}
