use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN, VARY,
        },
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::RelayConfig;

const ALLOWED_HEADERS: &str = "Content-Type, Authorization";

/// Cross-origin policy of the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsPolicy {
    /// No CORS headers at all.
    Disabled,
    /// `Access-Control-Allow-Origin: *`.
    Any,
    /// Echo the caller's origin only on an exact match.
    AllowList(Vec<String>),
}

impl CorsPolicy {
    /// Parses a comma-separated allow list. A `*` entry allows every origin,
    /// an empty list disables CORS.
    pub fn from_allow_list(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() {
            Self::Disabled
        } else if origins.iter().any(|origin| origin == "*") {
            Self::Any
        } else {
            Self::AllowList(origins)
        }
    }

    /// Value for `Access-Control-Allow-Origin`, if any.
    pub fn allow_origin(&self, origin: Option<&str>) -> Option<String> {
        match self {
            Self::Disabled => None,
            Self::Any => Some("*".to_string()),
            Self::AllowList(list) => origin
                .filter(|origin| list.iter().any(|allowed| allowed == origin))
                .map(str::to_string),
        }
    }

    pub fn decorate(&self, headers: &mut HeaderMap, origin: Option<&str>, methods: &'static str) {
        if *self == Self::Disabled {
            return;
        }

        if matches!(self, Self::AllowList(_)) {
            headers.append(VARY, HeaderValue::from_static("Origin"));
        }

        if let Some(value) = self
            .allow_origin(origin)
            .and_then(|value| HeaderValue::from_str(&value).ok())
        {
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
        }

        headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(methods));
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
    }
}

/// Middleware answering preflights with 204 before routing and adding the
/// CORS headers to every other response.
pub async fn apply_cors(
    State(config): State<Arc<RelayConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request
        .headers()
        .get(ORIGIN)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    config.cors.decorate(
        response.headers_mut(),
        origin.as_deref(),
        config.allowed_methods(),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_anywhere_in_list_allows_all() {
        let policy = CorsPolicy::from_allow_list("https://a.example, *");
        assert_eq!(policy, CorsPolicy::Any);
        assert_eq!(policy.allow_origin(None).as_deref(), Some("*"));
    }

    #[test]
    fn blank_list_disables() {
        assert_eq!(CorsPolicy::from_allow_list(" , "), CorsPolicy::Disabled);
    }

    #[test]
    fn allow_list_echoes_exact_match_only() {
        let policy = CorsPolicy::from_allow_list("https://a.example,https://b.example");
        assert_eq!(
            policy.allow_origin(Some("https://b.example")).as_deref(),
            Some("https://b.example")
        );
        assert_eq!(policy.allow_origin(Some("https://b.example.evil")), None);
        assert_eq!(policy.allow_origin(None), None);
    }

    #[test]
    fn allow_list_always_varies_on_origin() {
        let policy = CorsPolicy::from_allow_list("https://a.example");
        let mut headers = HeaderMap::new();
        policy.decorate(&mut headers, Some("https://other.example"), "POST, OPTIONS");

        assert_eq!(headers.get(VARY).unwrap(), "Origin");
        assert!(headers.get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
        assert_eq!(headers.get(ACCESS_CONTROL_ALLOW_METHODS).unwrap(), "POST, OPTIONS");
    }

    #[test]
    fn disabled_policy_adds_nothing() {
        let mut headers = HeaderMap::new();
        CorsPolicy::Disabled.decorate(&mut headers, Some("https://a.example"), "POST");
        assert!(headers.is_empty());
    }
}
