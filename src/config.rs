use std::env;
use std::fmt;

use crate::api::HELLO_PATH;
use crate::cors::CorsPolicy;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_RELAY_PATH: &str = "/api/chatgpt";

/// Upstream credential. Its `Debug` output is redacted so the value never
/// ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// What the relay does when a request carries no usable `prompt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingPromptPolicy {
    /// Answer 400.
    Reject,
    /// Forward this fixed prompt instead.
    Substitute(String),
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub port: u16,
    pub api_key: Option<ApiKey>,
    pub api_base_url: String,
    pub relay_path: String,
    pub health_check: bool,
    pub missing_prompt: MissingPromptPolicy,
    pub cors: CorsPolicy,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            api_key: None,
            api_base_url: DEFAULT_BASE_URL.to_string(),
            relay_path: DEFAULT_RELAY_PATH.to_string(),
            health_check: true,
            missing_prompt: MissingPromptPolicy::Reject,
            cors: CorsPolicy::Any,
        }
    }
}

impl RelayConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Unset and unparsable
    /// values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(defaults.port);

        let api_key = lookup("OPENAI_API_KEY")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(ApiKey::new);

        let api_base_url = lookup("OPENAI_BASE_URL")
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.api_base_url);

        let relay_path = lookup("RELAY_PATH")
            .map(|value| value.trim().to_string())
            .filter(|value| is_valid_relay_path(value))
            .unwrap_or(defaults.relay_path);

        let health_check = lookup("RELAY_HEALTH_CHECK")
            .map(|value| parse_flag(&value))
            .unwrap_or(defaults.health_check);

        let missing_prompt = match lookup("RELAY_DEFAULT_PROMPT") {
            Some(value) if !value.trim().is_empty() => {
                MissingPromptPolicy::Substitute(value.trim().to_string())
            }
            _ => MissingPromptPolicy::Reject,
        };

        let cors = lookup("ALLOWED_ORIGINS")
            .map(|value| CorsPolicy::from_allow_list(&value))
            .unwrap_or(defaults.cors);

        Self {
            port,
            api_key,
            api_base_url,
            relay_path,
            health_check,
            missing_prompt,
            cors,
        }
    }

    pub fn has_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Methods the relay route answers, in `Allow` header form.
    pub fn allowed_methods(&self) -> &'static str {
        if self.health_check {
            "POST, GET, OPTIONS"
        } else {
            "POST, OPTIONS"
        }
    }
}

/// A literal route that cannot collide with the hello endpoint. Captures and
/// wildcards are refused.
fn is_valid_relay_path(path: &str) -> bool {
    path.starts_with('/')
        && path != HELLO_PATH
        && !path.contains("//")
        && !path.contains([':', '*', '{', '}'])
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "false" | "0" | "off" | "no"
    )
}
