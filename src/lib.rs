pub mod api;
pub mod config;
pub mod cors;
pub mod error;
pub mod upstream;
pub mod widget;

use std::sync::Arc;

use axum::Router;
use tracing::info;

pub use config::{ApiKey, MissingPromptPolicy, RelayConfig};
pub use cors::CorsPolicy;
pub use error::RelayError;
pub use upstream::{CompletionClient, OpenAiClient, UpstreamError};

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub client: Arc<dyn CompletionClient>,
}

impl AppState {
    pub fn new(config: RelayConfig) -> Self {
        let client = Arc::new(OpenAiClient::new(&config.api_base_url));
        Self::with_client(config, client)
    }

    pub fn with_client(config: RelayConfig, client: Arc<dyn CompletionClient>) -> Self {
        Self {
            config: Arc::new(config),
            client,
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    api::router(state)
}

pub async fn run_server(app: Router, port: u16) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await
}
