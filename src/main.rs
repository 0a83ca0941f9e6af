use std::error::Error;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use faq_relay::{build_app, run_server, AppState, RelayConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        "Starting {} {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let config = RelayConfig::from_env();
    if !config.has_key() {
        warn!("OPENAI_API_KEY is not set, relay requests will fail with 500");
    }
    info!(
        relay_path = %config.relay_path,
        health_check = config.health_check,
        cors = ?config.cors,
        "relay configured"
    );

    let port = config.port;
    let app = build_app(AppState::new(config));
    run_server(app, port).await?;

    Ok(())
}
