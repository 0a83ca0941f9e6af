mod handlers;
mod models;

use axum::{
    middleware,
    routing::{get, post, MethodRouter},
    Router,
};

use crate::cors::apply_cors;
use crate::AppState;

pub use handlers::{health, hello, method_not_allowed, not_found, relay};
pub use models::{ErrorResponse, HealthResponse, HelloResponse, PromptRequest, ReplyResponse};

pub const HELLO_PATH: &str = "/api/hello";

pub fn router(state: AppState) -> Router {
    // GET would otherwise answer HEAD as well.
    let mut relay_route: MethodRouter<AppState> = post(relay).head(method_not_allowed);
    if state.config.health_check {
        relay_route = relay_route.get(health);
    }
    let relay_route = relay_route.fallback(method_not_allowed);

    Router::new()
        .route(&state.config.relay_path, relay_route)
        .route(HELLO_PATH, get(hello))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.config.clone(),
            apply_cors,
        ))
        .with_state(state)
}
