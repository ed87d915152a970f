pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::conversation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/roles", get(handlers::handle_roles))
        // Session API
        .route(
            "/api/v1/session",
            get(handlers::handle_get_session).delete(handlers::handle_reset),
        )
        .route("/api/v1/session/actions", post(handlers::handle_action))
        .route("/api/v1/session/resume", post(handlers::handle_upload))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
