pub mod health;
pub mod messages;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use ode_db::Database;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
}

/// Assemble the /api router. Split out of the server binary so tests can
/// drive it directly with `tower::ServiceExt::oneshot`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/messages", get(messages::list_messages))
        .route("/api/messages", post(messages::create_message))
        .route("/api/messages/{id}", get(messages::get_message))
        .route("/api/messages/search/{query}", get(messages::search_messages))
        .with_state(state)
}
