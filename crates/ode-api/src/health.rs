use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::error;

use ode_types::api::{ErrorResponse, HealthResponse};

use crate::AppState;

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let db = state.clone();
    let probe = tokio::task::spawn_blocking(move || db.db.ping()).await;

    match probe {
        Ok(Ok(())) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "Database connection successful".to_string(),
            }),
        )
            .into_response(),
        Ok(Err(e)) => {
            error!("Database connection error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Database connection failed")),
            )
                .into_response()
        }
        Err(e) => {
            error!("spawn_blocking join error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Database connection failed")),
            )
                .into_response()
        }
    }
}
