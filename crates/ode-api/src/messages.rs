use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{error, warn};

use ode_db::models::MessageRow;
use ode_types::api::{CreateMessageRequest, ErrorResponse};
use ode_types::models::{Message, Song};

use crate::AppState;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn internal(msg: &str) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(msg)),
    )
}

pub async fn list_messages(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.list_messages())
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            internal("Failed to fetch messages")
        })?
        .map_err(|e| {
            error!("Error fetching messages: {}", e);
            internal("Failed to fetch messages")
        })?;

    let messages: Vec<Message> = rows.into_iter().map(row_to_message).collect();
    Ok(Json(messages))
}

pub async fn get_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || db.db.get_message(&id))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            internal("Failed to fetch message")
        })?
        .map_err(|e| {
            error!("Error fetching message: {}", e);
            internal("Failed to fetch message")
        })?;

    match row {
        Some(row) => Ok(Json(row_to_message(row))),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Message not found")),
        )),
    }
}

pub async fn search_messages(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.search_messages(&query))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            internal("Failed to search messages")
        })?
        .map_err(|e| {
            error!("Error searching messages: {}", e);
            internal("Failed to search messages")
        })?;

    let messages: Vec<Message> = rows.into_iter().map(row_to_message).collect();
    Ok(Json(messages))
}

pub async fn create_message(
    State(state): State<AppState>,
    Json(req): Json<CreateMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Validate before touching the store — a bad request performs zero writes.
    let recipient = req.recipient.unwrap_or_default();
    let message = req.message.unwrap_or_default();
    let song: Song = req.song.unwrap_or_default().into_song();

    if recipient.is_empty() || message.is_empty() || song.id.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Missing required fields")),
        ));
    }

    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || db.db.create_message(&recipient, &message, &song))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            internal("Failed to create message")
        })?
        .map_err(|e| {
            error!("Error creating message: {}", e);
            internal("Failed to create message")
        })?;

    Ok((StatusCode::CREATED, Json(row_to_message(row))))
}

fn row_to_message(row: MessageRow) -> Message {
    let date = row
        .created_at
        .parse::<chrono::DateTime<chrono::Utc>>()
        .or_else(|_| {
            // Tolerate SQLite's "YYYY-MM-DD HH:MM:SS" and bare-date forms.
            chrono::NaiveDateTime::parse_from_str(&row.created_at, "%Y-%m-%d %H:%M:%S")
                .map(|ndt| ndt.and_utc())
        })
        .or_else(|_| {
            chrono::NaiveDate::parse_from_str(&row.created_at, "%Y-%m-%d")
                .map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}' on message '{}': {}", row.created_at, row.id, e);
            chrono::DateTime::default()
        });

    Message {
        id: row.id,
        recipient: row.recipient,
        message: row.message,
        date,
        song: Song {
            id: row.song_id,
            title: row.title,
            artist: row.artist,
            album_cover: row.album_cover,
            uri: row.uri,
            preview_url: row.preview_url,
        },
    }
}
