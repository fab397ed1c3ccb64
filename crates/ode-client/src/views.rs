//! Page-level read and submit flows, including the degrade-gracefully
//! behavior: every API failure renders as an inline error plus cached or
//! sample data, never as a fault.

use chrono::Utc;
use thiserror::Error;
use tracing::{error, warn};

use ode_types::models::{Message, Song};

use crate::api::ApiClient;
use crate::history::HistoryCache;

/// How many recent messages the home page shows.
const HOME_RECENT_LIMIT: usize = 6;

/// Data for a page plus an optional inline error banner.
pub struct PageView<T> {
    pub data: T,
    pub error: Option<String>,
}

impl<T> PageView<T> {
    fn ok(data: T) -> Self {
        Self { data, error: None }
    }

    fn degraded(data: T, error: impl Into<String>) -> Self {
        Self {
            data,
            error: Some(error.into()),
        }
    }
}

/// Home: the six most recent messages; on failure, an error banner over the
/// fixed sample message.
pub async fn load_home(api: &ApiClient) -> PageView<Vec<Message>> {
    match api.fetch_messages().await {
        Ok(mut messages) => {
            messages.truncate(HOME_RECENT_LIMIT);
            PageView::ok(messages)
        }
        Err(e) => {
            error!("Failed to fetch messages: {}", e);
            PageView::degraded(vec![sample_message()], "Failed to load recent messages")
        }
    }
}

/// Browse: the full newest-first list; failures show a banner over an empty
/// list.
pub async fn load_browse(api: &ApiClient) -> PageView<Vec<Message>> {
    match api.fetch_messages().await {
        Ok(messages) => PageView::ok(messages),
        Err(e) => {
            error!("Failed to fetch messages: {}", e);
            PageView::degraded(Vec::new(), "Failed to load messages. Please try again later.")
        }
    }
}

/// Browse search: a blank query means "list all" — the search endpoint is
/// never called with an empty fragment.
pub async fn browse_search(api: &ApiClient, query: &str) -> PageView<Vec<Message>> {
    let result = if query.trim().is_empty() {
        api.fetch_messages().await
    } else {
        api.search_messages(query).await
    };

    match result {
        Ok(messages) => PageView::ok(messages),
        Err(e) => {
            error!("Search error: {}", e);
            PageView::degraded(Vec::new(), "Search failed. Please try again.")
        }
    }
}

/// History: server state when reachable, otherwise the local cache of
/// messages created from this client.
pub async fn load_history(
    api: &ApiClient,
    cache: &dyn HistoryCache,
) -> PageView<Vec<Message>> {
    match api.fetch_messages().await {
        Ok(messages) => PageView::ok(messages),
        Err(e) => {
            error!("Failed to fetch messages: {}", e);
            let cached = cache.list().unwrap_or_else(|e| {
                warn!("History cache unreadable: {}", e);
                Vec::new()
            });
            PageView::degraded(cached, "Failed to load message history. Please try again later.")
        }
    }
}

pub enum MessageDetail {
    Found { message: Message, error: Option<String> },
    NotFound,
}

/// Message detail: fetch by id; a transport failure falls back to the local
/// cache (a cached hit clears the banner, matching the original page).
/// An authoritative 404 is NotFound regardless of the cache.
pub async fn load_message(
    api: &ApiClient,
    cache: &dyn HistoryCache,
    id: &str,
) -> MessageDetail {
    match api.fetch_message_by_id(id).await {
        Ok(Some(message)) => MessageDetail::Found { message, error: None },
        Ok(None) => MessageDetail::NotFound,
        Err(e) => {
            error!("Failed to fetch message: {}", e);
            match cache.get_by_id(id) {
                Ok(Some(message)) => MessageDetail::Found { message, error: None },
                _ => MessageDetail::NotFound,
            }
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SubmitError {
    #[error("Recipient is required")]
    MissingRecipient,
    #[error("Message is required")]
    MissingMessage,
    #[error("Please select a song")]
    MissingSong,
    #[error("Failed to submit message")]
    Failed,
}

/// Submit: client-side required-field checks, POST, then append the created
/// message to the local history with a client-stamped date. A cache write
/// failure is logged but does not fail a submission the server accepted.
pub async fn submit_message(
    api: &ApiClient,
    cache: &dyn HistoryCache,
    recipient: &str,
    message: &str,
    song: Option<&Song>,
) -> Result<Message, SubmitError> {
    if recipient.trim().is_empty() {
        return Err(SubmitError::MissingRecipient);
    }
    if message.trim().is_empty() {
        return Err(SubmitError::MissingMessage);
    }
    let song = match song {
        Some(song) if !song.id.is_empty() => song,
        _ => return Err(SubmitError::MissingSong),
    };

    let created = api
        .create_message(recipient, message, song)
        .await
        .map_err(|e| {
            error!("Submit error: {}", e);
            SubmitError::Failed
        })?;

    let mut entry = created.clone();
    entry.date = Utc::now();
    if let Err(e) = cache.append(&entry) {
        warn!("Failed to append to history cache: {}", e);
    }

    Ok(created)
}

/// The fixed message the home page falls back to when the API is down.
pub fn sample_message() -> Message {
    Message {
        id: "1".to_string(),
        recipient: "Ani".to_string(),
        message: "Always.".to_string(),
        date: Utc::now(),
        song: Song {
            id: "1".to_string(),
            title: "Always".to_string(),
            artist: "Bon Jovi".to_string(),
            album_cover: Some(
                "https://i.scdn.co/image/ab67616d0000b273b7c05417113f613a3c76c226".to_string(),
            ),
            uri: None,
            preview_url: None,
        },
    }
}
