use serde::{Deserialize, Serialize};

use crate::models::Song;

// -- Messages --

/// Body of POST /api/messages. Fields are all optional at the serde level so
/// that a missing field reaches the handler's own validation (a 400 with
/// "Missing required fields") instead of being rejected during deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct CreateMessageRequest {
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub song: Option<SongInput>,
}

/// Caller-supplied song metadata on create. Same wire shape as [`Song`] but
/// with every field optional — validation happens in the handler.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongInput {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album_cover: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub preview_url: Option<String>,
}

impl SongInput {
    /// Collapse into a [`Song`], defaulting absent title/artist to empty
    /// strings. Only valid once the handler has checked that `id` is present.
    pub fn into_song(self) -> Song {
        Song {
            id: self.id.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            artist: self.artist.unwrap_or_default(),
            album_cover: self.album_cover,
            uri: self.uri,
            preview_url: self.preview_url,
        }
    }
}

// -- Generic bodies --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
