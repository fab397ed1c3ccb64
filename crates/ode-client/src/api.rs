use reqwest::StatusCode;
use serde_json::json;
use thiserror::Error;

use ode_types::models::{Message, Song};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {0}")]
    Status(StatusCode),
}

/// Typed client for the message API. Transport and status failures come back
/// as errors; the page-level fallback policy lives in [`crate::views`].
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` up to and including `/api`, e.g. `http://localhost:5000/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub async fn fetch_messages(&self) -> Result<Vec<Message>, ApiError> {
        let response = self
            .http
            .get(format!("{}/messages", self.base_url))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }
        Ok(response.json().await?)
    }

    /// `Ok(None)` for a 404 — absence is an answer, not a failure.
    pub async fn fetch_message_by_id(&self, id: &str) -> Result<Option<Message>, ApiError> {
        let response = self
            .http
            .get(format!("{}/messages/{}", self.base_url, id))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }
        Ok(Some(response.json().await?))
    }

    pub async fn search_messages(&self, query: &str) -> Result<Vec<Message>, ApiError> {
        let response = self
            .http
            .get(format!("{}/messages/search/{}", self.base_url, query))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }
        Ok(response.json().await?)
    }

    pub async fn create_message(
        &self,
        recipient: &str,
        message: &str,
        song: &Song,
    ) -> Result<Message, ApiError> {
        let response = self
            .http
            .post(format!("{}/messages", self.base_url))
            .json(&json!({
                "recipient": recipient,
                "message": message,
                "song": song,
            }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }
        Ok(response.json().await?)
    }
}
