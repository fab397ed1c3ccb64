use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use tracing::{debug, error};

use ode_types::models::Song;

use crate::CatalogError;
use crate::notify::{LogNotifier, Notifier};
use crate::store::{KvStore, MemoryStore};
use crate::token::{CatalogToken, TokenCache};

const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_API_BASE: &str = "https://api.spotify.com/v1";
const SEARCH_LIMIT: u32 = 10;

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub client_id: String,
    pub client_secret: String,
    pub token_url: String,
    pub api_base: String,
}

impl CatalogConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let client_id = std::env::var("ODE_SPOTIFY_CLIENT_ID")
            .map_err(|_| anyhow::anyhow!("ODE_SPOTIFY_CLIENT_ID must be set"))?;
        let client_secret = std::env::var("ODE_SPOTIFY_CLIENT_SECRET")
            .map_err(|_| anyhow::anyhow!("ODE_SPOTIFY_CLIENT_SECRET must be set"))?;
        Ok(Self::new(client_id, client_secret))
    }
}

/// Client-credentials client for the external music catalog. Holds one cached
/// token (through the injected store) and exposes keyword track search.
/// Failures never propagate: search always returns a Vec, with errors turned
/// into notifications.
pub struct CatalogClient {
    http: reqwest::Client,
    config: CatalogConfig,
    tokens: TokenCache,
    notifier: Arc<dyn Notifier>,
}

impl CatalogClient {
    pub fn new(config: CatalogConfig) -> Self {
        Self::with_store(config, Arc::new(MemoryStore::new()), Arc::new(LogNotifier))
    }

    pub fn with_store(
        config: CatalogConfig,
        store: Arc<dyn KvStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            tokens: TokenCache::new(store),
            notifier,
        }
    }

    /// True iff a stored token exists and has not expired. No I/O beyond the
    /// store read.
    pub fn is_authenticated(&self) -> bool {
        self.tokens.load().is_some_and(|token| !token.is_expired())
    }

    /// Fetch and cache an application token via the client-credentials grant.
    /// Returns false on any failure; the error is logged, not propagated.
    pub async fn get_client_credentials_token(&self) -> bool {
        match self.fetch_token().await {
            Ok(token) => {
                self.tokens.save(token);
                true
            }
            Err(e) => {
                error!("Error getting client credentials token: {}", e);
                false
            }
        }
    }

    async fn fetch_token(&self) -> Result<CatalogToken, CatalogError> {
        let credentials = B64.encode(format!(
            "{}:{}",
            self.config.client_id, self.config.client_secret
        ));

        let response = self
            .http
            .post(&self.config.token_url)
            .header(AUTHORIZATION, format!("Basic {}", credentials))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CatalogError::TokenStatus(response.status()));
        }

        let token: TokenResponse = response.json().await?;
        Ok(CatalogToken {
            access_token: token.access_token,
            token_type: token.token_type,
            expires_in: token.expires_in,
            expires_at: 0, // stamped by the cache on save
        })
    }

    /// Keyword track search. Contract:
    /// - empty query returns empty with no network traffic;
    /// - a missing/expired token is fetched first (failure → notify + empty);
    /// - a 401 clears the token and triggers exactly one refresh-and-retry;
    /// - every other failure is notified and collapsed to an empty result.
    pub async fn search_tracks(&self, query: &str) -> Vec<Song> {
        if query.is_empty() {
            return Vec::new();
        }

        if !self.is_authenticated() && !self.get_client_credentials_token().await {
            self.notifier.notify(
                "Couldn't connect to Spotify",
                "There was an error connecting to Spotify",
            );
            return Vec::new();
        }

        let Some(mut token) = self.tokens.load() else {
            return Vec::new();
        };

        let mut refreshed = false;
        loop {
            match self.search_once(query, &token).await {
                Ok(songs) => return songs,
                Err(CatalogError::SearchStatus(status))
                    if status == StatusCode::UNAUTHORIZED && !refreshed =>
                {
                    debug!("Search got 401, refreshing token and retrying once");
                    self.tokens.clear();
                    refreshed = true;
                    if !self.get_client_credentials_token().await {
                        self.notifier.notify(
                            "Couldn't connect to Spotify",
                            "There was an error connecting to Spotify",
                        );
                        return Vec::new();
                    }
                    match self.tokens.load() {
                        Some(t) => token = t,
                        None => return Vec::new(),
                    }
                }
                Err(e) => {
                    error!("Error searching catalog: {}", e);
                    self.notifier.notify(
                        "Error searching songs",
                        "There was an error searching Spotify",
                    );
                    return Vec::new();
                }
            }
        }
    }

    async fn search_once(
        &self,
        query: &str,
        token: &CatalogToken,
    ) -> Result<Vec<Song>, CatalogError> {
        let limit = SEARCH_LIMIT.to_string();
        let response = self
            .http
            .get(format!("{}/search", self.config.api_base))
            .query(&[("q", query), ("type", "track"), ("limit", limit.as_str())])
            .header(
                AUTHORIZATION,
                format!("{} {}", token.token_type, token.access_token),
            )
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CatalogError::SearchStatus(response.status()));
        }

        let results: SearchResponse = response.json().await?;
        Ok(results.tracks.items.into_iter().map(Track::into_song).collect())
    }
}

// -- Provider wire shapes --

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    token_type: String,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    tracks: TrackPage,
}

#[derive(Debug, Deserialize)]
struct TrackPage {
    items: Vec<Track>,
}

#[derive(Debug, Deserialize)]
struct Track {
    id: String,
    name: String,
    #[serde(default)]
    artists: Vec<TrackArtist>,
    #[serde(default)]
    album: TrackAlbum,
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    preview_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TrackArtist {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct TrackAlbum {
    #[serde(default)]
    images: Vec<AlbumImage>,
}

#[derive(Debug, Deserialize)]
struct AlbumImage {
    url: String,
}

impl Track {
    fn into_song(self) -> Song {
        let artist = self
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let album_cover = self.album.images.into_iter().next().map(|image| image.url);

        Song {
            id: self.id,
            title: self.name,
            artist,
            album_cover,
            uri: self.uri,
            preview_url: self.preview_url,
        }
    }
}
