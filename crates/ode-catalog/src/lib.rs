pub mod client;
pub mod notify;
pub mod store;
pub mod token;

pub use client::{CatalogClient, CatalogConfig};
pub use notify::{LogNotifier, Notifier};
pub use store::{FileStore, KvStore, MemoryStore};
pub use token::{CatalogToken, TokenCache};

use thiserror::Error;

/// Internal failure modes of the catalog client. These never escape the
/// public API — callers see empty results plus a notification instead.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("token endpoint returned {0}")]
    TokenStatus(reqwest::StatusCode),
    #[error("search endpoint returned {0}")]
    SearchStatus(reqwest::StatusCode),
}
