use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::store::KvStore;

/// Fixed key the token blob lives under in the injected store.
pub const TOKEN_KEY: &str = "spotify_token";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    /// Absolute expiry in milliseconds since the Unix epoch, stamped at save
    /// time as `now + expires_in * 1000`.
    pub expires_at: i64,
}

impl CatalogToken {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= chrono::Utc::now().timestamp_millis()
    }
}

/// The catalog client's single token cache entry, persisted through an
/// injected key-value store so tokens can outlive the process when the store
/// does.
#[derive(Clone)]
pub struct TokenCache {
    store: Arc<dyn KvStore>,
}

impl TokenCache {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub fn load(&self) -> Option<CatalogToken> {
        let blob = self.store.get(TOKEN_KEY)?;
        serde_json::from_str(&blob).ok()
    }

    /// Stamp the absolute expiry and persist.
    pub fn save(&self, mut token: CatalogToken) {
        token.expires_at = chrono::Utc::now().timestamp_millis() + token.expires_in as i64 * 1000;
        match serde_json::to_string(&token) {
            Ok(blob) => self.store.set(TOKEN_KEY, &blob),
            Err(e) => tracing::error!("Failed to serialize catalog token: {}", e),
        }
    }

    pub fn clear(&self) {
        self.store.remove(TOKEN_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn token(expires_in: u64) -> CatalogToken {
        CatalogToken {
            access_token: "tok".to_string(),
            token_type: "Bearer".to_string(),
            expires_in,
            expires_at: 0,
        }
    }

    #[test]
    fn save_stamps_expiry() {
        let cache = TokenCache::new(Arc::new(MemoryStore::new()));
        cache.save(token(3600));

        let loaded = cache.load().expect("token stored");
        assert!(!loaded.is_expired());
        assert!(loaded.expires_at > chrono::Utc::now().timestamp_millis());
    }

    #[test]
    fn zero_lifetime_token_is_expired() {
        let cache = TokenCache::new(Arc::new(MemoryStore::new()));
        cache.save(token(0));
        assert!(cache.load().expect("token stored").is_expired());
    }

    #[test]
    fn clear_removes_token() {
        let cache = TokenCache::new(Arc::new(MemoryStore::new()));
        cache.save(token(3600));
        cache.clear();
        assert!(cache.load().is_none());
    }

    #[test]
    fn garbage_blob_loads_as_none() {
        let store = Arc::new(MemoryStore::new());
        store.set(TOKEN_KEY, "not json");
        let cache = TokenCache::new(store);
        assert!(cache.load().is_none());
    }
}
