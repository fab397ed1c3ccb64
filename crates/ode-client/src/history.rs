use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;

use ode_types::models::Message;

/// Client-local cache of messages this user created, consulted when the API
/// is unreachable. Written only at successful creation time and never synced
/// back to the server.
pub trait HistoryCache: Send + Sync {
    fn append(&self, message: &Message) -> Result<()>;
    fn list(&self) -> Result<Vec<Message>>;

    fn get_by_id(&self, id: &str) -> Result<Option<Message>> {
        Ok(self.list()?.into_iter().find(|m| m.id == id))
    }
}

#[derive(Default)]
pub struct MemoryHistory {
    messages: Mutex<Vec<Message>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryCache for MemoryHistory {
    fn append(&self, message: &Message) -> Result<()> {
        self.messages
            .lock()
            .map_err(|e| anyhow::anyhow!("history lock poisoned: {}", e))?
            .push(message.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<Message>> {
        Ok(self
            .messages
            .lock()
            .map_err(|e| anyhow::anyhow!("history lock poisoned: {}", e))?
            .clone())
    }
}

/// File-backed history: one JSON array, rewritten per append. The file name
/// carries the same fixed key the browser build used for local storage.
pub struct JsonFileHistory {
    path: PathBuf,
}

impl JsonFileHistory {
    pub const FILE_NAME: &'static str = "message-history.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `message-history.json` inside the given directory.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(dir.into().join(Self::FILE_NAME))
    }
}

impl HistoryCache for JsonFileHistory {
    fn append(&self, message: &Message) -> Result<()> {
        let mut messages = self.list()?;
        messages.push(message.clone());
        let json = serde_json::to_string(&messages)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    fn list(&self) -> Result<Vec<Message>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(serde_json::from_str(&contents).unwrap_or_default()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }
}
