pub mod api;
pub mod history;
pub mod playback;
pub mod views;

pub use api::{ApiClient, ApiError};
pub use history::{HistoryCache, JsonFileHistory, MemoryHistory};
pub use playback::{PlaybackSession, PreviewHandle, PreviewPlayer};
