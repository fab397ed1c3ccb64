/// Database row types — these map directly to SQLite rows.
/// Distinct from the ode-types API models to keep the DB layer independent.

/// One row of the messages-joined-with-songs SELECT that backs every read.
pub struct MessageRow {
    pub id: String,
    pub recipient: String,
    pub message: String,
    pub created_at: String,
    pub song_id: String,
    pub title: String,
    pub artist: String,
    pub album_cover: Option<String>,
    pub uri: Option<String>,
    pub preview_url: Option<String>,
}
