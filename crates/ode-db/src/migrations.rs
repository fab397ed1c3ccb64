use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS songs (
            id            TEXT PRIMARY KEY,
            title         TEXT NOT NULL,
            artist        TEXT NOT NULL,
            album_cover   TEXT,
            uri           TEXT,
            preview_url   TEXT
        );

        CREATE TABLE IF NOT EXISTS messages (
            id          TEXT PRIMARY KEY,
            recipient   TEXT NOT NULL,
            message     TEXT NOT NULL,
            song_id     TEXT NOT NULL REFERENCES songs(id),
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_messages_created
            ON messages(created_at);

        CREATE INDEX IF NOT EXISTS idx_messages_song
            ON messages(song_id);
        ",
    )?;

    seed(conn)?;

    info!("Database migrations complete");
    Ok(())
}

/// Seed one sample song and message, but only into a virgin database.
/// Runs on every startup; the emptiness check makes it idempotent.
fn seed(conn: &Connection) -> Result<()> {
    let song_count: i64 = conn.query_row("SELECT COUNT(*) FROM songs", [], |row| row.get(0))?;
    if song_count > 0 {
        return Ok(());
    }

    conn.execute(
        "INSERT INTO songs (id, title, artist, album_cover, preview_url) VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            "1",
            "Always",
            "Bon Jovi",
            "https://i.scdn.co/image/ab67616d0000b273b7c05417113f613a3c76c226",
            "https://p.scdn.co/mp3-preview/96d3a5e20256d5ab68b88eb37a62dabe7d3efe16",
        ],
    )?;

    conn.execute(
        "INSERT INTO messages (id, recipient, message, song_id, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            "1",
            "Ode Team",
            "bismillah UTS 100 amin ya ges :)))",
            "1",
            "2025-03-29T00:00:00Z",
        ],
    )?;

    info!("Seeded sample song and message");
    Ok(())
}
