use crate::Database;
use crate::models::MessageRow;
use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use ode_types::models::Song;
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

const MESSAGE_SELECT: &str = "SELECT m.id, m.recipient, m.message, m.created_at,
        s.id, s.title, s.artist, s.album_cover, s.uri, s.preview_url
 FROM messages m
 JOIN songs s ON m.song_id = s.id";

impl Database {
    /// Cheap connectivity probe for the health endpoint.
    pub fn ping(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.query_row("SELECT 1", [], |_| Ok(()))?;
            Ok(())
        })
    }

    // -- Messages --

    /// All messages joined with their song, newest first. No pagination.
    pub fn list_messages(&self) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let sql = format!("{} ORDER BY m.created_at DESC", MESSAGE_SELECT);
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], map_message_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_message(&self, id: &str) -> Result<Option<MessageRow>> {
        self.with_conn(|conn| {
            let sql = format!("{} WHERE m.id = ?1", MESSAGE_SELECT);
            let mut stmt = conn.prepare(&sql)?;
            let row = stmt.query_row([id], map_message_row).optional()?;
            Ok(row)
        })
    }

    /// Messages whose recipient contains `fragment` as a substring, newest
    /// first. SQLite LIKE, so matching is ASCII case-insensitive.
    pub fn search_messages(&self, fragment: &str) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "{} WHERE m.recipient LIKE '%' || ?1 || '%' ORDER BY m.created_at DESC",
                MESSAGE_SELECT
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([fragment], map_message_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Create a message, lazily inserting its song first. Both writes run in
    /// one transaction: either the message lands referencing an existing song
    /// or nothing is committed. A song row that already exists is left
    /// untouched — the stored metadata wins over whatever the caller sent.
    pub fn create_message(&self, recipient: &str, message: &str, song: &Song) -> Result<MessageRow> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let stored = query_song(&tx, &song.id)?;
            let stored = match stored {
                Some(existing) => existing,
                None => {
                    tx.execute(
                        "INSERT INTO songs (id, title, artist, album_cover, uri, preview_url)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                        rusqlite::params![
                            song.id,
                            song.title,
                            song.artist,
                            song.album_cover,
                            song.uri,
                            song.preview_url,
                        ],
                    )?;
                    song.clone()
                }
            };

            let message_id = Uuid::new_v4().to_string();
            let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

            tx.execute(
                "INSERT INTO messages (id, recipient, message, song_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![message_id, recipient, message, stored.id, created_at],
            )?;

            tx.commit()?;

            Ok(MessageRow {
                id: message_id,
                recipient: recipient.to_string(),
                message: message.to_string(),
                created_at,
                song_id: stored.id,
                title: stored.title,
                artist: stored.artist,
                album_cover: stored.album_cover,
                uri: stored.uri,
                preview_url: stored.preview_url,
            })
        })
    }
}

fn query_song(conn: &Connection, id: &str) -> Result<Option<Song>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, artist, album_cover, uri, preview_url FROM songs WHERE id = ?1",
    )?;

    let row = stmt
        .query_row([id], |row| {
            Ok(Song {
                id: row.get(0)?,
                title: row.get(1)?,
                artist: row.get(2)?,
                album_cover: row.get(3)?,
                uri: row.get(4)?,
                preview_url: row.get(5)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn map_message_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get(0)?,
        recipient: row.get(1)?,
        message: row.get(2)?,
        created_at: row.get(3)?,
        song_id: row.get(4)?,
        title: row.get(5)?,
        artist: row.get(6)?,
        album_cover: row.get(7)?,
        uri: row.get(8)?,
        preview_url: row.get(9)?,
    })
}
