use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Catalog track metadata. The id is the external catalog's track identifier,
/// supplied by the caller — never generated here. A stored song is immutable:
/// the first writer's metadata wins for all later messages referencing the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: String,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub album_cover: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub preview_url: Option<String>,
}

/// A recipient-addressed note paired with exactly one song. Every read path
/// embeds the joined song; there is no bare-message representation on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub recipient: String,
    pub message: String,
    pub date: DateTime<Utc>,
    pub song: Song,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn song_uses_camel_case_on_the_wire() {
        let song = Song {
            id: "1".to_string(),
            title: "Always".to_string(),
            artist: "Bon Jovi".to_string(),
            album_cover: Some("cover.jpg".to_string()),
            uri: None,
            preview_url: None,
        };

        let json = serde_json::to_value(&song).unwrap();
        assert_eq!(json["albumCover"], "cover.jpg");
        assert!(json["previewUrl"].is_null());
        assert!(json.get("album_cover").is_none());
    }

    #[test]
    fn song_optional_fields_default_when_absent() {
        let song: Song =
            serde_json::from_str(r#"{"id":"9","title":"T","artist":"A"}"#).unwrap();
        assert!(song.album_cover.is_none());
        assert!(song.uri.is_none());
        assert!(song.preview_url.is_none());
    }
}
