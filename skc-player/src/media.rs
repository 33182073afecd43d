//! Media descriptors as handed over by the presentation layer

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source a media item is played from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Library,
    Spotify,
    AppleMusic,
    AmazonMusic,
    TuneIn,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Library => "library",
            MediaType::Spotify => "spotify",
            MediaType::AppleMusic => "applemusic",
            MediaType::AmazonMusic => "amazonmusic",
            MediaType::TuneIn => "tunein",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "library" => Ok(MediaType::Library),
            "spotify" => Ok(MediaType::Spotify),
            "applemusic" => Ok(MediaType::AppleMusic),
            "amazonmusic" => Ok(MediaType::AmazonMusic),
            "tunein" => Ok(MediaType::TuneIn),
            other => Err(format!("unknown media type '{}'", other)),
        }
    }
}

/// Media category
///
/// Unknown categories are kept verbatim so persisted snapshots round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MediaCategory {
    #[default]
    Album,
    Playlist,
    Audiobook,
    Station,
    Other(String),
}

impl From<String> for MediaCategory {
    fn from(value: String) -> Self {
        match value.as_str() {
            "album" => MediaCategory::Album,
            "playlist" => MediaCategory::Playlist,
            "audiobook" => MediaCategory::Audiobook,
            "station" => MediaCategory::Station,
            _ => MediaCategory::Other(value),
        }
    }
}

impl From<MediaCategory> for String {
    fn from(value: MediaCategory) -> Self {
        match value {
            MediaCategory::Album => "album".to_string(),
            MediaCategory::Playlist => "playlist".to_string(),
            MediaCategory::Audiobook => "audiobook".to_string(),
            MediaCategory::Station => "station".to_string(),
            MediaCategory::Other(other) => other,
        }
    }
}

impl fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from(self.clone()))
    }
}

/// A playable unit (album, playlist, audiobook, station)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
    /// Source-specific identifier, absent for library items keyed by title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub artist: String,
    pub title: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    #[serde(default)]
    pub category: MediaCategory,
}

impl Media {
    pub fn new(media_type: MediaType, category: MediaCategory, artist: &str, title: &str) -> Self {
        Self {
            id: None,
            artist: artist.to_string(),
            title: title.to_string(),
            media_type,
            category,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Identifier if present and non-empty
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Identity used to key saved playback state
    pub fn key(&self) -> MediaKey {
        MediaKey {
            id: self.id.clone(),
            artist: self.artist.clone(),
            title: self.title.clone(),
        }
    }
}

/// Persistence identity of a media item: (id, artist, title)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MediaKey {
    pub id: Option<String>,
    pub artist: String,
    pub title: String,
}

impl fmt::Display for MediaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{} - {} [{}]", self.artist, self.title, id),
            None => write!(f, "{} - {}", self.artist, self.title),
        }
    }
}
