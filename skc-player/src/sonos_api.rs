//! Payloads exchanged with the player HTTP API
//!
//! `PlayerConfig` comes from the `/sonos` configuration endpoint and
//! `PlayerState` from the player's `state` command. Only the fields this client
//! consumes are modelled; everything else in the responses is ignored.

use crate::error::{PlayerError, Result};
use serde::{Deserialize, Deserializer, Serialize};

/// Player server connection descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub server: String,
    #[serde(deserialize_with = "de_port")]
    pub port: u16,
    pub rooms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tts: Option<TtsConfig>,
}

/// Text-to-speech settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TtsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text", skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            language: None,
            volume: None,
        }
    }
}

fn default_true() -> bool {
    true
}

impl PlayerConfig {
    /// Room commands are addressed to; only the first configured room is used
    pub fn room(&self) -> Result<&str> {
        self.rooms.first().map(String::as_str).ok_or(PlayerError::NoRooms)
    }

    /// `http://{server}:{port}/{room}/`
    pub fn base_url(&self) -> Result<String> {
        Ok(format!("http://{}:{}/{}/", self.server, self.port, self.room()?))
    }

    /// Whether announcements should be spoken (no `tts` section means enabled)
    pub fn tts_enabled(&self) -> bool {
        self.tts.as_ref().map_or(true, |tts| tts.enabled)
    }
}

/// Snapshot of current playback as reported by the player
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    /// 1-based queue position; a player that omits it is on the first track
    #[serde(default = "first_track")]
    pub track_no: u32,
    /// Seconds into the current track
    #[serde(default)]
    pub elapsed_time: u64,
    #[serde(default)]
    pub current_track: TrackInfo,
    #[serde(default)]
    pub next_track: TrackInfo,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            track_no: first_track(),
            elapsed_time: 0,
            current_track: TrackInfo::default(),
            next_track: TrackInfo::default(),
        }
    }
}

fn first_track() -> u32 {
    1
}

/// Track entry of a `PlayerState`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TrackInfo {
    /// Seconds, zero when nothing is queued
    #[serde(default)]
    pub duration: u64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(u64),
    Text(String),
}

// The backend's config file stores the port as a string
fn de_port<'de, D>(deserializer: D) -> std::result::Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => u16::try_from(n).map_err(D::Error::custom),
        NumberOrText::Text(s) => s.trim().parse().map_err(D::Error::custom),
    }
}

fn de_opt_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<NumberOrText>::deserialize(deserializer)?.map(|v| match v {
        NumberOrText::Number(n) => n.to_string(),
        NumberOrText::Text(s) => s,
    }))
}
