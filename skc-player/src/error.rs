//! Error types for skc-player
//!
//! Every failure of the player client is surfaced as a `PlayerError`; nothing
//! is silently dropped. Sequential protocols (resume) stop at the first
//! failing step and report which step it was.

use crate::media::MediaType;
use std::fmt;
use thiserror::Error;

/// Step of the resume protocol (play, then track seek, then time seek)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeStep {
    Play,
    TrackSeek,
    TimeSeek,
}

impl fmt::Display for ResumeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResumeStep::Play => "play",
            ResumeStep::TrackSeek => "track seek",
            ResumeStep::TimeSeek => "time seek",
        };
        f.write_str(name)
    }
}

/// Main error type for skc-player
#[derive(Error, Debug)]
pub enum PlayerError {
    /// Player configuration could not be fetched (cached for the process lifetime)
    #[error("Player configuration unavailable: {0}")]
    ConfigUnavailable(String),

    /// Player configuration lists no room to address
    #[error("Player configuration has no rooms")]
    NoRooms,

    /// Network or protocol failure talking to an HTTP endpoint
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// Response payload could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Media descriptor lacks the identifier its source needs
    #[error("{media_type} media '{title}' has no id")]
    MissingMediaId { media_type: MediaType, title: String },

    /// No saved position exists for the media
    #[error("No bookmark for '{0}'")]
    NoBookmark(String),

    /// Resume protocol stopped at a step
    #[error("Resume failed at {step}: {source}")]
    Resume {
        step: ResumeStep,
        #[source]
        source: Box<PlayerError>,
    },

    /// Persisted state store failure
    #[error("Store error: {0}")]
    Store(#[from] skc_common::Error),

    /// Persisted state encoding failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience Result type using PlayerError
pub type Result<T> = std::result::Result<T, PlayerError>;

impl PlayerError {
    pub(crate) fn at_step(self, step: ResumeStep) -> Self {
        PlayerError::Resume {
            step,
            source: Box::new(self),
        }
    }
}
