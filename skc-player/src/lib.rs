//! skc-player library - player control client
//!
//! Turns media descriptors into commands for a networked audio player's HTTP
//! API, caches the player configuration for the process lifetime and keeps
//! resumable playback positions for audiobooks.

pub mod bookmarks;
pub mod commands;
pub mod config_cache;
pub mod dispatcher;
pub mod error;
pub mod media;
pub mod service;
pub mod session;
pub mod sonos_api;

pub use bookmarks::{BookmarkStore, SaveState};
pub use commands::PlayerCmd;
pub use config_cache::ConfigCache;
pub use dispatcher::CommandDispatcher;
pub use error::{PlayerError, Result};
pub use media::{Media, MediaCategory, MediaKey, MediaType};
pub use service::PlayerService;
pub use session::PlayerSession;
pub use sonos_api::{PlayerConfig, PlayerState, TtsConfig};
