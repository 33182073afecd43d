//! Player service
//!
//! The operations offered to the presentation layer: playing media,
//! transport commands, announcements, and saving/resuming playback
//! positions.
//!
//! # Resume protocol
//!
//! `load_play_state` plays the saved media snapshot, then seeks to the saved
//! track, then to the saved time. Each step starts only after the previous
//! one was acknowledged because the player cannot seek before the target
//! track is loaded. The first failing step ends the protocol.

use crate::bookmarks::{BookmarkStore, SaveState};
use crate::commands::{build_play_path, build_say_path, build_timeseek_path, build_trackseek_path, PlayerCmd};
use crate::config_cache::ConfigCache;
use crate::dispatcher::{build_http_client, CommandDispatcher};
use crate::error::{PlayerError, ResumeStep, Result};
use crate::media::Media;
use crate::sonos_api::{PlayerConfig, PlayerState};
use serde_json::Value;
use skc_common::config::TomlConfig;
use skc_common::time::{days_to_millis, millis_to_duration, now_millis};
use skc_common::JsonFileStore;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

pub struct PlayerService {
    dispatcher: CommandDispatcher,
    bookmarks: BookmarkStore,
}

impl PlayerService {
    pub fn new(dispatcher: CommandDispatcher, bookmarks: BookmarkStore) -> Self {
        Self {
            dispatcher,
            bookmarks,
        }
    }

    /// Wire up a service from bootstrap configuration
    ///
    /// Saved positions live in `data_folder`. A `[player]` section fixes the
    /// player address; otherwise it is fetched from `{api_base}/sonos`.
    pub fn from_bootstrap(config: &TomlConfig, data_folder: &Path) -> Result<Self> {
        let http = build_http_client(millis_to_duration(config.request_timeout_ms))?;

        let cache = match &config.player {
            Some(player) => ConfigCache::fixed(PlayerConfig {
                server: player.server.clone(),
                port: player.port,
                rooms: player.rooms.clone(),
                tts: None,
            }),
            None => ConfigCache::remote(http.clone(), &config.api_base),
        };

        let store = JsonFileStore::in_folder(data_folder)?;
        info!(path = %store.path().display(), "Saved play state store");

        let bookmarks = BookmarkStore::new(Arc::new(store))
            .with_retention_ms(days_to_millis(config.bookmark_retention_days));

        Ok(Self::new(CommandDispatcher::new(http, Arc::new(cache)), bookmarks))
    }

    pub fn bookmarks(&self) -> &BookmarkStore {
        &self.bookmarks
    }

    pub async fn get_config(&self) -> Result<Arc<PlayerConfig>> {
        self.dispatcher.get_config().await
    }

    pub async fn get_state(&self) -> Result<PlayerState> {
        self.dispatcher.get_state().await
    }

    pub async fn send_cmd(&self, cmd: PlayerCmd) -> Result<()> {
        debug!(cmd = %cmd, "Transport command");
        self.dispatcher.send_cmd(cmd).await
    }

    /// Start playback of `media` now
    pub async fn play(&self, media: &Media) -> Result<Value> {
        let path = build_play_path(media)?;
        info!(media_type = %media.media_type, title = %media.title, "Playing media");
        self.dispatcher.send_request(&path).await
    }

    /// Speak `text` on the player
    pub async fn say(&self, text: &str) -> Result<()> {
        let config = self.dispatcher.get_config().await?;
        let path = build_say_path(text, config.tts.as_ref());
        self.dispatcher.send_request(&path).await.map(|_| ())
    }

    /// Speak `text` unless announcements are switched off, returning whether it was sent
    pub async fn say_if_enabled(&self, text: &str) -> Result<bool> {
        let config = self.dispatcher.get_config().await?;
        if !config.tts_enabled() {
            debug!("Announcements disabled, not saying '{}'", text);
            return Ok(false);
        }
        self.say(text).await?;
        Ok(true)
    }

    pub async fn send_trackseek(&self, track_no: u32) -> Result<Value> {
        self.dispatcher.send_request(&build_trackseek_path(track_no)).await
    }

    pub async fn send_timeseek(&self, seconds: u64) -> Result<Value> {
        self.dispatcher.send_request(&build_timeseek_path(seconds)).await
    }

    pub fn get_saved_play_state(&self, media: &Media) -> Option<SaveState> {
        self.bookmarks.get(&media.key())
    }

    pub fn set_saved_play_state(&self, state: SaveState) -> Result<()> {
        self.bookmarks.put(state, now_millis())
    }

    /// Save the playback position of `media`
    ///
    /// A placeholder position (track 1, 0 s) is written before this returns.
    /// The returned future queries the player and overwrites it with the
    /// reported position and completion flag.
    pub fn save_play_state<'a>(
        &'a self,
        media: &Media,
    ) -> impl Future<Output = Result<SaveState>> + Send + 'a {
        let media = media.clone();
        let optimistic = self.set_saved_play_state(SaveState::optimistic(&media, now_millis()));

        async move {
            optimistic?;

            let state = self.dispatcher.get_state().await?;
            let confirmed = SaveState::confirmed(&media, &state, now_millis());
            self.set_saved_play_state(confirmed.clone())?;

            info!(
                title = %media.title,
                track_no = confirmed.track_no,
                elapsed_time = confirmed.elapsed_time,
                complete = confirmed.complete,
                "Play state saved"
            );
            Ok(confirmed)
        }
    }

    /// Resume `media` at its saved position
    ///
    /// The saved media snapshot is played, not the caller's instance.
    pub async fn load_play_state(&self, media: &Media) -> Result<SaveState> {
        let state = self
            .get_saved_play_state(media)
            .ok_or_else(|| PlayerError::NoBookmark(media.title.clone()))?;

        info!(
            title = %state.media.title,
            track_no = state.track_no,
            elapsed_time = state.elapsed_time,
            "Resuming from bookmark"
        );

        self.play(&state.media)
            .await
            .map_err(|e| e.at_step(ResumeStep::Play))?;
        self.send_trackseek(state.track_no)
            .await
            .map_err(|e| e.at_step(ResumeStep::TrackSeek))?;
        self.send_timeseek(state.elapsed_time)
            .await
            .map_err(|e| e.at_step(ResumeStep::TimeSeek))?;

        Ok(state)
    }

    /// Saved state of `media` if it should be offered for resuming
    pub fn get_saved_bookmark_if_offerable(&self, media: &Media) -> Option<SaveState> {
        self.get_saved_play_state(media)
            .filter(|state| state.is_offerable_for(media, now_millis()))
    }
}
