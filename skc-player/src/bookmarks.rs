//! Saved playback positions ("bookmarks")
//!
//! Positions are kept in the durable key-value store under a single
//! `SavedPlayState` entry holding every `SaveState` as a JSON array. The
//! array is loaded into a map keyed by `MediaKey`; at most one state exists
//! per key and writing replaces it.
//!
//! A missing or unreadable entry means "no bookmarks". It is never a hard
//! failure, and the next write replaces a corrupt entry.

use crate::error::Result;
use crate::media::{Media, MediaCategory, MediaKey};
use crate::sonos_api::PlayerState;
use serde::{Deserialize, Serialize};
use skc_common::KeyValueStore;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Store entry holding all saved positions
pub const SAVED_PLAY_STATE_KEY: &str = "SavedPlayState";

/// Bookmarks older than one week are not offered
pub const BOOKMARK_MAX_AGE_MS: i64 = 604_800_000;

/// Remaining seconds under which the last track counts as finished
pub const COMPLETION_THRESHOLD_SECS: i64 = 60;

/// A saved playback position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveState {
    pub id: MediaKey,
    /// Snapshot of the media, resumed without re-resolution
    pub media: Media,
    pub track_no: u32,
    /// Seconds into `track_no`
    pub elapsed_time: u64,
    /// Capture time, milliseconds since the Unix epoch
    pub tstamp: i64,
    pub complete: bool,
}

impl SaveState {
    /// Placeholder written as soon as playback starts
    pub fn optimistic(media: &Media, now: i64) -> Self {
        Self {
            id: media.key(),
            media: media.clone(),
            track_no: 1,
            elapsed_time: 0,
            tstamp: now,
            complete: false,
        }
    }

    /// Position reported by the player
    pub fn confirmed(media: &Media, state: &PlayerState, now: i64) -> Self {
        Self {
            id: media.key(),
            media: media.clone(),
            track_no: state.track_no,
            elapsed_time: state.elapsed_time,
            tstamp: now,
            complete: is_complete(state),
        }
    }

    /// Whether the bookmark should be offered to resume `media`
    pub fn is_offerable_for(&self, media: &Media, now: i64) -> bool {
        media.category == MediaCategory::Audiobook
            && !self.complete
            && now - self.tstamp < BOOKMARK_MAX_AGE_MS
    }
}

/// Nothing queued after the current track and less than a minute left in it
pub fn is_complete(state: &PlayerState) -> bool {
    let remaining = state.current_track.duration as i64 - state.elapsed_time as i64;
    state.next_track.duration == 0 && remaining < COMPLETION_THRESHOLD_SECS
}

/// Saved positions on top of a key-value store
pub struct BookmarkStore {
    store: Arc<dyn KeyValueStore>,
    /// Entries older than this are evicted on write, `None` keeps everything
    retention_ms: Option<i64>,
    // Serializes read-modify-write cycles
    lock: Mutex<()>,
}

impl BookmarkStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            retention_ms: None,
            lock: Mutex::new(()),
        }
    }

    pub fn with_retention_ms(mut self, retention_ms: i64) -> Self {
        self.retention_ms = Some(retention_ms);
        self
    }

    /// Saved state for `key`, `None` when absent or unreadable
    pub fn get(&self, key: &MediaKey) -> Option<SaveState> {
        let _guard = self.lock.lock().ok()?;
        self.load().remove(key)
    }

    /// All saved states, oldest first
    pub fn all(&self) -> Vec<SaveState> {
        let Ok(_guard) = self.lock.lock() else {
            return Vec::new();
        };
        sorted(self.load().into_values().collect())
    }

    /// Create or replace the state for `state.id`, evicting stale entries
    pub fn put(&self, state: SaveState, now: i64) -> Result<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| skc_common::Error::Internal("bookmark lock poisoned".to_string()))?;

        let mut states = self.load();
        let evicted = self.evict_stale(&mut states, now, Some(&state.id));

        debug!(
            key = %state.id,
            track_no = state.track_no,
            elapsed_time = state.elapsed_time,
            complete = state.complete,
            "Saving play state"
        );
        states.insert(state.id.clone(), state);
        self.save(states)?;

        if evicted > 0 {
            info!(evicted, "Evicted stale bookmarks");
        }
        Ok(())
    }

    /// Remove entries past the retention period, returning how many were removed
    pub fn prune(&self, now: i64) -> Result<usize> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| skc_common::Error::Internal("bookmark lock poisoned".to_string()))?;

        let mut states = self.load();
        let evicted = self.evict_stale(&mut states, now, None);
        if evicted > 0 {
            self.save(states)?;
        }
        Ok(evicted)
    }

    fn evict_stale(
        &self,
        states: &mut HashMap<MediaKey, SaveState>,
        now: i64,
        keep: Option<&MediaKey>,
    ) -> usize {
        let Some(retention_ms) = self.retention_ms else {
            return 0;
        };

        let before = states.len();
        states.retain(|key, state| Some(key) == keep || now - state.tstamp <= retention_ms);
        before - states.len()
    }

    fn load(&self) -> HashMap<MediaKey, SaveState> {
        let text = match self.store.get(SAVED_PLAY_STATE_KEY) {
            Ok(Some(text)) => text,
            Ok(None) => return HashMap::new(),
            Err(e) => {
                warn!("Failed to read saved play state: {}", e);
                return HashMap::new();
            }
        };

        match serde_json::from_str::<Vec<SaveState>>(&text) {
            Ok(states) => states.into_iter().map(|s| (s.id.clone(), s)).collect(),
            Err(e) => {
                warn!("Saved play state is corrupt, ignoring it: {}", e);
                HashMap::new()
            }
        }
    }

    fn save(&self, states: HashMap<MediaKey, SaveState>) -> Result<()> {
        let text = serde_json::to_string(&sorted(states.into_values().collect()))?;
        self.store.set(SAVED_PLAY_STATE_KEY, &text)?;
        Ok(())
    }
}

fn sorted(mut states: Vec<SaveState>) -> Vec<SaveState> {
    states.sort_by(|a, b| a.tstamp.cmp(&b.tstamp).then_with(|| a.id.cmp(&b.id)));
    states
}
