//! Player session
//!
//! The flow around a "now playing" view: entering it clears the queue, waits
//! for the player to settle and then plays (or resumes) the media; leaving it
//! saves the position and pauses. Pausing from within the session saves the
//! position too.

use crate::bookmarks::SaveState;
use crate::commands::PlayerCmd;
use crate::error::Result;
use crate::media::Media;
use crate::service::PlayerService;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Default wait between clearing the queue and starting playback
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(1000);

pub struct PlayerSession {
    service: Arc<PlayerService>,
    media: Media,
    from_bookmark: bool,
    settle_delay: Duration,
    playing: bool,
}

impl PlayerSession {
    pub fn new(service: Arc<PlayerService>, media: Media) -> Self {
        Self {
            service,
            media,
            from_bookmark: false,
            settle_delay: DEFAULT_SETTLE_DELAY,
            playing: false,
        }
    }

    /// Resume from the saved position instead of starting over
    pub fn from_bookmark(mut self, from_bookmark: bool) -> Self {
        self.from_bookmark = from_bookmark;
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn media(&self) -> &Media {
        &self.media
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Clear the queue, let the player settle, then play or resume
    pub async fn enter(&mut self) -> Result<()> {
        if let Err(e) = self.service.send_cmd(PlayerCmd::ClearQueue).await {
            // Playback replaces the queue anyway
            warn!("Clearing the queue failed, playing regardless: {}", e);
        }

        tokio::time::sleep(self.settle_delay).await;

        if self.from_bookmark {
            self.service.load_play_state(&self.media).await?;
        } else {
            self.service.play(&self.media).await?;
        }

        self.playing = true;
        Ok(())
    }

    /// Save the position and pause
    pub async fn leave(&mut self) -> Result<SaveState> {
        info!(title = %self.media.title, "Leaving player session");

        let (saved, paused) = tokio::join!(
            self.service.save_play_state(&self.media),
            self.service.send_cmd(PlayerCmd::Pause)
        );

        self.playing = false;
        paused?;
        saved
    }

    /// Pause (saving the position) or continue playback, returning the new playing flag
    pub async fn toggle_play_pause(&mut self) -> Result<bool> {
        if self.playing {
            let (saved, paused) = tokio::join!(
                self.service.save_play_state(&self.media),
                self.service.send_cmd(PlayerCmd::Pause)
            );
            self.playing = false;
            saved?;
            paused?;
        } else {
            self.service.send_cmd(PlayerCmd::Play).await?;
            self.playing = true;
        }

        Ok(self.playing)
    }

    pub async fn volume_up(&self) -> Result<()> {
        self.service.send_cmd(PlayerCmd::VolumeUp).await
    }

    pub async fn volume_down(&self) -> Result<()> {
        self.service.send_cmd(PlayerCmd::VolumeDown).await
    }

    pub async fn skip_previous(&self) -> Result<()> {
        self.service.send_cmd(PlayerCmd::Previous).await
    }

    pub async fn skip_next(&self) -> Result<()> {
        self.service.send_cmd(PlayerCmd::Next).await
    }
}
