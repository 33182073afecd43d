//! Player command paths
//!
//! Maps media descriptors and transport actions to the relative paths the
//! player HTTP API understands. Every source has its own addressing quirks
//! (Spotify's playlist URIs, library items keyed by title, a metadata search
//! when a Spotify album has no id); they all live here.

use crate::error::{PlayerError, Result};
use crate::media::{Media, MediaCategory, MediaType};
use crate::sonos_api::TtsConfig;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt;

/// Language used for announcements when none is configured
pub const DEFAULT_TTS_LANGUAGE: &str = "de-de";

/// Characters left unescaped in a URI component: `A-Z a-z 0-9 - _ . ! ~ * ' ( )`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a single path component
pub fn encode_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

/// Atomic transport commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCmd {
    Play,
    Pause,
    PlayPause,
    Previous,
    Next,
    VolumeUp,
    VolumeDown,
    ClearQueue,
}

impl PlayerCmd {
    pub fn path(&self) -> &'static str {
        match self {
            PlayerCmd::Play => "play",
            PlayerCmd::Pause => "pause",
            PlayerCmd::PlayPause => "playpause",
            PlayerCmd::Previous => "previous",
            PlayerCmd::Next => "next",
            PlayerCmd::VolumeUp => "volume/+5",
            PlayerCmd::VolumeDown => "volume/-5",
            PlayerCmd::ClearQueue => "clearqueue",
        }
    }
}

impl fmt::Display for PlayerCmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

fn required_id(media: &Media) -> Result<String> {
    media
        .id()
        .map(encode_component)
        .ok_or_else(|| PlayerError::MissingMediaId {
            media_type: media.media_type,
            title: media.title.clone(),
        })
}

/// Path that starts playback of `media` right now
pub fn build_play_path(media: &Media) -> Result<String> {
    let playlist = media.category == MediaCategory::Playlist;

    let path = match media.media_type {
        MediaType::AppleMusic if playlist => format!("applemusic/now/playlist:{}", required_id(media)?),
        MediaType::AppleMusic => format!("applemusic/now/album:{}", required_id(media)?),
        MediaType::AmazonMusic if playlist => format!("amazonmusic/now/playlist:{}", required_id(media)?),
        MediaType::AmazonMusic => format!("amazonmusic/now/album:{}", required_id(media)?),
        MediaType::Library => {
            // Library items without an id are addressed by title
            let id = encode_component(media.id().unwrap_or(&media.title));
            if playlist {
                format!("playlist/{}", id)
            } else {
                format!("musicsearch/library/album/{}", id)
            }
        }
        MediaType::Spotify if playlist => format!(
            "spotify/now/spotify:user:spotify:playlist:{}",
            required_id(media)?
        ),
        MediaType::Spotify => match media.id() {
            Some(id) => format!("spotify/now/spotify:album:{}", encode_component(id)),
            None => format!(
                "musicsearch/spotify/album/artist:\"{}\" album:\"{}\"",
                encode_component(&media.artist),
                encode_component(&media.title)
            ),
        },
        MediaType::TuneIn => format!("tunein/play/{}", required_id(media)?),
    };

    Ok(path)
}

/// Path that speaks `text` on the player
pub fn build_say_path(text: &str, tts: Option<&TtsConfig>) -> String {
    let language = tts
        .and_then(|t| t.language.as_deref())
        .filter(|l| !l.is_empty())
        .unwrap_or(DEFAULT_TTS_LANGUAGE);

    let mut path = format!("say/{}/{}", encode_component(text), language);

    if let Some(volume) = tts.and_then(|t| t.volume.as_deref()).filter(|v| !v.is_empty()) {
        path.push('/');
        path.push_str(volume);
    }

    path
}

pub fn build_trackseek_path(track_no: u32) -> String {
    format!("trackseek/{}", track_no)
}

pub fn build_timeseek_path(seconds: u64) -> String {
    format!("timeseek/{}", seconds)
}
