//! Core types for transport control

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable track identifier
///
/// Assigned by the queue when a track is added and never reused, even after
/// the track is removed. Identity is by id, never by queue position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub u64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Artist shown for tracks imported from local files
pub const IMPORTED_ARTIST: &str = "Local";

/// Track information held by the queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique identifier assigned by the queue
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Opaque handle the device can load and play
    pub source: String,

    /// Opaque handle to artwork (optional)
    pub cover: Option<String>,
}

/// Track that has not been assigned an id yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTrack {
    pub title: String,
    pub artist: String,
    pub source: String,
    pub cover: Option<String>,
}

impl NewTrack {
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            source: source.into(),
            cover: None,
        }
    }

    /// Track produced by the file import mechanism
    ///
    /// Imported files only carry a display name, so the display name becomes
    /// the title and the artist is [`IMPORTED_ARTIST`].
    pub fn imported(
        display_name: impl Into<String>,
        source: impl Into<String>,
        cover: Option<String>,
    ) -> Self {
        Self {
            title: display_name.into(),
            artist: IMPORTED_ARTIST.to_string(),
            source: source.into(),
            cover,
        }
    }

    pub(crate) fn into_track(self, id: TrackId) -> Track {
        Track {
            id,
            title: self.title,
            artist: self.artist,
            source: self.source,
            cover: self.cover,
        }
    }
}

/// Repeat mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop after the last track
    #[default]
    Off,

    /// Loop entire queue
    All,

    /// Loop current track only
    One,
}

impl RepeatMode {
    /// Next mode in the fixed `Off -> All -> One -> Off` cycle
    pub fn cycled(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }
}

/// Derived player status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerStatus {
    /// No current track
    Stopped,

    /// Currently playing
    Playing,

    /// Current track loaded but not playing
    Paused,
}

/// Transport state owned by the controller
///
/// The UI reads this for display; it never mutates it directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub is_playing: bool,

    /// Position in the current track, always >= 0
    pub position_secs: f64,

    /// Duration of the current track (0 = unknown)
    pub duration_secs: f64,

    /// Volume in `[0, 1]`
    pub volume: f32,

    pub shuffle: bool,

    pub repeat: RepeatMode,
}

impl PlaybackState {
    pub(crate) fn from_config(config: &PlaybackConfig) -> Self {
        Self {
            is_playing: false,
            position_secs: 0.0,
            duration_secs: 0.0,
            volume: clamp_volume(config.volume).unwrap_or(1.0),
            shuffle: config.shuffle,
            repeat: config.repeat,
        }
    }
}

/// Configuration for the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Initial volume (0.0-1.0, default: 1.0)
    pub volume: f32,

    /// Initial shuffle state (default: false)
    pub shuffle: bool,

    /// Initial repeat mode (default: Off)
    pub repeat: RepeatMode,

    /// Position past which "previous" restarts the current track (default: 3.0)
    pub restart_threshold_secs: f64,

    /// Step used by relative seeks from the UI (default: 5.0)
    pub seek_step_secs: f64,

    /// Exclude the current track when shuffle picks the next one (default: false)
    pub shuffle_avoids_current: bool,

    /// First id handed out by the queue's id generator (default: 1)
    pub first_track_id: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: 1.0,
            shuffle: false,
            repeat: RepeatMode::Off,
            restart_threshold_secs: 3.0,
            seek_step_secs: 5.0,
            shuffle_avoids_current: false,
            first_track_id: 1,
        }
    }
}

/// Clamp a volume into `[0, 1]`; NaN has no meaningful clamp and yields `None`
pub(crate) fn clamp_volume(volume: f32) -> Option<f32> {
    if volume.is_nan() {
        None
    } else {
        Some(volume.clamp(0.0, 1.0))
    }
}

/// Format seconds as `m:ss` for display
///
/// Non-finite and negative values render as `0:00`.
pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return "0:00".to_string();
    }
    let whole = secs.floor() as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}
