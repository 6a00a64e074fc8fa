//! Playback Events
//!
//! Event-based communication for UI synchronization. The controller queues
//! events as it changes state; the UI drains them with
//! [`PlaybackController::drain_events`](crate::PlaybackController::drain_events).

use crate::types::{PlayerStatus, RepeatMode, TrackId};
use serde::{Deserialize, Serialize};

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Derived player status changed
    StateChanged {
        state: PlayerStatus,
    },

    /// Current track changed
    TrackChanged {
        /// New current track (None when the queue became empty)
        track_id: Option<TrackId>,
        previous_track_id: Option<TrackId>,
    },

    /// Position moved (device update or seek)
    PositionChanged {
        position_secs: f64,
        duration_secs: f64,
    },

    /// Duration of the current track became known
    DurationChanged {
        duration_secs: f64,
    },

    VolumeChanged {
        volume: f32,
    },

    ShuffleChanged {
        enabled: bool,
    },

    RepeatChanged {
        mode: RepeatMode,
    },

    /// Tracks added or removed
    QueueChanged {
        length: usize,
    },

    /// Device rejected playback of the current track
    PlaybackStartFailed {
        track_id: TrackId,
        reason: String,
    },
}
