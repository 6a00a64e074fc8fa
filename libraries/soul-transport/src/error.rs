//! Error types for transport control

use crate::types::TrackId;
use thiserror::Error;

/// Transport errors
///
/// None of these are fatal: the controller stays usable after every one of
/// them and waits for the next user intent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// No track with this id is in the queue
    #[error("Track not found: {0}")]
    NotFound(TrackId),

    /// The device rejected a play command for the current track
    #[error("Playback failed to start for track {track_id}: {reason}")]
    PlaybackStartFailed {
        /// Track the failed play command targeted
        track_id: TrackId,
        /// Device supplied reason
        reason: String,
    },
}

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
