//! UI intents as data
//!
//! Hosts that receive intents from several places (keyboard, remote control,
//! a UI thread) push [`PlayerCommand`]s onto one queue and apply them in order
//! with [`PlayerCommand::apply`], so the controller is only ever mutated from
//! one place.

use crate::controller::PlaybackController;
use crate::device::Device;
use crate::error::Result;
use crate::types::{NewTrack, RepeatMode, TrackId};
use serde::{Deserialize, Serialize};

/// Commands accepted by the controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerCommand {
    /// Toggle play/pause
    PlayPause,

    /// Start or resume playback
    Play,

    /// Pause playback
    Pause,

    /// Skip to next track
    Next,

    /// Previous track (or restart current)
    Previous,

    /// Seek to absolute position (seconds)
    Seek(f64),

    /// Seek relative to current position (seconds)
    SeekBy(f64),

    /// Set volume (0.0-1.0)
    SetVolume(f32),

    ToggleShuffle,

    CycleRepeat,

    SetRepeat(RepeatMode),

    /// Append tracks to queue
    Add(Vec<NewTrack>),

    /// Remove track from queue
    Remove(TrackId),

    /// Make track current and play it
    Select(TrackId),
}

impl PlayerCommand {
    /// Apply the command to a controller
    pub fn apply<D: Device>(self, controller: &mut PlaybackController<D>) -> Result<()> {
        match self {
            PlayerCommand::PlayPause => controller.play_pause(),
            PlayerCommand::Play => controller.play(),
            PlayerCommand::Pause => controller.pause(),
            PlayerCommand::Next => controller.next(),
            PlayerCommand::Previous => controller.prev(),
            PlayerCommand::Seek(seconds) => controller.seek_to(seconds),
            PlayerCommand::SeekBy(delta) => controller.seek_by(delta),
            PlayerCommand::SetVolume(volume) => controller.set_volume(volume),
            PlayerCommand::ToggleShuffle => controller.toggle_shuffle(),
            PlayerCommand::CycleRepeat => controller.cycle_repeat(),
            PlayerCommand::SetRepeat(mode) => controller.set_repeat(mode),
            PlayerCommand::Add(tracks) => {
                controller.add(tracks);
            }
            PlayerCommand::Remove(id) => {
                controller.remove(id);
            }
            PlayerCommand::Select(id) => return controller.select(id),
        }
        Ok(())
    }
}
