//! Soul Deck - Transport Control
//!
//! Platform-agnostic queue and transport management for Soul Deck.
//!
//! This crate provides:
//! - Track queue with stable ids (add/remove/select/filter)
//! - Transport control (play/pause, seek, volume)
//! - Shuffle (uniform random pick) and repeat modes (Off, All, One)
//! - Device event handling with stale-callback protection
//! - UI events and command dispatch
//!
//! # Architecture
//!
//! `soul-transport` never touches audio itself:
//! - No decoding, no output stream
//! - No UI framework
//! - No async runtime
//!
//! Audio output is provided by the platform through the [`Device`] trait. The
//! device sends events back tagged with the session of the track they belong
//! to; the controller drops anything from an older session.
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use soul_transport::{NewTrack, NullDevice, PlaybackConfig, PlaybackController, PlayerStatus};
//!
//! let mut controller = PlaybackController::new(NullDevice, PlaybackConfig::default());
//!
//! let ids = controller.add(vec![
//!     NewTrack::new("Song One", "Artist A", "/music/one.mp3"),
//!     NewTrack::new("Song Two", "Artist B", "/music/two.mp3"),
//! ]);
//!
//! controller.play_pause();
//! assert_eq!(controller.status(), PlayerStatus::Playing);
//!
//! controller.next();
//! assert_eq!(controller.current_track().map(|t| t.id), Some(ids[1]));
//!
//! controller.set_volume(1.5);
//! assert_eq!(controller.state().volume, 1.0);
//! ```
//!
//! # Example: Device Events
//!
//! ```rust
//! use soul_transport::{
//!     DeviceEvent, DeviceEventKind, NewTrack, NullDevice, PlaybackConfig, PlaybackController,
//! };
//!
//! let mut controller = PlaybackController::with_tracks(
//!     NullDevice,
//!     PlaybackConfig::default(),
//!     vec![NewTrack::new("Song", "Artist", "/music/song.mp3")],
//! );
//!
//! let session = controller.current_session().unwrap();
//! controller
//!     .handle_event(DeviceEvent::new(session, DeviceEventKind::MetadataReady(180.0)))
//!     .unwrap();
//!
//! controller.seek_to(500.0);
//! assert_eq!(controller.state().position_secs, 180.0);
//! ```

mod command;
mod controller;
mod device;
mod error;
mod events;
mod ids;
mod queue;
pub mod shuffle;
pub mod types;

// Public exports
pub use command::PlayerCommand;
pub use controller::PlaybackController;
pub use device::{
    Device, DeviceEvent, DeviceEventKind, NullDevice, PlayRequest, SessionId, Subscription,
};
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use ids::{IdGenerator, SequentialIds};
pub use queue::{Queue, Removed};
pub use types::{
    format_time, NewTrack, PlaybackConfig, PlaybackState, PlayerStatus, RepeatMode, Track,
    TrackId,
};
