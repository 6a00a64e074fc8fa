//! Platform-agnostic playback device seam
//!
//! The device decodes and outputs audio; the controller only issues commands
//! and reacts to the events the device sends back. Platform code implements
//! [`Device`] (a browser audio element bridge, a desktop output stream, or the
//! simulated device used by the terminal player).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scope of one "current track"
///
/// A new session starts every time the controller enters a track. Events and
/// play completions carry the session they belong to, so anything tagged with
/// an older session is stale and gets ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Identifies a single play command
///
/// `attempt` increases with every play command, so a late completion for an
/// earlier attempt in the same session is also recognised as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayRequest {
    pub session: SessionId,
    pub attempt: u64,
}

/// Event reported by the device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceEvent {
    /// Session the event was produced for
    pub session: SessionId,
    pub kind: DeviceEventKind,
}

impl DeviceEvent {
    pub fn new(session: SessionId, kind: DeviceEventKind) -> Self {
        Self { session, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeviceEventKind {
    /// Playback position moved (seconds)
    PositionChanged(f64),

    /// Metadata loaded; carries the track duration in seconds
    MetadataReady(f64),

    /// Track played through to the end
    Ended,

    /// A play command completed
    PlayResolved {
        request: PlayRequest,
        /// `Err` holds the device's reason for rejecting playback
        outcome: std::result::Result<(), String>,
    },
}

/// Event subscription held for the lifetime of the current track
///
/// Dropping the guard releases the subscription. The controller keeps exactly
/// one of these, so leaving a track on any path releases it.
pub struct Subscription {
    session: SessionId,
    release: Option<Box<dyn FnOnce(SessionId) + Send>>,
}

impl Subscription {
    /// Subscription that runs `release` when dropped
    pub fn new(session: SessionId, release: impl FnOnce(SessionId) + Send + 'static) -> Self {
        Self {
            session,
            release: Some(Box::new(release)),
        }
    }

    /// Subscription with nothing to release
    pub fn detached(session: SessionId) -> Self {
        Self {
            session,
            release: None,
        }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release(self.session);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("session", &self.session)
            .field("releases", &self.release.is_some())
            .finish()
    }
}

/// Playback device
///
/// Commands are fire-and-forget. `play` completes asynchronously: the device
/// must eventually deliver a [`DeviceEventKind::PlayResolved`] for the request.
pub trait Device: Send {
    /// Load a source, replacing whatever was loaded
    fn load(&mut self, source: &str);

    /// Start or resume playback of the loaded source
    fn play(&mut self, request: PlayRequest);

    /// Pause playback, keeping position
    fn pause(&mut self);

    /// Move playback position (seconds)
    fn set_position(&mut self, seconds: f64);

    /// Set output volume (`0.0..=1.0`)
    fn set_volume(&mut self, volume: f32);

    /// Start delivering events for `session`
    fn subscribe(&mut self, session: SessionId) -> Subscription;
}

/// Device that accepts every command and never emits events
///
/// Useful for hosts that only want queue and transport bookkeeping.
#[derive(Debug, Default)]
pub struct NullDevice;

impl Device for NullDevice {
    fn load(&mut self, _source: &str) {}

    fn play(&mut self, _request: PlayRequest) {}

    fn pause(&mut self) {}

    fn set_position(&mut self, _seconds: f64) {}

    fn set_volume(&mut self, _volume: f32) {}

    fn subscribe(&mut self, session: SessionId) -> Subscription {
        Subscription::detached(session)
    }
}
