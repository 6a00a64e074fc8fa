//! Simulated playback device
//!
//! Stands in for a real audio output: it "plays" any source whose extension
//! is supported, advancing position on every [`SimulatedDevice::tick`].
//! Events are sent over a tokio channel and only for the subscribed session.

use crate::config::SimulatorSettings;
use soul_transport::{Device, DeviceEvent, DeviceEventKind, PlayRequest, SessionId, Subscription};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, trace};

/// No subscription (sessions start at 1)
const NO_SESSION: u64 = 0;

pub struct SimulatedDevice {
    settings: SimulatorSettings,
    events: UnboundedSender<DeviceEvent>,
    subscribed: Arc<AtomicU64>,
    loaded: Option<String>,
    playing: bool,
    position_secs: f64,
    duration_secs: f64,
    volume: f32,
}

impl SimulatedDevice {
    pub fn new(settings: SimulatorSettings, events: UnboundedSender<DeviceEvent>) -> Self {
        Self {
            settings,
            events,
            subscribed: Arc::new(AtomicU64::new(NO_SESSION)),
            loaded: None,
            playing: false,
            position_secs: 0.0,
            duration_secs: 0.0,
            volume: 1.0,
        }
    }

    /// Advance simulated playback by `elapsed`
    ///
    /// Reports the new position, and `Ended` once the track runs out.
    pub fn tick(&mut self, elapsed: Duration) {
        if !self.playing || self.loaded.is_none() {
            return;
        }

        self.position_secs += elapsed.as_secs_f64();

        if self.position_secs >= self.duration_secs {
            self.position_secs = self.duration_secs;
            self.playing = false;
            self.send(DeviceEventKind::PositionChanged(self.position_secs));
            self.send(DeviceEventKind::Ended);
        } else {
            self.send(DeviceEventKind::PositionChanged(self.position_secs));
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn position_secs(&self) -> f64 {
        self.position_secs
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn loaded(&self) -> Option<&str> {
        self.loaded.as_deref()
    }

    /// Session currently receiving events
    pub fn subscribed_session(&self) -> Option<SessionId> {
        match self.subscribed.load(Ordering::SeqCst) {
            NO_SESSION => None,
            id => Some(SessionId(id)),
        }
    }

    fn send(&self, kind: DeviceEventKind) {
        let Some(session) = self.subscribed_session() else {
            trace!("No subscriber, dropping {:?}", kind);
            return;
        };
        self.send_for(session, kind);
    }

    fn send_for(&self, session: SessionId, kind: DeviceEventKind) {
        if self.subscribed_session() != Some(session) {
            trace!("{} is not subscribed, dropping {:?}", session, kind);
            return;
        }
        if self.events.send(DeviceEvent::new(session, kind)).is_err() {
            debug!("Device event receiver closed");
        }
    }
}

impl Device for SimulatedDevice {
    fn load(&mut self, source: &str) {
        debug!("Loading {}", source);
        self.loaded = Some(source.to_string());
        self.playing = false;
        self.position_secs = 0.0;
        self.duration_secs = self.settings.track_secs;

        if self.settings.supports(source) {
            self.send(DeviceEventKind::MetadataReady(self.duration_secs));
        }
    }

    fn play(&mut self, request: PlayRequest) {
        let outcome = match self.loaded.as_deref() {
            None => Err("nothing loaded".to_string()),
            Some(source) if !self.settings.supports(source) => {
                Err(format!("unsupported format: {}", source))
            }
            Some(_) => Ok(()),
        };

        if outcome.is_ok() && self.position_secs >= self.duration_secs {
            // Playing an ended source starts it over
            self.position_secs = 0.0;
        }
        self.playing = outcome.is_ok();
        self.send_for(request.session, DeviceEventKind::PlayResolved { request, outcome });
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn set_position(&mut self, seconds: f64) {
        self.position_secs = seconds.clamp(0.0, self.duration_secs);
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn subscribe(&mut self, session: SessionId) -> Subscription {
        self.subscribed.store(session.0, Ordering::SeqCst);
        let subscribed = Arc::clone(&self.subscribed);
        Subscription::new(session, move |session| {
            // A newer subscription may already have replaced this one
            let _ = subscribed.compare_exchange(
                session.0,
                NO_SESSION,
                Ordering::SeqCst,
                Ordering::SeqCst,
            );
        })
    }
}
