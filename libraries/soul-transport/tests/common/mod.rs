//! Shared test helpers: a device that records every command it receives

#![allow(dead_code)]

use soul_transport::{
    Device, DeviceEvent, DeviceEventKind, NewTrack, PlayRequest, PlaybackConfig,
    PlaybackController, Queue, SequentialIds, SessionId, Subscription,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};

/// Command observed by the recording device
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    Load(String),
    Play(PlayRequest),
    Pause,
    SetPosition(f64),
    SetVolume(f32),
    Subscribe(SessionId),
    Unsubscribe(SessionId),
}

/// Mock device
///
/// Records calls into a shared log so tests can inspect them while the
/// controller owns the device.
#[derive(Debug, Clone, Default)]
pub struct RecordingDevice {
    log: Arc<Mutex<Vec<DeviceCall>>>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<DeviceCall> {
        self.log.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.log.lock().unwrap().clear();
    }

    /// Most recent play request, if any
    pub fn last_play(&self) -> Option<PlayRequest> {
        self.calls().iter().rev().find_map(|call| match call {
            DeviceCall::Play(request) => Some(*request),
            _ => None,
        })
    }

    /// Sessions subscribed and not yet released
    pub fn live_subscriptions(&self) -> Vec<SessionId> {
        let mut live = Vec::new();
        for call in self.calls() {
            match call {
                DeviceCall::Subscribe(session) => live.push(session),
                DeviceCall::Unsubscribe(session) => live.retain(|s| *s != session),
                _ => {}
            }
        }
        live
    }

    fn record(&self, call: DeviceCall) {
        self.log.lock().unwrap().push(call);
    }
}

impl Device for RecordingDevice {
    fn load(&mut self, source: &str) {
        self.record(DeviceCall::Load(source.to_string()));
    }

    fn play(&mut self, request: PlayRequest) {
        self.record(DeviceCall::Play(request));
    }

    fn pause(&mut self) {
        self.record(DeviceCall::Pause);
    }

    fn set_position(&mut self, seconds: f64) {
        self.record(DeviceCall::SetPosition(seconds));
    }

    fn set_volume(&mut self, volume: f32) {
        self.record(DeviceCall::SetVolume(volume));
    }

    fn subscribe(&mut self, session: SessionId) -> Subscription {
        self.record(DeviceCall::Subscribe(session));
        let log = Arc::clone(&self.log);
        Subscription::new(session, move |session| {
            log.lock().unwrap().push(DeviceCall::Unsubscribe(session));
        })
    }
}

pub fn track(title: &str) -> NewTrack {
    NewTrack::new(
        title,
        format!("{} Artist", title),
        format!("/music/{}.mp3", title.to_lowercase()),
    )
}

pub fn tracks(titles: &[&str]) -> Vec<NewTrack> {
    titles.iter().map(|t| track(t)).collect()
}

/// Controller over a recording device with a fixed shuffle seed
pub fn controller(titles: &[&str]) -> (PlaybackController<RecordingDevice>, RecordingDevice) {
    controller_with_config(titles, PlaybackConfig::default())
}

pub fn controller_with_config(
    titles: &[&str],
    config: PlaybackConfig,
) -> (PlaybackController<RecordingDevice>, RecordingDevice) {
    let device = RecordingDevice::new();
    let queue = Queue::with_tracks(
        tracks(titles),
        Box::new(SequentialIds::starting_at(config.first_track_id)),
    );
    let controller =
        PlaybackController::from_parts(device.clone(), config, queue, StdRng::seed_from_u64(7));
    (controller, device)
}

/// Event for the controller's current session
pub fn current_event(
    controller: &PlaybackController<RecordingDevice>,
    kind: DeviceEventKind,
) -> DeviceEvent {
    DeviceEvent::new(controller.current_session().expect("no current session"), kind)
}
