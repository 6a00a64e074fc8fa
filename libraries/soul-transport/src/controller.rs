//! Playback controller - core orchestration
//!
//! Owns the queue and the transport state, issues commands to the device, and
//! folds the device's asynchronous events back into state. All mutation goes
//! through `&mut self`, so hosts that share the controller across threads wrap
//! the whole controller (queue and state together) in one lock or feed it from
//! one command queue.

use crate::{
    device::{Device, DeviceEvent, DeviceEventKind, PlayRequest, SessionId, Subscription},
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    ids::SequentialIds,
    queue::Queue,
    shuffle::pick_random_index,
    types::{
        clamp_volume, NewTrack, PlaybackConfig, PlaybackState, PlayerStatus, RepeatMode, Track,
        TrackId,
    },
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};

/// Device subscription scoped to the current track
struct TrackSession {
    track_id: TrackId,
    subscription: Subscription,
}

impl TrackSession {
    fn id(&self) -> SessionId {
        self.subscription.session()
    }
}

/// Central transport control
///
/// Orchestrates:
/// - Queue management (add/remove/select/filter)
/// - Transport (play/pause/seek/volume)
/// - Track advancement (next/previous/track end, shuffle, repeat)
/// - Device event handling with stale-callback protection
pub struct PlaybackController<D: Device> {
    // State
    state: PlaybackState,
    last_status: PlayerStatus,
    config: PlaybackConfig,

    queue: Queue,

    // Device wiring
    device: D,
    session: Option<TrackSession>,
    session_counter: u64,
    pending_play: Option<PlayRequest>,
    attempt_counter: u64,

    rng: StdRng,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
}

impl<D: Device> PlaybackController<D> {
    /// Create controller with an empty queue
    pub fn new(device: D, config: PlaybackConfig) -> Self {
        Self::with_tracks(device, config, Vec::new())
    }

    /// Create controller with an initial set of tracks
    ///
    /// The first track (if any) is loaded but not played.
    pub fn with_tracks(device: D, config: PlaybackConfig, initial: Vec<NewTrack>) -> Self {
        let ids = SequentialIds::starting_at(config.first_track_id);
        let queue = Queue::with_tracks(initial, Box::new(ids));
        Self::from_parts(device, config, queue, StdRng::from_entropy())
    }

    /// Create controller from a prepared queue and random source
    pub fn from_parts(device: D, config: PlaybackConfig, queue: Queue, rng: StdRng) -> Self {
        let state = PlaybackState::from_config(&config);

        let mut controller = Self {
            state,
            last_status: PlayerStatus::Stopped,
            config,
            queue,
            device,
            session: None,
            session_counter: 0,
            pending_play: None,
            attempt_counter: 0,
            rng,
            pending_events: Vec::new(),
        };

        controller.device.set_volume(controller.state.volume);
        if let Some(index) = controller.queue.current_index() {
            controller.enter_track(index);
        }
        controller.publish_status();

        controller
    }

    /// Replace the random source used by shuffle
    #[must_use]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    // ===== Transport =====

    /// Toggle between playing and paused
    ///
    /// Without a current track the controller stays stopped.
    pub fn play_pause(&mut self) {
        if self.state.is_playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Start or resume playback of the current track
    pub fn play(&mut self) {
        if self.session.is_none() {
            debug!("Play ignored: no current track");
        } else if !self.state.is_playing {
            self.start_playback();
        }
        self.publish_status();
    }

    /// Pause playback, keeping position
    pub fn pause(&mut self) {
        if self.state.is_playing {
            self.stop_playback();
        }
        self.publish_status();
    }

    /// Seek to an absolute position
    ///
    /// The position is clamped to `[0, duration]`; with an unknown duration
    /// that range is just 0. NaN is ignored.
    pub fn seek_to(&mut self, seconds: f64) {
        if seconds.is_nan() {
            debug!("Seek ignored: position is NaN");
            return;
        }

        let target = seconds.clamp(0.0, self.state.duration_secs);
        self.state.position_secs = target;
        if self.session.is_some() {
            self.device.set_position(target);
        }
        self.emit_position();
    }

    /// Seek relative to the current position
    pub fn seek_by(&mut self, delta_secs: f64) {
        self.seek_to(self.state.position_secs + delta_secs);
    }

    /// Seek forward by the configured step
    pub fn seek_forward(&mut self) {
        self.seek_by(self.config.seek_step_secs);
    }

    /// Seek backward by the configured step
    pub fn seek_backward(&mut self) {
        self.seek_by(-self.config.seek_step_secs);
    }

    /// Skip to the next track and play it
    ///
    /// With shuffle on, the next track is drawn uniformly from the whole queue
    /// (the current track included unless `shuffle_avoids_current` is set).
    /// Otherwise the queue advances by one, wrapping to the start.
    pub fn next(&mut self) {
        let target = if self.state.shuffle {
            pick_random_index(
                self.queue.len(),
                self.queue.current_index(),
                self.config.shuffle_avoids_current,
                &mut self.rng,
            )
        } else {
            self.queue.next_index()
        };

        self.advance_to(target);
    }

    /// Go to the previous track
    ///
    /// Past the restart threshold this restarts the current track instead and
    /// leaves the playing flag alone.
    pub fn prev(&mut self) {
        if self.state.position_secs > self.config.restart_threshold_secs {
            debug!(
                "Restarting current track at {:.1}s instead of going back",
                self.state.position_secs
            );
            self.seek_to(0.0);
            return;
        }

        self.advance_to(self.queue.previous_index());
    }

    // ===== Modes =====

    pub fn toggle_shuffle(&mut self) {
        self.set_shuffle(!self.state.shuffle);
    }

    /// Enable or disable shuffle; the current track does not change
    pub fn set_shuffle(&mut self, enabled: bool) {
        if self.state.shuffle != enabled {
            self.state.shuffle = enabled;
            self.emit(PlaybackEvent::ShuffleChanged { enabled });
        }
    }

    /// Cycle repeat mode `Off -> All -> One -> Off`
    pub fn cycle_repeat(&mut self) {
        self.set_repeat(self.state.repeat.cycled());
    }

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        if self.state.repeat != mode {
            self.state.repeat = mode;
            self.emit(PlaybackEvent::RepeatChanged { mode });
        }
    }

    /// Set volume, clamped to `[0, 1]`, and forward it to the device
    ///
    /// NaN is ignored.
    pub fn set_volume(&mut self, volume: f32) {
        let Some(volume) = clamp_volume(volume) else {
            debug!("Volume ignored: value is NaN");
            return;
        };

        self.state.volume = volume;
        self.device.set_volume(volume);
        self.emit(PlaybackEvent::VolumeChanged { volume });
    }

    // ===== Queue =====

    /// Append tracks to the queue
    ///
    /// Adding to an empty queue loads the first new track without playing it.
    pub fn add(&mut self, tracks: Vec<NewTrack>) -> Vec<TrackId> {
        let was_empty = self.queue.is_empty();
        let added = self.queue.add(tracks);
        if added.is_empty() {
            return added;
        }

        debug!("Added {} track(s) to queue", added.len());
        if was_empty {
            if let Some(index) = self.queue.current_index() {
                self.enter_track(index);
            }
        }

        self.emit(PlaybackEvent::QueueChanged {
            length: self.queue.len(),
        });
        self.publish_status();
        added
    }

    /// Remove a track by id
    ///
    /// Absent ids are a no-op and return `None`. Removing the current track
    /// stops playback and resets to the first track (or to no track when the
    /// queue became empty).
    pub fn remove(&mut self, id: TrackId) -> Option<Track> {
        let Some(removed) = self.queue.remove(id) else {
            debug!("Remove ignored: track {} not in queue", id);
            return None;
        };

        if removed.was_current {
            debug!("Removed current track {}, resetting playback", id);
            self.stop_playback();
            match self.queue.current_index() {
                Some(index) => self.enter_track(index),
                None => self.clear_current(),
            }
        }

        self.emit(PlaybackEvent::QueueChanged {
            length: self.queue.len(),
        });
        self.publish_status();
        Some(removed.track)
    }

    /// Make a track current and play it
    ///
    /// Selecting the track that is already current just resumes it. Unknown ids
    /// return [`PlaybackError::NotFound`] and change nothing.
    pub fn select(&mut self, id: TrackId) -> Result<()> {
        let index = self.queue.select(id).ok_or(PlaybackError::NotFound(id))?;

        if self.queue.current_index() == Some(index) && self.session.is_some() {
            if !self.state.is_playing {
                self.start_playback();
            }
        } else {
            self.enter_track(index);
            self.start_playback();
        }

        self.publish_status();
        Ok(())
    }

    /// Case-insensitive search over title and artist
    pub fn filter(&self, query: &str) -> Vec<&Track> {
        self.queue.filter(query)
    }

    // ===== Device events =====

    /// Apply an event reported by the device
    ///
    /// Events for any session other than the current one are stale and
    /// dropped. A play failure for the current request is the only error.
    pub fn handle_event(&mut self, event: DeviceEvent) -> Result<()> {
        if self.current_session() != Some(event.session) {
            debug!(
                "Dropping stale device event for {} ({:?})",
                event.session, event.kind
            );
            return Ok(());
        }

        match event.kind {
            DeviceEventKind::PositionChanged(seconds) => self.on_position_update(seconds),
            DeviceEventKind::MetadataReady(duration) => self.on_metadata_loaded(duration),
            DeviceEventKind::Ended => self.on_track_ended(),
            DeviceEventKind::PlayResolved { request, outcome } => {
                return self.on_play_resolved(request, outcome);
            }
        }

        Ok(())
    }

    /// Device reported a new position; the device is authoritative
    pub fn on_position_update(&mut self, seconds: f64) {
        self.state.position_secs = if seconds.is_finite() {
            seconds.max(0.0)
        } else {
            0.0
        };
        self.emit_position();
    }

    /// Device reported the track duration; non-finite means unknown
    pub fn on_metadata_loaded(&mut self, duration_secs: f64) {
        let duration_secs = if duration_secs.is_finite() {
            duration_secs.max(0.0)
        } else {
            0.0
        };

        self.state.duration_secs = duration_secs;
        self.emit(PlaybackEvent::DurationChanged { duration_secs });
    }

    /// Current track played to the end
    pub fn on_track_ended(&mut self) {
        match self.state.repeat {
            RepeatMode::One => {
                self.seek_to(0.0);
                self.start_playback();
                self.publish_status();
            }
            RepeatMode::All => self.next(),
            RepeatMode::Off => {
                if self.queue.has_next() {
                    self.next();
                } else {
                    debug!("Reached end of queue");
                    self.pending_play = None;
                    self.state.is_playing = false;
                    self.publish_status();
                }
            }
        }
    }

    /// A play command completed
    ///
    /// Completions for anything but the outstanding request are ignored. A
    /// failure falls back to paused and is reported to the caller.
    pub fn on_play_resolved(
        &mut self,
        request: PlayRequest,
        outcome: std::result::Result<(), String>,
    ) -> Result<()> {
        if self.pending_play != Some(request) {
            debug!(
                "Ignoring stale play completion ({} attempt {})",
                request.session, request.attempt
            );
            return Ok(());
        }
        self.pending_play = None;

        let Err(reason) = outcome else {
            return Ok(());
        };
        let Some(track_id) = self.current_track_id() else {
            return Ok(());
        };

        warn!("Playback failed to start for track {}: {}", track_id, reason);
        self.state.is_playing = false;
        self.emit(PlaybackEvent::PlaybackStartFailed {
            track_id,
            reason: reason.clone(),
        });
        self.publish_status();

        Err(PlaybackError::PlaybackStartFailed { track_id, reason })
    }

    // ===== State Queries =====

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Stopped without a current track, otherwise playing or paused
    pub fn status(&self) -> PlayerStatus {
        if self.queue.current().is_none() {
            PlayerStatus::Stopped
        } else if self.state.is_playing {
            PlayerStatus::Playing
        } else {
            PlayerStatus::Paused
        }
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.queue.current()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.queue.current_index()
    }

    /// Session of the current track, if any
    pub fn current_session(&self) -> Option<SessionId> {
        self.session.as_ref().map(TrackSession::id)
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// Mutable device access for platform work (ticking, draining output)
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ===== Internals =====

    fn current_track_id(&self) -> Option<TrackId> {
        self.session.as_ref().map(|s| s.track_id)
    }

    /// Enter `target` and play it, or stop if there is nothing to enter
    fn advance_to(&mut self, target: Option<usize>) {
        match target {
            Some(index) => {
                self.enter_track(index);
                self.start_playback();
            }
            None => {
                debug!("Nothing to advance to: queue is empty");
                self.pending_play = None;
                self.state.is_playing = false;
            }
        }
        self.publish_status();
    }

    /// Make `index` current and open a fresh device session for it
    ///
    /// Always releases the previous session first, which also invalidates any
    /// play command still in flight for it.
    fn enter_track(&mut self, index: usize) {
        let previous_track_id = self.release_session();

        if !self.queue.set_current(index) {
            return;
        }
        let Some(track) = self.queue.current() else {
            return;
        };
        let track_id = track.id;
        let source = track.source.clone();

        self.state.position_secs = 0.0;
        self.state.duration_secs = 0.0;

        self.session_counter += 1;
        let session = SessionId(self.session_counter);
        let subscription = self.device.subscribe(session);
        self.device.load(&source);
        self.session = Some(TrackSession {
            track_id,
            subscription,
        });

        debug!("Entered track {} at index {} ({})", track_id, index, session);
        self.emit(PlaybackEvent::TrackChanged {
            track_id: Some(track_id),
            previous_track_id,
        });
    }

    /// Leave the current track without entering another
    fn clear_current(&mut self) {
        let previous_track_id = self.release_session();
        self.state.position_secs = 0.0;
        self.state.duration_secs = 0.0;
        self.emit(PlaybackEvent::TrackChanged {
            track_id: None,
            previous_track_id,
        });
    }

    /// Drop the current session; returns the track it belonged to
    fn release_session(&mut self) -> Option<TrackId> {
        self.pending_play = None;
        let session = self.session.take()?;
        debug!("Releasing {} for track {}", session.id(), session.track_id);
        Some(session.track_id)
    }

    fn start_playback(&mut self) {
        let Some(session) = self.current_session() else {
            self.state.is_playing = false;
            return;
        };

        self.attempt_counter += 1;
        let request = PlayRequest {
            session,
            attempt: self.attempt_counter,
        };
        self.pending_play = Some(request);
        self.state.is_playing = true;
        self.device.play(request);
    }

    fn stop_playback(&mut self) {
        self.pending_play = None;
        self.state.is_playing = false;
        self.device.pause();
    }

    fn publish_status(&mut self) {
        let status = self.status();
        if status != self.last_status {
            self.last_status = status;
            self.emit(PlaybackEvent::StateChanged { state: status });
        }
    }

    fn emit_position(&mut self) {
        self.emit(PlaybackEvent::PositionChanged {
            position_secs: self.state.position_secs,
            duration_secs: self.state.duration_secs,
        });
    }

    fn emit(&mut self, event: PlaybackEvent) {
        self.pending_events.push(event);
    }
}

impl<D: Device + Default> Default for PlaybackController<D> {
    fn default() -> Self {
        Self::new(D::default(), PlaybackConfig::default())
    }
}
