//! Text rendering of controller state

use serde::Serialize;
use soul_transport::{
    format_time, Device, PlaybackController, PlaybackEvent, PlaybackState, PlayerStatus,
    RepeatMode, Track,
};

/// JSON view of the whole player
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub status: PlayerStatus,
    pub state: &'a PlaybackState,
    pub current: Option<&'a Track>,
    pub queue: &'a [Track],
}

impl<'a> Snapshot<'a> {
    pub fn of<D: Device>(controller: &'a PlaybackController<D>) -> Self {
        Self {
            status: controller.status(),
            state: controller.state(),
            current: controller.current_track(),
            queue: controller.queue().tracks(),
        }
    }
}

/// One-line transport summary
pub fn status_line<D: Device>(controller: &PlaybackController<D>) -> String {
    let state = controller.state();
    let status = match controller.status() {
        PlayerStatus::Stopped => "stopped",
        PlayerStatus::Playing => "playing",
        PlayerStatus::Paused => "paused",
    };

    let now = match controller.current_track() {
        Some(track) => format!(
            " {} [{} / {}]",
            track_label(track),
            format_time(state.position_secs),
            format_time(state.duration_secs)
        ),
        None => String::new(),
    };

    format!(
        "[{}]{}  vol {:.0}%  shuffle {}  repeat {}",
        status,
        now,
        state.volume * 100.0,
        if state.shuffle { "on" } else { "off" },
        repeat_label(state.repeat)
    )
}

/// Queue listing, current track marked with `>`
pub fn queue_lines<D: Device>(controller: &PlaybackController<D>) -> Vec<String> {
    let queue = controller.queue();
    if queue.is_empty() {
        return vec!["(queue is empty)".to_string()];
    }

    queue
        .tracks()
        .iter()
        .enumerate()
        .map(|(index, track)| {
            let marker = if queue.current_index() == Some(index) {
                '>'
            } else {
                ' '
            };
            format!("{} {}", marker, track_label(track))
        })
        .collect()
}

pub fn track_label(track: &Track) -> String {
    format!("#{} {} - {}", track.id, track.title, track.artist)
}

fn repeat_label(mode: RepeatMode) -> &'static str {
    match mode {
        RepeatMode::Off => "off",
        RepeatMode::All => "all",
        RepeatMode::One => "one",
    }
}

/// Notification for an event, if it is worth printing
///
/// Position and duration updates arrive on every tick and are left to
/// `status`.
pub fn describe_event<D: Device>(
    controller: &PlaybackController<D>,
    event: &PlaybackEvent,
) -> Option<String> {
    match event {
        PlaybackEvent::StateChanged { state } => Some(format!("state: {:?}", state).to_lowercase()),
        PlaybackEvent::TrackChanged { track_id: None, .. } => {
            Some("now playing: nothing".to_string())
        }
        PlaybackEvent::TrackChanged {
            track_id: Some(id), ..
        } => {
            let label = controller
                .queue()
                .position_of(*id)
                .and_then(|index| controller.queue().get(index))
                .map(track_label)
                .unwrap_or_else(|| format!("#{}", id));
            Some(format!("now playing: {}", label))
        }
        PlaybackEvent::VolumeChanged { volume } => {
            Some(format!("volume: {:.0}%", volume * 100.0))
        }
        PlaybackEvent::ShuffleChanged { enabled } => Some(format!(
            "shuffle: {}",
            if *enabled { "on" } else { "off" }
        )),
        PlaybackEvent::RepeatChanged { mode } => {
            Some(format!("repeat: {}", repeat_label(*mode)))
        }
        PlaybackEvent::QueueChanged { length } => Some(format!("queue: {} tracks", length)),
        PlaybackEvent::PlaybackStartFailed { track_id, reason } => {
            Some(format!("cannot play #{}: {}", track_id, reason))
        }
        PlaybackEvent::PositionChanged { .. } | PlaybackEvent::DurationChanged { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soul_transport::{NewTrack, NullDevice, PlaybackConfig, TrackId};

    fn controller() -> PlaybackController<NullDevice> {
        PlaybackController::with_tracks(
            NullDevice,
            PlaybackConfig::default(),
            vec![
                NewTrack::new("One", "Alpha", "/music/one.mp3"),
                NewTrack::new("Two", "Beta", "/music/two.mp3"),
            ],
        )
    }

    #[test]
    fn status_line_shows_current_track() {
        let mut controller = controller();
        controller.on_metadata_loaded(185.0);
        controller.on_position_update(62.0);

        assert_eq!(
            status_line(&controller),
            "[paused] #1 One - Alpha [1:02 / 3:05]  vol 100%  shuffle off  repeat off"
        );
    }

    #[test]
    fn status_line_when_empty() {
        let controller = PlaybackController::new(NullDevice, PlaybackConfig::default());
        assert_eq!(
            status_line(&controller),
            "[stopped]  vol 100%  shuffle off  repeat off"
        );
    }

    #[test]
    fn queue_marks_current() {
        let mut controller = controller();
        controller.next();

        assert_eq!(
            queue_lines(&controller),
            vec!["  #1 One - Alpha", "> #2 Two - Beta"]
        );
    }

    #[test]
    fn tick_events_are_quiet() {
        let controller = controller();
        let event = PlaybackEvent::PositionChanged {
            position_secs: 1.0,
            duration_secs: 2.0,
        };
        assert_eq!(describe_event(&controller, &event), None);
    }

    #[test]
    fn track_change_names_track() {
        let controller = controller();
        let event = PlaybackEvent::TrackChanged {
            track_id: Some(TrackId(2)),
            previous_track_id: Some(TrackId(1)),
        };
        assert_eq!(
            describe_event(&controller, &event).as_deref(),
            Some("now playing: #2 Two - Beta")
        );
    }

    #[test]
    fn snapshot_serializes() {
        let controller = controller();
        let json = serde_json::to_value(Snapshot::of(&controller)).unwrap();
        assert_eq!(json["status"], "Paused");
        assert_eq!(json["queue"].as_array().unwrap().len(), 2);
        assert_eq!(json["current"]["title"], "One");
    }
}
