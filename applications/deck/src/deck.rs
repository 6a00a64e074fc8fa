//! Deck: the controller, its simulated device, and the line shell glued together
//!
//! Everything that mutates the controller goes through this type, and the host
//! loop owns the only instance.

use crate::config::DeckConfig;
use crate::device::SimulatedDevice;
use crate::error::Result;
use crate::import::import_paths;
use crate::shell::{self, ShellCommand};
use crate::view;
use soul_transport::{DeviceEvent, PlaybackController, TrackId};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

/// Result of executing one line
#[derive(Debug, Default, PartialEq)]
pub struct Reply {
    /// Text to print
    pub lines: Vec<String>,

    /// The user asked to exit
    pub quit: bool,
}

impl Reply {
    fn lines(lines: Vec<String>) -> Self {
        Self { lines, quit: false }
    }

    fn line(line: impl Into<String>) -> Self {
        Self::lines(vec![line.into()])
    }
}

pub struct Deck {
    controller: PlaybackController<SimulatedDevice>,
    default_cover: Option<String>,
}

impl Deck {
    /// Build the deck, queueing configured library tracks then `extra_tracks`
    pub fn new(
        config: DeckConfig,
        extra_tracks: &[PathBuf],
        events: UnboundedSender<DeviceEvent>,
    ) -> Self {
        let DeckConfig {
            playback,
            simulator,
            library,
            ..
        } = config;

        let mut paths = library.tracks;
        paths.extend_from_slice(extra_tracks);
        let initial = import_paths(&paths, library.default_cover.as_deref());
        info!("Starting with {} queued tracks", initial.len());

        let device = SimulatedDevice::new(simulator, events);
        let controller = PlaybackController::with_tracks(device, playback, initial);

        Self {
            controller,
            default_cover: library.default_cover,
        }
    }

    /// Parse and run one line of input
    pub fn execute(&mut self, line: &str) -> Result<Reply> {
        let seek_step = self.controller.config().seek_step_secs;
        let Some(command) = shell::parse(line, seek_step)? else {
            return Ok(Reply::default());
        };
        debug!("Executing {:?}", command);

        let reply = match command {
            ShellCommand::Player(command) => {
                command.apply(&mut self.controller)?;
                Reply::default()
            }
            ShellCommand::Add(paths) => {
                let ids = self.import(&paths);
                Reply::line(format!("added {}", id_list(&ids)))
            }
            ShellCommand::Find(query) => {
                let matches: Vec<String> = self
                    .controller
                    .filter(&query)
                    .into_iter()
                    .map(view::track_label)
                    .collect();
                if matches.is_empty() {
                    Reply::line(format!("no tracks match '{}'", query))
                } else {
                    Reply::lines(matches)
                }
            }
            ShellCommand::List => Reply::lines(view::queue_lines(&self.controller)),
            ShellCommand::Status => Reply::line(view::status_line(&self.controller)),
            ShellCommand::Json => {
                let json = serde_json::to_string_pretty(&view::Snapshot::of(&self.controller))?;
                Reply::line(json)
            }
            ShellCommand::Help => Reply::line(shell::HELP),
            ShellCommand::Quit => Reply {
                lines: Vec::new(),
                quit: true,
            },
        };

        Ok(reply)
    }

    /// Import files into the queue
    pub fn import(&mut self, paths: &[PathBuf]) -> Vec<TrackId> {
        let tracks = import_paths(paths, self.default_cover.as_deref());
        self.controller.add(tracks)
    }

    /// Feed an event from the device back into the controller
    pub fn handle_device_event(&mut self, event: DeviceEvent) -> Result<()> {
        self.controller.handle_event(event)?;
        Ok(())
    }

    /// Advance the simulated device clock
    pub fn tick(&mut self, elapsed: Duration) {
        self.controller.device_mut().tick(elapsed);
    }

    /// Printable notifications for everything that changed since last call
    pub fn notifications(&mut self) -> Vec<String> {
        let events = self.controller.drain_events();
        events
            .iter()
            .filter_map(|event| view::describe_event(&self.controller, event))
            .collect()
    }

    pub fn controller(&self) -> &PlaybackController<SimulatedDevice> {
        &self.controller
    }
}

fn id_list(ids: &[TrackId]) -> String {
    ids.iter()
        .map(|id| format!("#{}", id))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeckError;
    use soul_transport::{PlaybackError, PlayerStatus, RepeatMode};
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn deck(paths: &[&str]) -> (Deck, UnboundedReceiver<DeviceEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut config = DeckConfig::default();
        config.simulator.track_secs = 10.0;
        let paths: Vec<PathBuf> = paths.iter().map(PathBuf::from).collect();
        (Deck::new(config, &paths, tx), rx)
    }

    /// Deliver every queued device event, as the host loop would
    fn pump(deck: &mut Deck, rx: &mut UnboundedReceiver<DeviceEvent>) -> Vec<DeckError> {
        let mut errors = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let Err(e) = deck.handle_device_event(event) {
                errors.push(e);
            }
        }
        errors
    }

    #[test]
    fn starts_paused_with_duration_known() {
        let (mut deck, mut rx) = deck(&["/music/a.mp3", "/music/b.mp3"]);
        assert!(pump(&mut deck, &mut rx).is_empty());

        assert_eq!(deck.controller().status(), PlayerStatus::Paused);
        assert_eq!(deck.controller().state().duration_secs, 10.0);
        assert_eq!(deck.controller().queue().len(), 2);
    }

    #[test]
    fn plays_through_queue_and_stops() {
        let (mut deck, mut rx) = deck(&["/music/a.mp3", "/music/b.mp3"]);
        deck.execute("play").unwrap();
        pump(&mut deck, &mut rx);

        deck.tick(Duration::from_secs(11));
        pump(&mut deck, &mut rx);
        assert_eq!(deck.controller().current_index(), Some(1));
        assert!(deck.controller().state().is_playing);

        deck.tick(Duration::from_secs(11));
        pump(&mut deck, &mut rx);
        assert_eq!(deck.controller().current_index(), Some(1));
        assert_eq!(deck.controller().status(), PlayerStatus::Paused);
    }

    #[test]
    fn play_after_queue_end_starts_track_over() {
        let (mut deck, mut rx) = deck(&["/music/a.mp3"]);
        deck.execute("play").unwrap();
        pump(&mut deck, &mut rx);
        deck.tick(Duration::from_secs(11));
        pump(&mut deck, &mut rx);
        assert_eq!(deck.controller().status(), PlayerStatus::Paused);
        assert_eq!(deck.controller().state().position_secs, 10.0);

        deck.execute("play").unwrap();
        pump(&mut deck, &mut rx);
        deck.tick(Duration::from_millis(250));
        pump(&mut deck, &mut rx);

        assert_eq!(deck.controller().status(), PlayerStatus::Playing);
        assert_eq!(deck.controller().state().position_secs, 0.25);
    }

    #[test]
    fn repeat_one_replays_track() {
        let (mut deck, mut rx) = deck(&["/music/a.mp3", "/music/b.mp3"]);
        deck.execute("repeat").unwrap();
        deck.execute("repeat").unwrap();
        assert_eq!(deck.controller().state().repeat, RepeatMode::One);

        deck.execute("play").unwrap();
        pump(&mut deck, &mut rx);
        deck.tick(Duration::from_secs(11));
        pump(&mut deck, &mut rx);

        assert_eq!(deck.controller().current_index(), Some(0));
        assert!(deck.controller().state().is_playing);
        assert_eq!(deck.controller().state().position_secs, 0.0);
    }

    #[test]
    fn unsupported_file_reports_failure() {
        let (mut deck, mut rx) = deck(&["/music/notes.txt"]);
        deck.execute("play").unwrap();

        let errors = pump(&mut deck, &mut rx);

        assert!(matches!(
            &errors[..],
            [DeckError::Playback(PlaybackError::PlaybackStartFailed { .. })]
        ));
        assert!(!deck.controller().state().is_playing);
        assert!(deck
            .notifications()
            .iter()
            .any(|line| line.starts_with("cannot play #1")));
    }

    #[test]
    fn add_imports_files() {
        let (mut deck, _rx) = deck(&[]);

        let reply = deck.execute("add /music/x.mp3 /music/y.ogg").unwrap();

        assert_eq!(reply.lines, vec!["added #1, #2"]);
        let current = deck.controller().current_track().unwrap();
        assert_eq!(current.title, "x.mp3");
        assert_eq!(current.cover.as_deref(), Some("assets/default-cover.png"));
    }

    #[test]
    fn find_filters_queue() {
        let (mut deck, _rx) = deck(&["/music/Blue Monday.mp3", "/music/Ceremony.mp3"]);

        let reply = deck.execute("find MONDAY").unwrap();
        assert_eq!(reply.lines, vec!["#1 Blue Monday.mp3 - Local"]);

        let reply = deck.execute("find zzz").unwrap();
        assert_eq!(reply.lines, vec!["no tracks match 'zzz'"]);
    }

    #[test]
    fn select_unknown_track_is_an_error() {
        let (mut deck, _rx) = deck(&["/music/a.mp3"]);
        assert!(matches!(
            deck.execute("select 99"),
            Err(DeckError::Playback(PlaybackError::NotFound(_)))
        ));
    }

    #[test]
    fn stale_position_after_skip_is_ignored() {
        let (mut deck, mut rx) = deck(&["/music/a.mp3", "/music/b.mp3"]);
        deck.execute("play").unwrap();
        pump(&mut deck, &mut rx);
        deck.tick(Duration::from_secs(4));

        // Position for the first track is still queued when the user skips
        deck.execute("next").unwrap();
        pump(&mut deck, &mut rx);

        assert_eq!(deck.controller().current_index(), Some(1));
        assert_eq!(deck.controller().state().position_secs, 0.0);
    }

    #[test]
    fn quit_and_blank_lines() {
        let (mut deck, _rx) = deck(&[]);
        assert_eq!(deck.execute("").unwrap(), Reply::default());
        assert!(deck.execute("quit").unwrap().quit);
    }

    #[test]
    fn json_dump_is_valid() {
        let (mut deck, _rx) = deck(&["/music/a.mp3"]);
        let reply = deck.execute("json").unwrap();
        let value: serde_json::Value = serde_json::from_str(&reply.lines[0]).unwrap();
        assert_eq!(value["queue"][0]["artist"], "Local");
    }

    #[test]
    fn notifications_skip_position_updates() {
        let (mut deck, mut rx) = deck(&["/music/a.mp3"]);
        deck.notifications();
        deck.execute("play").unwrap();
        pump(&mut deck, &mut rx);
        deck.tick(Duration::from_secs(1));
        pump(&mut deck, &mut rx);

        let notes = deck.notifications();
        assert_eq!(notes, vec!["state: playing"]);
    }
}
