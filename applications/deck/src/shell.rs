//! Line commands typed at the deck prompt

use crate::error::{DeckError, Result};
use soul_transport::{PlayerCommand, TrackId};
use std::path::PathBuf;

pub const HELP: &str = "\
Commands:
  play | toggle      toggle play/pause
  pause              pause playback
  next | prev        skip forward / back (prev restarts after 3s)
  seek <secs>        jump to position
  ff | rew           nudge forward / back
  vol <0.0-1.0>      set volume
  shuffle            toggle shuffle
  repeat             cycle repeat (off -> all -> one)
  add <path>...      import files into the queue
  rm <id>            remove track
  select <id>        play track
  find <text>        search title and artist
  list               show queue
  status             show transport
  json               dump state as JSON
  help               this text
  quit               exit";

/// Parsed line
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    /// Transport or queue intent for the controller
    Player(PlayerCommand),

    /// Import files
    Add(Vec<PathBuf>),

    Find(String),

    List,

    Status,

    Json,

    Help,

    Quit,
}

/// Parse one input line
///
/// Blank lines yield `None`. `seek_step_secs` sizes the `ff`/`rew` nudge.
pub fn parse(line: &str, seek_step_secs: f64) -> Result<Option<ShellCommand>> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match name.to_lowercase().as_str() {
        "play" | "toggle" | "p" => ShellCommand::Player(PlayerCommand::PlayPause),
        "pause" => ShellCommand::Player(PlayerCommand::Pause),
        "next" | "n" => ShellCommand::Player(PlayerCommand::Next),
        "prev" | "previous" => ShellCommand::Player(PlayerCommand::Previous),
        "seek" => ShellCommand::Player(PlayerCommand::Seek(number("seek", &args)?)),
        "ff" => ShellCommand::Player(PlayerCommand::SeekBy(seek_step_secs)),
        "rew" => ShellCommand::Player(PlayerCommand::SeekBy(-seek_step_secs)),
        "vol" | "volume" => {
            ShellCommand::Player(PlayerCommand::SetVolume(number::<f32>("vol", &args)?))
        }
        "shuffle" => ShellCommand::Player(PlayerCommand::ToggleShuffle),
        "repeat" => ShellCommand::Player(PlayerCommand::CycleRepeat),
        "add" => {
            if args.is_empty() {
                return Err(DeckError::MissingArgument("add"));
            }
            ShellCommand::Add(args.iter().map(PathBuf::from).collect())
        }
        "rm" | "remove" => ShellCommand::Player(PlayerCommand::Remove(track_id("rm", &args)?)),
        "select" | "sel" => {
            ShellCommand::Player(PlayerCommand::Select(track_id("select", &args)?))
        }
        "find" | "search" => ShellCommand::Find(args.join(" ")),
        "list" | "ls" => ShellCommand::List,
        "status" | "st" => ShellCommand::Status,
        "json" => ShellCommand::Json,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(DeckError::UnknownCommand(other.to_string())),
    };

    Ok(Some(command))
}

fn single<'a>(command: &'static str, args: &[&'a str]) -> Result<&'a str> {
    match args {
        [] => Err(DeckError::MissingArgument(command)),
        [arg] => Ok(*arg),
        _ => Err(DeckError::invalid(command, "expected a single value")),
    }
}

fn number<T: std::str::FromStr>(command: &'static str, args: &[&str]) -> Result<T> {
    let arg = single(command, args)?;
    arg.parse()
        .map_err(|_| DeckError::invalid(command, format!("'{}' is not a number", arg)))
}

fn track_id(command: &'static str, args: &[&str]) -> Result<TrackId> {
    let arg = single(command, args)?;
    arg.trim_start_matches('#')
        .parse()
        .map(TrackId)
        .map_err(|_| DeckError::invalid(command, format!("'{}' is not a track id", arg)))
}
