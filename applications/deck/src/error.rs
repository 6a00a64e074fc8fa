/// Deck error types
use soul_transport::PlaybackError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DeckError>;

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown command: {0} (try 'help')")]
    UnknownCommand(String),

    #[error("Missing argument for '{0}'")]
    MissingArgument(&'static str),

    #[error("Invalid argument for '{command}': {reason}")]
    InvalidArgument {
        command: &'static str,
        reason: String,
    },

    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DeckError {
    pub(crate) fn invalid(command: &'static str, reason: impl Into<String>) -> Self {
        DeckError::InvalidArgument {
            command,
            reason: reason.into(),
        }
    }
}
