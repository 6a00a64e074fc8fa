/// Deck configuration
use crate::error::{DeckError, Result};
use serde::{Deserialize, Serialize};
use soul_transport::PlaybackConfig;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "deck.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DeckConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default = "default_logging")]
    pub logging: LoggingSettings,

    #[serde(default = "default_simulator")]
    pub simulator: SimulatorSettings,

    #[serde(default = "default_library")]
    pub library: LibrarySettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is not set
    #[serde(default = "default_filter")]
    pub filter: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulatorSettings {
    /// Interval between simulated position updates
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Duration reported for every loaded track
    #[serde(default = "default_track_secs")]
    pub track_secs: f64,

    /// Extensions the simulated device can play; anything else fails to start
    #[serde(default = "default_supported_extensions")]
    pub supported_extensions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibrarySettings {
    /// Artwork handle given to imported files
    #[serde(default = "default_cover")]
    pub default_cover: Option<String>,

    /// Files queued at startup, before any given on the command line
    #[serde(default)]
    pub tracks: Vec<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        default_logging()
    }
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        default_simulator()
    }
}

impl Default for LibrarySettings {
    fn default() -> Self {
        default_library()
    }
}

impl SimulatorSettings {
    /// Whether the simulated device accepts a source, judged by extension
    pub fn supports(&self, source: &str) -> bool {
        Path::new(source)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.supported_extensions
                    .iter()
                    .any(|supported| supported.eq_ignore_ascii_case(ext))
            })
    }
}

impl DeckConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit path must exist; otherwise `deck.toml` is read when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables, e.g. DECK_PLAYBACK__VOLUME=0.5
        settings = settings.add_source(
            config::Environment::with_prefix("DECK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| DeckError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| DeckError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.simulator.tick_ms == 0 {
            return Err(DeckError::Config(
                "simulator.tick_ms must be greater than zero".to_string(),
            ));
        }

        if !self.simulator.track_secs.is_finite() || self.simulator.track_secs <= 0.0 {
            return Err(DeckError::Config(format!(
                "simulator.track_secs must be a positive number, got {}",
                self.simulator.track_secs
            )));
        }

        if !(0.0..=1.0).contains(&self.playback.volume) {
            return Err(DeckError::Config(format!(
                "playback.volume must be between 0.0 and 1.0, got {}",
                self.playback.volume
            )));
        }

        if !self.playback.seek_step_secs.is_finite() || self.playback.seek_step_secs <= 0.0 {
            return Err(DeckError::Config(format!(
                "playback.seek_step_secs must be a positive number, got {}",
                self.playback.seek_step_secs
            )));
        }

        if !self.playback.restart_threshold_secs.is_finite()
            || self.playback.restart_threshold_secs < 0.0
        {
            return Err(DeckError::Config(format!(
                "playback.restart_threshold_secs must not be negative, got {}",
                self.playback.restart_threshold_secs
            )));
        }

        Ok(())
    }
}

// Default values
fn default_logging() -> LoggingSettings {
    LoggingSettings {
        filter: default_filter(),
    }
}

fn default_filter() -> String {
    "soul_deck=info,soul_transport=info".to_string()
}

fn default_simulator() -> SimulatorSettings {
    SimulatorSettings {
        tick_ms: default_tick_ms(),
        track_secs: default_track_secs(),
        supported_extensions: default_supported_extensions(),
    }
}

fn default_tick_ms() -> u64 {
    250
}

fn default_track_secs() -> f64 {
    180.0
}

fn default_supported_extensions() -> Vec<String> {
    ["mp3", "flac", "ogg", "wav", "m4a", "opus"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_library() -> LibrarySettings {
    LibrarySettings {
        default_cover: default_cover(),
        tracks: Vec::new(),
    }
}

fn default_cover() -> Option<String> {
    Some("assets/default-cover.png".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use soul_transport::RepeatMode;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = DeckConfig::default();
        assert_eq!(config.simulator.tick_ms, 250);
        assert_eq!(config.simulator.track_secs, 180.0);
        assert_eq!(config.logging.filter, "soul_deck=info,soul_transport=info");
        assert_eq!(config.playback, PlaybackConfig::default());
        assert!(config.library.tracks.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn supports_matches_extension_case_insensitively() {
        let simulator = SimulatorSettings::default();
        assert!(simulator.supports("/music/song.mp3"));
        assert!(simulator.supports("/music/SONG.FLAC"));
        assert!(!simulator.supports("/music/notes.txt"));
        assert!(!simulator.supports("/music/no-extension"));
    }

    #[test]
    fn rejects_zero_tick() {
        let mut config = DeckConfig::default();
        config.simulator.tick_ms = 0;
        assert!(matches!(config.validate(), Err(DeckError::Config(_))));
    }

    #[test]
    fn rejects_out_of_range_volume() {
        let mut config = DeckConfig::default();
        config.playback.volume = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn loads_partial_file_over_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[playback]
volume = 0.4
repeat = "all"

[simulator]
tick_ms = 100
supported_extensions = ["mp3"]

[library]
tracks = ["/music/a.mp3"]
"#
        )
        .unwrap();

        let config = DeckConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.playback.volume, 0.4);
        assert_eq!(config.playback.repeat, RepeatMode::All);
        assert_eq!(config.playback.seek_step_secs, 5.0);
        assert_eq!(config.simulator.tick_ms, 100);
        assert_eq!(config.simulator.track_secs, 180.0);
        assert_eq!(config.simulator.supported_extensions, vec!["mp3"]);
        assert_eq!(config.library.tracks, vec![PathBuf::from("/music/a.mp3")]);
        assert_eq!(
            config.library.default_cover.as_deref(),
            Some("assets/default-cover.png")
        );
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = DeckConfig::load(Some(Path::new("/nonexistent/deck.toml")));
        assert!(matches!(result, Err(DeckError::Config(_))));
    }
}
