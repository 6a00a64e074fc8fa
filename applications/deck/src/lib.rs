//! Soul Deck Library
//!
//! Headless terminal player built on `soul-transport`, driving a simulated
//! playback device from a single tokio task.
//!
//! This library exposes the components the binary wires together so they can
//! be tested without a terminal.

pub mod config;
pub mod deck;
pub mod device;
pub mod error;
pub mod import;
pub mod shell;
pub mod view;

// Re-export commonly used types for convenience
pub use config::DeckConfig;
pub use deck::{Deck, Reply};
pub use device::SimulatedDevice;
pub use error::{DeckError, Result};
