//! Track id generation
//!
//! The queue never derives ids from time or position; it asks an injected
//! generator, so tests can predict every id.

use crate::types::TrackId;

/// Source of fresh track ids
pub trait IdGenerator: Send {
    /// Hand out an id that has never been returned before
    fn next_id(&mut self) -> TrackId;
}

/// Monotonic counter
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> TrackId {
        let id = TrackId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}
