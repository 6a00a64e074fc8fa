//! Ordered track queue with a current position
//!
//! ```text
//!   index:   0        1        2
//!          [ A ]    [ B ]    [ C ]
//!                     ^
//!                  current
//! ```
//!
//! Insertion order is significant. The current index always points at a track
//! that is present, or is `None` when the queue is empty.

use crate::ids::IdGenerator;
use crate::types::{NewTrack, Track, TrackId};
use std::fmt;

/// Result of removing a track
#[derive(Debug, Clone, PartialEq)]
pub struct Removed {
    /// The track that was removed
    pub track: Track,

    /// Position it occupied before removal
    pub index: usize,

    /// Whether it was the current track
    pub was_current: bool,
}

/// Track queue
pub struct Queue {
    tracks: Vec<Track>,
    current: Option<usize>,
    ids: Box<dyn IdGenerator>,
}

impl Queue {
    /// Create new empty queue
    pub fn new(ids: Box<dyn IdGenerator>) -> Self {
        Self {
            tracks: Vec::new(),
            current: None,
            ids,
        }
    }

    /// Create queue with an initial set of tracks
    ///
    /// Initial tracks get their ids from the same generator as later additions.
    pub fn with_tracks(initial: Vec<NewTrack>, ids: Box<dyn IdGenerator>) -> Self {
        let mut queue = Self::new(ids);
        queue.add(initial);
        queue
    }

    /// Append tracks at the end, preserving their order
    ///
    /// Returns the ids assigned to the new tracks. Adding to an empty queue
    /// makes the first added track current.
    pub fn add(&mut self, tracks: Vec<NewTrack>) -> Vec<TrackId> {
        let mut assigned = Vec::with_capacity(tracks.len());
        for track in tracks {
            let id = self.ids.next_id();
            self.tracks.push(track.into_track(id));
            assigned.push(id);
        }

        if self.current.is_none() && !self.tracks.is_empty() {
            self.current = Some(0);
        }

        assigned
    }

    /// Remove track by id
    ///
    /// Returns `None` if no such track exists. Removing the current track
    /// resets the current index to 0 (or `None` if the queue became empty).
    /// Removing a track before the current one keeps the same track current.
    pub fn remove(&mut self, id: TrackId) -> Option<Removed> {
        let index = self.position_of(id)?;
        let track = self.tracks.remove(index);
        let was_current = self.current == Some(index);

        self.current = if self.tracks.is_empty() {
            None
        } else {
            match self.current {
                Some(_) if was_current => Some(0),
                Some(current) if index < current => Some(current - 1),
                other => other,
            }
        };

        Some(Removed {
            track,
            index,
            was_current,
        })
    }

    /// Look up the current position of a track
    ///
    /// Does not change the current index.
    pub fn select(&self, id: TrackId) -> Option<usize> {
        self.position_of(id)
    }

    /// Tracks whose `"title artist"` contains `query`, case-insensitively
    ///
    /// Empty query matches everything. Queue order is preserved.
    pub fn filter(&self, query: &str) -> Vec<&Track> {
        let needle = query.to_lowercase();
        self.tracks
            .iter()
            .filter(|track| {
                needle.is_empty()
                    || format!("{} {}", track.title, track.artist)
                        .to_lowercase()
                        .contains(&needle)
            })
            .collect()
    }

    /// Make the track at `index` current
    ///
    /// Returns `false` (and changes nothing) if `index` is out of range.
    pub fn set_current(&mut self, index: usize) -> bool {
        if index < self.tracks.len() {
            self.current = Some(index);
            true
        } else {
            false
        }
    }

    /// Index after the current one, wrapping to the start
    pub fn next_index(&self) -> Option<usize> {
        let len = self.tracks.len();
        self.current.map(|i| (i + 1) % len)
    }

    /// Index before the current one, wrapping to the end
    pub fn previous_index(&self) -> Option<usize> {
        let len = self.tracks.len();
        self.current.map(|i| (i + len - 1) % len)
    }

    /// Whether a track follows the current one without wrapping
    pub fn has_next(&self) -> bool {
        self.current.is_some_and(|i| i + 1 < self.tracks.len())
    }

    pub fn position_of(&self, id: TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&Track> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

impl fmt::Debug for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Queue")
            .field("tracks", &self.tracks)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;

    fn create_test_track(title: &str, artist: &str) -> NewTrack {
        NewTrack::new(title, artist, format!("/music/{}.mp3", title))
    }

    fn abc_queue() -> Queue {
        Queue::with_tracks(
            vec![
                create_test_track("Alpha", "First Artist"),
                create_test_track("Bravo", "Second Artist"),
                create_test_track("Charlie", "Third Artist"),
            ],
            Box::new(SequentialIds::new()),
        )
    }

    fn ids(queue: &Queue) -> Vec<u64> {
        queue.tracks().iter().map(|t| t.id.0).collect()
    }

    #[test]
    fn create_empty_queue() {
        let queue = Queue::new(Box::new(SequentialIds::new()));
        assert_eq!(queue.len(), 0);
        assert!(queue.is_empty());
        assert_eq!(queue.current_index(), None);
        assert!(queue.current().is_none());
    }

    #[test]
    fn add_preserves_order_and_sets_current() {
        let mut queue = Queue::new(Box::new(SequentialIds::new()));
        let assigned = queue.add(vec![
            create_test_track("Alpha", "A"),
            create_test_track("Bravo", "B"),
        ]);

        assert_eq!(assigned, vec![TrackId(1), TrackId(2)]);
        assert_eq!(queue.current_index(), Some(0));
        assert_eq!(queue.get(1).unwrap().title, "Bravo");
    }

    #[test]
    fn add_to_non_empty_keeps_current() {
        let mut queue = abc_queue();
        queue.set_current(2);
        queue.add(vec![create_test_track("Delta", "D")]);

        assert_eq!(queue.current_index(), Some(2));
        assert_eq!(queue.len(), 4);
    }

    #[test]
    fn ids_not_reused_after_removal() {
        let mut queue = abc_queue();
        queue.remove(TrackId(3)).unwrap();
        let assigned = queue.add(vec![create_test_track("Delta", "D")]);

        assert_eq!(assigned, vec![TrackId(4)]);
        assert_eq!(ids(&queue), vec![1, 2, 4]);
    }

    #[test]
    fn remove_missing_is_noop() {
        let mut queue = abc_queue();
        assert!(queue.remove(TrackId(99)).is_none());
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.current_index(), Some(0));
    }

    #[test]
    fn remove_current_resets_to_start() {
        let mut queue = abc_queue();
        queue.set_current(1);

        let removed = queue.remove(TrackId(2)).unwrap();
        assert!(removed.was_current);
        assert_eq!(removed.index, 1);
        assert_eq!(queue.current_index(), Some(0));
        assert_eq!(ids(&queue), vec![1, 3]);
    }

    #[test]
    fn remove_before_current_keeps_same_track_current() {
        let mut queue = abc_queue();
        queue.set_current(2);

        let removed = queue.remove(TrackId(1)).unwrap();
        assert!(!removed.was_current);
        assert_eq!(queue.current_index(), Some(1));
        assert_eq!(queue.current().unwrap().id, TrackId(3));
    }

    #[test]
    fn remove_after_current_keeps_index() {
        let mut queue = abc_queue();
        queue.remove(TrackId(3)).unwrap();
        assert_eq!(queue.current_index(), Some(0));
    }

    #[test]
    fn remove_last_track_empties_current() {
        let mut queue = Queue::with_tracks(
            vec![create_test_track("Alpha", "A")],
            Box::new(SequentialIds::new()),
        );
        let removed = queue.remove(TrackId(1)).unwrap();
        assert!(removed.was_current);
        assert_eq!(queue.current_index(), None);
    }

    #[test]
    fn select_does_not_mutate() {
        let queue = abc_queue();
        assert_eq!(queue.select(TrackId(3)), Some(2));
        assert_eq!(queue.select(TrackId(42)), None);
        assert_eq!(queue.current_index(), Some(0));
    }

    #[test]
    fn filter_is_case_insensitive_over_title_and_artist() {
        let queue = abc_queue();

        let hits: Vec<_> = queue.filter("BRAVO").iter().map(|t| t.id).collect();
        assert_eq!(hits, vec![TrackId(2)]);

        let hits: Vec<_> = queue.filter("third artist").iter().map(|t| t.id).collect();
        assert_eq!(hits, vec![TrackId(3)]);

        // Spans the title/artist boundary
        let hits: Vec<_> = queue.filter("alpha first").iter().map(|t| t.id).collect();
        assert_eq!(hits, vec![TrackId(1)]);

        assert!(queue.filter("zulu").is_empty());
    }

    #[test]
    fn empty_filter_returns_everything_in_order() {
        let queue = abc_queue();
        let all: Vec<_> = queue.filter("").iter().map(|t| t.id.0).collect();
        assert_eq!(all, vec![1, 2, 3]);
    }

    #[test]
    fn next_and_previous_wrap() {
        let mut queue = abc_queue();
        assert_eq!(queue.next_index(), Some(1));
        assert_eq!(queue.previous_index(), Some(2));

        queue.set_current(2);
        assert_eq!(queue.next_index(), Some(0));
        assert!(!queue.has_next());
    }

    #[test]
    fn set_current_out_of_range_is_rejected() {
        let mut queue = abc_queue();
        assert!(!queue.set_current(3));
        assert_eq!(queue.current_index(), Some(0));
    }

    #[test]
    fn navigation_on_empty_queue_is_none() {
        let queue = Queue::new(Box::new(SequentialIds::new()));
        assert_eq!(queue.next_index(), None);
        assert_eq!(queue.previous_index(), None);
        assert!(!queue.has_next());
    }
}
