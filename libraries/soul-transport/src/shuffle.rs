//! Random track selection for shuffle mode
//!
//! Shuffle does not reorder the queue. Each "next" draws a uniformly random
//! index over the whole queue instead.

use rand::Rng;

/// Pick a uniformly random queue index
///
/// With `avoid_current` unset the current index may be drawn again. With it
/// set, the current index is excluded whenever another track exists.
/// Returns `None` for an empty queue.
pub fn pick_random_index<R: Rng>(
    len: usize,
    current: Option<usize>,
    avoid_current: bool,
    rng: &mut R,
) -> Option<usize> {
    if len == 0 {
        return None;
    }

    match current {
        Some(current) if avoid_current && len > 1 && current < len => {
            // Draw from len - 1 slots and skip over the current one
            let pick = rng.gen_range(0..len - 1);
            Some(if pick >= current { pick + 1 } else { pick })
        }
        _ => Some(rng.gen_range(0..len)),
    }
}
