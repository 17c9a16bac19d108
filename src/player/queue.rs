//! Index arithmetic for queue navigation.
//!
//! All helpers require `len > 0`; callers treat an empty queue as a no-op
//! before getting here.

use rand::Rng;

/// Index after `current`: circular when sequential, otherwise a uniform
/// pick among every index except `current`. A single-entry queue stays put.
pub(crate) fn next_index<R: Rng + ?Sized>(
    len: usize,
    current: usize,
    shuffle: bool,
    rng: &mut R,
) -> usize {
    if !shuffle {
        return (current + 1) % len;
    }

    let excluded = current < len;
    let candidates = if excluded { len - 1 } else { len };
    if candidates == 0 {
        return current;
    }
    let pick = rng.gen_range(0..candidates);
    if excluded && pick >= current {
        pick + 1
    } else {
        pick
    }
}

/// Index before `current`, wrapping to the last entry.
pub(crate) fn prev_index(len: usize, current: usize) -> usize {
    if current == 0 {
        len - 1
    } else {
        (current - 1).min(len - 1)
    }
}
