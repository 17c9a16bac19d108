//! Player state machine: current track, queue, playing flag, volume,
//! repeat/shuffle modes and per-track resume positions.
//!
//! States are `idle` (no current track), `paused` and `playing`. Selecting a
//! track always lands in `playing`; next/prev keep whatever the playing flag
//! was; toggling flips between `paused` and `playing`.

mod model;
mod queue;
mod reducer;

pub use model::*;
pub use reducer::*;
