//! Audio: keeps a media backend in step with the player store.
//!
//! [`AudioSync`] diffs successive player states into calls on a
//! [`MediaHandle`] and turns the backend's [`MediaEvent`]s back into player
//! actions. [`AudioPlayer`] is the rodio-backed handle used at runtime.

mod player;
mod sink;
mod sync;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use sync::AudioSync;
pub use types::{MediaEvent, MediaHandle};
