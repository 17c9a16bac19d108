//! Explicit state containers.
//!
//! A [`Store`] owns one state value and the reducer that mutates it.
//! Views dispatch actions into it; subscribers such as the persistence bridge
//! observe every committed transition.

mod clock;
mod container;

pub use clock::*;
pub use container::*;
