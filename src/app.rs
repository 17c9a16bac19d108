//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and ties the player and library
//! stores to the audio backend and the on-screen selection.

mod model;

pub use model::*;
