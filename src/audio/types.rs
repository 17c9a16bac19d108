//! Audio-related small types.
//!
//! The [`MediaHandle`] trait is the outbound contract every backend
//! implements; [`MediaEvent`] is what a backend reports back. Every load
//! carries a generation number and playback events echo it, so events that
//! were already queued for an earlier source can be told apart.

use crate::error::Result;
use crate::library::Track;

/// Outbound control surface of a media element.
///
/// Calls are fire and forget: a backend may fail later and report that as
/// [`MediaEvent::Error`] instead of returning an error here.
pub trait MediaHandle {
    /// Replace the current source. The new source starts paused at zero and
    /// its events are tagged with `generation`.
    fn load(&mut self, track: &Track, generation: u64) -> Result<()>;
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self) -> Result<()>;
    /// Jump to `position` seconds into the current source.
    fn seek(&mut self, position: f64) -> Result<()>;
    /// Output volume in `[0, 1]`.
    fn set_volume(&mut self, volume: f32) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Periodic playback position, in seconds.
    TimeUpdate { generation: u64, position: f64 },
    /// The loaded source is ready and this long, in seconds.
    LoadedMetadata { generation: u64, duration: f64 },
    /// The source played to its end.
    Ended { generation: u64 },
    Error(String),
}

#[derive(Debug)]
pub(super) enum AudioCmd {
    Load { track: Track, generation: u64 },
    Play,
    Pause,
    Seek(f64),
    SetVolume(f32),
    /// Stop playback and leave the audio thread.
    Quit,
}
