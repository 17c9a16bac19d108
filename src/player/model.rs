//! Player state types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::library::Track;

pub const DEFAULT_VOLUME: f32 = 0.7;

/// What happens when a track finishes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    #[default]
    None,
    One,
    All,
}

impl RepeatMode {
    /// Next mode in the fixed cycle `none -> all -> one -> none`.
    pub fn cycle(self) -> Self {
        match self {
            Self::None => Self::All,
            Self::All => Self::One,
            Self::One => Self::None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "No repeat",
            Self::All => "Repeat all",
            Self::One => "Repeat one",
        }
    }
}

/// Resume bookkeeping for one track.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackResumeState {
    /// Seconds into the track.
    pub last_position: f64,
    /// Epoch milliseconds.
    pub last_played: i64,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlayerStatus {
    Idle,
    Paused,
    Playing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub current_track: Option<Track>,
    pub is_playing: bool,
    pub queue: Vec<Track>,
    pub current_index: usize,
    pub volume: f32,
    pub repeat_mode: RepeatMode,
    pub shuffle: bool,
    pub track_states: BTreeMap<String, TrackResumeState>,
    /// Bumped every time a track is (re)assigned as current, so observers
    /// reload even when the same track comes round again.
    pub load_seq: u64,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            current_track: None,
            is_playing: false,
            queue: Vec::new(),
            current_index: 0,
            volume: DEFAULT_VOLUME,
            repeat_mode: RepeatMode::None,
            shuffle: false,
            track_states: BTreeMap::new(),
            load_seq: 0,
        }
    }
}

impl PlayerState {
    pub fn status(&self) -> PlayerStatus {
        match (&self.current_track, self.is_playing) {
            (None, _) => PlayerStatus::Idle,
            (Some(_), false) => PlayerStatus::Paused,
            (Some(_), true) => PlayerStatus::Playing,
        }
    }

    /// Saved position for `track_id`, if it has a resume entry.
    pub fn resume_position(&self, track_id: &str) -> Option<f64> {
        self.track_states.get(track_id).map(|s| s.last_position)
    }
}

/// Clamp a requested volume into `[0, 1]`; non-finite input becomes silence.
pub fn clamp_volume(v: f32) -> f32 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }
}
