//! Bridge from the player store to a media backend.
//!
//! [`AudioSync`] turns store changes into [`MediaHandle`] calls and turns
//! backend events into player actions.

use log::{debug, warn};

use crate::error::Result;
use crate::player::{DEFAULT_VOLUME, PlayerAction, PlayerState, RepeatMode};

use super::types::{MediaEvent, MediaHandle};

/// Mirrors the player store onto a [`MediaHandle`].
///
/// Holds only what it last pushed to the handle, so every [`sync`](Self::sync)
/// issues the minimal set of calls. A load always precedes any play or seek
/// for that track.
pub struct AudioSync {
    handle: Box<dyn MediaHandle>,
    /// Track id and load sequence of the source currently in the handle.
    loaded: Option<(String, u64)>,
    /// Tag of the latest load; events carrying any other tag are stale.
    generation: u64,
    playing: bool,
    /// Last store volume seen, before mute is applied.
    volume: Option<f32>,
    muted: bool,
    current_time: f64,
    duration: f64,
    resume_pending: bool,
    last_saved_second: Option<u64>,
    save_interval: u64,
}

impl AudioSync {
    pub fn new(handle: Box<dyn MediaHandle>, save_interval_secs: u64) -> Self {
        Self {
            handle,
            loaded: None,
            generation: 0,
            playing: false,
            volume: None,
            muted: false,
            current_time: 0.0,
            duration: 0.0,
            resume_pending: false,
            last_saved_second: None,
            save_interval: save_interval_secs.max(1),
        }
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Generation handed to the backend with the most recent load.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn call(&mut self, what: &str, f: impl FnOnce(&mut dyn MediaHandle) -> Result<()>) {
        if let Err(e) = f(self.handle.as_mut()) {
            warn!("audio {what} failed: {e}");
        }
    }

    fn apply_volume(&mut self) {
        let effective = if self.muted {
            0.0
        } else {
            self.volume.unwrap_or(DEFAULT_VOLUME)
        };
        self.call("set_volume", |h| h.set_volume(effective));
    }

    /// Push whatever changed in `state` since the last call.
    pub fn sync(&mut self, state: &PlayerState) {
        if self.volume != Some(state.volume) {
            self.volume = Some(state.volume);
            self.apply_volume();
        }

        let Some(track) = state.current_track.as_ref() else {
            if self.loaded.take().is_some() {
                self.call("pause", |h| h.pause());
            }
            self.playing = false;
            self.current_time = 0.0;
            self.duration = 0.0;
            self.resume_pending = false;
            return;
        };

        let key = (track.id.clone(), state.load_seq);
        if self.loaded.as_ref() != Some(&key) {
            debug!("loading {} (seq {})", track.id, state.load_seq);
            self.loaded = Some(key);
            self.generation += 1;
            self.playing = false;
            self.current_time = 0.0;
            self.duration = track.duration;
            self.last_saved_second = None;
            self.resume_pending = state.resume_position(&track.id).is_some_and(|p| p > 0.0);
            let generation = self.generation;
            self.call("load", |h| h.load(track, generation));
        }

        if state.is_playing != self.playing {
            self.playing = state.is_playing;
            if self.playing {
                self.call("play", |h| h.play());
            } else {
                self.call("pause", |h| h.pause());
            }
        }
    }

    /// Local mute override; never reaches the store.
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        self.apply_volume();
    }

    /// Scrub to `position`, clamped to the known duration.
    pub fn seek_to(&mut self, position: f64) {
        if self.loaded.is_none() {
            return;
        }
        let mut target = position.max(0.0);
        if self.duration > 0.0 {
            target = target.min(self.duration);
        }
        self.current_time = target;
        self.resume_pending = false;
        self.call("seek", |h| h.seek(target));
    }

    pub fn seek_by(&mut self, delta: f64) {
        self.seek_to(self.current_time + delta);
    }

    /// Feed one backend event. Returns the action to dispatch, if any.
    pub fn handle_event(&mut self, event: MediaEvent, state: &PlayerState) -> Option<PlayerAction> {
        match event {
            MediaEvent::TimeUpdate {
                generation,
                position,
            } if self.is_current(generation) => self.on_time_update(position, state),
            MediaEvent::LoadedMetadata {
                generation,
                duration,
            } if self.is_current(generation) => {
                self.on_loaded_metadata(duration, state);
                None
            }
            MediaEvent::Ended { generation } if self.is_current(generation) => {
                self.on_ended(state)
            }
            MediaEvent::Error(message) => {
                warn!("playback error: {message}");
                None
            }
            stale => {
                debug!("dropping stale {stale:?}");
                None
            }
        }
    }

    /// Whether an event belongs to the source currently in the handle.
    fn is_current(&self, generation: u64) -> bool {
        self.loaded.is_some() && generation == self.generation
    }

    fn loaded_id(&self) -> Option<&str> {
        self.loaded.as_ref().map(|(id, _)| id.as_str())
    }

    fn on_time_update(&mut self, position: f64, state: &PlayerState) -> Option<PlayerAction> {
        self.current_time = position;
        if self.resume_pending {
            return None;
        }
        let track = state.current_track.as_ref()?;
        if self.loaded_id() != Some(track.id.as_str()) {
            return None;
        }

        let second = position.max(0.0).floor() as u64;
        if second == 0 || second % self.save_interval != 0 {
            return None;
        }
        if self.last_saved_second == Some(second) {
            return None;
        }
        self.last_saved_second = Some(second);
        Some(PlayerAction::UpdateTrackPosition {
            track_id: track.id.clone(),
            position,
        })
    }

    fn on_loaded_metadata(&mut self, duration: f64, state: &PlayerState) {
        if duration.is_finite() && duration > 0.0 {
            self.duration = duration;
        }
        if !self.resume_pending {
            return;
        }
        self.resume_pending = false;

        let Some(track) = state.current_track.as_ref() else {
            return;
        };
        let resume = state.resume_position(&track.id).unwrap_or(0.0);
        if resume > 0.0 && resume < self.duration {
            debug!("resuming {} at {resume:.1}s", track.id);
            self.current_time = resume;
            self.call("seek", |h| h.seek(resume));
        }
    }

    fn on_ended(&mut self, state: &PlayerState) -> Option<PlayerAction> {
        let track = state.current_track.as_ref()?;
        if self.loaded_id() != Some(track.id.as_str()) {
            return None;
        }
        if state.repeat_mode == RepeatMode::One {
            self.current_time = 0.0;
            self.last_saved_second = None;
            self.call("seek", |h| h.seek(0.0));
            self.call("play", |h| h.play());
            self.playing = true;
        }
        Some(PlayerAction::TrackEnded)
    }
}
