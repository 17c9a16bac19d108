//! Player store transitions.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::library::Track;
use crate::store::{Clock, Reducer, SystemClock};

use super::model::{PlayerState, RepeatMode, TrackResumeState, clamp_volume};
use super::queue::{next_index, prev_index};

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerAction {
    /// Make `track` current and start playing it.
    SetCurrentTrack(Track),
    TogglePlayPause,
    /// Replace the queue. The current track is left alone; so is the index,
    /// unless the new queue is too short for it, in which case it becomes 0.
    SetQueue(Vec<Track>),
    AddToQueue(Track),
    NextTrack,
    PrevTrack,
    /// Jump to a queue entry and start playing it.
    SelectQueueIndex(usize),
    SetVolume(f32),
    ToggleRepeatMode,
    ToggleShuffleMode,
    /// Record playback progress; ignored for tracks without a resume entry.
    UpdateTrackPosition { track_id: String, position: f64 },
    ClearQueue,
    /// The audio output reached the end of the current track.
    TrackEnded,
    /// Drop the resume entry of a track that no longer exists.
    ForgetTrack(String),
}

pub struct PlayerReducer {
    clock: Box<dyn Clock>,
    rng: StdRng,
}

impl PlayerReducer {
    pub fn new() -> Self {
        Self::with_parts(Box::new(SystemClock), StdRng::from_entropy())
    }

    pub fn with_parts(clock: Box<dyn Clock>, rng: StdRng) -> Self {
        Self { clock, rng }
    }

    fn advance(&mut self, state: &mut PlayerState, forward: bool) -> bool {
        let len = state.queue.len();
        if len == 0 {
            return false;
        }
        let now = self.clock.now_millis();

        // The outgoing track restarts from zero next time.
        if let Some(id) = state.current_track.as_ref().map(|t| t.id.clone()) {
            let entry = resume_entry(state, id, now);
            entry.last_position = 0.0;
            entry.last_played = now;
        }

        let next = if forward {
            next_index(len, state.current_index, state.shuffle, &mut self.rng)
        } else {
            prev_index(len, state.current_index)
        };
        land_on(state, next, now);
        true
    }
}

impl Default for PlayerReducer {
    fn default() -> Self {
        Self::new()
    }
}

fn resume_entry(state: &mut PlayerState, track_id: String, now: i64) -> &mut TrackResumeState {
    state
        .track_states
        .entry(track_id)
        .or_insert(TrackResumeState {
            last_position: 0.0,
            last_played: now,
        })
}

/// Create the resume entry on first sight, otherwise stamp `last_played`.
fn touch(state: &mut PlayerState, track_id: &str, now: i64) {
    resume_entry(state, track_id.to_string(), now).last_played = now;
}

fn land_on(state: &mut PlayerState, index: usize, now: i64) {
    let track = state.queue[index].clone();
    touch(state, &track.id, now);
    state.current_index = index;
    state.current_track = Some(track);
    state.load_seq += 1;
}

impl Reducer for PlayerReducer {
    type State = PlayerState;
    type Action = PlayerAction;

    fn reduce(&mut self, state: &mut PlayerState, action: PlayerAction) -> bool {
        match action {
            PlayerAction::SetCurrentTrack(track) => {
                touch(state, &track.id, self.clock.now_millis());
                state.current_track = Some(track);
                state.is_playing = true;
                state.load_seq += 1;
                true
            }

            PlayerAction::TogglePlayPause => {
                state.is_playing = !state.is_playing;
                true
            }

            PlayerAction::SetQueue(tracks) => {
                state.queue = tracks;
                // Keep the index addressable; it is otherwise untouched.
                if state.current_index >= state.queue.len() {
                    state.current_index = 0;
                }
                true
            }

            PlayerAction::AddToQueue(track) => {
                state.queue.push(track);
                true
            }

            PlayerAction::NextTrack => self.advance(state, true),
            PlayerAction::PrevTrack => self.advance(state, false),

            PlayerAction::SelectQueueIndex(index) => {
                if index >= state.queue.len() {
                    return false;
                }
                land_on(state, index, self.clock.now_millis());
                state.is_playing = true;
                true
            }

            PlayerAction::SetVolume(v) => {
                state.volume = clamp_volume(v);
                true
            }

            PlayerAction::ToggleRepeatMode => {
                state.repeat_mode = state.repeat_mode.cycle();
                true
            }

            PlayerAction::ToggleShuffleMode => {
                state.shuffle = !state.shuffle;
                true
            }

            PlayerAction::UpdateTrackPosition { track_id, position } => {
                match state.track_states.get_mut(&track_id) {
                    Some(entry) => {
                        entry.last_position = position.max(0.0);
                        true
                    }
                    None => false,
                }
            }

            PlayerAction::ClearQueue => {
                state.queue.clear();
                state.current_index = 0;
                true
            }

            PlayerAction::TrackEnded => {
                if state.repeat_mode != RepeatMode::One {
                    return self.advance(state, true);
                }
                let now = self.clock.now_millis();
                if let Some(id) = state.current_track.as_ref().map(|t| t.id.clone()) {
                    let entry = resume_entry(state, id, now);
                    entry.last_position = 0.0;
                    entry.last_played = now;
                }
                state.is_playing = true;
                true
            }

            PlayerAction::ForgetTrack(track_id) => state.track_states.remove(&track_id).is_some(),
        }
    }
}
