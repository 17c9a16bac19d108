//! Narrowed snapshots of the two stores, and their tolerant loaders.
//!
//! Only explicitly listed fields are persisted. Loading merges each field
//! it recognises over the caller's defaults, one field at a time: a missing
//! key, a malformed document or a mistyped field all fall back silently.

use std::collections::BTreeMap;

use log::warn;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::library::{LibraryState, Playlist, Track};
use crate::player::{PlayerState, RepeatMode, TrackResumeState, clamp_volume};

use super::storage::KeyValueStorage;

pub const PLAYER_KEY: &str = "playerState";
pub const LIBRARY_KEY: &str = "libraryState";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub volume: f32,
    pub repeat_mode: RepeatMode,
    pub shuffle_mode: bool,
    pub track_states: BTreeMap<String, TrackResumeState>,
}

impl From<&PlayerState> for PlayerSnapshot {
    fn from(state: &PlayerState) -> Self {
        Self {
            volume: state.volume,
            repeat_mode: state.repeat_mode,
            shuffle_mode: state.shuffle,
            track_states: state.track_states.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibrarySnapshot {
    pub playlists: Vec<Playlist>,
    pub favorite_track_ids: Vec<String>,
    pub uploaded_tracks: Vec<Track>,
}

impl From<&LibraryState> for LibrarySnapshot {
    fn from(state: &LibraryState) -> Self {
        Self {
            playlists: state.playlists.clone(),
            favorite_track_ids: state.favorite_track_ids.clone(),
            uploaded_tracks: state.uploaded_tracks.clone(),
        }
    }
}

/// Serialize `snapshot` under `key`.
pub fn save<T: Serialize>(
    storage: &dyn KeyValueStorage,
    key: &str,
    snapshot: &T,
) -> crate::error::Result<()> {
    let raw = serde_json::to_string(snapshot)?;
    storage.set(key, &raw)
}

/// Read `key` as a JSON object. `None` when absent or unusable.
fn read_object(storage: &dyn KeyValueStorage, key: &str) -> Option<Map<String, Value>> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!("reading {key} failed, using defaults: {e}");
            return None;
        }
    };
    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(map)) => Some(map),
        Ok(other) => {
            warn!("{key} is not an object ({other}), using defaults");
            None
        }
        Err(e) => {
            warn!("{key} is not valid JSON, using defaults: {e}");
            None
        }
    }
}

/// Overwrite `slot` with `map[field]` if that field parses as `T`.
fn merge_field<T: DeserializeOwned>(map: &Map<String, Value>, field: &str, slot: &mut T) {
    let Some(value) = map.get(field) else {
        return;
    };
    match serde_json::from_value::<T>(value.clone()) {
        Ok(parsed) => *slot = parsed,
        Err(e) => warn!("ignoring persisted field {field}: {e}"),
    }
}

/// Whether a player snapshot has been stored before.
pub fn has_player_snapshot(storage: &dyn KeyValueStorage) -> bool {
    read_object(storage, PLAYER_KEY).is_some()
}

/// Player state to start with: `defaults` with persisted settings merged in.
/// Queue, current track and the playing flag always start empty.
pub fn load_player_state(storage: &dyn KeyValueStorage, defaults: PlayerState) -> PlayerState {
    let mut state = PlayerState {
        current_track: None,
        is_playing: false,
        queue: Vec::new(),
        current_index: 0,
        load_seq: 0,
        ..defaults
    };
    if let Some(map) = read_object(storage, PLAYER_KEY) {
        merge_field(&map, "volume", &mut state.volume);
        merge_field(&map, "repeatMode", &mut state.repeat_mode);
        merge_field(&map, "shuffleMode", &mut state.shuffle);
        merge_field(&map, "trackStates", &mut state.track_states);
        state.volume = clamp_volume(state.volume);
    }
    state
}

/// Library state to start with. Transient lists and flags start empty.
pub fn load_library_state(storage: &dyn KeyValueStorage) -> LibraryState {
    let mut state = LibraryState::default();
    if let Some(map) = read_object(storage, LIBRARY_KEY) {
        merge_field(&map, "playlists", &mut state.playlists);
        merge_field(&map, "favoriteTrackIds", &mut state.favorite_track_ids);
        merge_field(&map, "uploadedTracks", &mut state.uploaded_tracks);
    }
    state
}
