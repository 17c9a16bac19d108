use super::*;
use crate::library::{LibraryAction, LibraryReducer, LibraryState, PlaylistDraft, Track};
use crate::player::{PlayerAction, PlayerReducer, PlayerState, RepeatMode};
use crate::store::{FixedClock, Store};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::Value;
use std::rc::Rc;

fn t(id: &str) -> Track {
    Track {
        id: id.into(),
        name: id.into(),
        artist: "Artist".into(),
        album: Some("Album".into()),
        artwork: None,
        audio: Some(format!("/music/{id}.mp3")),
        duration: 120.0,
    }
}

fn player_store(storage: &Rc<MemoryStorage>) -> Store<PlayerReducer> {
    let initial = load_player_state(storage.as_ref(), PlayerState::default());
    let mut store = Store::new(
        PlayerReducer::with_parts(Box::new(FixedClock(5_000)), StdRng::seed_from_u64(3)),
        initial,
    );
    persist_player(&mut store, storage.clone());
    store
}

fn stored_json(storage: &MemoryStorage, key: &str) -> Value {
    let raw = storage.get(key).unwrap().expect("key written");
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn invalid_player_json_falls_back_to_defaults() {
    let storage = MemoryStorage::new();
    storage.set(PLAYER_KEY, "{not json").unwrap();

    let state = load_player_state(&storage, PlayerState::default());
    assert_eq!(state.volume, 0.7);
    assert_eq!(state.repeat_mode, RepeatMode::None);
    assert!(!state.shuffle);
    assert!(state.track_states.is_empty());
    assert!(!has_player_snapshot(&storage));
}

#[test]
fn non_object_document_falls_back_to_defaults() {
    let storage = MemoryStorage::new();
    storage.set(LIBRARY_KEY, "[1,2,3]").unwrap();
    assert_eq!(load_library_state(&storage), LibraryState::default());
}

#[test]
fn recognised_fields_merge_one_by_one() {
    let storage = MemoryStorage::new();
    storage
        .set(
            PLAYER_KEY,
            r#"{"volume":"loud","repeatMode":"one","shuffleMode":true,"unknown":1}"#,
        )
        .unwrap();

    let state = load_player_state(&storage, PlayerState::default());
    assert_eq!(state.volume, 0.7);
    assert_eq!(state.repeat_mode, RepeatMode::One);
    assert!(state.shuffle);
}

#[test]
fn zero_volume_survives_a_reload() {
    let storage = MemoryStorage::new();
    storage.set(PLAYER_KEY, r#"{"volume":0}"#).unwrap();
    assert_eq!(load_player_state(&storage, PlayerState::default()).volume, 0.0);
}

#[test]
fn player_snapshot_is_narrowed_and_restorable() {
    let storage = Rc::new(MemoryStorage::new());
    {
        let mut store = player_store(&storage);
        store.dispatch(PlayerAction::SetQueue(vec![t("A"), t("B")]));
        store.dispatch(PlayerAction::SelectQueueIndex(0));
        store.dispatch(PlayerAction::UpdateTrackPosition {
            track_id: "A".into(),
            position: 33.5,
        });
        store.dispatch(PlayerAction::SetVolume(0.4));
        store.dispatch(PlayerAction::ToggleRepeatMode);
        store.dispatch(PlayerAction::ToggleShuffleMode);
    }

    let json = stored_json(&storage, PLAYER_KEY);
    let obj = json.as_object().unwrap();
    let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["repeatMode", "shuffleMode", "trackStates", "volume"]);
    assert_eq!(json["repeatMode"], "all");
    assert_eq!(json["trackStates"]["A"]["lastPosition"], 33.5);
    assert_eq!(json["trackStates"]["A"]["lastPlayed"], 5_000);

    let restored = player_store(&storage);
    let state = restored.state();
    assert_eq!(state.volume, 0.4);
    assert_eq!(state.repeat_mode, RepeatMode::All);
    assert!(state.shuffle);
    assert_eq!(state.resume_position("A"), Some(33.5));
    assert!(state.queue.is_empty());
    assert!(state.current_track.is_none());
    assert!(!state.is_playing);
}

#[test]
fn no_op_actions_do_not_write() {
    let storage = Rc::new(MemoryStorage::new());
    let mut store = player_store(&storage);
    store.dispatch(PlayerAction::NextTrack);
    store.dispatch(PlayerAction::UpdateTrackPosition {
        track_id: "ghost".into(),
        position: 1.0,
    });
    assert!(storage.get(PLAYER_KEY).unwrap().is_none());
}

#[test]
fn library_snapshot_round_trips_persistent_fields_only() {
    let storage = Rc::new(MemoryStorage::new());
    {
        let mut store = Store::new(
            LibraryReducer::with_clock(Box::new(FixedClock(9))),
            load_library_state(storage.as_ref()),
        );
        persist_library(&mut store, storage.clone());
        store.dispatch(LibraryAction::CreatePlaylist(PlaylistDraft::named("Mix")));
        store.dispatch(LibraryAction::AddToPlaylist {
            playlist_id: "9".into(),
            track: t("A"),
        });
        store.dispatch(LibraryAction::ToggleFavorite("A".into()));
        store.dispatch(LibraryAction::UploadTrack(t("U")));
        store.dispatch(LibraryAction::SearchFulfilled(vec![t("S")]));
        store.dispatch(LibraryAction::PopularRejected("down".into()));
    }

    let json = stored_json(&storage, LIBRARY_KEY);
    assert!(json.get("searchResults").is_none());
    assert!(json.get("error").is_none());
    assert_eq!(json["favoriteTrackIds"][0], "A");
    assert_eq!(json["uploadedTracks"][0]["artist_name"], "Artist");

    let state = load_library_state(storage.as_ref());
    assert_eq!(state.playlists.len(), 2);
    assert_eq!(state.playlist("9").unwrap().tracks, vec![t("A")]);
    assert!(state.is_favorite("A"));
    assert_eq!(state.uploaded_tracks, vec![t("U")]);
    assert!(state.search_results.is_empty());
    assert!(state.error.is_none());
}

#[test]
fn file_storage_round_trips_and_treats_missing_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path().join("nested"));

    assert_eq!(storage.get(PLAYER_KEY).unwrap(), None);
    storage.set(PLAYER_KEY, r#"{"volume":0.5}"#).unwrap();
    assert_eq!(
        storage.get(PLAYER_KEY).unwrap().as_deref(),
        Some(r#"{"volume":0.5}"#)
    );
    assert!(dir.path().join("nested").join("playerState.json").exists());

    storage.remove(PLAYER_KEY).unwrap();
    storage.remove(PLAYER_KEY).unwrap();
    assert_eq!(storage.get(PLAYER_KEY).unwrap(), None);
}

#[test]
fn file_storage_rejects_path_like_keys() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path());
    assert!(storage.set("../escape", "x").is_err());
    assert!(storage.get("").is_err());
}
