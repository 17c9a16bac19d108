use super::*;
use crate::store::{FixedClock, Store};

fn t(id: &str) -> Track {
    Track {
        id: id.into(),
        name: format!("Song {id}"),
        artist: "Artist".into(),
        album: None,
        artwork: None,
        audio: Some(format!("/music/{id}.mp3")),
        duration: 180.0,
    }
}

fn store() -> Store<LibraryReducer> {
    Store::new(
        LibraryReducer::with_clock(Box::new(FixedClock(1_700_000_000_000))),
        LibraryState::default(),
    )
}

fn only_playlist_id(store: &Store<LibraryReducer>) -> String {
    assert_eq!(store.state().playlists.len(), 1);
    store.state().playlists[0].id.clone()
}

#[test]
fn toggle_favorite_is_self_inverse() {
    let mut s = store();
    s.dispatch(LibraryAction::ToggleFavorite("x".into()));
    let before = s.state().favorite_track_ids.clone();

    s.dispatch(LibraryAction::ToggleFavorite("a".into()));
    assert!(s.state().is_favorite("a"));
    s.dispatch(LibraryAction::ToggleFavorite("a".into()));

    assert_eq!(s.state().favorite_track_ids, before);
    assert!(!s.state().is_favorite("a"));
}

#[test]
fn create_add_remove_leaves_empty_playlist() {
    let mut s = store();
    s.dispatch(LibraryAction::CreatePlaylist(PlaylistDraft::named("Favorites")));
    let id = only_playlist_id(&s);
    assert_eq!(id, "1700000000000");

    s.dispatch(LibraryAction::AddToPlaylist {
        playlist_id: id.clone(),
        track: t("T"),
    });
    assert_eq!(s.state().playlist(&id).unwrap().tracks.len(), 1);

    s.dispatch(LibraryAction::RemoveFromPlaylist {
        playlist_id: id.clone(),
        track_id: "T".into(),
    });
    let playlist = s.state().playlist(&id).unwrap();
    assert!(playlist.tracks.is_empty());
    assert_eq!(playlist.name, "Favorites");
}

#[test]
fn add_to_playlist_is_idempotent_per_track_id() {
    let mut s = store();
    s.dispatch(LibraryAction::CreatePlaylist(PlaylistDraft::named("Mix")));
    let id = only_playlist_id(&s);

    assert!(s.dispatch(LibraryAction::AddToPlaylist {
        playlist_id: id.clone(),
        track: t("A"),
    }));
    let after_first = s.state().clone();

    assert!(!s.dispatch(LibraryAction::AddToPlaylist {
        playlist_id: id.clone(),
        track: t("A"),
    }));
    assert_eq!(*s.state(), after_first);
}

#[test]
fn add_to_unknown_playlist_is_a_no_op() {
    let mut s = store();
    assert!(!s.dispatch(LibraryAction::AddToPlaylist {
        playlist_id: "nope".into(),
        track: t("A"),
    }));
}

#[test]
fn playlist_ids_stay_unique_under_a_frozen_clock() {
    let mut s = store();
    s.dispatch(LibraryAction::CreatePlaylist(PlaylistDraft::named("One")));
    s.dispatch(LibraryAction::CreatePlaylist(PlaylistDraft::named("Two")));
    let ids: Vec<&str> = s.state().playlists.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["1700000000000", "1700000000001"]);
}

#[test]
fn create_with_existing_id_updates_in_place() {
    let mut s = store();
    s.dispatch(LibraryAction::CreatePlaylist(PlaylistDraft {
        name: "Road".into(),
        description: Some("long drives".into()),
        cover: Some("road.jpg".into()),
        ..PlaylistDraft::default()
    }));
    let id = only_playlist_id(&s);

    s.dispatch(LibraryAction::CreatePlaylist(PlaylistDraft {
        id: Some(id.clone()),
        name: "Road trip".into(),
        tracks: Some(vec![t("A")]),
        cover: Some(String::new()),
        description: None,
    }));

    let p = s.state().playlist(&id).unwrap();
    assert_eq!(s.state().playlists.len(), 1);
    assert_eq!(p.name, "Road trip");
    assert_eq!(p.tracks, vec![t("A")]);
    assert_eq!(p.cover.as_deref(), Some("road.jpg"));
    assert_eq!(p.description, "long drives");
}

#[test]
fn delete_playlist_removes_it() {
    let mut s = store();
    s.dispatch(LibraryAction::CreatePlaylist(PlaylistDraft::named("Gone")));
    let id = only_playlist_id(&s);
    s.dispatch(LibraryAction::DeletePlaylist(id.clone()));
    assert!(s.state().playlist(&id).is_none());
}

#[test]
fn upload_files_tracks_under_my_uploads() {
    let mut s = store();
    s.dispatch(LibraryAction::UploadTrack(t("U1")));
    s.dispatch(LibraryAction::UploadTrack(t("U2")));
    assert!(!s.dispatch(LibraryAction::UploadTrack(t("U1"))));

    let state = s.state();
    assert_eq!(state.uploaded_tracks.len(), 2);
    let uploads = state
        .playlists
        .iter()
        .find(|p| p.name == UPLOADS_PLAYLIST)
        .unwrap();
    assert_eq!(uploads.tracks, vec![t("U1"), t("U2")]);
    assert_eq!(uploads.description, "Tracks uploaded by you");
}

#[test]
fn upload_reuses_an_existing_uploads_playlist() {
    let mut s = store();
    s.dispatch(LibraryAction::CreatePlaylist(PlaylistDraft::named(UPLOADS_PLAYLIST)));
    s.dispatch(LibraryAction::UploadTrack(t("U1")));

    let id = only_playlist_id(&s);
    assert_eq!(s.state().playlist(&id).unwrap().tracks, vec![t("U1")]);
}

#[test]
fn delete_uploaded_track_scrubs_every_reference() {
    let mut s = store();
    s.dispatch(LibraryAction::UploadTrack(t("U1")));
    s.dispatch(LibraryAction::CreatePlaylist(PlaylistDraft {
        name: "Other".into(),
        tracks: Some(vec![t("U1"), t("B")]),
        ..PlaylistDraft::default()
    }));
    s.dispatch(LibraryAction::ToggleFavorite("U1".into()));

    s.dispatch(LibraryAction::DeleteUploadedTrack("U1".into()));

    let state = s.state();
    assert!(state.uploaded_tracks.is_empty());
    assert!(!state.is_favorite("U1"));
    for p in &state.playlists {
        assert!(!p.contains("U1"), "{} still holds U1", p.name);
    }
    assert_eq!(state.playlists.len(), 2);
}

#[test]
fn fetch_lifecycle_sets_and_clears_flags() {
    let mut s = store();
    s.dispatch(LibraryAction::SearchRejected("boom".into()));
    assert_eq!(s.state().error.as_deref(), Some("boom"));

    s.dispatch(LibraryAction::SearchPending);
    assert!(s.state().loading);
    assert!(s.state().error.is_none());

    s.dispatch(LibraryAction::SearchFulfilled(vec![t("A")]));
    assert!(!s.state().loading);
    assert_eq!(s.state().search_results, vec![t("A")]);

    s.dispatch(LibraryAction::PopularPending);
    s.dispatch(LibraryAction::PopularRejected("down".into()));
    assert!(!s.state().loading);
    assert_eq!(s.state().error.as_deref(), Some("down"));
    assert!(s.state().popular_tracks.is_empty());
}

#[test]
fn last_search_response_to_arrive_wins() {
    let mut s = store();
    s.dispatch(LibraryAction::SearchPending);
    s.dispatch(LibraryAction::SearchPending);
    // Responses resolve out of order: the newer query's results land first.
    s.dispatch(LibraryAction::SearchFulfilled(vec![t("new")]));
    s.dispatch(LibraryAction::SearchFulfilled(vec![t("old")]));
    assert_eq!(s.state().search_results, vec![t("old")]);
}

#[test]
fn validation_rejects_blank_names_and_incomplete_uploads() {
    assert!(validate::playlist_name("   ").is_err());
    assert_eq!(validate::playlist_name("  Chill ").unwrap(), "Chill");

    assert!(validate::upload(&t("ok")).is_ok());
    let mut no_audio = t("x");
    no_audio.audio = None;
    assert!(validate::upload(&no_audio).is_err());
    let mut no_artist = t("y");
    no_artist.artist = " ".into();
    assert!(validate::upload(&no_artist).is_err());
}

#[test]
fn track_json_uses_catalogue_field_names() {
    let raw = r#"{"id":"42","name":"Song","artist_name":"Band","album_name":"LP",
                 "image":"cover.jpg","audio":"https://x/42.mp3","duration":215,"extra":true}"#;
    let track: Track = serde_json::from_str(raw).unwrap();
    assert_eq!(track.artist, "Band");
    assert_eq!(track.album.as_deref(), Some("LP"));
    assert_eq!(track.artwork.as_deref(), Some("cover.jpg"));
    assert_eq!(track.duration, 215.0);
    assert_eq!(track.display(), "Band - Song");
}
