//! Library store transitions.

use crate::store::{Clock, Reducer, SystemClock};

use super::model::{LibraryState, Playlist, PlaylistDraft, Track, UPLOADS_PLAYLIST};

#[derive(Debug, Clone, PartialEq)]
pub enum LibraryAction {
    /// Add the id to favorites, or remove it if already there.
    ToggleFavorite(String),
    /// Create a playlist, or update the one whose id matches the draft.
    CreatePlaylist(PlaylistDraft),
    AddToPlaylist { playlist_id: String, track: Track },
    RemoveFromPlaylist { playlist_id: String, track_id: String },
    DeletePlaylist(String),
    /// Register an imported track and file it under "My Uploads".
    UploadTrack(Track),
    /// Forget an imported track everywhere (uploads, playlists, favorites).
    DeleteUploadedTrack(String),

    SearchPending,
    SearchFulfilled(Vec<Track>),
    SearchRejected(String),
    PopularPending,
    PopularFulfilled(Vec<Track>),
    PopularRejected(String),
}

pub struct LibraryReducer {
    clock: Box<dyn Clock>,
}

impl LibraryReducer {
    pub fn new() -> Self {
        Self::with_clock(Box::new(SystemClock))
    }

    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Millisecond timestamp id, bumped until it does not collide.
    fn fresh_playlist_id(&self, state: &LibraryState) -> String {
        let mut candidate = self.clock.now_millis();
        while state.playlist(&candidate.to_string()).is_some() {
            candidate += 1;
        }
        candidate.to_string()
    }
}

impl Default for LibraryReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for LibraryReducer {
    type State = LibraryState;
    type Action = LibraryAction;

    fn reduce(&mut self, state: &mut LibraryState, action: LibraryAction) -> bool {
        match action {
            LibraryAction::ToggleFavorite(track_id) => {
                match state.favorite_track_ids.iter().position(|id| *id == track_id) {
                    Some(pos) => {
                        state.favorite_track_ids.remove(pos);
                    }
                    None => state.favorite_track_ids.push(track_id),
                }
                true
            }

            LibraryAction::CreatePlaylist(draft) => {
                let existing_idx = draft
                    .id
                    .as_deref()
                    .and_then(|id| state.playlists.iter().position(|p| p.id == id));
                if let Some(idx) = existing_idx {
                    let existing = &mut state.playlists[idx];
                    existing.name = draft.name;
                    if let Some(tracks) = draft.tracks {
                        existing.tracks = tracks;
                    }
                    if let Some(cover) = draft.cover.filter(|c| !c.is_empty()) {
                        existing.cover = Some(cover);
                    }
                    if let Some(description) = draft.description.filter(|d| !d.is_empty()) {
                        existing.description = description;
                    }
                    return true;
                }

                let id = self.fresh_playlist_id(state);
                state.playlists.push(Playlist {
                    id,
                    name: draft.name,
                    tracks: draft.tracks.unwrap_or_default(),
                    description: draft.description.unwrap_or_default(),
                    cover: draft.cover,
                });
                true
            }

            LibraryAction::AddToPlaylist { playlist_id, track } => {
                let Some(playlist) = state.playlists.iter_mut().find(|p| p.id == playlist_id) else {
                    return false;
                };
                if playlist.contains(&track.id) {
                    return false;
                }
                playlist.tracks.push(track);
                true
            }

            LibraryAction::RemoveFromPlaylist {
                playlist_id,
                track_id,
            } => {
                let Some(playlist) = state.playlists.iter_mut().find(|p| p.id == playlist_id) else {
                    return false;
                };
                playlist.tracks.retain(|t| t.id != track_id);
                true
            }

            LibraryAction::DeletePlaylist(playlist_id) => {
                state.playlists.retain(|p| p.id != playlist_id);
                true
            }

            LibraryAction::UploadTrack(track) => {
                if state.is_uploaded(&track.id) {
                    return false;
                }
                state.uploaded_tracks.push(track.clone());

                match state.playlists.iter().position(|p| p.name == UPLOADS_PLAYLIST) {
                    Some(idx) => {
                        let uploads = &mut state.playlists[idx];
                        if !uploads.contains(&track.id) {
                            uploads.tracks.push(track);
                        }
                    }
                    None => {
                        let id = self.fresh_playlist_id(state);
                        state.playlists.push(Playlist {
                            id,
                            name: UPLOADS_PLAYLIST.to_string(),
                            cover: track.artwork.clone(),
                            tracks: vec![track],
                            description: "Tracks uploaded by you".to_string(),
                        });
                    }
                }
                true
            }

            LibraryAction::DeleteUploadedTrack(track_id) => {
                state.uploaded_tracks.retain(|t| t.id != track_id);
                for playlist in state.playlists.iter_mut() {
                    playlist.tracks.retain(|t| t.id != track_id);
                }
                state.favorite_track_ids.retain(|id| *id != track_id);
                true
            }

            LibraryAction::SearchPending | LibraryAction::PopularPending => {
                state.loading = true;
                state.error = None;
                true
            }
            LibraryAction::SearchFulfilled(results) => {
                state.loading = false;
                state.search_results = results;
                true
            }
            LibraryAction::PopularFulfilled(results) => {
                state.loading = false;
                state.popular_tracks = results;
                true
            }
            LibraryAction::SearchRejected(message) | LibraryAction::PopularRejected(message) => {
                state.loading = false;
                state.error = Some(message);
                true
            }
        }
    }
}
