//! Catalogue and library value types.

use serde::{Deserialize, Serialize};

/// Name of the playlist that collects imported tracks.
pub const UPLOADS_PLAYLIST: &str = "My Uploads";

/// A playable track. Identity is `id`; values are never mutated once built.
///
/// Field names on the wire follow the catalogue service
/// (`artist_name`, `album_name`, `image`, `audio`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    #[serde(rename = "artist_name", default)]
    pub artist: String,
    #[serde(rename = "album_name", default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    /// Artwork reference.
    #[serde(rename = "image", default, skip_serializing_if = "Option::is_none")]
    pub artwork: Option<String>,
    /// Audio source: a local path or an http(s) URL.
    #[serde(rename = "audio", default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    /// Length in seconds; 0 when unknown.
    #[serde(default)]
    pub duration: f64,
}

impl Track {
    /// "Artist - Name", or just the name when the artist is blank.
    pub fn display(&self) -> String {
        let artist = self.artist.trim();
        if artist.is_empty() {
            self.name.clone()
        } else {
            format!("{} - {}", artist, self.name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
}

impl Playlist {
    pub fn contains(&self, track_id: &str) -> bool {
        self.tracks.iter().any(|t| t.id == track_id)
    }
}

/// Input for creating a playlist, or updating one when `id` matches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaylistDraft {
    pub id: Option<String>,
    pub name: String,
    pub tracks: Option<Vec<Track>>,
    pub cover: Option<String>,
    pub description: Option<String>,
}

impl PlaylistDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Everything the library store holds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LibraryState {
    pub favorite_track_ids: Vec<String>,
    pub playlists: Vec<Playlist>,
    pub uploaded_tracks: Vec<Track>,
    pub search_results: Vec<Track>,
    pub popular_tracks: Vec<Track>,
    pub loading: bool,
    pub error: Option<String>,
}

impl LibraryState {
    pub fn is_favorite(&self, track_id: &str) -> bool {
        self.favorite_track_ids.iter().any(|id| id == track_id)
    }

    pub fn playlist(&self, playlist_id: &str) -> Option<&Playlist> {
        self.playlists.iter().find(|p| p.id == playlist_id)
    }

    pub fn is_uploaded(&self, track_id: &str) -> bool {
        self.uploaded_tracks.iter().any(|t| t.id == track_id)
    }
}
