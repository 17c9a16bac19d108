//! Import of local audio files as library tracks.
//!
//! Files found here are dispatched as uploads; their `audio` source is the
//! file path and their id is derived from it, so re-importing the same
//! directory is a no-op.

use std::path::Path;

use lofty::prelude::*;
use log::debug;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::Track;

const LOCAL_ID_PREFIX: &str = "local:";

/// Stable track id for a local file.
pub fn local_track_id(path: &Path) -> String {
    format!("{}{}", LOCAL_ID_PREFIX, path.display())
}

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
        return false;
    };
    let ext = ext.to_ascii_lowercase();
    settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .any(|e| !e.is_empty() && e == ext)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn non_blank(value: Option<std::borrow::Cow<'_, str>>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Build a track from one file, reading tags when the file has any.
fn read_track(path: &Path) -> Track {
    let mut name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string();
    let mut artist: Option<String> = None;
    let mut album: Option<String> = None;
    let mut duration = 0.0;

    match lofty::read_from_path(path) {
        Ok(tagged) => {
            duration = tagged.properties().duration().as_secs_f64();
            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(title) = non_blank(tag.title()) {
                    name = title;
                }
                artist = non_blank(tag.artist());
                album = non_blank(tag.album());
            }
        }
        Err(e) => debug!("no tags for {}: {e}", path.display()),
    }

    Track {
        id: local_track_id(path),
        name,
        artist: artist.unwrap_or_else(|| "Unknown artist".to_string()),
        album,
        artwork: None,
        audio: Some(path.display().to_string()),
        duration,
    }
}

/// Walk `dir` and return every audio file as a track, sorted by display text.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut tracks: Vec<Track> = walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() || e.path().is_file())
        .filter(|e| is_audio_file(e.path(), settings))
        .map(|e| read_track(e.path()))
        .collect();

    tracks.sort_by_key(|t| t.display().to_lowercase());
    tracks
}
