//! Client-side checks run before a library action is dispatched.

use crate::error::{Error, Result};

use super::model::Track;

/// Trimmed playlist name, or an error when it is blank.
pub fn playlist_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(Error::Validation("Playlist name cannot be empty".into()));
    }
    Ok(name.to_string())
}

/// An imported track needs a name, an artist and something to play.
pub fn upload(track: &Track) -> Result<()> {
    if track.name.trim().is_empty() {
        return Err(Error::Validation("Track name is required".into()));
    }
    if track.artist.trim().is_empty() {
        return Err(Error::Validation("Artist is required".into()));
    }
    if track.audio.as_deref().map(str::trim).unwrap_or("").is_empty() {
        return Err(Error::Validation("An audio file is required".into()));
    }
    Ok(())
}
