//! Utilities for turning a `Track` into a playable `rodio` sink.
//!
//! Sources are read fully into memory (from disk, or over HTTP for remote
//! tracks) so a sink can be rebuilt at any offset without refetching.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use crate::error::{Error, Result};
use crate::library::Track;

pub(super) type SourceBytes = Arc<[u8]>;

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Read the whole audio source of `track`.
pub(super) fn fetch_source(http: &reqwest::blocking::Client, track: &Track) -> Result<SourceBytes> {
    let Some(source) = track.audio.as_deref() else {
        return Err(Error::Audio(format!("{} has no audio source", track.id)));
    };
    if is_remote(source) {
        let body = http.get(source).send()?.error_for_status()?.bytes()?;
        Ok(Arc::from(&body[..]))
    } else {
        Ok(Arc::from(std::fs::read(source)?))
    }
}

fn decode(bytes: &SourceBytes) -> Result<Decoder<Cursor<SourceBytes>>> {
    Decoder::new(Cursor::new(bytes.clone()))
        .map_err(|e| Error::Audio(format!("cannot decode source: {e}")))
}

/// Duration reported by the decoder, when the container knows it.
pub(super) fn probe_duration(bytes: &SourceBytes) -> Option<Duration> {
    decode(bytes).ok()?.total_duration()
}

/// Create a paused `Sink` over `bytes` that starts playback at `start_at`.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    bytes: &SourceBytes,
    start_at: Duration,
    volume: f32,
) -> Result<Sink> {
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    let source = decode(bytes)?.skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(volume);
    sink.append(source);
    sink.pause();
    Ok(sink)
}
