use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::library::Track;

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, MediaEvent, MediaHandle};

/// rodio-backed [`MediaHandle`]. The output device lives on a dedicated
/// thread; commands go in over one channel and events come back over another.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    join: Option<JoinHandle<()>>,
}

impl AudioPlayer {
    /// Start the audio thread. `fetch_timeout` bounds downloads of remote
    /// sources. The receiver should be drained regularly by the event loop.
    pub fn spawn(fetch_timeout: Duration) -> (Self, Receiver<MediaEvent>) {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (event_tx, event_rx) = mpsc::channel::<MediaEvent>();
        let join = spawn_audio_thread(rx, event_tx, fetch_timeout);
        (
            Self {
                tx,
                join: Some(join),
            },
            event_rx,
        )
    }

    fn send(&self, cmd: AudioCmd) -> Result<()> {
        self.tx
            .send(cmd)
            .map_err(|_| Error::Audio("audio thread has stopped".to_string()))
    }
}

impl MediaHandle for AudioPlayer {
    fn load(&mut self, track: &Track, generation: u64) -> Result<()> {
        self.send(AudioCmd::Load {
            track: track.clone(),
            generation,
        })
    }

    fn play(&mut self) -> Result<()> {
        self.send(AudioCmd::Play)
    }

    fn pause(&mut self) -> Result<()> {
        self.send(AudioCmd::Pause)
    }

    fn seek(&mut self, position: f64) -> Result<()> {
        self.send(AudioCmd::Seek(position))
    }

    fn set_volume(&mut self, volume: f32) -> Result<()> {
        self.send(AudioCmd::SetVolume(volume))
    }
}

impl Drop for AudioPlayer {
    fn drop(&mut self) {
        let _ = self.tx.send(AudioCmd::Quit);
        if let Some(h) = self.join.take() {
            let _ = h.join();
        }
    }
}
