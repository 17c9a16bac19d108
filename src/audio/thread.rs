use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use log::{debug, error, warn};
use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::library::Track;

use super::sink::{SourceBytes, create_sink_at, fetch_source, probe_duration};
use super::types::{AudioCmd, MediaEvent};

const TICK: Duration = Duration::from_millis(200);

/// Playback state owned by the audio thread.
struct Deck {
    bytes: Option<SourceBytes>,
    sink: Option<Sink>,
    /// Where the current sink started inside the source.
    offset: Duration,
    paused: bool,
    ended: bool,
    volume: f32,
    /// Generation of the last load, echoed in every playback event.
    generation: u64,
}

impl Deck {
    fn new() -> Self {
        Self {
            bytes: None,
            sink: None,
            offset: Duration::ZERO,
            paused: true,
            ended: false,
            volume: 1.0,
            generation: 0,
        }
    }

    fn position(&self) -> Duration {
        self.offset + self.sink.as_ref().map_or(Duration::ZERO, Sink::get_pos)
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
    }

    /// Replace the sink with a fresh one starting at `at`, keeping the
    /// paused/playing state.
    fn rebuild_at(&mut self, stream: &OutputStream, at: Duration) -> crate::error::Result<()> {
        let Some(bytes) = self.bytes.as_ref() else {
            return Ok(());
        };
        let sink = create_sink_at(stream, bytes, at, self.volume)?;
        if !self.paused {
            sink.play();
        }
        self.stop();
        self.sink = Some(sink);
        self.offset = at;
        self.ended = false;
        Ok(())
    }

    fn load(
        &mut self,
        stream: &OutputStream,
        http: &reqwest::blocking::Client,
        track: &Track,
    ) -> crate::error::Result<f64> {
        self.stop();
        self.bytes = None;
        self.paused = true;
        self.ended = false;
        self.offset = Duration::ZERO;

        let bytes = fetch_source(http, track)?;
        let duration = probe_duration(&bytes)
            .map(|d| d.as_secs_f64())
            .unwrap_or(track.duration);
        self.sink = Some(create_sink_at(stream, &bytes, Duration::ZERO, self.volume)?);
        self.bytes = Some(bytes);
        Ok(duration)
    }

    fn play(&mut self, stream: &OutputStream) -> crate::error::Result<()> {
        self.paused = false;
        let drained = self.sink.as_ref().is_none_or(Sink::empty);
        if drained {
            // Finished or never built: start over from the top.
            return self.rebuild_at(stream, Duration::ZERO);
        }
        if let Some(s) = self.sink.as_ref() {
            s.play();
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
        if let Some(s) = self.sink.as_ref() {
            s.pause();
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(s) = self.sink.as_ref() {
            s.set_volume(volume);
        }
    }
}

/// Answer every command with an error until told to quit.
fn refuse_commands(rx: &Receiver<AudioCmd>, events: &Sender<MediaEvent>, reason: &str) {
    for cmd in rx.iter() {
        if matches!(cmd, AudioCmd::Quit) {
            break;
        }
        let _ = events.send(MediaEvent::Error(reason.to_string()));
    }
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<MediaEvent>,
    fetch_timeout: Duration,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(e) => {
                error!("no audio output device: {e}");
                refuse_commands(&rx, &events, "no audio output device");
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        let http = match reqwest::blocking::Client::builder()
            .timeout(fetch_timeout)
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                error!("cannot build HTTP client for remote sources: {e}");
                refuse_commands(&rx, &events, "audio backend unavailable");
                return;
            }
        };

        let mut deck = Deck::new();

        loop {
            match rx.recv_timeout(TICK) {
                Ok(cmd) => {
                    debug!("audio command {cmd:?}");
                    let outcome = match cmd {
                        AudioCmd::Load { track, generation } => {
                            deck.generation = generation;
                            deck.load(&stream, &http, &track).map(|duration| {
                                let _ = events.send(MediaEvent::LoadedMetadata {
                                    generation,
                                    duration,
                                });
                            })
                        }
                        AudioCmd::Play => deck.play(&stream),
                        AudioCmd::Pause => {
                            deck.pause();
                            Ok(())
                        }
                        AudioCmd::Seek(secs) => {
                            let at = Duration::from_secs_f64(secs.max(0.0));
                            let rebuilt = deck.rebuild_at(&stream, at);
                            if rebuilt.is_ok() && deck.sink.is_some() {
                                let _ = events.send(MediaEvent::TimeUpdate {
                                    generation: deck.generation,
                                    position: at.as_secs_f64(),
                                });
                            }
                            rebuilt
                        }
                        AudioCmd::SetVolume(v) => {
                            deck.set_volume(v);
                            Ok(())
                        }
                        AudioCmd::Quit => {
                            deck.stop();
                            break;
                        }
                    };
                    if let Err(e) = outcome {
                        warn!("audio backend: {e}");
                        let _ = events.send(MediaEvent::Error(e.to_string()));
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    if deck.paused || deck.ended {
                        continue;
                    }
                    let Some(sink) = deck.sink.as_ref() else {
                        continue;
                    };
                    if sink.empty() {
                        deck.ended = true;
                        let _ = events.send(MediaEvent::Ended {
                            generation: deck.generation,
                        });
                    } else {
                        let _ = events.send(MediaEvent::TimeUpdate {
                            generation: deck.generation,
                            position: deck.position().as_secs_f64(),
                        });
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}
