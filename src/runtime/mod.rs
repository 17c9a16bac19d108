use std::env;
use std::sync::Arc;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use log::{info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::api::{MusicApi, stored_token};
use crate::audio::{AudioPlayer, AudioSync};
use crate::library::scan;

mod cli;
mod event_loop;
mod logging;
mod settings;
mod startup;

use cli::Command;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, settings_problem) = settings::load_settings();
    let data_dir = settings.data_dir();
    logging::init(data_dir.as_deref());
    if let Some(problem) = settings_problem {
        warn!("{problem}");
    }
    info!("starting cadenza {}", env!("CARGO_PKG_VERSION"));

    let command = cli::parse(env::args().skip(1))?;
    let storage = startup::open_storage(data_dir);
    let timeout = Duration::from_secs(settings.api.timeout_secs);
    let mut api = MusicApi::new(
        &settings.api.base_url,
        timeout,
        stored_token(storage.as_ref()),
    )?;

    let import_dir = match command {
        Command::Play { import_dir } => import_dir,
        other => {
            let message = cli::run_session_command(other, &mut api, storage.as_ref())?;
            println!("{message}");
            return Ok(());
        }
    };

    let (audio_player, media_rx) = AudioPlayer::spawn(timeout);
    let audio = AudioSync::new(
        Box::new(audio_player),
        settings.playback.resume_save_interval_secs,
    );
    let (mut app, fetch_rx) = startup::build_app(&settings, storage, audio, Arc::new(api));

    app.refresh_popular();
    if let Some(dir) = import_dir {
        let tracks = scan(&dir, &settings.library);
        info!("found {} audio files under {}", tracks.len(), dir.display());
        app.import(tracks);
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &media_rx, &fetch_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("shutting down");
    run_result
}
