use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, InputMode, Pane};
use crate::audio::MediaEvent;
use crate::config;
use crate::library::LibraryAction;
use crate::ui;

/// Main terminal event loop: drains backend events and catalogue results,
/// draws, and handles input. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    media_rx: &Receiver<MediaEvent>,
    fetch_rx: &Receiver<LibraryAction>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        while let Ok(ev) = media_rx.try_recv() {
            app.on_media_event(ev);
        }
        while let Ok(action) = fetch_rx.try_recv() {
            app.on_fetch_result(action);
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.controls))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, app) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Apply one key press. Returns `true` when the user asked to quit.
pub fn handle_key_event(key: KeyEvent, app: &mut App) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    if app.input_mode != InputMode::Normal {
        match key.code {
            KeyCode::Esc => app.cancel_input(),
            KeyCode::Enter => app.submit_input(),
            KeyCode::Backspace => app.pop_input(),
            KeyCode::Char(c) => app.push_input(c),
            _ => {}
        }
        return false;
    }

    app.status = None;
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => app.move_selection(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_selection(-1),
        KeyCode::Enter => app.activate(),
        KeyCode::Esc | KeyCode::Backspace => app.close_playlist(),
        KeyCode::Char(' ') | KeyCode::Char('p') => app.toggle_play_pause(),
        KeyCode::Char('h') | KeyCode::Left => app.prev_track(),
        KeyCode::Char('l') | KeyCode::Right => app.next_track(),
        KeyCode::Char('H') => app.scrub(false),
        KeyCode::Char('L') => app.scrub(true),
        KeyCode::Char('+') | KeyCode::Char('=') => app.change_volume(app.volume_step),
        KeyCode::Char('-') => app.change_volume(-app.volume_step),
        KeyCode::Char('m') => app.toggle_mute(),
        KeyCode::Char('r') => app.cycle_repeat(),
        KeyCode::Char('s') => app.toggle_shuffle(),
        KeyCode::Char('f') => app.toggle_favorite(),
        KeyCode::Char('a') => app.add_selected_to_queue(),
        KeyCode::Char('c') => app.clear_queue(),
        KeyCode::Char('/') => app.begin_input(InputMode::Search),
        KeyCode::Char('n') => app.begin_input(InputMode::NewPlaylist),
        KeyCode::Char('P') => app.add_to_target_playlist(),
        KeyCode::Char('x') => app.remove_selected(),
        KeyCode::Char('R') => app.refresh_popular(),
        KeyCode::Char('1') => app.show_pane(Pane::Popular),
        KeyCode::Char('2') => app.show_pane(Pane::Search),
        KeyCode::Char('3') => app.show_pane(Pane::Playlists),
        KeyCode::Char('4') => app.show_pane(Pane::Queue),
        KeyCode::Tab => app.next_pane(),
        _ => {}
    }
    false
}
