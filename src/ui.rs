//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{App, InputMode};
use crate::config::{ControlsSettings, UiSettings};
use crate::player::PlayerStatus;

/// Key bindings shown in the footer, in display order.
const CONTROLS: &[(&str, &str)] = &[
    ("j/k", "up/down"),
    ("enter", "play/open"),
    ("space/p", "play/pause"),
    ("h/l", "prev/next"),
    ("+/-", "volume"),
    ("m", "mute"),
    ("r", "repeat"),
    ("s", "shuffle"),
    ("f", "favorite"),
    ("a", "queue"),
    ("c", "clear queue"),
    ("/", "search"),
    ("n", "new playlist"),
    ("P", "add to playlist"),
    ("x", "remove"),
    ("tab", "pane"),
    ("q", "quit"),
];

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    let mut parts: Vec<String> = CONTROLS
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect();
    parts.insert(4, format!("[H/L] scrub -/+{scrub_seconds}s"));
    parts.join(" | ")
}

/// Format seconds as `MM:SS`.
fn format_mmss(secs: f64) -> String {
    let secs = secs.max(0.0) as u64;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn status_text(app: &App) -> String {
    let player = app.player_state();
    let library = app.library_state();
    let audio = app.audio();
    let mut parts: Vec<String> = Vec::new();

    match (player.status(), player.current_track.as_ref()) {
        (PlayerStatus::Idle, _) | (_, None) => parts.push("Stopped".to_string()),
        (status, Some(track)) => {
            let state = if status == PlayerStatus::Playing {
                "Playing"
            } else {
                "Paused"
            };
            parts.push(format!(
                "{state}: {} [{} / {}]",
                track.display(),
                format_mmss(audio.current_time()),
                format_mmss(audio.duration())
            ));
        }
    }

    if audio.is_muted() {
        parts.push("Volume: muted".to_string());
    } else {
        parts.push(format!("Volume: {:.0}%", player.volume * 100.0));
    }
    parts.push(player.repeat_mode.label().to_string());
    parts.push(if player.shuffle { "Shuffle: ON" } else { "Shuffle: OFF" }.to_string());

    if library.loading {
        parts.push("Loading…".to_string());
    }
    if let Some(err) = &library.error {
        parts.push(format!("Error: {err}"));
    }
    if let Some(msg) = &app.status {
        parts.push(msg.clone());
    }

    parts.join(" • ")
}

/// Visible window of `total` rows around `selected` that fits `height`.
fn window(total: usize, selected: usize, height: usize) -> (usize, usize) {
    if total <= height || height == 0 {
        return (0, total);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

fn list_rows(app: &App) -> (String, Vec<String>) {
    let library = app.library_state();
    if app.shows_playlist_overview() {
        let rows = library
            .playlists
            .iter()
            .map(|p| {
                let marker = if app.target_playlist.as_deref() == Some(p.id.as_str()) {
                    "* "
                } else {
                    "  "
                };
                format!("{marker}{} ({} tracks)", p.name, p.tracks.len())
            })
            .collect();
        return (app.pane.title().to_string(), rows);
    }

    let title = match app.opened() {
        Some(p) if !p.description.is_empty() => format!(" {} - {} ", p.name, p.description),
        Some(p) => format!(" {} ", p.name),
        None => app.pane.title().to_string(),
    };

    let player = app.player_state();
    let playing_id = player.current_track.as_ref().map(|t| t.id.as_str());
    let rows = app
        .visible_tracks()
        .iter()
        .map(|t| {
            let heart = if library.is_favorite(&t.id) { "♥ " } else { "  " };
            let now = if Some(t.id.as_str()) == playing_id { "▶ " } else { "" };
            format!("{heart}{now}{} [{}]", t.display(), format_mmss(t.duration))
        })
        .collect();
    (title, rows)
}

/// Render the entire UI into the provided `frame`.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" cadenza ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let status = Paragraph::new(status_text(app))
        .block(Block::bordered().padding(left_pad()).title(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[1]);

    draw_list(frame, app, chunks[2]);

    // Input line
    let (label, text) = match app.input_mode {
        InputMode::Normal => (" input ", String::new()),
        InputMode::Search => (" search ", format!("{}_", app.input)),
        InputMode::NewPlaylist => (" new playlist ", format!("{}_", app.input)),
    };
    let input = Paragraph::new(text).block(Block::bordered().padding(left_pad()).title(label));
    frame.render_widget(input, chunks[3]);

    let footer = Paragraph::new(controls_text(controls_settings.scrub_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(left_pad()),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}

fn left_pad() -> Padding {
    Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    }
}

fn draw_list(frame: &mut Frame, app: &App, area: Rect) {
    let (title, rows) = list_rows(app);
    let total = rows.len();
    // Only build ListItems for the visible window.
    let height = area.height.saturating_sub(2) as usize;
    let (start, end) = window(total, app.selected, height);

    let items: Vec<ListItem> = rows[start..end]
        .iter()
        .map(|r| ListItem::new(r.as_str()))
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(app.selected.min(total - 1) - start));
    }
    frame.render_stateful_widget(list, area, &mut state);
}
