//! Application model: the two stores, the audio sync layer and the view
//! state (pane, cursor, input line) the terminal UI renders.
//!
//! Every user intent goes through a method here. Player transitions are
//! always followed by an audio sync, so the backend never lags the store.

use log::{info, warn};

use crate::api::Fetcher;
use crate::audio::{AudioSync, MediaEvent};
use crate::library::{
    LibraryAction, LibraryReducer, LibraryState, Playlist, PlaylistDraft, Track, validate,
};
use crate::player::{PlayerAction, PlayerReducer, PlayerState};
use crate::store::Store;

/// Which list the main pane shows.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Pane {
    #[default]
    Popular,
    Search,
    Playlists,
    Queue,
}

impl Pane {
    /// Next pane in tab order.
    pub fn next(self) -> Self {
        match self {
            Self::Popular => Self::Search,
            Self::Search => Self::Playlists,
            Self::Playlists => Self::Queue,
            Self::Queue => Self::Popular,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Popular => " popular ",
            Self::Search => " search ",
            Self::Playlists => " playlists ",
            Self::Queue => " queue ",
        }
    }
}

/// What the input line is collecting.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Search,
    NewPlaylist,
}

/// The main application model.
pub struct App {
    pub player: Store<PlayerReducer>,
    pub library: Store<LibraryReducer>,
    audio: AudioSync,
    fetcher: Fetcher,

    pub pane: Pane,
    pub selected: usize,
    /// Playlist opened in the playlists pane; its tracks are listed instead
    /// of the playlists themselves.
    pub open_playlist: Option<String>,
    /// Where `P` files tracks. Follows the last playlist highlighted or opened.
    pub target_playlist: Option<String>,

    pub input_mode: InputMode,
    pub input: String,
    pub status: Option<String>,

    pub follow_playback: bool,
    pub volume_step: f32,
    pub scrub_seconds: f64,
}

impl App {
    /// Wire the model up and bring the audio backend in line with the
    /// initial player state.
    pub fn new(
        player: Store<PlayerReducer>,
        library: Store<LibraryReducer>,
        audio: AudioSync,
        fetcher: Fetcher,
    ) -> Self {
        let mut app = Self {
            player,
            library,
            audio,
            fetcher,
            pane: Pane::default(),
            selected: 0,
            open_playlist: None,
            target_playlist: None,
            input_mode: InputMode::Normal,
            input: String::new(),
            status: None,
            follow_playback: true,
            volume_step: 0.05,
            scrub_seconds: 5.0,
        };
        app.audio.sync(app.player.state());
        app
    }

    pub fn player_state(&self) -> &PlayerState {
        self.player.state()
    }

    pub fn library_state(&self) -> &LibraryState {
        self.library.state()
    }

    pub fn audio(&self) -> &AudioSync {
        &self.audio
    }

    fn say(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    /// Dispatch to the player store and push the result to the backend.
    pub fn dispatch_player(&mut self, action: PlayerAction) -> bool {
        let committed = self.player.dispatch(action);
        if committed {
            self.audio.sync(self.player.state());
            self.follow_current();
        }
        committed
    }

    pub fn dispatch_library(&mut self, action: LibraryAction) -> bool {
        let committed = self.library.dispatch(action);
        if committed {
            self.clamp_selection();
        }
        committed
    }

    /// Keep the queue cursor on the playing track while following playback.
    fn follow_current(&mut self) {
        if self.follow_playback && self.pane == Pane::Queue {
            let state = self.player.state();
            if state.current_track.is_some() && state.current_index < state.queue.len() {
                self.selected = state.current_index;
            }
        }
    }

    // ----- what is on screen -----

    /// Tracks listed in the current pane. Empty for the playlist overview.
    pub fn visible_tracks(&self) -> &[Track] {
        let library = self.library.state();
        match self.pane {
            Pane::Popular => &library.popular_tracks,
            Pane::Search => &library.search_results,
            Pane::Queue => &self.player.state().queue,
            Pane::Playlists => match self.opened() {
                Some(p) => &p.tracks,
                None => &[],
            },
        }
    }

    /// The playlist opened in the playlists pane, if it still exists.
    pub fn opened(&self) -> Option<&Playlist> {
        let id = self.open_playlist.as_deref()?;
        self.library.state().playlist(id)
    }

    /// Whether the pane lists playlists rather than tracks.
    pub fn shows_playlist_overview(&self) -> bool {
        self.pane == Pane::Playlists && self.opened().is_none()
    }

    pub fn row_count(&self) -> usize {
        if self.shows_playlist_overview() {
            self.library.state().playlists.len()
        } else {
            self.visible_tracks().len()
        }
    }

    pub fn selected_track(&self) -> Option<&Track> {
        if self.shows_playlist_overview() {
            return None;
        }
        self.visible_tracks().get(self.selected)
    }

    fn selected_playlist_id(&self) -> Option<String> {
        if !self.shows_playlist_overview() {
            return None;
        }
        self.library
            .state()
            .playlists
            .get(self.selected)
            .map(|p| p.id.clone())
    }

    fn clamp_selection(&mut self) {
        let rows = self.row_count();
        if rows == 0 {
            self.selected = 0;
        } else if self.selected >= rows {
            self.selected = rows - 1;
        }
    }

    // ----- navigation -----

    pub fn move_selection(&mut self, delta: isize) {
        let rows = self.row_count();
        if rows == 0 {
            self.selected = 0;
            return;
        }
        let next = self.selected.saturating_add_signed(delta).min(rows - 1);
        self.selected = next;
        // Moving by hand stops the cursor from jumping back.
        if self.pane == Pane::Queue {
            self.follow_playback = false;
        }
        if let Some(id) = self.selected_playlist_id() {
            self.target_playlist = Some(id);
        }
    }

    pub fn next_pane(&mut self) {
        self.show_pane(self.pane.next());
    }

    pub fn show_pane(&mut self, pane: Pane) {
        if self.pane != pane {
            self.pane = pane;
            self.selected = 0;
        }
        if pane == Pane::Queue {
            self.follow_playback = true;
            self.follow_current();
        }
        self.clamp_selection();
    }

    /// Leave an opened playlist and go back to the overview.
    pub fn close_playlist(&mut self) {
        if self.pane != Pane::Playlists {
            return;
        }
        let Some(id) = self.open_playlist.take() else {
            return;
        };
        self.selected = self
            .library
            .state()
            .playlists
            .iter()
            .position(|p| p.id == id)
            .unwrap_or(0);
    }

    /// Enter: open a playlist, or play the pane's list from the cursor.
    pub fn activate(&mut self) {
        if let Some(id) = self.selected_playlist_id() {
            self.target_playlist = Some(id.clone());
            self.open_playlist = Some(id);
            self.selected = 0;
            return;
        }
        match self.pane {
            Pane::Queue => {
                self.follow_playback = true;
                self.dispatch_player(PlayerAction::SelectQueueIndex(self.selected));
            }
            _ => self.play_visible_from(self.selected),
        }
    }

    /// Replace the queue with the visible list and start at `index`.
    pub fn play_visible_from(&mut self, index: usize) {
        let tracks = self.visible_tracks().to_vec();
        if index >= tracks.len() {
            return;
        }
        self.dispatch_player(PlayerAction::SetQueue(tracks));
        self.dispatch_player(PlayerAction::SelectQueueIndex(index));
    }

    // ----- playback -----

    pub fn toggle_play_pause(&mut self) {
        if self.player.state().current_track.is_none() {
            if self.selected_track().is_some() {
                self.activate();
            }
            return;
        }
        self.dispatch_player(PlayerAction::TogglePlayPause);
    }

    pub fn next_track(&mut self) {
        self.dispatch_player(PlayerAction::NextTrack);
    }

    pub fn prev_track(&mut self) {
        self.dispatch_player(PlayerAction::PrevTrack);
    }

    pub fn change_volume(&mut self, delta: f32) {
        let volume = self.player.state().volume + delta;
        self.dispatch_player(PlayerAction::SetVolume(volume));
    }

    pub fn toggle_mute(&mut self) {
        self.audio.toggle_mute();
    }

    pub fn cycle_repeat(&mut self) {
        self.dispatch_player(PlayerAction::ToggleRepeatMode);
        let label = self.player.state().repeat_mode.label();
        self.say(label);
    }

    pub fn toggle_shuffle(&mut self) {
        self.dispatch_player(PlayerAction::ToggleShuffleMode);
        let on = self.player.state().shuffle;
        self.say(if on { "Shuffle on" } else { "Shuffle off" });
    }

    pub fn scrub(&mut self, forward: bool) {
        let delta = if forward {
            self.scrub_seconds
        } else {
            -self.scrub_seconds
        };
        self.audio.seek_by(delta);
    }

    pub fn add_selected_to_queue(&mut self) {
        let Some(track) = self.selected_track().cloned() else {
            return;
        };
        let name = track.name.clone();
        self.dispatch_player(PlayerAction::AddToQueue(track));
        self.say(format!("Queued {name}"));
    }

    pub fn clear_queue(&mut self) {
        self.dispatch_player(PlayerAction::ClearQueue);
        self.clamp_selection();
    }

    // ----- library -----

    /// The highlighted track, or the playing one when nothing is highlighted.
    fn subject_track(&self) -> Option<Track> {
        self.selected_track()
            .or(self.player.state().current_track.as_ref())
            .cloned()
    }

    pub fn toggle_favorite(&mut self) {
        let Some(track) = self.subject_track() else {
            return;
        };
        self.dispatch_library(LibraryAction::ToggleFavorite(track.id.clone()));
        let verb = if self.library.state().is_favorite(&track.id) {
            "Added to favorites"
        } else {
            "Removed from favorites"
        };
        self.say(format!("{verb}: {}", track.name));
    }

    /// `P`: file the highlighted (or playing) track into the target playlist.
    pub fn add_to_target_playlist(&mut self) {
        let Some(track) = self.subject_track() else {
            return;
        };
        let target = self
            .target_playlist
            .as_deref()
            .and_then(|id| self.library.state().playlist(id))
            .map(|p| (p.id.clone(), p.name.clone()));
        let Some((playlist_id, playlist_name)) = target else {
            self.say("Pick a playlist in the playlists pane first");
            return;
        };
        let name = track.name.clone();
        if self.dispatch_library(LibraryAction::AddToPlaylist { playlist_id, track }) {
            self.say(format!("Added {name} to {playlist_name}"));
        } else {
            self.say(format!("{name} is already in {playlist_name}"));
        }
    }

    /// `x`: delete the highlighted playlist, or take the highlighted track
    /// out of the opened playlist. Imported tracks removed from the uploads
    /// playlist are forgotten everywhere.
    pub fn remove_selected(&mut self) {
        if let Some(id) = self.selected_playlist_id() {
            if self.target_playlist.as_deref() == Some(id.as_str()) {
                self.target_playlist = None;
            }
            self.dispatch_library(LibraryAction::DeletePlaylist(id));
            self.say("Playlist deleted");
            return;
        }
        if self.pane != Pane::Playlists {
            return;
        }
        let (Some(playlist_id), Some(track)) =
            (self.open_playlist.clone(), self.selected_track().cloned())
        else {
            return;
        };
        let is_uploads = self
            .opened()
            .is_some_and(|p| p.name == crate::library::UPLOADS_PLAYLIST);
        if is_uploads && self.library.state().is_uploaded(&track.id) {
            self.dispatch_library(LibraryAction::DeleteUploadedTrack(track.id.clone()));
            self.dispatch_player(PlayerAction::ForgetTrack(track.id));
            self.say(format!("Deleted {}", track.name));
        } else {
            self.dispatch_library(LibraryAction::RemoveFromPlaylist {
                playlist_id,
                track_id: track.id,
            });
            self.say(format!("Removed {}", track.name));
        }
    }

    /// Dispatch every valid track not imported before. Returns how many were added.
    pub fn import(&mut self, tracks: Vec<Track>) -> usize {
        let mut added = 0;
        for track in tracks {
            if let Err(e) = validate::upload(&track) {
                warn!("skipping import of {}: {e}", track.id);
                continue;
            }
            if self.library.state().is_uploaded(&track.id) {
                continue;
            }
            if self.dispatch_library(LibraryAction::UploadTrack(track)) {
                added += 1;
            }
        }
        if added > 0 {
            info!("imported {added} tracks");
            self.say(format!("Imported {added} tracks"));
        }
        added
    }

    pub fn refresh_popular(&mut self) {
        let pending = self.fetcher.popular();
        self.dispatch_library(pending);
    }

    // ----- input line -----

    pub fn begin_input(&mut self, mode: InputMode) {
        self.input_mode = mode;
        self.input.clear();
    }

    pub fn push_input(&mut self, c: char) {
        if self.input_mode != InputMode::Normal {
            self.input.push(c);
        }
    }

    pub fn pop_input(&mut self) {
        self.input.pop();
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input.clear();
    }

    /// Enter on the input line.
    pub fn submit_input(&mut self) {
        let mode = std::mem::take(&mut self.input_mode);
        let text = std::mem::take(&mut self.input);
        match mode {
            InputMode::Normal => {}
            InputMode::Search => {
                let query = text.trim();
                if query.is_empty() {
                    return;
                }
                let pending = self.fetcher.search(query);
                self.dispatch_library(pending);
                self.show_pane(Pane::Search);
            }
            InputMode::NewPlaylist => match validate::playlist_name(&text) {
                Ok(name) => {
                    self.dispatch_library(LibraryAction::CreatePlaylist(PlaylistDraft::named(
                        name.clone(),
                    )));
                    if let Some(p) = self.library.state().playlists.last() {
                        self.target_playlist = Some(p.id.clone());
                    }
                    self.say(format!("Created playlist {name}"));
                }
                Err(e) => self.say(e.to_string()),
            },
        }
    }

    // ----- events from other threads -----

    /// Feed a backend event through the sync layer.
    pub fn on_media_event(&mut self, event: MediaEvent) {
        if let Some(action) = self.audio.handle_event(event, self.player.state()) {
            self.dispatch_player(action);
        }
    }

    /// Apply a finished catalogue request.
    pub fn on_fetch_result(&mut self, action: LibraryAction) {
        self.dispatch_library(action);
    }
}
