use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::mpsc::Receiver;

use log::{info, warn};

use crate::api::{Catalog, Fetcher};
use crate::app::App;
use crate::audio::AudioSync;
use crate::config;
use crate::library::{LibraryAction, LibraryReducer};
use crate::persist::{
    FileStorage, KeyValueStorage, MemoryStorage, has_player_snapshot, load_library_state,
    load_player_state, persist_library, persist_player,
};
use crate::player::{PlayerReducer, PlayerState, clamp_volume};
use crate::store::Store;

/// File storage under the data directory, or process memory without one.
pub fn open_storage(data_dir: Option<PathBuf>) -> Rc<dyn KeyValueStorage> {
    match data_dir {
        Some(dir) => {
            info!("persisting state under {}", dir.display());
            Rc::new(FileStorage::new(dir))
        }
        None => {
            warn!("no data directory; state will not survive a restart");
            Rc::new(MemoryStorage::new())
        }
    }
}

/// Configured playback defaults only count until something was persisted.
pub fn initial_player_state(
    storage: &dyn KeyValueStorage,
    settings: &config::Settings,
) -> PlayerState {
    let mut defaults = PlayerState::default();
    if !has_player_snapshot(storage) {
        defaults.volume = clamp_volume(settings.playback.default_volume);
        defaults.repeat_mode = settings.playback.repeat_mode.into();
        defaults.shuffle = settings.playback.shuffle;
    }
    load_player_state(storage, defaults)
}

/// Build both stores from storage, hook up persistence and wrap everything
/// into the app model.
pub fn build_app(
    settings: &config::Settings,
    storage: Rc<dyn KeyValueStorage>,
    audio: AudioSync,
    catalog: Arc<dyn Catalog>,
) -> (App, Receiver<LibraryAction>) {
    let mut player = Store::new(
        PlayerReducer::new(),
        initial_player_state(storage.as_ref(), settings),
    );
    let mut library = Store::new(LibraryReducer::new(), load_library_state(storage.as_ref()));
    persist_player(&mut player, Rc::clone(&storage));
    persist_library(&mut library, storage);

    let (fetcher, fetch_rx) = Fetcher::new(catalog);
    let mut app = App::new(player, library, audio, fetcher);
    app.follow_playback = settings.ui.follow_playback;
    app.volume_step = settings.controls.volume_step;
    app.scrub_seconds = settings.controls.scrub_seconds as f64;
    (app, fetch_rx)
}
