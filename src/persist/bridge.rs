//! Subscribers that mirror committed store transitions into storage.

use std::rc::Rc;

use log::warn;

use crate::library::LibraryReducer;
use crate::player::PlayerReducer;
use crate::store::{Store, SubscriptionId};

use super::snapshot::{LIBRARY_KEY, LibrarySnapshot, PLAYER_KEY, PlayerSnapshot, save};
use super::storage::KeyValueStorage;

/// Write the player snapshot after every committed player transition.
pub fn persist_player(
    store: &mut Store<PlayerReducer>,
    storage: Rc<dyn KeyValueStorage>,
) -> SubscriptionId {
    store.subscribe(move |state| {
        if let Err(e) = save(&*storage, PLAYER_KEY, &PlayerSnapshot::from(state)) {
            warn!("saving player state failed: {e}");
        }
    })
}

/// Write the library snapshot after every committed library transition.
pub fn persist_library(
    store: &mut Store<LibraryReducer>,
    storage: Rc<dyn KeyValueStorage>,
) -> SubscriptionId {
    store.subscribe(move |state| {
        if let Err(e) = save(&*storage, LIBRARY_KEY, &LibrarySnapshot::from(state)) {
            warn!("saving library state failed: {e}");
        }
    })
}
