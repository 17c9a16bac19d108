//! Background catalogue requests reported back as library actions.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use log::warn;

use crate::error::Result;
use crate::library::{LibraryAction, Track};

use super::client::MusicApi;

/// Read side of the catalogue.
pub trait Catalog: Send + Sync {
    fn search(&self, query: &str) -> Result<Vec<Track>>;
    fn popular(&self) -> Result<Vec<Track>>;
}

impl Catalog for MusicApi {
    fn search(&self, query: &str) -> Result<Vec<Track>> {
        MusicApi::search(self, query)
    }

    fn popular(&self) -> Result<Vec<Track>> {
        MusicApi::popular(self)
    }
}

/// Runs catalogue calls on worker threads.
///
/// Each call returns its pending action for the caller to dispatch right
/// away; the outcome arrives later on the receiver from [`Fetcher::new`].
/// Requests are not sequenced, so the last one to finish wins.
pub struct Fetcher {
    catalog: Arc<dyn Catalog>,
    tx: Sender<LibraryAction>,
}

impl Fetcher {
    pub fn new(catalog: Arc<dyn Catalog>) -> (Self, Receiver<LibraryAction>) {
        let (tx, rx) = mpsc::channel();
        (Self { catalog, tx }, rx)
    }

    pub fn search(&self, query: &str) -> LibraryAction {
        let catalog = Arc::clone(&self.catalog);
        let tx = self.tx.clone();
        let query = query.to_string();
        thread::spawn(move || {
            let outcome = match catalog.search(&query) {
                Ok(results) => LibraryAction::SearchFulfilled(results),
                Err(e) => {
                    warn!("search {query:?} failed: {e}");
                    LibraryAction::SearchRejected(e.to_string())
                }
            };
            let _ = tx.send(outcome);
        });
        LibraryAction::SearchPending
    }

    pub fn popular(&self) -> LibraryAction {
        let catalog = Arc::clone(&self.catalog);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let outcome = match catalog.popular() {
                Ok(results) => LibraryAction::PopularFulfilled(results),
                Err(e) => {
                    warn!("popular tracks failed: {e}");
                    LibraryAction::PopularRejected(e.to_string())
                }
            };
            let _ = tx.send(outcome);
        });
        LibraryAction::PopularPending
    }
}
