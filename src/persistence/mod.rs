//! Save/load of the shopping list
//!
//! Features:
//! - Versioned JSON envelope (edit mode is never persisted)
//! - Key-value storage seam with memory, directory and LocalStorage backends
//! - Ordered write queue (last writer wins, superseded snapshots skipped)
//! - Corruption detection and recovery to an empty list

pub mod envelope;
pub mod storage;
pub mod writer;

pub use storage::{DirStore, KeyValueStore, MemoryStore};
pub use writer::{PersistQueue, PersistWorker, persist_queue};

use crate::error::PersistError;
use crate::list::ListState;

/// How startup rehydration went. The state returned alongside is always usable.
#[derive(Debug)]
pub enum RehydrateOutcome {
    /// Nothing stored yet
    Empty,
    /// Snapshot restored
    Restored {
        items: usize,
        /// Items dropped because their id repeated an earlier one
        duplicates_dropped: usize,
        /// Items dropped because their name or quantity is out of range
        invalid_dropped: usize,
    },
    /// Snapshot unreadable; started empty
    Recovered(PersistError),
}

impl RehydrateOutcome {
    pub fn error(&self) -> Option<&PersistError> {
        match self {
            RehydrateOutcome::Recovered(err) => Some(err),
            _ => None,
        }
    }
}

/// Load the list stored under `key`, degrading to an empty list on any failure
pub fn rehydrate<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> (ListState, RehydrateOutcome) {
    let json = match store.get(key) {
        Ok(Some(json)) => json,
        Ok(None) => {
            log::info!("No saved shopping list, starting fresh");
            return (ListState::new(), RehydrateOutcome::Empty);
        }
        Err(err) => {
            log::warn!("Could not read saved shopping list, starting empty: {}", err);
            return (ListState::new(), RehydrateOutcome::Recovered(err));
        }
    };

    match envelope::decode(&json) {
        Ok(items) => {
            let (state, dropped) = ListState::from_items(items);
            if dropped.duplicates > 0 {
                log::warn!(
                    "Dropped {} item(s) with duplicate ids from saved list",
                    dropped.duplicates
                );
            }
            if dropped.invalid > 0 {
                log::warn!("Dropped {} invalid item(s) from saved list", dropped.invalid);
            }
            log::info!("Loaded {} shopping list items", state.len());
            let items = state.len();
            (
                state,
                RehydrateOutcome::Restored {
                    items,
                    duplicates_dropped: dropped.duplicates,
                    invalid_dropped: dropped.invalid,
                },
            )
        }
        Err(err) => {
            log::warn!("Saved shopping list is corrupt, starting empty: {}", err);
            (ListState::new(), RehydrateOutcome::Recovered(err))
        }
    }
}
