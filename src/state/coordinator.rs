//! Access coordinator
//!
//! Single gateway between the damage hook, the toggle commands and the
//! state table. One coarse lock guards the whole table; checkpoints copy
//! the table under that lock and write it out after releasing it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use super::persistence::{LoadError, SaveError, StateStore};
use super::table::{InvincibilityState, PlayerKey, StateTable};

/// Shared handle to the state table and its backing store
///
/// Cloning is cheap; every clone sees the same table.
#[derive(Debug, Clone)]
pub struct AccessCoordinator {
    table: Arc<RwLock<StateTable>>,
    store: Arc<StateStore>,
    dirty: Arc<AtomicBool>,
    save_lock: Arc<Mutex<()>>,
}

impl AccessCoordinator {
    /// Wrap an already-loaded table
    pub fn new(store: StateStore, table: StateTable) -> Self {
        Self {
            table: Arc::new(RwLock::new(table)),
            store: Arc::new(store),
            dirty: Arc::new(AtomicBool::new(false)),
            save_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Load the table from `store` on a blocking worker and wrap it
    pub async fn open(store: StateStore) -> Result<Self, LoadError> {
        let loader = store.clone();
        let table = match tokio::task::spawn_blocking(move || loader.load()).await {
            Ok(result) => result?,
            Err(e) => {
                return Err(LoadError::Io {
                    path: store.path().to_path_buf(),
                    source: std::io::Error::other(e.to_string()),
                })
            }
        };
        Ok(Self::new(store, table))
    }

    /// Backing store
    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Current state for a player, `Disabled` if never set
    pub async fn get_state(&self, key: &str) -> InvincibilityState {
        self.table.read().await.get(key)
    }

    /// Upsert a player's state
    pub async fn set_state(&self, key: impl Into<PlayerKey>, state: InvincibilityState) {
        let key = key.into();
        let mut table = self.table.write().await;
        if table.set(key, state) {
            self.dirty.store(true, Ordering::Release);
        }
    }

    /// Copy of the current table
    pub async fn snapshot(&self) -> StateTable {
        self.table.read().await.clone()
    }

    /// Whether the table changed since the last successful checkpoint
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Save the current table to the backing store
    pub async fn checkpoint(&self) -> Result<(), SaveError> {
        let _guard = self.save_lock.lock().await;

        let snapshot = {
            let table = self.table.read().await;
            // Writers need the write lock, so nothing changes between the copy and the reset.
            self.dirty.store(false, Ordering::Release);
            table.clone()
        };

        let store = Arc::clone(&self.store);
        let result = match tokio::task::spawn_blocking(move || store.save(&snapshot)).await {
            Ok(result) => result,
            Err(e) => Err(SaveError::Interrupted(e.to_string())),
        };

        if let Err(e) = &result {
            self.dirty.store(true, Ordering::Release);
            warn!(path = %self.store.path().display(), error = %e, "Checkpoint failed");
        }
        result
    }

    /// Save only if something changed since the last checkpoint
    /// Returns true if a save was performed
    pub async fn checkpoint_if_dirty(&self) -> Result<bool, SaveError> {
        if !self.is_dirty() {
            debug!("Checkpoint skipped, no changes");
            return Ok(false);
        }
        self.checkpoint().await?;
        Ok(true)
    }
}
