// State persistence module
// Handles saving and loading the state table to/from a snapshot file

use super::codec;
use super::table::StateTable;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while loading a snapshot
#[derive(Error, Debug)]
pub enum LoadError {
    /// The snapshot file exists but could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Snapshot path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The snapshot bytes do not decode into a state table
    #[error("corrupt snapshot {}: {reason}", path.display())]
    CorruptData {
        /// Snapshot path
        path: PathBuf,
        /// Decoder message
        reason: String,
    },
}

/// Errors that can occur while saving a snapshot
#[derive(Error, Debug)]
pub enum SaveError {
    /// The snapshot could not be written or moved into place
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// Path that was being written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The table could not be encoded
    #[error("failed to encode snapshot: {0}")]
    Encode(String),

    /// The blocking save task did not run to completion
    #[error("save task did not complete: {0}")]
    Interrupted(String),
}

/// File-backed store for one state table
///
/// Each mapping gets its own store and file; stores are independent.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Bind a store to a snapshot path
    /// Nothing is read or created until `load`/`save` is called
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Path of the canonical snapshot file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a snapshot is present
    /// Distinguishes a first run from a failed load
    pub fn file_exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load the table from the snapshot file
    ///
    /// # Returns
    /// * `Ok(StateTable)` - decoded table, or an empty one if no file exists
    /// * `Err(LoadError)` - the file could not be read or decoded; it is left untouched
    pub fn load(&self) -> Result<StateTable, LoadError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No snapshot found, starting empty");
                return Ok(StateTable::new());
            }
            Err(source) => {
                return Err(LoadError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let table = codec::decode(&bytes).map_err(|reason| LoadError::CorruptData {
            path: self.path.clone(),
            reason,
        })?;

        info!(
            path = %self.path.display(),
            count = table.len(),
            "Loaded player state"
        );
        Ok(table)
    }

    /// Save the full table to the snapshot file
    ///
    /// Writes a temporary sibling file, syncs it, then renames it over the
    /// canonical file, so an interrupted save never replaces a good snapshot
    /// with a partial one.
    pub fn save(&self, table: &StateTable) -> Result<(), SaveError> {
        let bytes = codec::encode(table).map_err(|e| SaveError::Encode(e.to_string()))?;

        // Write to temp file first, then rename (atomic)
        let temp_path = self.temp_path();
        if let Err(source) = write_synced(&temp_path, &bytes) {
            let _ = fs::remove_file(&temp_path);
            return Err(SaveError::Io {
                path: temp_path,
                source,
            });
        }

        if let Err(source) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(SaveError::Io {
                path: self.path.clone(),
                source,
            });
        }

        debug!(
            path = %self.path.display(),
            count = table.len(),
            bytes = bytes.len(),
            "Saved player state"
        );
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
