//! Error types for the plugin lifecycle
//!
//! Load and save failures are defined next to the store in
//! `state::persistence`; command failures live with the commands.
//! This enum collects whatever can stop the plugin from enabling or
//! shutting down cleanly.

use std::path::PathBuf;
use thiserror::Error;

/// Plugin-level error types
#[derive(Error, Debug)]
pub enum PluginError {
    /// The data folder could not be created
    #[error("Failed to create data folder {}: {source}", path.display())]
    DataDir {
        /// Folder that was being created
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The player state snapshot could not be loaded
    #[error("Unable to load plugin data: {0}")]
    Load(#[from] crate::state::LoadError),

    /// The player state snapshot could not be saved
    #[error("Unable to save plugin data: {0}")]
    Save(#[from] crate::state::SaveError),
}
