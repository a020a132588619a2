// State management module
// Handles the player state table, its snapshot file, and shared access

pub mod codec;
pub mod coordinator;
/// Snapshot file load/save
pub mod persistence;
/// Player state table types
pub mod table;

pub use coordinator::AccessCoordinator;
pub use persistence::{LoadError, SaveError, StateStore};
pub use table::{InvincibilityState, PlayerKey, StateTable};
