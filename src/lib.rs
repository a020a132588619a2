//! NoFear
//!
//! Lets players toggle a personal no-fear (invincibility) mode and cancels
//! damage to them while it is on. Player settings live in a state table
//! that is loaded from a binary snapshot at startup and written back at
//! shutdown.

pub mod config;
pub mod error;
/// Plugin lifecycle, commands and damage hook
pub mod plugin;
/// Player state table, snapshot persistence and shared access
pub mod state;

pub use config::Config;
pub use error::PluginError;
pub use plugin::NoFearPlugin;
