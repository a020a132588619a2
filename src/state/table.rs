// Player state table
// Maps player identities to their no-fear toggle

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque player identity as supplied by the host (case-sensitive)
pub type PlayerKey = String;

/// Per-player invincibility toggle
/// A player missing from the table is treated as `Disabled`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InvincibilityState {
    /// Damage applies normally
    #[default]
    Disabled,
    /// Damage events for this player are cancelled
    Enabled,
}

impl InvincibilityState {
    /// Whether damage should be suppressed in this state
    pub fn is_enabled(self) -> bool {
        matches!(self, InvincibilityState::Enabled)
    }
}

/// In-memory mapping from player to invincibility state
///
/// Keys are kept ordered so that encoding the table is deterministic.
/// Disabling a player flips the stored value; entries are never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateTable {
    entries: BTreeMap<PlayerKey, InvincibilityState>,
}

impl StateTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a player's state, defaulting to `Disabled`
    pub fn get(&self, key: &str) -> InvincibilityState {
        self.entries.get(key).copied().unwrap_or_default()
    }

    /// Upsert a player's state
    /// Returns true if the stored value changed
    pub fn set(&mut self, key: PlayerKey, state: InvincibilityState) -> bool {
        match self.entries.get_mut(&key) {
            Some(current) if *current == state => false,
            Some(current) => {
                *current = state;
                true
            }
            None => {
                self.entries.insert(key, state);
                true
            }
        }
    }

    /// Number of players with a stored entry (either state)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no player has a stored entry
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of players currently `Enabled`
    pub fn enabled_count(&self) -> usize {
        self.entries.values().filter(|s| s.is_enabled()).count()
    }

    /// Iterate entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, InvincibilityState)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub(crate) fn entries(&self) -> &BTreeMap<PlayerKey, InvincibilityState> {
        &self.entries
    }
}

impl From<BTreeMap<PlayerKey, InvincibilityState>> for StateTable {
    fn from(entries: BTreeMap<PlayerKey, InvincibilityState>) -> Self {
        Self { entries }
    }
}

impl FromIterator<(PlayerKey, InvincibilityState)> for StateTable {
    fn from_iter<I: IntoIterator<Item = (PlayerKey, InvincibilityState)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
