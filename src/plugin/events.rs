//! Damage hook: cancels damage to players in no-fear mode.

use crate::state::{AccessCoordinator, PlayerKey};

/// The entity a damage event applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DamagedEntity {
    /// A player, identified by the host's player key
    Player(PlayerKey),
    /// Any other entity, by host entity type name (e.g. "zombie")
    Other(String),
}

/// Damage notification from the host
///
/// If cancelled, the host applies no damage.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDamageEvent {
    /// Entity being damaged
    pub entity: DamagedEntity,
    /// Damage amount as reported by the host
    pub damage: f64,
    /// Whether the event has been cancelled
    pub cancelled: bool,
}

impl EntityDamageEvent {
    /// New, not yet cancelled, damage event
    pub fn new(entity: DamagedEntity, damage: f64) -> Self {
        Self {
            entity,
            damage,
            cancelled: false,
        }
    }
}

/// Decide whether damage to `entity` should be suppressed
///
/// Only players are looked up; everything else always takes damage.
pub async fn should_suppress(coordinator: &AccessCoordinator, entity: &DamagedEntity) -> bool {
    match entity {
        DamagedEntity::Player(key) => coordinator.get_state(key).await.is_enabled(),
        DamagedEntity::Other(_) => false,
    }
}

/// Handler registered for entity damage events
#[derive(Debug, Clone)]
pub struct DamageHandler {
    coordinator: AccessCoordinator,
}

impl DamageHandler {
    /// Bind the handler to the shared state table
    pub fn new(coordinator: AccessCoordinator) -> Self {
        Self { coordinator }
    }

    /// Cancel the event if its target is a player in no-fear mode
    ///
    /// Never un-cancels an event another handler already cancelled.
    pub async fn handle(&self, event: &mut EntityDamageEvent) {
        if event.cancelled {
            return;
        }
        if should_suppress(&self.coordinator, &event.entity).await {
            event.cancelled = true;
        }
    }
}
