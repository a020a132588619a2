//! NoFear plugin lifecycle
//!
//! The host calls [`NoFearPlugin::enable`] once at startup, routes commands
//! and damage events through the returned handle, and calls
//! [`NoFearPlugin::disable`] once at teardown. Nothing here depends on the
//! host's own types; the host adapts its events to these calls.

pub mod commands;
pub mod events;

pub use commands::{CommandSender, InvocationError, ToggleCommand, ToggleExecutor};
pub use events::{should_suppress, DamageHandler, DamagedEntity, EntityDamageEvent};

use tracing::{error, info};

use crate::config::PersistenceConfig;
use crate::error::PluginError;
use crate::state::{AccessCoordinator, SaveError, StateStore};

/// A running plugin instance
#[derive(Debug, Clone)]
pub struct NoFearPlugin {
    coordinator: AccessCoordinator,
    damage_handler: DamageHandler,
    executors: Vec<ToggleExecutor>,
}

impl NoFearPlugin {
    /// Enable the plugin: create the data folder and load player state
    ///
    /// On error the plugin must stay disabled for this session; running on
    /// an empty table would silently reset every player's setting.
    pub async fn enable(config: &PersistenceConfig) -> Result<Self, PluginError> {
        match Self::try_enable(config).await {
            Ok(plugin) => {
                info!("NoFear plugin enabled.");
                Ok(plugin)
            }
            Err(e) => {
                error!(error = %e, "Unable to load plugin data.");
                Err(e)
            }
        }
    }

    async fn try_enable(config: &PersistenceConfig) -> Result<Self, PluginError> {
        tokio::fs::create_dir_all(&config.data_dir)
            .await
            .map_err(|source| PluginError::DataDir {
                path: config.data_dir.clone(),
                source,
            })?;

        let store = StateStore::new(config.state_path());
        let coordinator = AccessCoordinator::open(store).await?;
        Ok(Self::with_coordinator(coordinator))
    }

    /// Build a plugin around an existing coordinator
    pub fn with_coordinator(coordinator: AccessCoordinator) -> Self {
        let executors = ToggleCommand::ALL
            .into_iter()
            .map(|cmd| ToggleExecutor::new(cmd, coordinator.clone()))
            .collect();
        Self {
            damage_handler: DamageHandler::new(coordinator.clone()),
            coordinator,
            executors,
        }
    }

    /// Shared state handle
    pub fn coordinator(&self) -> &AccessCoordinator {
        &self.coordinator
    }

    /// Dispatch a command by name or alias
    ///
    /// Returns `None` if the label is not one of this plugin's commands.
    pub async fn on_command(
        &self,
        label: &str,
        sender: &CommandSender,
        args: &[&str],
    ) -> Option<Result<&'static str, InvocationError>> {
        let command = ToggleCommand::from_label(label)?;
        let executor = self.executors.iter().find(|e| e.command() == command)?;
        Some(executor.execute(sender, args).await)
    }

    /// Apply the no-fear rule to a damage event
    pub async fn on_entity_damage(&self, event: &mut EntityDamageEvent) {
        self.damage_handler.handle(event).await;
    }

    /// Disable the plugin, writing a final checkpoint
    ///
    /// A failed save is logged and returned; the host should keep shutting down.
    pub async fn disable(self) -> Result<(), SaveError> {
        let result = self.coordinator.checkpoint().await;
        if let Err(e) = &result {
            error!(error = %e, "Unable to save plugin data.");
        }
        info!("NoFear plugin disabled.");
        result
    }
}
