//! Toggle commands: enable and disable no-fear mode for the invoking player.

use thiserror::Error;
use tracing::info;

use crate::state::{AccessCoordinator, InvincibilityState, PlayerKey};

/// Who issued a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSender {
    /// An in-game player, identified by the host's player key
    Player(PlayerKey),
    /// Server console, RCON or any other non-player actor
    Console,
}

impl CommandSender {
    /// The player's key, if the sender is a player
    pub fn as_player(&self) -> Option<&str> {
        match self {
            CommandSender::Player(key) => Some(key),
            CommandSender::Console => None,
        }
    }
}

/// Rejected command invocation; reported to the sender, never escalated
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationError {
    /// The command takes no arguments
    #[error("Invalid number of arguments.")]
    InvalidArgumentCount,

    /// The command was issued by a non-player actor
    #[error("This command can only be executed by a player.")]
    NotAPlayer,
}

/// The two toggle commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleCommand {
    /// Turn no-fear mode on
    Enable,
    /// Turn no-fear mode off
    Disable,
}

impl ToggleCommand {
    /// Every command, for registration
    pub const ALL: [ToggleCommand; 2] = [ToggleCommand::Enable, ToggleCommand::Disable];

    /// Primary command name
    pub fn name(self) -> &'static str {
        match self {
            ToggleCommand::Enable => "enable-invincibility",
            ToggleCommand::Disable => "disable-invincibility",
        }
    }

    /// Short alias
    pub fn alias(self) -> &'static str {
        match self {
            ToggleCommand::Enable => "nofear",
            ToggleCommand::Disable => "nofear-stop",
        }
    }

    /// One-line help text
    pub fn description(self) -> &'static str {
        match self {
            ToggleCommand::Enable => "Become immune to all damage",
            ToggleCommand::Disable => "Take damage normally again",
        }
    }

    /// Help line listing the name, alias and description
    pub fn usage(self) -> String {
        format!("/{} (/{}) - {}", self.name(), self.alias(), self.description())
    }

    /// Resolve a command label (name or alias, with or without a leading slash)
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.strip_prefix('/').unwrap_or(label);
        Self::ALL
            .into_iter()
            .find(|cmd| cmd.name() == label || cmd.alias() == label)
    }

    /// State this command assigns to the invoker
    pub fn target_state(self) -> InvincibilityState {
        match self {
            ToggleCommand::Enable => InvincibilityState::Enabled,
            ToggleCommand::Disable => InvincibilityState::Disabled,
        }
    }

    /// Reply sent to the player on success
    pub fn confirmation(self) -> &'static str {
        match self {
            ToggleCommand::Enable => "No fear mode has been enabled.",
            ToggleCommand::Disable => "No fear mode has been disabled.",
        }
    }
}

/// Executor for one toggle command
#[derive(Debug, Clone)]
pub struct ToggleExecutor {
    command: ToggleCommand,
    coordinator: AccessCoordinator,
}

impl ToggleExecutor {
    /// Bind a command to the shared state table
    pub fn new(command: ToggleCommand, coordinator: AccessCoordinator) -> Self {
        Self {
            command,
            coordinator,
        }
    }

    /// Command this executor handles
    pub fn command(&self) -> ToggleCommand {
        self.command
    }

    /// Run the command
    ///
    /// # Returns
    /// * `Ok(message)` - confirmation to send back to the player
    /// * `Err(InvocationError)` - rejected; no state was changed
    pub async fn execute(
        &self,
        sender: &CommandSender,
        args: &[&str],
    ) -> Result<&'static str, InvocationError> {
        let Some(player) = sender.as_player() else {
            return Err(InvocationError::NotAPlayer);
        };
        if !args.is_empty() {
            return Err(InvocationError::InvalidArgumentCount);
        }

        let state = self.command.target_state();
        self.coordinator.set_state(player, state).await;
        info!(player = %player, state = ?state, "No fear mode toggled");

        Ok(self.command.confirmation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{StateStore, StateTable};
    use tempfile::TempDir;

    fn coordinator(dir: &TempDir) -> AccessCoordinator {
        AccessCoordinator::new(
            StateStore::new(dir.path().join("state.bin")),
            StateTable::new(),
        )
    }

    #[test]
    fn test_from_label() {
        assert_eq!(
            ToggleCommand::from_label("enable-invincibility"),
            Some(ToggleCommand::Enable)
        );
        assert_eq!(ToggleCommand::from_label("/nofear"), Some(ToggleCommand::Enable));
        assert_eq!(
            ToggleCommand::from_label("nofear-stop"),
            Some(ToggleCommand::Disable)
        );
        assert_eq!(ToggleCommand::from_label("NOFEAR"), None);
        assert_eq!(ToggleCommand::from_label("gamemode"), None);
    }

    #[test]
    fn test_usage_lines() {
        assert_eq!(
            ToggleCommand::Enable.usage(),
            "/enable-invincibility (/nofear) - Become immune to all damage"
        );
        assert_eq!(
            ToggleCommand::Disable.usage(),
            "/disable-invincibility (/nofear-stop) - Take damage normally again"
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            InvocationError::InvalidArgumentCount.to_string(),
            "Invalid number of arguments."
        );
        assert_eq!(
            InvocationError::NotAPlayer.to_string(),
            "This command can only be executed by a player."
        );
    }

    #[tokio::test]
    async fn test_enable_then_disable() {
        let dir = TempDir::new().unwrap();
        let coordinator = coordinator(&dir);
        let enable = ToggleExecutor::new(ToggleCommand::Enable, coordinator.clone());
        let disable = ToggleExecutor::new(ToggleCommand::Disable, coordinator.clone());
        let alice = CommandSender::Player("alice".to_string());

        let reply = enable.execute(&alice, &[]).await.unwrap();
        assert_eq!(reply, "No fear mode has been enabled.");
        assert_eq!(
            coordinator.get_state("alice").await,
            InvincibilityState::Enabled
        );

        let reply = disable.execute(&alice, &[]).await.unwrap();
        assert_eq!(reply, "No fear mode has been disabled.");
        assert_eq!(
            coordinator.get_state("alice").await,
            InvincibilityState::Disabled
        );
    }

    #[tokio::test]
    async fn test_arguments_rejected_without_state_change() {
        let dir = TempDir::new().unwrap();
        let coordinator = coordinator(&dir);
        let alice = CommandSender::Player("alice".to_string());

        for command in ToggleCommand::ALL {
            let executor = ToggleExecutor::new(command, coordinator.clone());
            let err = executor.execute(&alice, &["now"]).await.unwrap_err();
            assert_eq!(err, InvocationError::InvalidArgumentCount);
            let err = executor.execute(&alice, &["a", "b"]).await.unwrap_err();
            assert_eq!(err, InvocationError::InvalidArgumentCount);
        }

        assert!(coordinator.snapshot().await.is_empty());
        assert!(!coordinator.is_dirty());
    }

    #[tokio::test]
    async fn test_arguments_rejected_keeps_existing_state() {
        let dir = TempDir::new().unwrap();
        let coordinator = coordinator(&dir);
        coordinator
            .set_state("alice", InvincibilityState::Enabled)
            .await;
        let disable = ToggleExecutor::new(ToggleCommand::Disable, coordinator.clone());

        let alice = CommandSender::Player("alice".to_string());
        assert!(disable.execute(&alice, &["extra"]).await.is_err());
        assert_eq!(
            coordinator.get_state("alice").await,
            InvincibilityState::Enabled
        );
    }

    #[tokio::test]
    async fn test_console_rejected_without_state_change() {
        let dir = TempDir::new().unwrap();
        let coordinator = coordinator(&dir);

        for command in ToggleCommand::ALL {
            let executor = ToggleExecutor::new(command, coordinator.clone());
            let err = executor
                .execute(&CommandSender::Console, &[])
                .await
                .unwrap_err();
            assert_eq!(err, InvocationError::NotAPlayer);
        }

        assert!(coordinator.snapshot().await.is_empty());
    }
}
