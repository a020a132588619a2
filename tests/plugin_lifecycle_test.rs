//! Integration tests for the plugin lifecycle
//!
//! These tests drive the public surface the way a host would:
//! 1. Enable the plugin against a data folder
//! 2. Route commands and damage events through it
//! 3. Disable it and check what reached disk

use nofear::config::PersistenceConfig;
use nofear::plugin::{
    CommandSender, DamagedEntity, EntityDamageEvent, InvocationError, NoFearPlugin,
};
use nofear::state::{InvincibilityState, StateStore, StateTable};
use nofear::PluginError;
use tempfile::TempDir;

fn config_in(dir: &TempDir) -> PersistenceConfig {
    PersistenceConfig {
        data_dir: dir.path().join("plugins").join("NoFear"),
        state_file: "playerInvincibleState.bin".to_string(),
    }
}

fn player(name: &str) -> CommandSender {
    CommandSender::Player(name.to_string())
}

async fn damage(plugin: &NoFearPlugin, entity: DamagedEntity) -> bool {
    let mut event = EntityDamageEvent::new(entity, 5.0);
    plugin.on_entity_damage(&mut event).await;
    event.cancelled
}

#[tokio::test]
async fn test_first_run_creates_folder_and_starts_empty() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);

    let plugin = NoFearPlugin::enable(&config).await.unwrap();
    assert!(config.data_dir.is_dir());
    assert!(!plugin.coordinator().store().file_exists());
    assert!(plugin.coordinator().snapshot().await.is_empty());
}

#[tokio::test]
async fn test_state_survives_restart() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);

    let plugin = NoFearPlugin::enable(&config).await.unwrap();
    let reply = plugin.on_command("nofear", &player("alice"), &[]).await;
    assert_eq!(reply, Some(Ok("No fear mode has been enabled.")));
    plugin
        .on_command("enable-invincibility", &player("bob"), &[])
        .await;
    plugin
        .on_command("disable-invincibility", &player("bob"), &[])
        .await;
    plugin.disable().await.unwrap();

    assert!(config.state_path().is_file());

    let plugin = NoFearPlugin::enable(&config).await.unwrap();
    let coordinator = plugin.coordinator();
    assert_eq!(
        coordinator.get_state("alice").await,
        InvincibilityState::Enabled
    );
    assert_eq!(
        coordinator.get_state("bob").await,
        InvincibilityState::Disabled
    );
    assert!(damage(&plugin, DamagedEntity::Player("alice".to_string())).await);
    assert!(!damage(&plugin, DamagedEntity::Player("bob".to_string())).await);
}

#[tokio::test]
async fn test_damage_rule_end_to_end() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    std::fs::create_dir_all(&config.data_dir).unwrap();

    let table: StateTable = [("alice".to_string(), InvincibilityState::Enabled)]
        .into_iter()
        .collect();
    StateStore::new(config.state_path()).save(&table).unwrap();

    let plugin = NoFearPlugin::enable(&config).await.unwrap();
    assert!(damage(&plugin, DamagedEntity::Player("alice".to_string())).await);
    assert!(!damage(&plugin, DamagedEntity::Player("bob".to_string())).await);
    assert!(!damage(&plugin, DamagedEntity::Other("skeleton".to_string())).await);
}

#[tokio::test]
async fn test_corrupt_snapshot_keeps_plugin_disabled() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    std::fs::create_dir_all(&config.data_dir).unwrap();
    let garbage = b"\xde\xad\xbe\xef not a snapshot".to_vec();
    std::fs::write(config.state_path(), &garbage).unwrap();

    let err = NoFearPlugin::enable(&config).await.unwrap_err();
    assert!(matches!(err, PluginError::Load(_)));
    assert_eq!(std::fs::read(config.state_path()).unwrap(), garbage);
}

#[tokio::test]
async fn test_data_folder_blocked_by_file() {
    let dir = TempDir::new().unwrap();
    let config = PersistenceConfig {
        data_dir: dir.path().join("occupied"),
        state_file: "state.bin".to_string(),
    };
    std::fs::write(&config.data_dir, b"not a folder").unwrap();

    let err = NoFearPlugin::enable(&config).await.unwrap_err();
    assert!(matches!(err, PluginError::DataDir { .. }));
}

#[tokio::test]
async fn test_invalid_invocations_change_nothing() {
    let dir = TempDir::new().unwrap();
    let plugin = NoFearPlugin::enable(&config_in(&dir)).await.unwrap();

    let reply = plugin.on_command("nofear", &player("alice"), &["bob"]).await;
    assert_eq!(reply, Some(Err(InvocationError::InvalidArgumentCount)));

    let reply = plugin
        .on_command("nofear-stop", &CommandSender::Console, &[])
        .await;
    assert_eq!(reply, Some(Err(InvocationError::NotAPlayer)));

    assert!(plugin.coordinator().snapshot().await.is_empty());
    assert!(!plugin.coordinator().is_dirty());
}

#[tokio::test]
async fn test_unknown_command_is_not_handled() {
    let dir = TempDir::new().unwrap();
    let plugin = NoFearPlugin::enable(&config_in(&dir)).await.unwrap();

    assert_eq!(plugin.on_command("gamemode", &player("alice"), &[]).await, None);
}

#[tokio::test]
async fn test_disable_reports_save_failure() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let plugin = NoFearPlugin::enable(&config).await.unwrap();
    plugin.on_command("nofear", &player("alice"), &[]).await;

    // Remove the data folder out from under the plugin
    std::fs::remove_dir_all(&config.data_dir).unwrap();

    assert!(plugin.disable().await.is_err());
}
