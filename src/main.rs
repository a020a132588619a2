//! NoFear console host
//!
//! Stands in for a game server: reads commands and damage events from
//! stdin, routes them through the plugin, and saves player state on exit.
//!
//! Input lines:
//! - `<player|console> <command> [args...]`
//! - `damage player <name> [amount]` / `damage <entity> [amount]`
//! - `save`
//! - `quit`

use nofear::config::Config;
use nofear::plugin::{
    CommandSender, DamagedEntity, EntityDamageEvent, NoFearPlugin, ToggleCommand,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

const DEFAULT_DAMAGE: f64 = 1.0;

/// One parsed input line
#[derive(Debug, PartialEq)]
enum HostInput<'a> {
    Command {
        sender: CommandSender,
        label: &'a str,
        args: Vec<&'a str>,
    },
    Damage(DamagedEntity, f64),
    Save,
    Quit,
}

fn parse_line(line: &str) -> Result<Option<HostInput<'_>>, String> {
    let mut words = line.split_whitespace();
    let Some(first) = words.next() else {
        return Ok(None);
    };

    let input = match first {
        "quit" | "stop" => HostInput::Quit,
        "save" => HostInput::Save,
        "damage" => {
            let entity = match words.next() {
                Some("player") => match words.next() {
                    Some(name) => DamagedEntity::Player(name.to_string()),
                    None => return Err("Usage: damage player <name> [amount]".to_string()),
                },
                Some(kind) => DamagedEntity::Other(kind.to_string()),
                None => return Err("Usage: damage <entity|player <name>> [amount]".to_string()),
            };
            let amount = match words.next() {
                Some(a) => a.parse::<f64>().map_err(|_| format!("Invalid damage amount: {a}"))?,
                None => DEFAULT_DAMAGE,
            };
            HostInput::Damage(entity, amount)
        }
        name => {
            let Some(label) = words.next() else {
                return Err(format!("Usage: {name} <command> [args...]"));
            };
            let sender = if name == "console" {
                CommandSender::Console
            } else {
                CommandSender::Player(name.to_string())
            };
            HostInput::Command {
                sender,
                label,
                args: words.collect(),
            }
        }
    };
    Ok(Some(input))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = Config::from_env();
    info!("Configuration loaded: {:?}", config);

    // A plugin that fails to load stays disabled; with nothing else to host, exit cleanly.
    let plugin = match NoFearPlugin::enable(&config.persistence).await {
        Ok(plugin) => plugin,
        Err(e) => {
            warn!("NoFear disabled for this session: {}", e);
            return Ok(());
        }
    };

    let mut autosave = config.autosave.interval.map(|period| {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        info!("Input closed, shutting down...");
                        break;
                    }
                    Err(e) => {
                        warn!("Failed to read input: {}", e);
                        break;
                    }
                };
                if !handle_line(&plugin, &line).await {
                    break;
                }
            }
            _ = next_tick(&mut autosave) => {
                match plugin.coordinator().checkpoint_if_dirty().await {
                    Ok(true) => debug!("Autosave complete"),
                    Ok(false) => {}
                    Err(e) => warn!("Autosave failed: {}", e),
                }
            }
            _ = &mut shutdown => break,
        }
    }

    // Save failures are already logged by the plugin; shutdown continues regardless.
    let _ = plugin.disable().await;
    info!("Host shutdown complete");
    Ok(())
}

/// Handle one input line; returns false when the host should stop
async fn handle_line(plugin: &NoFearPlugin, line: &str) -> bool {
    let input = match parse_line(line) {
        Ok(Some(input)) => input,
        Ok(None) => return true,
        Err(usage) => {
            println!("{usage}");
            return true;
        }
    };

    match input {
        HostInput::Quit => return false,
        HostInput::Save => match plugin.coordinator().checkpoint().await {
            Ok(()) => println!("Player state saved."),
            Err(e) => println!("Save failed: {e}"),
        },
        HostInput::Damage(entity, amount) => {
            let mut event = EntityDamageEvent::new(entity, amount);
            plugin.on_entity_damage(&mut event).await;
            let outcome = if event.cancelled { "cancelled" } else { "applied" };
            println!("{:?} took {} damage: {}", event.entity, event.damage, outcome);
        }
        HostInput::Command {
            sender,
            label,
            args,
        } => match plugin.on_command(label, &sender, &args).await {
            Some(Ok(reply)) => println!("{reply}"),
            Some(Err(e)) => println!("{e}"),
            None => {
                println!("Unknown command: {label}");
                for command in ToggleCommand::ALL {
                    println!("  {}", command.usage());
                }
            }
        },
    }
    true
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

/// Handle graceful shutdown signals (Ctrl+C, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        },
    }
}
