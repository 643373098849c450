//! HEOS Remote - headless terminal remote for HEOS players.
//!
//! Connects to a HEOS bridge's event stream, keeps a live model of every
//! player and prints the active player's status line whenever it changes.
//! Transport commands are read line by line from stdin.

mod config;
mod console;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use heos_core::{
    bootstrap_client, ClientEvent, FilePreferenceStore, MemoryPreferenceStore, PreferenceStore,
    SessionSnapshot, TaskSpawner, UserIntent,
};
use parking_lot::RwLock;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

use crate::config::ClientConfig;
use crate::console::{ConsoleCommand, HELP};

/// Capacity of the inbound message and intent channels.
const CHANNEL_CAPACITY: usize = 256;

/// HEOS Remote - terminal remote for HEOS multi-room audio.
#[derive(Parser, Debug)]
#[command(name = "heos-remote")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (YAML).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(short, long, default_value = "warn", env = "HEOS_LOG_LEVEL")]
    log_level: log::LevelFilter,

    /// Bridge base URL (overrides config file).
    #[arg(short = 'u', long)]
    base_url: Option<String>,

    /// Send seek commands when a position is set.
    #[arg(long)]
    seek: bool,

    /// Data directory for persistent state (active player).
    #[arg(short = 'd', long, env = "HEOS_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

/// Latest snapshot, shared between the printer and the input reader.
type SharedSnapshot = Arc<RwLock<Option<SessionSnapshot>>>;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::new()
        .filter_level(args.log_level)
        .format_timestamp_millis()
        .init();

    log::info!("HEOS Remote v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config =
        ClientConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    // Apply CLI overrides
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    if args.seek {
        config.seek_supported = true;
    }
    if let Some(data_dir) = args.data_dir {
        config.data_dir = Some(data_dir);
    }

    let preferences: Arc<dyn PreferenceStore> = match config.data_dir {
        Some(ref data_dir) => {
            log::info!("Using data directory: {}", data_dir.display());
            Arc::new(FilePreferenceStore::new(data_dir.clone()))
        }
        None => {
            log::info!("No data directory configured - active player will not persist");
            Arc::new(MemoryPreferenceStore::default())
        }
    };

    let client = bootstrap_client(config.to_core_config(), preferences)
        .context("Failed to bootstrap client")?;
    let cancel = client.cancel_token.clone();
    let latest: SharedSnapshot = Arc::new(RwLock::new(None));

    let (message_tx, message_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (intent_tx, intent_rx) = mpsc::channel(CHANNEL_CAPACITY);

    let spawner = client.spawner;
    spawner.spawn(print_snapshots(
        client.event_bridge.subscribe(),
        Arc::clone(&latest),
        cancel.clone(),
    ));
    spawner.spawn(client.reader.run(message_tx, cancel.clone()));
    spawner.spawn(read_input(intent_tx, Arc::clone(&latest), cancel.clone()));
    let session = tokio::spawn(client.session.run(message_rx, intent_rx, cancel.clone()));

    println!("Connecting to {} (type 'help' for commands)", config.base_url);

    tokio::select! {
        _ = shutdown_signal() => log::info!("Shutdown signal received"),
        _ = cancel.cancelled() => {}
    }
    cancel.cancel();

    if let Err(e) = session.await {
        log::error!("Session task failed: {}", e);
    }

    log::info!("Shutdown complete");
    Ok(())
}

/// Prints the active player's status line whenever it changes.
async fn print_snapshots(
    mut rx: broadcast::Receiver<ClientEvent>,
    latest: SharedSnapshot,
    cancel: CancellationToken,
) {
    let mut last_line = String::new();
    loop {
        let received = tokio::select! {
            _ = cancel.cancelled() => break,
            received = rx.recv() => received,
        };
        match received {
            Ok(ClientEvent::Snapshot(snapshot)) => {
                let line = snapshot
                    .active()
                    .map(console::status_line)
                    .unwrap_or_else(|| "no players".to_string());
                *latest.write() = Some(snapshot);
                if line != last_line {
                    println!("{}", line);
                    last_line = line;
                }
            }
            Ok(ClientEvent::Command(event)) => {
                log::debug!("Command issued: {:?}", event.command);
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                log::trace!("Printer lagged, skipped {} events", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Reads commands from stdin and forwards them as intents.
async fn read_input(
    tx: mpsc::Sender<UserIntent>,
    latest: SharedSnapshot,
    cancel: CancellationToken,
) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => return,
            line = lines.next_line() => line,
        };
        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => return,
            Err(e) => {
                log::warn!("Failed to read stdin: {}", e);
                return;
            }
        };

        let command = match console::parse_line(&line) {
            None => continue,
            Some(Ok(command)) => command,
            Some(Err(message)) => {
                println!("{}\n{}", message, HELP);
                continue;
            }
        };

        let snapshot = latest.read().clone();
        let intent = match (&command, snapshot) {
            (ConsoleCommand::Quit, _) => {
                cancel.cancel();
                return;
            }
            (ConsoleCommand::Help, _) => {
                println!("{}", HELP);
                continue;
            }
            (_, None) => {
                println!("no players yet");
                continue;
            }
            (ConsoleCommand::Players, Some(snapshot)) => {
                println!("{}", console::player_list(&snapshot));
                continue;
            }
            (ConsoleCommand::Select(target), Some(snapshot)) => {
                match console::resolve_player(&snapshot, target) {
                    Some(pid) => UserIntent::SelectPlayer { pid },
                    None => {
                        println!("no player '{}'", target);
                        continue;
                    }
                }
            }
            (command, Some(snapshot)) => {
                let Some(active) = snapshot.active_player_id.as_ref() else {
                    println!("no active player");
                    continue;
                };
                match console::to_intent(command, active) {
                    Some(intent) => intent,
                    None => continue,
                }
            }
        };

        if tx.send(intent).await.is_err() {
            return;
        }
    }
}

/// Waits for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                log::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
