//! Client bootstrap and dependency wiring.
//!
//! The composition root: the one place where the HTTP client, the event
//! bridge, the command dispatcher and the session are created and wired
//! together.

use std::sync::Arc;

use reqwest::Client;
use tokio_util::sync::CancellationToken;

use crate::commands::{CommandDispatcher, CommandTransport, HttpCommandTransport};
use crate::error::{HeosError, HeosResult};
use crate::events::{BroadcastEventBridge, EventEmitter};
use crate::preferences::PreferenceStore;
use crate::runtime::TokioSpawner;
use crate::session::Session;
use crate::state::Config;
use crate::transport::EventStreamReader;

/// Container for a wired client.
pub struct BootstrappedClient {
    /// The session, ready to [`Session::run`].
    pub session: Session,
    /// Reader feeding the session's message channel.
    pub reader: EventStreamReader,
    /// Event bridge the session publishes snapshots through.
    pub event_bridge: Arc<BroadcastEventBridge>,
    /// Task spawner for background operations.
    pub spawner: TokioSpawner,
    /// Cancellation token for graceful shutdown.
    pub cancel_token: CancellationToken,
}

/// Creates the shared HTTP client.
///
/// No overall timeout: the event stream response stays open indefinitely.
/// Commands set their own per-request timeout.
fn create_http_client() -> HeosResult<Client> {
    Client::builder()
        .build()
        .map_err(|e| HeosError::Internal(format!("Failed to create HTTP client: {}", e)))
}

/// Wires a client for `config`.
///
/// Must be called from within a Tokio runtime.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the HTTP client
/// cannot be created.
pub fn bootstrap_client(
    config: Config,
    preferences: Arc<dyn PreferenceStore>,
) -> HeosResult<BootstrappedClient> {
    config.validate()?;

    let spawner = TokioSpawner::current();
    let http_client = create_http_client()?;
    let event_bridge = Arc::new(BroadcastEventBridge::new(config.event_channel_capacity));
    let cancel_token = CancellationToken::new();

    let transport = Arc::new(HttpCommandTransport::new(
        http_client.clone(),
        config.base_url.clone(),
        config.command_timeout(),
    ));
    let dispatcher = CommandDispatcher::new(
        transport as Arc<dyn CommandTransport>,
        Arc::clone(&event_bridge) as Arc<dyn EventEmitter>,
        spawner.clone(),
        config.seek_supported,
    );

    let reader = EventStreamReader::new(http_client, config.events_url());
    log::info!(
        "[Bootstrap] Client wired for {} (events at {})",
        config.base_url,
        config.events_url()
    );

    let session = Session::new(
        config,
        preferences,
        dispatcher,
        Arc::clone(&event_bridge) as Arc<dyn EventEmitter>,
    );

    Ok(BootstrappedClient {
        session,
        reader,
        event_bridge,
        spawner,
        cancel_token,
    })
}
