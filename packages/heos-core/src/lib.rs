//! HEOS Core - state reconciliation engine for a HEOS multi-room audio remote.
//!
//! The client listens to a push event stream from a HEOS bridge, folds every
//! event into a local model of the players, and renders a smoothly advancing
//! playback position between the server's sparse progress reports. Control
//! commands are fire-and-forget: their effect only shows once the event
//! stream reports it.
//!
//! # Architecture
//!
//! - [`protocol`]: Message decoding and the player domain types
//! - [`registry`]: Player registry keyed by id, in roster order
//! - [`reconciler`]: Folds decoded events into the registry
//! - [`predictor`]: Position extrapolation with drift correction
//! - [`volume`]: Volume display state with drag override
//! - [`commands`]: Outbound commands and their dispatcher
//! - [`session`]: Single owner of all state; the event loop
//! - [`transport`]: Server-sent event stream reader
//! - [`events`]: Snapshot and command events for the presentation layer
//! - [`state`]: Client configuration
//! - [`error`]: Centralized error types
//!
//! # Abstraction Traits
//!
//! - [`TaskSpawner`](runtime::TaskSpawner): Spawning background tasks
//! - [`EventEmitter`](events::EventEmitter): Emitting client events
//! - [`CommandTransport`](commands::CommandTransport): Sending commands
//! - [`PreferenceStore`](preferences::PreferenceStore): Persisting the active player

#![warn(clippy::all)]

pub mod bootstrap;
pub mod clock;
pub mod commands;
pub mod error;
pub mod events;
pub mod format;
pub mod intent;
pub mod predictor;
pub mod preferences;
pub mod protocol;
pub mod reconciler;
pub mod registry;
mod retry;
pub mod runtime;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod transport;
pub mod utils;
pub mod volume;

// Re-export commonly used types at the crate root
pub use error::{ErrorCode, HeosError, HeosResult};
pub use events::{
    BroadcastEventBridge, ClientEvent, CommandEvent, EventEmitter, LoggingEventEmitter,
    NoopEventEmitter,
};
pub use intent::{ControlAction, ScrubEvent, UserIntent};
pub use preferences::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
pub use protocol::{HeosEvent, NowPlaying, Player, PlayerId, Track, TransportState};
pub use runtime::{TaskSpawner, TokioSpawner};
pub use session::Session;
pub use snapshot::{PlayerSnapshot, SessionSnapshot};
pub use state::Config;
pub use utils::now_millis;

// Re-export bootstrap types
pub use bootstrap::{bootstrap_client, BootstrappedClient};

// Re-export transport types
pub use transport::{EventStreamReader, TransportError};

// Re-export command types
pub use commands::{Command, CommandDispatcher, CommandError, CommandTransport};
