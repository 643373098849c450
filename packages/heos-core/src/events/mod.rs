//! Event system for presentation-layer updates.
//!
//! This module provides:
//! - [`EventEmitter`] trait the session emits through
//! - [`BroadcastEventBridge`] for fan-out to any number of subscribers
//! - [`ClientEvent`] and its payload types

mod bridge;
mod emitter;

pub use bridge::BroadcastEventBridge;
pub use emitter::{EventEmitter, LoggingEventEmitter, NoopEventEmitter};

use serde::Serialize;

use crate::commands::Command;
use crate::snapshot::SessionSnapshot;

/// Events delivered to the presentation layer.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "category", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Fresh render state after something changed.
    Snapshot(SessionSnapshot),

    /// A command was handed to the transport.
    Command(CommandEvent),
}

/// Record of one outbound command.
///
/// Issued before the request is sent; there is no matching completion event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandEvent {
    pub command: Command,
    /// Unix timestamp in milliseconds.
    pub timestamp: u64,
}

impl From<SessionSnapshot> for ClientEvent {
    fn from(snapshot: SessionSnapshot) -> Self {
        ClientEvent::Snapshot(snapshot)
    }
}

impl From<CommandEvent> for ClientEvent {
    fn from(event: CommandEvent) -> Self {
        ClientEvent::Command(event)
    }
}
