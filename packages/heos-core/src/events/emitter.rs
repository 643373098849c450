//! Event emitter abstraction for decoupling the session from delivery.
//!
//! The session depends on the [`EventEmitter`] trait rather than a concrete
//! channel, so tests and alternative front ends can observe it directly.

use super::CommandEvent;
use crate::snapshot::SessionSnapshot;

/// Trait for emitting client events without knowledge of transport.
///
/// # Example
///
/// ```ignore
/// struct Printer;
///
/// impl EventEmitter for Printer {
///     fn emit_snapshot(&self, snapshot: SessionSnapshot) {
///         println!("{:?}", snapshot.active());
///     }
///     fn emit_command(&self, _event: CommandEvent) {}
/// }
/// ```
pub trait EventEmitter: Send + Sync {
    /// Emits the current render state.
    fn emit_snapshot(&self, snapshot: SessionSnapshot);

    /// Emits an outbound command record.
    fn emit_command(&self, event: CommandEvent);
}

/// No-op emitter for headless use or testing.
pub struct NoopEventEmitter;

impl EventEmitter for NoopEventEmitter {
    fn emit_snapshot(&self, _snapshot: SessionSnapshot) {}

    fn emit_command(&self, _event: CommandEvent) {}
}

/// Logging emitter for debugging and development.
///
/// Logs all events at debug level.
pub struct LoggingEventEmitter;

impl EventEmitter for LoggingEventEmitter {
    fn emit_snapshot(&self, snapshot: SessionSnapshot) {
        tracing::debug!(
            active = ?snapshot.active_player_id,
            players = snapshot.players.len(),
            "session_snapshot"
        );
    }

    fn emit_command(&self, event: CommandEvent) {
        tracing::debug!(?event, "command_issued");
    }
}
