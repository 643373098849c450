//! Bridge implementation that maps client events to a broadcast channel.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;

use super::emitter::EventEmitter;
use super::{ClientEvent, CommandEvent};
use crate::snapshot::SessionSnapshot;

/// Fans client events out to every subscriber.
///
/// Implements [`EventEmitter`] by forwarding to a `tokio::sync::broadcast`
/// channel. An optional external emitter can be attached after construction
/// and receives every event first.
///
/// Slow subscribers lag and skip events; a snapshot always carries the full
/// state, so skipping intermediate ones loses nothing.
#[derive(Clone)]
pub struct BroadcastEventBridge {
    tx: broadcast::Sender<ClientEvent>,
    external_emitter: Arc<RwLock<Option<Arc<dyn EventEmitter>>>>,
}

impl BroadcastEventBridge {
    /// Creates a new bridge with the given channel capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            external_emitter: Arc::new(RwLock::new(None)),
        }
    }

    /// Sets an external emitter that receives every event.
    pub fn set_external_emitter(&self, emitter: Arc<dyn EventEmitter>) {
        *self.external_emitter.write() = Some(emitter);
    }

    /// Returns a new receiver for the broadcast channel.
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.tx.subscribe()
    }
}

/// Generates an [`EventEmitter`] method that forwards to the external emitter
/// (if set) and then sends to the broadcast channel.
macro_rules! impl_emit {
    ($method:ident, $event_ty:ty) => {
        fn $method(&self, event: $event_ty) {
            if let Some(ref emitter) = *self.external_emitter.read() {
                emitter.$method(event.clone());
            }
            if let Err(e) = self.tx.send(ClientEvent::from(event)) {
                log::trace!("[EventBridge] No broadcast receivers: {}", e);
            }
        }
    };
}

impl EventEmitter for BroadcastEventBridge {
    impl_emit!(emit_snapshot, SessionSnapshot);
    impl_emit!(emit_command, CommandEvent);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use crate::protocol::PlayerId;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recording {
        commands: Mutex<Vec<Command>>,
    }

    impl EventEmitter for Recording {
        fn emit_snapshot(&self, _snapshot: SessionSnapshot) {}

        fn emit_command(&self, event: CommandEvent) {
            self.commands.lock().push(event.command);
        }
    }

    fn play(pid: &str) -> CommandEvent {
        CommandEvent {
            command: Command::Play {
                pid: PlayerId::new(pid),
            },
            timestamp: 0,
        }
    }

    #[tokio::test]
    async fn subscribers_receive_events() {
        let bridge = BroadcastEventBridge::new(8);
        let mut rx = bridge.subscribe();

        bridge.emit_command(play("1"));

        match rx.recv().await.unwrap() {
            ClientEvent::Command(event) => assert_eq!(event.command.pid().as_str(), "1"),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn emitting_without_subscribers_is_harmless() {
        let bridge = BroadcastEventBridge::new(8);
        bridge.emit_command(play("1"));
    }

    #[test]
    fn external_emitter_sees_events() {
        let bridge = BroadcastEventBridge::new(8);
        let external = Arc::new(Recording::default());
        bridge.set_external_emitter(external.clone());

        bridge.emit_command(play("7"));

        assert_eq!(
            *external.commands.lock(),
            vec![Command::Play {
                pid: PlayerId::new("7")
            }]
        );
    }
}
