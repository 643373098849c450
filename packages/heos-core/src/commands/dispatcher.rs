//! Fire-and-forget command dispatch.

use std::sync::Arc;

use super::{Command, CommandTransport};
use crate::events::{CommandEvent, EventEmitter};
use crate::intent::ControlAction;
use crate::protocol::{PlayerId, TransportState};
use crate::retry::with_retry;
use crate::runtime::{TaskSpawner, TokioSpawner};
use crate::utils::now_millis;

/// Turns user intents into outbound commands.
///
/// Every command is spawned as a detached task. Failures are logged at warn
/// and otherwise invisible: player state only ever changes through the
/// event stream.
pub struct CommandDispatcher {
    transport: Arc<dyn CommandTransport>,
    emitter: Arc<dyn EventEmitter>,
    spawner: TokioSpawner,
    seek_supported: bool,
}

impl CommandDispatcher {
    /// Creates a new dispatcher.
    pub fn new(
        transport: Arc<dyn CommandTransport>,
        emitter: Arc<dyn EventEmitter>,
        spawner: TokioSpawner,
        seek_supported: bool,
    ) -> Self {
        Self {
            transport,
            emitter,
            spawner,
            seek_supported,
        }
    }

    /// Sends a transport control for `pid`.
    ///
    /// `state` is the player's last known transport state; it decides which
    /// way [`ControlAction::PlayPause`] goes.
    pub fn control(&self, pid: &PlayerId, action: ControlAction, state: TransportState) {
        let pid = pid.clone();
        let command = match action {
            ControlAction::Play => Command::Play { pid },
            ControlAction::Pause => Command::Pause { pid },
            ControlAction::PlayPause if state.is_playing() => Command::Pause { pid },
            ControlAction::PlayPause => Command::Play { pid },
            ControlAction::Next => Command::Next { pid },
            ControlAction::Previous => Command::Previous { pid },
        };
        self.dispatch(command);
    }

    /// Sends a volume level.
    pub fn set_volume(&self, pid: &PlayerId, level: u8) {
        self.dispatch(Command::SetVolume {
            pid: pid.clone(),
            level,
        });
    }

    /// Sends a seek, if this client is configured to issue them.
    ///
    /// Returns false when seeking is disabled and nothing was sent.
    pub fn seek(&self, pid: &PlayerId, position_ms: u64) -> bool {
        if !self.seek_supported {
            log::debug!(
                "[Dispatcher] Seek to {}ms on {} not sent (seek disabled)",
                position_ms,
                pid
            );
            return false;
        }
        self.dispatch(Command::Seek {
            pid: pid.clone(),
            position_ms,
        });
        true
    }

    /// Hands `command` to the transport without waiting for it.
    pub fn dispatch(&self, command: Command) {
        log::info!("[Dispatcher] {} -> {}", command.name(), command.pid());
        self.emitter.emit_command(CommandEvent {
            command: command.clone(),
            timestamp: now_millis(),
        });

        let transport = Arc::clone(&self.transport);
        self.spawner.spawn(async move {
            let result = with_retry(command.name(), || transport.send(&command)).await;
            if let Err(e) = result {
                log::warn!(
                    "[Dispatcher] {} for {} failed: {}",
                    command.name(),
                    command.pid(),
                    e
                );
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{CommandError, CommandResult};
    use crate::events::NoopEventEmitter;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use tokio::sync::mpsc;

    /// Transport that forwards every command to a channel.
    struct ChannelTransport {
        tx: mpsc::UnboundedSender<Command>,
        fail: bool,
    }

    #[async_trait]
    impl CommandTransport for ChannelTransport {
        async fn send(&self, command: &Command) -> CommandResult<()> {
            let _ = self.tx.send(command.clone());
            if self.fail {
                Err(CommandError::HttpStatus(500))
            } else {
                Ok(())
            }
        }
    }

    #[derive(Default)]
    struct RecordingEmitter {
        commands: Mutex<Vec<Command>>,
    }

    impl EventEmitter for RecordingEmitter {
        fn emit_snapshot(&self, _snapshot: crate::snapshot::SessionSnapshot) {}

        fn emit_command(&self, event: CommandEvent) {
            self.commands.lock().push(event.command);
        }
    }

    fn dispatcher(
        seek_supported: bool,
        fail: bool,
    ) -> (CommandDispatcher, mpsc::UnboundedReceiver<Command>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let dispatcher = CommandDispatcher::new(
            Arc::new(ChannelTransport { tx, fail }),
            Arc::new(NoopEventEmitter),
            TokioSpawner::current(),
            seek_supported,
        );
        (dispatcher, rx)
    }

    fn pid() -> PlayerId {
        PlayerId::new("A")
    }

    #[tokio::test]
    async fn controls_map_to_commands() {
        let (d, mut rx) = dispatcher(false, false);

        d.control(&pid(), ControlAction::Next, TransportState::Playing);
        assert_eq!(rx.recv().await, Some(Command::Next { pid: pid() }));

        d.control(&pid(), ControlAction::Previous, TransportState::Playing);
        assert_eq!(rx.recv().await, Some(Command::Previous { pid: pid() }));

        d.set_volume(&pid(), 35);
        assert_eq!(
            rx.recv().await,
            Some(Command::SetVolume {
                pid: pid(),
                level: 35
            })
        );
    }

    #[tokio::test]
    async fn play_pause_follows_transport_state() {
        let (d, mut rx) = dispatcher(false, false);

        d.control(&pid(), ControlAction::PlayPause, TransportState::Playing);
        assert_eq!(rx.recv().await, Some(Command::Pause { pid: pid() }));

        for state in [
            TransportState::Paused,
            TransportState::Stopped,
            TransportState::Unknown,
        ] {
            d.control(&pid(), ControlAction::PlayPause, state);
            assert_eq!(rx.recv().await, Some(Command::Play { pid: pid() }));
        }
    }

    #[tokio::test]
    async fn seek_only_when_enabled() {
        let (d, mut rx) = dispatcher(false, false);
        assert!(!d.seek(&pid(), 10_000));
        d.control(&pid(), ControlAction::Play, TransportState::Paused);
        // the seek never reached the transport
        assert_eq!(rx.recv().await, Some(Command::Play { pid: pid() }));

        let (d, mut rx) = dispatcher(true, false);
        assert!(d.seek(&pid(), 10_000));
        assert_eq!(
            rx.recv().await,
            Some(Command::Seek {
                pid: pid(),
                position_ms: 10_000
            })
        );
    }

    #[tokio::test]
    async fn failures_are_swallowed() {
        // Commands are optimistic; failures are invisible to the caller.
        let (d, mut rx) = dispatcher(false, true);
        d.control(&pid(), ControlAction::Pause, TransportState::Playing);
        assert_eq!(rx.recv().await, Some(Command::Pause { pid: pid() }));

        d.control(&pid(), ControlAction::Play, TransportState::Paused);
        assert_eq!(rx.recv().await, Some(Command::Play { pid: pid() }));
    }

    #[tokio::test]
    async fn every_command_is_emitted() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let emitter = Arc::new(RecordingEmitter::default());
        let d = CommandDispatcher::new(
            Arc::new(ChannelTransport { tx, fail: false }),
            emitter.clone(),
            TokioSpawner::current(),
            false,
        );

        d.control(&pid(), ControlAction::Next, TransportState::Playing);
        d.set_volume(&pid(), 10);
        d.seek(&pid(), 5_000);

        assert_eq!(
            *emitter.commands.lock(),
            vec![
                Command::Next { pid: pid() },
                Command::SetVolume {
                    pid: pid(),
                    level: 10
                }
            ]
        );
    }
}
