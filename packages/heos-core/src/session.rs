//! Client session: the single owner of all player state.
//!
//! A [`Session`] combines the reconciler with the per-player position and
//! volume state machines and the command dispatcher. Inbound messages, user
//! intents and render ticks are each handled to completion before the next
//! one is looked at, so no state is ever shared across tasks.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::clock::Ticker;
use crate::commands::CommandDispatcher;
use crate::events::EventEmitter;
use crate::format::{format_duration, format_position};
use crate::intent::UserIntent;
use crate::predictor::PositionPredictor;
use crate::preferences::PreferenceStore;
use crate::protocol::{decode, HeosEvent, Player, PlayerId};
use crate::reconciler::{Reconciled, Reconciler};
use crate::snapshot::{PlayerSnapshot, SessionSnapshot};
use crate::state::Config;
use crate::utils::now_millis;
use crate::volume::VolumeController;

/// Locally-driven display state of one player.
#[derive(Debug, Clone)]
struct PlayerView {
    position: PositionPredictor,
    volume: VolumeController,
}

impl PlayerView {
    fn new(drift_tolerance_ms: u64) -> Self {
        Self {
            position: PositionPredictor::new(drift_tolerance_ms),
            volume: VolumeController::new(),
        }
    }
}

/// Reconciles the event stream with user input and emits render snapshots.
pub struct Session {
    config: Config,
    reconciler: Reconciler,
    views: HashMap<PlayerId, PlayerView>,
    dispatcher: CommandDispatcher,
    emitter: Arc<dyn EventEmitter>,
}

impl Session {
    /// Creates a session with an empty roster.
    pub fn new(
        config: Config,
        preferences: Arc<dyn PreferenceStore>,
        dispatcher: CommandDispatcher,
        emitter: Arc<dyn EventEmitter>,
    ) -> Self {
        Self {
            config,
            reconciler: Reconciler::new(preferences),
            views: HashMap::new(),
            dispatcher,
            emitter,
        }
    }

    /// Read access to reconciled player state.
    #[must_use]
    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// Handles one raw event-stream message.
    ///
    /// Malformed and unrecognized messages are dropped. Returns true if
    /// anything visible changed.
    pub fn handle_message(&mut self, message: &str) -> bool {
        match decode(message) {
            Ok(Some(event)) => self.handle_event(event),
            Ok(None) => false,
            Err(e) => {
                log::debug!("[Session] Dropping message: {}", e);
                false
            }
        }
    }

    /// Handles one decoded protocol event.
    pub fn handle_event(&mut self, event: HeosEvent) -> bool {
        let kind = event.kind();
        let target = event.player_id().cloned();
        let changed = match self.reconciler.apply(event) {
            Reconciled::Ignored => {
                log::debug!(
                    "[Session] Ignored {} event for {}",
                    kind,
                    target.as_ref().map_or("-", PlayerId::as_str)
                );
                false
            }
            Reconciled::RosterReplaced => {
                let tolerance = self.config.drift_tolerance_ms;
                self.views = self
                    .reconciler
                    .registry()
                    .ids()
                    .map(|id| (id.clone(), PlayerView::new(tolerance)))
                    .collect();
                true
            }
            Reconciled::Updated(update) => {
                if let Some(view) = self.views.get_mut(&update.pid) {
                    if let Some(sample) = update.position {
                        view.position.observe(sample);
                    }
                    if let Some(level) = update.volume {
                        view.volume.observe(level);
                    }
                }
                true
            }
        };
        if changed {
            self.publish();
        }
        changed
    }

    /// Handles one user intent.
    ///
    /// Intents for players not in the roster are ignored. Returns true if
    /// anything visible changed; sending a command alone changes nothing
    /// until the player reports back.
    pub fn handle_intent(&mut self, intent: UserIntent) -> bool {
        let changed = match intent {
            UserIntent::SelectPlayer { pid } => self.reconciler.select_player(&pid),
            UserIntent::ScrubPosition { pid, event } => {
                let Some(view) = self.view_mut(&pid) else {
                    return false;
                };
                if let Some(position_ms) = view.position.scrub(event) {
                    self.dispatcher.seek(&pid, position_ms);
                }
                true
            }
            UserIntent::ScrubVolume { pid, event } => {
                let Some(view) = self.view_mut(&pid) else {
                    return false;
                };
                if let Some(level) = view.volume.scrub(event) {
                    self.dispatcher.set_volume(&pid, level);
                }
                true
            }
            UserIntent::PressControl { pid, action } => {
                let Some(player) = self.reconciler.registry().lookup(&pid) else {
                    log::debug!("[Session] Control for unknown player {}", pid);
                    return false;
                };
                let state = player
                    .now_playing
                    .as_ref()
                    .map(|np| np.transport_state)
                    .unwrap_or_default();
                self.dispatcher.control(&pid, action, state);
                false
            }
        };
        if changed {
            self.publish();
        }
        changed
    }

    /// Advances every player's predicted position by `elapsed`.
    ///
    /// Returns true if any displayed position moved.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        let mut changed = false;
        for view in self.views.values_mut() {
            changed |= view.position.tick(elapsed);
        }
        if changed {
            self.publish();
        }
        changed
    }

    /// Builds the current render state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let players = self
            .reconciler
            .registry()
            .iter()
            .map(|player| self.player_snapshot(player))
            .collect();
        SessionSnapshot {
            active_player_id: self.reconciler.active_player().cloned(),
            players,
            timestamp: now_millis(),
        }
    }

    /// Runs the session until cancelled or the message channel closes.
    ///
    /// Ticks at the configured interval; a closed intent channel only stops
    /// intent handling.
    pub async fn run(
        mut self,
        mut messages: mpsc::Receiver<String>,
        mut intents: mpsc::Receiver<UserIntent>,
        cancel: CancellationToken,
    ) {
        let mut ticker = Ticker::new(self.config.tick_interval(), &cancel);
        let mut intents_open = true;
        log::info!(
            "[Session] Running (tick={}ms, drift tolerance={}ms)",
            self.config.tick_interval_ms,
            self.config.drift_tolerance_ms
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                message = messages.recv() => match message {
                    Some(message) => {
                        self.handle_message(&message);
                    }
                    None => {
                        log::info!("[Session] Message channel closed");
                        break;
                    }
                },
                intent = intents.recv(), if intents_open => match intent {
                    Some(intent) => {
                        self.handle_intent(intent);
                    }
                    None => intents_open = false,
                },
                elapsed = ticker.tick() => match elapsed {
                    Some(elapsed) => {
                        self.tick(elapsed);
                    }
                    None => break,
                },
            }
        }
        log::info!("[Session] Stopped");
    }

    fn view_mut(&mut self, pid: &PlayerId) -> Option<&mut PlayerView> {
        let view = self.views.get_mut(pid);
        if view.is_none() {
            log::debug!("[Session] Intent for unknown player {}", pid);
        }
        view
    }

    fn player_snapshot(&self, player: &Player) -> PlayerSnapshot {
        let view = self.views.get(&player.id);
        let position_ms = view.and_then(|v| v.position.displayed_ms());
        let duration_ms = view.and_then(|v| v.position.duration_ms());
        PlayerSnapshot {
            id: player.id.clone(),
            name: player.name.clone(),
            model: player.model.clone(),
            group_id: player.group_id.clone(),
            now_playing: player.now_playing.clone(),
            position_ms,
            duration_ms,
            volume: view.and_then(|v| v.volume.displayed()),
            position_text: format_position(position_ms),
            duration_text: format_duration(duration_ms),
            scrubbing_position: view.is_some_and(|v| v.position.is_scrubbing()),
            scrubbing_volume: view.is_some_and(|v| v.volume.is_scrubbing()),
        }
    }

    fn publish(&self) {
        self.emitter.emit_snapshot(self.snapshot());
    }
}
