//! Event reconciliation.
//!
//! Folds decoded protocol events into the [`PlayerRegistry`] and keeps the
//! active player selection. The reconciler is the single writer of player
//! state: it owns the registry outright and is driven from one task.

use std::sync::Arc;

use crate::predictor::PositionSample;
use crate::preferences::PreferenceStore;
use crate::protocol::{HeosEvent, NowPlayingPatch, Player, PlayerId};
use crate::registry::PlayerRegistry;

/// What applying one event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciled {
    /// Nothing changed (stale id, or volume before any now-playing state).
    Ignored,
    /// The registry was replaced by a new roster.
    RosterReplaced,
    /// One player's record was mutated.
    Updated(PlayerUpdate),
}

/// Authoritative values produced by a per-player event.
///
/// Consumed by the per-player position and volume state machines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerUpdate {
    pub pid: PlayerId,
    /// Present when the event carried position, duration or transport state.
    pub position: Option<PositionSample>,
    /// Present when the event carried a volume level.
    pub volume: Option<u8>,
}

impl PlayerUpdate {
    fn new(pid: PlayerId) -> Self {
        Self {
            pid,
            position: None,
            volume: None,
        }
    }
}

/// Owns player state and the active selection.
pub struct Reconciler {
    registry: PlayerRegistry,
    active: Option<PlayerId>,
    preferences: Arc<dyn PreferenceStore>,
}

impl Reconciler {
    /// Creates a reconciler with an empty registry.
    pub fn new(preferences: Arc<dyn PreferenceStore>) -> Self {
        Self {
            registry: PlayerRegistry::new(),
            active: None,
            preferences,
        }
    }

    /// Read-only view of the registry.
    #[must_use]
    pub fn registry(&self) -> &PlayerRegistry {
        &self.registry
    }

    /// Currently selected player. `None` only before the first non-empty roster.
    #[must_use]
    pub fn active_player(&self) -> Option<&PlayerId> {
        self.active.as_ref()
    }

    /// Applies one decoded event.
    pub fn apply(&mut self, event: HeosEvent) -> Reconciled {
        match event {
            HeosEvent::Roster(players) => self.load_roster(players),
            HeosEvent::NowPlayingMedia { pid, patch } => self.merge_media(pid, &patch, false),
            HeosEvent::NowPlayingChanged { pid, patch } => self.merge_media(pid, &patch, true),
            HeosEvent::PlayState { pid, state } => {
                let Some(player) = self.registry.lookup_mut(&pid) else {
                    return Reconciled::Ignored;
                };
                let now_playing = player.now_playing_mut();
                let mut update = PlayerUpdate::new(pid);
                if let Some(state) = state {
                    now_playing.transport_state = state;
                    update.position = Some(PositionSample {
                        position_ms: now_playing.position_ms,
                        duration_ms: now_playing.duration_ms,
                        state: Some(state),
                        discontinuity: false,
                    });
                }
                Reconciled::Updated(update)
            }
            HeosEvent::Volume { pid, level, muted } => {
                let Some(player) = self.registry.lookup_mut(&pid) else {
                    return Reconciled::Ignored;
                };
                let Some(now_playing) = player.now_playing.as_mut() else {
                    log::debug!("[Reconciler] Volume for {} before now-playing state", pid);
                    return Reconciled::Ignored;
                };
                if let Some(level) = level {
                    now_playing.volume = Some(level);
                }
                if let Some(muted) = muted {
                    now_playing.muted = Some(muted);
                }
                Reconciled::Updated(PlayerUpdate {
                    pid,
                    position: None,
                    volume: level,
                })
            }
            HeosEvent::Progress {
                pid,
                position_ms,
                duration_ms,
            } => {
                let Some(player) = self.registry.lookup_mut(&pid) else {
                    return Reconciled::Ignored;
                };
                player.now_playing_mut().merge(&NowPlayingPatch {
                    position_ms,
                    duration_ms,
                    ..Default::default()
                });
                Reconciled::Updated(PlayerUpdate {
                    pid,
                    position: Some(PositionSample {
                        position_ms,
                        duration_ms,
                        state: None,
                        discontinuity: false,
                    }),
                    volume: None,
                })
            }
        }
    }

    /// Selects `id` as the active player and persists the choice.
    ///
    /// Returns false if `id` is not in the current roster.
    pub fn select_player(&mut self, id: &PlayerId) -> bool {
        if !self.registry.contains(id) {
            log::debug!("[Reconciler] Cannot select unknown player {}", id);
            return false;
        }
        self.active = Some(id.clone());
        if let Err(e) = self.preferences.set_active_player(id) {
            log::warn!("[Reconciler] Failed to persist active player {}: {}", id, e);
        }
        true
    }

    fn load_roster(&mut self, players: Vec<Player>) -> Reconciled {
        self.registry.replace(players);

        let preferred = self
            .preferences
            .active_player()
            .filter(|id| self.registry.contains(id));
        self.active = preferred.or_else(|| self.registry.first_id().cloned());

        log::info!(
            "[Reconciler] Roster loaded: {} players, active={:?}",
            self.registry.len(),
            self.active.as_ref().map(PlayerId::as_str)
        );
        Reconciled::RosterReplaced
    }

    fn merge_media(&mut self, pid: PlayerId, patch: &NowPlayingPatch, changed: bool) -> Reconciled {
        let Some(player) = self.registry.lookup_mut(&pid) else {
            return Reconciled::Ignored;
        };
        let now_playing = player.now_playing_mut();
        let track_changed = now_playing.merge(patch) || changed;

        let mut update = PlayerUpdate::new(pid);
        if track_changed {
            now_playing.reset_progress(patch);
            update.position = Some(PositionSample {
                position_ms: now_playing.position_ms,
                duration_ms: now_playing.duration_ms,
                state: None,
                discontinuity: true,
            });
        } else if patch.position_ms.is_some() || patch.duration_ms.is_some() {
            update.position = Some(PositionSample {
                position_ms: patch.position_ms,
                duration_ms: patch.duration_ms,
                state: None,
                discontinuity: false,
            });
        }

        if track_changed {
            log::debug!(
                "[Reconciler] Track changed on {}: {:?}",
                update.pid,
                now_playing.track.title
            );
        }
        Reconciled::Updated(update)
    }
}
