//! Per-player playback position prediction.
//!
//! The server reports position every few seconds at best. Between reports the
//! predictor extrapolates linearly from the last baseline while the player is
//! playing, and only snaps back to an authoritative sample when it drifted too
//! far or the transport state changed. A user drag on the position control
//! takes over the displayed value until release.
//!
//! ```text
//!   Idle ──sample──▶ Extrapolating ◀──scrub end── HeldByUser
//!     │                   │  ▲                        ▲
//!     └──scrub start──────┼──┼────────────────────────┘
//!                         └──┘ tick / snap
//! ```

use std::time::Duration;

use serde::Serialize;

use crate::intent::ScrubEvent;
use crate::protocol::TransportState;

/// Divergence allowed between predicted and reported position before a snap.
pub const DEFAULT_DRIFT_TOLERANCE_MS: u64 = 10_000;

/// Authoritative data carried by one event for one player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionSample {
    pub position_ms: Option<u64>,
    pub duration_ms: Option<u64>,
    pub state: Option<TransportState>,
    /// The player moved to a different item; always snap.
    pub discontinuity: bool,
}

/// Predictor state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum PredictorPhase {
    /// No authoritative position seen yet.
    Idle,
    /// Following the last baseline; advances only while playing.
    Extrapolating { position_ms: f64 },
    /// Driven by the user's drag value.
    HeldByUser { position_ms: u64 },
}

/// Locally-interpolated position for one player.
#[derive(Debug, Clone)]
pub struct PositionPredictor {
    phase: PredictorPhase,
    observed_state: Option<TransportState>,
    duration_ms: Option<u64>,
    drift_tolerance_ms: u64,
}

impl Default for PositionPredictor {
    fn default() -> Self {
        Self::new(DEFAULT_DRIFT_TOLERANCE_MS)
    }
}

impl PositionPredictor {
    /// Creates an idle predictor with the given drift tolerance.
    #[must_use]
    pub fn new(drift_tolerance_ms: u64) -> Self {
        Self {
            phase: PredictorPhase::Idle,
            observed_state: None,
            duration_ms: None,
            drift_tolerance_ms,
        }
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> PredictorPhase {
        self.phase
    }

    /// Returns true while the user holds the position control.
    #[must_use]
    pub fn is_scrubbing(&self) -> bool {
        matches!(self.phase, PredictorPhase::HeldByUser { .. })
    }

    /// Last transport state seen in a sample.
    #[must_use]
    pub fn observed_state(&self) -> Option<TransportState> {
        self.observed_state
    }

    /// Track duration, if known and non-zero.
    #[must_use]
    pub fn duration_ms(&self) -> Option<u64> {
        self.duration_ms.filter(|d| *d > 0)
    }

    /// Position to render, or `None` before the first authoritative sample.
    #[must_use]
    pub fn displayed_ms(&self) -> Option<u64> {
        match self.phase {
            PredictorPhase::Idle => None,
            PredictorPhase::Extrapolating { position_ms } => {
                Some(position_ms.max(0.0).round() as u64)
            }
            PredictorPhase::HeldByUser { position_ms } => Some(position_ms),
        }
    }

    /// Folds an authoritative sample in.
    ///
    /// While the user holds the control, state and duration are recorded but
    /// the displayed position is left alone. Returns true if the displayed
    /// position changed.
    pub fn observe(&mut self, sample: PositionSample) -> bool {
        if let Some(duration) = sample.duration_ms {
            self.duration_ms = Some(duration);
        }

        let state_changed = match sample.state {
            Some(state) if self.observed_state != Some(state) => {
                self.observed_state = Some(state);
                true
            }
            _ => false,
        };

        let Some(reported) = sample.position_ms else {
            return false;
        };

        match self.phase {
            PredictorPhase::HeldByUser { .. } => false,
            PredictorPhase::Idle => {
                self.phase = PredictorPhase::Extrapolating {
                    position_ms: reported as f64,
                };
                true
            }
            PredictorPhase::Extrapolating { position_ms } => {
                let drift = (reported as f64 - position_ms).abs();
                let snap = sample.discontinuity
                    || state_changed
                    || drift > self.drift_tolerance_ms as f64;
                if !snap {
                    return false;
                }
                log::trace!(
                    "[Predictor] Snap {:.0}ms -> {}ms (drift={:.0}ms, state_changed={})",
                    position_ms,
                    reported,
                    drift,
                    state_changed
                );
                self.phase = PredictorPhase::Extrapolating {
                    position_ms: reported as f64,
                };
                true
            }
        }
    }

    /// Advances the baseline by `elapsed` if playing.
    ///
    /// Paused, stopped and unknown states freeze the position. The prediction
    /// never passes the known duration. Returns true if the position moved.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        let PredictorPhase::Extrapolating { position_ms } = &mut self.phase else {
            return false;
        };
        if !self.observed_state.is_some_and(TransportState::is_playing) || elapsed.is_zero() {
            return false;
        }

        let mut next = *position_ms + elapsed.as_secs_f64() * 1000.0;
        if let Some(duration) = self.duration_ms.filter(|d| *d > 0) {
            next = next.min(duration as f64);
        }

        if next == *position_ms {
            return false;
        }
        *position_ms = next;
        true
    }

    /// Applies one step of a position drag.
    ///
    /// Returns the committed position on release, which becomes the new
    /// baseline and the seek target.
    pub fn scrub(&mut self, event: ScrubEvent<u64>) -> Option<u64> {
        let value = match self.duration_ms() {
            Some(duration) => event.value().min(duration),
            None => event.value(),
        };

        match event {
            ScrubEvent::Start(_) | ScrubEvent::Move(_) => {
                self.phase = PredictorPhase::HeldByUser { position_ms: value };
                None
            }
            ScrubEvent::End(_) => {
                self.phase = PredictorPhase::Extrapolating {
                    position_ms: value as f64,
                };
                Some(value)
            }
        }
    }
}
