//! Render-ready view of the session.

use serde::Serialize;

use crate::protocol::{NowPlaying, PlayerId, TransportState};

/// Everything a presentation layer needs to draw one player.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub name: String,
    pub model: Option<String>,
    pub group_id: Option<String>,
    pub now_playing: Option<NowPlaying>,
    /// Predicted (or dragged) position in milliseconds.
    pub position_ms: Option<u64>,
    pub duration_ms: Option<u64>,
    /// Displayed volume (0-100), including an in-progress drag.
    pub volume: Option<u8>,
    pub position_text: String,
    pub duration_text: String,
    pub scrubbing_position: bool,
    pub scrubbing_volume: bool,
}

impl PlayerSnapshot {
    /// Transport state of the player, `Unknown` before any now-playing data.
    #[must_use]
    pub fn transport_state(&self) -> TransportState {
        self.now_playing
            .as_ref()
            .map(|np| np.transport_state)
            .unwrap_or_default()
    }
}

/// Roster order view of every player plus the active selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub active_player_id: Option<PlayerId>,
    pub players: Vec<PlayerSnapshot>,
    /// Unix timestamp in milliseconds.
    pub timestamp: u64,
}

impl SessionSnapshot {
    /// The active player's view, if any.
    #[must_use]
    pub fn active(&self) -> Option<&PlayerSnapshot> {
        let id = self.active_player_id.as_ref()?;
        self.players.iter().find(|p| &p.id == id)
    }

    /// Looks up a player's view by id.
    #[must_use]
    pub fn player(&self, id: &PlayerId) -> Option<&PlayerSnapshot> {
        self.players.iter().find(|p| &p.id == id)
    }
}
