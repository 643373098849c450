//! User intents accepted from the presentation layer.

use serde::{Deserialize, Serialize};

use crate::protocol::PlayerId;

/// One step of a drag on a position or volume control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "value", rename_all = "camelCase")]
pub enum ScrubEvent<T> {
    /// Pointer pressed at `T`.
    Start(T),
    /// Pointer moved to `T`.
    Move(T),
    /// Pointer released at `T`; the value to commit.
    End(T),
}

impl<T: Copy> ScrubEvent<T> {
    /// Returns the value carried by the event.
    pub fn value(&self) -> T {
        match *self {
            Self::Start(v) | Self::Move(v) | Self::End(v) => v,
        }
    }
}

/// Transport button pressed for a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlAction {
    Play,
    Pause,
    /// Pause when playing, play otherwise.
    PlayPause,
    Next,
    Previous,
}

/// Inbound API from the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum UserIntent {
    /// Change the active player and persist the choice.
    SelectPlayer { pid: PlayerId },
    /// Drag on the position control, in milliseconds.
    ScrubPosition {
        pid: PlayerId,
        event: ScrubEvent<u64>,
    },
    /// Drag on the volume control (0-100).
    ScrubVolume { pid: PlayerId, event: ScrubEvent<u8> },
    /// Transport button.
    PressControl { pid: PlayerId, action: ControlAction },
}
