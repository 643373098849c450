//! Outbound control commands.
//!
//! Commands are one-way triggers: nothing is awaited or correlated back into
//! player state. Whatever the player does in response arrives later through
//! the event stream like any other change.

mod dispatcher;
mod http;

pub use dispatcher::CommandDispatcher;
pub use http::HttpCommandTransport;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::protocol::PlayerId;

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur while sending a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// HTTP request to the server failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("HTTP error {0}")]
    HttpStatus(u16),

    /// Command URL could not be built from the configured base URL.
    #[error("Invalid command URL: {0}")]
    InvalidUrl(String),
}

/// Convenient Result alias for command operations.
pub type CommandResult<T> = Result<T, CommandError>;

impl CommandError {
    /// Returns true if the request never reached the player and can be resent.
    ///
    /// Timeouts are not transient here: a timed-out `next` may already have
    /// skipped a track.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_connect(),
            Self::HttpStatus(status) => *status == 503,
            _ => false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Command
// ─────────────────────────────────────────────────────────────────────────────

/// One outbound control request for a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    Play { pid: PlayerId },
    Pause { pid: PlayerId },
    Next { pid: PlayerId },
    Previous { pid: PlayerId },
    SetVolume { pid: PlayerId, level: u8 },
    /// Position in milliseconds.
    Seek { pid: PlayerId, position_ms: u64 },
}

impl Command {
    /// Target player.
    #[must_use]
    pub fn pid(&self) -> &PlayerId {
        match self {
            Self::Play { pid }
            | Self::Pause { pid }
            | Self::Next { pid }
            | Self::Previous { pid }
            | Self::SetVolume { pid, .. }
            | Self::Seek { pid, .. } => pid,
        }
    }

    /// Endpoint name, relative to the server base URL.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Play { .. } => "play",
            Self::Pause { .. } => "pause",
            Self::Next { .. } => "next",
            Self::Previous { .. } => "previous",
            Self::SetVolume { .. } => "set_volume",
            Self::Seek { .. } => "seek",
        }
    }

    /// Query parameters in the order the server expects them.
    #[must_use]
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("pid", self.pid().to_string())];
        match self {
            Self::SetVolume { level, .. } => params.push(("level", level.to_string())),
            Self::Seek { position_ms, .. } => params.push(("position", position_ms.to_string())),
            _ => {}
        }
        params
    }
}

/// Sends commands to the server.
///
/// Implementations only deliver the request; the dispatcher decides what to
/// do with a failure (it logs and moves on).
#[async_trait]
pub trait CommandTransport: Send + Sync {
    /// Sends one command and waits for the server to accept it.
    async fn send(&self, command: &Command) -> CommandResult<()>;
}
