//! Centralized error types for the HEOS client core.
//!
//! Each concern defines its own `thiserror` enum next to the code that
//! raises it. [`HeosError`] collects them for callers that only need a
//! message and a machine-readable code.

use serde::Serialize;
use thiserror::Error;

use crate::commands::CommandError;
use crate::preferences::PreferenceError;
use crate::protocol::DecodeError;
use crate::transport::TransportError;

/// Trait for error types that provide machine-readable error codes.
pub trait ErrorCode {
    /// Returns a machine-readable error code.
    fn code(&self) -> &'static str;
}

impl ErrorCode for DecodeError {
    fn code(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "malformed_message",
            Self::NotAnObject => "message_not_object",
        }
    }
}

impl ErrorCode for CommandError {
    fn code(&self) -> &'static str {
        match self {
            Self::Http(_) => "http_request_failed",
            Self::HttpStatus(_) => "http_error_status",
            Self::InvalidUrl(_) => "invalid_command_url",
        }
    }
}

impl ErrorCode for TransportError {
    fn code(&self) -> &'static str {
        match self {
            Self::Http(_) => "http_request_failed",
            Self::HttpStatus(_) => "http_error_status",
            Self::Closed => "event_stream_closed",
        }
    }
}

impl ErrorCode for PreferenceError {
    fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "preference_io_failed",
            Self::Serde(_) => "preference_format_invalid",
        }
    }
}

/// Crate-wide error type.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum HeosError {
    /// Inbound message could not be decoded.
    #[error("Decode failed: {0}")]
    Decode(String),

    /// Outbound command failed.
    #[error("Command failed: {0}")]
    Command(String),

    /// Event stream connection failed.
    #[error("Event stream failed: {0}")]
    Transport(String),

    /// Preference storage failed.
    #[error("Preference storage failed: {0}")]
    Preference(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error (runtime setup and the like).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HeosError {
    /// Returns a machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode_error",
            Self::Command(_) => "command_error",
            Self::Transport(_) => "transport_error",
            Self::Preference(_) => "preference_error",
            Self::Configuration(_) => "configuration_error",
            Self::Internal(_) => "internal_error",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Result Type Aliases
// ─────────────────────────────────────────────────────────────────────────────

pub use crate::commands::CommandResult;
pub use crate::preferences::PreferenceResult;
pub use crate::protocol::DecodeResult;
pub use crate::transport::TransportResult;

/// Convenient Result alias for crate-wide operations.
pub type HeosResult<T> = Result<T, HeosError>;

impl From<DecodeError> for HeosError {
    fn from(err: DecodeError) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<CommandError> for HeosError {
    fn from(err: CommandError) -> Self {
        Self::Command(err.to_string())
    }
}

impl From<TransportError> for HeosError {
    fn from(err: TransportError) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<PreferenceError> for HeosError {
    fn from(err: PreferenceError) -> Self {
        Self::Preference(err.to_string())
    }
}
