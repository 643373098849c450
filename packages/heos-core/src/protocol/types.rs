//! HEOS domain types for players and their now-playing state.
//!
//! These types are the persistent half of the reconciliation engine: the
//! registry stores one [`Player`] per roster entry and folds decoded events
//! into its optional [`NowPlaying`] record.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─────────────────────────────────────────────────────────────────────────────
// Player Identity
// ─────────────────────────────────────────────────────────────────────────────

/// Opaque, protocol-assigned player identifier.
///
/// HEOS reports pids as signed integers in roster payloads but as strings in
/// parsed command messages, so both are normalized to their decimal text form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Creates an id from its textual form.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as it is sent back to the server.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Normalizes a JSON scalar (number or non-empty string) into an id.
    #[must_use]
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => Some(Self(n.to_string())),
            serde_json::Value::String(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
            }
            _ => None,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Transport State
// ─────────────────────────────────────────────────────────────────────────────

/// Playback transport state of a HEOS player.
///
/// Serializes in lowercase (`"playing"`, `"paused"`, ...) for the presentation layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportState {
    Playing,
    Paused,
    Stopped,
    #[default]
    Unknown,
}

impl TransportState {
    /// Returns true if position should advance with wall-clock time.
    #[must_use]
    pub fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Playing => write!(f, "Playing"),
            Self::Paused => write!(f, "Paused"),
            Self::Stopped => write!(f, "Stopped"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Error returned when parsing an unknown transport state string.
#[derive(Debug, Clone, Error)]
#[error("unknown transport state")]
pub struct ParseTransportStateError;

impl std::str::FromStr for TransportState {
    type Err = ParseTransportStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "play" | "playing" => Ok(Self::Playing),
            "pause" | "paused" => Ok(Self::Paused),
            "stop" | "stopped" => Ok(Self::Stopped),
            _ => Err(ParseTransportStateError),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Now Playing
// ─────────────────────────────────────────────────────────────────────────────

/// Track metadata shown for the current media item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub artwork_url: Option<String>,
}

/// Current transport and track state of one player.
///
/// Created lazily by the first event that needs it. Every later event is
/// merged field by field via [`NowPlaying::merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NowPlaying {
    pub track: Track,
    /// Media kind as reported by the server (`song`, `station`, ...).
    pub media_type: Option<String>,
    pub station: Option<String>,
    /// Media id, stable for the same track within a source.
    pub media_id: Option<String>,
    pub queue_id: Option<String>,
    pub album_id: Option<String>,
    pub transport_state: TransportState,
    pub position_ms: Option<u64>,
    pub duration_ms: Option<u64>,
    /// Volume level (0-100).
    pub volume: Option<u8>,
    pub muted: Option<bool>,
}

/// Sparse set of now-playing fields carried by one event.
///
/// `None` always means "no update for this field".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NowPlayingPatch {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub artwork_url: Option<String>,
    pub media_type: Option<String>,
    pub station: Option<String>,
    pub media_id: Option<String>,
    pub queue_id: Option<String>,
    pub album_id: Option<String>,
    pub position_ms: Option<u64>,
    pub duration_ms: Option<u64>,
}

impl NowPlayingPatch {
    /// Returns true if the patch carries any track identity field.
    #[must_use]
    pub fn touches_track(&self) -> bool {
        self.title.is_some()
            || self.artist.is_some()
            || self.album.is_some()
            || self.media_id.is_some()
    }
}

/// Overwrites `slot` when the patch carries a value.
fn merge_field<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
    if let Some(v) = value {
        *slot = Some(v.clone());
    }
}

impl NowPlaying {
    /// Shallow, last-write-wins merge. Fields absent from `patch` are preserved.
    ///
    /// Returns true if a known track identity (title, artist, album or media
    /// id) was replaced by a different one. Filling in the identity of a
    /// record that had none is not a change.
    pub fn merge(&mut self, patch: &NowPlayingPatch) -> bool {
        let before = (
            self.track.title.clone(),
            self.track.artist.clone(),
            self.track.album.clone(),
            self.media_id.clone(),
        );

        merge_field(&mut self.track.title, &patch.title);
        merge_field(&mut self.track.artist, &patch.artist);
        merge_field(&mut self.track.album, &patch.album);
        merge_field(&mut self.track.artwork_url, &patch.artwork_url);
        merge_field(&mut self.media_type, &patch.media_type);
        merge_field(&mut self.station, &patch.station);
        merge_field(&mut self.media_id, &patch.media_id);
        merge_field(&mut self.queue_id, &patch.queue_id);
        merge_field(&mut self.album_id, &patch.album_id);
        merge_field(&mut self.position_ms, &patch.position_ms);
        merge_field(&mut self.duration_ms, &patch.duration_ms);

        let had_identity =
            before.0.is_some() || before.1.is_some() || before.2.is_some() || before.3.is_some();

        had_identity
            && patch.touches_track()
            && before
                != (
                    self.track.title.clone(),
                    self.track.artist.clone(),
                    self.track.album.clone(),
                    self.media_id.clone(),
                )
    }

    /// Treats a track change as a progress reset.
    ///
    /// Position and duration go back to 0 unless `patch` itself carries them.
    pub fn reset_progress(&mut self, patch: &NowPlayingPatch) {
        self.position_ms = Some(patch.position_ms.unwrap_or(0));
        self.duration_ms = Some(patch.duration_ms.unwrap_or(0));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Player
// ─────────────────────────────────────────────────────────────────────────────

/// One addressable audio endpoint from the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    /// Human-readable room name, fixed for the session.
    pub name: String,
    pub model: Option<String>,
    pub version: Option<String>,
    /// Group id if the player is currently grouped.
    pub group_id: Option<String>,
    pub now_playing: Option<NowPlaying>,
}

impl Player {
    /// Creates a player with no now-playing state.
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            model: None,
            version: None,
            group_id: None,
            now_playing: None,
        }
    }

    /// Returns the now-playing record, creating a minimal one if absent.
    pub fn now_playing_mut(&mut self) -> &mut NowPlaying {
        self.now_playing.get_or_insert_with(NowPlaying::default)
    }
}
