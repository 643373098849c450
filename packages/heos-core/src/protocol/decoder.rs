//! Inbound message decoding.
//!
//! Pure functions that turn one event-stream text message into a typed
//! [`HeosEvent`]. Messages this client does not consume decode to `Ok(None)`;
//! only text that is not a JSON object is an error.

use serde_json::Value;
use thiserror::Error;

use super::fields::{level, lookup, on_off, text, unsigned};
use super::types::{NowPlayingPatch, Player, PlayerId, TransportState};

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur while decoding an inbound message.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The message is not valid JSON.
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The message is valid JSON but not an object.
    #[error("message is not a JSON object")]
    NotAnObject,
}

/// Convenient Result alias for decoding.
pub type DecodeResult<T> = Result<T, DecodeError>;

// ─────────────────────────────────────────────────────────────────────────────
// Decoded Events
// ─────────────────────────────────────────────────────────────────────────────

/// A protocol event the reconciler knows how to fold into state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeosEvent {
    /// `player/get_players`: the full player list.
    Roster(Vec<Player>),
    /// `player/get_now_playing_media`: media metadata query response.
    NowPlayingMedia {
        pid: PlayerId,
        patch: NowPlayingPatch,
    },
    /// `event/player_now_playing_changed`: the player moved to another item.
    NowPlayingChanged {
        pid: PlayerId,
        patch: NowPlayingPatch,
    },
    /// `player/get_play_state` or `event/player_state_changed`.
    PlayState {
        pid: PlayerId,
        state: Option<TransportState>,
    },
    /// `player/get_volume` or `event/player_volume_changed`.
    Volume {
        pid: PlayerId,
        level: Option<u8>,
        muted: Option<bool>,
    },
    /// `event/player_now_playing_progress`.
    Progress {
        pid: PlayerId,
        position_ms: Option<u64>,
        duration_ms: Option<u64>,
    },
}

impl HeosEvent {
    /// Returns the targeted player, if the event targets one.
    #[must_use]
    pub fn player_id(&self) -> Option<&PlayerId> {
        match self {
            Self::Roster(_) => None,
            Self::NowPlayingMedia { pid, .. }
            | Self::NowPlayingChanged { pid, .. }
            | Self::PlayState { pid, .. }
            | Self::Volume { pid, .. }
            | Self::Progress { pid, .. } => Some(pid),
        }
    }

    /// Short name used in log lines.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Roster(_) => "roster",
            Self::NowPlayingMedia { .. } => "now_playing_media",
            Self::NowPlayingChanged { .. } => "now_playing_changed",
            Self::PlayState { .. } => "play_state",
            Self::Volume { .. } => "volume",
            Self::Progress { .. } => "progress",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Decoding
// ─────────────────────────────────────────────────────────────────────────────

const COMMAND_GROUP: &[&str] = &["heos", "command", "commandGroup"];
const COMMAND: &[&str] = &["heos", "command", "command"];
const PARSED: &[&str] = &["heos", "message", "parsed"];

/// Decodes one inbound text message.
///
/// Returns `Ok(None)` for unrecognized `(commandGroup, command)` pairs and for
/// per-player messages that carry no usable `pid`.
///
/// # Errors
///
/// Returns [`DecodeError`] if the text is not a JSON object.
pub fn decode(message: &str) -> DecodeResult<Option<HeosEvent>> {
    let root: Value = serde_json::from_str(message)?;
    if !root.is_object() {
        return Err(DecodeError::NotAnObject);
    }
    Ok(decode_value(&root))
}

/// Decodes an already-parsed message.
#[must_use]
pub fn decode_value(root: &Value) -> Option<HeosEvent> {
    let group = lookup(root, COMMAND_GROUP).and_then(Value::as_str);
    let command = lookup(root, COMMAND).and_then(Value::as_str);
    let parsed = lookup(root, PARSED);

    let event = match (group?, command?) {
        ("player", "get_players") => decode_roster(root.get("payload")?)?,
        ("player", "get_now_playing_media") => {
            let pid = parsed_pid(parsed)?;
            let patch = root
                .get("payload")
                .map(media_patch)
                .unwrap_or_default();
            HeosEvent::NowPlayingMedia { pid, patch }
        }
        ("event", "player_now_playing_changed") => {
            let pid = parsed_pid(parsed)?;
            let patch = parsed.map(media_patch).unwrap_or_default();
            HeosEvent::NowPlayingChanged { pid, patch }
        }
        ("player", "get_play_state") | ("event", "player_state_changed") => HeosEvent::PlayState {
            pid: parsed_pid(parsed)?,
            state: text(parsed.and_then(|p| p.get("state")))
                .map(|s| s.parse().unwrap_or(TransportState::Unknown)),
        },
        ("player", "get_volume") | ("event", "player_volume_changed") => HeosEvent::Volume {
            pid: parsed_pid(parsed)?,
            level: level(parsed.and_then(|p| p.get("level"))),
            muted: on_off(parsed.and_then(|p| p.get("mute"))),
        },
        ("event", "player_now_playing_progress") => HeosEvent::Progress {
            pid: parsed_pid(parsed)?,
            position_ms: unsigned(parsed.and_then(|p| p.get("cur_pos"))),
            duration_ms: unsigned(parsed.and_then(|p| p.get("duration"))),
        },
        (group, command) => {
            log::trace!("[Decoder] Ignoring {}/{}", group, command);
            return None;
        }
    };

    Some(event)
}

fn parsed_pid(parsed: Option<&Value>) -> Option<PlayerId> {
    let pid = parsed.and_then(|p| p.get("pid")).and_then(PlayerId::from_value);
    if pid.is_none() {
        log::debug!("[Decoder] Per-player message without pid");
    }
    pid
}

fn decode_roster(payload: &Value) -> Option<HeosEvent> {
    let Some(entries) = payload.as_array() else {
        log::debug!("[Decoder] Roster payload is not a list");
        return None;
    };
    Some(HeosEvent::Roster(
        entries.iter().filter_map(roster_entry).collect(),
    ))
}

fn roster_entry(entry: &Value) -> Option<Player> {
    let id = entry.get("pid").and_then(PlayerId::from_value)?;
    let name = text(entry.get("name")).unwrap_or_else(|| id.to_string());
    let mut player = Player::new(id, name);
    player.model = text(entry.get("model"));
    player.version = text(entry.get("version"));
    player.group_id = text(entry.get("gid"));
    Some(player)
}

/// Builds a patch from either a media payload or a parsed event message.
///
/// `pid` and unrecognized keys are ignored.
fn media_patch(source: &Value) -> NowPlayingPatch {
    NowPlayingPatch {
        title: text(source.get("song")),
        artist: text(source.get("artist")),
        album: text(source.get("album")),
        artwork_url: text(source.get("image_url")),
        media_type: text(source.get("type")),
        station: text(source.get("station")),
        media_id: text(source.get("mid")),
        queue_id: text(source.get("qid")),
        album_id: text(source.get("album_id")),
        position_ms: unsigned(source.get("cur_pos")),
        duration_ms: unsigned(source.get("duration")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::test_fixtures::*;

    fn pid(s: &str) -> PlayerId {
        PlayerId::new(s)
    }

    #[test]
    fn decodes_roster_in_order() {
        let Some(HeosEvent::Roster(players)) = decode(GET_PLAYERS).unwrap() else {
            panic!("expected roster");
        };
        let ids: Vec<_> = players.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["A", "B"]);
        assert_eq!(players[0].name, "Kitchen");
        assert_eq!(players[0].model.as_deref(), Some("HEOS 1"));
        assert_eq!(players[1].group_id.as_deref(), Some("B"));
        assert!(players.iter().all(|p| p.now_playing.is_none()));
    }

    #[test]
    fn events_report_kind_and_target() {
        let roster = decode(GET_PLAYERS).unwrap().unwrap();
        assert_eq!(roster.kind(), "roster");
        assert_eq!(roster.player_id(), None);

        let progress = decode(PROGRESS_A_40S).unwrap().unwrap();
        assert_eq!(progress.kind(), "progress");
        assert_eq!(progress.player_id(), Some(&pid("A")));
    }

    #[test]
    fn roster_skips_entries_without_pid() {
        let msg = r#"{"heos":{"command":{"commandGroup":"player","command":"get_players"}},
                      "payload":[{"name":"NoPid"},{"name":"Ok","pid":7}]}"#;
        let Some(HeosEvent::Roster(players)) = decode(msg).unwrap() else {
            panic!("expected roster");
        };
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].id, pid("7"));
    }

    #[test]
    fn roster_without_payload_is_ignored() {
        let msg = r#"{"heos":{"command":{"commandGroup":"player","command":"get_players"}}}"#;
        assert_eq!(decode(msg).unwrap(), None);
    }

    #[test]
    fn decodes_media_payload() {
        let event = decode(GET_NOW_PLAYING_MEDIA_A).unwrap().unwrap();
        let HeosEvent::NowPlayingMedia { pid: id, patch } = event else {
            panic!("expected media");
        };
        assert_eq!(id, pid("A"));
        assert_eq!(patch.title.as_deref(), Some("Blue in Green"));
        assert_eq!(patch.artist.as_deref(), Some("Miles Davis"));
        assert_eq!(patch.album.as_deref(), Some("Kind of Blue"));
        assert_eq!(patch.artwork_url.as_deref(), Some("http://art.example/kob.jpg"));
        assert_eq!(patch.queue_id.as_deref(), Some("3"));
        assert_eq!(patch.position_ms, None);
    }

    #[test]
    fn decodes_play_state_and_state_change() {
        assert_eq!(
            decode(GET_PLAY_STATE_A_PLAY).unwrap(),
            Some(HeosEvent::PlayState {
                pid: pid("A"),
                state: Some(TransportState::Playing)
            })
        );
        assert_eq!(
            decode(STATE_CHANGED_A_PAUSE).unwrap(),
            Some(HeosEvent::PlayState {
                pid: pid("A"),
                state: Some(TransportState::Paused)
            })
        );
    }

    #[test]
    fn unrecognized_state_maps_to_unknown() {
        let msg = r#"{"heos":{"command":{"commandGroup":"event","command":"player_state_changed"},
                      "message":{"parsed":{"pid":"A","state":"buffering"}}}}"#;
        assert_eq!(
            decode(msg).unwrap(),
            Some(HeosEvent::PlayState {
                pid: pid("A"),
                state: Some(TransportState::Unknown)
            })
        );
    }

    #[test]
    fn decodes_volume_with_mute() {
        assert_eq!(
            decode(GET_VOLUME_A).unwrap(),
            Some(HeosEvent::Volume {
                pid: pid("A"),
                level: Some(35),
                muted: None
            })
        );
        assert_eq!(
            decode(VOLUME_CHANGED_A).unwrap(),
            Some(HeosEvent::Volume {
                pid: pid("A"),
                level: Some(12),
                muted: Some(true)
            })
        );
    }

    #[test]
    fn decodes_progress() {
        assert_eq!(
            decode(PROGRESS_A_40S).unwrap(),
            Some(HeosEvent::Progress {
                pid: pid("A"),
                position_ms: Some(40_000),
                duration_ms: Some(300_000)
            })
        );
    }

    #[test]
    fn now_playing_changed_carries_empty_patch() {
        assert_eq!(
            decode(NOW_PLAYING_CHANGED_A).unwrap(),
            Some(HeosEvent::NowPlayingChanged {
                pid: pid("A"),
                patch: NowPlayingPatch::default()
            })
        );
    }

    #[test]
    fn unknown_command_is_ignored() {
        assert_eq!(decode(UNKNOWN_COMMAND).unwrap(), None);
    }

    #[test]
    fn missing_command_paths_are_ignored() {
        assert_eq!(decode("{}").unwrap(), None);
        assert_eq!(decode(r#"{"heos":{"command":"oops"}}"#).unwrap(), None);
    }

    #[test]
    fn per_player_message_without_pid_is_ignored() {
        let msg = r#"{"heos":{"command":{"commandGroup":"player","command":"get_volume"},
                      "message":{"parsed":{"level":"10"}}}}"#;
        assert_eq!(decode(msg).unwrap(), None);
    }

    #[test]
    fn malformed_text_is_an_error() {
        assert!(matches!(decode("not json"), Err(DecodeError::Malformed(_))));
        assert!(matches!(decode("[1,2,3]"), Err(DecodeError::NotAnObject)));
    }
}
