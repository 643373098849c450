//! Shared test fixtures for inbound event-stream messages.
//!
//! These constants are used by multiple test modules to avoid duplication.

/// Roster with two players, Kitchen first.
pub const GET_PLAYERS: &str = r#"{
  "heos": {
    "command": {"commandGroup": "player", "command": "get_players"},
    "result": "success",
    "message": {"raw": "", "parsed": {}}
  },
  "payload": [
    {"name": "Kitchen", "pid": "A", "model": "HEOS 1", "version": "1.583.147"},
    {"name": "Den", "pid": "B", "model": "HEOS 3", "gid": "B"}
  ]
}"#;

/// Roster where only the Den remains.
pub const GET_PLAYERS_DEN_ONLY: &str = r#"{
  "heos": {"command": {"commandGroup": "player", "command": "get_players"}},
  "payload": [{"name": "Den", "pid": "B"}]
}"#;

/// Now-playing media query response for player A.
pub const GET_NOW_PLAYING_MEDIA_A: &str = r#"{
  "heos": {
    "command": {"commandGroup": "player", "command": "get_now_playing_media"},
    "message": {"raw": "pid=A", "parsed": {"pid": "A"}}
  },
  "payload": {
    "type": "song",
    "song": "Blue in Green",
    "album": "Kind of Blue",
    "artist": "Miles Davis",
    "image_url": "http://art.example/kob.jpg",
    "mid": "m-101",
    "qid": 3,
    "sid": 1024
  }
}"#;

/// Now-playing media query response for a player that is not in the roster.
pub const GET_NOW_PLAYING_MEDIA_Z: &str = r#"{
  "heos": {
    "command": {"commandGroup": "player", "command": "get_now_playing_media"},
    "message": {"parsed": {"pid": "Z"}}
  },
  "payload": {"song": "Ghost Track"}
}"#;

/// Play-state query response: A is playing.
pub const GET_PLAY_STATE_A_PLAY: &str = r#"{
  "heos": {
    "command": {"commandGroup": "player", "command": "get_play_state"},
    "message": {"raw": "pid=A&state=play", "parsed": {"pid": "A", "state": "play"}}
  }
}"#;

/// Play-state change event: A paused.
pub const STATE_CHANGED_A_PAUSE: &str = r#"{
  "heos": {
    "command": {"commandGroup": "event", "command": "player_state_changed"},
    "message": {"parsed": {"pid": "A", "state": "pause"}}
  }
}"#;

/// Volume query response for A.
pub const GET_VOLUME_A: &str = r#"{
  "heos": {
    "command": {"commandGroup": "player", "command": "get_volume"},
    "message": {"parsed": {"pid": "A", "level": "35"}}
  }
}"#;

/// Volume change event for A carrying mute.
pub const VOLUME_CHANGED_A: &str = r#"{
  "heos": {
    "command": {"commandGroup": "event", "command": "player_volume_changed"},
    "message": {"parsed": {"pid": "A", "level": 12, "mute": "on"}}
  }
}"#;

/// Progress event for A at 40s of 300s.
pub const PROGRESS_A_40S: &str = r#"{
  "heos": {
    "command": {"commandGroup": "event", "command": "player_now_playing_progress"},
    "message": {"parsed": {"pid": "A", "cur_pos": "40000", "duration": "300000"}}
  }
}"#;

/// Now-playing changed event for A.
pub const NOW_PLAYING_CHANGED_A: &str = r#"{
  "heos": {
    "command": {"commandGroup": "event", "command": "player_now_playing_changed"},
    "message": {"parsed": {"pid": "A"}}
  }
}"#;

/// A command this client does not consume.
pub const UNKNOWN_COMMAND: &str = r#"{
  "heos": {
    "command": {"commandGroup": "browse", "command": "get_music_sources"}
  },
  "payload": []
}"#;
