//! Terminal front end: line commands in, one status line out.

use heos_core::{ControlAction, PlayerId, PlayerSnapshot, ScrubEvent, SessionSnapshot, UserIntent};

/// Help text printed for `help` or an unrecognized line.
pub const HELP: &str = "\
commands:
  play | pause | toggle      transport control
  next | prev                skip
  vol <0-100>                set volume
  seek <seconds>             jump to position (when enabled)
  players                    list players
  select <n|pid>             make player n (from `players`) or pid active
  help                       this text
  quit                       exit";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Control(ControlAction),
    Volume(u8),
    /// Target position in seconds.
    Seek(u64),
    Select(String),
    Players,
    Help,
    Quit,
}

/// Parses one input line. Empty lines parse to `None`.
pub fn parse_line(line: &str) -> Option<Result<ConsoleCommand, String>> {
    let mut words = line.split_whitespace();
    let verb = words.next()?.to_ascii_lowercase();
    let arg = words.next();

    let command = match (verb.as_str(), arg) {
        ("play", None) => ConsoleCommand::Control(ControlAction::Play),
        ("pause", None) => ConsoleCommand::Control(ControlAction::Pause),
        ("toggle" | "p", None) => ConsoleCommand::Control(ControlAction::PlayPause),
        ("next" | "n", None) => ConsoleCommand::Control(ControlAction::Next),
        ("prev" | "previous", None) => ConsoleCommand::Control(ControlAction::Previous),
        ("vol" | "volume", Some(level)) => match level.parse::<u8>() {
            Ok(level) if level <= 100 => ConsoleCommand::Volume(level),
            _ => return Some(Err(format!("volume must be 0-100, got '{}'", level))),
        },
        ("seek", Some(secs)) => match secs.parse::<u64>() {
            Ok(secs) => ConsoleCommand::Seek(secs),
            Err(_) => return Some(Err(format!("invalid seconds '{}'", secs))),
        },
        ("select", Some(target)) => ConsoleCommand::Select(target.to_string()),
        ("players" | "ls", None) => ConsoleCommand::Players,
        ("help" | "?", None) => ConsoleCommand::Help,
        ("quit" | "exit" | "q", None) => ConsoleCommand::Quit,
        _ => return Some(Err(format!("unknown command '{}'", line.trim()))),
    };
    Some(Ok(command))
}

/// Resolves a `select` target: a 1-based roster index or a player id.
pub fn resolve_player(snapshot: &SessionSnapshot, target: &str) -> Option<PlayerId> {
    if let Ok(index) = target.parse::<usize>() {
        if let Some(player) = index.checked_sub(1).and_then(|i| snapshot.players.get(i)) {
            return Some(player.id.clone());
        }
    }
    let id = PlayerId::new(target);
    snapshot.player(&id).map(|p| p.id.clone())
}

/// Turns a command into an intent for the active player.
///
/// Returns `None` for commands handled by the console itself.
pub fn to_intent(command: &ConsoleCommand, active: &PlayerId) -> Option<UserIntent> {
    let pid = active.clone();
    match command {
        ConsoleCommand::Control(action) => Some(UserIntent::PressControl {
            pid,
            action: *action,
        }),
        ConsoleCommand::Volume(level) => Some(UserIntent::ScrubVolume {
            pid,
            event: ScrubEvent::End(*level),
        }),
        ConsoleCommand::Seek(secs) => Some(UserIntent::ScrubPosition {
            pid,
            event: ScrubEvent::End(secs.saturating_mul(1000)),
        }),
        ConsoleCommand::Select(_)
        | ConsoleCommand::Players
        | ConsoleCommand::Help
        | ConsoleCommand::Quit => None,
    }
}

/// Renders the status line for one player.
pub fn status_line(player: &PlayerSnapshot) -> String {
    let state = match player.transport_state() {
        heos_core::TransportState::Playing => ">",
        heos_core::TransportState::Paused => "||",
        heos_core::TransportState::Stopped => "[]",
        heos_core::TransportState::Unknown => "?",
    };
    let track = player
        .now_playing
        .as_ref()
        .map(|np| {
            let title = np.track.title.as_deref().unwrap_or("-");
            match np.track.artist.as_deref() {
                Some(artist) if !artist.is_empty() => format!("{} / {}", title, artist),
                _ => title.to_string(),
            }
        })
        .unwrap_or_else(|| "nothing playing".to_string());
    let volume = player
        .volume
        .map_or_else(|| "--".to_string(), |v| v.to_string());
    let muted = player
        .now_playing
        .as_ref()
        .and_then(|np| np.muted)
        .unwrap_or(false);

    format!(
        "{} {} | {} | {} / {} | vol {}{}",
        state,
        player.name,
        track,
        player.position_text,
        player.duration_text,
        volume,
        if muted { " (muted)" } else { "" }
    )
}

/// Renders the numbered player list, marking the active one.
pub fn player_list(snapshot: &SessionSnapshot) -> String {
    if snapshot.players.is_empty() {
        return "no players".to_string();
    }
    snapshot
        .players
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let marker = if snapshot.active_player_id.as_ref() == Some(&p.id) {
                "*"
            } else {
                " "
            };
            format!(
                "{}{:>2}. {} ({}) {}",
                marker,
                i + 1,
                p.name,
                p.id,
                p.model.as_deref().unwrap_or("")
            )
            .trim_end()
            .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
