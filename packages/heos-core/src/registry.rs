//! Player registry.
//!
//! Pure data structure mapping player ids to player state. The registry is
//! replaced wholesale on every roster and mutated in place afterwards; all
//! per-player access goes through [`PlayerRegistry::lookup_mut`], which is the
//! single place stale ids are rejected.

use std::collections::HashMap;

use crate::protocol::{Player, PlayerId};

/// Owned map of the players from the most recent roster.
///
/// Roster order is preserved for presentation.
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    players: HashMap<PlayerId, Player>,
    /// Ids in roster order.
    order: Vec<PlayerId>,
}

impl PlayerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole registry with `players`.
    ///
    /// State held for ids missing from the new roster is dropped. Duplicate ids
    /// keep their first occurrence.
    pub fn replace(&mut self, players: Vec<Player>) {
        self.players.clear();
        self.order.clear();

        for player in players {
            if self.players.contains_key(&player.id) {
                log::debug!("[Registry] Duplicate roster entry for {}", player.id);
                continue;
            }
            self.order.push(player.id.clone());
            self.players.insert(player.id.clone(), player);
        }
    }

    /// Returns the player for `id`, or `None` if the id is not in the roster.
    #[must_use]
    pub fn lookup(&self, id: &PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    /// Guarded mutable accessor used by every per-player transition.
    ///
    /// A miss means the event is stale (the player left the roster or never
    /// joined it) and is logged at debug level.
    pub fn lookup_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        let player = self.players.get_mut(id);
        if player.is_none() {
            log::debug!("[Registry] Dropping event for unknown player {}", id);
        }
        player
    }

    /// Checks if `id` is part of the current roster.
    #[must_use]
    pub fn contains(&self, id: &PlayerId) -> bool {
        self.players.contains_key(id)
    }

    /// Returns the first player id in roster order.
    #[must_use]
    pub fn first_id(&self) -> Option<&PlayerId> {
        self.order.first()
    }

    /// Returns the player ids in roster order.
    pub fn ids(&self) -> impl Iterator<Item = &PlayerId> {
        self.order.iter()
    }

    /// Returns the players in roster order.
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.order.iter().filter_map(|id| self.players.get(id))
    }

    /// Returns the number of players.
    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Returns true if no roster has been loaded or the last roster was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
