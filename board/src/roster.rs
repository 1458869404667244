//! Player roster: an ordered list re-sorted only when membership changes.

#[cfg(test)]
#[path = "roster_test.rs"]
mod roster_test;

use wire::{PlayerId, PlayerStatus, PlayerUpdate};

/// A player as shown in the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub score: i64,
    /// Position in the roster, contiguous from zero.
    pub ordinal: usize,
}

/// What a single update did to the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterChange {
    /// Nothing changed (duplicate add, unknown removal).
    Unchanged,
    /// A player's name or score changed; order is untouched.
    Contents,
    /// A player joined or left; ordinals were re-derived.
    Membership,
}

/// Ordered player roster.
#[derive(Debug, Default)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one player update.
    ///
    /// Anomalies (update or removal of an unknown player) are logged and
    /// recovered: an unknown `Updated` inserts, an unknown `Removed` is ignored.
    pub fn apply(&mut self, update: &PlayerUpdate) -> RosterChange {
        match update.status {
            PlayerStatus::Added | PlayerStatus::Present => {
                if self.position(update.id).is_some() {
                    return RosterChange::Unchanged;
                }
                self.insert(update);
                RosterChange::Membership
            }
            PlayerStatus::Updated => {
                let Some(idx) = self.position(update.id) else {
                    log::info!("update for unknown player {}, adding", update.id);
                    self.insert(update);
                    return RosterChange::Membership;
                };
                let player = &mut self.players[idx];
                let mut changed = false;
                if let Some(name) = update.name.as_ref().filter(|n| **n != player.name) {
                    player.name.clone_from(name);
                    changed = true;
                }
                if let Some(score) = update.score.filter(|s| *s != player.score) {
                    player.score = score;
                    changed = true;
                }
                if changed { RosterChange::Contents } else { RosterChange::Unchanged }
            }
            PlayerStatus::Removed => {
                let Some(idx) = self.position(update.id) else {
                    log::warn!("removal for unknown player {}", update.id);
                    return RosterChange::Unchanged;
                };
                self.players.remove(idx);
                self.reorder();
                RosterChange::Membership
            }
        }
    }

    /// Players in roster order.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    fn position(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    fn insert(&mut self, update: &PlayerUpdate) {
        self.players.push(Player {
            id: update.id,
            name: update.name.clone().unwrap_or_else(|| format!("Player {}", update.id)),
            score: update.score.unwrap_or(0),
            ordinal: 0,
        });
        self.reorder();
    }

    fn reorder(&mut self) {
        self.players.sort_by_key(|p| p.id);
        for (ordinal, player) in self.players.iter_mut().enumerate() {
            player.ordinal = ordinal;
        }
    }
}
