//! Settled match record and the match counter.

use crate::models::player::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// A settled match in the append-only match log.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    /// Sequence number taken from the match counter when the match was settled.
    pub number: u64,
    pub played_at: DateTime<Utc>,
    #[serde(default)]
    pub winners: Vec<PlayerId>,
    #[serde(default)]
    pub losers: Vec<PlayerId>,
}

impl MatchRecord {
    pub fn new(number: u64, played_at: DateTime<Utc>, winners: Vec<PlayerId>, losers: Vec<PlayerId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            number,
            played_at,
            winners,
            losers,
        }
    }

    /// True if the player took part, on either side.
    pub fn involves(&self, id: PlayerId) -> bool {
        self.winners.contains(&id) || self.losers.contains(&id)
    }
}

/// Running total of recorded matches, with an optional admin-set starting offset.
///
/// `total_matches` goes down on undo; `last_number` never does, so match
/// numbers are never handed out twice.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchCounter {
    #[serde(default)]
    pub total_matches: u64,
    #[serde(default)]
    pub initial_match_number: Option<u64>,
    /// Highest match number issued so far.
    #[serde(default)]
    pub last_number: u64,
}

impl MatchCounter {
    /// Count one more match and return its sequence number.
    pub fn increment(&mut self) -> u64 {
        self.total_matches += 1;
        self.last_number = (self.last_number + 1).max(self.total_matches);
        self.last_number
    }

    /// Remove one match from the total (floors at 0).
    pub fn decrement(&mut self) {
        self.total_matches = self.total_matches.saturating_sub(1);
    }

    /// Restart counting from `n` (matches played before the log existed).
    pub fn set_initial(&mut self, n: u64) {
        self.total_matches = n;
        self.initial_match_number = Some(n);
        self.last_number = self.last_number.max(n);
    }

    /// Make sure numbering continues after `number` (a number already in the log).
    pub fn observe(&mut self, number: u64) {
        self.last_number = self.last_number.max(number);
    }
}
