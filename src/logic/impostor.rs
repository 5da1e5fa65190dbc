//! Impostor party game: pick a secret word and the players who don't get it.

use rand::seq::{index, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Errors dealing an impostor round.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ImpostorError {
    NoPlayers,
    NoWords,
}

impl std::fmt::Display for ImpostorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImpostorError::NoPlayers => write!(f, "Need at least one player"),
            ImpostorError::NoWords => write!(f, "Need at least one secret word"),
        }
    }
}

impl std::error::Error for ImpostorError {}

/// One player's card: the secret word, or `None` for an impostor.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Seat {
    pub player: String,
    pub word: Option<String>,
}

/// A dealt round.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub secret: String,
    /// Seat order matches the input player order.
    pub seats: Vec<Seat>,
}

impl Deal {
    pub fn impostor_count(&self) -> usize {
        self.seats.iter().filter(|s| s.word.is_none()).count()
    }
}

/// Uniformly pick one item, or `None` if empty.
pub fn pick_secret<'a, T, R: Rng + ?Sized>(items: &'a [T], rng: &mut R) -> Option<&'a T> {
    items.choose(rng)
}

/// Distinct random seat indices for the impostors.
///
/// `count` is clamped to `total - 1` so someone always holds the word.
pub fn impostor_indices<R: Rng + ?Sized>(total: usize, count: usize, rng: &mut R) -> Vec<usize> {
    if total == 0 || count == 0 {
        return Vec::new();
    }
    let count = count.min(total - 1);
    index::sample(rng, total, count).into_vec()
}

/// Deal a round: one secret word from `words`, `impostors` players without it.
pub fn deal<R: Rng + ?Sized>(
    players: &[String],
    words: &[String],
    impostors: usize,
    rng: &mut R,
) -> Result<Deal, ImpostorError> {
    if players.is_empty() {
        return Err(ImpostorError::NoPlayers);
    }
    let secret = pick_secret(words, rng).ok_or(ImpostorError::NoWords)?.clone();
    let chosen = impostor_indices(players.len(), impostors, rng);
    let seats = players
        .iter()
        .enumerate()
        .map(|(i, name)| Seat {
            player: name.clone(),
            word: if chosen.contains(&i) { None } else { Some(secret.clone()) },
        })
        .collect();
    Ok(Deal { secret, seats })
}
