//! Match settlement and undo against the league store.

use crate::logic::phase::apply_outcome;
use crate::logic::standings::replay;
use crate::models::{League, LeagueError, MatchId, MatchRecord, Player, PlayerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Result of settling a match: updated records and the logged match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub winners: Vec<Player>,
    pub losers: Vec<Player>,
    #[serde(rename = "match")]
    pub record: MatchRecord,
}

/// How to remove a match's effect on stored players.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndoPolicy {
    /// Decrement the match's wins/losses (and group counters while in Group).
    /// Stage advancement, group resets, and championships caused by the match
    /// are NOT reverted.
    #[default]
    Reverse,
    /// Rebuild each involved player from the remaining match log, starting at
    /// the zero record. Loses anything not in the log (history before the log
    /// started, stage overrides).
    Replay,
}

/// Check both sides before touching any record.
fn validate_sides(league: &League, winners: &[PlayerId], losers: &[PlayerId]) -> Result<(), LeagueError> {
    if winners.is_empty() && losers.is_empty() {
        return Err(LeagueError::EmptyMatch);
    }
    let mut seen_winners = HashSet::new();
    for &id in winners {
        if !seen_winners.insert(id) {
            return Err(LeagueError::DuplicatePlayerInTeam(id));
        }
    }
    let mut seen_losers = HashSet::new();
    for &id in losers {
        if !seen_losers.insert(id) {
            return Err(LeagueError::DuplicatePlayerInTeam(id));
        }
        if seen_winners.contains(&id) {
            return Err(LeagueError::PlayerOnBothSides(id));
        }
    }
    for &id in winners.iter().chain(losers) {
        if league.get_player(id).is_none() {
            return Err(LeagueError::PlayerNotFound(id));
        }
    }
    Ok(())
}

/// Settle a match: apply a win to every winner and a loss to every loser,
/// count it, and append it to the match log.
///
/// One side may be empty (a single player's result recorded on its own).
/// Validation happens first; on error nothing is changed.
pub fn settle_match(
    league: &mut League,
    winners: &[PlayerId],
    losers: &[PlayerId],
    played_at: DateTime<Utc>,
) -> Result<Settlement, LeagueError> {
    validate_sides(league, winners, losers)?;

    let updated_winners = apply_side(league, winners, true)?;
    let updated_losers = apply_side(league, losers, false)?;

    let number = league.counter.increment();
    let record = MatchRecord::new(number, played_at, winners.to_vec(), losers.to_vec());
    league.matches.push(record.clone());

    log::info!(
        "Settled match #{} ({} winner(s), {} loser(s))",
        number,
        winners.len(),
        losers.len()
    );

    Ok(Settlement {
        winners: updated_winners,
        losers: updated_losers,
        record,
    })
}

fn apply_side(league: &mut League, ids: &[PlayerId], did_win: bool) -> Result<Vec<Player>, LeagueError> {
    let mut updated = Vec::with_capacity(ids.len());
    for &pid in ids {
        let p = league
            .get_player_mut(pid)
            .ok_or(LeagueError::PlayerNotFound(pid))?;
        *p = apply_outcome(p, did_win);
        updated.push(p.clone());
    }
    Ok(updated)
}

/// Undo a logged match: adjust the involved players per `policy`, delete the
/// match from the log, and decrement the counter. Returns the adjusted players.
///
/// Players removed from the store since the match are skipped.
pub fn undo_match(league: &mut League, match_id: MatchId, policy: UndoPolicy) -> Result<Vec<Player>, LeagueError> {
    let idx = league
        .matches
        .iter()
        .position(|m| m.id == match_id)
        .ok_or(LeagueError::MatchNotFound(match_id))?;
    let record = league.matches.remove(idx);

    let adjusted = match policy {
        UndoPolicy::Reverse => reverse_match(league, &record),
        UndoPolicy::Replay => replay_involved(league, &record),
    };

    league.counter.decrement();
    log::info!(
        "Undid match #{} ({:?}), {} player(s) adjusted",
        record.number,
        policy,
        adjusted.len()
    );
    Ok(adjusted)
}

/// Undo an outcome by decrementing counters only. Approximate.
pub fn reverse_outcome(player: &Player, did_win: bool) -> Player {
    let mut p = player.clone();
    if did_win {
        p.wins = p.wins.saturating_sub(1);
        if p.in_group() {
            p.group_wins = p.group_wins.saturating_sub(1);
        }
    } else {
        p.losses = p.losses.saturating_sub(1);
        if p.in_group() {
            p.group_losses = p.group_losses.saturating_sub(1);
        }
    }
    p
}

fn reverse_match(league: &mut League, record: &MatchRecord) -> Vec<Player> {
    let roles = record
        .winners
        .iter()
        .map(|&id| (id, true))
        .chain(record.losers.iter().map(|&id| (id, false)));
    let mut adjusted = Vec::new();
    for (id, did_win) in roles {
        if let Some(p) = league.get_player_mut(id) {
            *p = reverse_outcome(p, did_win);
            adjusted.push(p.clone());
        }
    }
    adjusted
}

/// Recompute the match's players from the (already trimmed) log.
fn replay_involved(league: &mut League, record: &MatchRecord) -> Vec<Player> {
    let involved: Vec<Player> = league
        .players
        .iter()
        .filter(|p| record.involves(p.id))
        .cloned()
        .collect();
    let rebuilt = replay(&involved, &league.matches);
    for p in &rebuilt {
        league.upsert_player(p.clone());
    }
    rebuilt
}
