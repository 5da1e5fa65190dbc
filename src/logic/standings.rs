//! Match replay and standings: period-scoped progress rebuilt from the match log.

use crate::logic::phase::apply_outcome;
use crate::models::{League, MatchRecord, Period, Player, PlayerId, PlayerRow};
use std::collections::HashMap;

/// Rebuild progress by folding [`apply_outcome`] over `matches` in chronological
/// order, starting each of `players` at the zero record (id and name kept).
///
/// Ids in the matches that are not among `players` are ignored. Never touches
/// the stored records. Output keeps the order of `players`.
pub fn replay(players: &[Player], matches: &[MatchRecord]) -> Vec<Player> {
    let mut progress: HashMap<PlayerId, Player> = players
        .iter()
        .map(|p| (p.id, Player::with_id(p.id, p.name.clone())))
        .collect();

    let mut ordered: Vec<&MatchRecord> = matches.iter().collect();
    ordered.sort_by_key(|m| (m.played_at, m.number));

    for m in ordered {
        for &pid in &m.winners {
            if let Some(p) = progress.get_mut(&pid) {
                *p = apply_outcome(p, true);
            }
        }
        for &pid in &m.losers {
            if let Some(p) = progress.get_mut(&pid) {
                *p = apply_outcome(p, false);
            }
        }
    }

    players
        .iter()
        .filter_map(|p| progress.remove(&p.id))
        .collect()
}

/// Progress records for a period.
///
/// All time returns the stored records. A period replays the matches logged in
/// it; when none were logged, the stored records are returned instead (they
/// are assumed to belong to that period).
pub fn period_progress(league: &League, period: Period, current_year: i32) -> Vec<Player> {
    let players = league.players_by_name();
    if period.is_all_time() {
        return players;
    }
    let matches: Vec<MatchRecord> = league
        .matches
        .iter()
        .filter(|m| period.contains(m.played_at, current_year))
        .cloned()
        .collect();
    if matches.is_empty() {
        return players;
    }
    replay(&players, &matches)
}

/// Standings rows for a period, ordered by wins, then win percentage, then name.
pub fn standings(league: &League, period: Period, current_year: i32) -> Vec<PlayerRow> {
    let mut rows: Vec<PlayerRow> = period_progress(league, period, current_year)
        .iter()
        .map(PlayerRow::from_player)
        .collect();
    sort_standings(&mut rows);
    rows
}

pub fn sort_standings(rows: &mut [PlayerRow]) {
    rows.sort_by(|a, b| {
        b.player
            .wins
            .cmp(&a.player.wins)
            .then_with(|| b.win_percentage.total_cmp(&a.win_percentage))
            .then_with(|| a.player.name.to_lowercase().cmp(&b.player.name.to_lowercase()))
    });
}
