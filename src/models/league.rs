//! League: the player store, match log, and match counter, plus JSON snapshots.

use crate::models::game::{MatchCounter, MatchId, MatchRecord};
use crate::models::period::Period;
use crate::models::player::{Phase, Player, PlayerId};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// Errors that can occur during league operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LeagueError {
    /// Player name is empty after trimming.
    EmptyName,
    /// A player with this name already exists (names are unique, case-insensitive).
    DuplicatePlayerName,
    /// Player not found in the store.
    PlayerNotFound(PlayerId),
    /// Match not found in the match log.
    MatchNotFound(MatchId),
    /// Neither side of the match names a player.
    EmptyMatch,
    /// The same player was put on the winning and the losing side.
    PlayerOnBothSides(PlayerId),
    /// The same player appears twice on one side.
    DuplicatePlayerInTeam(PlayerId),
    /// Stage index outside the bracket.
    StageOutOfRange(usize),
    /// Month outside 1-12.
    InvalidMonth(u32),
}

impl std::fmt::Display for LeagueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeagueError::EmptyName => write!(f, "Player name cannot be empty"),
            LeagueError::DuplicatePlayerName => write!(f, "A player with this name already exists"),
            LeagueError::PlayerNotFound(_) => write!(f, "Player not found"),
            LeagueError::MatchNotFound(_) => write!(f, "Match not found"),
            LeagueError::EmptyMatch => write!(f, "A match needs at least one winner or loser"),
            LeagueError::PlayerOnBothSides(_) => write!(f, "A player cannot be on both teams"),
            LeagueError::DuplicatePlayerInTeam(_) => write!(f, "A player was selected twice"),
            LeagueError::StageOutOfRange(i) => {
                write!(f, "Stage {} is out of range (0-{})", i, Phase::LAST_INDEX)
            }
            LeagueError::InvalidMonth(m) => write!(f, "Month {} is out of range (1-12)", m),
        }
    }
}

impl std::error::Error for LeagueError {}

/// Errors from loading or saving a league snapshot.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "Snapshot I/O error: {}", e),
            StoreError::Json(e) => write!(f, "Snapshot JSON error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Json(e)
    }
}

/// Full league state: stored players, the match log, and the match counter.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct League {
    /// All-time stored progress records.
    #[serde(default)]
    pub players: Vec<Player>,
    /// Settled matches in settlement order (append-only except for undo).
    #[serde(default)]
    pub matches: Vec<MatchRecord>,
    #[serde(default)]
    pub counter: MatchCounter,
}

impl League {
    /// Create an empty league.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a league with initial players.
    pub fn with_players(players: Vec<Player>) -> Self {
        Self {
            players,
            ..Self::new()
        }
    }

    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn get_player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Players ordered by name (case-insensitive).
    pub fn players_by_name(&self) -> Vec<Player> {
        let mut players = self.players.clone();
        players.sort_by_key(|p| p.name.to_lowercase());
        players
    }

    /// Add a player. Names must be unique (case-insensitive).
    pub fn add_player(&mut self, name: impl Into<String>) -> Result<&Player, LeagueError> {
        let name = name.into();
        let name_trimmed = name.trim();
        if name_trimmed.is_empty() {
            return Err(LeagueError::EmptyName);
        }
        if self.has_player_named(name_trimmed) {
            return Err(LeagueError::DuplicatePlayerName);
        }
        self.players.push(Player::new(name_trimmed));
        Ok(&self.players[self.players.len() - 1])
    }

    pub fn has_player_named(&self, name: &str) -> bool {
        self.players
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Remove a player by id. Their past matches stay in the log.
    pub fn remove_player(&mut self, player_id: PlayerId) -> Result<Player, LeagueError> {
        let idx = self
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or(LeagueError::PlayerNotFound(player_id))?;
        Ok(self.players.remove(idx))
    }

    /// Replace the stored record with the same id, or insert it.
    pub fn upsert_player(&mut self, player: Player) {
        match self.get_player_mut(player.id) {
            Some(existing) => *existing = player,
            None => self.players.push(player),
        }
    }

    /// Administrative override: set the stage directly, leaving every counter untouched.
    pub fn set_stage(&mut self, player_id: PlayerId, stage_index: usize) -> Result<&Player, LeagueError> {
        if stage_index > Phase::LAST_INDEX {
            return Err(LeagueError::StageOutOfRange(stage_index));
        }
        let p = self
            .get_player_mut(player_id)
            .ok_or(LeagueError::PlayerNotFound(player_id))?;
        p.stage_index = stage_index;
        Ok(&*p)
    }

    pub fn set_initial_match_number(&mut self, n: u64) {
        self.counter.set_initial(n);
    }

    pub fn find_match(&self, match_id: MatchId) -> Option<&MatchRecord> {
        self.matches.iter().find(|m| m.id == match_id)
    }

    /// Matches in the period, newest first.
    pub fn matches_in(&self, period: Period, current_year: i32) -> Vec<MatchRecord> {
        let mut matches: Vec<MatchRecord> = self
            .matches
            .iter()
            .filter(|m| period.contains(m.played_at, current_year))
            .cloned()
            .collect();
        matches.sort_by(|a, b| (b.played_at, b.number).cmp(&(a.played_at, a.number)));
        matches
    }

    /// All time: the counter (includes the admin offset). A period: matches logged in it.
    pub fn match_count(&self, period: Period, current_year: i32) -> u64 {
        if period.is_all_time() {
            return self.counter.total_matches;
        }
        self.matches
            .iter()
            .filter(|m| period.contains(m.played_at, current_year))
            .count() as u64
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a snapshot. Numbering resumes after the highest logged match number.
    pub fn from_json(s: &str) -> Result<Self, StoreError> {
        let mut league: League = serde_json::from_str(s)?;
        if let Some(max) = league.matches.iter().map(|m| m.number).max() {
            league.counter.observe(max);
        }
        Ok(league)
    }

    /// Load a snapshot; a missing file yields an empty league.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(s) => Self::from_json(&s),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        write_snapshot(path, &self.to_json()?)
    }
}

/// Write snapshot JSON atomically: a temp file in the same directory is
/// synced and renamed over `path`, so a failed write leaves the old snapshot.
pub fn write_snapshot(path: impl AsRef<Path>, json: &str) -> Result<(), StoreError> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(json.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
    Ok(())
}
