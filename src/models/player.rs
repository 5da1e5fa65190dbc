//! Player progress record, bracket phases, and the PlayerRow display view.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in matches and lookups).
pub type PlayerId = Uuid;

/// Bracket phase a player is currently in.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Group,
    RoundOf16,
    Quarterfinal,
    Semifinal,
    Final,
}

impl Phase {
    /// Phases in bracket order; `stage_index` indexes into this.
    pub const ALL: [Phase; 5] = [
        Phase::Group,
        Phase::RoundOf16,
        Phase::Quarterfinal,
        Phase::Semifinal,
        Phase::Final,
    ];

    /// Index of the Final phase.
    pub const LAST_INDEX: usize = Self::ALL.len() - 1;

    /// Phase for a stage index. Out-of-range indices map to the Final.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(Self::LAST_INDEX)]
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::Group => "Group",
            Phase::RoundOf16 => "Round of 16",
            Phase::Quarterfinal => "Quarterfinal",
            Phase::Semifinal => "Semifinal",
            Phase::Final => "Final",
        }
    }
}

/// A player's tournament progress.
///
/// Counters missing from stored data deserialize as zero.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub championships: u32,
    /// Index into [`Phase::ALL`]; 0 means the player is in the group stage.
    #[serde(default)]
    pub stage_index: usize,
    /// Wins in the current group attempt (always 0 outside the group stage).
    #[serde(default)]
    pub group_wins: u32,
    /// Losses in the current group attempt (always 0 outside the group stage).
    #[serde(default)]
    pub group_losses: u32,
}

impl Player {
    /// Create a new player with the given name. Counters start at zero.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name)
    }

    /// Zero record for an existing id (used when replaying history).
    pub fn with_id(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            wins: 0,
            losses: 0,
            championships: 0,
            stage_index: 0,
            group_wins: 0,
            group_losses: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        Phase::from_index(self.stage_index)
    }

    pub fn in_group(&self) -> bool {
        self.stage_index == 0
    }

    pub fn matches_played(&self) -> u32 {
        self.wins + self.losses
    }

    /// Row view with derived fields (for API responses and standings).
    pub fn row(&self) -> PlayerRow {
        PlayerRow::from_player(self)
    }
}

/// Display view of a player: the stored record plus derived fields.
/// Derived fields are recomputed on every call, never stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerRow {
    #[serde(flatten)]
    pub player: Player,
    pub phase_label: String,
    /// Full precision; round only when displaying.
    pub win_percentage: f64,
    /// "wins-losses"
    pub record: String,
}

impl PlayerRow {
    pub fn from_player(p: &Player) -> Self {
        Self {
            player: p.clone(),
            phase_label: crate::logic::phase_label(p),
            win_percentage: crate::logic::win_percentage(p),
            record: format!("{}-{}", p.wins, p.losses),
        }
    }
}
