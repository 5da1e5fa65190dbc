//! Castelar tournament tracker web app: library with models and business logic.

pub mod logic;
pub mod models;

pub use logic::{
    apply_outcome, format_percentage, import_players_csv, period_progress, phase_label, replay,
    reverse_outcome, settle_match, sort_standings, standings, undo_match, win_percentage,
    write_standings_csv, ImportReport, RosterError, Settlement, UndoPolicy,
};
pub use models::{
    write_snapshot, League, LeagueError, MatchCounter, MatchId, MatchRecord, Period, Phase, Player,
    PlayerId, PlayerRow, StoreError,
};
