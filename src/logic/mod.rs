//! Castelar business logic: phase engine, settlement, standings, roster CSV, plus the Impostor game.

pub mod impostor;
mod phase;
mod roster;
mod settlement;
mod standings;

pub use phase::{
    apply_outcome, format_percentage, phase_label, win_percentage, GROUP_LOSSES_TO_ELIMINATE,
    GROUP_MATCHES, GROUP_WINS_TO_ADVANCE,
};
pub use roster::{import_players_csv, write_standings_csv, ImportReport, RosterError};
pub use settlement::{reverse_outcome, settle_match, undo_match, Settlement, UndoPolicy};
pub use standings::{period_progress, replay, sort_standings, standings};
