//! Data structures for Castelar: players, matches, periods, and the league store.

mod game;
mod league;
mod period;
mod player;

pub use game::{MatchCounter, MatchId, MatchRecord};
pub use league::{write_snapshot, League, LeagueError, StoreError};
pub use period::Period;
pub use player::{Phase, Player, PlayerId, PlayerRow};
