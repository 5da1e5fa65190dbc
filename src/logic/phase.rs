//! Phase engine: per-player bracket transitions and derived display values.

use crate::models::{Phase, Player};

/// Matches in a group attempt.
pub const GROUP_MATCHES: u32 = 3;
/// Group wins needed to advance to the Round of 16.
pub const GROUP_WINS_TO_ADVANCE: u32 = 2;
/// Group losses after which advancing is impossible.
pub const GROUP_LOSSES_TO_ELIMINATE: u32 = 2;

fn reset_group_progress(player: &mut Player) {
    player.stage_index = 0;
    player.group_wins = 0;
    player.group_losses = 0;
}

/// Resolve a group once all its matches are played: advance on 2+ wins, else start over.
fn conclude_group(player: &mut Player) {
    if player.group_wins >= GROUP_WINS_TO_ADVANCE {
        player.stage_index = 1;
        player.group_wins = 0;
        player.group_losses = 0;
    } else {
        reset_group_progress(player);
    }
}

fn group_concluded(player: &Player) -> bool {
    player.group_wins + player.group_losses >= GROUP_MATCHES
}

/// Apply one match outcome to a player and return the new record.
///
/// Group stage: best of 3. Two wins after three matches advance; a second
/// loss eliminates early. There is no early promotion on two wins.
/// Knockout phases: a win advances one phase (a Final win counts a
/// championship and restarts the bracket); any loss restarts the bracket.
pub fn apply_outcome(player: &Player, did_win: bool) -> Player {
    let mut updated = player.clone();

    if did_win {
        updated.wins += 1;

        if updated.in_group() {
            updated.group_wins += 1;
            if group_concluded(&updated) {
                conclude_group(&mut updated);
            }
        } else if updated.stage_index >= Phase::LAST_INDEX {
            updated.championships += 1;
            reset_group_progress(&mut updated);
        } else {
            updated.stage_index += 1;
        }
    } else {
        updated.losses += 1;

        if updated.in_group() {
            updated.group_losses += 1;
            // Concluded check first, then early elimination.
            if group_concluded(&updated) {
                conclude_group(&mut updated);
            } else if updated.group_losses >= GROUP_LOSSES_TO_ELIMINATE {
                reset_group_progress(&mut updated);
            }
        } else {
            reset_group_progress(&mut updated);
        }
    }

    updated
}

/// "Group", "Group (W-L)" once a group match is played, or the knockout phase name.
pub fn phase_label(player: &Player) -> String {
    if player.in_group() {
        let group = Phase::Group.name();
        if player.group_wins == 0 && player.group_losses == 0 {
            return group.to_string();
        }
        return format!("{} ({}-{})", group, player.group_wins, player.group_losses);
    }
    player.phase().name().to_string()
}

/// Percentage of matches won (0-100), full precision. 0 when nothing was played.
pub fn win_percentage(player: &Player) -> f64 {
    let total = player.matches_played();
    if total == 0 {
        return 0.0;
    }
    100.0 * f64::from(player.wins) / f64::from(total)
}

/// Presentation rounding: one decimal place, e.g. "66.7%".
pub fn format_percentage(pct: f64) -> String {
    format!("{:.1}%", pct)
}
