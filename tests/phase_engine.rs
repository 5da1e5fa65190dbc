//! Integration tests for the phase engine: transitions, labels, win percentage.

use castelar_web::{apply_outcome, format_percentage, phase_label, win_percentage, Phase, Player};

fn play(player: &Player, outcomes: &[bool]) -> Player {
    outcomes.iter().fold(player.clone(), |p, &w| apply_outcome(&p, w))
}

fn at_stage(stage_index: usize) -> Player {
    let mut p = Player::new("P");
    p.stage_index = stage_index;
    p
}

#[test]
fn three_group_wins_advance_to_round_of_16() {
    let p = play(&Player::new("A"), &[true, true, true]);
    assert_eq!(p.stage_index, 1);
    assert_eq!((p.group_wins, p.group_losses), (0, 0));
    assert_eq!((p.wins, p.losses), (3, 0));
    assert_eq!(p.phase(), Phase::RoundOf16);
}

#[test]
fn two_group_wins_do_not_promote_early() {
    let p = play(&Player::new("A"), &[true, true]);
    assert_eq!(p.stage_index, 0);
    assert_eq!((p.group_wins, p.group_losses), (2, 0));
}

#[test]
fn two_group_losses_eliminate_early() {
    let p = play(&Player::new("A"), &[false, false]);
    assert_eq!(p.stage_index, 0);
    assert_eq!((p.group_wins, p.group_losses), (0, 0));
    assert_eq!((p.wins, p.losses), (0, 2));
}

#[test]
fn win_loss_win_advances() {
    let p = play(&Player::new("A"), &[true, false, true]);
    assert_eq!(p.stage_index, 1);
    assert_eq!((p.group_wins, p.group_losses), (0, 0));
    assert_eq!((p.wins, p.losses), (2, 1));
}

#[test]
fn win_win_loss_advances_on_concluded_group() {
    let p = play(&Player::new("A"), &[true, true, false]);
    assert_eq!(p.stage_index, 1);
    assert_eq!((p.group_wins, p.group_losses), (0, 0));
    assert_eq!((p.wins, p.losses), (2, 1));
}

#[test]
fn win_then_two_losses_resets_group() {
    // 1-2 concludes the group at three matches without advancing.
    let p = play(&Player::new("A"), &[true, false, false]);
    assert_eq!(p.stage_index, 0);
    assert_eq!((p.group_wins, p.group_losses), (0, 0));
    assert_eq!((p.wins, p.losses), (1, 2));
}

#[test]
fn one_one_stays_in_group() {
    let p = play(&Player::new("A"), &[false, true]);
    assert_eq!(p.stage_index, 0);
    assert_eq!((p.group_wins, p.group_losses), (1, 1));
}

#[test]
fn final_win_counts_championship_and_restarts() {
    let p = apply_outcome(&at_stage(4), true);
    assert_eq!(p.championships, 1);
    assert_eq!(p.stage_index, 0);
    assert_eq!((p.group_wins, p.group_losses), (0, 0));
    assert_eq!(p.wins, 1);
}

#[test]
fn knockout_loss_returns_to_group() {
    let mut start = at_stage(2);
    start.championships = 3;
    let p = apply_outcome(&start, false);
    assert_eq!(p.stage_index, 0);
    assert_eq!((p.group_wins, p.group_losses), (0, 0));
    assert_eq!(p.losses, 1);
    assert_eq!(p.championships, 3);
}

#[test]
fn knockout_win_advances_one_phase() {
    let p = apply_outcome(&at_stage(1), true);
    assert_eq!(p.phase(), Phase::Quarterfinal);
    let p = apply_outcome(&p, true);
    assert_eq!(p.phase(), Phase::Semifinal);
    let p = apply_outcome(&p, true);
    assert_eq!(p.phase(), Phase::Final);
}

#[test]
fn full_run_to_championship() {
    let p = play(&Player::new("A"), &[true, true, true, true, true, true, true]);
    assert_eq!(p.championships, 1);
    assert_eq!(p.stage_index, 0);
    assert_eq!(p.wins, 7);
}

#[test]
fn input_record_is_not_modified() {
    let start = Player::new("A");
    let _ = apply_outcome(&start, true);
    assert_eq!(start.wins, 0);
    assert_eq!(start.group_wins, 0);
}

#[test]
fn invariants_hold_over_every_short_sequence() {
    // Every win/loss sequence of length up to 10.
    for len in 0..=10u32 {
        for bits in 0..(1u32 << len) {
            let mut p = Player::new("A");
            let mut wins = 0;
            let mut losses = 0;
            for i in 0..len {
                let did_win = bits & (1 << i) != 0;
                let prev_champs = p.championships;
                p = apply_outcome(&p, did_win);
                if did_win {
                    wins += 1;
                } else {
                    losses += 1;
                }
                assert!(p.stage_index <= Phase::LAST_INDEX);
                assert!(p.group_wins <= 3 && p.group_losses <= 3);
                assert!(p.group_wins + p.group_losses <= 3);
                if p.stage_index > 0 {
                    assert_eq!((p.group_wins, p.group_losses), (0, 0));
                }
                assert!(p.championships >= prev_champs);
            }
            assert_eq!((p.wins, p.losses), (wins, losses));
        }
    }
}

#[test]
fn label_for_zero_record_is_bare_group() {
    assert_eq!(phase_label(&Player::new("A")), "Group");
}

#[test]
fn label_annotates_group_record() {
    let p = apply_outcome(&Player::new("A"), true);
    assert_eq!(phase_label(&p), "Group (1-0)");
    let p = apply_outcome(&p, false);
    assert_eq!(phase_label(&p), "Group (1-1)");
}

#[test]
fn label_names_knockout_phases() {
    assert_eq!(phase_label(&at_stage(1)), "Round of 16");
    assert_eq!(phase_label(&at_stage(2)), "Quarterfinal");
    assert_eq!(phase_label(&at_stage(3)), "Semifinal");
    assert_eq!(phase_label(&at_stage(4)), "Final");
    // Out-of-range stage clamps to the last phase.
    assert_eq!(phase_label(&at_stage(9)), "Final");
}

#[test]
fn win_percentage_edges() {
    assert_eq!(win_percentage(&Player::new("A")), 0.0);
    let p = play(&Player::new("A"), &[true, true]);
    assert_eq!(win_percentage(&p), 100.0);
    let p = play(&Player::new("A"), &[false, false]);
    assert_eq!(win_percentage(&p), 0.0);
}

#[test]
fn win_percentage_keeps_precision_until_formatted() {
    let p = play(&Player::new("A"), &[true, true, false]);
    let pct = win_percentage(&p);
    assert!((pct - 200.0 / 3.0).abs() < 1e-9);
    assert_eq!(format_percentage(pct), "66.7%");
}

#[test]
fn row_carries_derived_fields() {
    let p = play(&Player::new("A"), &[true, false]);
    let row = p.row();
    assert_eq!(row.phase_label, "Group (1-1)");
    assert_eq!(row.record, "1-1");
    assert_eq!(row.win_percentage, 50.0);
}
