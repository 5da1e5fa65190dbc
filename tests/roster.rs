//! Integration tests for CSV roster import and standings export.

use castelar_web::{import_players_csv, standings, write_standings_csv, League, Period, RosterError};

#[test]
fn import_adds_names_and_skips_duplicates() {
    let mut league = League::new();
    league.add_player("Ana").unwrap();

    let csv = "name,instagram\nBeto,@beto\n  Caro  ,\nana,@ana\n\nbeto,\n";
    let report = import_players_csv(&mut league, csv.as_bytes()).unwrap();

    let added: Vec<&str> = report.added.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(added, vec!["Beto", "Caro"]);
    assert_eq!(report.skipped, vec!["ana".to_string(), "beto".to_string()]);
    assert_eq!(league.players.len(), 3);
    assert!(report.added.iter().all(|p| p.wins == 0 && p.stage_index == 0));
}

#[test]
fn import_accepts_header_in_any_case() {
    let mut league = League::new();
    let report = import_players_csv(&mut league, "Name\nDani\n".as_bytes()).unwrap();
    assert_eq!(report.added.len(), 1);
    assert_eq!(league.players[0].name, "Dani");
}

#[test]
fn import_requires_name_column() {
    let mut league = League::new();
    let err = import_players_csv(&mut league, "nick\nDani\n".as_bytes()).unwrap_err();
    assert!(matches!(err, RosterError::MissingNameColumn));
    assert!(league.players.is_empty());
}

#[test]
fn export_writes_rounded_percentages() {
    let mut league = League::new();
    let id = league.add_player("Ana").unwrap().id;
    {
        let p = league.get_player_mut(id).unwrap();
        p.wins = 2;
        p.losses = 1;
        p.championships = 1;
        p.stage_index = 3;
    }
    league.add_player("Beto").unwrap();

    let rows = standings(&league, Period::ALL_TIME, 2025);
    let mut out = Vec::new();
    write_standings_csv(&rows, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "name,phase,wins,losses,championships,win_percentage");
    assert_eq!(lines[1], "Ana,Semifinal,2,1,1,66.7");
    assert_eq!(lines[2], "Beto,Group,0,0,0,0.0");
}
