//! Roster CSV: bulk player import and standings export.

use crate::logic::phase::format_percentage;
use crate::models::{League, Player, PlayerRow};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Errors reading or writing roster CSV.
#[derive(Debug)]
pub enum RosterError {
    Csv(csv::Error),
    /// The CSV has no `name` column.
    MissingNameColumn,
}

impl std::fmt::Display for RosterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterError::Csv(e) => write!(f, "CSV error: {}", e),
            RosterError::MissingNameColumn => write!(f, "CSV must have a \"name\" column"),
        }
    }
}

impl std::error::Error for RosterError {}

impl From<csv::Error> for RosterError {
    fn from(e: csv::Error) -> Self {
        RosterError::Csv(e)
    }
}

/// Outcome of an import: who was added, which names were skipped.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    pub added: Vec<Player>,
    /// Names already in the league or repeated in the file.
    pub skipped: Vec<String>,
}

#[derive(Deserialize)]
struct RosterLine {
    name: String,
}

/// Import players from CSV with a `name` header. Other columns are ignored,
/// blank names are dropped, duplicates (case-insensitive) are skipped.
pub fn import_players_csv<R: Read>(league: &mut League, reader: R) -> Result<ImportReport, RosterError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    if !rdr.headers()?.iter().any(|h| h.eq_ignore_ascii_case("name")) {
        return Err(RosterError::MissingNameColumn);
    }
    // Normalize the header so `name` deserializes regardless of case.
    let headers: csv::StringRecord = rdr
        .headers()?
        .iter()
        .map(|h| if h.eq_ignore_ascii_case("name") { "name" } else { h })
        .collect();
    rdr.set_headers(headers);

    let mut report = ImportReport::default();
    for line in rdr.deserialize::<RosterLine>() {
        let name = line?.name;
        if name.is_empty() {
            continue;
        }
        match league.add_player(name.as_str()) {
            Ok(p) => report.added.push(p.clone()),
            Err(_) => report.skipped.push(name),
        }
    }
    log::info!(
        "Imported {} player(s), skipped {}",
        report.added.len(),
        report.skipped.len()
    );
    Ok(report)
}

#[derive(Serialize)]
struct StandingsLine<'a> {
    name: &'a str,
    phase: &'a str,
    wins: u32,
    losses: u32,
    championships: u32,
    win_percentage: String,
}

/// Write standings rows as CSV, percentages rounded to one decimal.
pub fn write_standings_csv<W: Write>(rows: &[PlayerRow], writer: W) -> Result<(), RosterError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        let pct = format_percentage(row.win_percentage);
        wtr.serialize(StandingsLine {
            name: &row.player.name,
            phase: &row.phase_label,
            wins: row.player.wins,
            losses: row.player.losses,
            championships: row.player.championships,
            win_percentage: pct.trim_end_matches('%').to_string(),
        })?;
    }
    wtr.flush().map_err(|e| RosterError::Csv(e.into()))?;
    Ok(())
}
