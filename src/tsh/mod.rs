//! tsh report reading: line parsing, ledger building and pairing reconciliation

pub mod ledger;
pub mod reader;
pub mod reconcile;

pub use ledger::{Dimensions, Ledger};
pub use reader::{normalize_name, parse_line, ReportLine};
pub use reconcile::{reconcile, Reconciliation, RoundTally};

use crate::error::Result;
use std::path::Path;

/// Results of one division (one report file)
#[derive(Debug, Clone)]
pub struct DivisionReport {
    pub division: String,
    pub reconciliation: Reconciliation,
}

/// Build a ledger from report content, one player per line position
pub fn read_ledger(content: &str) -> Result<Ledger> {
    let mut ledger = Ledger::new();
    let mut players = 0;

    for (idx, line) in content.lines().enumerate() {
        if reader::read_line(idx as u32 + 1, line, &mut ledger)? {
            players += 1;
        }
    }

    log::debug!("Read {} player lines, {} round records", players, ledger.len());
    Ok(ledger)
}

/// Parse and reconcile a whole report. Any error discards the division entirely.
pub fn read_report(content: &str, division: &str) -> Result<DivisionReport> {
    let ledger = read_ledger(content)?;
    let reconciliation = reconcile(&ledger, division)?;

    Ok(DivisionReport {
        division: division.to_string(),
        reconciliation,
    })
}

/// Read a report file, labelling it with [`division_from_path`]
pub fn read_report_file(path: &Path) -> Result<DivisionReport> {
    let content = std::fs::read_to_string(path)?;
    read_report(&content, &division_from_path(path))
}

/// Division label: the upper-cased file stem ("dir/b.t" -> "B")
pub fn division_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_uppercase()
}
