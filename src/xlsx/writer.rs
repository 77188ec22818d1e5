use crate::error::Result;
use crate::tsh::DivisionReport;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use std::collections::HashSet;
use std::path::Path;

const MAX_SHEET_NAME: usize = 31;

/// Write one worksheet per division
pub fn write_divisions_to_xlsx(reports: &[DivisionReport], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let mut used_names = HashSet::new();

    for report in reports {
        let name = unique_sheet_name(&report.division, &mut used_names);
        let worksheet = workbook.add_worksheet();
        write_results_sheet(worksheet, report)?;
        worksheet.set_name(&name)?;
    }

    if reports.is_empty() {
        workbook.add_worksheet().set_name("Results")?;
    }

    workbook.save(path)?;
    Ok(())
}

/// Write a division's games to a worksheet
fn write_results_sheet(sheet: &mut Worksheet, report: &DivisionReport) -> Result<()> {
    sheet.set_column_width(0, 10)?; // Division
    sheet.set_column_width(1, 8)?;  // Round
    sheet.set_column_width(2, 28)?; // Player 1
    sheet.set_column_width(3, 9)?;  // Score 1
    sheet.set_column_width(4, 28)?; // Player 2
    sheet.set_column_width(5, 9)?;  // Score 2

    let header_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_border_bottom(FormatBorder::Thin);

    let headers = ["Division", "Round", "Player 1", "Score 1", "Player 2", "Score 2"];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    let center_format = Format::new().set_align(FormatAlign::Center);

    for (row_idx, result) in report.reconciliation.results.iter().enumerate() {
        let row = (row_idx + 1) as u32;
        sheet.write_string_with_format(row, 0, &result.division, &center_format)?;
        sheet.write_number_with_format(row, 1, result.round as f64, &center_format)?;
        sheet.write_string(row, 2, &result.player1)?;
        sheet.write_number_with_format(row, 3, result.score1 as f64, &center_format)?;
        sheet.write_string(row, 4, &result.player2)?;
        sheet.write_number_with_format(row, 5, result.score2 as f64, &center_format)?;
    }

    sheet.set_freeze_panes(1, 0)?;
    Ok(())
}

/// Excel sheet names: at most 31 chars, none of `[]:*?/\`, unique per workbook
fn unique_sheet_name(division: &str, used: &mut HashSet<String>) -> String {
    let base: String = division
        .chars()
        .map(|c| if "[]:*?/\\".contains(c) { '_' } else { c })
        .take(MAX_SHEET_NAME)
        .collect();
    let base = if base.trim().is_empty() {
        "Division".to_string()
    } else {
        base
    };

    let mut name = base.clone();
    let mut n = 2;
    while !used.insert(name.to_uppercase()) {
        let suffix = format!(" ({})", n);
        let keep = MAX_SHEET_NAME.saturating_sub(suffix.len());
        name = format!("{}{}", base.chars().take(keep).collect::<String>(), suffix);
        n += 1;
    }
    name
}
