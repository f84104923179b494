//! Spreadsheet export of one daily report.
//!
//! The sheet layout is fixed. `n` is the number of entries:
//!
//! ```text
//! row 0        title
//! row 2..=3    report header (date, sales, area / target, team, contact)
//! row 5        column headers
//! row 6..6+n   one row per entry
//! row 7+n      performance summary title
//! row 9+n      total sales, total prospects, conversion rate
//! row 10+n     target achievement
//! row 12+n..   one row per status, first-seen order
//! ```

use rust_xlsxwriter::{Format, Workbook};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ExportError;
use crate::format::{format_percent, CurrencyFormat};
use crate::model::report::ReportState;
use crate::model::summary::AggregateSummary;

pub const SHEET_NAME: &str = "Daily Sales Report";
pub const HEADER_ROW: u32 = 5;
pub const FIRST_ENTRY_ROW: u32 = 6;

const COLUMN_HEADERS: [&str; 10] = [
    "No",
    "Time",
    "Customer",
    "Product/Service",
    "Qty",
    "Unit Price",
    "Total",
    "Status",
    "Note",
    "Proof",
];
const COLUMN_WIDTHS: [f64; 10] = [5.0, 8.0, 20.0, 25.0, 6.0, 15.0, 15.0, 12.0, 25.0, 25.0];

/// `[export]` config section. The defaults are unbranded; a company title
/// and file prefix go in the config file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ExportOptions {
    pub title: String,
    pub file_prefix: String,
    pub currency: CurrencyFormat,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            title: "🚀 DAILY SALES REPORT".to_string(),
            file_prefix: "Daily_Sales_Report".to_string(),
            currency: CurrencyFormat::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    /// Raw number shown with thousands grouping.
    Amount(f64),
}

impl Cell {
    fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }
}

pub type SheetRow = Vec<Cell>;

#[derive(Debug, Clone)]
pub struct ExportedReport {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub fn export_file_name(state: &ReportState, options: &ExportOptions) -> String {
    let salesperson: String = state
        .salesperson_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("{}_{}_{}.xlsx", options.file_prefix, state.date.format("%Y-%m-%d"), salesperson)
}

/// Cell-by-cell layout of the sheet, without any xlsx specifics.
pub fn sheet_rows(state: &ReportState, summary: &AggregateSummary, options: &ExportOptions) -> Vec<SheetRow> {
    let money = |amount: f64| options.currency.format(amount);
    let mut rows: Vec<SheetRow> = Vec::new();

    rows.push(vec![Cell::text(options.title.as_str())]);
    rows.push(Vec::new());
    rows.push(vec![
        Cell::text("📅 Date:"),
        Cell::text(state.date.format("%Y-%m-%d").to_string()),
        Cell::Empty,
        Cell::text("👤 Sales:"),
        Cell::text(state.salesperson_name.as_str()),
        Cell::Empty,
        Cell::text("📍 Area:"),
        Cell::text(state.area.as_str()),
    ]);
    rows.push(vec![
        Cell::text("🎯 Target:"),
        Cell::text(money(state.daily_target)),
        Cell::Empty,
        Cell::text("🏢 Team:"),
        Cell::text(state.team.as_str()),
        Cell::Empty,
        Cell::text("📱 Contact:"),
        Cell::text(state.contact.as_str()),
    ]);
    rows.push(Vec::new());
    rows.push(COLUMN_HEADERS.iter().map(|h| Cell::text(*h)).collect());

    for entry in &state.entries {
        rows.push(vec![
            Cell::Number(entry.sequence_number as f64),
            Cell::text(entry.time.format("%H:%M").to_string()),
            Cell::text(entry.customer_name.as_str()),
            Cell::text(entry.product_name.as_str()),
            Cell::Number(entry.quantity as f64),
            Cell::Amount(entry.unit_price),
            Cell::Amount(entry.total()),
            Cell::text(entry.status.label()),
            Cell::text(entry.note.as_str()),
            entry.proof_reference.as_deref().map(Cell::text).unwrap_or(Cell::Empty),
        ]);
    }

    rows.push(Vec::new());
    rows.push(vec![Cell::text("📊 PERFORMANCE SUMMARY")]);
    rows.push(Vec::new());
    rows.push(vec![
        Cell::text("💰 Total Sales:"),
        Cell::text(money(summary.total_closed_sales)),
        Cell::Empty,
        Cell::text("👥 Total Prospects:"),
        Cell::Number(summary.total_entries as f64),
        Cell::Empty,
        Cell::text("📈 Conversion Rate:"),
        Cell::text(format_percent(summary.conversion_rate_percent)),
    ]);
    rows.push(vec![
        Cell::text("🎯 Target Achievement:"),
        Cell::text(format_percent(summary.target_achievement_percent)),
        Cell::Empty,
        Cell::text("📋 Status Breakdown:"),
    ]);
    rows.push(Vec::new());

    for count in &summary.status_counts {
        rows.push(vec![
            Cell::text(format!("{} {}:", count.status.icon(), count.status.label())),
            Cell::Number(count.count as f64),
        ]);
    }

    rows
}

/// Builds the workbook in memory. An empty report is refused up front.
pub fn export_report(
    state: &ReportState,
    summary: &AggregateSummary,
    options: &ExportOptions,
) -> Result<ExportedReport, ExportError> {
    if state.entries.is_empty() {
        return Err(ExportError::EmptyReport);
    }

    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let title = Format::new().set_bold().set_font_size(14);
    let amount = Format::new().set_num_format("#,##0");

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;
    for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width)?;
    }

    for (row_idx, row) in sheet_rows(state, summary, options).iter().enumerate() {
        let r = row_idx as u32;
        for (col_idx, cell) in row.iter().enumerate() {
            let c = col_idx as u16;
            match cell {
                Cell::Empty => {}
                Cell::Text(s) if r == 0 => {
                    worksheet.write_string_with_format(r, c, s, &title)?;
                }
                Cell::Text(s) if r == HEADER_ROW => {
                    worksheet.write_string_with_format(r, c, s, &bold)?;
                }
                Cell::Text(s) => {
                    worksheet.write_string(r, c, s)?;
                }
                Cell::Number(n) => {
                    worksheet.write_number(r, c, *n)?;
                }
                Cell::Amount(n) => {
                    worksheet.write_number_with_format(r, c, *n, &amount)?;
                }
            }
        }
    }

    let bytes = workbook.save_to_buffer()?;
    let file_name = export_file_name(state, options);
    info!(file = %file_name, entries = state.entries.len(), "report exported");

    Ok(ExportedReport { file_name, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entry::SaleStatus;
    use crate::model::report::{ReportDetails, ReportKey};
    use crate::model::sample::sample_entries;
    use crate::service::aggregator::summarize;
    use calamine::{Data, Reader, Xlsx};
    use chrono::NaiveDate;
    use std::io::Cursor;

    fn state() -> ReportState {
        let key = ReportKey::new(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(), "Budi  Santoso");
        let mut state = ReportState::empty(&key);
        state.apply_details(ReportDetails {
            daily_target: 15_000_000.0,
            area: "Jakarta".to_string(),
            team: "Team Alpha".to_string(),
            contact: "budi@example.com".to_string(),
        });
        for entry in sample_entries() {
            state.push_entry(entry);
        }
        state.entries[2].proof_reference = Some("IMG_0042.jpg".to_string());
        state
    }

    fn text(range: &calamine::Range<Data>, row: u32, col: u32) -> String {
        match range.get_value((row, col)) {
            Some(Data::String(s)) => s.clone(),
            other => panic!("expected text at ({}, {}), got {:?}", row, col, other),
        }
    }

    fn number(range: &calamine::Range<Data>, row: u32, col: u32) -> f64 {
        match range.get_value((row, col)) {
            Some(Data::Float(f)) => *f,
            Some(Data::Int(i)) => *i as f64,
            other => panic!("expected number at ({}, {}), got {:?}", row, col, other),
        }
    }

    #[test]
    fn test_file_name() {
        let name = export_file_name(&state(), &ExportOptions::default());
        assert_eq!(name, "Daily_Sales_Report_2025-03-14_Budi_Santoso.xlsx");
    }

    #[test]
    fn test_file_name_strips_path_separators() {
        let mut s = state();
        s.salesperson_name = "Tim A/B".to_string();
        assert_eq!(
            export_file_name(&s, &ExportOptions::default()),
            "Daily_Sales_Report_2025-03-14_Tim_A_B.xlsx"
        );
    }

    #[test]
    fn test_empty_report_is_rejected() {
        let mut s = state();
        s.entries.clear();
        let summary = summarize(&s.entries, s.daily_target);
        assert!(matches!(
            export_report(&s, &summary, &ExportOptions::default()),
            Err(ExportError::EmptyReport)
        ));
    }

    #[test]
    fn test_layout_rows() {
        let s = state();
        let summary = summarize(&s.entries, s.daily_target);
        let rows = sheet_rows(&s, &summary, &ExportOptions::default());
        let n = s.entries.len();

        assert_eq!(rows[3][1], Cell::text("Rp 15.000.000"));
        assert_eq!(rows[HEADER_ROW as usize].len(), 10);
        assert_eq!(rows[FIRST_ENTRY_ROW as usize][6], Cell::Amount(5_000_000.0));
        assert_eq!(rows[FIRST_ENTRY_ROW as usize][9], Cell::Empty);
        assert!(rows[6 + n].is_empty());
        assert_eq!(rows[9 + n][1], Cell::text("Rp 9.500.000"));
        assert_eq!(rows[9 + n][7], Cell::text("66.7%"));
        assert_eq!(rows[10 + n][1], Cell::text("63.3%"));
        assert_eq!(rows[12 + n][0], Cell::text("✅ Closing:"));
        assert_eq!(rows[13 + n][0], Cell::text("🔄 Follow Up:"));
        assert_eq!(rows[13 + n][1], Cell::Number(1.0));
        assert_eq!(rows.len(), 14 + n);
    }

    #[test]
    fn test_workbook_reads_back() {
        let s = state();
        let summary = summarize(&s.entries, s.daily_target);
        let exported = export_report(&s, &summary, &ExportOptions::default()).unwrap();

        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(exported.bytes)).unwrap();
        let range = workbook.worksheet_range(SHEET_NAME).unwrap();

        assert_eq!(text(&range, 0, 0), "🚀 DAILY SALES REPORT");
        assert_eq!(text(&range, 2, 1), "2025-03-14");
        assert_eq!(text(&range, 2, 4), "Budi  Santoso");
        assert_eq!(text(&range, 2, 7), "Jakarta");
        assert_eq!(text(&range, 3, 7), "budi@example.com");
        assert_eq!(text(&range, 5, 0), "No");
        assert_eq!(text(&range, 5, 9), "Proof");

        assert_eq!(number(&range, 6, 0), 1.0);
        assert_eq!(text(&range, 6, 1), "09:30");
        assert_eq!(text(&range, 6, 2), "PT ABC Corp");
        assert_eq!(number(&range, 7, 4), 3.0);
        assert_eq!(number(&range, 7, 5), 1_500_000.0);
        assert_eq!(number(&range, 7, 6), 4_500_000.0);
        assert_eq!(text(&range, 8, 7), SaleStatus::FollowUp.label());
        assert_eq!(text(&range, 8, 9), "IMG_0042.jpg");

        assert_eq!(text(&range, 10, 0), "📊 PERFORMANCE SUMMARY");
        assert_eq!(number(&range, 12, 4), 3.0);
        assert_eq!(text(&range, 13, 1), "63.3%");
        assert_eq!(number(&range, 15, 1), 2.0);
    }
}
