//! Implementation of the `dl export` command.
//!
//! Writes the report into a single-sheet Excel workbook: a header row,
//! one row per entry and a closing total row.

use std::path::Path;

use anyhow::{Context, Result};
use dl_core::Report;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook};

use crate::Config;
use crate::cli::LogArgs;
use crate::commands::util::load_report;

const SHEET_NAME: &str = "Daily Log";

/// Column widths, in [`Report::HEADERS`] order.
const COLUMN_WIDTHS: [f64; 10] = [12.0, 6.0, 24.0, 14.0, 16.0, 10.0, 60.0, 8.0, 8.0, 8.0];

const HOURS_COLUMN: u16 = 7;
const TOTAL_COLUMN: u16 = 8;

/// Builds the workbook for a report.
pub fn build_workbook(report: &Report) -> Result<Workbook> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(0x4472C4))
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin);
    let text_format = Format::new()
        .set_text_wrap()
        .set_align(FormatAlign::Top)
        .set_border(FormatBorder::Thin);
    let number_format = Format::new()
        .set_num_format("0.00")
        .set_align(FormatAlign::Top)
        .set_border(FormatBorder::Thin);
    let total_format = Format::new()
        .set_bold()
        .set_num_format("0.00")
        .set_background_color(Color::RGB(0xFFC000))
        .set_border(FormatBorder::Thin);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, header) in (0u16..).zip(Report::HEADERS) {
        worksheet.write_with_format(0, col, header, &header_format)?;
    }

    for (row, entry) in (1u32..).zip(&report.rows) {
        for (col, cell) in (0u16..).zip(entry.cells()) {
            match col {
                HOURS_COLUMN => {
                    worksheet.write_with_format(row, col, entry.duration.as_f64(), &number_format)?;
                }
                TOTAL_COLUMN => {
                    worksheet.write_with_format(row, col, entry.running_total.as_f64(), &number_format)?;
                }
                _ => {
                    worksheet.write_with_format(row, col, &cell, &text_format)?;
                }
            }
        }
    }

    let total_row = u32::try_from(report.rows.len() + 1).context("too many rows for a worksheet")?;
    worksheet.write_with_format(total_row, HOURS_COLUMN - 1, "Total", &total_format)?;
    worksheet.write_with_format(total_row, HOURS_COLUMN, report.total.as_f64(), &total_format)?;

    for (col, width) in (0u16..).zip(COLUMN_WIDTHS) {
        worksheet.set_column_width(col, width)?;
    }

    Ok(workbook)
}

/// Saves the report as an `.xlsx` file.
pub fn write_workbook(report: &Report, path: &Path) -> Result<()> {
    let mut workbook = build_workbook(report)?;
    workbook
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), rows = report.rows.len(), "wrote spreadsheet");
    Ok(())
}

/// Runs the export command.
pub fn run(args: &LogArgs, config: &Config, output: &Path) -> Result<()> {
    let report = load_report(args, config)?;
    write_workbook(&report, output)?;
    eprintln!("Wrote {} rows to {}", report.rows.len(), output.display());
    Ok(())
}
