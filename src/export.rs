//! Workbook rendering of class results.
//!
//! One worksheet per workbook. Layout (1-based rows and columns):
//!
//! ```text
//!        A      B            C               D    E    F
//! 1             Sailnumber   Name            r1   r2   r3
//! 2      1      NED 4242     Sanne de Vries  1    2    1
//! 3      2      NED 3131     Jesse Bakker    2   [13]  3
//! ```
//!
//! Rank is the row position; no sorting happens here. The number of race
//! headers comes from the first row only. Discarded scores get a solid fill.
//!
//! [`build_workbook`] is pure; [`write_workbook`] is the only function that
//! touches the filesystem, and the pipeline calls it last.

use crate::config::{ExportConfig, FilenameStrategy};
use crate::types::ResultRow;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;
use umya_spreadsheet::{Spreadsheet, Worksheet};

const SAIL_NUMBER_HEADER: &str = "Sailnumber";
const NAME_HEADER: &str = "Name";
const FIRST_RACE_COL: u32 = 4;
const MAX_SHEET_TITLE: usize = 31;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("no results to export")]
    NoResults,
    #[error("could not create worksheet '{title}': {reason}")]
    Sheet { title: String, reason: String },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: umya_spreadsheet::XlsxError,
    },
}

/// Build a single-sheet workbook for one class.
pub fn build_workbook(
    sheet_title: &str,
    rows: &[ResultRow],
    config: &ExportConfig,
) -> Result<Spreadsheet, ExportError> {
    let first = rows.first().ok_or(ExportError::NoResults)?;
    let race_count = first.race_count();

    let title = sanitize_sheet_title(sheet_title);
    let mut book = umya_spreadsheet::new_file_empty_worksheet();
    let sheet = book.new_sheet(title.clone()).map_err(|reason| ExportError::Sheet {
        title,
        reason: reason.to_string(),
    })?;

    write_header(sheet, race_count);
    for (i, row) in rows.iter().enumerate() {
        if row.race_count() != race_count {
            warn!(
                sail_number = %row.sail_number,
                races = row.race_count(),
                expected = race_count,
                "race count differs from first row; columns may not line up"
            );
        }
        write_row(sheet, i as u32 + 2, i as u32 + 1, row, &config.discard_color);
    }
    Ok(book)
}

fn write_header(sheet: &mut Worksheet, race_count: usize) {
    sheet.get_cell_mut((2, 1)).set_value(SAIL_NUMBER_HEADER);
    sheet.get_cell_mut((3, 1)).set_value(NAME_HEADER);
    for race in 0..race_count as u32 {
        sheet
            .get_cell_mut((FIRST_RACE_COL + race, 1))
            .set_value(format!("r{}", race + 1));
    }
}

fn write_row(sheet: &mut Worksheet, row_num: u32, rank: u32, row: &ResultRow, discard_color: &str) {
    sheet.get_cell_mut((1, row_num)).set_value_number(rank);
    sheet.get_cell_mut((2, row_num)).set_value(row.sail_number.as_str());
    sheet.get_cell_mut((3, row_num)).set_value(row.name.as_str());
    for (race, score) in row.scores.iter().enumerate() {
        let col = FIRST_RACE_COL + race as u32;
        sheet.get_cell_mut((col, row_num)).set_value_number(score.points);
        if score.discard {
            sheet
                .get_style_mut((col, row_num))
                .set_background_color(argb(discard_color));
        }
    }
}

/// Save a workbook as xlsx, creating parent directories as needed.
pub fn write_workbook(book: &Spreadsheet, path: &Path) -> Result<(), ExportError> {
    let write_err = |source: umya_spreadsheet::XlsxError| ExportError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| write_err(umya_spreadsheet::XlsxError::Io(e)))?;
    }
    umya_spreadsheet::writer::xlsx::write(book, path).map_err(write_err)
}

/// Resolve the output file name from the configured strategy.
pub fn output_filename(event_name: &str, config: &ExportConfig) -> PathBuf {
    match config.filename {
        FilenameStrategy::EventName => PathBuf::from(format!("{}.xlsx", sanitize_filename(event_name))),
        FilenameStrategy::Fixed => PathBuf::from(&config.fixed_filename),
    }
}

/// Worksheet title to use for a class.
pub fn sheet_title<'a>(class_name: &'a str, config: &'a ExportConfig) -> &'a str {
    config.sheet_title.as_deref().unwrap_or(class_name)
}

/// Replace characters xlsx forbids in sheet titles and cap the length.
fn sanitize_sheet_title(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| if matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\') { '_' } else { c })
        .take(MAX_SHEET_TITLE)
        .collect();
    if cleaned.trim().is_empty() {
        "Results".to_string()
    } else {
        cleaned
    }
}

/// Replace path separators and characters Windows rejects in file names.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "results".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Expand `RRGGBB` to opaque `FFRRGGBB`.
fn argb(color: &str) -> String {
    if color.len() == 6 {
        format!("FF{}", color.to_ascii_uppercase())
    } else {
        color.to_ascii_uppercase()
    }
}
