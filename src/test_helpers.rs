//! Shared test utilities.
//!
//! Fixture loading from `fixtures/`, a recording [`FakeSource`] that serves
//! fixtures instead of the network, and workbook lookups that panic with a
//! clear message on miss.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let source = FakeSource::with_fixtures();
//! let page = source.event_page("https://example.test/en-EN/event/e1").unwrap();
//! assert_eq!(source.requests().len(), 1);
//! ```

use std::path::Path;
use std::sync::Mutex;

use crate::source::{RegattaSource, SourceError};
use crate::types::{ClassEntry, ResultRow};
use umya_spreadsheet::{Spreadsheet, Worksheet};

// =========================================================================
// Fixtures
// =========================================================================

fn read_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures").join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("fixture {} unreadable: {e}", path.display()))
}

/// English listing page: Optimist has results, Laser does not.
pub fn event_page_fixture() -> String {
    read_fixture("event_page.html")
}

/// Dutch listing page: Optimist and Valk have results, Laser sits between them without.
pub fn event_page_nl_fixture() -> String {
    read_fixture("event_page_nl.html")
}

/// Two sailors, three races, sailor 2 discards race 2.
pub fn results_fixture() -> serde_json::Value {
    serde_json::from_str(&read_fixture("results.json")).unwrap()
}

// =========================================================================
// Fake source
// =========================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Page(String),
    Results { event_id: String, class_id: String },
}

/// Serves canned responses and records every request.
/// Uses Mutex so the trait methods can take `&self`.
pub struct FakeSource {
    page: String,
    results: serde_json::Value,
    requests: Mutex<Vec<Request>>,
}

impl FakeSource {
    pub fn with_fixtures() -> Self {
        Self {
            page: event_page_fixture(),
            results: results_fixture(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn page(mut self, page: String) -> Self {
        self.page = page;
        self
    }

    pub fn results(mut self, results: serde_json::Value) -> Self {
        self.results = results;
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }
}

impl RegattaSource for FakeSource {
    fn event_page(&self, page_url: &str) -> Result<String, SourceError> {
        self.requests
            .lock()
            .unwrap()
            .push(Request::Page(page_url.to_string()));
        Ok(self.page.clone())
    }

    fn class_results(
        &self,
        event_id: &str,
        class_id: &str,
    ) -> Result<serde_json::Value, SourceError> {
        self.requests.lock().unwrap().push(Request::Results {
            event_id: event_id.to_string(),
            class_id: class_id.to_string(),
        });
        Ok(self.results.clone())
    }
}

// =========================================================================
// Bulk extractors
// =========================================================================

pub fn class_names_of(classes: &[ClassEntry]) -> Vec<&str> {
    classes.iter().map(|c| c.name.as_str()).collect()
}

pub fn sail_numbers(rows: &[ResultRow]) -> Vec<&str> {
    rows.iter().map(|r| r.sail_number.as_str()).collect()
}

pub fn discard_flags(row: &ResultRow) -> Vec<bool> {
    row.scores.iter().map(|s| s.discard).collect()
}

// =========================================================================
// Workbook lookups
// =========================================================================

/// Find a worksheet by title. Panics if not found.
pub fn sheet_named<'a>(book: &'a Spreadsheet, title: &str) -> &'a Worksheet {
    book.get_sheet_by_name(title).unwrap_or_else(|| {
        let titles: Vec<&str> = book.get_sheet_collection().iter().map(|s| s.get_name()).collect();
        panic!("sheet '{title}' not found. Available: {titles:?}")
    })
}

/// Display values of columns `1..=cols` in `row`.
pub fn row_values(sheet: &Worksheet, row: u32, cols: u32) -> Vec<String> {
    (1..=cols).map(|col| sheet.get_value((col, row))).collect()
}

pub fn number_at(sheet: &Worksheet, col: u32, row: u32) -> Option<f64> {
    sheet.get_cell((col, row)).and_then(|c| c.get_value_number())
}

/// ARGB of the solid fill at a cell, if any.
pub fn fill_at(sheet: &Worksheet, col: u32, row: u32) -> Option<String> {
    sheet
        .get_cell((col, row))
        .and_then(|c| c.get_style().get_background_color())
        .map(|color| color.get_argb().to_string())
}
