//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.
//!
//! ```text
//! Event
//!     Id: e5252026-b2c5-4d0a-a077-6bd50d69e55b
//!     Page: https://www.manage2sail.com/en-EN/event/e5252026-...
//!     Name: Workum Youth Regatta 2024
//!     Dates: 05/07/2024 → 07/07/2024
//!
//! Classes
//! 001 Optimist
//!     Id: 6f1f2c1e-opti
//! ```

use crate::pipeline::{EventOverview, ExportReport};
use crate::types::{ClassEntry, EventDetails};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

pub fn format_classes(classes: &[ClassEntry]) -> Vec<String> {
    let mut lines = vec!["Classes".to_string()];
    if classes.is_empty() {
        lines.push(format!("{}(none with results)", indent(1)));
    }
    for (i, class) in classes.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), class.name));
        lines.push(format!("{}Id: {}", indent(1), class.id));
    }
    lines
}

/// `details` is passed separately since the overview may lack it.
pub fn format_overview(overview: &EventOverview, details: &EventDetails) -> Vec<String> {
    let mut lines = vec![
        "Event".to_string(),
        format!("{}Id: {}", indent(1), overview.event.event_id),
        format!("{}Page: {}", indent(1), overview.event.page_url),
        format!("{}Name: {}", indent(1), details.name),
        format!(
            "{}Dates: {} → {}",
            indent(1),
            details.start_date,
            details.end_date
        ),
        String::new(),
    ];
    lines.extend(format_classes(&overview.classes));
    lines
}

pub fn format_export_report(report: &ExportReport) -> Vec<String> {
    vec![
        format!("Sheet: {}", report.sheet_title),
        format!(
            "{}{} sailors, {} races, {} discards",
            indent(1),
            report.sailors,
            report.races,
            report.discards
        ),
        format!("Wrote {}", report.path.display()),
    ]
}

pub fn print_overview(overview: &EventOverview, details: &EventDetails) {
    for line in format_overview(overview, details) {
        println!("{}", line);
    }
}

pub fn print_classes(classes: &[ClassEntry]) {
    for line in format_classes(classes) {
        println!("{}", line);
    }
}

pub fn print_export_report(report: &ExportReport) {
    for line in format_export_report(report) {
        println!("{}", line);
    }
}
