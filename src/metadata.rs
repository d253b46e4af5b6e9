//! Event name and dates from an event listing page.
//!
//! The name is the `<h1>` inside `div.eventName`; the date range is the text
//! of `span.eventDates`, e.g. `05/07/2024 - 07/07/2024`. Dates stay as the
//! page shows them.

use crate::catalog::text_of;
use crate::types::EventDetails;
use scraper::{Html, Selector};
use thiserror::Error;

const DATE_SEPARATOR: &str = " - ";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    #[error("page has no '{0}' element")]
    MissingRegion(&'static str),
    #[error("date range '{0}' is not '<start> - <end>'")]
    BadDateRange(String),
}

pub fn parse_event_details(html: &str) -> Result<EventDetails, MetadataError> {
    let document = Html::parse_document(html);
    let select_first = |css: &'static str| {
        let sel = Selector::parse(css).expect("static selector must parse");
        document
            .select(&sel)
            .next()
            .ok_or(MetadataError::MissingRegion(css))
    };

    let block = select_first("div.eventName")?;
    let heading = block
        .select(&Selector::parse("h1").expect("static selector must parse"))
        .next()
        .ok_or(MetadataError::MissingRegion("div.eventName h1"))?;
    let dates: String = select_first("span.eventDates")?.text().collect();

    let (start_date, end_date) = split_date_range(&dates)?;
    Ok(EventDetails {
        name: text_of(heading),
        start_date,
        end_date,
    })
}

/// Split `<start> - <end>` into exactly two parts, trimming each part
/// afterwards. An empty end (`"05/07/2024 - "`) is allowed.
fn split_date_range(text: &str) -> Result<(String, String), MetadataError> {
    let parts: Vec<&str> = text.split(DATE_SEPARATOR).collect();
    match parts.as_slice() {
        [start, end] => Ok((start.trim().to_string(), end.trim().to_string())),
        _ => Err(MetadataError::BadDateRange(text.trim().to_string())),
    }
}
