//! # Regatta Sheet
//!
//! Pulls one class's race results for a sailing event from manage2sail and
//! writes them to an xlsx workbook: one row per sailor, one column per race,
//! discarded races highlighted.
//!
//! # Architecture: Linear Pipeline
//!
//! ```text
//! 1. Locate    event URL        →  EventRef        (id + listing page URL)
//! 2. Overview  listing page     →  EventOverview   (name, dates, class catalog)
//! 3. Results   class id         →  ClassResults    (raw JSON + normalised rows)
//! 4. Export    rows             →  <event>.xlsx
//! ```
//!
//! Every stage returns plain data that the caller hands to the next stage.
//! The listing page and the results payload are each fetched once per run,
//! and the workbook is written only after all fetching and parsing
//! succeeded.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`locator`] | Event id from a URL; listing and API URL layout |
//! | [`source`] | `RegattaSource` trait and the blocking HTTP implementation |
//! | [`catalog`] | Classes with published results, from the listing page |
//! | [`metadata`] | Event name and date range, from the listing page |
//! | [`results`] | Results payload → rows of scores with discard flags |
//! | [`export`] | Rows → single-sheet workbook, output filename |
//! | [`pipeline`] | Stage wiring and the aggregated error type |
//! | [`config`] | `regatta.toml` loading, merging, and validation |
//! | [`types`] | Plain data shared between stages |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Positional Class Pairing by Default
//!
//! The site lists class names and results links separately; the default
//! catalog pairing zips them in page order, which misaligns when a class
//! without results sits before one with results. `by-row` pairing and a
//! `strict` count check are available through [`config::Pairing`].
//!
//! ## Discards by Key Presence
//!
//! A race counts as discarded when its record has a `PointsDiscarded` key,
//! whatever the value.

pub mod catalog;
pub mod config;
pub mod export;
pub mod locator;
pub mod metadata;
pub mod output;
pub mod pipeline;
pub mod results;
pub mod source;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
