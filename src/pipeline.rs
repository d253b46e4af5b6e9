//! Stage wiring: URL → listing page → catalog → results → workbook.
//!
//! Each stage is a function from plain values to plain values. The listing
//! page is fetched once and shared by the catalog and metadata parsers, and
//! the results payload is fetched once and used for both the rows and the
//! optional JSON dump. Nothing is written until every stage has succeeded.
//!
//! A page without usable event metadata still yields a catalog. The metadata
//! error only surfaces where the name or dates are actually read.

use crate::catalog::{self, CatalogError};
use crate::config::{FilenameStrategy, RunConfig};
use crate::export::{self, ExportError};
use crate::locator::{EventRef, LocateError};
use crate::metadata::{self, MetadataError};
use crate::results::{self, ResultsError};
use crate::source::{RegattaSource, SourceError};
use crate::types::{ClassEntry, EventDetails, ResultRow};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Locate(#[from] LocateError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    #[error(transparent)]
    Results(#[from] ResultsError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Resolve a user URL to an event, either directly or via base URL + locale.
pub fn locate(url: &str, config: &RunConfig, direct: bool) -> Result<EventRef, PipelineError> {
    let event = if direct {
        EventRef::direct(url)?
    } else {
        EventRef::conventional(url, &config.base_url, &config.locale)?
    };
    info!(event_id = %event.event_id, page = %event.page_url, "located event");
    Ok(event)
}

/// Everything the listing page tells about an event.
#[derive(Debug, Clone)]
pub struct EventOverview {
    pub event: EventRef,
    /// Kept unresolved; see [`EventOverview::details`]
    pub details: Result<EventDetails, MetadataError>,
    pub classes: Vec<ClassEntry>,
}

impl EventOverview {
    /// Event name and dates, or the reason the page did not yield them.
    pub fn details(&self) -> Result<&EventDetails, PipelineError> {
        self.details.as_ref().map_err(|e| e.clone().into())
    }
}

/// Fetch the listing page once and parse both metadata and catalog from it.
///
/// Only a catalog failure fails this stage.
pub fn overview(
    source: &dyn RegattaSource,
    event: EventRef,
    config: &RunConfig,
) -> Result<EventOverview, PipelineError> {
    let page = source.event_page(&event.page_url)?;
    let classes = catalog::parse_classes(&page, &config.catalog)?;
    let details = metadata::parse_event_details(&page);
    match &details {
        Ok(d) => info!(event = %d.name, classes = classes.len(), "parsed listing page"),
        Err(e) => warn!(error = %e, classes = classes.len(), "listing page has no usable event metadata"),
    }
    Ok(EventOverview {
        event,
        details,
        classes,
    })
}

/// Results of one class, both raw and normalised.
#[derive(Debug, Clone)]
pub struct ClassResults {
    pub class: ClassEntry,
    pub raw: serde_json::Value,
    pub rows: Vec<ResultRow>,
}

/// Look up `class_name` in the catalog and fetch its results.
pub fn class_results(
    source: &dyn RegattaSource,
    overview: &EventOverview,
    class_name: &str,
) -> Result<ClassResults, PipelineError> {
    let class = catalog::find_class(&overview.classes, class_name)?.clone();
    let raw = source.class_results(&overview.event.event_id, &class.id)?;
    let rows = results::parse_results(&raw)?;
    info!(class = %class.name, sailors = rows.len(), "fetched results");
    Ok(ClassResults { class, raw, rows })
}

/// What an export run produced.
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub path: PathBuf,
    pub sheet_title: String,
    pub sailors: usize,
    pub races: usize,
    pub discards: usize,
}

/// Render the class results and save them.
///
/// `output` overrides the configured filename strategy.
pub fn export(
    overview: &EventOverview,
    results: &ClassResults,
    config: &RunConfig,
    output: Option<&Path>,
) -> Result<ExportReport, PipelineError> {
    let title = export::sheet_title(&results.class.name, &config.export);
    let book = export::build_workbook(title, &results.rows, &config.export)?;
    let path = match (output, config.export.filename) {
        (Some(p), _) => p.to_path_buf(),
        (None, FilenameStrategy::Fixed) => PathBuf::from(&config.export.fixed_filename),
        (None, FilenameStrategy::EventName) => {
            export::output_filename(&overview.details()?.name, &config.export)
        }
    };
    export::write_workbook(&book, &path)?;
    info!(path = %path.display(), "wrote workbook");

    Ok(ExportReport {
        path,
        sheet_title: title.to_string(),
        sailors: results.rows.len(),
        races: results.rows.first().map_or(0, ResultRow::race_count),
        discards: results
            .rows
            .iter()
            .flat_map(|r| &r.scores)
            .filter(|s| s.discard)
            .count(),
    })
}
