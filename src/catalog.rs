//! Class catalog extraction from an event listing page.
//!
//! The listing page has a region with id `classes` holding a table of the
//! event's classes. A class with published results carries a link whose icon
//! (`<i>`) has a marker title such as `Class has results`; the link target
//! ends in `classId=<id>`:
//!
//! ```html
//! <div id="classes">
//!   <table>
//!     <tr><th>Class</th><th></th></tr>
//!     <tr>
//!       <td>Optimist</td>
//!       <td><a href="/en-EN/event/e1#!/results?classId=abc"><i title="Class has results"></i></a></td>
//!     </tr>
//!   </table>
//! </div>
//! ```
//!
//! Names and ids are collected separately and paired according to
//! [`Pairing`]. The default, [`Pairing::Positional`], zips the two lists in
//! page order: a class row without a marked link anywhere but at the end of
//! the table shifts every following id onto the wrong name. `ByRow` pairs
//! within each table row instead.

use crate::config::{CatalogConfig, Pairing};
use crate::types::ClassEntry;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::warn;

const CLASSES_REGION: &str = "#classes";
const CLASS_ID_TOKEN: &str = "classId=";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("page has no '{0}' region")]
    MissingRegion(&'static str),
    #[error("results link has no classId: {0}")]
    MissingClassId(String),
    #[error("{names} class names but {links} results links")]
    PairingMismatch { names: usize, links: usize },
    #[error("class '{name}' not found. Available: {available:?}")]
    ClassNotFound { name: String, available: Vec<String> },
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must parse")
}

/// Extract the classes that have published results, in page order.
pub fn parse_classes(html: &str, config: &CatalogConfig) -> Result<Vec<ClassEntry>, CatalogError> {
    let document = Html::parse_document(html);
    let region = document
        .select(&selector(CLASSES_REGION))
        .next()
        .ok_or(CatalogError::MissingRegion("classes"))?;

    match config.pairing {
        Pairing::Positional | Pairing::Strict => {
            let names = class_names(region);
            let ids = marked_class_ids(region, &config.results_markers)?;
            if names.len() != ids.len() {
                if config.pairing == Pairing::Strict {
                    return Err(CatalogError::PairingMismatch {
                        names: names.len(),
                        links: ids.len(),
                    });
                }
                warn!(
                    names = names.len(),
                    links = ids.len(),
                    "class names and results links differ in count; pairing by position"
                );
            }
            Ok(names
                .into_iter()
                .zip(ids)
                .map(|(name, id)| ClassEntry { name, id })
                .collect())
        }
        Pairing::ByRow => pair_by_row(region, &config.results_markers),
    }
}

/// Look up a class by exact display name.
pub fn find_class<'a>(classes: &'a [ClassEntry], name: &str) -> Result<&'a ClassEntry, CatalogError> {
    classes
        .iter()
        .find(|c| c.name == name)
        .ok_or_else(|| CatalogError::ClassNotFound {
            name: name.to_string(),
            available: classes.iter().map(|c| c.name.clone()).collect(),
        })
}

/// One name per table row that has a data cell.
fn class_names(region: ElementRef<'_>) -> Vec<String> {
    let row = selector("tr");
    let cell = selector("td");
    region
        .select(&row)
        .filter_map(|tr| tr.select(&cell).next())
        .map(text_of)
        .collect()
}

/// One id per link whose icon title is a results marker.
fn marked_class_ids(region: ElementRef<'_>, markers: &[String]) -> Result<Vec<String>, CatalogError> {
    let link = selector("a");
    region
        .select(&link)
        .filter(|a| is_marked(*a, markers))
        .map(class_id_of)
        .collect()
}

fn pair_by_row(region: ElementRef<'_>, markers: &[String]) -> Result<Vec<ClassEntry>, CatalogError> {
    let row = selector("tr");
    let cell = selector("td");
    let link = selector("a");
    let mut classes = Vec::new();
    for tr in region.select(&row) {
        let Some(name_cell) = tr.select(&cell).next() else {
            continue;
        };
        if let Some(a) = tr.select(&link).find(|a| is_marked(*a, markers)) {
            classes.push(ClassEntry {
                name: text_of(name_cell),
                id: class_id_of(a)?,
            });
        }
    }
    Ok(classes)
}

fn is_marked(link: ElementRef<'_>, markers: &[String]) -> bool {
    link.select(&selector("i"))
        .next()
        .and_then(|icon| icon.value().attr("title"))
        .is_some_and(|title| markers.iter().any(|m| m == title))
}

fn class_id_of(link: ElementRef<'_>) -> Result<String, CatalogError> {
    let href = link.value().attr("href").unwrap_or_default();
    href.find(CLASS_ID_TOKEN)
        .map(|pos| href[pos + CLASS_ID_TOKEN.len()..].to_string())
        .ok_or_else(|| CatalogError::MissingClassId(href.to_string()))
}

pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
