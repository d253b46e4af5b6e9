//! Results payload normalisation.
//!
//! The results API answers with one object per class:
//!
//! ```json
//! {
//!   "EntryResults": [
//!     {
//!       "SailNumber": "NED 3131",
//!       "Name": "Jesse Bakker",
//!       "EntryRaceResults": [
//!         { "Points": 2.0 },
//!         { "Points": "13.0", "PointsDiscarded": 13.0 }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Entries are kept in API order, which is already rank order. A race is a
//! discard when its object has a `PointsDiscarded` key at all; the value is
//! never looked at. `SailNumber` and `Name` are written through as text
//! whatever their JSON type (`null` becomes empty).

use crate::types::{ResultRow, ScoreEntry};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

const DISCARD_KEY: &str = "PointsDiscarded";

#[derive(Error, Debug)]
pub enum ResultsError {
    #[error("unexpected results payload: {0}")]
    Schema(#[from] serde_json::Error),
    #[error("entry {entry} race {race} has no '{field}'")]
    MissingField {
        entry: usize,
        race: usize,
        field: &'static str,
    },
    #[error("entry {entry} race {race} has non-numeric points {value}")]
    InvalidPoints {
        entry: usize,
        race: usize,
        value: Value,
    },
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Payload {
    entry_results: Vec<Entry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Entry {
    sail_number: Value,
    name: Value,
    entry_race_results: Vec<Map<String, Value>>,
}

/// Map a raw results payload to one row per sailor.
pub fn parse_results(payload: &Value) -> Result<Vec<ResultRow>, ResultsError> {
    let payload = Payload::deserialize(payload)?;
    payload
        .entry_results
        .into_iter()
        .enumerate()
        .map(|(entry, e)| -> Result<ResultRow, ResultsError> {
            let scores = e
                .entry_race_results
                .iter()
                .enumerate()
                .map(|(race, r)| score_entry(entry + 1, race + 1, r))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ResultRow {
                sail_number: display_text(e.sail_number),
                name: display_text(e.name),
                scores,
            })
        })
        .collect()
}

/// `entry` and `race` are 1-based and only used for error context.
fn score_entry(entry: usize, race: usize, raw: &Map<String, Value>) -> Result<ScoreEntry, ResultsError> {
    let points = raw.get("Points").ok_or(ResultsError::MissingField {
        entry,
        race,
        field: "Points",
    })?;
    Ok(ScoreEntry {
        points: coerce_points(points).ok_or_else(|| ResultsError::InvalidPoints {
            entry,
            race,
            value: points.clone(),
        })?,
        discard: raw.contains_key(DISCARD_KEY),
    })
}

fn display_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Points arrive as JSON numbers or as numeric strings.
fn coerce_points(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Pretty-print a raw payload with two-space indentation.
pub fn dump_json(payload: &Value) -> Result<String, ResultsError> {
    Ok(serde_json::to_string_pretty(payload)?)
}
