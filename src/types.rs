//! Plain data passed between pipeline stages.
//!
//! Every stage returns one of these values and the next stage takes it by
//! reference. Nothing here holds a connection or re-fetches anything.

/// A class (boat category) of an event that has published results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassEntry {
    /// Display name from the first cell of the class table row
    pub name: String,
    /// Identifier taken from the `classId=` query of the results link
    pub id: String,
}

/// Display metadata of an event, as shown on its listing page.
///
/// Dates are kept as the raw text of the page; they are never parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDetails {
    pub name: String,
    pub start_date: String,
    pub end_date: String,
}

/// One race score of one sailor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreEntry {
    pub points: f64,
    /// Race points do not count toward the series total
    pub discard: bool,
}

/// One sailor's standing in a class, in the order the results API returned it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub sail_number: String,
    pub name: String,
    /// One entry per race, in race order
    pub scores: Vec<ScoreEntry>,
}

impl ResultRow {
    pub fn race_count(&self) -> usize {
        self.scores.len()
    }
}
