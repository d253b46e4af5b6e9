//! Event identification from user supplied URLs.
//!
//! The regatta site addresses an event as `<base>/<locale>/event/<id>`. The
//! identifier is opaque: everything after the first `event/` is taken as-is.
//!
//! The listing page can be reached two ways:
//!
//! - **Conventional**: rebuilt from the configured base URL and locale, so a
//!   URL copied from any localised page works (`/nl-NL/event/..` becomes
//!   `/en-EN/event/..`).
//! - **Direct**: the URL the user passed is fetched unchanged.

use thiserror::Error;

const EVENT_SEGMENT: &str = "event/";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LocateError {
    #[error("URL does not contain 'event/': {0}")]
    NoEventSegment(String),
}

/// Where an event lives on the remote site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRef {
    pub event_id: String,
    /// Public HTML listing page of the event
    pub page_url: String,
}

impl EventRef {
    /// Locate an event and build its listing URL from `base_url` and `locale`.
    pub fn conventional(url: &str, base_url: &str, locale: &str) -> Result<Self, LocateError> {
        let event_id = event_id_from_url(url)?;
        let page_url = event_page_url(base_url, locale, &event_id);
        Ok(Self { event_id, page_url })
    }

    /// Locate an event whose listing page is the given URL itself.
    pub fn direct(url: &str) -> Result<Self, LocateError> {
        Ok(Self {
            event_id: event_id_from_url(url)?,
            page_url: url.to_string(),
        })
    }
}

/// Return everything after the first `event/` in `url`.
///
/// - `https://www.manage2sail.com/nl-NL/event/e5252026-b2c5` → `e5252026-b2c5`
/// - `https://www.manage2sail.com/` → error
///
/// The identifier format is not validated; query strings and trailing
/// segments are kept.
pub fn event_id_from_url(url: &str) -> Result<String, LocateError> {
    url.find(EVENT_SEGMENT)
        .map(|pos| url[pos + EVENT_SEGMENT.len()..].to_string())
        .ok_or_else(|| LocateError::NoEventSegment(url.to_string()))
}

/// Build `<base>/<locale>/event/<id>`, tolerating a trailing slash on `base_url`.
pub fn event_page_url(base_url: &str, locale: &str, event_id: &str) -> String {
    format!(
        "{}/{}/{}{}",
        base_url.trim_end_matches('/'),
        locale,
        EVENT_SEGMENT,
        event_id
    )
}

/// Build `<base>/api/event/<id>/regattaresult/<class id>`.
pub fn results_api_url(base_url: &str, event_id: &str, class_id: &str) -> String {
    format!(
        "{}/api/{}{}/regattaresult/{}",
        base_url.trim_end_matches('/'),
        EVENT_SEGMENT,
        event_id,
        class_id
    )
}
