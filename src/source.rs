//! Remote data access.
//!
//! The [`RegattaSource`] trait is the only place the pipeline touches the
//! network. Stages above it work on plain strings and JSON values, so tests
//! swap in a fake source and never open a socket.
//!
//! [`HttpSource`] is the production implementation: a blocking `reqwest`
//! client, plain GETs, no authentication and no retries. Any connection
//! failure or non-2xx status is an error for the whole run.

use crate::config::HttpConfig;
use crate::locator;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("response from {url} is not valid JSON: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Where event pages and results payloads come from.
pub trait RegattaSource {
    /// Fetch the HTML of an event listing page.
    fn event_page(&self, page_url: &str) -> Result<String, SourceError>;

    /// Fetch the raw results payload of one class.
    fn class_results(
        &self,
        event_id: &str,
        class_id: &str,
    ) -> Result<serde_json::Value, SourceError>;
}

/// Blocking HTTP access to the regatta site.
pub struct HttpSource {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: &str, http: &HttpConfig) -> Result<Self, SourceError> {
        let mut builder = reqwest::blocking::Client::builder().user_agent(http.user_agent.clone());
        if let Some(secs) = http.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(SourceError::Client)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn get_text(&self, url: &str) -> Result<String, SourceError> {
        let http_err = |source| SourceError::Http {
            url: url.to_string(),
            source,
        };
        debug!(url, "GET");
        let response = self.client.get(url).send().map_err(http_err)?;
        debug!(url, status = %response.status(), "response");
        response
            .error_for_status()
            .map_err(http_err)?
            .text()
            .map_err(http_err)
    }
}

impl RegattaSource for HttpSource {
    fn event_page(&self, page_url: &str) -> Result<String, SourceError> {
        self.get_text(page_url)
    }

    fn class_results(
        &self,
        event_id: &str,
        class_id: &str,
    ) -> Result<serde_json::Value, SourceError> {
        let url = locator::results_api_url(&self.base_url, event_id, class_id);
        let body = self.get_text(&url)?;
        serde_json::from_str(&body).map_err(|source| SourceError::Json { url, source })
    }
}
