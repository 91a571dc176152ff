//! History source — fetches the newest-first reading list.
//!
//! DESIGN
//! ======
//! `HistorySource` is the seam between the poller and the network so the
//! poller can be driven by scripted sources in tests. `HttpHistory` is a
//! thin reqwest wrapper; body parsing lives in `parse_history` so it can be
//! tested without a server.

use tracing::warn;

use crate::config::DashboardConfig;
use crate::reading::Reading;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced while fetching the reading history.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request could not be sent or the body could not be read.
    #[error("history request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("history response error: status {status}")]
    Status { status: u16, body: String },

    /// The body was not a JSON array of readings.
    #[error("history parse failed: {0}")]
    Parse(String),
}

// =============================================================================
// SOURCE TRAIT
// =============================================================================

/// Anything that can produce the current reading history, newest first.
#[async_trait::async_trait]
pub trait HistorySource: Send + Sync {
    async fn fetch_history(&self) -> Result<Vec<Reading>, FetchError>;
}

// =============================================================================
// HTTP SOURCE
// =============================================================================

pub struct HttpHistory {
    http: reqwest::Client,
    url: String,
}

impl HttpHistory {
    /// Build a client for `{base_url}{history_path}` with the configured timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &DashboardConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| FetchError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, url: config.history_url() })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl HistorySource for HttpHistory {
    async fn fetch_history(&self) -> Result<Vec<Reading>, FetchError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(FetchError::Status { status: status.as_u16(), body: text });
        }

        parse_history(&text)
    }
}

// =============================================================================
// PARSING
// =============================================================================

/// Parse a history body. A top-level `null` counts as an empty list.
///
/// Only the newest row must be well-formed; malformed older rows are
/// dropped with a warning.
///
/// # Errors
///
/// Returns `FetchError::Parse` when the body is not a JSON array or the
/// newest row is not a reading.
pub fn parse_history(json: &str) -> Result<Vec<Reading>, FetchError> {
    let rows: Option<Vec<serde_json::Value>> =
        serde_json::from_str(json).map_err(|e| FetchError::Parse(e.to_string()))?;
    let mut rows = rows.unwrap_or_default().into_iter().enumerate();

    let Some((_, head)) = rows.next() else {
        return Ok(Vec::new());
    };
    let newest: Reading = serde_json::from_value(head).map_err(|e| FetchError::Parse(e.to_string()))?;

    let mut readings = vec![newest];
    for (index, row) in rows {
        match serde_json::from_value::<Reading>(row) {
            Ok(reading) => readings.push(reading),
            Err(e) => warn!(index, error = %e, "skipping malformed history row"),
        }
    }
    Ok(readings)
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;
