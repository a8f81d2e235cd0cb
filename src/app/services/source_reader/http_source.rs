//! HTTP source for the realtime bay sensor feed

use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::app::models::RawSensorRecord;
use crate::{Error, Result};

/// Client for one JSON records endpoint
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSource {
    /// Build a source for `url` with a whole-request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the feed and return its records in response order
    ///
    /// # Errors
    ///
    /// [`Error::SourceUnavailable`] on connection failure, timeout or a non-2xx
    /// status. [`Error::InvalidResponse`] when the body is not a records
    /// envelope.
    pub async fn fetch(&self) -> Result<Vec<RawSensorRecord>> {
        info!("Fetching realtime records from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::source_unavailable(&self.url, "Request failed", Some(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::source_unavailable(
                &self.url,
                format!("HTTP status {}", status),
                None,
            ));
        }

        let body = response.text().await.map_err(|e| {
            Error::source_unavailable(&self.url, "Failed to read response body", Some(e))
        })?;
        debug!("Received {} bytes from {}", body.len(), self.url);

        parse_records_body(&self.url, &body)
    }
}

/// `{"records": [...]}`; the v2.1 explore API names the list `results`
///
/// When a body carries both, `records` is used.
#[derive(Debug, Deserialize)]
struct RecordsEnvelope {
    #[serde(default)]
    records: Option<Vec<RawSensorRecord>>,

    #[serde(default)]
    results: Option<Vec<RawSensorRecord>>,
}

/// Extract the record objects from a response body
///
/// A body without a records list yields no records and a warning.
pub fn parse_records_body(url: &str, body: &str) -> Result<Vec<RawSensorRecord>> {
    let envelope: RecordsEnvelope = serde_json::from_str(body).map_err(|e| {
        Error::invalid_response(url, format!("Expected a JSON records envelope: {}", e))
    })?;

    match envelope.records.or(envelope.results) {
        Some(records) => Ok(records),
        None => {
            warn!("Response from {} has no records list", url);
            Ok(Vec::new())
        }
    }
}
