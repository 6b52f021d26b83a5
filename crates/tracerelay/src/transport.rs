//! HTTP upload transport
//!
//! Serializes one report into a URL-form-encoded POST against the configured
//! collection endpoint. The response body and status code are not inspected;
//! with no retry policy, distinguishing a rejected delivery from a successful
//! one would be inactionable.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use tracerelay_core::domain::{ReportPayload, TransportError};
use tracerelay_core::ports::ReportTransport;

/// `reqwest`-backed implementation of the upload transport port.
pub struct HttpReportTransport {
    client: Client,
    endpoint_url: String,
}

impl HttpReportTransport {
    /// Creates a transport posting to `endpoint_url`.
    ///
    /// `timeout` overrides both the connect and total-request timeout;
    /// `None` keeps the client defaults.
    ///
    /// # Panics
    ///
    /// Panics when the TLS backend cannot be initialized, the same
    /// condition under which `reqwest::Client::new` panics.
    pub fn new(endpoint_url: impl Into<String>, timeout: Option<Duration>) -> Self {
        let client = match timeout {
            Some(timeout) => Client::builder()
                .connect_timeout(timeout)
                .timeout(timeout)
                .build()
                .expect("failed to build HTTP client"),
            None => Client::new(),
        };

        Self {
            client,
            endpoint_url: endpoint_url.into(),
        }
    }

    /// Returns the configured endpoint URL.
    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }
}

#[async_trait]
impl ReportTransport for HttpReportTransport {
    async fn submit(&self, payload: &ReportPayload) -> Result<(), TransportError> {
        debug!(
            version = %payload.package_version,
            url = %self.endpoint_url,
            "Transmitting crash report"
        );

        self.client
            .post(&self.endpoint_url)
            .form(payload)
            .send()
            .await
            .map_err(|e| TransportError::Send {
                url: self.endpoint_url.clone(),
                reason: e.to_string(),
            })?;

        Ok(())
    }
}
