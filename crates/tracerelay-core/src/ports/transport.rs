//! Upload transport port (driven/secondary port)
//!
//! One upload request per crash record. The response is deliberately not
//! inspected: with no retry policy, a delivered-but-rejected request is
//! inactionable and treated as success.

use async_trait::async_trait;

use crate::domain::{ReportPayload, TransportError};

/// Port trait for submitting one crash report to the collection endpoint
#[async_trait]
pub trait ReportTransport: Send + Sync {
    /// Sends one report; fails only when the request could not be completed.
    async fn submit(&self, payload: &ReportPayload) -> Result<(), TransportError>;
}
