//! Domain error types
//!
//! Failures in this system are terminal-logged, never surfaced to the owner;
//! these types exist so adapters can say precisely what went wrong in logs
//! and so individual operations remain testable.

use thiserror::Error;

/// Errors raised by the on-disk record store
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The storage directory could not be scanned or created
    #[error("Failed to scan record directory {path}: {reason}")]
    Scan { path: String, reason: String },

    /// A single record file could not be read
    #[error("Failed to read crash record {filename}: {reason}")]
    Read { filename: String, reason: String },
}

/// Errors raised by the upload transport
///
/// Only a request that could not be completed is an error; a delivered
/// request with a rejecting status is indistinguishable from success, since
/// there is no retry policy that could act on the difference.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The POST could not be sent or the connection failed mid-request
    #[error("Failed to deliver crash report to {url}: {reason}")]
    Send { url: String, reason: String },
}
