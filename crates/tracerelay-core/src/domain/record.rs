//! Crash record parsing
//!
//! A crash record is one file per captured failure. The filename carries the
//! app version (segment before the first `-`); the body carries the OS
//! version on line 1, the device model on line 2, and the raw trace text on
//! the remaining lines.

use serde::Serialize;

/// Suffix marking a file in the storage directory as a pending crash record.
pub const RECORD_SUFFIX: &str = ".stacktrace";

/// One captured crash, parsed from its on-disk representation.
///
/// Identity is the filename. A truncated file is still a valid record with
/// empty trailing fields; no partial-write recovery is attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrashRecord {
    /// File name within the storage directory (identity)
    pub filename: String,
    /// App version, derived from the filename prefix
    pub app_version: String,
    /// First body line
    pub os_version: String,
    /// Second body line
    pub device_model: String,
    /// Remaining body lines, each re-terminated with a newline
    pub trace_body: String,
}

impl CrashRecord {
    /// Parses a record from its filename and raw file contents.
    pub fn parse(filename: &str, contents: &str) -> Self {
        let mut lines = contents.lines();
        let os_version = lines.next().unwrap_or_default().to_string();
        let device_model = lines.next().unwrap_or_default().to_string();

        let mut trace_body = String::new();
        for line in lines {
            trace_body.push_str(line);
            trace_body.push('\n');
        }

        Self {
            filename: filename.to_string(),
            app_version: version_from_filename(filename),
            os_version,
            device_model,
            trace_body,
        }
    }
}

/// Extracts the app version from a record filename.
///
/// The version is the segment before the first `-`, e.g. `1.2` for
/// `1.2-20260101-ab12cd34.stacktrace`.
pub fn version_from_filename(filename: &str) -> String {
    filename.split('-').next().unwrap_or_default().to_string()
}

/// Returns true if `name` looks like a pending crash record file.
pub fn is_record_filename(name: &str) -> bool {
    name.ends_with(RECORD_SUFFIX)
}

/// The form-encoded fields of one upload request.
///
/// Field names are part of the wire contract with the collection endpoint
/// and must not be renamed.
#[derive(Debug, Clone, Serialize)]
pub struct ReportPayload {
    pub package_name: String,
    pub package_version: String,
    pub phone_model: String,
    pub android_version: String,
    pub stacktrace: String,
}

impl ReportPayload {
    /// Builds the upload payload for one record.
    pub fn from_record(record: &CrashRecord, package_name: &str) -> Self {
        Self {
            package_name: package_name.to_string(),
            package_version: record.app_version.clone(),
            phone_model: record.device_model.clone(),
            android_version: record.os_version.clone(),
            stacktrace: record.trace_body.clone(),
        }
    }
}
