//! Host application metadata
//!
//! A snapshot of the values the host environment reports at setup time.
//! Lookup failures leave the corresponding field empty; they never abort
//! setup.

use std::path::PathBuf;

/// Metadata describing the host application and device.
#[derive(Debug, Clone, Default)]
pub struct HostInfo {
    /// Host application version (used as the record filename prefix)
    pub app_version: String,
    /// Host package identifier (the `package_name` upload field)
    pub package_id: String,
    /// Device model string
    pub device_model: String,
    /// OS version string
    pub os_version: String,
    /// Directory where crash records are persisted
    pub storage_dir: PathBuf,
}
