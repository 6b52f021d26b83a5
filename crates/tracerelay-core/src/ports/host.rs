//! Host environment port (driven/secondary port)
//!
//! Simple synchronous key-value lookups against the host application.
//! Implementations are expected to be cheap and infallible in practice; a
//! "not found" failure is logged by the caller and the corresponding
//! [`HostInfo`](crate::domain::HostInfo) field is left empty.

use std::path::PathBuf;

/// Port trait for host application metadata lookup
pub trait HostEnvironment: Send + Sync {
    /// Version string of the host application
    fn app_version(&self) -> anyhow::Result<String>;

    /// Package identifier of the host application
    fn package_id(&self) -> anyhow::Result<String>;

    /// Directory where crash records are stored
    fn storage_dir(&self) -> anyhow::Result<PathBuf>;

    /// Device model string
    fn device_model(&self) -> anyhow::Result<String>;

    /// OS version string
    fn os_version(&self) -> anyhow::Result<String>;
}
