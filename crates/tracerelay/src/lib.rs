//! Tracerelay - crash-report capture and relay pipeline
//!
//! When the host application crashes, a record of the failure is persisted
//! to local storage; on the next process start, [`TraceRelay::setup`]
//! uploads any pending records to the collection endpoint in the background,
//! removes them, and then (re)installs the crash interceptor so future
//! crashes are captured the same way.
//!
//! The caller supplying UI feedback implements [`Processor`] and may detach
//! and reattach (a new screen replacing a destroyed one) without ever losing
//! a completion callback or having one fire against a dead owner.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! use tracerelay::{Config, HostEnvironment, Processor, TraceRelay};
//!
//! struct Host;
//!
//! impl HostEnvironment for Host {
//!     fn app_version(&self) -> anyhow::Result<String> {
//!         Ok("1.2".to_string())
//!     }
//!     fn package_id(&self) -> anyhow::Result<String> {
//!         Ok("com.example.app".to_string())
//!     }
//!     fn storage_dir(&self) -> anyhow::Result<PathBuf> {
//!         Ok(PathBuf::from("/var/lib/example/crashes"))
//!     }
//!     fn device_model(&self) -> anyhow::Result<String> {
//!         Ok("Pixel 4".to_string())
//!     }
//!     fn os_version(&self) -> anyhow::Result<String> {
//!         Ok("Android 10".to_string())
//!     }
//! }
//!
//! struct Screen;
//!
//! impl Processor for Screen {
//!     fn begin_submit(&self) -> bool {
//!         // show the "submitting crash report…" indicator
//!         true
//!     }
//!     fn submit_done(&self) {
//!         // dismiss the indicator
//!     }
//!     fn handler_installed(&self) {
//!         // continue with app setup
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let relay = TraceRelay::new(Config::new("http://collector.example/bugs"));
//!     let had_pending = relay.setup(&Host, Arc::new(Screen));
//!     if had_pending {
//!         relay.wait_for_submission().await;
//!     }
//! }
//! ```

pub mod attach;
pub mod interceptor;
pub mod setup;
pub mod store;
pub mod task;
pub mod transport;

pub use attach::{AttachmentProxy, TaskOutcome};
pub use interceptor::{install_interceptor, CrashWriter, MemoryRegistry, PanicHookRegistry};
pub use setup::TraceRelay;
pub use store::RecordStore;
pub use task::SubmissionTask;
pub use transport::HttpReportTransport;

pub use tracerelay_core::config::Config;
pub use tracerelay_core::domain::{CrashRecord, HostInfo, ReportPayload};
pub use tracerelay_core::ports::{
    FailureEvent, FailureInterceptor, HostEnvironment, InterceptorRegistry, Processor,
    ReportTransport,
};
