//! Failure interceptor and registry ports
//!
//! The platform's global "handler of last resort" is re-expressed as an
//! explicit registry abstraction so multiple independent contexts can exist
//! in one test process. The installed interceptor always retains a reference
//! to whatever it replaced and delegates to it after recording a crash
//! (decorator chain, not inheritance).

use std::sync::Arc;

/// One unhandled failure, as seen by the interceptor chain.
#[derive(Debug, Clone)]
pub struct FailureEvent {
    /// Human-readable failure message
    pub message: String,
    /// Source location (`file:line:column`), empty if unknown
    pub location: String,
    /// Captured backtrace text
    pub backtrace: String,
}

/// Port trait for a handler in the global failure chain
pub trait FailureInterceptor: Send + Sync {
    /// Invoked when an unhandled failure occurs.
    fn on_failure(&self, event: &FailureEvent);

    /// Marker distinguishing this system's record-writing interceptor, so
    /// installation can avoid wrapping it a second time.
    fn is_crash_writer(&self) -> bool {
        false
    }
}

/// Port trait for the process-wide failure-handler registry
pub trait InterceptorRegistry: Send + Sync {
    /// The currently installed interceptor, if any.
    fn current(&self) -> Option<Arc<dyn FailureInterceptor>>;

    /// Replaces the currently installed interceptor. The caller is
    /// responsible for chaining the previous one into `interceptor`.
    fn install(&self, interceptor: Arc<dyn FailureInterceptor>);
}
