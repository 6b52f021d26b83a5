//! Owner (processor) port
//!
//! The caller-supplied object receiving submission lifecycle callbacks.
//! The natural implementor is a UI context whose lifetime is shorter than
//! the background submission; the attachment proxy in the adapter crate
//! makes detach/reattach safe.
//!
//! ## Delivery contract
//!
//! - `begin_submit` runs on the caller's context, strictly before the
//!   background task starts.
//! - `submit_done` (or a cancellation, which skips it) is delivered strictly
//!   before `handler_installed`.
//! - Terminal callbacks are delivered to exactly one owner instance, under
//!   the proxy's attachment lock; implementations must not call back into
//!   setup or attachment operations from inside a callback.

/// Port trait for submission lifecycle callbacks
pub trait Processor: Send + Sync {
    /// Pending records were found; return `false` to decline submission
    /// (the interceptor is still installed).
    fn begin_submit(&self) -> bool;

    /// The upload pass finished (not delivered on cancellation).
    fn submit_done(&self);

    /// The crash interceptor is installed; host setup may continue.
    fn handler_installed(&self);
}
