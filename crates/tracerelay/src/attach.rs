//! Owner attachment proxy
//!
//! Decouples the background submission task from the possibly short-lived
//! owner that wants its completion callbacks. The proxy is a single-slot
//! mailbox: one mutex guards the attached owner and the undelivered terminal
//! outcome, and delivery happens under that same lock, so a callback can
//! never fire against a stale owner after a reattachment has returned.

use std::sync::{Arc, Mutex, PoisonError};

use tracerelay_core::ports::Processor;

/// Terminal outcome of the submission task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The upload pass ran to the end (individual failures included).
    Completed,
    /// The task was cancelled before completion was signalled.
    Cancelled,
}

/// Finalize sequence run once against the owner attached at delivery time.
pub type Finalizer = Box<dyn Fn(TaskOutcome, &dyn Processor) + Send + Sync>;

enum Phase {
    Running,
    /// Terminal, waiting for an owner to deliver to.
    Pending(TaskOutcome),
    Finalized,
}

struct ProxyState {
    owner: Option<Arc<dyn Processor>>,
    phase: Phase,
}

/// Single-slot owner mailbox with deferred, exactly-once delivery.
pub struct AttachmentProxy {
    state: Mutex<ProxyState>,
    finalizer: Finalizer,
}

impl AttachmentProxy {
    /// Creates a proxy initially attached to `owner`. The `finalizer` runs
    /// exactly once, when a terminal outcome meets an attached owner.
    pub fn new(owner: Option<Arc<dyn Processor>>, finalizer: Finalizer) -> Self {
        Self {
            state: Mutex::new(ProxyState {
                owner,
                phase: Phase::Running,
            }),
            finalizer,
        }
    }

    /// Replaces the attached owner. `None` detaches without delivering;
    /// attaching a real owner after the task reached a terminal state
    /// delivers the pending callbacks immediately, against that owner.
    pub fn connect(&self, owner: Option<Arc<dyn Processor>>) {
        let mut state = self.lock();
        state.owner = owner;
        self.try_finalize(&mut state);
    }

    /// Records the task's terminal outcome. Delivery happens now if an owner
    /// is attached, otherwise on the next `connect` with a real owner.
    pub fn task_finished(&self, outcome: TaskOutcome) {
        let mut state = self.lock();
        if matches!(state.phase, Phase::Running) {
            state.phase = Phase::Pending(outcome);
        }
        self.try_finalize(&mut state);
    }

    /// True once the pending callbacks have been delivered; no further
    /// delivery is owed.
    pub fn post_processing_done(&self) -> bool {
        matches!(self.lock().phase, Phase::Finalized)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ProxyState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn try_finalize(&self, state: &mut ProxyState) {
        if let Phase::Pending(outcome) = state.phase {
            if let Some(owner) = state.owner.clone() {
                state.phase = Phase::Finalized;
                (self.finalizer)(outcome, owner.as_ref());
            }
        }
    }
}
