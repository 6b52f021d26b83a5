//! Background submission task
//!
//! One task per process lifetime: reads and uploads every pending record
//! sequentially off the caller's context, deletes the originally listed
//! files best-effort, honors the minimum visible-duration floor, and signals
//! its terminal outcome through the attachment proxy. Nothing in here
//! escapes to the caller as an error; the task always reaches a terminal
//! state.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use tracerelay_core::domain::ReportPayload;
use tracerelay_core::ports::{Processor, ReportTransport};

use crate::attach::{AttachmentProxy, TaskOutcome};
use crate::store::RecordStore;

/// Handle to the in-flight scan-and-upload pass.
pub struct SubmissionTask {
    proxy: Arc<AttachmentProxy>,
    cancel: CancellationToken,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl SubmissionTask {
    /// Spawns the upload pass on the current tokio runtime.
    ///
    /// Must be called from within a runtime context. `package_id` fills the
    /// `package_name` field of every upload.
    pub fn spawn(
        store: Arc<RecordStore>,
        transport: Arc<dyn ReportTransport>,
        package_id: String,
        min_delay: Duration,
        proxy: Arc<AttachmentProxy>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run(
            store,
            transport,
            package_id,
            min_delay,
            Arc::clone(&proxy),
            cancel.clone(),
        ));

        Self {
            proxy,
            cancel,
            handle: Mutex::new(Some(handle)),
        }
    }

    /// Replaces the owner receiving this task's completion callbacks.
    pub fn connect(&self, owner: Option<Arc<dyn Processor>>) {
        self.proxy.connect(owner);
    }

    /// True once the terminal callbacks have been delivered.
    pub fn post_processing_done(&self) -> bool {
        self.proxy.post_processing_done()
    }

    /// Requests cancellation. An upload already in flight completes its
    /// current record; the completion path then skips `submit_done`.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Waits for the background pass to reach its terminal state.
    pub async fn join(&self) {
        let handle = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

async fn run(
    store: Arc<RecordStore>,
    transport: Arc<dyn ReportTransport>,
    package_id: String,
    min_delay: Duration,
    proxy: Arc<AttachmentProxy>,
    cancel: CancellationToken,
) {
    let started = Instant::now();

    let filenames: Vec<String> = store.list_pending().to_vec();
    info!(count = filenames.len(), "Submitting pending crash records");

    for filename in &filenames {
        match store.read(filename) {
            Ok(record) => {
                let payload = ReportPayload::from_record(&record, &package_id);
                if let Err(e) = transport.submit(&payload).await {
                    warn!("{e}");
                }
            }
            Err(e) => warn!("{e}"),
        }
    }

    // Every originally listed record is removed, including ones whose read
    // or upload failed; an unreachable endpoint must not leave a poisoned
    // record resubmitting itself forever.
    for filename in &filenames {
        store.delete(filename);
    }

    let remaining = min_delay.saturating_sub(started.elapsed());
    if remaining > Duration::ZERO {
        tokio::select! {
            _ = tokio::time::sleep(remaining) => {}
            _ = cancel.cancelled() => {}
        }
    }

    let outcome = if cancel.is_cancelled() {
        TaskOutcome::Cancelled
    } else {
        TaskOutcome::Completed
    };
    proxy.task_finished(outcome);
}
