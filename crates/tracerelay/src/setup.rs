//! Setup orchestrator
//!
//! The entry point wiring the record store, upload transport, submission
//! task and interceptor together. All process-wide state lives in an
//! explicit [`TraceRelay`] context so multiple independent contexts can
//! coexist in one test process.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use tracerelay_core::config::Config;
use tracerelay_core::domain::HostInfo;
use tracerelay_core::ports::{HostEnvironment, InterceptorRegistry, Processor};

use crate::attach::{AttachmentProxy, TaskOutcome};
use crate::interceptor::{install_interceptor, PanicHookRegistry};
use crate::store::RecordStore;
use crate::task::SubmissionTask;
use crate::transport::HttpReportTransport;

struct RelayState {
    setup_called: bool,
    store: Option<Arc<RecordStore>>,
    task: Option<Arc<SubmissionTask>>,
}

/// Crash relay context: submit-then-install lifecycle state machine.
///
/// `setup` drives the asynchronous submit-then-install sequence exactly once
/// per context lifetime; later calls only manage owner re-attachment. See
/// the crate docs for the full lifecycle.
pub struct TraceRelay {
    config: Config,
    registry: Arc<dyn InterceptorRegistry>,
    state: Mutex<RelayState>,
}

impl TraceRelay {
    /// Creates a context registering its interceptor with the process-wide
    /// panic hook.
    pub fn new(config: Config) -> Self {
        Self::with_registry(config, Arc::new(PanicHookRegistry::new()))
    }

    /// Creates a context against a caller-supplied failure registry.
    pub fn with_registry(config: Config, registry: Arc<dyn InterceptorRegistry>) -> Self {
        Self {
            config,
            registry,
            state: Mutex::new(RelayState {
                setup_called: false,
                store: None,
                task: None,
            }),
        }
    }

    /// Submits any pending crash records, then installs the crash
    /// interceptor. Returns whether pending records existed at call time.
    ///
    /// First call: probes the store; with no pending records the interceptor
    /// is installed and `owner.handler_installed()` fires immediately.
    /// Otherwise `owner.begin_submit()` decides whether the background
    /// upload pass starts; its completion path delivers `submit_done`,
    /// installs the interceptor and delivers `handler_installed`, in that
    /// order.
    ///
    /// Later calls never rescan or resubmit: a live task adopts the new
    /// owner, otherwise `handler_installed` fires immediately so the host
    /// can always continue its own setup.
    ///
    /// Must be called from within a tokio runtime context.
    pub fn setup(&self, host: &dyn HostEnvironment, owner: Arc<dyn Processor>) -> bool {
        let mut state = self.lock();

        if state.setup_called {
            let live_task = state
                .task
                .clone()
                .filter(|task| !task.post_processing_done());
            drop(state);

            match live_task {
                Some(task) => {
                    // Detach first so the swap is a clean replace even if the
                    // task reaches its terminal state mid-call.
                    task.connect(None);
                    task.connect(Some(owner));
                }
                None => owner.handler_installed(),
            }
            return false;
        }
        state.setup_called = true;

        info!("Registering crash interceptor");
        let host_info = collect_host_info(host);
        if self.config.verbose {
            debug!(app_version = %host_info.app_version, "Host metadata gathered");
            debug!(package_id = %host_info.package_id, "Host metadata gathered");
            debug!(storage_dir = %host_info.storage_dir.display(), "Host metadata gathered");
            debug!(endpoint = %self.config.endpoint_url, "Host metadata gathered");
        }

        let store = Self::store_for(&mut state, host_info.storage_dir.clone());
        let records_found = !store.list_pending().is_empty();
        drop(state);

        if !records_found {
            install_interceptor(self.registry.as_ref(), &host_info);
            owner.handler_installed();
            return false;
        }

        if !owner.begin_submit() {
            install_interceptor(self.registry.as_ref(), &host_info);
            owner.handler_installed();
            return true;
        }

        let registry = Arc::clone(&self.registry);
        let finalize_info = host_info.clone();
        let proxy = Arc::new(AttachmentProxy::new(
            Some(owner),
            Box::new(move |outcome: TaskOutcome, owner: &dyn Processor| {
                if outcome == TaskOutcome::Completed {
                    owner.submit_done();
                }
                install_interceptor(registry.as_ref(), &finalize_info);
                owner.handler_installed();
            }),
        ));

        let transport = Arc::new(HttpReportTransport::new(
            &self.config.endpoint_url,
            self.config.http_timeout,
        ));
        let task = Arc::new(SubmissionTask::spawn(
            store,
            transport,
            host_info.package_id,
            self.config.min_delay,
            proxy,
        ));

        self.lock().task = Some(task);
        true
    }

    /// Reports whether pending crash records exist.
    ///
    /// Once `setup` has run, this unconditionally returns `false`: the
    /// records observed then are in flight, and callers must not be able to
    /// trigger a duplicate submission decision.
    pub fn has_pending_records(&self, host: &dyn HostEnvironment) -> bool {
        let mut state = self.lock();
        if state.setup_called {
            return false;
        }

        let storage_dir = match host.storage_dir() {
            Ok(dir) => dir,
            Err(e) => {
                warn!("Failed to look up host storage dir: {e}");
                return false;
            }
        };

        !Self::store_for(&mut state, storage_dir)
            .list_pending()
            .is_empty()
    }

    /// Detaches the current owner. Call when the owner is being destroyed;
    /// completion callbacks are held until `setup` runs again with a new
    /// owner.
    pub fn detach_owner(&self) {
        if let Some(task) = self.lock().task.clone() {
            task.connect(None);
        }
    }

    /// Requests cancellation of the in-flight submission, if any. The
    /// completion path then skips `submit_done` but still installs the
    /// interceptor and delivers `handler_installed`.
    pub fn cancel_submission(&self) {
        if let Some(task) = self.lock().task.clone() {
            task.cancel();
        }
    }

    /// Waits for the background submission to reach its terminal state.
    /// Returns immediately when no task was started.
    pub async fn wait_for_submission(&self) {
        let task = self.lock().task.clone();
        if let Some(task) = task {
            task.join().await;
        }
    }

    fn lock(&self) -> MutexGuard<'_, RelayState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The store is created once; the pending set is fixed at its first scan.
    fn store_for(state: &mut RelayState, storage_dir: PathBuf) -> Arc<RecordStore> {
        match &state.store {
            Some(store) => Arc::clone(store),
            None => {
                let store = Arc::new(RecordStore::new(storage_dir));
                state.store = Some(Arc::clone(&store));
                store
            }
        }
    }
}

fn collect_host_info(host: &dyn HostEnvironment) -> HostInfo {
    fn lookup(name: &str, result: anyhow::Result<String>) -> String {
        result.unwrap_or_else(|e| {
            warn!("Failed to look up host {name}: {e}");
            String::new()
        })
    }

    let storage_dir = host.storage_dir().unwrap_or_else(|e| {
        warn!("Failed to look up host storage dir: {e}");
        PathBuf::new()
    });

    HostInfo {
        app_version: lookup("app version", host.app_version()),
        package_id: lookup("package id", host.package_id()),
        device_model: lookup("device model", host.device_model()),
        os_version: lookup("os version", host.os_version()),
        storage_dir,
    }
}
