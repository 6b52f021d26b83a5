//! Crash interceptor and failure-handler registry
//!
//! `CrashWriter` is this system's handler of last resort: it persists one
//! crash record to durable storage and then delegates to whatever handler it
//! replaced, so other crash observers keep functioning. `PanicHookRegistry`
//! bridges the registry port to the process-wide `std::panic` hook;
//! `MemoryRegistry` backs hosts with their own failure plumbing and tests
//! that must not touch the global hook.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use tracerelay_core::domain::{HostInfo, RECORD_SUFFIX};
use tracerelay_core::ports::{FailureEvent, FailureInterceptor, InterceptorRegistry};

/// Installs the crash-writing interceptor if it is not already installed.
///
/// Idempotent: when the currently registered interceptor is already a crash
/// writer, the chain is left untouched (no double wrapping). Otherwise the
/// current interceptor, if any, is retained and chained behind the new one.
pub fn install_interceptor(registry: &dyn InterceptorRegistry, info: &HostInfo) {
    let current = registry.current();
    if current.as_ref().is_some_and(|c| c.is_crash_writer()) {
        debug!("Crash interceptor already installed");
        return;
    }

    debug!(dir = %info.storage_dir.display(), "Installing crash interceptor");
    registry.install(Arc::new(CrashWriter::new(info.clone(), current)));
}

/// Interceptor that writes one crash record file per failure, then delegates
/// to the interceptor it replaced.
pub struct CrashWriter {
    info: HostInfo,
    previous: Option<Arc<dyn FailureInterceptor>>,
}

impl CrashWriter {
    /// Creates a writer persisting records under `info.storage_dir`,
    /// chaining to `previous` after each record.
    pub fn new(info: HostInfo, previous: Option<Arc<dyn FailureInterceptor>>) -> Self {
        Self { info, previous }
    }

    fn write_record(&self, event: &FailureEvent) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.info.storage_dir)?;

        let date = Utc::now().format("%Y%m%d%H%M%S");
        let short_id = Uuid::new_v4().simple().to_string();
        let filename = format!(
            "{}-{date}-{}{RECORD_SUFFIX}",
            self.info.app_version,
            &short_id[..8]
        );

        let mut body = String::new();
        body.push_str(&self.info.os_version);
        body.push('\n');
        body.push_str(&self.info.device_model);
        body.push('\n');
        body.push_str(&event.message);
        body.push('\n');
        if !event.location.is_empty() {
            body.push_str(&event.location);
            body.push('\n');
        }
        body.push_str(&event.backtrace);

        std::fs::write(self.info.storage_dir.join(filename), body)
    }
}

impl FailureInterceptor for CrashWriter {
    fn on_failure(&self, event: &FailureEvent) {
        // The process is going down; stderr is the only reliable channel left.
        if let Err(e) = self.write_record(event) {
            eprintln!("Failed to save crash record: {e}");
        }

        if let Some(previous) = &self.previous {
            previous.on_failure(event);
        }
    }

    fn is_crash_writer(&self) -> bool {
        true
    }
}

/// Registry state shared with the registered panic hook.
#[derive(Default)]
struct HookState {
    current: Option<Arc<dyn FailureInterceptor>>,
    hook_registered: bool,
}

/// Registry backed by the process-wide panic hook.
///
/// The first `install` captures the pre-existing panic hook and registers a
/// single dispatching hook; the pre-existing hook keeps running after the
/// interceptor chain, so default behavior (stderr output) is preserved.
/// Later installs only swap the dispatch target.
#[derive(Default)]
pub struct PanicHookRegistry {
    inner: Arc<Mutex<HookState>>,
}

impl PanicHookRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InterceptorRegistry for PanicHookRegistry {
    fn current(&self) -> Option<Arc<dyn FailureInterceptor>> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .current
            .clone()
    }

    fn install(&self, interceptor: Arc<dyn FailureInterceptor>) {
        let mut state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);

        if !state.hook_registered {
            let previous_hook = std::panic::take_hook();
            let inner = Arc::clone(&self.inner);

            std::panic::set_hook(Box::new(move |panic_info| {
                let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };

                let location = panic_info
                    .location()
                    .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
                    .unwrap_or_default();

                let event = FailureEvent {
                    message,
                    location,
                    backtrace: std::backtrace::Backtrace::force_capture().to_string(),
                };

                let current = inner
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .current
                    .clone();
                if let Some(interceptor) = current {
                    interceptor.on_failure(&event);
                }

                previous_hook(panic_info);
            }));

            state.hook_registered = true;
        }

        state.current = Some(interceptor);
    }
}

/// In-memory registry with no global side effects.
#[derive(Default)]
pub struct MemoryRegistry {
    current: Mutex<Option<Arc<dyn FailureInterceptor>>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InterceptorRegistry for MemoryRegistry {
    fn current(&self) -> Option<Arc<dyn FailureInterceptor>> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn install(&self, interceptor: Arc<dyn FailureInterceptor>) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some(interceptor);
    }
}
