//! Owner detach/reattach and cancellation tests
//!
//! The min-delay floor keeps the task alive long enough for these tests to
//! detach or cancel deterministically while it is still running.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracerelay::{
    Config, FailureInterceptor as _, InterceptorRegistry as _, MemoryRegistry, TraceRelay,
};

use crate::common;

fn relay_with_delay(endpoint: &str, registry: Arc<MemoryRegistry>, delay: Duration) -> TraceRelay {
    TraceRelay::with_registry(Config::new(endpoint).with_min_delay(delay), registry)
}

#[tokio::test]
async fn test_in_flight_task_adopts_new_owner() {
    let dir = tempfile::tempdir().unwrap();
    common::write_record(dir.path(), "1.2-aaa.stacktrace", "Android 10\nPixel 4\nboom");
    let server = common::start_collector().await;
    let relay = relay_with_delay(
        &format!("{}/bugs", server.uri()),
        Arc::new(MemoryRegistry::new()),
        Duration::from_millis(400),
    );

    let host = common::TempHost::new(dir.path());
    let first = common::RecordingProcessor::new();
    relay.setup(&host, first.clone());

    // The first screen goes away while the task is still in its delay;
    // a second setup call adopts the in-flight submission.
    let second = common::RecordingProcessor::new();
    assert!(!relay.setup(&host, second.clone()));

    relay.wait_for_submission().await;

    assert_eq!(first.events(), ["begin_submit"]);
    assert_eq!(second.events(), ["submit_done", "handler_installed"]);
}

#[tokio::test]
async fn test_completion_while_detached_is_deferred() {
    let dir = tempfile::tempdir().unwrap();
    common::write_record(dir.path(), "1.2-aaa.stacktrace", "Android 10\nPixel 4\nboom");
    let server = common::start_collector().await;
    let registry = Arc::new(MemoryRegistry::new());
    let relay = relay_with_delay(
        &format!("{}/bugs", server.uri()),
        registry.clone(),
        Duration::from_millis(200),
    );

    let host = common::TempHost::new(dir.path());
    let first = common::RecordingProcessor::new();
    relay.setup(&host, first.clone());
    relay.detach_owner();

    // Task finishes with nobody attached: delivery is held, not dropped.
    relay.wait_for_submission().await;
    assert_eq!(first.events(), ["begin_submit"]);

    // Reattaching drains the pending callbacks synchronously, against the
    // new owner only.
    let second = common::RecordingProcessor::new();
    assert!(!relay.setup(&host, second.clone()));
    assert_eq!(second.events(), ["submit_done", "handler_installed"]);
    assert_eq!(first.events(), ["begin_submit"]);
    assert!(registry.current().unwrap().is_crash_writer());
}

#[tokio::test]
async fn test_cancellation_skips_submit_done_but_installs() {
    let dir = tempfile::tempdir().unwrap();
    common::write_record(dir.path(), "1.2-aaa.stacktrace", "Android 10\nPixel 4\nboom");
    let server = common::start_collector().await;
    let registry = Arc::new(MemoryRegistry::new());
    let relay = relay_with_delay(
        &format!("{}/bugs", server.uri()),
        registry.clone(),
        Duration::from_secs(5),
    );

    let host = common::TempHost::new(dir.path());
    let owner = common::RecordingProcessor::new();

    let started = Instant::now();
    relay.setup(&host, owner.clone());

    // Let the upload finish, then cancel while the task sits in its delay.
    tokio::time::sleep(Duration::from_millis(100)).await;
    relay.cancel_submission();
    relay.wait_for_submission().await;

    // Cancellation cuts the delay short and skips submit_done; the
    // interceptor tail still runs.
    assert!(started.elapsed() < Duration::from_secs(4));
    assert_eq!(owner.events(), ["begin_submit", "handler_installed"]);
    assert!(registry.current().unwrap().is_crash_writer());
}
