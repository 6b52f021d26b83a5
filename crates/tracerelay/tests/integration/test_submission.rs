//! Submission pass tests
//!
//! Verifies the wire format of one upload, batch ordering, unconditional
//! post-batch deletion, failure tolerance, and the minimum-delay floor.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracerelay::{Config, MemoryRegistry, TraceRelay};

use crate::common;

#[tokio::test]
async fn test_single_record_is_posted_and_removed() {
    let dir = tempfile::tempdir().unwrap();
    common::write_record(
        dir.path(),
        "1.2-aaa.stacktrace",
        "Android 10\nPixel 4\njava.lang.NullPointerException\n at Foo.bar",
    );
    let server = common::start_collector().await;
    let relay = TraceRelay::with_registry(
        Config::new(format!("{}/bugs", server.uri())),
        Arc::new(MemoryRegistry::new()),
    );

    let host = common::TempHost::new(dir.path());
    let owner = common::RecordingProcessor::new();
    assert!(relay.setup(&host, owner.clone()));
    relay.wait_for_submission().await;

    let bodies = common::request_bodies(&server).await;
    assert_eq!(bodies.len(), 1);
    let body = &bodies[0];
    assert!(body.contains("package_name=com.example.app"), "{body}");
    assert!(body.contains("package_version=1.2"), "{body}");
    assert!(body.contains("phone_model=Pixel+4"), "{body}");
    assert!(body.contains("android_version=Android+10"), "{body}");
    assert!(
        body.contains("stacktrace=java.lang.NullPointerException%0A"),
        "{body}"
    );

    assert!(!dir.path().join("1.2-aaa.stacktrace").exists());
    assert_eq!(
        owner.events(),
        ["begin_submit", "submit_done", "handler_installed"]
    );
}

#[tokio::test]
async fn test_batch_uploads_sequentially_in_snapshot_order() {
    let dir = tempfile::tempdir().unwrap();
    common::write_record(dir.path(), "1.0-a.stacktrace", "Android 10\nPixel 4\nfirst");
    common::write_record(dir.path(), "1.1-b.stacktrace", "Android 10\nPixel 4\nsecond");
    common::write_record(dir.path(), "1.2-c.stacktrace", "Android 10\nPixel 4\nthird");
    let server = common::start_collector().await;
    let relay = TraceRelay::with_registry(
        Config::new(format!("{}/bugs", server.uri())),
        Arc::new(MemoryRegistry::new()),
    );

    let host = common::TempHost::new(dir.path());
    relay.setup(&host, common::RecordingProcessor::new());
    relay.wait_for_submission().await;

    let bodies = common::request_bodies(&server).await;
    assert_eq!(bodies.len(), 3);
    assert!(bodies[0].contains("package_version=1.0"));
    assert!(bodies[1].contains("package_version=1.1"));
    assert!(bodies[2].contains("package_version=1.2"));

    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_rejecting_endpoint_is_indistinguishable_from_success() {
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let dir = tempfile::tempdir().unwrap();
    common::write_record(dir.path(), "1.2-aaa.stacktrace", "Android 10\nPixel 4\nboom");

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let relay = TraceRelay::with_registry(
        Config::new(format!("{}/bugs", server.uri())),
        Arc::new(MemoryRegistry::new()),
    );

    let host = common::TempHost::new(dir.path());
    let owner = common::RecordingProcessor::new();
    relay.setup(&host, owner.clone());
    relay.wait_for_submission().await;

    assert_eq!(
        owner.events(),
        ["begin_submit", "submit_done", "handler_installed"]
    );
    assert!(!dir.path().join("1.2-aaa.stacktrace").exists());
}

#[tokio::test]
async fn test_unreachable_endpoint_still_deletes_and_completes() {
    let dir = tempfile::tempdir().unwrap();
    common::write_record(dir.path(), "1.2-aaa.stacktrace", "Android 10\nPixel 4\nboom");
    common::write_record(dir.path(), "1.2-bbb.stacktrace", "Android 10\nPixel 4\nboom");

    // Nothing listens here; every send fails with a connection error.
    let relay = TraceRelay::with_registry(
        Config::new("http://127.0.0.1:1/bugs")
            .with_http_timeout(Duration::from_millis(500)),
        Arc::new(MemoryRegistry::new()),
    );

    let host = common::TempHost::new(dir.path());
    let owner = common::RecordingProcessor::new();
    relay.setup(&host, owner.clone());
    relay.wait_for_submission().await;

    // Transport errors are non-fatal: the batch reaches its terminal state
    // and every listed record is deleted regardless.
    assert_eq!(
        owner.events(),
        ["begin_submit", "submit_done", "handler_installed"]
    );
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_unreadable_record_is_skipped_and_still_removed() {
    let dir = tempfile::tempdir().unwrap();
    // Invalid UTF-8 body: reading this record fails.
    std::fs::write(dir.path().join("1.1-bad.stacktrace"), [0xff, 0xfe, 0xfd]).unwrap();
    common::write_record(dir.path(), "1.2-good.stacktrace", "Android 10\nPixel 4\nboom");
    let server = common::start_collector().await;
    let relay = TraceRelay::with_registry(
        Config::new(format!("{}/bugs", server.uri())),
        Arc::new(MemoryRegistry::new()),
    );

    let host = common::TempHost::new(dir.path());
    let owner = common::RecordingProcessor::new();
    relay.setup(&host, owner.clone());
    relay.wait_for_submission().await;

    // One bad record must not abort the batch: the healthy record is
    // uploaded, and the best-effort cleanup removes both files.
    let bodies = common::request_bodies(&server).await;
    assert_eq!(bodies.len(), 1);
    assert!(bodies[0].contains("package_version=1.2"), "{}", bodies[0]);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    assert_eq!(
        owner.events(),
        ["begin_submit", "submit_done", "handler_installed"]
    );
}

#[tokio::test]
async fn test_min_delay_floor_holds_back_completion() {
    let dir = tempfile::tempdir().unwrap();
    common::write_record(dir.path(), "1.2-aaa.stacktrace", "Android 10\nPixel 4\nboom");
    let server = common::start_collector().await;
    let relay = TraceRelay::with_registry(
        Config::new(format!("{}/bugs", server.uri())).with_min_delay(Duration::from_millis(300)),
        Arc::new(MemoryRegistry::new()),
    );

    let host = common::TempHost::new(dir.path());
    let owner = common::RecordingProcessor::new();

    let started = Instant::now();
    relay.setup(&host, owner.clone());
    relay.wait_for_submission().await;

    assert!(
        started.elapsed() >= Duration::from_millis(280),
        "completion signalled after only {:?}",
        started.elapsed()
    );
    assert_eq!(
        owner.events(),
        ["begin_submit", "submit_done", "handler_installed"]
    );
}
