//! End-to-end ingestion over a local folder, an NDJSON log and a stub
//! notification endpoint.

mod common;

use common::StubServer;
use intake_relay::cli::{run_once, OutputOptions};
use intake_relay::{
    run_ingestion, HttpNotifier, IngestOptions, LocalFolder, LogStore, NdjsonLog, RelayConfig,
};
use std::path::Path;
use tempfile::TempDir;

fn inbox(tmp: &TempDir, names: &[&str]) -> std::path::PathBuf {
    let dir = tmp.path().join("inbox");
    std::fs::create_dir_all(&dir).expect("create inbox");
    for name in names {
        std::fs::write(dir.join(name), b"%PDF-1.7").expect("write file");
    }
    dir
}

fn logged_ids(log: &Path) -> Vec<String> {
    NdjsonLog::new(log)
        .records()
        .expect("read log")
        .into_iter()
        .map(|r| r.file_id)
        .collect()
}

// ============================================================================
// Happy path and deduplication
// ============================================================================

#[test]
fn test_new_files_are_notified_and_logged_once() {
    let tmp = TempDir::new().unwrap();
    let dir = inbox(&tmp, &["167. David Kim.pdf", "42.Report.PDF", "notes.txt"]);
    let log_path = tmp.path().join("log.ndjson");
    let stub = StubServer::spawn(vec![(200, r#"{"ok":true}"#), (200, r#"{"ok":true}"#)]);

    let source = LocalFolder::new(&dir, true);
    let mut log = NdjsonLog::new(&log_path);
    let notifier = HttpNotifier::new(stub.url("/process"));

    let report = run_ingestion(&source, &mut log, &notifier, IngestOptions::default()).unwrap();
    assert_eq!(report.listed, 2, "notes.txt is filtered out");
    assert_eq!(report.logged.len(), 2);
    assert!(report.failed.is_empty());

    let requests = stub.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].target, "/process");
    assert_eq!(requests[0].header("content-type"), Some("application/json"));
    assert_eq!(requests[0].json(), serde_json::json!({ "file_id": "167. David Kim.pdf" }));
    assert_eq!(requests[1].json()["file_id"], "42.Report.PDF");

    let records = log.records().unwrap();
    let rows: Vec<_> = records.iter().map(|r| r.to_row()).collect();
    assert_eq!(&rows[0][..3], ["167", "167. David Kim.pdf", "167. David Kim"]);
    assert_eq!(&rows[1][..3], ["42", "42.Report.PDF", "42.Report"]);

    // Second pass: everything is known, the endpoint is never called
    let report = run_ingestion(&source, &mut log, &notifier, IngestOptions::default()).unwrap();
    assert_eq!(report.already_logged, 2);
    assert_eq!(report.new_files(), 0);
    assert_eq!(stub.requests().len(), 2);
    assert_eq!(logged_ids(&log_path).len(), 2);
}

#[test]
fn test_existing_log_entries_are_skipped() {
    let tmp = TempDir::new().unwrap();
    let dir = inbox(&tmp, &["1. Old.pdf", "2. New.pdf"]);
    let log_path = tmp.path().join("log.ndjson");

    let mut log = NdjsonLog::new(&log_path);
    let seed = intake_relay::CandidateFile::new("1. Old.pdf", "1. Old.pdf");
    let parsed = intake_relay::ParsedName::from_file_name(&seed.name);
    log.append(&intake_relay::LoggedFileRecord::new(&seed, parsed, chrono::Utc::now()))
        .unwrap();

    let stub = StubServer::spawn(vec![(200, "{}")]);
    let notifier = HttpNotifier::new(stub.url("/process"));
    let report = run_ingestion(
        &LocalFolder::new(&dir, false),
        &mut log,
        &notifier,
        IngestOptions::default(),
    )
    .unwrap();

    assert_eq!(report.already_logged, 1);
    assert_eq!(stub.requests().len(), 1);
    assert_eq!(stub.requests()[0].json()["file_id"], "2. New.pdf");
    assert_eq!(logged_ids(&log_path), vec!["1. Old.pdf", "2. New.pdf"]);
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_unreachable_endpoint_leaves_files_for_next_run() {
    let tmp = TempDir::new().unwrap();
    let dir = inbox(&tmp, &["Untitled.pdf"]);
    let log_path = tmp.path().join("log.ndjson");
    let source = LocalFolder::new(&dir, true);
    let mut log = NdjsonLog::new(&log_path);

    let down = HttpNotifier::new("http://127.0.0.1:1/process");
    let report = run_ingestion(&source, &mut log, &down, IngestOptions::default()).unwrap();
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].file_id, "Untitled.pdf");
    assert!(logged_ids(&log_path).is_empty());

    let stub = StubServer::spawn(vec![(200, "{}")]);
    let up = HttpNotifier::new(stub.url("/process"));
    let report = run_ingestion(&source, &mut log, &up, IngestOptions::default()).unwrap();
    assert_eq!(report.logged.len(), 1);
    assert_eq!(report.logged[0].index, None);
    assert_eq!(report.logged[0].clean_name, "Untitled");
    assert_eq!(logged_ids(&log_path), vec!["Untitled.pdf"]);
}

#[test]
fn test_error_status_counts_as_delivered_by_default() {
    let tmp = TempDir::new().unwrap();
    let dir = inbox(&tmp, &["5. Five.pdf"]);
    let log_path = tmp.path().join("log.ndjson");
    let stub = StubServer::spawn(vec![(500, r#"{"error":"boom"}"#)]);

    let report = run_ingestion(
        &LocalFolder::new(&dir, false),
        &mut NdjsonLog::new(&log_path),
        &HttpNotifier::new(stub.url("/process")),
        IngestOptions::default(),
    )
    .unwrap();

    assert_eq!(report.logged.len(), 1);
    assert_eq!(logged_ids(&log_path), vec!["5. Five.pdf"]);
}

#[test]
fn test_error_status_fails_when_success_required() {
    let tmp = TempDir::new().unwrap();
    let dir = inbox(&tmp, &["5. Five.pdf"]);
    let log_path = tmp.path().join("log.ndjson");
    let stub = StubServer::spawn(vec![(503, "unavailable")]);
    let notifier = HttpNotifier::new(stub.url("/process")).with_require_success_status(true);

    let report = run_ingestion(
        &LocalFolder::new(&dir, false),
        &mut NdjsonLog::new(&log_path),
        &notifier,
        IngestOptions::default(),
    )
    .unwrap();

    assert!(report.logged.is_empty());
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].cause.contains("503"), "{}", report.failed[0].cause);
    assert!(logged_ids(&log_path).is_empty());
}

#[test]
fn test_missing_folder_aborts_run() {
    let tmp = TempDir::new().unwrap();
    let err = run_ingestion(
        &LocalFolder::new(tmp.path().join("missing"), false),
        &mut NdjsonLog::new(tmp.path().join("log.ndjson")),
        &HttpNotifier::new("http://127.0.0.1:1/process"),
        IngestOptions::default(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("listing local folder"), "{err}");
}

#[test]
fn test_malformed_log_aborts_run() {
    let tmp = TempDir::new().unwrap();
    let dir = inbox(&tmp, &["1. A.pdf"]);
    let log_path = tmp.path().join("log.ndjson");
    std::fs::write(&log_path, "not json\n").unwrap();

    let err = run_ingestion(
        &LocalFolder::new(&dir, false),
        &mut NdjsonLog::new(&log_path),
        &HttpNotifier::new("http://127.0.0.1:1/process"),
        IngestOptions::default(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("ndjson log"), "{err}");
    let cause = std::error::Error::source(&err).map(ToString::to_string).unwrap_or_default();
    assert!(cause.contains("line 1"), "{cause}");
}

// ============================================================================
// CLI handler
// ============================================================================

#[test]
fn test_run_once_from_config() {
    let tmp = TempDir::new().unwrap();
    let dir = inbox(&tmp, &["9. Nine.pdf"]);
    let log_path = tmp.path().join("log.ndjson");
    let events = tmp.path().join("events.ndjson");
    let stub = StubServer::spawn(vec![(200, "accepted")]);

    let config = RelayConfig::builder()
        .local_folder(&dir)
        .ndjson_log(&log_path)
        .notify_url(stub.url("/process"))
        .build();
    let output = OutputOptions {
        format: intake_relay::output::OutputFormat::Json,
        file: Some(events.clone()),
        quiet: true,
    };

    let report = run_once(&config, false, &output).unwrap();
    assert_eq!(report.logged.len(), 1);
    assert_eq!(logged_ids(&log_path), vec!["9. Nine.pdf"]);

    let event: serde_json::Value =
        serde_json::from_str(std::fs::read_to_string(&events).unwrap().trim()).unwrap();
    assert_eq!(event["type"], "run");
    assert_eq!(event["logged"][0]["clean_name"], "9. Nine");
}
