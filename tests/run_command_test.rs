//! End-to-end tests for the fetch → categorize → save run

mod common;

use serde_json::{json, Value};
use tempfile::TempDir;

use osmfetch::cli::commands::{run, RunOutcome};
use osmfetch::cli::RunRequest;
use osmfetch::infrastructure::TransportError;
use osmfetch::util::testing;

use common::{container, StubTransport};

const SCENARIO: &str = r#"{"elements": [
    {"id": 1, "tags": {"building": "yes"}},
    {"id": 2, "tags": {"highway": "residential"}},
    {"id": 3, "tags": {}}
]}"#;

fn request(temp: &TempDir, categorize: bool) -> RunRequest {
    RunRequest {
        area: "vennesla".to_string(),
        output: temp.path().join("vennesla_osm.json"),
        categorize,
    }
}

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn given_scenario_response_when_running_categorized_then_writes_wrapped_document() {
    testing::init_test_setup();
    // Arrange
    let temp = TempDir::new().unwrap();
    let req = request(&temp, true);
    let services = container(StubTransport::ok(SCENARIO));

    // Act
    let outcome = run(&services, &req).unwrap();

    // Assert
    assert_eq!(
        outcome,
        RunOutcome::Saved {
            path: req.output.clone(),
            total_elements: 3
        }
    );
    let doc = read_json(&req.output);
    assert_eq!(
        doc["categorized"],
        json!({
            "buildings": [{"id": 1, "tags": {"building": "yes"}}],
            "roads": [{"id": 2, "tags": {"highway": "residential"}}],
            "water": [],
            "forests": [],
            "poi": []
        })
    );
    assert_eq!(doc["metadata"]["total_elements"], json!(3));
    assert_eq!(doc["metadata"]["area"], json!("vennesla"));
    assert_eq!(
        doc["metadata"]["bbox"],
        json!({"south": 58.25, "west": 7.9, "north": 58.35, "east": 8.05})
    );
    assert_eq!(doc["raw"], serde_json::from_str::<Value>(SCENARIO).unwrap());
}

#[test]
fn given_response_when_running_without_categorize_then_writes_raw_result_verbatim() {
    testing::init_test_setup();
    let temp = TempDir::new().unwrap();
    let req = request(&temp, false);
    let body = r#"{"version": 0.6, "generator": "Overpass API", "osm3s": {"copyright": "ODbL"},
        "elements": [{"type": "node", "id": 5, "lat": 58.3, "lon": 7.97, "tags": {"amenity": "café"}}]}"#;
    let services = container(StubTransport::ok(body));

    let outcome = run(&services, &req).unwrap();

    assert!(matches!(outcome, RunOutcome::Saved { total_elements: 1, .. }));
    assert_eq!(read_json(&req.output), serde_json::from_str::<Value>(body).unwrap());
    let text = std::fs::read_to_string(&req.output).unwrap();
    assert!(text.contains("café"), "non-ASCII must stay unescaped");
}

#[test]
fn given_transport_error_when_running_then_aborts_without_output_file() {
    testing::init_test_setup();
    let temp = TempDir::new().unwrap();
    let req = request(&temp, true);
    let transport = StubTransport::failing(TransportError::Connection("connection refused".into()));
    let services = container(transport.clone());

    let outcome = run(&services, &req).unwrap();

    match outcome {
        RunOutcome::Aborted { reason } => {
            assert!(reason.contains("Failed to fetch data"), "{reason}");
            assert!(reason.contains("connection refused"), "{reason}");
        }
        other => panic!("expected abort, got {other:?}"),
    }
    assert!(!req.output.exists());
    assert_eq!(transport.call_count(), 1, "no retries");
}

#[test]
fn given_timeout_when_running_then_aborts_without_output_file() {
    let temp = TempDir::new().unwrap();
    let req = request(&temp, false);
    let services = container(StubTransport::failing(TransportError::Timeout));

    let outcome = run(&services, &req).unwrap();

    assert!(matches!(outcome, RunOutcome::Aborted { .. }));
    assert!(!req.output.exists());
}

#[test]
fn given_malformed_body_when_running_then_aborts() {
    let temp = TempDir::new().unwrap();
    let req = request(&temp, false);
    let services = container(StubTransport::ok("<html>502 Bad Gateway</html>"));

    let outcome = run(&services, &req).unwrap();

    match outcome {
        RunOutcome::Aborted { reason } => assert!(reason.contains("malformed"), "{reason}"),
        other => panic!("expected abort, got {other:?}"),
    }
    assert!(!req.output.exists());
}

#[test]
fn given_empty_element_list_when_running_then_aborts_and_reports_remark() {
    let temp = TempDir::new().unwrap();
    let req = request(&temp, true);
    let body = r#"{"elements": [], "remark": "runtime error: Query timed out in \"query\" at line 3"}"#;
    let services = container(StubTransport::ok(body));

    let outcome = run(&services, &req).unwrap();

    match outcome {
        RunOutcome::Aborted { reason } => assert!(reason.contains("Query timed out"), "{reason}"),
        other => panic!("expected abort, got {other:?}"),
    }
    assert!(!req.output.exists());
}

#[test]
fn given_missing_output_directory_when_running_then_reports_save_failure() {
    let temp = TempDir::new().unwrap();
    let req = RunRequest {
        area: "vennesla".into(),
        output: temp.path().join("data").join("vennesla_osm.json"),
        categorize: false,
    };
    let services = container(StubTransport::ok(SCENARIO));

    let outcome = run(&services, &req).unwrap();

    match outcome {
        RunOutcome::SaveFailed { path, reason } => {
            assert_eq!(path, req.output);
            assert!(reason.contains("write output"), "{reason}");
        }
        other => panic!("expected save failure, got {other:?}"),
    }
    assert!(!req.output.exists());
}

#[test]
fn given_output_is_directory_when_running_then_reports_save_failure() {
    let temp = TempDir::new().unwrap();
    let req = RunRequest {
        area: "vennesla".into(),
        output: temp.path().to_path_buf(),
        categorize: false,
    };
    let transport = StubTransport::ok(SCENARIO);
    let services = container(transport.clone());

    let outcome = run(&services, &req).unwrap();

    match outcome {
        RunOutcome::SaveFailed { path, reason } => {
            assert_eq!(path, req.output);
            assert!(reason.contains("write output"), "{reason}");
        }
        other => panic!("expected save failure, got {other:?}"),
    }
    assert_eq!(transport.call_count(), 1);
    assert!(temp.path().is_dir());
}

#[test]
fn given_default_settings_when_running_then_posts_vennesla_query_to_endpoint() {
    let temp = TempDir::new().unwrap();
    let req = request(&temp, false);
    let transport = StubTransport::ok(SCENARIO);
    let services = container(transport.clone());

    run(&services, &req).unwrap();

    let calls = transport.calls.lock().unwrap();
    let (endpoint, query) = &calls[0];
    assert_eq!(endpoint, "https://overpass-api.de/api/interpreter");
    assert!(query.starts_with("[out:json][timeout:60];"));
    assert_eq!(query.matches("58.25,7.9,58.35,8.05").count(), 10);
}

/// Collects formatted tracing output for assertions.
#[derive(Clone, Default)]
struct CapturedLog(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

impl std::io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn given_default_log_level_when_fetch_or_save_fails_then_no_duplicate_log_lines() {
    // Arrange
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_writer(move || writer.clone())
        .finish();
    let temp = TempDir::new().unwrap();
    let failing = container(StubTransport::failing(TransportError::Timeout));
    let with_remark = container(StubTransport::ok(
        r#"{"remark": "runtime error: timed out", "elements": [{"id": 1}]}"#,
    ));
    let unwritable = RunRequest {
        area: "vennesla".into(),
        output: temp.path().join("missing").join("out.json"),
        categorize: false,
    };

    // Act
    let (aborted, save_failed) = tracing::subscriber::with_default(subscriber, || {
        (
            run(&failing, &request(&temp, false)).unwrap(),
            run(&with_remark, &unwritable).unwrap(),
        )
    });

    // Assert
    assert!(matches!(aborted, RunOutcome::Aborted { .. }));
    assert!(matches!(save_failed, RunOutcome::SaveFailed { .. }));
    let captured = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
    assert!(captured.is_empty(), "unexpected log output: {captured}");
}
