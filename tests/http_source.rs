//! `HttpSource` and the full pipeline against a local stub server.
//!
//! The stub speaks just enough HTTP/1.1 for one GET per connection and
//! serves the files in `fixtures/` by path.

use regatta_sheet::config::{FilenameStrategy, RunConfig};
use regatta_sheet::pipeline::{self, PipelineError};
use regatta_sheet::source::{HttpSource, RegattaSource, SourceError};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;
use tempfile::TempDir;

const EVENT_ID: &str = "e5252026-b2c5-4d0a-a077-6bd50d69e55b";
const CLASS_ID: &str = "6f1f2c1e-opti";

fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures").join(name);
    std::fs::read_to_string(path).unwrap()
}

/// Start a stub server and return its base URL.
fn start_stub() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { continue };
            handle(stream);
        }
    });
    format!("http://{addr}")
}

fn handle(mut stream: TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    let request = String::from_utf8_lossy(&buf);
    let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();

    let page_path = format!("/en-EN/event/{EVENT_ID}");
    let results_path = format!("/api/event/{EVENT_ID}/regattaresult/{CLASS_ID}");
    let (status, content_type, body) = if path == page_path {
        ("200 OK", "text/html; charset=utf-8", fixture("event_page.html"))
    } else if path == results_path {
        ("200 OK", "application/json", fixture("results.json"))
    } else if path == format!("/api/event/{EVENT_ID}/regattaresult/broken") {
        ("200 OK", "application/json", "{\"EntryResults\": [".to_string())
    } else {
        ("404 Not Found", "text/plain", "not found".to_string())
    };

    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

fn stub_config(base_url: &str) -> RunConfig {
    RunConfig {
        base_url: base_url.to_string(),
        ..RunConfig::default()
    }
}

#[test]
fn fetches_listing_page() {
    let base = start_stub();
    let config = stub_config(&base);
    let source = HttpSource::new(&config.base_url, &config.http).unwrap();

    let html = source
        .event_page(&format!("{base}/en-EN/event/{EVENT_ID}"))
        .unwrap();
    assert!(html.contains("Workum Youth Regatta 2024"));
}

#[test]
fn fetches_results_payload_from_api_path() {
    let base = start_stub();
    let config = stub_config(&base);
    let source = HttpSource::new(&config.base_url, &config.http).unwrap();

    let payload = source.class_results(EVENT_ID, CLASS_ID).unwrap();
    assert_eq!(payload["EntryResults"].as_array().unwrap().len(), 2);
}

#[test]
fn non_success_status_is_http_error() {
    let base = start_stub();
    let config = stub_config(&base);
    let source = HttpSource::new(&config.base_url, &config.http).unwrap();

    let err = source.event_page(&format!("{base}/en-EN/event/unknown")).unwrap_err();
    match err {
        SourceError::Http { url, source } => {
            assert!(url.ends_with("/en-EN/event/unknown"));
            assert_eq!(source.status().map(|s| s.as_u16()), Some(404));
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[test]
fn malformed_json_is_json_error() {
    let base = start_stub();
    let config = stub_config(&base);
    let source = HttpSource::new(&config.base_url, &config.http).unwrap();

    let err = source.class_results(EVENT_ID, "broken").unwrap_err();
    assert!(matches!(err, SourceError::Json { .. }));
}

#[test]
fn unreachable_host_is_http_error() {
    // Bind then drop to get a port nobody listens on.
    let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
    let config = stub_config(&format!("http://127.0.0.1:{port}"));
    let source = HttpSource::new(&config.base_url, &config.http).unwrap();

    let err = source.class_results(EVENT_ID, CLASS_ID).unwrap_err();
    assert!(matches!(err, SourceError::Http { .. }));
}

#[test]
fn pipeline_over_http_writes_workbook() {
    let base = start_stub();
    let tmp = TempDir::new().unwrap();
    let mut config = stub_config(&base);
    config.export.filename = FilenameStrategy::Fixed;
    config.export.fixed_filename = tmp.path().join("optimist.xlsx").display().to_string();
    let source = HttpSource::new(&config.base_url, &config.http).unwrap();

    let url = format!("https://www.manage2sail.com/nl-NL/event/{EVENT_ID}");
    let event = pipeline::locate(&url, &config, false).unwrap();
    let overview = pipeline::overview(&source, event, &config).unwrap();
    assert_eq!(overview.details().unwrap().name, "Workum Youth Regatta 2024");

    let results = pipeline::class_results(&source, &overview, "Optimist").unwrap();
    let report = pipeline::export(&overview, &results, &config, None).unwrap();
    assert_eq!(report.sailors, 2);
    assert!(report.path.exists());

    let book = umya_spreadsheet::reader::xlsx::read(&report.path).unwrap();
    let sheet = book.get_sheet_by_name("Optimist").unwrap();
    assert_eq!(sheet.get_value((2, 1)), "Sailnumber");
    assert_eq!(sheet.get_value((6, 1)), "r3");
    assert_eq!(sheet.get_value((3, 3)), "Jesse Bakker");
}

#[test]
fn unknown_class_fails_before_results_request() {
    let base = start_stub();
    let config = stub_config(&base);
    let source = HttpSource::new(&config.base_url, &config.http).unwrap();

    let url = format!("{base}/en-EN/event/{EVENT_ID}");
    let event = pipeline::locate(&url, &config, true).unwrap();
    let overview = pipeline::overview(&source, event, &config).unwrap();
    let err = pipeline::class_results(&source, &overview, "Laser").unwrap_err();
    assert!(matches!(err, PipelineError::Catalog(_)));
    assert!(err.to_string().contains("Laser"));
}
