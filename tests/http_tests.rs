mod common;
use common::{Reply, fake_server, reply};

use sitefeed::config::{HttpConfig, PublishConfig};
use sitefeed::errors::AppError;
use sitefeed::net::fetch::{CsvSource, HttpSource};
use sitefeed::publish::{GitHubPublisher, PublishOutcome, Publisher};
use std::sync::mpsc::Receiver;

fn fast_http(max_retries: u32) -> HttpConfig {
    HttpConfig {
        timeout_secs: 5,
        max_retries,
        retry_backoff_ms: 1,
    }
}

fn publisher(base: &str) -> GitHubPublisher {
    let publish = PublishConfig {
        api_url: base.to_string(),
        repository: "owner/site".into(),
        branch: "main".into(),
        ..Default::default()
    };
    GitHubPublisher::new(&publish, &fast_http(3), "token".into()).unwrap()
}

fn received(rx: &Receiver<String>) -> Vec<String> {
    rx.try_iter().collect()
}

// "hei" and "hoi", base64 encoded as the contents API returns them
const REMOTE_HEI: &str = r#"{"sha":"abc","content":"aGVp\n","encoding":"base64"}"#;
const REMOTE_HOI: &str = r#"{"sha":"abc","content":"aG9p\n","encoding":"base64"}"#;

#[test]
fn test_missing_file_is_created() {
    let (base, rx) = fake_server(vec![
        reply(404, r#"{"message":"Not Found"}"#),
        reply(201, "{}"),
    ]);

    let outcome = publisher(&base)
        .publish("en/program.html", "hei", "Update")
        .unwrap();
    assert_eq!(outcome, PublishOutcome::Created);

    let requests = received(&rx);
    assert_eq!(requests.len(), 2);
    assert!(requests[0].starts_with("GET /repos/owner/site/contents/en/program.html?ref=main "));
    assert!(requests[1].starts_with("PUT /repos/owner/site/contents/en/program.html "));
    assert!(requests[1].contains(r#""content":"aGVp""#));
    assert!(requests[1].contains(r#""branch":"main""#));
    assert!(!requests[1].contains(r#""sha""#));
}

#[test]
fn test_identical_content_makes_no_commit() {
    let (base, rx) = fake_server(vec![reply(200, REMOTE_HEI)]);

    let outcome = publisher(&base).publish("program.html", "hei", "Update").unwrap();

    assert_eq!(outcome, PublishOutcome::Unchanged);
    assert_eq!(received(&rx).len(), 1);
}

#[test]
fn test_changed_content_is_updated_with_the_current_sha() {
    let (base, rx) = fake_server(vec![reply(200, REMOTE_HOI), reply(200, "{}")]);

    let outcome = publisher(&base).publish("program.html", "hei", "Update").unwrap();

    assert_eq!(outcome, PublishOutcome::Updated);
    let requests = received(&rx);
    assert!(requests[1].starts_with("PUT "));
    assert!(requests[1].contains(r#""sha":"abc""#));
}

#[test]
fn test_rejected_token_stops_before_writing() {
    let (base, rx) = fake_server(vec![reply(401, r#"{"message":"Bad credentials"}"#)]);

    let err = publisher(&base)
        .publish("program.html", "hei", "Update")
        .unwrap_err();

    assert!(matches!(err, AppError::PublishAuth(_)));
    assert_eq!(received(&rx).len(), 1);
}

#[test]
fn test_not_found_on_write_is_reported() {
    let (base, _rx) = fake_server(vec![reply(200, REMOTE_HOI), reply(404, "{}")]);

    let err = publisher(&base)
        .publish("program.html", "hei", "Update")
        .unwrap_err();

    assert!(matches!(err, AppError::PublishNotFound(_)));
}

#[test]
fn test_stale_sha_on_write_is_a_conflict() {
    let (base, _rx) = fake_server(vec![reply(200, REMOTE_HOI), reply(409, "{}")]);

    let err = publisher(&base)
        .publish("program.html", "hei", "Update")
        .unwrap_err();

    assert!(matches!(err, AppError::PublishConflict(_)));
}

#[test]
fn test_unavailable_service_is_retried() {
    let (base, rx) = fake_server(vec![
        reply(503, "{}"),
        reply(404, "{}"),
        reply(201, "{}"),
    ]);

    let outcome = publisher(&base).publish("program.html", "hei", "Update").unwrap();

    assert_eq!(outcome, PublishOutcome::Created);
    let requests = received(&rx);
    assert_eq!(requests.len(), 3);
    assert!(requests[0].starts_with("GET "));
    assert!(requests[1].starts_with("GET "));
    assert!(requests[2].starts_with("PUT "));
}

#[test]
fn test_csv_fetch_retries_then_succeeds() {
    let (base, rx) = fake_server(vec![reply(503, ""), reply(200, "\u{feff}Aika,Paikka\n")]);

    let text = HttpSource::new(&format!("{base}/pub?output=csv"), &fast_http(3))
        .unwrap()
        .fetch()
        .unwrap();

    assert_eq!(text, "Aika,Paikka\n");
    assert_eq!(received(&rx).len(), 2);
}

#[test]
fn test_csv_fetch_gives_up_after_max_retries() {
    let (base, rx) = fake_server(vec![reply(503, ""), reply(503, ""), reply(503, "")]);

    let err = HttpSource::new(&format!("{base}/pub?output=csv"), &fast_http(2))
        .unwrap()
        .fetch()
        .unwrap_err();

    assert!(matches!(err, AppError::HttpStatus { status: 503, .. }));
    assert_eq!(received(&rx).len(), 2);
}

#[test]
fn test_csv_fetch_rejects_invalid_utf8() {
    let (base, _rx) = fake_server(vec![Reply {
        status: 200,
        body: vec![b'A', 0xff, 0xfe, b'\n'],
    }]);

    let err = HttpSource::new(&base, &fast_http(1))
        .unwrap()
        .fetch()
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidEncoding { .. }));
}
