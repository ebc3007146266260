use integration_tests::harness::TestServer;
use integration_tests::harness::upstream::{APP_JS, LOGO_PNG};
use pretty_assertions::assert_eq;
use reqwest::header;
use std::time::Duration;

#[test]
fn passthrough_streams_bytes_and_content_type() {
    // Arrange
    let srv = TestServer::start("basic");

    // Act
    let res = srv
        .get_via("/passthrough", &srv.upstream().url("/logo.png"))
        .send()
        .expect("request failed");

    // Assert
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()[header::CONTENT_TYPE], "image/png");
    assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(res.bytes().unwrap().as_ref(), LOGO_PNG);
}

#[test]
fn passthrough_does_not_modify_text() {
    let srv = TestServer::start("basic");

    let res = srv
        .get_via("/passthrough", &srv.upstream().url("/app.js"))
        .send()
        .expect("request failed");

    assert_eq!(res.status(), 200);
    assert_eq!(
        res.headers()[header::CONTENT_TYPE],
        "application/javascript"
    );
    assert_eq!(res.text().unwrap(), APP_JS);
}

#[test]
fn legacy_proxy_endpoint_passes_through() {
    let srv = TestServer::start("basic");

    let res = srv
        .get_via("/proxy", &srv.upstream().url("/logo.png"))
        .send()
        .expect("request failed");

    assert_eq!(res.status(), 200);
    assert_eq!(res.bytes().unwrap().as_ref(), LOGO_PNG);
}

#[test]
fn missing_url_is_a_bad_request() {
    let srv = TestServer::start("basic");

    let res = srv.get("/passthrough").send().expect("request failed");

    assert_eq!(res.status(), 400);
    assert!(!res.text().unwrap().is_empty());
}

#[test]
fn upstream_status_is_preserved() {
    let srv = TestServer::start("basic");

    let res = srv
        .get_via("/passthrough", &srv.upstream().url("/missing"))
        .send()
        .expect("request failed");

    assert_eq!(res.status(), 404);
    assert_eq!(res.text().unwrap(), "not here");
}

#[test]
fn unreachable_upstream_becomes_500() {
    let srv = TestServer::start("basic");
    let closed = integration_tests::harness::server::free_port();

    let res = srv
        .get_via("/passthrough", &format!("http://127.0.0.1:{closed}/a.png"))
        .send()
        .expect("request failed");

    assert_eq!(res.status(), 500);
    assert!(!res.text().unwrap().is_empty());
}

#[test]
fn passthrough_does_not_request_identity_encoding() {
    let srv = TestServer::start("basic");

    let res = srv
        .get_via("/passthrough", &srv.upstream().url("/echo-headers"))
        .send()
        .expect("request failed");

    let body = res.text().unwrap();
    assert!(body.contains("user-agent: lilium-test"), "body: {body}");
    assert!(!body.contains("accept-encoding: identity"), "body: {body}");
}

#[test]
fn completed_requests_are_logged() {
    let srv = TestServer::start("basic");
    let target = srv.upstream().url("/logo.png?logged=1");

    let res = srv
        .get_via("/passthrough", &target)
        .send()
        .expect("request failed");
    assert_eq!(res.status(), 200);

    let event = srv
        .events()
        .wait_for(Duration::from_secs(2), |e| {
            e.message() == Some("request completed") && e.field("target") == Some(target.as_str())
        })
        .expect("no request log event");

    assert_eq!(event.field("endpoint"), Some("passthrough"));
    assert_eq!(event.field("status"), Some("200"));
    assert!(event.field("request_id").is_some_and(|id| id.len() == 36));
}
