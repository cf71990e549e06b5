//! End-to-end REST session scenarios against a closure handler.

use attest::Pattern;
use attest_rest::{
    MemoryReporter, Method, RecordKind, RequestBody, RestError, RestSession,
};
use http::{Request, Response};
use serde_json::json;
use std::sync::Arc;

fn users_handler(req: Request<Vec<u8>>) -> Response<Vec<u8>> {
    match (req.method().as_str(), req.uri().path()) {
        ("GET", "/users/1") => Response::builder()
            .status(200)
            .body(br#"{"id":1,"name":"Ann"}"#.to_vec())
            .unwrap(),
        ("POST", "/users") => Response::builder()
            .status(201)
            .body(req.into_body())
            .unwrap(),
        _ => Response::builder()
            .status(404)
            .body(br#"{"error":"not found"}"#.to_vec())
            .unwrap(),
    }
}

#[test]
fn get_user_scenario() {
    let mut session = RestSession::new(users_handler);
    session.send(Method::GET, "/users/1", None).expect("send");

    // Subset match on the body.
    assert!(session.check(200, &Pattern::from(json!({"id": 1}))).is_ok());

    // Wrong field value cites the path.
    let err = session
        .check(200, &Pattern::from(json!({"id": 2})))
        .unwrap_err();
    match err {
        RestError::ResponseMismatch(failure) => {
            assert!(failure.has_path("$.id"));
            assert_eq!(failure.to_string(), "$.id: expected 2, got 1");
        }
        other => panic!("unexpected error: {other}"),
    }

    // Wrong status cites both codes and the body.
    let err = session.check(404, &Pattern::from(json!({}))).unwrap_err();
    let text = err.to_string();
    assert!(text.contains("expected response code 404, got 200"));
    assert!(text.contains(r#""name":"Ann""#));
}

#[test]
fn second_send_invalidates_first_capture() {
    let mut session = RestSession::new(users_handler);
    session.send(Method::GET, "/users/1", None).expect("send");
    session.send(Method::GET, "/missing", None).expect("send");

    // Only the second response is checkable now.
    assert!(session
        .check(404, &Pattern::from(json!({"error": "not found"})))
        .is_ok());
    assert!(matches!(
        session.check(200, &Pattern::from(json!({"id": 1}))),
        Err(RestError::StatusMismatch { actual: 404, .. })
    ));
}

#[test]
fn post_round_trip_with_structured_body() {
    let mut session = RestSession::new(users_handler);
    session
        .send(
            Method::POST,
            "/users",
            Some(RequestBody::Structured(json!({"name": "Bob", "age": 31}))),
        )
        .expect("send");

    assert!(session
        .check(201, &Pattern::from(json!({"name": "Bob"})))
        .is_ok());
}

#[test]
fn accumulated_headers_reach_the_handler() {
    let handler = |req: Request<Vec<u8>>| {
        let traces: Vec<&str> = req
            .headers()
            .get_all("x-trace")
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        Response::builder()
            .status(200)
            .body(format!(r#"{{"traces":{}}}"#, traces.len()).into_bytes())
            .unwrap()
    };

    let mut session = RestSession::new(handler);
    session.add_header("x-trace", "a").expect("header");
    session.add_header("x-trace", "b").expect("header");

    // Headers are attached to every subsequent request.
    session.send(Method::GET, "/echo", None).expect("send");
    assert!(session
        .check(200, &Pattern::from(json!({"traces": 2})))
        .is_ok());

    session.send(Method::GET, "/echo", None).expect("send");
    assert!(session
        .check(200, &Pattern::from(json!({"traces": 2})))
        .is_ok());
}

#[test]
fn diagnostics_reach_the_reporter() {
    let reporter = Arc::new(MemoryReporter::new());
    let mut session = RestSession::with_reporter(users_handler, Box::new(Arc::clone(&reporter)));

    session
        .send(
            Method::POST,
            "/users",
            Some(RequestBody::Text(r#"{"name":"Bob"}"#.to_string())),
        )
        .expect("send");

    let records = reporter.snapshot();
    assert_eq!(records.len(), 2);

    assert_eq!(records[0].kind, RecordKind::Request);
    assert!(records[0].content.starts_with("POST /users"));
    assert!(records[0].content.contains(r#"{"name":"Bob"}"#));

    assert_eq!(records[1].kind, RecordKind::Response);
    assert_eq!(records[1].title, "HTTP Response (201)");
}
