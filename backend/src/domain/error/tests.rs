//! Tests for domain error construction and stack trace rendering.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn base_error() -> Error {
    Error::invalid_request("Invalid Name")
}

#[rstest]
#[case(Error::invalid_request("x"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("x"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("x"), ErrorCode::Forbidden)]
#[case(Error::not_found("x"), ErrorCode::NotFound)]
#[case(Error::service_unavailable("x"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("x"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] err: Error, #[case] expected: ErrorCode) {
    assert_eq!(err.code(), expected);
}

#[rstest]
fn developer_message_defaults_to_message(base_error: Error) {
    assert_eq!(base_error.developer_message(), "Invalid Name");
}

#[rstest]
fn developer_message_can_be_overridden(base_error: Error) {
    let err = base_error.with_developer_message("name must not be empty");
    assert_eq!(err.message(), "Invalid Name");
    assert_eq!(err.developer_message(), "name must not be empty");
}

#[rstest]
fn new_leaves_trace_id_empty_out_of_scope() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[tokio::test]
async fn new_captures_trace_id_in_scope() {
    let trace_id: TraceId = TRACE_ID.parse().expect("fixture trace id");
    let err = TraceId::scope(trace_id, async { Error::not_found("Anime not found") }).await;
    assert_eq!(err.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn with_details_and_trace_id_are_retained(base_error: Error) {
    let err = base_error
        .with_trace_id("abc")
        .with_details(json!({"field": "name"}));
    assert_eq!(err.trace_id(), Some("abc"));
    assert_eq!(err.details(), Some(&json!({"field": "name"})));
}

#[derive(Debug, thiserror::Error)]
#[error("pool exhausted")]
struct PoolError(#[source] std::io::Error);

#[rstest]
fn stack_trace_renders_whole_cause_chain() {
    let cause = PoolError(std::io::Error::other("connection refused"));
    let err = Error::service_unavailable("store unavailable").with_source(cause);

    let rendered = err.stack_trace();
    let mut lines = rendered.lines();
    assert_eq!(lines.next(), Some("service_unavailable: store unavailable"));
    assert_eq!(lines.next(), Some("Caused by: pool exhausted"));
    assert_eq!(lines.next(), Some("Caused by: connection refused"));
}

#[rstest]
fn source_is_exposed_through_std_error(base_error: Error) {
    use std::error::Error as _;

    assert!(base_error.source().is_none());
    let err = base_error.with_source(std::io::Error::other("bad"));
    assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("bad"));
}

#[rstest]
fn display_uses_user_facing_message() {
    let err = Error::internal("Internal server error").with_developer_message("db down");
    assert_eq!(err.to_string(), "Internal server error");
}

#[rstest]
#[case(ErrorCode::InvalidRequest, "\"invalid_request\"")]
#[case(ErrorCode::MethodNotAllowed, "\"method_not_allowed\"")]
#[case(ErrorCode::UnsupportedMediaType, "\"unsupported_media_type\"")]
fn codes_serialise_as_snake_case(#[case] code: ErrorCode, #[case] expected: &str) {
    let json = serde_json::to_string(&code).expect("serialise code");
    assert_eq!(json, expected);
    assert_eq!(format!("\"{code}\""), expected);
}
