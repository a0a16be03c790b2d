//! Tests for HTTP error mapping and the error envelope.

use super::*;
use actix_web::body::to_bytes;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn internal_error_case() -> Error {
    Error::internal("Internal server error")
        .with_developer_message("anime repository error: relation missing")
        .with_trace_id(TRACE_ID)
        .with_details(json!({"secret": "x"}))
}

#[fixture]
fn invalid_request_case() -> Error {
    Error::invalid_request("Invalid Name")
        .with_trace_id(TRACE_ID)
        .with_details(json!({"field": "name"}))
}

#[rstest]
#[case(ErrorCode::InvalidRequest, StatusCode::BAD_REQUEST)]
#[case(ErrorCode::Unauthorized, StatusCode::UNAUTHORIZED)]
#[case(ErrorCode::Forbidden, StatusCode::FORBIDDEN)]
#[case(ErrorCode::NotFound, StatusCode::NOT_FOUND)]
#[case(ErrorCode::MethodNotAllowed, StatusCode::METHOD_NOT_ALLOWED)]
#[case(ErrorCode::UnsupportedMediaType, StatusCode::UNSUPPORTED_MEDIA_TYPE)]
#[case(ErrorCode::ServiceUnavailable, StatusCode::SERVICE_UNAVAILABLE)]
#[case(ErrorCode::InternalError, StatusCode::INTERNAL_SERVER_ERROR)]
fn codes_and_statuses_map_both_ways(#[case] code: ErrorCode, #[case] status: StatusCode) {
    assert_eq!(status_for(code), status);
    assert_eq!(code_for_status(status), code);
}

#[rstest]
#[case(StatusCode::PAYLOAD_TOO_LARGE, ErrorCode::InvalidRequest)]
#[case(StatusCode::CONFLICT, ErrorCode::InvalidRequest)]
#[case(StatusCode::BAD_GATEWAY, ErrorCode::InternalError)]
fn unlisted_statuses_fall_back(#[case] status: StatusCode, #[case] expected: ErrorCode) {
    assert_eq!(code_for_status(status), expected);
}

#[rstest]
fn internal_errors_are_redacted_without_trace(internal_error_case: Error) {
    let envelope = envelope_for(&internal_error_case, false);
    assert_eq!(envelope.status, 500);
    assert_eq!(envelope.error, "Internal Server Error");
    assert_eq!(envelope.message, REDACTED_MESSAGE);
    assert_eq!(envelope.developer_message, REDACTED_MESSAGE);
    assert!(envelope.details.is_none());
    assert!(envelope.stack_trace.is_none());
    assert_eq!(envelope.trace_id.as_deref(), Some(TRACE_ID));
}

#[rstest]
fn trace_request_reveals_internal_detail(internal_error_case: Error) {
    let envelope = envelope_for(&internal_error_case, true);
    assert_eq!(
        envelope.developer_message,
        "anime repository error: relation missing"
    );
    let stack_trace = envelope.stack_trace.expect("stack trace requested");
    assert!(stack_trace.starts_with("internal_error: anime repository error"));
}

#[rstest]
fn client_errors_keep_message_and_details(invalid_request_case: Error) {
    let envelope = envelope_for(&invalid_request_case, false).at_path("/animes/batch");
    assert_eq!(envelope.status, 400);
    assert_eq!(envelope.error, "Bad Request");
    assert_eq!(envelope.message, "Invalid Name");
    assert_eq!(envelope.developer_message, "Invalid Name");
    assert_eq!(envelope.details, Some(json!({"field": "name"})));
    assert_eq!(envelope.path, "/animes/batch");
}

#[rstest]
fn with_status_overrides_reported_status() {
    let envelope = envelope_for(&Error::invalid_request("too big"), false)
        .with_status(StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(envelope.status, 413);
    assert_eq!(envelope.error, "Payload Too Large");
    assert_eq!(envelope.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[rstest]
fn envelope_serialises_camel_case_and_omits_absent_fields() {
    let envelope = envelope_for(&Error::forbidden("Access is denied"), false).at_path("/animes");
    let value = serde_json::to_value(&envelope).expect("serialise envelope");
    let object = value.as_object().expect("object");

    for key in [
        "timestamp",
        "path",
        "status",
        "error",
        "code",
        "message",
        "developerMessage",
    ] {
        assert!(object.contains_key(key), "missing {key}");
    }
    assert!(!object.contains_key("stackTrace"));
    assert!(!object.contains_key("details"));
    assert_eq!(value["code"], "forbidden");
}

#[actix_web::test]
async fn unauthorized_responses_carry_basic_challenge() {
    let response = Error::unauthorized("invalid credentials").error_response();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response
            .headers()
            .get(header::WWW_AUTHENTICATE)
            .and_then(|value| value.to_str().ok()),
        Some(BASIC_CHALLENGE)
    );
}

#[actix_web::test]
async fn error_response_body_is_json_envelope() {
    let response = invalid_request_case().error_response();
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("application/json")
    );
    let bytes = to_bytes(response.into_body()).await.expect("body bytes");
    let envelope: ErrorEnvelope = serde_json::from_slice(&bytes).expect("envelope json");
    assert_eq!(envelope.code, ErrorCode::InvalidRequest);
    assert_eq!(envelope.trace_id.as_deref(), Some(TRACE_ID));
}
