//! Tests for the domain error payload.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("who"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("no"), ErrorCode::Forbidden)]
#[case(Error::not_found("gone"), ErrorCode::NotFound)]
#[case(Error::conflict("taken"), ErrorCode::Conflict)]
#[case(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] code: ErrorCode) {
    assert_eq!(error.code(), code);
}

#[rstest]
fn new_returns_none_when_trace_id_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let error = TraceId::scope(trace_id, async move { Error::forbidden("no") }).await;

    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
fn serialises_camel_case_and_skips_empty_fields() {
    let value = serde_json::to_value(Error::not_found("ad not found")).expect("json");
    assert_eq!(value, json!({ "code": "not_found", "message": "ad not found" }));
}

#[rstest]
fn serialises_trace_id_and_details(expected_trace_id: String) {
    let error = Error::invalid_request("bad price")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({ "field": "price", "code": "negative_price" }));
    let value = serde_json::to_value(&error).expect("json");
    assert_eq!(
        value,
        json!({
            "code": "invalid_request",
            "message": "bad price",
            "traceId": expected_trace_id,
            "details": { "field": "price", "code": "negative_price" },
        })
    );
}

#[rstest]
fn deserialises_snake_case_trace_alias(expected_trace_id: String) {
    let error: Error = serde_json::from_value(json!({
        "code": "forbidden",
        "message": "no",
        "trace_id": expected_trace_id,
    }))
    .expect("payload parses");
    assert_eq!(error.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn display_uses_message() {
    assert_eq!(Error::conflict("username taken").to_string(), "username taken");
}
