//! Tests for the error envelope and status mapping.

use actix_web::body::to_bytes;
use actix_web::test::TestRequest;
use rstest::rstest;
use serde_json::json;

use super::*;

async fn body_of(response: HttpResponse) -> ErrorBody {
    let bytes = to_bytes(response.into_body()).await.expect("buffered body");
    serde_json::from_slice(&bytes).expect("error body json")
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::forbidden("no"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("gone"), StatusCode::NOT_FOUND)]
#[case(Error::unsupported_media_type("xml"), StatusCode::UNSUPPORTED_MEDIA_TYPE)]
#[case(Error::service_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn codes_map_to_statuses(#[case] error: Error, #[case] expected: StatusCode) {
    assert_eq!(error.status_code(), expected);
}

#[actix_web::test]
async fn body_carries_status_text_and_message() {
    let response = Error::resource_not_found("Post", "42").error_response();
    assert_eq!(
        response.headers().get("content-type").map(|v| v.as_bytes()),
        Some(b"application/json".as_slice())
    );
    assert_eq!(
        body_of(response).await,
        ErrorBody {
            error: "Not Found".to_owned(),
            description: "Post with ID 42 not found".to_owned(),
        }
    );
}

#[actix_web::test]
async fn internal_errors_are_redacted() {
    let response = Error::internal("db password leaked")
        .with_details(json!({ "secret": "x" }))
        .error_response();
    let body = body_of(response).await;
    assert_eq!(body.error, "Internal Server Error");
    assert_eq!(body.description, INTERNAL_ERROR_DESCRIPTION);
}

#[actix_web::test]
async fn details_never_reach_the_body() {
    let response = Error::invalid_request("bad")
        .with_details(json!({ "violations": [] }))
        .error_response();
    let bytes = to_bytes(response.into_body()).await.expect("buffered body");
    let value: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(value, json!({ "error": "Bad Request", "description": "bad" }));
}

#[rstest]
fn trace_id_is_echoed_as_header() {
    let response = Error::forbidden("nope")
        .with_trace_id("00000000-0000-0000-0000-000000000000")
        .error_response();
    assert_eq!(
        response.headers().get(TRACE_ID_HEADER).map(|v| v.as_bytes()),
        Some(b"00000000-0000-0000-0000-000000000000".as_slice())
    );
}

#[rstest]
fn json_content_type_failures_are_415() {
    let req = TestRequest::default().to_http_request();
    let err = json_error_handler(JsonPayloadError::ContentType, &req);
    assert_eq!(
        err.as_response_error().status_code(),
        StatusCode::UNSUPPORTED_MEDIA_TYPE
    );
}

#[rstest]
fn malformed_json_is_400() {
    let req = TestRequest::default().to_http_request();
    let parse_error = serde_json::from_str::<serde_json::Value>("{").expect_err("malformed");
    let err = json_error_handler(JsonPayloadError::Deserialize(parse_error), &req);
    assert_eq!(err.as_response_error().status_code(), StatusCode::BAD_REQUEST);
}
