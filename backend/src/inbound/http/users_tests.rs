//! Tests for account handlers.

use super::*;
use crate::inbound::http::test_utils::{PASSWORD, api_app, login_cookie, seeded_state};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

async fn body_json(response: actix_web::dev::ServiceResponse) -> Value {
    let body = actix_test::read_body(response).await;
    serde_json::from_slice(&body).expect("JSON body")
}

#[actix_web::test]
async fn register_creates_regular_account() {
    let app = actix_test::init_service(api_app(seeded_state().await)).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({"username": "carol", "password": "long-enough"}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let value = body_json(response).await;
    assert_eq!(value.get("username").and_then(Value::as_str), Some("carol"));
    assert_eq!(value.get("isAdmin").and_then(Value::as_bool), Some(false));
    assert!(value.get("password").is_none());
}

#[actix_web::test]
async fn register_rejects_taken_username() {
    let app = actix_test::init_service(api_app(seeded_state().await)).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({"username": "ada", "password": "long-enough"}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let value = body_json(response).await;
    assert_eq!(value.get("code").and_then(Value::as_str), Some("conflict"));
}

#[rstest]
#[case("   ", "long-enough", "username", "empty_username")]
#[case("bad name", "long-enough", "username", "username_invalid_characters")]
#[case("carol", "short", "password", "password_too_short")]
#[actix_web::test]
async fn register_reports_invalid_fields(
    #[case] username: &str,
    #[case] password: &str,
    #[case] field: &str,
    #[case] code: &str,
) {
    let app = actix_test::init_service(api_app(seeded_state().await)).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({"username": username, "password": password}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let value = body_json(response).await;
    assert_eq!(
        value.get("code").and_then(Value::as_str),
        Some("invalid_request")
    );
    assert_eq!(
        value.pointer("/details/field").and_then(Value::as_str),
        Some(field)
    );
    assert_eq!(
        value.pointer("/details/code").and_then(Value::as_str),
        Some(code)
    );
}

#[actix_web::test]
async fn login_rejects_wrong_credentials_with_unauthorised_status() {
    let app = actix_test::init_service(api_app(seeded_state().await)).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(&LoginRequest {
                username: "ada".into(),
                password: "wrong-password".into(),
            })
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let value = body_json(response).await;
    assert_eq!(
        value.get("message").and_then(Value::as_str),
        Some("invalid credentials")
    );
}

#[actix_web::test]
async fn malformed_login_body_is_invalid_request() {
    let app = actix_test::init_service(api_app(seeded_state().await)).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"username\":")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let value = body_json(response).await;
    assert_eq!(
        value.pointer("/details/code").and_then(Value::as_str),
        Some("invalid_json")
    );
}

#[actix_web::test]
async fn current_user_follows_the_session() {
    let app = actix_test::init_service(api_app(seeded_state().await)).await;
    let cookie = login_cookie(&app, "root").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/me")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let value = body_json(response).await;
    assert_eq!(value.get("username").and_then(Value::as_str), Some("root"));
    assert_eq!(value.get("isAdmin").and_then(Value::as_bool), Some(true));
}

#[actix_web::test]
async fn current_user_requires_login() {
    let app = actix_test::init_service(api_app(seeded_state().await)).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/me")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn registered_users_can_log_in() {
    let app = actix_test::init_service(api_app(seeded_state().await)).await;
    let created = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({"username": "dave", "password": PASSWORD}))
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let cookie = login_cookie(&app, "dave").await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/me")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[actix_web::test]
async fn logout_expires_the_session_cookie() {
    let app = actix_test::init_service(api_app(seeded_state().await)).await;
    let cookie = login_cookie(&app, "ada").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let removal = response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("removal cookie");
    assert_eq!(removal.value(), "");
}
