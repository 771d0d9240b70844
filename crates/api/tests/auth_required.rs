//! Requests that are decided before any database access: missing or bad
//! credentials and role checks. Run against a pool that never connects.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, get_auth, lazy_pool, post_auth, token_for};

#[tokio::test]
async fn anonymous_gate_is_unauthorized_state_not_error() {
    let app = build_test_app(lazy_pool());

    let response = get(&app, "/api/v1/courses/1/gate").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["state"], "UNAUTHORIZED");
    assert!(json["data"]["message"].is_string());
}

#[tokio::test]
async fn invalid_token_on_gate_is_unauthorized_state() {
    let app = build_test_app(lazy_pool());

    let response = get_auth(&app, "/api/v1/courses/1/gate", "not-a-jwt").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["state"], "UNAUTHORIZED");
}

#[tokio::test]
async fn anonymous_lesson_fetch_requires_authentication() {
    let app = build_test_app(lazy_pool());

    let response = get(&app, "/api/v1/courses/1/lessons/2").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "AUTHENTICATION_REQUIRED");
}

#[tokio::test]
async fn anonymous_list_and_progress_require_authentication() {
    let app = build_test_app(lazy_pool());

    for uri in ["/api/v1/courses/1/lessons", "/api/v1/courses/1/progress"] {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn anonymous_complete_requires_authentication() {
    let app = build_test_app(lazy_pool());

    let response =
        common::post_json(&app, "/api/v1/lessons/2/complete", serde_json::json!({})).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_token_is_rejected() {
    let app = build_test_app(lazy_pool());

    let response = get_auth(&app, "/api/v1/courses/1/lessons", "abc.def.ghi").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn learner_cannot_use_admin_endpoints() {
    let app = build_test_app(lazy_pool());
    let token = token_for(7, "learner");

    let response = post_auth(&app, "/api/v1/admin/orders/1/mark-paid", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

#[tokio::test]
async fn instructor_is_not_an_admin() {
    let app = build_test_app(lazy_pool());
    let token = token_for(8, "instructor");

    let response = post_auth(&app, "/api/v1/admin/enrollments/1/cancel", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = build_test_app(lazy_pool());

    let response = get(&app, "/api/v1/courses/1/gate").await;

    assert!(response.headers().contains_key("x-request-id"));
}
