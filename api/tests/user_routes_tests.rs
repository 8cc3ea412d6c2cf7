//! End-to-end tests for the assembled application router.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use api::state::AppState;

fn test_app() -> axum::Router {
    api::app(AppState::new())
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_create_user_trims_name() {
    let response = test_app()
        .oneshot(post_json(
            "/api/v1/users/",
            r#"{"name": "  Ada Lovelace ", "email": "ada@example.com"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(response.headers().contains_key(header::ETAG));
    let user = body_json(response).await;
    assert_eq!(user["name"], "Ada Lovelace");
    assert_eq!(user["email"], "ada@example.com");
    assert!(user["id"].as_str().is_some());
}

#[tokio::test]
async fn test_create_user_without_trailing_slash() {
    let response = test_app()
        .oneshot(post_json(
            "/api/v1/users",
            r#"{"name": "A", "email": "a@b.com"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_create_user_accepts_form_body() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/users/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("name=+Grace+&email=grace%40example.com"))
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let user = body_json(response).await;
    assert_eq!(user["name"], "Grace");
}

#[tokio::test]
async fn test_invalid_email_is_one_body_error() {
    let response = test_app()
        .oneshot(post_json(
            "/api/v1/users/",
            r#"{"name": "Ada", "email": "not-an-email"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let errors = body_json(response).await;
    let errors = errors.as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["type"], "Body");
    assert_eq!(errors[0]["errors"]["issues"][0]["path"], "email");
}

#[tokio::test]
async fn test_missing_email_is_one_body_error() {
    let response = test_app()
        .oneshot(post_json("/api/v1/users/", r#"{"name": "Ada"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let errors = body_json(response).await;
    let errors = errors.as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["type"], "Body");
    let issue = &errors[0]["errors"]["issues"][0];
    assert_eq!(issue["code"], "invalid_type");
    assert!(issue["message"].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn test_empty_body_is_rejected() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/users/")
        .body(Body::empty())
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let errors = body_json(response).await;
    assert_eq!(errors[0]["type"], "Body");
}

#[tokio::test]
async fn test_malformed_json_is_invalid_request() {
    let response = test_app()
        .oneshot(post_json("/api/v1/users/", r#"{"name": "#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().contains_key("x-correlation-id"));
    let error = body_json(response).await;
    assert_eq!(error["error"], "INVALID_REQUEST");
    assert_eq!(error["code"], 400);
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let padding = "x".repeat(api::validation::context::BODY_LIMIT_BYTES);
    let body = format!(r#"{{"name": "{padding}", "email": "a@b.com"}}"#);
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/users/")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let error = body_json(response).await;
    assert_eq!(error["error"], "PAYLOAD_TOO_LARGE");
}

#[tokio::test]
async fn test_oversized_streamed_body_is_rejected() {
    let padding = "x".repeat(api::validation::context::BODY_LIMIT_BYTES);
    let chunks = vec![
        Ok::<_, std::io::Error>(r#"{"name": ""#.to_string()),
        Ok(padding),
        Ok(r#"", "email": "a@b.com"}"#.to_string()),
    ];
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/users/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from_stream(futures::stream::iter(chunks)))
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let error = body_json(response).await;
    assert_eq!(error["error"], "PAYLOAD_TOO_LARGE");
}

#[tokio::test]
async fn test_top_level_json_primitive_is_invalid_request() {
    let response = test_app()
        .oneshot(post_json("/api/v1/users/", r#""Ada""#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = body_json(response).await;
    assert_eq!(error["error"], "INVALID_REQUEST");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let request = Request::builder()
        .uri("/api/v2/users")
        .body(Body::empty())
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()["x-frame-options"], "SAMEORIGIN");
    let error = body_json(response).await;
    assert_eq!(error["error"], "NOT_FOUND");
    assert_eq!(error["message"], "Not found");
}

#[tokio::test]
async fn test_serves_public_assets() {
    let request = Request::builder()
        .uri("/public/robots.txt")
        .body(Body::empty())
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("User-agent"));
}

#[tokio::test]
async fn test_public_assets_are_read_only() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/public/robots.txt")
        .body(Body::empty())
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
