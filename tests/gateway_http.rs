//! HTTP gateway integration tests.
//!
//! Drives the router directly with signed and unsigned requests and
//! checks the status/body contract the transport relies on.

use std::sync::Arc;

use axum::body::Body;
use axum::Router;
use http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use feedback_hub::adapters::http::{
    gateway_router, sign_payload, AppState, SignatureVerifier, SIGNATURE_HEADER,
};
use feedback_hub::adapters::memory::{
    InMemoryCatalogStore, InMemoryReviewStore, InMemoryUserRegistry,
};
use feedback_hub::application::{DialogEngine, Dispatcher};
use feedback_hub::domain::catalog::Category;
use feedback_hub::domain::foundation::UserId;
use feedback_hub::ports::CatalogStore;

const SECRET: &str = "gateway-test-secret";

async fn test_router() -> Router {
    let catalog = Arc::new(InMemoryCatalogStore::new());
    catalog
        .upsert_item("iPhone 15", Category::Smartphones)
        .await
        .unwrap();

    let users = Arc::new(InMemoryUserRegistry::new());
    let reviews = Arc::new(InMemoryReviewStore::new(catalog.clone(), users.clone()));
    let engine = DialogEngine::new(catalog, reviews.clone(), 10);
    let dispatcher = Arc::new(Dispatcher::new(
        engine,
        users,
        reviews,
        Vec::<UserId>::new(),
    ));

    gateway_router(AppState::new(dispatcher, SignatureVerifier::new(SECRET)))
}

fn signed_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/events")
        .header("content-type", "application/json")
        .header(SIGNATURE_HEADER, sign_payload(SECRET, body.as_bytes()))
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn signed_command_event_returns_a_prompt() {
    let router = test_router().await;
    let body = json!({
        "user": {"id": 1, "username": "alice"},
        "kind": "command",
        "payload": "/start"
    })
    .to_string();

    let response = router.oneshot(signed_request(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["text"].as_str().unwrap().contains("Welcome"));
    assert!(json["menu"]["buttons"].as_array().unwrap().len() >= 3);
}

#[tokio::test]
async fn callback_event_drives_the_dialog() {
    let router = test_router().await;

    for (payload, expected) in [
        ("/rate", "Pick a category"),
        ("category:smartphones", "Pick an item"),
        ("item:1:rate", "Pick a score"),
        ("score:1:4", "Thanks for scoring"),
    ] {
        let kind = if payload.starts_with('/') {
            "command"
        } else {
            "callback"
        };
        let body = json!({
            "user": {"id": 7},
            "kind": kind,
            "payload": payload
        })
        .to_string();

        let response = router
            .clone()
            .oneshot(signed_request(&body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert!(
            json["text"].as_str().unwrap().contains(expected),
            "expected '{}' in response to '{}'",
            expected,
            payload
        );
    }
}

#[tokio::test]
async fn missing_signature_is_rejected() {
    let router = test_router().await;
    let body = json!({"user": {"id": 1}, "kind": "text", "payload": "hi"}).to_string();

    let request = Request::builder()
        .method("POST")
        .uri("/v1/events")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_signature_is_rejected() {
    let router = test_router().await;
    let body = json!({"user": {"id": 1}, "kind": "text", "payload": "hi"}).to_string();

    let request = Request::builder()
        .method("POST")
        .uri("/v1/events")
        .header("content-type", "application/json")
        .header(SIGNATURE_HEADER, sign_payload("other-secret", body.as_bytes()))
        .body(Body::from(body))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_payload_is_a_bad_request() {
    let router = test_router().await;

    // Well-formed JSON, but the callback token does not parse.
    let body = json!({
        "user": {"id": 1},
        "kind": "callback",
        "payload": "item:abc:rate"
    })
    .to_string();

    let response = router
        .clone()
        .oneshot(signed_request(&body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Not JSON at all.
    let response = router.oneshot(signed_request("not json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn healthz_answers_ok() {
    let router = test_router().await;

    let request = Request::builder()
        .method("GET")
        .uri("/healthz")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
