use admin_db::MemoryStore;
use admin_server::{app, AppState};
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use std::sync::Arc;
use tower::ServiceExt;

fn test_app() -> axum::Router {
    // An empty in-memory store: health must not depend on its contents.
    app(AppState::new(Arc::new(MemoryStore::new())))
}

#[tokio::test]
async fn health_check_returns_ok() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"Ok");
}

#[tokio::test]
async fn health_check_ignores_headers_and_query() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/health?source=lb")
                .header("accept", "application/json")
                .header("user-agent", "curl/8.5.0")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"Ok");
}

#[tokio::test]
async fn health_check_answers_while_store_is_slow() {
    let store = MemoryStore::new().with_latency(std::time::Duration::from_secs(60));
    let app = app(AppState::new(Arc::new(store)));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn users_listing_is_not_routed() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/users")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
