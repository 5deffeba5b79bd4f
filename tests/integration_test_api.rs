mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::TestApp;
use tower::ServiceExt;

#[tokio::test]
async fn test_root_redirects_to_landing_page() {
    let app = TestApp::new().await;

    let response = app.router.clone().oneshot(
        Request::builder().uri("/").body(Body::empty()).unwrap()
    ).await.unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/static/index.html");
}

#[tokio::test]
async fn test_landing_page_is_served() {
    let app = TestApp::new().await;

    let response = app.router.clone().oneshot(
        Request::builder().uri("/static/index.html").body(Body::empty()).unwrap()
    ).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("Mergington High School"));
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().await;
    let (status, body) = app.request("GET", "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn test_missing_email_is_bad_request() {
    let app = TestApp::new().await;

    let (status, _) = app.request("POST", "/activities/Chess%20Club/signup").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.request("DELETE", "/activities/Chess%20Club/unregister").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(app.participants("Chess Club").await.len(), 2);
}

#[tokio::test]
async fn test_wrong_method_is_rejected() {
    let app = TestApp::new().await;

    let (status, _) = app.request("GET", "/activities/Chess%20Club/signup?email=a%40mergington.edu").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (status, _) = app.request("POST", "/activities/Chess%20Club/unregister?email=a%40mergington.edu").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_listing_shape() {
    let app = TestApp::new().await;
    let listing = app.activities().await;

    let chess = listing["Chess Club"].as_object().unwrap();
    let mut keys: Vec<&str> = chess.keys().map(|k| k.as_str()).collect();
    keys.sort();
    assert_eq!(keys, vec!["description", "max_participants", "participants", "schedule"]);
    assert_eq!(chess["max_participants"], 12);
}
