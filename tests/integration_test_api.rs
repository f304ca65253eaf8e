mod common;

use axum::http::StatusCode;
use common::TestApp;
use tutoring_scheduler::{domain::models::tenant::Tenant, error::AppError};

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().await;

    let (status, body) = app.send_json("GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::new().await;
    let tid = app.create_tenant("UTC").await;

    let response = app.send("GET", &format!("/api/v1/{}/nothing-here", tid), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_tenant_slug_conflicts() {
    let app = TestApp::new().await;

    let first = Tenant::new("North".into(), "north".into());
    app.state.tenant_repo.create(&first).await.unwrap();

    let second = Tenant::new("North Again".into(), "north".into());
    let result = app.state.tenant_repo.create(&second).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}
