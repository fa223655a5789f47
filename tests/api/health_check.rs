//! tests/api/health_check.rs

use crate::helpers::{setup, setup_with_registry};

#[tokio::test]
async fn health_check_works() {
    let test = setup().await;

    let response = test.get("/api/health").await;

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.expect("Failed to parse body");
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn health_check_does_not_touch_the_registry() {
    let directory = tempfile::tempdir().unwrap();
    let unreachable = directory.path().join("missing").join("subscribers.json");
    let test = setup_with_registry(directory, unreachable).await;

    let response = test.get("/api/health").await;

    assert_eq!(200, response.status().as_u16());
    assert!(!test.registry_path.exists());
}
