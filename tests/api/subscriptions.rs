//! tests/api/subscriptions.rs

use crate::helpers::{setup, setup_with_registry};

#[tokio::test]
async fn subscribe_returns_a_200_for_a_valid_email() {
    // Arrange
    let test = setup().await;

    // Act
    let response = test.subscribe("ursula_le_guin@gmail.com").await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(
        body["message"],
        "Thanks for subscribing! We'll notify you when we launch."
    );
}

#[tokio::test]
async fn subscribe_persists_the_new_subscriber() {
    // Arrange
    let test = setup().await;

    // Act
    test.subscribe("  Ursula_Le_Guin@Gmail.com ").await;

    // Assert
    let document = test.persisted_document();
    let saved = &document["subscribers"][0];
    assert_eq!(saved["email"], "ursula_le_guin@gmail.com");
    assert!(saved["subscribedAt"].is_string());
    assert_eq!(saved["ip"], "127.0.0.1");
}

#[tokio::test]
async fn subscribing_twice_is_rejected_with_a_400() {
    // Arrange
    let test = setup().await;
    let first = test.subscribe("A@B.com ").await;
    assert_eq!(200, first.status().as_u16());

    // Act
    let second = test.subscribe("a@b.com").await;

    // Assert
    assert_eq!(400, second.status().as_u16());
    let body: serde_json::Value = second.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "This email is already subscribed!");
    assert_eq!(test.persisted_emails(), vec!["a@b.com"]);
}

#[tokio::test]
async fn subscribe_returns_a_400_when_email_is_invalid() {
    // Arrange
    let test = setup().await;
    let test_cases = vec![
        (serde_json::json!({ "email": "" }), "empty email"),
        (serde_json::json!({ "email": "   " }), "whitespace only"),
        (serde_json::json!({ "email": "notanemail" }), "missing @"),
        (serde_json::json!({ "email": "@domain.com" }), "empty local part"),
        (serde_json::json!({ "email": "ursula@" }), "empty domain"),
        (serde_json::json!({}), "missing the email"),
    ];

    for (body, error_message) in test_cases {
        // Act
        let response = test.post_subscribe(body).await;

        // Assert
        assert_eq!(
            400,
            response.status().as_u16(),
            // Additional customised error message on test failure
            "The API did not fail with 400 Bad Request when the payload was {}.",
            error_message
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Please provide a valid email address");
    }

    // Assert
    assert_eq!(test.count().await, 0);
}

#[tokio::test]
async fn subscribe_returns_a_400_for_a_malformed_body() {
    // Arrange
    let test = setup().await;

    // Act
    let response = test
        .client
        .post(&format!("{}/api/subscribe", test.address))
        .header("Content-Type", "application/json")
        .body("{\"email\": ")
        .send()
        .await
        .expect("Failed to execute request.");

    // Assert
    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn subscribe_returns_a_500_when_the_registry_is_unavailable() {
    // Arrange
    let directory = tempfile::tempdir().unwrap();
    let unreachable = directory.path().join("missing").join("subscribers.json");
    let test = setup_with_registry(directory, unreachable).await;

    // Act
    let response = test.subscribe("ursula_le_guin@gmail.com").await;

    // Assert
    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Something went wrong. Please try again.");
}

#[tokio::test]
async fn concurrent_subscriptions_are_all_persisted_once() {
    // Arrange
    let test = setup().await;
    let emails: Vec<String> = (0..20).map(|i| format!("user{}@example.com", i)).collect();

    // Act
    // Every address is submitted twice, with different casing, at the same time.
    let mut handles = Vec::new();
    for email in &emails {
        for variant in [email.clone(), email.to_uppercase()] {
            let client = test.client.clone();
            let url = format!("{}/api/subscribe", test.address);
            handles.push(tokio::spawn(async move {
                client
                    .post(&url)
                    .json(&serde_json::json!({ "email": variant }))
                    .send()
                    .await
                    .expect("Failed to execute request.")
                    .status()
                    .as_u16()
            }));
        }
    }

    let mut statuses = Vec::new();
    for handle in handles {
        statuses.push(handle.await.unwrap());
    }

    // Assert
    assert_eq!(statuses.iter().filter(|s| **s == 200).count(), emails.len());
    assert_eq!(statuses.iter().filter(|s| **s == 400).count(), emails.len());

    let mut persisted = test.persisted_emails();
    persisted.sort();
    let mut expected = emails.clone();
    expected.sort();
    assert_eq!(persisted, expected);
    assert_eq!(test.count().await, emails.len() as u64);
}
