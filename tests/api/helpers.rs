//! tests/api/helpers.rs

use once_cell::sync::Lazy;
use std::path::PathBuf;
use tempfile::TempDir;
use waitlist::configuration::get_configuration;
use waitlist::startup::build;
use waitlist::telemetry::{get_subscriber, init_subscriber};

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    // Set TEST_LOG=true to see logs during tests
    // Use bunyan to format the logs nicely:
    // $ TEST_LOG=true cargo test| bunyan
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    };
});

pub struct Test {
    pub address: String,
    pub registry_path: PathBuf,
    pub client: reqwest::Client,
    // Deleted with the test.
    _registry_directory: TempDir,
}

impl Test {
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(&format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_subscribe(&self, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(&format!("{}/api/subscribe", self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn subscribe(&self, email: &str) -> reqwest::Response {
        self.post_subscribe(serde_json::json!({ "email": email }))
            .await
    }

    pub async fn count(&self) -> u64 {
        let response = self.get("/api/subscribers/count").await;
        assert_eq!(200, response.status().as_u16());

        let body: serde_json::Value = response.json().await.expect("Failed to parse count");
        body["count"].as_u64().expect("Count is not a number")
    }

    /// The registry document as it is on disk right now.
    pub fn persisted_document(&self) -> serde_json::Value {
        let bytes = std::fs::read(&self.registry_path).expect("Failed to read registry document");
        serde_json::from_slice(&bytes).expect("Registry document is not valid JSON")
    }

    pub fn persisted_emails(&self) -> Vec<String> {
        self.persisted_document()["subscribers"]
            .as_array()
            .expect("Missing subscribers array")
            .iter()
            .map(|s| s["email"].as_str().expect("Missing email").to_string())
            .collect()
    }
}

pub async fn setup() -> Test {
    let directory = tempfile::tempdir().expect("Failed to create registry directory");
    let registry_path = directory.path().join("subscribers.json");
    setup_with_registry(directory, registry_path).await
}

/// Launches the app against a registry path that may not be writable.
pub async fn setup_with_registry(directory: TempDir, registry_path: PathBuf) -> Test {
    Lazy::force(&TRACING);

    let mut config = get_configuration().expect("Failed to read configuration.");
    config.application.host = "127.0.0.1".into();
    config.application.port = 0;
    config.registry.path = registry_path.clone();

    // Launch the server
    let app = build(config.clone()).expect("Failed to build server.");
    let address = format!("http://127.0.0.1:{}", app.port());
    config.application.port = app.port();

    tracing::info!("Test running with the following Settings:\n{:#?}", config);

    // Launch the server as a background task
    let _ = tokio::spawn(app.run());

    Test {
        address,
        registry_path,
        client: reqwest::Client::new(),
        _registry_directory: directory,
    }
}
