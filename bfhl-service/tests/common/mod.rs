#![allow(dead_code)]

use bfhl_service::config::{BfhlConfig, GeminiSettings, ObservabilityConfig};
use bfhl_service::services::providers::mock::MockTextProvider;
use bfhl_service::services::TextProvider;
use bfhl_service::startup::Application;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;

pub const TEST_EMAIL: &str = "tester@example.com";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
}

pub fn test_config() -> BfhlConfig {
    BfhlConfig {
        // Use random port for testing (port 0)
        common: CoreConfig { port: 0 },
        official_email: TEST_EMAIL.to_string(),
        gemini: GeminiSettings {
            api_key: None,
            model: "gemini-2.5-flash".to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
        },
        observability: ObservabilityConfig {
            log_level: "debug".to_string(),
            otlp_endpoint: None,
        },
    }
}

impl TestApp {
    /// Spawn with the mock provider answering `ai_reply`.
    pub async fn spawn(ai_reply: &str) -> Self {
        Self::spawn_with_provider(Arc::new(MockTextProvider::new(ai_reply))).await
    }

    pub async fn spawn_with_provider(provider: Arc<dyn TextProvider>) -> Self {
        let app = Application::build_with_provider(test_config(), provider)
            .await
            .expect("Failed to build test application");
        Self::start(app).await
    }

    pub async fn spawn_with_config(config: BfhlConfig) -> Self {
        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        Self::start(app).await
    }

    async fn start(app: Application) -> Self {
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
        }
    }

    pub async fn post_bfhl(&self, body: serde_json::Value) -> (u16, serde_json::Value) {
        let response = self
            .client
            .post(format!("{}/bfhl", self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to send request");

        let status = response.status().as_u16();
        let json = response.json().await.expect("Failed to parse JSON");
        (status, json)
    }
}
