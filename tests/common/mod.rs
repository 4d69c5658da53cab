use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use student_api::config::{AppConfig, Environment};
use student_api::state::AppState;
use student_api::MemoryStudentStore;

pub struct TestServer {
    pub base_url: String,
}

impl TestServer {
    /// Serve the real router on a free port, backed by a fresh memory store.
    /// The server task lives as long as the calling test's runtime.
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(AppState::new(MemoryStudentStore::new())).await
    }

    /// Same as `spawn`, but over a caller-built store.
    pub async fn spawn_with(state: AppState) -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let addr = SocketAddr::from(([127, 0, 0, 1], port));

        let mut config = AppConfig::for_environment(Environment::Development);
        config.api.enable_request_logging = false;
        let app = student_api::app(state, &config);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let server = Self {
            base_url: format!("http://{}", addr),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            if let Ok(resp) = client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub fn mock_student() -> serde_json::Value {
    serde_json::json!({
        "name": "Mock Student",
        "national_id": "12345678901",
        "registration_id": "123456789"
    })
}
