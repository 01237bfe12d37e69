//! HTTP client for a running label server

use std::time::Duration;

use tracing::debug;
use zlp_server::api::health::HealthResponse;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Talks to the server on the loopback interface
#[derive(Debug, Clone)]
pub struct ServerClient {
    http: reqwest::Client,
    base_url: String,
}

impl ServerClient {
    pub fn new(port: u16) -> Self {
        Self::with_base_url(format!("http://127.0.0.1:{}", port))
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Address of the entry form
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `Some` when the server answers its health check
    pub async fn health(&self) -> Option<HealthResponse> {
        let url = format!("{}/health", self.base_url);
        match self.http.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => resp.json().await.ok(),
            Ok(resp) => {
                debug!(status = %resp.status(), "Health check rejected");
                None
            }
            Err(e) => {
                debug!(error = %e, "Health check failed");
                None
            }
        }
    }

    /// Ask the server to shut down
    ///
    /// Returns the server's reply, or `None` when nothing answered. A
    /// connection error or timeout means there is no server to stop.
    pub async fn stop(&self) -> Option<String> {
        let url = format!("{}/stop", self.base_url);
        let resp = match self.http.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                debug!(error = %e, "Stop request failed, treating server as stopped");
                return None;
            }
        };
        let body: serde_json::Value = resp.json().await.ok()?;
        Some(
            body.get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("Server is shutting down...")
                .to_string(),
        )
    }

    /// Poll `/health` until it answers or `timeout` passes
    pub async fn wait_until_up(&self, timeout: Duration) -> bool {
        self.wait_for(timeout, true).await
    }

    /// Poll `/health` until it stops answering or `timeout` passes
    pub async fn wait_until_down(&self, timeout: Duration) -> bool {
        self.wait_for(timeout, false).await
    }

    async fn wait_for(&self, timeout: Duration, up: bool) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.health().await.is_some() == up {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}
