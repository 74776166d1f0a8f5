//! Host capability probing for the model runtime
//!
//! Checking for an installed executable and a reachable background service
//! sits behind a trait so tests can substitute deterministic probes without
//! invoking real processes or sockets.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tokio::process::Command;

/// Capability detection for the model runtime on this host
#[async_trait]
pub trait RuntimePlatform: Send + Sync {
    /// Whether the runtime executable exists on the host
    async fn runtime_installed(&self) -> bool;

    /// Whether the runtime's background service is reachable
    async fn runtime_running(&self) -> bool;
}

/// Probes the real host: `ollama` on PATH and its API answering
pub struct HostPlatform {
    client: Client,
    base_url: String,
}

impl HostPlatform {
    pub const DEFAULT_BASE_URL: &'static str = "http://127.0.0.1:11434";

    /// Create a probe against the given runtime API base URL
    pub fn new(base_url: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl RuntimePlatform for HostPlatform {
    async fn runtime_installed(&self) -> bool {
        match Command::new("ollama").arg("--version").output().await {
            Ok(output) => output.status.success(),
            Err(_) => false,
        }
    }

    async fn runtime_running(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
