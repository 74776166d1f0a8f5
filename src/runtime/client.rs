//! Ollama API client for model operations
//!
//! Low-level HTTP client for the runtime endpoints the plant pipeline needs:
//! listing installed models and pulling missing ones. Errors come back as
//! plain messages; the provisioner decides their severity.

use futures_util::StreamExt;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Model entry from the runtime's tags endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub size: u64,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    models: Vec<ModelInfo>,
}

/// Progress line from the streaming pull endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct PullProgress {
    pub status: String,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub completed: u64,
}

/// HTTP client for the Ollama API
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
}

impl OllamaClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - Runtime API base URL (default: http://127.0.0.1:11434)
    pub fn new(base_url: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(300)) // pulls can take minutes
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.unwrap_or_else(|| "http://127.0.0.1:11434".to_string()),
        }
    }

    /// List all locally installed models
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, String> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| format!("Failed to connect to Ollama: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("Ollama API error: {}", response.status()));
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))?;

        Ok(tags.models)
    }

    /// Check whether a model is already present locally
    pub async fn model_exists(&self, name: &str) -> Result<bool, String> {
        let models = self.list_models().await?;
        Ok(models.iter().any(|m| m.name == name || m.name == format!("{}:latest", name)))
    }

    /// Pull (download) a model, reporting streamed progress lines
    ///
    /// # Arguments
    /// * `name` - Model name to pull
    /// * `progress_callback` - Optional callback for progress updates
    pub async fn pull_model(
        &self,
        name: &str,
        mut progress_callback: Option<Box<dyn FnMut(&PullProgress) + Send + '_>>,
    ) -> Result<(), String> {
        let url = format!("{}/api/pull", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&json!({ "name": name }))
            .send()
            .await
            .map_err(|e| format!("Failed to connect to Ollama: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("Ollama API error: {}", response.status()));
        }

        // The pull endpoint streams newline-delimited JSON progress objects.
        let mut stream = response.bytes_stream();
        let mut buffer = String::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| format!("Pull stream interrupted: {}", e))?;
            buffer.push_str(&String::from_utf8_lossy(&chunk));

            while let Some(newline) = buffer.find('\n') {
                let line: String = buffer.drain(..=newline).collect();
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                // The runtime reports pull failures as an error line, not an
                // HTTP status.
                if let Ok(value) = serde_json::from_str::<serde_json::Value>(line) {
                    if let Some(err) = value.get("error").and_then(|e| e.as_str()) {
                        return Err(err.to_string());
                    }
                }

                let progress: PullProgress = match serde_json::from_str(line) {
                    Ok(p) => p,
                    Err(_) => continue,
                };

                if let Some(ref mut callback) = progress_callback {
                    callback(&progress);
                }

                if progress.status == "success" {
                    return Ok(());
                }
            }
        }

        Ok(())
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = OllamaClient::new(None);
        assert_eq!(client.base_url, "http://127.0.0.1:11434");
    }

    #[test]
    fn test_client_custom_url() {
        let client = OllamaClient::new(Some("http://localhost:8080".to_string()));
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_pull_progress_parse() {
        let line = r#"{"status":"downloading","total":4096,"completed":1024}"#;
        let progress: PullProgress = serde_json::from_str(line).unwrap();
        assert_eq!(progress.status, "downloading");
        assert_eq!(progress.total, 4096);
        assert_eq!(progress.completed, 1024);
    }

    #[test]
    fn test_pull_progress_defaults() {
        let line = r#"{"status":"pulling manifest"}"#;
        let progress: PullProgress = serde_json::from_str(line).unwrap();
        assert_eq!(progress.total, 0);
        assert_eq!(progress.completed, 0);
    }

    #[tokio::test]
    #[ignore] // Requires Ollama running
    async fn test_list_models_integration() {
        let client = OllamaClient::new(None);
        assert!(client.list_models().await.is_ok());
    }
}
