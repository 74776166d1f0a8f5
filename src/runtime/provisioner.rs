//! Model provisioning for the plant pipeline
//!
//! Guarantees a usable model artifact in the workspace, either through the
//! real Ollama runtime or a deterministic mock stand-in. Runtime health is
//! checked up front; each failure is fatal and carries its own remediation
//! guidance.

use crate::config::PlantConfig;
use crate::errors::{PlantError, Result};
use crate::progress::ProgressSink;
use crate::runtime::client::OllamaClient;
use crate::runtime::platform::RuntimePlatform;
use crate::workspace::Workspace;
use std::sync::Arc;

/// Payload written to `model.gguf` in mock mode
pub const MOCK_MODEL_PAYLOAD: &str =
    "LLAMAFARM MODEL PLACEHOLDER [mock] - real model export is out of scope\n";

/// Payload written to `model.gguf` after a real provision.
/// Differs from the mock payload only by label.
pub const READY_MODEL_PAYLOAD: &str =
    "LLAMAFARM MODEL PLACEHOLDER [ollama] - real model export is out of scope\n";

/// Outcome of a successful provision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// Mock placeholder written, no external calls made
    MockReady,
    /// Runtime verified and model present, placeholder written
    Ready,
}

/// Ensures a model artifact placeholder exists in the workspace
pub struct ModelProvisioner {
    config: PlantConfig,
    platform: Arc<dyn RuntimePlatform>,
    client: OllamaClient,
}

impl ModelProvisioner {
    pub fn new(config: PlantConfig, platform: Arc<dyn RuntimePlatform>, client: OllamaClient) -> Self {
        Self {
            config,
            platform,
            client,
        }
    }

    /// Drive the provisioning sequence for the given workspace
    ///
    /// Mock mode short-circuits every runtime interaction. Otherwise:
    /// installed check, running check, local presence check, pull if absent.
    /// Each failure aborts the pipeline with remediation guidance.
    pub async fn provision(
        &self,
        workspace: &Workspace,
        sink: &dyn ProgressSink,
    ) -> Result<ProvisionOutcome> {
        workspace.ensure().await?;

        if self.config.mock {
            tokio::fs::write(workspace.model_path(), MOCK_MODEL_PAYLOAD).await?;
            return Ok(ProvisionOutcome::MockReady);
        }

        if !self.platform.runtime_installed().await {
            return Err(PlantError::Environment(install_guidance()));
        }

        if !self.platform.runtime_running().await {
            return Err(PlantError::Environment(serve_guidance()));
        }

        let present = self
            .client
            .model_exists(&self.config.model)
            .await
            .map_err(|e| PlantError::ModelResolution(pull_guidance(&self.config.model, &e)))?;

        if !present {
            self.client
                .pull_model(
                    &self.config.model,
                    Some(Box::new(|progress| {
                        sink.transfer(&progress.status, progress.completed, progress.total);
                    })),
                )
                .await
                .map_err(|e| PlantError::ModelResolution(pull_guidance(&self.config.model, &e)))?;
        }

        tokio::fs::write(workspace.model_path(), READY_MODEL_PAYLOAD).await?;
        Ok(ProvisionOutcome::Ready)
    }
}

/// Remediation text when the runtime executable is missing
fn install_guidance() -> String {
    [
        "Ollama is not installed.",
        "",
        "Install it first:",
        "  Linux:   curl -fsSL https://ollama.com/install.sh | sh",
        "  macOS:   brew install ollama",
        "",
        "Or plant without a runtime using mock mode:",
        "  llamafarm plant <model> --mock",
    ]
    .join("\n")
}

/// Remediation text when the runtime service is not reachable
fn serve_guidance() -> String {
    [
        "Ollama is installed but its service is not running.",
        "",
        "Start it with:",
        "  ollama serve",
        "",
        "Or plant without a runtime using mock mode:",
        "  llamafarm plant <model> --mock",
    ]
    .join("\n")
}

/// Remediation text when a model pull or lookup fails
fn pull_guidance(model: &str, underlying: &str) -> String {
    format!(
        "Could not pull model '{model}': {underlying}\n\n\
         Things to check:\n\
         - Is '{model}' a valid model name? Browse https://ollama.com/library\n\
         - Known-good models: llama2, mistral, phi, codellama\n\
         - Is this machine online?\n\
         - Or skip the runtime entirely: llamafarm plant {model} --mock"
    )
}
