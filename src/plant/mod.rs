//! Plant pipeline orchestration
//!
//! Drives the stages strictly in order: prepare workspace, provision model,
//! write agent config, write vector/RAG config if enabled, render the UI,
//! bundle manifest and scripts, package, serve. Each stage reports progress
//! before and after execution; the first fatal error short-circuits every
//! later stage and is returned up to the entry point, which owns the exit
//! status.

use crate::config::PlantConfig;
use crate::errors::Result;
use crate::package::ArtifactPackager;
use crate::progress::{PlantStage, ProgressSink, StageStatus};
use crate::runtime::{ModelProvisioner, OllamaClient, RuntimePlatform};
use crate::server::DownloadSession;
use crate::workspace::{Workspace, WorkspaceBuilder};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything a successful plant produced
#[derive(Debug)]
pub struct PlantReport {
    pub workspace: Workspace,
    pub archive: PathBuf,
    pub agent_port: u16,
    pub download: DownloadSession,
}

/// Sequences the pipeline stages for one invocation
pub struct PlantOrchestrator {
    config: PlantConfig,
    platform: Arc<dyn RuntimePlatform>,
    client: OllamaClient,
    sink: Arc<dyn ProgressSink>,
}

impl PlantOrchestrator {
    pub fn new(
        config: PlantConfig,
        platform: Arc<dyn RuntimePlatform>,
        client: OllamaClient,
        sink: Arc<dyn ProgressSink>,
    ) -> Self {
        Self {
            config,
            platform,
            client,
            sink,
        }
    }

    /// Run the full pipeline rooted at the given current directory
    pub async fn run(self, current_dir: &Path) -> Result<PlantReport> {
        let workspace = Workspace::for_model(current_dir, &self.config.model);

        self.run_stage(PlantStage::PrepareWorkspace, workspace.ensure())
            .await?;

        let provisioner = ModelProvisioner::new(
            self.config.clone(),
            Arc::clone(&self.platform),
            self.client.clone(),
        );
        self.run_stage(
            PlantStage::ProvisionModel,
            provisioner.provision(&workspace, self.sink.as_ref()),
        )
        .await?;

        let builder = self
            .run_stage(PlantStage::AgentConfig, async {
                let builder = WorkspaceBuilder::new(self.config.clone(), workspace.clone())?;
                builder.write_agent_config().await?;
                Ok(builder)
            })
            .await?;

        if self.config.vector_enabled() {
            self.run_stage(PlantStage::VectorDb, builder.write_vector_config())
                .await?;
        }

        if self.config.rag_enabled() {
            self.run_stage(PlantStage::Rag, builder.write_rag_config())
                .await?;
        }

        self.run_stage(PlantStage::Ui, builder.write_ui()).await?;

        self.run_stage(PlantStage::Bundle, builder.write_bundle())
            .await?;

        let archive = self
            .run_stage(
                PlantStage::Package,
                ArtifactPackager::package(&self.config, &workspace, current_dir),
            )
            .await?;

        // The listener is live before any success message goes out.
        let download = self
            .run_stage(PlantStage::Serve, DownloadSession::start(archive.clone()))
            .await?;

        self.sink.message(&format!(
            "\n🌾 Planted {}!\n📦 Archive: {}\n⬇️  Download (closes in 5 minutes): {}",
            self.config.model,
            self.config.artifact_name(),
            download.url(env!("CARGO_PKG_VERSION"), &self.config.artifact_name()),
        ));

        Ok(PlantReport {
            workspace,
            archive,
            agent_port: builder.port(),
            download,
        })
    }

    async fn run_stage<T, F>(&self, stage: PlantStage, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.sink.stage(stage, StageStatus::Started);
        match fut.await {
            Ok(value) => {
                self.sink.stage(stage, StageStatus::Completed);
                Ok(value)
            }
            Err(e) => {
                self.sink.stage(stage, StageStatus::Failed(e.to_string()));
                Err(e)
            }
        }
    }
}
