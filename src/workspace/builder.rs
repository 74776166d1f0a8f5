//! Workspace population
//!
//! Given a provisioned model and the resolved config, writes every derived
//! file: agent config, optional vector/RAG configs, the chat UI, the
//! manifest, and the launch scripts. Any write failure propagates as an I/O
//! error and aborts the pipeline; a retried invocation overwrites partial
//! state.

use crate::config::PlantConfig;
use crate::errors::Result;
use crate::workspace::{
    manifest::Manifest, ports, templates, Workspace, AGENT_CONFIG_FILE, AGENT_SERVER_FILE,
    BUILD_SCRIPT, CHROMA_DIR, DOCKERFILE, MANIFEST_FILE, RAG_CONFIG_FILE, START_SCRIPT, UI_FILE,
    VECTOR_CONFIG_FILE,
};
use serde_json::json;
use std::path::Path;

/// Writes all derived configuration, UI, manifest, and script files
pub struct WorkspaceBuilder {
    config: PlantConfig,
    workspace: Workspace,
    port: u16,
}

impl WorkspaceBuilder {
    /// Create a builder, resolving the agent port
    ///
    /// An explicit config port is used as-is; otherwise a free ephemeral
    /// port is probed.
    pub fn new(config: PlantConfig, workspace: Workspace) -> Result<Self> {
        let port = match config.port {
            Some(p) => p,
            None => ports::free_port()?,
        };

        Ok(Self {
            config,
            workspace,
            port,
        })
    }

    /// The resolved agent port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Write `agent.config.json`
    ///
    /// Framework, memory, and tool defaults plus the system prompt are fixed
    /// at this layer and not user-overridable.
    pub async fn write_agent_config(&self) -> Result<()> {
        let doc = json!({
            "agent": self.config.agent_name,
            "model": self.config.model,
            "framework": "llamafarm-agent",
            "memory": {
                "type": "conversation",
                "maxTurns": 20,
            },
            "tools": ["search", "calculator"],
            "systemPrompt": format!(
                "You are {}, a helpful assistant running entirely on local hardware.",
                self.config.agent_name
            ),
        });

        self.write_json(AGENT_CONFIG_FILE, &doc).await?;
        self.write(AGENT_SERVER_FILE, &templates::agent_server(
            &self.config.model,
            &self.config.agent_name,
            self.port,
        ))
        .await
    }

    /// Write `vector.config.json` and ensure the `chroma_db` directory
    pub async fn write_vector_config(&self) -> Result<()> {
        let doc = json!({
            "provider": "chroma",
            "path": format!("./{}", CHROMA_DIR),
            "collection": self.config.model,
            "dimensions": 384,
        });

        self.write_json(VECTOR_CONFIG_FILE, &doc).await?;
        tokio::fs::create_dir_all(self.workspace.file(CHROMA_DIR)).await?;
        Ok(())
    }

    /// Write `rag.config.json`
    pub async fn write_rag_config(&self) -> Result<()> {
        let doc = json!({
            "enabled": true,
            "retrieval": {
                "k": 4,
                "strategy": "similarity",
            },
            "chunkSize": 512,
            "chunkOverlap": 64,
        });

        self.write_json(RAG_CONFIG_FILE, &doc).await
    }

    /// Write the chat UI asset
    pub async fn write_ui(&self) -> Result<()> {
        self.write(UI_FILE, &templates::chat_ui(&self.config.model, &self.config.agent_name))
            .await
    }

    /// Write the manifest, launch scripts, and Dockerfile
    ///
    /// The manifest's feature booleans mirror the flags that gated the
    /// conditional writes. Scripts are marked executable after writing.
    pub async fn write_bundle(&self) -> Result<Manifest> {
        let manifest = Manifest::new(&self.config, self.port);
        let doc = serde_json::to_value(&manifest)?;
        self.write_json(MANIFEST_FILE, &doc).await?;

        self.write(
            START_SCRIPT,
            &templates::start_script(
                &self.config.model,
                &self.config.agent_name,
                self.port,
                &self.config.device,
            ),
        )
        .await?;
        self.write(
            BUILD_SCRIPT,
            &templates::build_script(&self.config.model, &self.config.device),
        )
        .await?;
        self.write(
            DOCKERFILE,
            &templates::dockerfile(&self.config.model, self.port),
        )
        .await?;

        mark_executable(&self.workspace.file(START_SCRIPT)).await?;
        mark_executable(&self.workspace.file(BUILD_SCRIPT)).await?;

        Ok(manifest)
    }

    async fn write(&self, name: &str, contents: &str) -> Result<()> {
        tokio::fs::write(self.workspace.file(name), contents).await?;
        Ok(())
    }

    async fn write_json(&self, name: &str, doc: &serde_json::Value) -> Result<()> {
        let pretty = serde_json::to_string_pretty(doc)?;
        self.write(name, &pretty).await
    }
}

#[cfg(unix)]
async fn mark_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = tokio::fs::metadata(path).await?.permissions();
    perms.set_mode(0o755);
    tokio::fs::set_permissions(path, perms).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn mark_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::PlantArgs;

    fn config(port: Option<u16>) -> PlantConfig {
        let args = PlantArgs {
            model: "llama2".to_string(),
            device: Some("mac".to_string()),
            agent: Some("farm-assistant".to_string()),
            rag: None,
            database: None,
            port,
            config: None,
            gpu: false,
            quantize: None,
            mock: true,
        };
        PlantConfig::resolve(&args).unwrap()
    }

    #[tokio::test]
    async fn test_explicit_port_used_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::for_model(dir.path(), "llama2");
        workspace.ensure().await.unwrap();

        let builder = WorkspaceBuilder::new(config(Some(9090)), workspace).unwrap();
        assert_eq!(builder.port(), 9090);
    }

    #[tokio::test]
    async fn test_port_probed_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::for_model(dir.path(), "llama2");
        workspace.ensure().await.unwrap();

        let builder = WorkspaceBuilder::new(config(None), workspace).unwrap();
        assert!(builder.port() > 0);
    }

    #[tokio::test]
    async fn test_agent_config_contents() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::for_model(dir.path(), "llama2");
        workspace.ensure().await.unwrap();

        let builder = WorkspaceBuilder::new(config(Some(4000)), workspace.clone()).unwrap();
        builder.write_agent_config().await.unwrap();

        let raw = std::fs::read_to_string(workspace.file(AGENT_CONFIG_FILE)).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc["agent"], "farm-assistant");
        assert_eq!(doc["model"], "llama2");
        assert_eq!(doc["framework"], "llamafarm-agent");
        assert!(doc["systemPrompt"].as_str().unwrap().contains("farm-assistant"));

        assert!(workspace.file(AGENT_SERVER_FILE).exists());
    }

    #[tokio::test]
    async fn test_vector_config_creates_chroma_dir() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::for_model(dir.path(), "llama2");
        workspace.ensure().await.unwrap();

        let builder = WorkspaceBuilder::new(config(Some(4000)), workspace.clone()).unwrap();
        builder.write_vector_config().await.unwrap();

        assert!(workspace.file(VECTOR_CONFIG_FILE).exists());
        assert!(workspace.file(CHROMA_DIR).is_dir());
    }

    #[tokio::test]
    async fn test_bundle_writes_manifest_and_scripts() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::for_model(dir.path(), "llama2");
        workspace.ensure().await.unwrap();

        let builder = WorkspaceBuilder::new(config(Some(9090)), workspace.clone()).unwrap();
        let manifest = builder.write_bundle().await.unwrap();
        assert_eq!(manifest.runtime.port, 9090);

        assert!(workspace.file(MANIFEST_FILE).exists());
        assert!(workspace.file(START_SCRIPT).exists());
        assert!(workspace.file(BUILD_SCRIPT).exists());
        assert!(workspace.file(DOCKERFILE).exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_scripts_marked_executable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::for_model(dir.path(), "llama2");
        workspace.ensure().await.unwrap();

        let builder = WorkspaceBuilder::new(config(Some(9090)), workspace.clone()).unwrap();
        builder.write_bundle().await.unwrap();

        let mode = std::fs::metadata(workspace.file(START_SCRIPT))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o111, 0o111);
    }
}
