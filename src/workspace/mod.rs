//! Per-model workspace directory
//!
//! One workspace per model identifier, rooted under `.llamafarm` in the
//! invocation's current directory. Re-running a plant overwrites its
//! contents. No lock is taken: the tool assumes interactive use, one
//! invocation at a time per model id.

pub mod builder;
pub mod manifest;
pub mod ports;
pub mod templates;

pub use builder::WorkspaceBuilder;
pub use manifest::Manifest;

use crate::errors::Result;
use std::path::{Path, PathBuf};

/// Root directory name holding all workspaces
pub const FARM_DIR: &str = ".llamafarm";

/// Placeholder model file written by the provisioner
pub const MODEL_FILE: &str = "model.gguf";
/// Agent configuration document
pub const AGENT_CONFIG_FILE: &str = "agent.config.json";
/// Generated agent server source
pub const AGENT_SERVER_FILE: &str = "agent-server.js";
/// Vector store configuration (written only when the vector store is enabled)
pub const VECTOR_CONFIG_FILE: &str = "vector.config.json";
/// RAG configuration (written only when RAG is enabled)
pub const RAG_CONFIG_FILE: &str = "rag.config.json";
/// Vector store data directory
pub const CHROMA_DIR: &str = "chroma_db";
/// Chat UI asset
pub const UI_FILE: &str = "index.html";
/// Canonical description of what was packaged
pub const MANIFEST_FILE: &str = "manifest.json";
/// Launch script
pub const START_SCRIPT: &str = "start.sh";
/// Build script
pub const BUILD_SCRIPT: &str = "build.sh";
/// Container recipe
pub const DOCKERFILE: &str = "Dockerfile";

/// A per-model working directory holding all generated files
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Workspace for one model id under the given current directory
    pub fn for_model(current_dir: &Path, model: &str) -> Self {
        Self {
            root: current_dir.join(FARM_DIR).join(model),
        }
    }

    /// Workspace directory path
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Path of a file inside the workspace
    pub fn file(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Path of the placeholder model file
    pub fn model_path(&self) -> PathBuf {
        self.file(MODEL_FILE)
    }

    /// Create the workspace directory (idempotent, recursive)
    pub async fn ensure(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Whether the workspace directory exists on disk
    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }
}
