//! Workspace packaging
//!
//! Streams the workspace directory into one gzip-compressed tar archive in
//! the invocation's current directory. The archive holds the workspace's
//! files at its root, with no enclosing directory level. Success is reported
//! only once the output file is finished and synced, not merely when all
//! entries have been appended. On failure the partial archive is left in
//! place for the user to inspect.

use crate::config::PlantConfig;
use crate::errors::{PlantError, Result};
use crate::workspace::Workspace;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Streams a workspace into a distributable archive
pub struct ArtifactPackager;

impl ArtifactPackager {
    /// Package the workspace into `llamafarm-<model>-<device>.tar.gz`
    ///
    /// # Arguments
    /// * `config` - Resolved invocation config (names the archive)
    /// * `workspace` - Populated workspace to archive
    /// * `output_dir` - Directory receiving the archive (the invocation cwd)
    ///
    /// # Errors
    /// Any stream-level failure maps to `PlantError::Packaging`.
    pub async fn package(
        config: &PlantConfig,
        workspace: &Workspace,
        output_dir: &Path,
    ) -> Result<PathBuf> {
        let archive_path = output_dir.join(config.artifact_name());
        let workspace_dir = workspace.path().to_path_buf();
        let output = archive_path.clone();

        tokio::task::spawn_blocking(move || write_archive(&workspace_dir, &output))
            .await
            .map_err(|e| PlantError::Packaging(format!("Archive task aborted: {}", e)))?
            .map_err(|e| PlantError::Packaging(format!("Archive stream failed: {}", e)))?;

        Ok(archive_path)
    }
}

fn write_archive(workspace_dir: &Path, output: &Path) -> std::io::Result<()> {
    let file = File::create(output)?;
    let enc = GzEncoder::new(file, Compression::default());
    let mut tar = tar::Builder::new(enc);

    // "." keeps the workspace's files at the archive root.
    tar.append_dir_all(".", workspace_dir)?;

    // Completion signal: the encoder must flush its trailer and the file
    // must reach disk before the stage may report success.
    let enc = tar.into_inner()?;
    let file = enc.finish()?;
    file.sync_all()?;
    Ok(())
}
