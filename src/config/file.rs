//! Farm configuration file loading
//!
//! Parses the optional YAML document passed via `--config`. The file carries
//! more sections than the plant pipeline consumes; unknown or unused sections
//! are accepted and ignored so one farm file can drive several tools.

use crate::errors::{PlantError, Result};
use serde::Deserialize;
use std::path::Path;

/// Top-level farm configuration document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FarmFile {
    pub model: ModelSection,
    pub agent: AgentSection,
    pub database: DatabaseSection,
    pub rag: RagSection,
    pub deployment: DeploymentSection,
    // Accepted but not consumed by the plant pipeline.
    pub data_sources: Option<serde_yaml::Value>,
    pub advanced: Option<serde_yaml::Value>,
    pub telemetry: Option<serde_yaml::Value>,
    pub export: Option<serde_yaml::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ModelSection {
    pub name: Option<String>,
    pub quantization: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AgentSection {
    pub name: Option<String>,
    pub framework: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub provider: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RagSection {
    pub enabled: Option<bool>,
    pub retrieval: Option<serde_yaml::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeploymentSection {
    pub port: Option<PortValue>,
    pub device: Option<String>,
    pub gpu: Option<bool>,
}

/// Port values may be written as a YAML number or a numeric string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PortValue {
    Number(u16),
    Text(String),
}

impl PortValue {
    /// Resolve to a concrete port number
    ///
    /// # Errors
    /// Returns a configuration error if a string value is not numeric.
    pub fn resolve(&self) -> Result<u16> {
        match self {
            PortValue::Number(n) => Ok(*n),
            PortValue::Text(s) => s.trim().parse::<u16>().map_err(|_| {
                PlantError::Config(format!("deployment.port is not a valid port: '{}'", s))
            }),
        }
    }
}

impl FarmFile {
    /// Load a farm file from disk
    ///
    /// # Errors
    /// Returns `PlantError::Config` if the file is absent or malformed. This
    /// runs before any workspace side effect.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PlantError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            PlantError::Config(format!("Failed to parse config file {}: {}", path.display(), e))
        })
    }
}
