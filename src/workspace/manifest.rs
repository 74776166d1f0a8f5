//! Workspace manifest
//!
//! The canonical summary of what was packaged. Written once by the builder,
//! never mutated afterwards; its feature booleans mirror exactly which
//! conditional files went to disk.

use crate::config::PlantConfig;
use serde::{Deserialize, Serialize};

/// Canonical description of a packaged workspace
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub model: String,
    pub agent: String,
    pub device: String,
    pub features: Features,
    pub runtime: RuntimeSettings,
    pub created_at: String,
}

/// Feature flags that gated the conditional workspace files
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Features {
    pub rag: bool,
    pub vector_db: bool,
    pub gpu: bool,
}

/// Resolved runtime settings embedded into scripts and configs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeSettings {
    pub port: u16,
    pub quantization: String,
}

impl Manifest {
    /// Build the manifest for one invocation with its resolved port
    pub fn new(config: &PlantConfig, port: u16) -> Self {
        Self {
            model: config.model.clone(),
            agent: config.agent_name.clone(),
            device: config.device.clone(),
            features: Features {
                rag: config.rag_enabled(),
                vector_db: config.vector_enabled(),
                gpu: config.gpu,
            },
            runtime: RuntimeSettings {
                port,
                quantization: config.quantization.clone(),
            },
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::PlantArgs;

    fn config(rag: Option<&str>, database: Option<&str>) -> PlantConfig {
        let args = PlantArgs {
            model: "llama2".to_string(),
            device: Some("mac".to_string()),
            agent: None,
            rag: rag.map(String::from),
            database: database.map(String::from),
            port: None,
            config: None,
            gpu: false,
            quantize: None,
            mock: true,
        };
        PlantConfig::resolve(&args).unwrap()
    }

    #[test]
    fn test_feature_flags_mirror_config() {
        let manifest = Manifest::new(&config(Some("enabled"), None), 4000);
        assert!(manifest.features.rag);
        assert!(manifest.features.vector_db);

        let manifest = Manifest::new(&config(None, Some("vector")), 4000);
        assert!(!manifest.features.rag);
        assert!(manifest.features.vector_db);

        let manifest = Manifest::new(&config(Some("disabled"), Some("sqlite")), 4000);
        assert!(!manifest.features.rag);
        assert!(!manifest.features.vector_db);
    }

    #[test]
    fn test_camel_case_wire_format() {
        let manifest = Manifest::new(&config(None, None), 9090);
        let json = serde_json::to_value(&manifest).unwrap();
        assert_eq!(json["features"]["vectorDb"], false);
        assert_eq!(json["runtime"]["port"], 9090);
        assert!(json["createdAt"].is_string());
    }

    #[test]
    fn test_port_recorded_verbatim() {
        let manifest = Manifest::new(&config(None, None), 12345);
        assert_eq!(manifest.runtime.port, 12345);
    }
}
