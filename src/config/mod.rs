//! Configuration resolution for one plant invocation
//!
//! Merges CLI-supplied options over the optional farm file over built-in
//! defaults. The merge is explicit and field-by-field so precedence is
//! visible in one place rather than hidden in a structural merge.

pub mod file;

pub use file::FarmFile;

use crate::cli::PlantArgs;
use crate::errors::Result;

/// Environment variable that forces mock mode irrespective of flags
pub const MOCK_ENV_VAR: &str = "LLAMAFARM_MOCK";

/// Resolved, immutable configuration for one plant invocation
#[derive(Debug, Clone)]
pub struct PlantConfig {
    pub model: String,
    pub device: String,
    pub agent_name: String,
    /// RAG mode: the literal "enabled" turns RAG on, any other value is off
    pub rag: String,
    /// Database mode: the literal "vector" selects the vector store
    pub database: String,
    /// Explicit port; `None` means probe a free ephemeral port later
    pub port: Option<u16>,
    pub gpu: bool,
    pub quantization: String,
    pub mock: bool,
}

impl PlantConfig {
    pub const DEFAULT_DEVICE: &'static str = "cpu";
    pub const DEFAULT_AGENT: &'static str = "farm-assistant";
    pub const DEFAULT_RAG: &'static str = "disabled";
    pub const DEFAULT_DATABASE: &'static str = "sqlite";
    pub const DEFAULT_QUANTIZATION: &'static str = "q4_0";

    /// Resolve the final configuration from CLI options and an optional farm file
    ///
    /// Precedence per field: CLI > file > built-in default. Loading happens
    /// before any workspace side effect; a missing or malformed file aborts
    /// the invocation with a configuration error.
    pub fn resolve(args: &PlantArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => FarmFile::load(path)?,
            None => FarmFile::default(),
        };

        let port = match args.port {
            Some(p) => Some(p),
            None => match &file.deployment.port {
                Some(v) => Some(v.resolve()?),
                None => None,
            },
        };

        let rag = args
            .rag
            .clone()
            .or_else(|| file.rag.enabled.map(|on| {
                if on { "enabled".to_string() } else { "disabled".to_string() }
            }))
            .unwrap_or_else(|| Self::DEFAULT_RAG.to_string());

        Ok(Self {
            model: args.model.clone(),
            device: args
                .device
                .clone()
                .or_else(|| file.deployment.device.clone())
                .unwrap_or_else(|| Self::DEFAULT_DEVICE.to_string()),
            agent_name: args
                .agent
                .clone()
                .or_else(|| file.agent.name.clone())
                .unwrap_or_else(|| Self::DEFAULT_AGENT.to_string()),
            rag,
            database: args
                .database
                .clone()
                .or_else(|| file.database.provider.clone())
                .unwrap_or_else(|| Self::DEFAULT_DATABASE.to_string()),
            port,
            gpu: args.gpu || file.deployment.gpu.unwrap_or(false),
            quantization: args
                .quantize
                .clone()
                .or_else(|| file.model.quantization.clone())
                .unwrap_or_else(|| Self::DEFAULT_QUANTIZATION.to_string()),
            mock: args.mock || mock_env_signal(),
        })
    }

    /// RAG pipeline requested for this invocation
    pub fn rag_enabled(&self) -> bool {
        self.rag == "enabled"
    }

    /// Vector store required: selected directly or pulled in by RAG
    pub fn vector_enabled(&self) -> bool {
        self.database == "vector" || self.rag_enabled()
    }

    /// Name of the artifact this invocation will produce
    pub fn artifact_name(&self) -> String {
        format!("llamafarm-{}-{}.tar.gz", self.model, self.device)
    }
}

/// Check the mock-mode environment override
pub fn mock_env_signal() -> bool {
    match std::env::var(MOCK_ENV_VAR) {
        Ok(v) => matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_args(model: &str) -> PlantArgs {
        PlantArgs {
            model: model.to_string(),
            device: None,
            agent: None,
            rag: None,
            database: None,
            port: None,
            config: None,
            gpu: false,
            quantize: None,
            mock: false,
        }
    }

    #[test]
    fn test_defaults_applied() {
        let config = PlantConfig::resolve(&bare_args("llama2")).unwrap();
        assert_eq!(config.model, "llama2");
        assert_eq!(config.device, "cpu");
        assert_eq!(config.agent_name, "farm-assistant");
        assert_eq!(config.rag, "disabled");
        assert_eq!(config.database, "sqlite");
        assert_eq!(config.quantization, "q4_0");
        assert!(config.port.is_none());
        assert!(!config.gpu);
    }

    #[test]
    fn test_cli_values_win() {
        let mut args = bare_args("mistral");
        args.device = Some("mac".to_string());
        args.agent = Some("harvester".to_string());
        args.port = Some(4242);
        args.gpu = true;
        let config = PlantConfig::resolve(&args).unwrap();
        assert_eq!(config.device, "mac");
        assert_eq!(config.agent_name, "harvester");
        assert_eq!(config.port, Some(4242));
        assert!(config.gpu);
    }

    #[test]
    fn test_missing_config_file_fails() {
        let mut args = bare_args("phi");
        args.config = Some(std::path::PathBuf::from("/no/such/farm.yaml"));
        assert!(PlantConfig::resolve(&args).is_err());
    }

    #[test]
    fn test_feature_gates() {
        let mut args = bare_args("codellama");
        args.rag = Some("enabled".to_string());
        let config = PlantConfig::resolve(&args).unwrap();
        assert!(config.rag_enabled());
        assert!(config.vector_enabled());

        let mut args = bare_args("codellama");
        args.database = Some("vector".to_string());
        let config = PlantConfig::resolve(&args).unwrap();
        assert!(!config.rag_enabled());
        assert!(config.vector_enabled());

        let args = bare_args("codellama");
        let config = PlantConfig::resolve(&args).unwrap();
        assert!(!config.vector_enabled());
    }

    #[test]
    fn test_artifact_name() {
        let mut args = bare_args("llama2");
        args.device = Some("mac".to_string());
        let config = PlantConfig::resolve(&args).unwrap();
        assert_eq!(config.artifact_name(), "llamafarm-llama2-mac.tar.gz");
    }
}
