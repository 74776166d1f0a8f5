//! Command-line argument parsing for LlamaFarm
//!
//! Provides clap-based CLI with the `plant` and `doctor` subcommands.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// LlamaFarm - Package local AI models into deployable farm workspaces
#[derive(Parser, Debug)]
#[command(name = "llamafarm")]
#[command(version = "0.3.0")]
#[command(about = "Plant a local AI model into a packaged, deployable workspace", long_about = None)]
pub struct Args {
    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Provision a model, build its workspace, and package it for download
    Plant(PlantArgs),

    /// Run environment diagnostics and health checks
    Doctor,
}

/// Options for a plant invocation
#[derive(Parser, Debug, Clone)]
pub struct PlantArgs {
    /// Model identifier to plant (e.g. llama2, mistral, phi)
    #[arg(value_name = "MODEL")]
    pub model: String,

    /// Target device (cpu, mac, cuda, ...)
    #[arg(long)]
    pub device: Option<String>,

    /// Agent name embedded into the generated workspace
    #[arg(long)]
    pub agent: Option<String>,

    /// RAG mode: enabled or disabled
    #[arg(long)]
    pub rag: Option<String>,

    /// Database type (sqlite, vector, ...)
    #[arg(long)]
    pub database: Option<String>,

    /// Port for the generated agent server (probed when omitted)
    #[arg(long)]
    pub port: Option<u16>,

    /// Path to a farm configuration file (YAML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable GPU acceleration flags in the generated workspace
    #[arg(long)]
    pub gpu: bool,

    /// Quantization level (q4_0, q8_0, ...)
    #[arg(long)]
    pub quantize: Option<String>,

    /// Skip the model runtime and plant with deterministic placeholders
    #[arg(long)]
    pub mock: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_plant_minimal() {
        let args = Args::parse_from(["llamafarm", "plant", "llama2"]);
        match args.command {
            Commands::Plant(plant) => {
                assert_eq!(plant.model, "llama2");
                assert!(plant.device.is_none());
                assert!(!plant.mock);
            }
            _ => panic!("expected plant subcommand"),
        }
    }

    #[test]
    fn test_parse_plant_full() {
        let args = Args::parse_from([
            "llamafarm", "plant", "mistral", "--device", "mac", "--agent", "farm-assistant",
            "--rag", "enabled", "--database", "vector", "--port", "9090",
            "--gpu", "--quantize", "q8_0", "--mock",
        ]);
        match args.command {
            Commands::Plant(plant) => {
                assert_eq!(plant.model, "mistral");
                assert_eq!(plant.device.as_deref(), Some("mac"));
                assert_eq!(plant.rag.as_deref(), Some("enabled"));
                assert_eq!(plant.database.as_deref(), Some("vector"));
                assert_eq!(plant.port, Some(9090));
                assert!(plant.gpu);
                assert!(plant.mock);
            }
            _ => panic!("expected plant subcommand"),
        }
    }

    #[test]
    fn test_parse_doctor() {
        let args = Args::parse_from(["llamafarm", "doctor"]);
        assert!(matches!(args.command, Commands::Doctor));
    }
}
