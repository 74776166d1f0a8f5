//! LlamaFarm CLI entry point
//!
//! The only place a pipeline failure is mapped onto a process exit status.

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use llamafarm::cli::{Args, Commands, PlantArgs};
use llamafarm::config::PlantConfig;
use llamafarm::doctor::Doctor;
use llamafarm::plant::PlantOrchestrator;
use llamafarm::progress::ConsoleSink;
use llamafarm::runtime::{HostPlatform, OllamaClient};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.command {
        Commands::Plant(ref plant_args) => {
            if let Err(e) = run_plant(plant_args).await {
                eprintln!("\n{} {}", "✗".red().bold(), e);
                std::process::exit(e.exit_code());
            }
        }
        Commands::Doctor => {
            let healthy = run_doctor().await?;
            std::process::exit(if healthy { 0 } else { 1 });
        }
    }

    Ok(())
}

async fn run_plant(plant_args: &PlantArgs) -> llamafarm::Result<()> {
    let config = PlantConfig::resolve(plant_args)?;
    let current_dir = std::env::current_dir()?;

    if config.mock {
        println!("{}", "🌱 Planting in mock mode (no model runtime used)".yellow());
    }

    let orchestrator = PlantOrchestrator::new(
        config,
        Arc::new(HostPlatform::new(None)),
        OllamaClient::new(None),
        Arc::new(ConsoleSink::new()),
    );

    let report = orchestrator.run(&current_dir).await?;

    // Keep the process alive until the download window closes.
    report.download.closed().await;
    Ok(())
}

async fn run_doctor() -> anyhow::Result<bool> {
    let working_dir = std::env::current_dir().context("cannot determine working directory")?;
    let doctor = Doctor::new(Arc::new(HostPlatform::new(None)), working_dir);

    let checks = doctor.run_checks().await;
    Doctor::display_results(&checks);

    Ok(Doctor::overall_status(&checks))
}
