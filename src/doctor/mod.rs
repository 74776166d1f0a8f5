//! Doctor command for environment diagnostics
//!
//! Health checks for everything a plant invocation depends on: the model
//! runtime, disk space, and workspace write access.

use crate::runtime::RuntimePlatform;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Health check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Pass,
    Warn(String),
    Fail(String),
}

/// Individual health check
#[derive(Debug)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
}

/// Environment diagnostics
pub struct Doctor {
    platform: Arc<dyn RuntimePlatform>,
    working_dir: PathBuf,
}

impl Doctor {
    pub fn new(platform: Arc<dyn RuntimePlatform>, working_dir: PathBuf) -> Self {
        Self {
            platform,
            working_dir,
        }
    }

    /// Run all health checks
    pub async fn run_checks(&self) -> Vec<HealthCheck> {
        vec![
            self.check_runtime_installed().await,
            self.check_runtime_running().await,
            self.check_disk_space(),
            self.check_permissions(),
        ]
    }

    async fn check_runtime_installed(&self) -> HealthCheck {
        let status = if self.platform.runtime_installed().await {
            HealthStatus::Pass
        } else {
            HealthStatus::Fail(
                "Ollama not found. Install it or plant with --mock".to_string(),
            )
        };
        HealthCheck {
            name: "Runtime Installed".to_string(),
            status,
        }
    }

    async fn check_runtime_running(&self) -> HealthCheck {
        let status = if self.platform.runtime_running().await {
            HealthStatus::Pass
        } else {
            HealthStatus::Fail("Ollama API not reachable. Start with: ollama serve".to_string())
        };
        HealthCheck {
            name: "Runtime Running".to_string(),
            status,
        }
    }

    fn check_disk_space(&self) -> HealthCheck {
        use sysinfo::Disks;
        let disks = Disks::new_with_refreshed_list();

        for disk in &disks {
            if self.working_dir.starts_with(disk.mount_point()) {
                let available_gb = disk.available_space() / (1024 * 1024 * 1024);

                let status = if available_gb < 1 {
                    HealthStatus::Fail(format!("Less than 1GB available ({} GB)", available_gb))
                } else if available_gb < 5 {
                    HealthStatus::Warn(format!("Low disk space ({} GB available)", available_gb))
                } else {
                    HealthStatus::Pass
                };
                return HealthCheck {
                    name: "Disk Space".to_string(),
                    status,
                };
            }
        }

        HealthCheck {
            name: "Disk Space".to_string(),
            status: HealthStatus::Warn("Could not determine disk space".to_string()),
        }
    }

    fn check_permissions(&self) -> HealthCheck {
        if !self.working_dir.exists() {
            return HealthCheck {
                name: "Permissions".to_string(),
                status: HealthStatus::Fail("Working directory does not exist".to_string()),
            };
        }

        let test_file = self.working_dir.join(".llamafarm_write_test");
        match std::fs::write(&test_file, "test") {
            Ok(_) => {
                let _ = std::fs::remove_file(&test_file);
                HealthCheck {
                    name: "Permissions".to_string(),
                    status: HealthStatus::Pass,
                }
            }
            Err(_) => HealthCheck {
                name: "Permissions".to_string(),
                status: HealthStatus::Fail("No write permission in working directory".to_string()),
            },
        }
    }

    /// Display diagnostics results
    pub fn display_results(checks: &[HealthCheck]) {
        println!("\n🔍 LlamaFarm Environment Diagnostics\n");

        for check in checks {
            let line = match &check.status {
                HealthStatus::Pass => format!("✅ {:<20} PASS", check.name),
                HealthStatus::Warn(msg) => format!("⚠️  {:<20} WARN: {}", check.name, msg),
                HealthStatus::Fail(msg) => format!("❌ {:<20} FAIL: {}", check.name, msg),
            };
            println!("{}", line);
        }

        println!();
    }

    /// Overall health: no failing check
    pub fn overall_status(checks: &[HealthCheck]) -> bool {
        !checks.iter().any(|c| matches!(c.status, HealthStatus::Fail(_)))
    }
}
