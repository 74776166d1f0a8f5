//! Stage progress reporting
//!
//! Pipeline stages emit events to an abstract sink; presentation (console,
//! test capture) subscribes independently so the pipeline logic never talks
//! to the terminal directly.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Arc, Mutex};

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlantStage {
    PrepareWorkspace,
    ProvisionModel,
    AgentConfig,
    VectorDb,
    Rag,
    Ui,
    Bundle,
    Package,
    Serve,
}

impl PlantStage {
    /// Human-readable progress label
    pub fn label(&self) -> &'static str {
        match self {
            PlantStage::PrepareWorkspace => "Preparing workspace",
            PlantStage::ProvisionModel => "Provisioning model",
            PlantStage::AgentConfig => "Writing agent configuration",
            PlantStage::VectorDb => "Setting up vector database",
            PlantStage::Rag => "Configuring RAG pipeline",
            PlantStage::Ui => "Rendering chat UI",
            PlantStage::Bundle => "Bundling manifest and scripts",
            PlantStage::Package => "Packaging workspace",
            PlantStage::Serve => "Starting download server",
        }
    }
}

/// Stage lifecycle status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageStatus {
    Started,
    Completed,
    Failed(String),
}

/// Abstract sink for pipeline progress events
pub trait ProgressSink: Send + Sync {
    /// A stage changed status
    fn stage(&self, stage: PlantStage, status: StageStatus);

    /// Bytes moved during a long transfer (model pull)
    fn transfer(&self, status: &str, completed: u64, total: u64);

    /// Free-form user-facing message
    fn message(&self, text: &str);
}

/// Console presentation of pipeline progress
pub struct ConsoleSink {
    pull_bar: Mutex<Option<ProgressBar>>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            pull_bar: Mutex::new(None),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for ConsoleSink {
    fn stage(&self, stage: PlantStage, status: StageStatus) {
        match status {
            StageStatus::Started => println!("🌱 {}...", stage.label()),
            StageStatus::Completed => println!("   {} {}", "✓".green(), stage.label().dimmed()),
            StageStatus::Failed(reason) => eprintln!("❌ {}: {}", stage.label(), reason.red()),
        }
    }

    fn transfer(&self, status: &str, completed: u64, total: u64) {
        let mut guard = self.pull_bar.lock().unwrap();

        if total > 0 {
            let bar = guard.get_or_insert_with(|| {
                let bar = ProgressBar::new(total);
                bar.set_style(
                    ProgressStyle::default_bar()
                        .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes}")
                        .unwrap_or_else(|_| ProgressStyle::default_bar()),
                );
                bar
            });
            bar.set_length(total);
            bar.set_position(completed);
            bar.set_message(status.to_string());
        } else if status == "success" {
            if let Some(bar) = guard.take() {
                bar.finish_and_clear();
            }
        }
    }

    fn message(&self, text: &str) {
        println!("{}", text);
    }
}

/// Recorded progress event, for assertions in tests
#[derive(Debug, Clone)]
pub enum RecordedEvent {
    Stage(PlantStage, StageStatus),
    Transfer(String),
    Message(String),
}

/// Collecting sink that records every event it receives
#[derive(Clone, Default)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<RecordedEvent>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Stages that reported the given status
    pub fn stages_with(&self, wanted: fn(&StageStatus) -> bool) -> Vec<PlantStage> {
        self.events()
            .iter()
            .filter_map(|e| match e {
                RecordedEvent::Stage(stage, status) if wanted(status) => Some(*stage),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for MemorySink {
    fn stage(&self, stage: PlantStage, status: StageStatus) {
        self.events
            .lock()
            .unwrap()
            .push(RecordedEvent::Stage(stage, status));
    }

    fn transfer(&self, status: &str, _completed: u64, _total: u64) {
        self.events
            .lock()
            .unwrap()
            .push(RecordedEvent::Transfer(status.to_string()));
    }

    fn message(&self, text: &str) {
        self.events
            .lock()
            .unwrap()
            .push(RecordedEvent::Message(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_labels() {
        assert_eq!(PlantStage::PrepareWorkspace.label(), "Preparing workspace");
        assert_eq!(PlantStage::Package.label(), "Packaging workspace");
    }

    #[test]
    fn test_memory_sink_records_in_order() {
        let sink = MemorySink::new();
        sink.stage(PlantStage::PrepareWorkspace, StageStatus::Started);
        sink.stage(PlantStage::PrepareWorkspace, StageStatus::Completed);
        sink.message("done");

        let events = sink.events();
        assert_eq!(events.len(), 3);
        assert!(matches!(
            events[0],
            RecordedEvent::Stage(PlantStage::PrepareWorkspace, StageStatus::Started)
        ));
        assert!(matches!(events[2], RecordedEvent::Message(_)));
    }

    #[test]
    fn test_stages_with_filter() {
        let sink = MemorySink::new();
        sink.stage(PlantStage::PrepareWorkspace, StageStatus::Completed);
        sink.stage(PlantStage::Package, StageStatus::Failed("boom".to_string()));

        let completed = sink.stages_with(|s| matches!(s, StageStatus::Completed));
        assert_eq!(completed, vec![PlantStage::PrepareWorkspace]);
    }
}
