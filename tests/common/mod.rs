//! Common test utilities for integration tests
//!
//! Shared fixtures for building services and orchestrators around the
//! scripted runtime, checkpoint and manager doubles.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::sync::Mutex;

use osint_swarm::adapters::runtime::MockRuntime;
use osint_swarm::domain::errors::DomainResult;
use osint_swarm::domain::models::{
    CheckpointConfig, CheckpointDecision, CheckpointRequest, InvestigationPlan, Profile,
    TargetTraits,
};
use osint_swarm::domain::ports::{
    HumanCheckpoint, Manager, ManagerDecision, ManagerView, MemoryRepository,
    NullMemoryRepository,
};
use osint_swarm::services::{
    AbortHandle, AbortSignal, CheckpointGate, InvestigationService, RunSettings, StageExecutor,
    StageRunner,
};

/// Create a temporary directory for test isolation
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Initialize a tracing subscriber writing to the test harness.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn darknet() -> Arc<Profile> {
    Arc::new(Profile::darknet().expect("darknet profile"))
}

pub fn osint() -> Arc<Profile> {
    Arc::new(Profile::osint().expect("osint profile"))
}

/// Run settings writing reports under `output_dir`.
pub fn settings(output_dir: &Path) -> RunSettings {
    RunSettings {
        output_dir: output_dir.to_path_buf(),
        ..RunSettings::default()
    }
}

pub fn service(
    profile: Arc<Profile>,
    runtime: &MockRuntime,
    checkpoint: Arc<dyn HumanCheckpoint>,
    output_dir: &Path,
) -> InvestigationService {
    InvestigationService::new(profile, Arc::new(runtime.clone()), checkpoint)
        .with_settings(settings(output_dir))
}

/// A stage runner over the mock runtime without memory.
pub fn runner(
    profile: Arc<Profile>,
    runtime: &MockRuntime,
    checkpoint: Arc<dyn HumanCheckpoint>,
    abort: AbortSignal,
) -> StageRunner {
    StageRunner::new(
        StageExecutor::new(profile, Arc::new(runtime.clone()), 1),
        CheckpointGate::new(checkpoint, &CheckpointConfig::default()),
        Arc::new(NullMemoryRepository::new()) as Arc<dyn MemoryRepository>,
        abort,
    )
}

/// Files in `dir` whose names start with `prefix`.
pub fn report_files(dir: &Path, prefix: &str) -> Vec<std::path::PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(prefix))
        })
        .collect()
}

/// Manager replaying a fixed list of decisions, then finishing.
#[derive(Clone, Default)]
pub struct ScriptedManager {
    decisions: Arc<Mutex<VecDeque<ManagerDecision>>>,
    repeat_forever: Option<ManagerDecision>,
}

impl ScriptedManager {
    pub fn new(decisions: impl IntoIterator<Item = ManagerDecision>) -> Self {
        Self {
            decisions: Arc::new(Mutex::new(decisions.into_iter().collect())),
            repeat_forever: None,
        }
    }

    /// Answer every step with the same decision and never finish.
    pub fn stubborn(decision: ManagerDecision) -> Self {
        Self {
            decisions: Arc::default(),
            repeat_forever: Some(decision),
        }
    }
}

pub fn invoke(stage_index: usize) -> ManagerDecision {
    ManagerDecision::Invoke {
        stage_index,
        instructions: None,
    }
}

#[async_trait]
impl Manager for ScriptedManager {
    fn plan(&self, plan: &InvestigationPlan, _traits: &TargetTraits) -> Vec<usize> {
        (0..plan.len()).collect()
    }

    async fn next(&self, _view: ManagerView<'_>) -> DomainResult<ManagerDecision> {
        if let Some(decision) = &self.repeat_forever {
            return Ok(decision.clone());
        }
        Ok(self
            .decisions
            .lock()
            .await
            .pop_front()
            .unwrap_or(ManagerDecision::Finish))
    }
}

/// Checkpoint that fires an abort handle on the given stage and otherwise accepts.
pub struct AbortingCheckpoint {
    pub handle: AbortHandle,
    pub at_stage: usize,
}

#[async_trait]
impl HumanCheckpoint for AbortingCheckpoint {
    async fn review(&self, request: &CheckpointRequest) -> CheckpointDecision {
        if request.stage_index == self.at_stage {
            self.handle.abort();
        }
        CheckpointDecision::Accept
    }
}
