//! Investigation service: the single entry point for running a profile.
//!
//! Builds the plan, recalls prior findings, runs the profile's execution
//! model and writes the report. A report write failure is returned next to
//! the result instead of failing the run.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, instrument, warn};

use super::abort::AbortSignal;
use super::checkpoint_gate::CheckpointGate;
use super::hierarchical::HierarchicalOrchestrator;
use super::plan_builder::build_plan;
use super::report_writer::ReportWriter;
use super::rule_manager::RuleBasedManager;
use super::sequential::SequentialOrchestrator;
use super::stage_executor::StageExecutor;
use super::stage_runner::StageRunner;
use crate::domain::errors::{DomainResult, ReportWriteError};
use crate::domain::models::{
    CheckpointConfig, Config, ExecutionContext, ExecutionModel, InvestigationId, InvestigationPlan,
    InvestigationResult, PriorFinding, Profile, RunState, RunStateMachine,
};
use crate::domain::ports::{HumanCheckpoint, Manager, MemoryRepository, NullMemoryRepository, WorkerRuntime};

/// Per-run tuning resolved from configuration and profile defaults.
#[derive(Debug, Clone, Serialize)]
pub struct RunSettings {
    pub checkpoint: CheckpointConfig,
    pub max_delegation_depth: usize,
    pub planning: bool,
    pub recall_limit: usize,
    pub output_dir: PathBuf,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            checkpoint: CheckpointConfig::default(),
            max_delegation_depth: 1,
            planning: true,
            recall_limit: 10,
            output_dir: PathBuf::from("osint_results"),
        }
    }
}

impl RunSettings {
    pub fn from_config(config: &Config, profile: &Profile) -> Self {
        Self {
            checkpoint: config.checkpoint.clone(),
            max_delegation_depth: config.orchestration.max_delegation_depth,
            planning: config.orchestration.planning.unwrap_or(profile.planning_default),
            recall_limit: config.memory.recall_limit,
            output_dir: config.report.output_dir.clone(),
        }
    }
}

/// A completed investigation and the outcome of persisting its report.
#[derive(Debug)]
pub struct InvestigationOutcome {
    pub result: InvestigationResult,
    pub report: Result<PathBuf, ReportWriteError>,
    pub final_state: RunState,
}

pub struct InvestigationService {
    profile: Arc<Profile>,
    runtime: Arc<dyn WorkerRuntime>,
    checkpoint: Arc<dyn HumanCheckpoint>,
    memory: Arc<dyn MemoryRepository>,
    manager: Arc<dyn Manager>,
    settings: RunSettings,
}

impl InvestigationService {
    pub fn new(
        profile: Arc<Profile>,
        runtime: Arc<dyn WorkerRuntime>,
        checkpoint: Arc<dyn HumanCheckpoint>,
    ) -> Self {
        Self {
            profile,
            runtime,
            checkpoint,
            memory: Arc::new(NullMemoryRepository::new()),
            manager: Arc::new(RuleBasedManager::new()),
            settings: RunSettings::default(),
        }
    }

    pub fn with_memory(mut self, memory: Arc<dyn MemoryRepository>) -> Self {
        self.memory = memory;
        self
    }

    pub fn with_manager(mut self, manager: Arc<dyn Manager>) -> Self {
        self.manager = manager;
        self
    }

    pub fn with_settings(mut self, settings: RunSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Normalize raw operator input into the target string.
    pub fn normalize_target(&self, raw: &str) -> String {
        self.profile.normalize_target(raw)
    }

    pub fn plan(&self, raw_target: &str) -> DomainResult<InvestigationPlan> {
        build_plan(&self.profile, &self.normalize_target(raw_target))
    }

    /// Run one investigation to completion.
    ///
    /// Returns an error, and writes no report, when the plan cannot be built,
    /// the operator aborts, or `abort` fires.
    #[instrument(skip_all, fields(profile = %self.profile.kind))]
    pub async fn investigate(&self, raw_target: &str, abort: AbortSignal) -> DomainResult<InvestigationOutcome> {
        let plan = self.plan(raw_target)?;
        let id = InvestigationId::generate(self.profile.kind, Utc::now());
        info!(investigation_id = %id, target = %plan.target, model = %plan.model, "starting investigation");

        let prior = self.recall(&plan.target, &id).await;
        let ctx = ExecutionContext::new(id, plan.target.clone()).with_prior_findings(prior);
        let mut machine = RunStateMachine::new();

        let result = match plan.model {
            ExecutionModel::Sequential => {
                SequentialOrchestrator::new(self.runner(abort))
                    .run(&plan, ctx, &mut machine)
                    .await?
            }
            ExecutionModel::Hierarchical => {
                HierarchicalOrchestrator::new(self.runner(abort), self.manager.clone(), self.settings.planning)
                    .run(&plan, ctx, &mut machine)
                    .await?
            }
        };

        let writer = ReportWriter::new(&self.settings.output_dir, self.profile.report.clone());
        let report = writer.write_report(&plan.target, &result).await;
        if let Err(e) = &report {
            warn!(error = %e, "report could not be written; result is still returned");
        }

        Ok(InvestigationOutcome {
            result,
            report,
            final_state: machine.current().clone(),
        })
    }

    fn runner(&self, abort: AbortSignal) -> StageRunner {
        StageRunner::new(
            StageExecutor::new(self.profile.clone(), self.runtime.clone(), self.settings.max_delegation_depth),
            CheckpointGate::new(self.checkpoint.clone(), &self.settings.checkpoint),
            self.memory.clone(),
            abort,
        )
    }

    async fn recall(&self, target: &str, id: &InvestigationId) -> Vec<PriorFinding> {
        match self
            .memory
            .recall(target, Some(id.as_str()), self.settings.recall_limit)
            .await
        {
            Ok(entries) => {
                if !entries.is_empty() {
                    info!(count = entries.len(), "recalled prior findings");
                }
                entries.into_iter().map(PriorFinding::from).collect()
            }
            Err(e) => {
                warn!(error = %e, "memory recall failed, continuing without prior findings");
                Vec::new()
            }
        }
    }
}
