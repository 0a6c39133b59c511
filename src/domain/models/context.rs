//! Run-scoped execution context.
//!
//! The context is owned exclusively by one orchestrator run. It accumulates
//! completed stage outputs in completion order and is consumed into an
//! [`InvestigationResult`] when the run completes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::memory::PriorFinding;
use super::profile::{ExecutionModel, ProfileKind};
use super::result::InvestigationResult;
use super::stage::{Dimension, Stage};
use super::worker::WorkerId;

/// Unique id of one investigation run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvestigationId(String);

impl InvestigationId {
    /// `{profile}_{YYYYMMDD_HHMMSS}_{8 hex}`.
    pub fn generate(profile: ProfileKind, at: DateTime<Utc>) -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!(
            "{}_{}_{}",
            profile.as_str(),
            at.format("%Y%m%d_%H%M%S"),
            &suffix[..8]
        ))
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for InvestigationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Final output of one stage execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageOutput {
    pub stage_index: usize,
    pub title: String,
    pub dimension: Dimension,
    pub worker: WorkerId,
    pub output: String,
    /// Executions needed before the output was accepted
    pub attempts: u32,
}

impl StageOutput {
    pub fn new(stage: &Stage, output: impl Into<String>, attempts: u32) -> Self {
        Self {
            stage_index: stage.index,
            title: stage.title.clone(),
            dimension: stage.dimension,
            worker: stage.worker.clone(),
            output: output.into(),
            attempts,
        }
    }
}

/// One hop in an active delegation chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DelegationLink {
    pub from: WorkerId,
    pub to: WorkerId,
    pub question: String,
}

/// Mutable accumulator threaded through a run.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub investigation_id: InvestigationId,
    pub target: String,
    pub started_at: DateTime<Utc>,
    completed: Vec<StageOutput>,
    delegation_chain: Vec<DelegationLink>,
    prior_findings: Vec<PriorFinding>,
}

impl ExecutionContext {
    pub fn new(investigation_id: InvestigationId, target: impl Into<String>) -> Self {
        Self {
            investigation_id,
            target: target.into(),
            started_at: Utc::now(),
            completed: Vec::new(),
            delegation_chain: Vec::new(),
            prior_findings: Vec::new(),
        }
    }

    pub fn with_prior_findings(mut self, findings: Vec<PriorFinding>) -> Self {
        self.prior_findings = findings;
        self
    }

    pub fn record(&mut self, output: StageOutput) {
        self.completed.push(output);
    }

    /// Completed outputs in completion order.
    pub fn completed(&self) -> &[StageOutput] {
        &self.completed
    }

    pub fn prior_findings(&self) -> &[PriorFinding] {
        &self.prior_findings
    }

    pub fn has_attempted(&self, stage_index: usize) -> bool {
        self.completed.iter().any(|o| o.stage_index == stage_index)
    }

    pub fn push_delegation(&mut self, link: DelegationLink) {
        self.delegation_chain.push(link);
    }

    pub fn pop_delegation(&mut self) -> Option<DelegationLink> {
        self.delegation_chain.pop()
    }

    pub fn delegation_chain(&self) -> &[DelegationLink] {
        &self.delegation_chain
    }

    pub fn into_result(self, model: ExecutionModel) -> InvestigationResult {
        InvestigationResult {
            investigation_id: self.investigation_id,
            target: self.target,
            model,
            started_at: self.started_at,
            finished_at: Utc::now(),
            records: self.completed,
        }
    }
}
