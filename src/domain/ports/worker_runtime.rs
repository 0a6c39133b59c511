//! Worker runtime port - the backend that actually performs a stage.
//!
//! A runtime receives the stage, the read-only execution context and any
//! feedback or delegated answers, and either returns a final output or asks
//! for another worker to answer a sub-question first.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::errors::DomainResult;
use crate::domain::models::{PriorFinding, Stage, StageOutput, Worker, WorkerId};

/// What a runtime is asked to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequestKind {
    /// Perform the stage itself
    Stage,
    /// Answer a sub-question on behalf of another worker
    SubQuestion { from: WorkerId, question: String },
}

/// Answer obtained through delegation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DelegatedAnswer {
    pub worker: WorkerId,
    pub question: String,
    pub answer: String,
}

/// Everything a worker sees while executing.
#[derive(Debug, Clone, Serialize)]
pub struct StageRequest {
    pub investigation_id: String,
    pub target: String,
    pub stage: Stage,
    pub kind: RequestKind,
    /// Sub-instructions from the manager (hierarchical model)
    pub instructions: Option<String>,
    /// Outputs of previously completed stages, in completion order
    pub background: Vec<StageOutput>,
    /// Findings recalled from earlier runs
    pub prior_findings: Vec<PriorFinding>,
    /// Reviewer feedback from rejected attempts, oldest first
    pub feedback: Vec<String>,
    pub delegated: Vec<DelegatedAnswer>,
}

impl StageRequest {
    /// Derive the request a delegate receives for a sub-question.
    pub fn sub_question(&self, from: WorkerId, question: impl Into<String>) -> Self {
        Self {
            kind: RequestKind::SubQuestion {
                from,
                question: question.into(),
            },
            instructions: None,
            feedback: Vec::new(),
            delegated: Vec::new(),
            ..self.clone()
        }
    }

    pub fn is_sub_question(&self) -> bool {
        matches!(self.kind, RequestKind::SubQuestion { .. })
    }
}

/// Result of one runtime invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerTurn {
    /// The worker's output for this request
    Final(String),
    /// The worker wants `to` to answer `question` first; `draft` is what it
    /// would return if delegation is refused
    Delegate {
        to: WorkerId,
        question: String,
        draft: String,
    },
}

impl WorkerTurn {
    /// The output to use when no further delegation is possible.
    pub fn into_output(self) -> String {
        match self {
            Self::Final(output) | Self::Delegate { draft: output, .. } => output,
        }
    }
}

/// Backend executing stages on behalf of workers.
#[async_trait]
pub trait WorkerRuntime: Send + Sync {
    fn name(&self) -> &'static str;

    async fn execute(&self, worker: &Worker, request: &StageRequest) -> DomainResult<WorkerTurn>;
}
