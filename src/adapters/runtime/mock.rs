//! Scripted worker runtime for tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Worker, WorkerId, ACCOUNTS_FOUND};
use crate::domain::ports::{RequestKind, StageRequest, WorkerRuntime, WorkerTurn};

/// One observed runtime invocation.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub worker: WorkerId,
    pub stage_index: usize,
    pub kind: RequestKind,
    pub instructions: Option<String>,
    pub feedback: Vec<String>,
    pub delegated: usize,
    pub background: usize,
    pub prior_findings: usize,
}

/// Runtime returning scripted turns per (worker, stage), then a default output.
#[derive(Clone, Default)]
pub struct MockRuntime {
    scripts: Arc<RwLock<HashMap<(String, usize), VecDeque<WorkerTurn>>>>,
    failing: Arc<RwLock<HashSet<String>>>,
    calls: Arc<RwLock<Vec<RecordedCall>>>,
}

impl MockRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue turns returned for stage requests of `worker` on `stage_index`.
    pub async fn script(&self, worker: &str, stage_index: usize, turns: Vec<WorkerTurn>) {
        self.scripts
            .write()
            .await
            .entry((worker.to_string(), stage_index))
            .or_default()
            .extend(turns);
    }

    /// Make every call for `worker` fail with a runtime error.
    pub async fn fail_worker(&self, worker: &str) {
        self.failing.write().await.insert(worker.to_string());
    }

    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.read().await.clone()
    }

    /// Stage indices of stage requests, in call order.
    pub async fn stage_order(&self) -> Vec<usize> {
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| c.kind == RequestKind::Stage)
            .map(|c| c.stage_index)
            .collect()
    }

    pub fn default_output(worker: &WorkerId, stage_index: usize) -> String {
        format!("{ACCOUNTS_FOUND}: output of {worker} for stage {stage_index}")
    }
}

#[async_trait]
impl WorkerRuntime for MockRuntime {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn execute(&self, worker: &Worker, request: &StageRequest) -> DomainResult<WorkerTurn> {
        self.calls.write().await.push(RecordedCall {
            worker: worker.id.clone(),
            stage_index: request.stage.index,
            kind: request.kind.clone(),
            instructions: request.instructions.clone(),
            feedback: request.feedback.clone(),
            delegated: request.delegated.len(),
            background: request.background.len(),
            prior_findings: request.prior_findings.len(),
        });

        if self.failing.read().await.contains(worker.id.as_str()) {
            return Err(DomainError::ExecutionFailed(format!("{} backend unavailable", worker.id)));
        }

        match &request.kind {
            RequestKind::SubQuestion { question, .. } => {
                Ok(WorkerTurn::Final(format!("answer from {}: {question}", worker.id)))
            }
            RequestKind::Stage => {
                let scripted = self
                    .scripts
                    .write()
                    .await
                    .get_mut(&(worker.id.as_str().to_string(), request.stage.index))
                    .and_then(VecDeque::pop_front);
                Ok(scripted.unwrap_or_else(|| {
                    WorkerTurn::Final(Self::default_output(&worker.id, request.stage.index))
                }))
            }
        }
    }
}
