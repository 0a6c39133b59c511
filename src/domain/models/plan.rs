//! Investigation plan: the ordered stages for one target.

use serde::Serialize;

use super::profile::ExecutionModel;
use super::stage::Stage;
use super::worker::WorkerId;

/// Ordered stages for one target, built fresh per investigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvestigationPlan {
    pub target: String,
    pub model: ExecutionModel,
    stages: Vec<Stage>,
}

impl InvestigationPlan {
    pub fn new(target: impl Into<String>, model: ExecutionModel, stages: Vec<Stage>) -> Self {
        Self {
            target: target.into(),
            model,
            stages,
        }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn stage(&self, index: usize) -> Option<&Stage> {
        self.stages.get(index)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Worker bindings in plan order.
    pub fn worker_bindings(&self) -> Vec<&WorkerId> {
        self.stages.iter().map(|s| &s.worker).collect()
    }

    pub fn checkpoint_count(&self) -> usize {
        self.stages.iter().filter(|s| s.human_checkpoint).count()
    }
}
