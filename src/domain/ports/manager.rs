//! Manager port for the hierarchical execution model.
//!
//! The manager owns no stage output. At each step it looks at the plan, the
//! completed stages and its own agenda, and decides which stage to invoke next.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{InvestigationPlan, StageOutput, TargetTraits};

/// Read-only snapshot handed to the manager at every step.
#[derive(Debug, Clone, Copy)]
pub struct ManagerView<'a> {
    pub plan: &'a InvestigationPlan,
    pub traits: &'a TargetTraits,
    /// Stage indices in the order the manager intends to visit them
    pub agenda: &'a [usize],
    /// Completed stage outputs, in completion order
    pub completed: &'a [StageOutput],
    /// Stages the manager chose to skip so far
    pub skipped: &'a [usize],
    pub step: usize,
}

impl ManagerView<'_> {
    pub fn is_done(&self, stage_index: usize) -> bool {
        self.completed.iter().any(|o| o.stage_index == stage_index)
    }

    pub fn is_skipped(&self, stage_index: usize) -> bool {
        self.skipped.contains(&stage_index)
    }

    /// First agenda entry neither completed nor skipped.
    pub fn next_pending(&self) -> Option<usize> {
        self.agenda
            .iter()
            .copied()
            .find(|&i| !self.is_done(i) && !self.is_skipped(i))
    }
}

/// A single manager step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagerDecision {
    Invoke {
        stage_index: usize,
        instructions: Option<String>,
    },
    Skip {
        stage_index: usize,
        reason: String,
    },
    Finish,
}

/// Decides the order of stage invocations in the hierarchical model.
#[async_trait]
pub trait Manager: Send + Sync {
    /// Planning pre-pass: order the stages for this target.
    ///
    /// The returned agenda must contain every stage index exactly once.
    fn plan(&self, plan: &InvestigationPlan, traits: &TargetTraits) -> Vec<usize>;

    /// Pick the next step.
    async fn next(&self, view: ManagerView<'_>) -> DomainResult<ManagerDecision>;
}
