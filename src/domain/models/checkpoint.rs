//! Human checkpoint types.

use serde::{Deserialize, Serialize};

/// Operator response to a proposed stage output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum CheckpointDecision {
    /// Output is final; advance
    Accept,
    /// Re-run the stage with this feedback appended to its context
    Reject { feedback: String },
    /// Stop the whole investigation
    Abort,
}

impl CheckpointDecision {
    pub fn reject(feedback: impl Into<String>) -> Self {
        Self::Reject {
            feedback: feedback.into(),
        }
    }
}

/// What a checkpoint presents to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckpointRequest {
    pub investigation_id: String,
    pub stage_index: usize,
    pub stage_title: String,
    pub worker: String,
    /// 1 for the first execution, incremented on every rejection
    pub attempt: u32,
    pub proposed_output: String,
}

/// What happens when the operator does not answer within the configured timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutAction {
    /// Re-run the stage with empty feedback
    #[default]
    Reject,
    /// Fail the run
    Abort,
    /// Take the proposed output as final
    Accept,
}

impl TimeoutAction {
    pub fn decision(&self) -> CheckpointDecision {
        match self {
            Self::Reject => CheckpointDecision::reject(""),
            Self::Abort => CheckpointDecision::Abort,
            Self::Accept => CheckpointDecision::Accept,
        }
    }
}
