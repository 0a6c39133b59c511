use async_trait::async_trait;

use crate::domain::models::{CheckpointDecision, CheckpointRequest};
use crate::domain::ports::HumanCheckpoint;

/// Accepts every proposed output without operator interaction.
#[derive(Debug, Clone, Default)]
pub struct AutoAcceptCheckpoint;

#[async_trait]
impl HumanCheckpoint for AutoAcceptCheckpoint {
    async fn review(&self, request: &CheckpointRequest) -> CheckpointDecision {
        tracing::debug!(stage = request.stage_index, "checkpoint auto-accepted");
        CheckpointDecision::Accept
    }
}
