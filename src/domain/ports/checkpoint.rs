//! Human checkpoint port.

use async_trait::async_trait;

use crate::domain::models::{CheckpointDecision, CheckpointRequest};

/// Synchronous operator confirmation of a stage output.
///
/// Implementations block until the operator answers; timeouts are applied by
/// the caller.
#[async_trait]
pub trait HumanCheckpoint: Send + Sync {
    async fn review(&self, request: &CheckpointRequest) -> CheckpointDecision;
}
