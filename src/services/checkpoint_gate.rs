//! Applies the timeout policy around a [`HumanCheckpoint`].

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::domain::models::{CheckpointConfig, CheckpointDecision, CheckpointRequest, TimeoutAction};
use crate::domain::ports::HumanCheckpoint;

#[derive(Clone)]
pub struct CheckpointGate {
    port: Arc<dyn HumanCheckpoint>,
    timeout: Option<Duration>,
    on_timeout: TimeoutAction,
    max_revisions: u32,
}

impl CheckpointGate {
    pub fn new(port: Arc<dyn HumanCheckpoint>, config: &CheckpointConfig) -> Self {
        Self {
            port,
            timeout: config.timeout_secs.map(Duration::from_secs),
            on_timeout: config.on_timeout,
            max_revisions: config.max_revisions,
        }
    }

    /// Override the wait bound (sub-second bounds are only useful in tests).
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Rejections honored per stage before the latest output is kept.
    pub fn max_revisions(&self) -> u32 {
        self.max_revisions
    }

    pub async fn review(&self, request: &CheckpointRequest) -> CheckpointDecision {
        let Some(limit) = self.timeout else {
            return self.port.review(request).await;
        };

        match tokio::time::timeout(limit, self.port.review(request)).await {
            Ok(decision) => decision,
            Err(_) => {
                warn!(
                    investigation_id = %request.investigation_id,
                    stage_index = request.stage_index,
                    timeout_secs = limit.as_secs_f64(),
                    action = ?self.on_timeout,
                    "checkpoint timed out"
                );
                self.on_timeout.decision()
            }
        }
    }
}
