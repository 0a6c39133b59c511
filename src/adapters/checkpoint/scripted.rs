//! Checkpoint answering from a queue of decisions, for tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::models::{CheckpointDecision, CheckpointRequest};
use crate::domain::ports::HumanCheckpoint;

/// Pops one decision per review; accepts once the queue is empty.
#[derive(Clone, Default)]
pub struct ScriptedCheckpoint {
    decisions: Arc<Mutex<VecDeque<CheckpointDecision>>>,
    requests: Arc<Mutex<Vec<CheckpointRequest>>>,
    delay: Option<Duration>,
}

impl ScriptedCheckpoint {
    pub fn new(decisions: impl IntoIterator<Item = CheckpointDecision>) -> Self {
        Self {
            decisions: Arc::new(Mutex::new(decisions.into_iter().collect())),
            ..Default::default()
        }
    }

    /// Wait before answering, to exercise checkpoint timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Requests seen so far, in order.
    pub async fn requests(&self) -> Vec<CheckpointRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl HumanCheckpoint for ScriptedCheckpoint {
    async fn review(&self, request: &CheckpointRequest) -> CheckpointDecision {
        self.requests.lock().await.push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.decisions
            .lock()
            .await
            .pop_front()
            .unwrap_or(CheckpointDecision::Accept)
    }
}
