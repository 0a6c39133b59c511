//! Stage attempts shared by both execution models.
//!
//! A stage attempt runs the worker, passes the output through the human
//! checkpoint when the stage requires one, reruns on rejection with the
//! feedback appended, and records the accepted output. A rejected output is
//! never recorded: once `max_revisions` reruns are spent, a further rejection
//! fails the run.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::abort::AbortSignal;
use super::checkpoint_gate::CheckpointGate;
use super::stage_executor::StageExecutor;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    CheckpointDecision, CheckpointRequest, ExecutionContext, MemoryEntry, RunState,
    RunStateMachine, Stage, StageOutput,
};
use crate::domain::ports::MemoryRepository;

pub struct StageRunner {
    executor: StageExecutor,
    gate: CheckpointGate,
    memory: Arc<dyn MemoryRepository>,
    abort: AbortSignal,
}

impl StageRunner {
    pub fn new(
        executor: StageExecutor,
        gate: CheckpointGate,
        memory: Arc<dyn MemoryRepository>,
        abort: AbortSignal,
    ) -> Self {
        Self {
            executor,
            gate,
            memory,
            abort,
        }
    }

    pub fn abort_signal(&self) -> &AbortSignal {
        &self.abort
    }

    /// Drive one stage to an accepted output.
    #[instrument(skip_all, fields(investigation_id = %ctx.investigation_id, stage_index = stage.index, worker = %stage.worker))]
    pub async fn attempt(
        &self,
        ctx: &mut ExecutionContext,
        machine: &mut RunStateMachine,
        stage: &Stage,
        instructions: Option<String>,
    ) -> DomainResult<StageOutput> {
        let mut feedback: Vec<String> = Vec::new();
        let mut attempts: u32 = 0;

        let output = loop {
            self.abort.check()?;
            machine.transition(RunState::Running { stage_index: stage.index })?;
            attempts += 1;

            let output = self
                .abort
                .guard(self.executor.execute(ctx, stage, instructions.clone(), &feedback))
                .await?;

            if !stage.human_checkpoint {
                break output;
            }

            self.abort.check()?;
            machine.transition(RunState::AwaitingHuman { stage_index: stage.index })?;
            let request = CheckpointRequest {
                investigation_id: ctx.investigation_id.to_string(),
                stage_index: stage.index,
                stage_title: stage.title.clone(),
                worker: stage.worker.to_string(),
                attempt: attempts,
                proposed_output: output.clone(),
            };
            let decision = self
                .abort
                .guard(async { Ok(self.gate.review(&request).await) })
                .await?;

            match decision {
                CheckpointDecision::Accept => break output,
                CheckpointDecision::Reject { feedback: note } => {
                    if attempts > self.gate.max_revisions() {
                        warn!(rejections = attempts, "revision limit reached, failing the run");
                        return Err(DomainError::RevisionLimitExceeded {
                            stage_index: stage.index,
                            rejections: attempts,
                        });
                    }
                    info!(attempt = attempts, "stage rejected at checkpoint, rerunning");
                    feedback.push(note);
                }
                CheckpointDecision::Abort => {
                    info!("operator aborted the investigation");
                    return Err(DomainError::HumanAbort { stage_index: stage.index });
                }
            }
        };

        let record = StageOutput::new(stage, output, attempts);
        self.remember(ctx, &record).await;
        ctx.record(record.clone());
        info!(attempts, "stage completed");
        Ok(record)
    }

    /// Persist an accepted output. Failures are logged, never fatal.
    async fn remember(&self, ctx: &ExecutionContext, record: &StageOutput) {
        let entry = MemoryEntry::from_stage_output(&ctx.investigation_id, &ctx.target, record);
        if let Err(e) = self.memory.store(&entry).await {
            warn!(error = %e, "failed to persist stage output to memory");
        }
    }
}
