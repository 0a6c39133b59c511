//! Single stage invocation: runtime call, bounded delegation, output contract.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use tracing::{debug, info, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{DelegationLink, ExecutionContext, Profile, Stage, Worker, NO_DATA_FOUND};
use crate::domain::ports::{DelegatedAnswer, RequestKind, StageRequest, WorkerRuntime, WorkerTurn};

/// Sub-questions one worker may ask within a single invocation.
const MAX_CONSULTATIONS: usize = 3;

pub struct StageExecutor {
    profile: Arc<Profile>,
    runtime: Arc<dyn WorkerRuntime>,
    max_delegation_depth: usize,
}

impl StageExecutor {
    pub fn new(profile: Arc<Profile>, runtime: Arc<dyn WorkerRuntime>, max_delegation_depth: usize) -> Self {
        Self {
            profile,
            runtime,
            max_delegation_depth,
        }
    }

    /// Run `stage` once and return its contract-conforming output.
    ///
    /// The worker sees the target, every completed output and any prior
    /// findings read-only. Runtime errors are absorbed into the output.
    pub async fn execute(
        &self,
        ctx: &mut ExecutionContext,
        stage: &Stage,
        instructions: Option<String>,
        feedback: &[String],
    ) -> DomainResult<String> {
        let worker = self
            .profile
            .roster
            .get(&stage.worker)
            .ok_or_else(|| DomainError::WorkerNotFound(stage.worker.to_string()))?;

        let request = StageRequest {
            investigation_id: ctx.investigation_id.to_string(),
            target: ctx.target.clone(),
            stage: stage.clone(),
            kind: RequestKind::Stage,
            instructions,
            background: ctx.completed().to_vec(),
            prior_findings: ctx.prior_findings().to_vec(),
            feedback: feedback.to_vec(),
            delegated: Vec::new(),
        };

        let raw = self.resolve(ctx, worker, request, 0).await?;
        let (output, violation) = stage.expected_output.enforce(raw);
        if let Some(violation) = violation {
            warn!(
                investigation_id = %ctx.investigation_id,
                stage_index = stage.index,
                worker = %stage.worker,
                %violation,
                "output contract violated, normalized"
            );
        }
        Ok(output)
    }

    /// Execute `request` for `worker`, answering delegations until the worker
    /// returns a final output or the depth cap forces its draft.
    fn resolve<'a>(
        &'a self,
        ctx: &'a mut ExecutionContext,
        worker: &'a Worker,
        mut request: StageRequest,
        depth: usize,
    ) -> BoxFuture<'a, DomainResult<String>> {
        async move {
            loop {
                let turn = match self.runtime.execute(worker, &request).await {
                    Ok(turn) => turn,
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(e) => {
                        warn!(worker = %worker.id, stage_index = request.stage.index, error = %e, "worker runtime failed");
                        return Ok(format!(
                            "Gaps:\n- {} could not complete this request: {e}\n\n{NO_DATA_FOUND}\n",
                            worker.id
                        ));
                    }
                };

                let (to, question, draft) = match turn {
                    WorkerTurn::Final(output) => return Ok(output),
                    WorkerTurn::Delegate { to, question, draft } => (to, question, draft),
                };

                if !worker.delegation_allowed
                    || depth >= self.max_delegation_depth
                    || request.delegated.len() >= MAX_CONSULTATIONS
                {
                    info!(worker = %worker.id, depth, "delegation cap reached, returning draft");
                    return Ok(draft);
                }

                let delegate = match self.profile.roster.get(&to) {
                    Some(d) if d.id != worker.id => d,
                    _ => {
                        warn!(worker = %worker.id, to = %to, "invalid delegation target, returning draft");
                        return Ok(draft);
                    }
                };
                if ctx.delegation_chain().iter().any(|link| link.from == to) {
                    warn!(worker = %worker.id, to = %to, "delegation cycle, returning draft");
                    return Ok(draft);
                }

                debug!(from = %worker.id, to = %to, question = %question, depth, "delegating sub-question");
                ctx.push_delegation(DelegationLink {
                    from: worker.id.clone(),
                    to: to.clone(),
                    question: question.clone(),
                });
                let sub_request = request.sub_question(worker.id.clone(), question.clone());
                let answer = self.resolve(ctx, delegate, sub_request, depth + 1).await;
                ctx.pop_delegation();

                request.delegated.push(DelegatedAnswer {
                    worker: to,
                    question,
                    answer: answer?,
                });
            }
        }
        .boxed()
    }
}
