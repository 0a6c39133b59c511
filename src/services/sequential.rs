//! Sequential execution model: strict plan order.

use tracing::{info, instrument, warn};

use super::stage_runner::StageRunner;
use crate::domain::errors::DomainResult;
use crate::domain::models::{
    ExecutionContext, ExecutionModel, InvestigationPlan, InvestigationResult, RunState, RunStateMachine,
};

pub struct SequentialOrchestrator {
    runner: StageRunner,
}

impl SequentialOrchestrator {
    pub fn new(runner: StageRunner) -> Self {
        Self { runner }
    }

    /// Run every stage once, in plan order.
    ///
    /// Stage `i + 1` never starts before stage `i` is accepted. An abort at
    /// any point leaves the machine in `Failed` and returns the error.
    #[instrument(skip_all, fields(investigation_id = %ctx.investigation_id, stages = plan.len()))]
    pub async fn run(
        &self,
        plan: &InvestigationPlan,
        mut ctx: ExecutionContext,
        machine: &mut RunStateMachine,
    ) -> DomainResult<InvestigationResult> {
        match self.walk(plan, &mut ctx, machine).await {
            Ok(()) => {
                machine.transition(RunState::Completed)?;
                info!(records = ctx.completed().len(), "investigation completed");
                Ok(ctx.into_result(ExecutionModel::Sequential))
            }
            Err(e) => {
                if let Err(transition) = machine.fail(e.to_string()) {
                    warn!(error = %transition, "could not record run failure");
                }
                Err(e)
            }
        }
    }

    async fn walk(
        &self,
        plan: &InvestigationPlan,
        ctx: &mut ExecutionContext,
        machine: &mut RunStateMachine,
    ) -> DomainResult<()> {
        for stage in plan.stages() {
            self.runner.attempt(ctx, machine, stage, None).await?;
        }
        self.runner.abort_signal().check()
    }
}
