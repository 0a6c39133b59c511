//! Hierarchical execution model: a manager picks every step.
//!
//! The manager may reorder, skip or repeat stages. The run is bounded by
//! `3 x stage count` manager steps, and a coverage pass attempts every stage
//! the manager never invoked before the run completes.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::stage_runner::StageRunner;
use crate::domain::errors::DomainResult;
use crate::domain::models::{
    ExecutionContext, ExecutionModel, InvestigationPlan, InvestigationResult, RunState, RunStateMachine,
    TargetTraits,
};
use crate::domain::ports::{Manager, ManagerDecision, ManagerView};

const STEPS_PER_STAGE: usize = 3;

pub struct HierarchicalOrchestrator {
    runner: StageRunner,
    manager: Arc<dyn Manager>,
    planning: bool,
}

impl HierarchicalOrchestrator {
    pub fn new(runner: StageRunner, manager: Arc<dyn Manager>, planning: bool) -> Self {
        Self {
            runner,
            manager,
            planning,
        }
    }

    #[instrument(skip_all, fields(investigation_id = %ctx.investigation_id, stages = plan.len(), planning = self.planning))]
    pub async fn run(
        &self,
        plan: &InvestigationPlan,
        mut ctx: ExecutionContext,
        machine: &mut RunStateMachine,
    ) -> DomainResult<InvestigationResult> {
        match self.manage(plan, &mut ctx, machine).await {
            Ok(()) => {
                machine.transition(RunState::Completed)?;
                info!(records = ctx.completed().len(), "investigation completed");
                Ok(ctx.into_result(ExecutionModel::Hierarchical))
            }
            Err(e) => {
                if let Err(transition) = machine.fail(e.to_string()) {
                    warn!(error = %transition, "could not record run failure");
                }
                Err(e)
            }
        }
    }

    async fn manage(
        &self,
        plan: &InvestigationPlan,
        ctx: &mut ExecutionContext,
        machine: &mut RunStateMachine,
    ) -> DomainResult<()> {
        let abort = self.runner.abort_signal();
        let traits = TargetTraits::detect(&plan.target);
        let agenda = if self.planning {
            normalize_agenda(self.manager.plan(plan, &traits), plan.len())
        } else {
            (0..plan.len()).collect()
        };
        info!(?agenda, "manager agenda");

        let max_steps = STEPS_PER_STAGE * plan.len();
        let mut skipped: Vec<usize> = Vec::new();
        let mut finished = false;

        for step in 0..max_steps {
            abort.check()?;
            let view = ManagerView {
                plan,
                traits: &traits,
                agenda: &agenda,
                completed: ctx.completed(),
                skipped: &skipped,
                step,
            };
            let decision = match self.manager.next(view).await {
                Ok(decision) => decision,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(step, error = %e, "manager failed, moving to coverage check");
                    finished = true;
                    break;
                }
            };

            match decision {
                ManagerDecision::Invoke { stage_index, instructions } => match plan.stage(stage_index) {
                    Some(stage) => {
                        self.runner.attempt(ctx, machine, stage, instructions).await?;
                    }
                    None => warn!(step, stage_index, "manager invoked an unknown stage"),
                },
                ManagerDecision::Skip { stage_index, reason } => {
                    info!(step, stage_index, %reason, "manager skipped stage");
                    if !skipped.contains(&stage_index) {
                        skipped.push(stage_index);
                    }
                }
                ManagerDecision::Finish => {
                    finished = true;
                    break;
                }
            }
        }

        if !finished {
            warn!(max_steps, "manager step bound reached");
        }

        for stage in plan.stages() {
            if ctx.has_attempted(stage.index) {
                continue;
            }
            info!(stage_index = stage.index, "coverage check: stage never attempted");
            let note = format!("Coverage pass: the manager did not schedule \"{}\".", stage.title);
            self.runner.attempt(ctx, machine, stage, Some(note)).await?;
        }

        abort.check()
    }
}

/// Keep valid, first-seen indices and append any the manager left out.
fn normalize_agenda(proposed: Vec<usize>, len: usize) -> Vec<usize> {
    let mut agenda: Vec<usize> = Vec::with_capacity(len);
    for index in proposed {
        if index < len && !agenda.contains(&index) {
            agenda.push(index);
        }
    }
    for index in 0..len {
        if !agenda.contains(&index) {
            agenda.push(index);
        }
    }
    agenda
}
