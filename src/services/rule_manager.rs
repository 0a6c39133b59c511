//! Deterministic manager driven by target characteristics.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Dimension, InvestigationPlan, Relevance, Stage, TargetTraits};
use crate::domain::ports::{Manager, ManagerDecision, ManagerView};

/// Walks its agenda once and finishes.
///
/// The planning pass keeps plan order for relevant dimensions, defers
/// dimensions the target gives little to work with, then runs synthesis and
/// finally verification. Deferred stages still run, with brief-pass
/// instructions.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedManager;

impl RuleBasedManager {
    pub fn new() -> Self {
        Self
    }

    fn rank(stage: &Stage, traits: &TargetTraits) -> u8 {
        match stage.dimension {
            d if d.is_terminal() => 3,
            Dimension::Synthesis => 2,
            d if d.relevance(traits) == Relevance::Low => 1,
            _ => 0,
        }
    }

    fn instructions(stage: &Stage, view: &ManagerView<'_>) -> String {
        let target = &view.plan.target;
        if stage.dimension.relevance(view.traits) == Relevance::Low {
            return format!(
                "Brief pass: {target} shows no {} identifiers; report only what is readily found.",
                match stage.dimension {
                    Dimension::FinancialTrail => "cryptocurrency",
                    _ => "e-mail, domain or IP",
                }
            );
        }
        match stage.dimension {
            Dimension::Synthesis | Dimension::Verification if !view.completed.is_empty() => {
                let sections: Vec<&str> = view.completed.iter().map(|o| o.title.as_str()).collect();
                format!("Work from the findings of: {}.", sections.join(", "))
            }
            _ => format!("Focus on {} leads for {target}.", stage.dimension.as_str().replace('_', " ")),
        }
    }
}

#[async_trait]
impl Manager for RuleBasedManager {
    fn plan(&self, plan: &InvestigationPlan, traits: &TargetTraits) -> Vec<usize> {
        let mut agenda: Vec<usize> = (0..plan.len()).collect();
        agenda.sort_by_key(|&i| plan.stage(i).map_or(u8::MAX, |s| Self::rank(s, traits)));
        agenda
    }

    async fn next(&self, view: ManagerView<'_>) -> DomainResult<ManagerDecision> {
        let Some(stage_index) = view.next_pending() else {
            return Ok(ManagerDecision::Finish);
        };
        let instructions = view
            .plan
            .stage(stage_index)
            .map(|stage| Self::instructions(stage, &view));
        Ok(ManagerDecision::Invoke {
            stage_index,
            instructions,
        })
    }
}
