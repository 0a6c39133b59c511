//! Investigation plan construction.

use tracing::debug;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{InvestigationPlan, Profile};

/// Build the plan for `target` from the profile's dimensions.
///
/// Pure function of the target and the profile: one stage per dimension, in
/// dimension order, with `{target}` substituted. Any target string is
/// accepted. Fails only when a dimension names a worker the roster lacks.
pub fn build_plan(profile: &Profile, target: &str) -> DomainResult<InvestigationPlan> {
    if profile.templates.is_empty() {
        return Err(DomainError::PlanConstruction(format!(
            "profile '{}' declares no dimensions",
            profile.kind
        )));
    }

    let mut stages = Vec::with_capacity(profile.templates.len());
    for (index, template) in profile.templates.iter().enumerate() {
        if !profile.roster.contains(&template.worker) {
            return Err(DomainError::PlanConstruction(format!(
                "dimension '{}' is bound to worker '{}', which is not in the roster",
                template.title, template.worker
            )));
        }
        stages.push(template.render(index, target));
    }

    debug!(profile = %profile.kind, stages = stages.len(), "built investigation plan");
    Ok(InvestigationPlan::new(target, profile.model, stages))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Dimension, ExecutionModel, StageTemplate};

    #[test]
    fn test_darknet_plan_has_checkpoint_on_every_stage() {
        let plan = build_plan(&Profile::darknet().unwrap(), "alice").unwrap();
        assert_eq!(plan.len(), 5);
        assert_eq!(plan.model, ExecutionModel::Sequential);
        assert_eq!(plan.checkpoint_count(), 5);
        assert!(plan.stages().iter().all(|s| s.description.contains("alice")));
    }

    #[test]
    fn test_osint_plan_order() {
        let plan = build_plan(&Profile::osint().unwrap(), "user@example.com").unwrap();
        let dims: Vec<Dimension> = plan.stages().iter().map(|s| s.dimension).collect();
        assert_eq!(
            dims,
            vec![
                Dimension::Reconnaissance,
                Dimension::Social,
                Dimension::Technical,
                Dimension::Behavioral,
                Dimension::Synthesis,
                Dimension::DeepSearch,
                Dimension::Verification,
            ]
        );
        assert_eq!(plan.checkpoint_count(), 0);
    }

    #[test]
    fn test_empty_target_is_accepted() {
        let plan = build_plan(&Profile::darknet().unwrap(), "").unwrap();
        assert_eq!(plan.target, "");
        assert_eq!(plan.len(), 5);
    }

    #[test]
    fn test_unknown_worker_is_rejected() {
        let mut profile = Profile::darknet().unwrap();
        profile
            .templates
            .push(StageTemplate::new(Dimension::Social, "Social", "ghost", "{target}", "x"));

        let err = build_plan(&profile, "alice").unwrap_err();
        assert!(matches!(err, DomainError::PlanConstruction(_)));
        assert!(err.is_fatal());
    }
}
