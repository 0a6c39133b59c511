//! Implementation of the `osint-swarm plan` command.

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};
use serde::Serialize;

use super::{resolve_profile, PROFILE_NAMES};
use crate::cli::output::{output, truncate, CommandOutput};
use crate::domain::models::{Config, ExecutionModel, InvestigationPlan, TargetTraits};
use crate::domain::ports::Manager;
use crate::services::{build_plan, RuleBasedManager};

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Target to plan for
    pub target: String,

    /// Investigation profile (defaults to the configured profile)
    #[arg(short, long, value_parser = PROFILE_NAMES)]
    pub profile: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StageRow {
    pub index: usize,
    pub title: String,
    pub dimension: String,
    pub worker: String,
    pub checkpoint: bool,
    pub queries: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PlanOutput {
    pub target: String,
    pub profile: String,
    pub model: ExecutionModel,
    pub stages: Vec<StageRow>,
    /// Manager's planned stage order; hierarchical model with planning only
    pub agenda: Option<Vec<usize>>,
}

impl PlanOutput {
    fn from_plan(plan: &InvestigationPlan, profile: &str, agenda: Option<Vec<usize>>) -> Self {
        Self {
            target: plan.target.clone(),
            profile: profile.to_string(),
            model: plan.model,
            stages: plan
                .stages()
                .iter()
                .map(|s| StageRow {
                    index: s.index,
                    title: s.title.clone(),
                    dimension: s.dimension.as_str().to_string(),
                    worker: s.worker.to_string(),
                    checkpoint: s.human_checkpoint,
                    queries: s.queries.clone(),
                })
                .collect(),
            agenda,
        }
    }
}

impl CommandOutput for PlanOutput {
    fn to_human(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL_CONDENSED)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("#").add_attribute(Attribute::Bold),
                Cell::new("Stage").add_attribute(Attribute::Bold),
                Cell::new("Worker").add_attribute(Attribute::Bold),
                Cell::new("Checkpoint").add_attribute(Attribute::Bold),
                Cell::new("Queries").add_attribute(Attribute::Bold),
            ]);

        for stage in &self.stages {
            table.add_row(vec![
                Cell::new(stage.index + 1),
                Cell::new(&stage.title),
                Cell::new(&stage.worker),
                Cell::new(if stage.checkpoint { "yes" } else { "-" }),
                Cell::new(truncate(&stage.queries.join("; "), 60)),
            ]);
        }

        let mut lines = vec![
            format!("Target:  {}", self.target),
            format!("Profile: {} ({})", self.profile, self.model),
            table.to_string(),
        ];
        if let Some(agenda) = &self.agenda {
            let order: Vec<String> = agenda.iter().map(|i| (i + 1).to_string()).collect();
            lines.push(format!("Manager agenda: {}", order.join(" -> ")));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn execute(args: PlanArgs, config: &Config, json_mode: bool) -> Result<()> {
    let profile = resolve_profile(args.profile.as_deref(), config)?;
    let target = profile.normalize_target(&args.target);
    let plan = build_plan(&profile, &target).context("Failed to build investigation plan")?;

    let planning = config
        .orchestration
        .planning
        .unwrap_or(profile.planning_default);
    let agenda = (plan.model == ExecutionModel::Hierarchical && planning)
        .then(|| RuleBasedManager::new().plan(&plan, &TargetTraits::detect(&plan.target)));

    output(
        &PlanOutput::from_plan(&plan, profile.kind.as_str(), agenda),
        json_mode,
    );
    Ok(())
}
