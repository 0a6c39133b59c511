//! Implementation of the `osint-swarm investigate` command.

use std::io::{BufRead, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use serde::Serialize;
use tracing::warn;

use super::{open_memory_store, resolve_profile, PROFILE_NAMES};
use crate::adapters::checkpoint::{AutoAcceptCheckpoint, ConsoleCheckpoint};
use crate::adapters::providers::{scrape_provider, search_provider};
use crate::adapters::runtime::ResearchRuntime;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Config, ExecutionModel, Profile, RunState};
use crate::domain::ports::{HumanCheckpoint, MemoryRepository, NullMemoryRepository};
use crate::services::{abort_pair, InvestigationOutcome, InvestigationService, RunSettings};

#[derive(Args, Debug)]
pub struct InvestigateArgs {
    /// Target to investigate (read from stdin when omitted)
    pub target: Option<String>,

    /// Investigation profile (defaults to the configured profile)
    #[arg(short, long, value_parser = PROFILE_NAMES)]
    pub profile: Option<String>,

    /// Accept every checkpoint without prompting
    #[arg(short, long)]
    pub auto_accept: bool,

    /// Use the cross-run memory store
    #[arg(long, conflicts_with = "no_memory")]
    pub memory: bool,

    /// Do not use the cross-run memory store
    #[arg(long)]
    pub no_memory: bool,

    /// Skip the manager's planning pre-pass
    #[arg(long)]
    pub no_planning: bool,

    /// Directory receiving the report file
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

impl InvestigateArgs {
    /// Memory flag override; `None` defers to configuration and profile.
    pub fn memory_override(&self) -> Option<bool> {
        if self.memory {
            Some(true)
        } else if self.no_memory {
            Some(false)
        } else {
            None
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SectionSummary {
    pub stage_index: usize,
    pub title: String,
    pub worker: String,
    pub attempts: u32,
}

#[derive(Debug, Serialize)]
pub struct InvestigateOutput {
    pub investigation_id: String,
    pub target: String,
    pub profile: String,
    pub model: ExecutionModel,
    pub final_state: RunState,
    pub sections: Vec<SectionSummary>,
    pub body: String,
    pub report_path: Option<PathBuf>,
    pub report_error: Option<String>,
}

impl InvestigateOutput {
    fn new(profile: &Profile, outcome: InvestigationOutcome) -> Self {
        let InvestigationOutcome {
            result,
            report,
            final_state,
        } = outcome;
        let (report_path, report_error) = match report {
            Ok(path) => (Some(path), None),
            Err(e) => (None, Some(e.to_string())),
        };

        Self {
            investigation_id: result.investigation_id.to_string(),
            target: result.target.clone(),
            profile: profile.kind.as_str().to_string(),
            model: result.model,
            final_state,
            sections: result
                .records
                .iter()
                .map(|r| SectionSummary {
                    stage_index: r.stage_index,
                    title: r.title.clone(),
                    worker: r.worker.to_string(),
                    attempts: r.attempts,
                })
                .collect(),
            body: result.body(),
            report_path,
            report_error,
        }
    }
}

impl CommandOutput for InvestigateOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![
            format!(
                "{} {} ({} profile, {})",
                style("Investigation").bold(),
                self.investigation_id,
                self.profile,
                self.model
            ),
            format!("Target: {}", self.target),
            String::new(),
            self.body.trim_end().to_string(),
            String::new(),
        ];
        match (&self.report_path, &self.report_error) {
            (Some(path), _) => lines.push(format!(
                "{} {}",
                style("Report saved to").green(),
                path.display()
            )),
            (None, Some(err)) => lines.push(format!(
                "{} {err}",
                style("Report could not be written:").red()
            )),
            (None, None) => {}
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: InvestigateArgs, config: &Config, json_mode: bool) -> Result<()> {
    let out = run(args, config).await?;
    output(&out, json_mode);
    Ok(())
}

/// Run one investigation. An empty target is investigated as given; the
/// workers report that nothing was found.
pub async fn run(args: InvestigateArgs, config: &Config) -> Result<InvestigateOutput> {
    let profile = resolve_profile(args.profile.as_deref(), config)?;

    let raw_target = match args.target.clone() {
        Some(target) => target,
        None => tokio::task::spawn_blocking(read_target_from_stdin)
            .await
            .context("Failed to read target")??,
    };

    let mut settings = RunSettings::from_config(config, &profile);
    if args.no_planning {
        settings.planning = false;
    }
    if let Some(dir) = &args.output_dir {
        settings.output_dir.clone_from(dir);
    }

    let runtime = Arc::new(ResearchRuntime::new(
        search_provider(config),
        scrape_provider(config),
        profile.roster.clone(),
        profile.search_options(&config.search),
    ));

    let checkpoint: Arc<dyn HumanCheckpoint> = if args.auto_accept {
        Arc::new(AutoAcceptCheckpoint)
    } else {
        Arc::new(ConsoleCheckpoint::new())
    };

    let memory: Arc<dyn MemoryRepository> = if profile.memory_enabled(
        args.memory_override().or(config.memory.enabled),
    ) {
        match open_memory_store(config).await {
            Ok(store) => Arc::new(store),
            Err(e) => {
                warn!(error = %format!("{e:#}"), "memory store unavailable; continuing without it");
                Arc::new(NullMemoryRepository::new())
            }
        }
    } else {
        Arc::new(NullMemoryRepository::new())
    };

    let service = InvestigationService::new(profile.clone(), runtime, checkpoint)
        .with_memory(memory)
        .with_settings(settings);

    let (handle, signal) = abort_pair();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\n{}", style("Interrupted; stopping investigation").yellow());
            handle.abort();
        }
    });

    let outcome = service.investigate(&raw_target, signal).await;
    ctrl_c.abort();
    let outcome = outcome.context("Investigation did not complete")?;

    Ok(InvestigateOutput::new(&profile, outcome))
}

fn read_target_from_stdin() -> Result<String> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        eprint!("{} ", style("Target:").cyan().bold());
    }
    let mut line = String::new();
    stdin
        .lock()
        .read_line(&mut line)
        .context("Failed to read target from stdin")?;
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_config(output_dir: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.search.provider = "none".to_string();
        config.report.output_dir = output_dir.to_path_buf();
        config
    }

    fn args(target: &str, output_dir: &std::path::Path) -> InvestigateArgs {
        InvestigateArgs {
            target: Some(target.to_string()),
            profile: Some("darknet".to_string()),
            auto_accept: true,
            memory: false,
            no_memory: true,
            no_planning: false,
            output_dir: Some(output_dir.to_path_buf()),
        }
    }

    #[tokio::test]
    async fn test_empty_target_runs_to_completion() {
        let dir = tempfile::tempdir().unwrap();
        let config = offline_config(dir.path());

        let out = run(args("", dir.path()), &config).await.unwrap();

        assert_eq!(out.target, "");
        assert_eq!(out.final_state, RunState::Completed);
        assert_eq!(out.sections.len(), 5);
        let sections: Vec<&str> = out.body.split("----- Section ").skip(1).collect();
        assert_eq!(sections.len(), 5);
        assert!(sections.iter().all(|s| s.contains("No data found")));
        let report = out.report_path.expect("report written");
        assert!(report.starts_with(dir.path()));
        assert!(report.exists());
    }

    #[tokio::test]
    async fn test_output_dir_flag_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let elsewhere = dir.path().join("custom");
        let config = offline_config(&dir.path().join("configured"));

        let out = run(args("example_handle_42", &elsewhere), &config).await.unwrap();

        let report = out.report_path.expect("report written");
        assert!(report.starts_with(&elsewhere));
        assert!(std::fs::read_to_string(report).unwrap().contains("example_handle_42"));
    }
}
