//! Memory CLI commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;

use super::open_memory_store;
use crate::cli::output::{output, truncate, CommandOutput};
use crate::domain::models::{Config, MemoryEntry};
use crate::domain::ports::MemoryRepository;

#[derive(Args, Debug)]
pub struct MemoryArgs {
    #[command(subcommand)]
    pub command: MemoryCommands,
}

#[derive(Subcommand, Debug)]
pub enum MemoryCommands {
    /// List the stage outputs stored by one investigation
    List {
        /// Investigation ID (e.g. darknet_20240305_070809_1a2b3c4d)
        investigation_id: String,
    },
    /// Show what earlier investigations recorded about a target
    Recall {
        /// Target string
        target: String,
        /// Maximum number of entries
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
}

#[derive(Debug, Serialize)]
pub struct MemoryListOutput {
    pub heading: String,
    pub entries: Vec<MemoryEntry>,
}

impl CommandOutput for MemoryListOutput {
    fn to_human(&self) -> String {
        if self.entries.is_empty() {
            return format!("{}\nNo memory entries found.", self.heading);
        }

        let mut lines = vec![self.heading.clone(), String::new()];
        lines.push(format!(
            "{:<32} {:<3} {:<28} {:<20}",
            "INVESTIGATION", "#", "STAGE", "RECORDED"
        ));
        lines.push("-".repeat(86));
        for entry in &self.entries {
            lines.push(format!(
                "{:<32} {:<3} {:<28} {:<20}",
                truncate(&entry.investigation_id, 32),
                entry.stage_index + 1,
                truncate(&entry.stage_title, 28),
                entry.created_at.format("%Y-%m-%d %H:%M:%S")
            ));
            let first_line = entry.content.lines().next().unwrap_or_default();
            lines.push(format!("    {}", truncate(first_line, 80)));
        }
        lines.push(format!(
            "\nShowing {} entr{}",
            self.entries.len(),
            if self.entries.len() == 1 { "y" } else { "ies" }
        ));
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: MemoryArgs, config: &Config, json_mode: bool) -> Result<()> {
    let store = open_memory_store(config).await?;

    let out = match args.command {
        MemoryCommands::List { investigation_id } => {
            let entries = store
                .list(&investigation_id)
                .await
                .context("Failed to list memory entries")?;
            MemoryListOutput {
                heading: format!("Memory for investigation {investigation_id}"),
                entries,
            }
        }
        MemoryCommands::Recall { target, limit } => {
            let entries = store
                .recall(target.trim(), None, limit)
                .await
                .context("Failed to recall memory entries")?;
            MemoryListOutput {
                heading: format!("Prior findings for target {}", target.trim()),
                entries,
            }
        }
    };

    output(&out, json_mode);
    Ok(())
}
