//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::init::InitArgs;
use super::commands::investigate::InvestigateArgs;
use super::commands::memory::MemoryArgs;
use super::commands::plan::PlanArgs;

#[derive(Parser, Debug)]
#[command(name = "osint-swarm")]
#[command(about = "osint-swarm - multi-worker OSINT investigation orchestrator", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to .osint-swarm/config.yaml and local.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level regardless of configuration
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one investigation and write its report
    Investigate(InvestigateArgs),

    /// Show the investigation plan for a target without running it
    Plan(PlanArgs),

    /// Inspect the cross-run memory store
    Memory(MemoryArgs),

    /// Write default configuration and create the results directory
    Init(InitArgs),
}
