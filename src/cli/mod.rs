//! Command-line interface.

pub mod commands;
pub mod output;
pub mod types;

pub use types::{Cli, Commands};

use anyhow::Result;
use console::style;

use crate::domain::errors::DomainError;
use crate::infrastructure::logging::LoggerImpl;

/// Exit code used when the operator or Ctrl-C stops a run.
pub const EXIT_ABORTED: i32 = 130;

/// Load configuration, install logging and dispatch the subcommand.
pub async fn run(cli: Cli) -> Result<()> {
    let Cli {
        command,
        json,
        config,
        verbose,
    } = cli;

    if let Commands::Init(args) = command {
        return commands::init::execute(args, json).await;
    }

    let config = commands::load_config(config.as_deref())?;
    let mut logging = config.logging.clone();
    if verbose {
        logging.level = "debug".to_string();
    }
    let _logger = LoggerImpl::init(&logging)?;

    match command {
        Commands::Investigate(args) => commands::investigate::execute(args, &config, json).await,
        Commands::Plan(args) => commands::plan::execute(args, &config, json),
        Commands::Memory(args) => commands::memory::execute(args, &config, json).await,
        Commands::Init(_) => Ok(()),
    }
}

/// Print an error and exit the process with a non-zero status.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    let code = match err.downcast_ref::<DomainError>() {
        Some(DomainError::HumanAbort { .. } | DomainError::Cancelled) => EXIT_ABORTED,
        _ => 1,
    };

    if json_mode {
        let chain: Vec<String> = err.chain().skip(1).map(ToString::to_string).collect();
        let body = serde_json::json!({
            "error": err.to_string(),
            "causes": chain,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&body).unwrap_or_default()
        );
    } else {
        eprintln!("{} {err}", style("Error:").red().bold());
        for cause in err.chain().skip(1) {
            eprintln!("  {} {cause}", style("caused by:").dim());
        }
    }

    std::process::exit(code)
}
