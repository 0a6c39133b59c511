//! Interactive checkpoint on the controlling terminal.

use std::io::BufRead;

use async_trait::async_trait;
use console::style;

use crate::domain::models::{CheckpointDecision, CheckpointRequest};
use crate::domain::ports::HumanCheckpoint;

/// Prints the proposed output to stderr and reads the decision from stdin.
///
/// Answers: empty or `a` accepts, `r <feedback>` rejects, `q` aborts.
/// End of input aborts the run.
#[derive(Debug, Clone, Default)]
pub struct ConsoleCheckpoint;

impl ConsoleCheckpoint {
    pub fn new() -> Self {
        Self
    }
}

/// Parse one operator answer; `None` means the answer was not understood.
pub fn parse_answer(line: &str) -> Option<CheckpointDecision> {
    let line = line.trim();
    let (command, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(c, r)| (c, r.trim()));

    match command.to_lowercase().as_str() {
        "" | "a" | "accept" | "y" | "yes" => Some(CheckpointDecision::Accept),
        "r" | "reject" => Some(CheckpointDecision::reject(rest)),
        "q" | "quit" | "abort" => Some(CheckpointDecision::Abort),
        _ => None,
    }
}

fn render(request: &CheckpointRequest) {
    eprintln!();
    eprintln!(
        "{} stage {} \"{}\" by {} (attempt {})",
        style("Checkpoint:").bold().yellow(),
        request.stage_index + 1,
        request.stage_title,
        request.worker,
        request.attempt
    );
    eprintln!("{}", style("-".repeat(50)).dim());
    eprintln!("{}", request.proposed_output.trim_end());
    eprintln!("{}", style("-".repeat(50)).dim());
}

fn prompt_blocking() -> CheckpointDecision {
    let stdin = std::io::stdin();
    loop {
        eprint!("{} ", style("[a]ccept / [r]eject <feedback> / [q]uit >").cyan());
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => return CheckpointDecision::Abort,
            Ok(_) => {}
        }
        if let Some(decision) = parse_answer(&line) {
            return decision;
        }
        eprintln!("{}", style("Unrecognized answer.").red());
    }
}

#[async_trait]
impl HumanCheckpoint for ConsoleCheckpoint {
    async fn review(&self, request: &CheckpointRequest) -> CheckpointDecision {
        render(request);
        match tokio::task::spawn_blocking(prompt_blocking).await {
            Ok(decision) => decision,
            Err(e) => {
                tracing::warn!(error = %e, "checkpoint prompt failed; aborting");
                CheckpointDecision::Abort
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_answer() {
        assert_eq!(parse_answer("\n"), Some(CheckpointDecision::Accept));
        assert_eq!(parse_answer("A"), Some(CheckpointDecision::Accept));
        assert_eq!(
            parse_answer("r  check the second forum  "),
            Some(CheckpointDecision::reject("check the second forum"))
        );
        assert_eq!(parse_answer("reject"), Some(CheckpointDecision::reject("")));
        assert_eq!(parse_answer("q"), Some(CheckpointDecision::Abort));
        assert_eq!(parse_answer("maybe"), None);
    }
}
