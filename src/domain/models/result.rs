//! Aggregated investigation result.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::context::{InvestigationId, StageOutput};
use super::profile::ExecutionModel;

/// Immutable outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvestigationResult {
    pub investigation_id: InvestigationId,
    pub target: String,
    pub model: ExecutionModel,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Stage outputs in completion order
    pub records: Vec<StageOutput>,
}

impl InvestigationResult {
    /// Stage outputs concatenated in completion order with boundary separators.
    pub fn body(&self) -> String {
        let mut body = String::new();
        for (n, record) in self.records.iter().enumerate() {
            if n > 0 {
                body.push('\n');
            }
            body.push_str(&stage_separator(n + 1, record));
            body.push_str("\n\n");
            body.push_str(record.output.trim_end());
            body.push('\n');
        }
        body
    }

    /// Distinct stage indices covered by the records.
    pub fn covered_stages(&self) -> Vec<usize> {
        let mut covered: Vec<usize> = self.records.iter().map(|r| r.stage_index).collect();
        covered.sort_unstable();
        covered.dedup();
        covered
    }
}

fn stage_separator(position: usize, record: &StageOutput) -> String {
    format!(
        "----- Section {}: {} [{}] -----",
        position, record.title, record.worker
    )
}
