//! Cross-run memory domain model.
//!
//! A memory entry is one accepted stage output, keyed by investigation id and
//! stage index. Each run writes only under its own id; other runs may read
//! entries for the same target as background.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::context::{InvestigationId, StageOutput};

/// Persisted stage output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub id: Uuid,
    pub investigation_id: String,
    pub target: String,
    pub stage_index: u32,
    pub stage_title: String,
    pub worker: String,
    /// Opaque blob; the core enforces no schema
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl MemoryEntry {
    pub fn from_stage_output(
        investigation_id: &InvestigationId,
        target: &str,
        output: &StageOutput,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            investigation_id: investigation_id.as_str().to_string(),
            target: target.to_string(),
            stage_index: u32::try_from(output.stage_index).unwrap_or(u32::MAX),
            stage_title: output.title.clone(),
            worker: output.worker.as_str().to_string(),
            content: output.output.clone(),
            created_at: Utc::now(),
        }
    }
}

/// Read-only background recalled from an earlier run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorFinding {
    pub investigation_id: String,
    pub stage_title: String,
    pub content: String,
    pub recorded_at: DateTime<Utc>,
}

impl From<MemoryEntry> for PriorFinding {
    fn from(entry: MemoryEntry) -> Self {
        Self {
            investigation_id: entry.investigation_id,
            stage_title: entry.stage_title,
            content: entry.content,
            recorded_at: entry.created_at,
        }
    }
}
