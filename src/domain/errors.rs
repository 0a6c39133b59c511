//! Domain errors for the osint-swarm orchestration engine.

use std::path::PathBuf;

use thiserror::Error;

/// Domain-level errors that can occur while planning or running an investigation.
///
/// Only [`DomainError::HumanAbort`], [`DomainError::Cancelled`],
/// [`DomainError::RevisionLimitExceeded`] and [`DomainError::PlanConstruction`]
/// are fatal to a run. Provider failures never
/// surface here; they are absorbed into the stage output.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Plan construction failed: {0}")]
    PlanConstruction(String),

    #[error("Investigation aborted by operator at stage {stage_index}")]
    HumanAbort { stage_index: usize },

    #[error("Investigation cancelled")]
    Cancelled,

    #[error("Stage {stage_index} rejected {rejections} times, revision limit reached")]
    RevisionLimitExceeded { stage_index: usize, rejections: u32 },

    #[error("Worker not found: {0}")]
    WorkerNotFound(String),

    #[error("Invalid run state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

impl DomainError {
    /// Whether this error ends the run without a result.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::PlanConstruction(_)
                | Self::HumanAbort { .. }
                | Self::Cancelled
                | Self::RevisionLimitExceeded { .. }
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

/// Failure of a capability provider call (search, page fetch).
///
/// Recoverable: workers retry, degrade, or report the gap in their output.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("provider unreachable: {0}")]
    Unreachable(String),

    #[error("provider rate limited{}", .retry_after_secs.map(|s| format!(" (retry after {s}s)")).unwrap_or_default())]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Whether retrying the same call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unreachable(_) | Self::RateLimited { .. })
    }
}

/// Failure to persist a finished report.
///
/// Never fatal to the investigation: the result is returned regardless.
#[derive(Debug, Error)]
pub enum ReportWriteError {
    #[error("Failed to create report directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write report {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
