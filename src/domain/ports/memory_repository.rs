use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::MemoryEntry;

/// Repository trait for the cross-run memory store
///
/// Entries are keyed by investigation id and stage index. A run only writes
/// under its own investigation id, so concurrent runs never mutate each
/// other's entries.
#[async_trait]
pub trait MemoryRepository: Send + Sync {
    /// Store a stage output, replacing any earlier output for the same
    /// investigation id and stage index.
    async fn store(&self, entry: &MemoryEntry) -> DomainResult<()>;

    /// All entries of one investigation, ordered by stage index.
    async fn list(&self, investigation_id: &str) -> DomainResult<Vec<MemoryEntry>>;

    /// Most recent entries recorded for `target`, newest first.
    ///
    /// # Arguments
    /// * `target` - Exact target string
    /// * `exclude_investigation` - Investigation id to leave out (usually the caller's own)
    /// * `limit` - Maximum number of entries
    async fn recall(
        &self,
        target: &str,
        exclude_investigation: Option<&str>,
        limit: usize,
    ) -> DomainResult<Vec<MemoryEntry>>;
}
