//! Null memory repository implementation.
//!
//! Used when cross-run memory is off but the orchestrator still needs a
//! MemoryRepository implementation.

use async_trait::async_trait;

use super::MemoryRepository;
use crate::domain::errors::DomainResult;
use crate::domain::models::MemoryEntry;

/// A no-op memory repository that stores nothing.
#[derive(Debug, Clone, Default)]
pub struct NullMemoryRepository;

impl NullMemoryRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MemoryRepository for NullMemoryRepository {
    async fn store(&self, _entry: &MemoryEntry) -> DomainResult<()> {
        Ok(())
    }

    async fn list(&self, _investigation_id: &str) -> DomainResult<Vec<MemoryEntry>> {
        Ok(Vec::new())
    }

    async fn recall(
        &self,
        _target: &str,
        _exclude_investigation: Option<&str>,
        _limit: usize,
    ) -> DomainResult<Vec<MemoryEntry>> {
        Ok(Vec::new())
    }
}
