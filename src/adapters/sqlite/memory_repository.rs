//! SQLite implementation of the MemoryRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::MemoryEntry;
use crate::domain::ports::MemoryRepository;

#[derive(Clone)]
pub struct SqliteMemoryRepository {
    pool: SqlitePool,
}

impl SqliteMemoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemoryRepository for SqliteMemoryRepository {
    async fn store(&self, entry: &MemoryEntry) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO stage_memories (id, investigation_id, target, stage_index, stage_title,
               worker, content, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT (investigation_id, stage_index) DO UPDATE SET
                   stage_title = excluded.stage_title,
                   worker = excluded.worker,
                   content = excluded.content,
                   created_at = excluded.created_at"#,
        )
        .bind(entry.id.to_string())
        .bind(&entry.investigation_id)
        .bind(&entry.target)
        .bind(i64::from(entry.stage_index))
        .bind(&entry.stage_title)
        .bind(&entry.worker)
        .bind(&entry.content)
        .bind(entry.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list(&self, investigation_id: &str) -> DomainResult<Vec<MemoryEntry>> {
        let rows: Vec<MemoryRow> = sqlx::query_as(
            "SELECT * FROM stage_memories WHERE investigation_id = ? ORDER BY stage_index",
        )
        .bind(investigation_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn recall(
        &self,
        target: &str,
        exclude_investigation: Option<&str>,
        limit: usize,
    ) -> DomainResult<Vec<MemoryEntry>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<MemoryRow> = sqlx::query_as(
            r#"SELECT * FROM stage_memories
               WHERE target = ? AND (? IS NULL OR investigation_id != ?)
               ORDER BY created_at DESC, stage_index DESC
               LIMIT ?"#,
        )
        .bind(target)
        .bind(exclude_investigation)
        .bind(exclude_investigation)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[derive(sqlx::FromRow)]
struct MemoryRow {
    id: String,
    investigation_id: String,
    target: String,
    stage_index: i64,
    stage_title: String,
    worker: String,
    content: String,
    created_at: String,
}

impl TryFrom<MemoryRow> for MemoryEntry {
    type Error = DomainError;

    fn try_from(row: MemoryRow) -> Result<Self, Self::Error> {
        let stage_index = u32::try_from(row.stage_index)
            .map_err(|e| DomainError::SerializationError(format!("stage_index: {e}")))?;

        Ok(MemoryEntry {
            id: super::parse_uuid(&row.id)?,
            investigation_id: row.investigation_id,
            target: row.target,
            stage_index,
            stage_title: row.stage_title,
            worker: row.worker,
            content: row.content,
            created_at: super::parse_datetime(&row.created_at)?,
        })
    }
}
