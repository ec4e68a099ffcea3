//! Postgres-backed task-status store. One row per task in
//! `matchup_processing_tasks`, read by pollers and written only by the
//! orchestrator.
//!
//! Transitions are validated in memory by the state machine and committed
//! with a guarded UPDATE (`status = 'processing'` predicate), so a row that
//! reached a terminal state cannot be overwritten even if a stale writer
//! races the commit.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use tracing::debug;
use uuid::Uuid;

use crate::error::{MatchupError, Result};
use crate::models::ProcessingTask;
use crate::state_machine::{TaskEvent, TaskStateMachine, TaskStatus};

use super::TaskStatusStore;

const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS matchup_processing_tasks (
    task_uuid   UUID PRIMARY KEY,
    status      TEXT NOT NULL,
    step        INTEGER NOT NULL,
    total_steps INTEGER NOT NULL,
    game_uuid   UUID,
    error       TEXT,
    created_at  TIMESTAMPTZ NOT NULL,
    updated_at  TIMESTAMPTZ NOT NULL
)
"#;

/// Durable implementation of [`TaskStatusStore`] on a Postgres pool.
#[derive(Debug, Clone)]
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect with a small dedicated pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Create the backing table when it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(CREATE_TABLE_SQL).execute(&self.pool).await?;
        debug!("task-status schema ensured");
        Ok(())
    }

    fn record_from_row(row: &PgRow) -> Result<ProcessingTask> {
        let status: String = row.try_get("status")?;
        let status: TaskStatus = status
            .parse()
            .map_err(|message: String| MatchupError::Database { message })?;

        Ok(ProcessingTask {
            task_uuid: row.try_get("task_uuid")?,
            status,
            step: row.try_get("step")?,
            total_steps: row.try_get("total_steps")?,
            game_uuid: row.try_get("game_uuid")?,
            error: row.try_get("error")?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
            updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
        })
    }
}

#[async_trait]
impl TaskStatusStore for PgTaskStore {
    async fn create(&self, record: ProcessingTask) -> Result<()> {
        sqlx::query(
            "INSERT INTO matchup_processing_tasks \
             (task_uuid, status, step, total_steps, game_uuid, error, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(record.task_uuid)
        .bind(record.status.to_string())
        .bind(record.step)
        .bind(record.total_steps)
        .bind(record.game_uuid)
        .bind(&record.error)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, task_uuid: Uuid) -> Result<Option<ProcessingTask>> {
        let row = sqlx::query("SELECT * FROM matchup_processing_tasks WHERE task_uuid = $1")
            .bind(task_uuid)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::record_from_row).transpose()
    }

    async fn apply(&self, task_uuid: Uuid, event: TaskEvent) -> Result<ProcessingTask> {
        let current = self
            .get(task_uuid)
            .await?
            .ok_or(MatchupError::TaskNotFound { task_uuid })?;

        let next = TaskStateMachine::apply(&current, &event)?;

        // The predicate refuses to touch a row another writer already drove
        // to a terminal state between our read and this commit.
        let updated = sqlx::query(
            "UPDATE matchup_processing_tasks \
             SET status = $2, step = $3, game_uuid = $4, error = $5, updated_at = $6 \
             WHERE task_uuid = $1 AND status = 'processing'",
        )
        .bind(task_uuid)
        .bind(next.status.to_string())
        .bind(next.step)
        .bind(next.game_uuid)
        .bind(&next.error)
        .bind(next.updated_at)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(MatchupError::StateTransition {
                from: "terminal row".to_string(),
                event: event.event_type().to_string(),
            });
        }

        Ok(next)
    }

    async fn recently_completed(&self, limit: usize) -> Result<Vec<ProcessingTask>> {
        let mut rows = sqlx::query(
            "SELECT * FROM matchup_processing_tasks \
             WHERE status = 'completed' ORDER BY updated_at DESC LIMIT $1",
        )
        .bind(limit as i64)
        .fetch(&self.pool);

        let mut finished = Vec::new();
        while let Some(row) = rows.try_next().await? {
            finished.push(Self::record_from_row(&row)?);
        }
        Ok(finished)
    }
}
