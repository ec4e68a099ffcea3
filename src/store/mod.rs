//! # Task Status Store
//!
//! Persistence for the task-status record read by pollers and written only by
//! the orchestrator. Durable, pollable status that survives process restarts
//! comes from the Postgres implementation; the in-memory implementation backs
//! tests and single-process deployments.
//!
//! Every mutation goes through [`apply`](TaskStatusStore::apply), which
//! validates the transition with the
//! [`TaskStateMachine`](crate::state_machine::TaskStateMachine) before
//! committing, so readers can never observe a step regression or a transition
//! out of a terminal state.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::ProcessingTask;
use crate::state_machine::TaskEvent;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryTaskStore;
pub use postgres::PgTaskStore;

/// Persisted task-status records keyed by task uuid.
#[async_trait]
pub trait TaskStatusStore: Send + Sync + 'static {
    /// Insert a freshly accepted task record. Fails if the uuid exists.
    async fn create(&self, record: ProcessingTask) -> Result<()>;

    /// Read one record by task uuid.
    async fn get(&self, task_uuid: Uuid) -> Result<Option<ProcessingTask>>;

    /// Validate and commit one state transition, returning the updated record.
    async fn apply(&self, task_uuid: Uuid, event: TaskEvent) -> Result<ProcessingTask>;

    /// Most recently finished tasks, newest first.
    async fn recently_completed(&self, limit: usize) -> Result<Vec<ProcessingTask>>;
}
