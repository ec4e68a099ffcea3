//! In-memory task-status store backed by a concurrent map. Used by tests and
//! single-process deployments; state does not survive a restart.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::{MatchupError, Result};
use crate::models::ProcessingTask;
use crate::state_machine::{TaskEvent, TaskStateMachine, TaskStatus};

use super::TaskStatusStore;

/// Concurrent in-process implementation of [`TaskStatusStore`].
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: DashMap<Uuid, ProcessingTask>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[async_trait]
impl TaskStatusStore for InMemoryTaskStore {
    async fn create(&self, record: ProcessingTask) -> Result<()> {
        match self.tasks.entry(record.task_uuid) {
            Entry::Occupied(_) => Err(MatchupError::validation(format!(
                "task {} already exists",
                record.task_uuid
            ))),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    async fn get(&self, task_uuid: Uuid) -> Result<Option<ProcessingTask>> {
        Ok(self.tasks.get(&task_uuid).map(|entry| entry.clone()))
    }

    async fn apply(&self, task_uuid: Uuid, event: TaskEvent) -> Result<ProcessingTask> {
        let mut entry = self
            .tasks
            .get_mut(&task_uuid)
            .ok_or(MatchupError::TaskNotFound { task_uuid })?;

        let next = TaskStateMachine::apply(&entry, &event)?;
        *entry = next.clone();
        Ok(next)
    }

    async fn recently_completed(&self, limit: usize) -> Result<Vec<ProcessingTask>> {
        let mut finished: Vec<ProcessingTask> = self
            .tasks
            .iter()
            .filter(|entry| entry.status == TaskStatus::Completed)
            .map(|entry| entry.clone())
            .collect();

        finished.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        finished.truncate(limit);
        Ok(finished)
    }
}
