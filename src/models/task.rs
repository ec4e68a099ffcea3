//! # Processing Task Model
//!
//! The persisted record tracking one pipeline run's progress and terminal
//! outcome, plus the polling view derived from it.
//!
//! The record is created when a job is accepted and from then on mutated
//! exclusively by the orchestrator through state-machine-validated
//! transitions. Pollers read committed values and never observe a step
//! regression.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state_machine::{PipelineStage, TaskStatus};

/// Persisted status row for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingTask {
    /// Opaque job identifier, unique and immutable
    pub task_uuid: Uuid,
    /// Current lifecycle status; terminal states never transition again
    pub status: TaskStatus,
    /// Index into the fixed stage list; non-decreasing while processing
    pub step: i32,
    /// Stage count, set at creation
    pub total_steps: i32,
    /// Result reference, populated only on completion
    pub game_uuid: Option<Uuid>,
    /// Failure detail, populated only on failure
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProcessingTask {
    /// Create a fresh record for an accepted job: processing, at step 0.
    pub fn new(task_uuid: Uuid) -> Self {
        let now = Utc::now();
        Self {
            task_uuid,
            status: TaskStatus::Processing,
            step: 0,
            total_steps: PipelineStage::total_steps(),
            game_uuid: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Current stage, when the step index maps onto the fixed stage list.
    pub fn stage(&self) -> Option<PipelineStage> {
        PipelineStage::from_index(self.step)
    }
}

/// Response shape served to status pollers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatusView {
    pub task_uuid: Uuid,
    pub status: TaskStatus,
    pub step_description: String,
    pub current_step: i32,
    pub total_steps: i32,
    pub game_uuid: Option<Uuid>,
}

impl TaskStatusView {
    /// Project a task record into the polling shape, resolving the step index
    /// to its stage description.
    pub fn from_record(record: &ProcessingTask) -> Self {
        let step_description = PipelineStage::from_index(record.step)
            .map(|stage| stage.description().to_string())
            .unwrap_or_else(|| "Unknown step".to_string());

        Self {
            task_uuid: record.task_uuid,
            status: record.status,
            step_description,
            current_step: record.step,
            total_steps: record.total_steps,
            game_uuid: record.game_uuid,
        }
    }
}
