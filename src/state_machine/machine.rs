//! # Task State Machine
//!
//! Pure transition rules for the persisted task record. Both store
//! implementations route every mutation through [`TaskStateMachine::apply`],
//! so the two invariants pollers rely on hold no matter which backend is in
//! use: terminal states never transition again, and the step counter never
//! regresses while processing.

use chrono::Utc;

use crate::error::{MatchupError, Result};
use crate::models::ProcessingTask;

use super::events::TaskEvent;
use super::stages::PipelineStage;
use super::states::TaskStatus;

/// Validates and applies task state transitions.
pub struct TaskStateMachine;

impl TaskStateMachine {
    /// Apply an event to a record, producing the next record state.
    ///
    /// Returns a `StateTransition` error when the record is already terminal
    /// or when the event would move the step counter backwards.
    pub fn apply(record: &ProcessingTask, event: &TaskEvent) -> Result<ProcessingTask> {
        if record.status.is_terminal() {
            return Err(Self::invalid(record, event));
        }

        let mut next = record.clone();
        next.updated_at = Utc::now();

        match event {
            TaskEvent::Advance(stage) => {
                if stage.index() < record.step {
                    return Err(Self::invalid(record, event));
                }
                next.step = stage.index();
            }
            TaskEvent::Complete { game_uuid } => {
                next.status = TaskStatus::Completed;
                next.step = PipelineStage::Ready.index();
                next.game_uuid = Some(*game_uuid);
            }
            TaskEvent::Fail(message) => {
                next.status = TaskStatus::Failed;
                next.error = Some(message.clone());
            }
        }

        Ok(next)
    }

    fn invalid(record: &ProcessingTask, event: &TaskEvent) -> MatchupError {
        MatchupError::StateTransition {
            from: format!("{} (step {})", record.status, record.step),
            event: event.event_type().to_string(),
        }
    }
}
