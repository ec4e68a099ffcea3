use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::stages::PipelineStage;

/// Events that can trigger task state transitions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum TaskEvent {
    /// Move the step counter to the given stage; valid only while processing
    /// and never backwards
    Advance(PipelineStage),
    /// Mark the task completed with its result reference
    Complete { game_uuid: Uuid },
    /// Mark the task failed with error detail; the step counter is left where
    /// it stopped
    Fail(String),
}

impl TaskEvent {
    /// Get a string representation of the event type for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Advance(_) => "advance",
            Self::Complete { .. } => "complete",
            Self::Fail(_) => "fail",
        }
    }

    /// Extract error message if this is a failure event
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Fail(msg) => Some(msg),
            _ => None,
        }
    }

    /// Check if this event represents a terminal transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Fail(_))
    }

    /// Create a failure event with the given error message
    pub fn fail_with_error(error: impl Into<String>) -> Self {
        Self::Fail(error.into())
    }
}
