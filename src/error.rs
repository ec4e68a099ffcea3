//! # Error Types
//!
//! Structured error handling for the matchup pipeline using thiserror.
//!
//! Collaborator traits (analyzer, repository, report writer) return
//! `anyhow::Error` since their failures are opaque external conditions; the
//! orchestrator wraps them into these variants with stage context before they
//! reach the task record.

use thiserror::Error;
use uuid::Uuid;

use crate::models::TeamRole;
use crate::simulation::SimulationError;

/// Errors produced by the matchup pipeline and its supporting components.
#[derive(Error, Debug)]
pub enum MatchupError {
    #[error("validation error: {message}")]
    Validation { message: String },

    #[error("{role} team analysis failed: {message}")]
    Analysis { role: TeamRole, message: String },

    #[error("persistence error during {operation}: {message}")]
    Persistence { operation: String, message: String },

    #[error("report generation failed: {message}")]
    Report { message: String },

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error("invalid state transition from {from} via {event}")]
    StateTransition { from: String, event: String },

    #[error("task not found: {task_uuid}")]
    TaskNotFound { task_uuid: Uuid },

    #[error("database error: {message}")]
    Database { message: String },

    #[error("analysis worker terminated abnormally: {message}")]
    Join { message: String },

    #[error("stage '{stage}' timed out after {seconds}s")]
    StageTimeout { stage: String, seconds: u64 },

    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl MatchupError {
    /// Wrap an external analyzer failure with the team role it was analyzing.
    pub fn analysis(role: TeamRole, source: anyhow::Error) -> Self {
        Self::Analysis {
            role,
            message: source.to_string(),
        }
    }

    /// Wrap an external persistence failure with the operation that raised it.
    pub fn persistence(operation: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Persistence {
            operation: operation.into(),
            message: source.to_string(),
        }
    }

    /// Wrap an external report-generation failure.
    pub fn report(source: anyhow::Error) -> Self {
        Self::Report {
            message: source.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

impl From<sqlx::Error> for MatchupError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database {
            message: err.to_string(),
        }
    }
}

impl From<config::ConfigError> for MatchupError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MatchupError>;
