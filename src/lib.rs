#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Matchup Core
//!
//! Asynchronous matchup-analysis pipeline with a Monte Carlo game simulation core.
//!
//! ## Overview
//!
//! Matchup Core drives a long-running, multi-step analysis job for a two-team
//! matchup: it extracts and persists a statistical dossier for each team (two
//! independent, failure-prone operations run concurrently), generates analysis
//! reports, simulates the game many times from the teams' aggregate statistics,
//! and reduces the trials into win probabilities, score distributions, and
//! per-factor attribution. Progress is tracked through a fixed sequence of
//! stages in a persisted task record so clients can poll status while the job
//! runs off the request path.
//!
//! ## Module Organization
//!
//! - [`models`] - Task records, team dossiers and profiles, simulation results
//! - [`state_machine`] - Task status transitions, stage sequence, step monotonicity
//! - [`store`] - Task-status persistence (in-memory and Postgres)
//! - [`services`] - External collaborator seams (analyzer, repository, reports)
//! - [`simulation`] - Game simulation engine and Monte Carlo aggregation
//! - [`orchestration`] - Stage sequencing, parallel analysis, job dispatch
//! - [`config`] - Configuration management
//! - [`error`] - Structured error handling
//! - [`logging`] - Tracing initialization
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use matchup_core::config::PipelineConfig;
//! use matchup_core::orchestration::{PipelineDispatcher, PipelineOrchestrator, SubmissionRequest};
//! use matchup_core::store::InMemoryTaskStore;
//! # use matchup_core::services::{MatchupRepository, ReportWriter, TeamAnalyzer};
//!
//! # async fn example(
//! #     analyzer: Arc<dyn TeamAnalyzer>,
//! #     repository: Arc<dyn MatchupRepository>,
//! #     reports: Arc<dyn ReportWriter>,
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(InMemoryTaskStore::new());
//! let orchestrator = PipelineOrchestrator::new(
//!     store.clone(),
//!     analyzer,
//!     repository,
//!     reports,
//!     PipelineConfig::default(),
//! );
//! let dispatcher = PipelineDispatcher::new(orchestrator, store);
//!
//! let task_uuid = dispatcher
//!     .submit(SubmissionRequest {
//!         home_document: Some("uploads/home.pdf".into()),
//!         away_document: Some("uploads/away.pdf".into()),
//!         ..SubmissionRequest::default()
//!     })
//!     .await?;
//!
//! let view = dispatcher.status(task_uuid).await?;
//! println!("{}: {}", view.current_step, view.step_description);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod orchestration;
pub mod services;
pub mod simulation;
pub mod state_machine;
pub mod store;

pub use crate::config::PipelineConfig;
pub use crate::error::{MatchupError, Result};
pub use crate::models::{AggregateSimulationResult, ProcessingTask, TaskStatusView, TeamProfile};
pub use crate::state_machine::{PipelineStage, TaskStatus};
