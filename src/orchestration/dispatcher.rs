//! # Pipeline Dispatcher
//!
//! The job submission and status polling boundary. `submit` validates the
//! request, creates the task record, and spawns the orchestrator onto a
//! background tokio task so callers get their task id back immediately;
//! `status` projects the persisted record into the polling shape.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::{MatchupError, Result};
use crate::models::{ProcessingTask, TaskStatusView};
use crate::store::TaskStatusStore;

use super::pipeline::PipelineOrchestrator;
use super::types::{HomeSource, PipelineInput};

/// One submitted analysis job, before validation. Either a home document or
/// an already-analyzed home team must be supplied; the away document is
/// always required. A cached team takes precedence over a home document.
#[derive(Debug, Clone, Default)]
pub struct SubmissionRequest {
    pub home_document: Option<PathBuf>,
    pub home_team_uuid: Option<Uuid>,
    pub home_name: Option<String>,
    pub away_document: Option<PathBuf>,
    pub away_name: Option<String>,
}

impl SubmissionRequest {
    /// Validate the request into pipeline input, minting the task id.
    fn into_input(self) -> Result<PipelineInput> {
        let away_document = self
            .away_document
            .ok_or_else(|| MatchupError::validation("could not identify opponent file"))?;

        let home = match (self.home_team_uuid, self.home_document) {
            (Some(team_uuid), _) => HomeSource::Cached(team_uuid),
            (None, Some(document)) => HomeSource::Document(document),
            (None, None) => {
                return Err(MatchupError::validation(
                    "either a home document or an existing team is required",
                ))
            }
        };

        Ok(PipelineInput {
            task_uuid: Uuid::new_v4(),
            home,
            away_document,
            home_name: self.home_name,
            away_name: self.away_name,
        })
    }
}

/// Accepts jobs, runs them off the request path, and serves status polls.
pub struct PipelineDispatcher<S: TaskStatusStore> {
    orchestrator: Arc<PipelineOrchestrator<S>>,
    store: Arc<S>,
    running: Mutex<HashMap<Uuid, JoinHandle<()>>>,
}

impl<S: TaskStatusStore> PipelineDispatcher<S> {
    pub fn new(orchestrator: PipelineOrchestrator<S>, store: Arc<S>) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            store,
            running: Mutex::new(HashMap::new()),
        }
    }

    /// Accept a job: validate, create the task record, and fire the pipeline
    /// on a background task. Returns the task id for polling.
    pub async fn submit(&self, request: SubmissionRequest) -> Result<Uuid> {
        let input = request.into_input()?;
        let task_uuid = input.task_uuid;

        self.store.create(ProcessingTask::new(task_uuid)).await?;
        info!(task = %task_uuid, "accepted matchup analysis job");

        let orchestrator = self.orchestrator.clone();
        let handle = tokio::spawn(async move {
            if let Err(err) = orchestrator.run(input).await {
                error!(task = %task_uuid, error = %err, "failed to persist terminal task status");
            }
        });

        self.running.lock().insert(task_uuid, handle);
        Ok(task_uuid)
    }

    /// Serve one status poll. Unknown task ids are an error.
    pub async fn status(&self, task_uuid: Uuid) -> Result<TaskStatusView> {
        let record = self
            .store
            .get(task_uuid)
            .await?
            .ok_or(MatchupError::TaskNotFound { task_uuid })?;
        Ok(TaskStatusView::from_record(&record))
    }

    /// Block until a submitted job reaches its terminal state and return the
    /// final record. Intended for tests and command-line callers; pollers use
    /// [`status`](Self::status).
    pub async fn wait(&self, task_uuid: Uuid) -> Result<ProcessingTask> {
        let handle = self.running.lock().remove(&task_uuid);
        if let Some(handle) = handle {
            if let Err(join_err) = handle.await {
                warn!(task = %task_uuid, error = %join_err, "pipeline task did not finish cleanly");
            }
        }

        self.store
            .get(task_uuid)
            .await?
            .ok_or(MatchupError::TaskNotFound { task_uuid })
    }

    /// Number of pipeline tasks still running.
    pub fn active_jobs(&self) -> usize {
        let mut running = self.running.lock();
        running.retain(|_, handle| !handle.is_finished());
        running.len()
    }
}
