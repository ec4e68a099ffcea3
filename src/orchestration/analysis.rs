//! # Parallel Team Analysis
//!
//! One [`AnalysisTask`] wraps the full extract-and-persist operation for a
//! single team: call the analyzer, then write the dossier through the
//! repository, returning the generated ids. The [`ParallelAnalysisRunner`]
//! dispatches the home and away tasks concurrently and joins them in order.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::error::{MatchupError, Result};
use crate::models::TeamRole;
use crate::services::{MatchupRepository, TeamAnalyzer};

use super::types::{HomeSource, PipelineInput, TeamAnalysisOutcome};

/// One independent, potentially slow, potentially failing extraction and
/// persistence of a team's statistical dossier.
pub struct AnalysisTask {
    analyzer: Arc<dyn TeamAnalyzer>,
    repository: Arc<dyn MatchupRepository>,
    document: PathBuf,
    role: TeamRole,
    name_override: Option<String>,
}

impl AnalysisTask {
    pub fn new(
        analyzer: Arc<dyn TeamAnalyzer>,
        repository: Arc<dyn MatchupRepository>,
        document: PathBuf,
        role: TeamRole,
        name_override: Option<String>,
    ) -> Self {
        Self {
            analyzer,
            repository,
            document,
            role,
            name_override,
        }
    }

    /// Analyze the document and persist the resulting dossier.
    pub async fn run(self) -> Result<TeamAnalysisOutcome> {
        info!(
            role = %self.role,
            document = %self.document.display(),
            "starting team analysis"
        );

        let dossier = self
            .analyzer
            .analyze(&self.document, self.role, self.name_override.as_deref())
            .await
            .map_err(|err| MatchupError::analysis(self.role, err))?
            .with_name_override(self.name_override.as_deref());

        let team_id = self
            .repository
            .insert_team(&dossier.details)
            .await
            .map_err(|err| MatchupError::persistence("insert_team", err))?;

        let team_stats_id = self
            .repository
            .insert_team_stats(team_id, &dossier.stats)
            .await
            .map_err(|err| MatchupError::persistence("insert_team_stats", err))?;

        let team_analysis_id = self
            .repository
            .insert_team_analysis(team_id, &dossier.analysis)
            .await
            .map_err(|err| MatchupError::persistence("insert_team_analysis", err))?;

        info!(role = %self.role, team_id, team_stats_id, "team analysis persisted");

        Ok(TeamAnalysisOutcome {
            team_id,
            team_stats_id,
            team_analysis_id,
        })
    }
}

/// Runs the two team analyses for one pipeline input and joins their results
/// as an order-preserving (home, away) pair.
pub struct ParallelAnalysisRunner {
    analyzer: Arc<dyn TeamAnalyzer>,
    repository: Arc<dyn MatchupRepository>,
}

impl ParallelAnalysisRunner {
    pub fn new(analyzer: Arc<dyn TeamAnalyzer>, repository: Arc<dyn MatchupRepository>) -> Self {
        Self {
            analyzer,
            repository,
        }
    }

    /// Run the analyses for this input.
    ///
    /// With two documents, both tasks are dispatched concurrently and the
    /// home handle is joined first. A home failure propagates without
    /// awaiting the away handle, so the away task may still be running and
    /// writing rows after the pipeline has already reported failure. When the
    /// home team is cached, only the away task exists and it runs inline.
    pub async fn run(
        &self,
        input: &PipelineInput,
    ) -> Result<(TeamAnalysisOutcome, TeamAnalysisOutcome)> {
        match &input.home {
            HomeSource::Document(home_document) => {
                let home_task = AnalysisTask::new(
                    self.analyzer.clone(),
                    self.repository.clone(),
                    home_document.clone(),
                    TeamRole::Home,
                    input.home_name.clone(),
                );
                let away_task = self.away_task(input);

                let home_handle = tokio::spawn(home_task.run());
                let away_handle = tokio::spawn(away_task.run());

                let home_outcome = join_analysis(home_handle, TeamRole::Home).await?;
                let away_outcome = join_analysis(away_handle, TeamRole::Away).await?;

                Ok((home_outcome, away_outcome))
            }
            HomeSource::Cached(team_uuid) => {
                let cached = self
                    .repository
                    .find_cached_team(*team_uuid)
                    .await
                    .map_err(|err| MatchupError::persistence("find_cached_team", err))?
                    .ok_or_else(|| {
                        MatchupError::validation(format!("team {team_uuid} does not exist"))
                    })?;

                info!(%team_uuid, team_id = cached.team_id, "home team resolved from cache");

                let away_outcome = self.away_task(input).run().await?;
                Ok((cached.into(), away_outcome))
            }
        }
    }

    fn away_task(&self, input: &PipelineInput) -> AnalysisTask {
        AnalysisTask::new(
            self.analyzer.clone(),
            self.repository.clone(),
            input.away_document.clone(),
            TeamRole::Away,
            input.away_name.clone(),
        )
    }
}

/// Unwrap a spawned analysis handle, mapping a panicked or cancelled worker
/// into a pipeline error.
async fn join_analysis(
    handle: JoinHandle<Result<TeamAnalysisOutcome>>,
    role: TeamRole,
) -> Result<TeamAnalysisOutcome> {
    match handle.await {
        Ok(outcome) => outcome,
        Err(join_err) => {
            warn!(role = %role, error = %join_err, "analysis worker did not finish cleanly");
            Err(MatchupError::Join {
                message: join_err.to_string(),
            })
        }
    }
}
