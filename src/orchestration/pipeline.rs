//! # Pipeline Orchestrator
//!
//! Drives one analysis job through the fixed stage sequence, advancing the
//! persisted step counter before each stage's work begins and writing the
//! terminal status at the end. The orchestrator owns all task-state writes;
//! stage work itself is delegated to the collaborator seams, except the
//! simulation stage, which runs in-process.
//!
//! Any stage error stops the run: the task transitions to failed with the
//! step counter left where it stopped, and no further stages execute. Nothing
//! is retried automatically; callers resubmit a new task.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, error, info};

use crate::config::PipelineConfig;
use crate::error::{MatchupError, Result};
use crate::models::{AggregateSimulationResult, ProcessingTask, TeamProfile};
use crate::services::{MatchupRepository, ReportKind, ReportWriter, TeamAnalyzer};
use crate::simulation;
use crate::state_machine::{PipelineStage, TaskEvent};
use crate::store::TaskStatusStore;

use super::analysis::ParallelAnalysisRunner;
use super::types::{PipelineInput, PipelineOutcome};

/// Sequences the pipeline stages and keeps the task record current.
pub struct PipelineOrchestrator<S: TaskStatusStore> {
    store: Arc<S>,
    analyzer: Arc<dyn TeamAnalyzer>,
    repository: Arc<dyn MatchupRepository>,
    reports: Arc<dyn ReportWriter>,
    config: PipelineConfig,
}

impl<S: TaskStatusStore> PipelineOrchestrator<S> {
    pub fn new(
        store: Arc<S>,
        analyzer: Arc<dyn TeamAnalyzer>,
        repository: Arc<dyn MatchupRepository>,
        reports: Arc<dyn ReportWriter>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            analyzer,
            repository,
            reports,
            config,
        }
    }

    /// Execute all stages for one accepted job and write the terminal status.
    ///
    /// Stage errors are converted into a failed task record rather than
    /// propagated; the returned error covers only a failure to persist the
    /// terminal status itself.
    pub async fn run(&self, input: PipelineInput) -> Result<ProcessingTask> {
        let task_uuid = input.task_uuid;

        match self.execute(input).await {
            Ok(outcome) => {
                info!(
                    task = %task_uuid,
                    game = %outcome.game_uuid,
                    simulation_id = outcome.simulation_id,
                    "pipeline completed"
                );
                self.store
                    .apply(
                        task_uuid,
                        TaskEvent::Complete {
                            game_uuid: outcome.game_uuid,
                        },
                    )
                    .await
            }
            Err(err) => {
                error!(task = %task_uuid, error = %err, "pipeline failed");
                self.store
                    .apply(task_uuid, TaskEvent::fail_with_error(err.to_string()))
                    .await
            }
        }
    }

    /// The staged pipeline body. Each stage writes its step marker before any
    /// of its work runs.
    async fn execute(&self, input: PipelineInput) -> Result<PipelineOutcome> {
        let task_uuid = input.task_uuid;

        self.advance(task_uuid, PipelineStage::AnalyzingStatistics)
            .await?;
        let runner = ParallelAnalysisRunner::new(self.analyzer.clone(), self.repository.clone());
        let (home, away) = self
            .bounded(PipelineStage::AnalyzingStatistics, runner.run(&input))
            .await?;

        self.advance(task_uuid, PipelineStage::StoringData).await?;
        let game = self
            .repository
            .insert_game(home.team_id, away.team_id)
            .await
            .map_err(|err| MatchupError::persistence("insert_game", err))?;
        self.repository
            .attach_stats_to_game(home.team_stats_id, game.game_id)
            .await
            .map_err(|err| MatchupError::persistence("attach_stats_to_game", err))?;
        self.repository
            .attach_stats_to_game(away.team_stats_id, game.game_id)
            .await
            .map_err(|err| MatchupError::persistence("attach_stats_to_game", err))?;
        debug!(task = %task_uuid, game_id = game.game_id, "game row created");

        self.advance(task_uuid, PipelineStage::GeneratingAnalysis)
            .await?;
        self.bounded(PipelineStage::GeneratingAnalysis, async {
            let home_report = self
                .reports
                .team_analysis_report(home.team_id)
                .await
                .map_err(MatchupError::report)?;
            let away_report = self
                .reports
                .team_analysis_report(away.team_id)
                .await
                .map_err(MatchupError::report)?;

            self.repository
                .insert_report(game.game_id, ReportKind::TeamAnalysis, &home_report)
                .await
                .map_err(|err| MatchupError::persistence("insert_report", err))?;
            self.repository
                .insert_report(game.game_id, ReportKind::OpponentAnalysis, &away_report)
                .await
                .map_err(|err| MatchupError::persistence("insert_report", err))?;
            Ok(())
        })
        .await?;

        self.advance(task_uuid, PipelineStage::SimulatingGame).await?;
        let home_profile = self
            .repository
            .team_profile(home.team_id)
            .await
            .map_err(|err| MatchupError::persistence("team_profile", err))?;
        let away_profile = self
            .repository
            .team_profile(away.team_id)
            .await
            .map_err(|err| MatchupError::persistence("team_profile", err))?;

        let result = self.simulate(&home_profile, &away_profile)?;

        let simulation_id = self
            .repository
            .insert_game_simulation(game.game_id, &result)
            .await
            .map_err(|err| MatchupError::persistence("insert_game_simulation", err))?;
        self.repository
            .insert_simulation_details(
                simulation_id,
                game.game_id,
                home.team_id,
                away.team_id,
                &result,
            )
            .await
            .map_err(|err| MatchupError::persistence("insert_simulation_details", err))?;

        self.advance(task_uuid, PipelineStage::GeneratingFinalReport)
            .await?;
        let report_id = self
            .bounded(PipelineStage::GeneratingFinalReport, async {
                let report_path = self
                    .reports
                    .game_report(game.game_id)
                    .await
                    .map_err(MatchupError::report)?;
                self.repository
                    .insert_report(game.game_id, ReportKind::GameAnalysis, &report_path)
                    .await
                    .map_err(|err| MatchupError::persistence("insert_report", err))
            })
            .await?;

        Ok(PipelineOutcome {
            game_id: game.game_id,
            game_uuid: game.game_uuid,
            simulation_id,
            report_id,
        })
    }

    /// Run the Monte Carlo reduction for the two persisted profiles.
    fn simulate(
        &self,
        home_profile: &TeamProfile,
        away_profile: &TeamProfile,
    ) -> Result<AggregateSimulationResult> {
        let seed = self.config.simulation_seed.unwrap_or_else(rand::random);
        let trials = self.config.num_simulations;
        let workers = self.config.simulation_workers;
        debug!(trials, workers, seed, "running game simulation");

        let result = if workers > 1 {
            simulation::run_simulations_parallel(home_profile, away_profile, trials, workers, seed)?
        } else {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            simulation::run_simulations(home_profile, away_profile, trials, &mut rng)?
        };
        Ok(result)
    }

    /// Persist the step marker for a stage before its work begins.
    async fn advance(&self, task_uuid: uuid::Uuid, stage: PipelineStage) -> Result<()> {
        debug!(
            task = %task_uuid,
            step = stage.index(),
            stage = stage.description(),
            "advancing pipeline stage"
        );
        self.store
            .apply(task_uuid, TaskEvent::Advance(stage))
            .await?;
        Ok(())
    }

    /// Apply the configured stage timeout, when one is set. The default is
    /// unbounded: a hung external call blocks its stage indefinitely.
    async fn bounded<T>(
        &self,
        stage: PipelineStage,
        work: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match self.config.stage_timeout_seconds {
            Some(seconds) => tokio::time::timeout(Duration::from_secs(seconds), work)
                .await
                .map_err(|_| MatchupError::StageTimeout {
                    stage: stage.description().to_string(),
                    seconds,
                })?,
            None => work.await,
        }
    }
}
