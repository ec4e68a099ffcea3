//! Shared fakes and harness wiring for pipeline integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tempfile::TempDir;
use uuid::Uuid;

use matchup_core::config::PipelineConfig;
use matchup_core::error::Result as CoreResult;
use matchup_core::models::{
    ProcessingTask, TeamAnalysis, TeamDetails, TeamDossier, TeamProfile, TeamRole,
};
use matchup_core::orchestration::{PipelineDispatcher, PipelineOrchestrator};
use matchup_core::services::{
    CachedTeam, GameRef, MatchupRepository, ReportKind, ReportWriter, TeamAnalyzer,
};
use matchup_core::state_machine::{TaskEvent, TaskStatus};
use matchup_core::store::{InMemoryTaskStore, TaskStatusStore};
use matchup_core::AggregateSimulationResult;

/// Scripted behavior for one team's analysis call.
#[derive(Debug, Clone)]
pub enum AnalyzerScript {
    Succeed,
    Fail(&'static str),
    DelayThenSucceed(Duration),
}

/// Analyzer fake with per-role scripts and a call log.
pub struct ScriptedAnalyzer {
    home: AnalyzerScript,
    away: AnalyzerScript,
    calls: Mutex<Vec<TeamRole>>,
}

impl ScriptedAnalyzer {
    pub fn new(home: AnalyzerScript, away: AnalyzerScript) -> Self {
        Self {
            home,
            away,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding() -> Self {
        Self::new(AnalyzerScript::Succeed, AnalyzerScript::Succeed)
    }

    pub fn calls(&self) -> Vec<TeamRole> {
        self.calls.lock().clone()
    }

    fn dossier(role: TeamRole) -> TeamDossier {
        let (name, stats) = match role {
            TeamRole::Home => (
                "Scarsdale",
                json!({
                    "PPG": 80.0, "REB": 40.0, "FG%": 50.0, "3P%": 35.0,
                    "TO": 10.0, "AST": 18.0, "STL": 8.0, "BLK": 5.0,
                }),
            ),
            TeamRole::Away => (
                "Arlington",
                json!({
                    "PPG": 74.0, "REB": 37.0, "FG%": 47.0, "3P%": 33.0,
                    "TO": 12.0, "AST": 16.0, "STL": 7.0, "BLK": 4.0,
                }),
            ),
        };

        TeamDossier {
            details: TeamDetails {
                team_name: name.to_string(),
                record: Some("18-4".to_string()),
                ranking: None,
            },
            stats,
            analysis: TeamAnalysis {
                playing_style: "up-tempo".to_string(),
                strengths: vec!["transition offense".to_string()],
                weaknesses: vec!["free throws".to_string()],
                key_players: vec![],
            },
        }
    }
}

#[async_trait]
impl TeamAnalyzer for ScriptedAnalyzer {
    async fn analyze(
        &self,
        _document: &Path,
        role: TeamRole,
        _name_override: Option<&str>,
    ) -> anyhow::Result<TeamDossier> {
        self.calls.lock().push(role);

        let script = match role {
            TeamRole::Home => &self.home,
            TeamRole::Away => &self.away,
        };

        match script {
            AnalyzerScript::Succeed => Ok(Self::dossier(role)),
            AnalyzerScript::Fail(message) => anyhow::bail!("{message}"),
            AnalyzerScript::DelayThenSucceed(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(Self::dossier(role))
            }
        }
    }
}

/// Repository fake: sequential ids, stat sheets retained for the simulation
/// stage, every operation logged, and an optional scripted failure point.
pub struct RecordingRepository {
    next_id: AtomicI64,
    cached_team: Option<CachedTeam>,
    teams: Mutex<Vec<(i64, String)>>,
    stats: Mutex<HashMap<i64, Value>>,
    operations: Mutex<Vec<String>>,
    fail_on: Option<&'static str>,
}

impl RecordingRepository {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            cached_team: None,
            teams: Mutex::new(Vec::new()),
            stats: Mutex::new(HashMap::new()),
            operations: Mutex::new(Vec::new()),
            fail_on: None,
        }
    }

    /// Seed an already-analyzed home team for cache-hit runs.
    pub fn with_cached_team(mut self) -> Self {
        let team_id = self.next_id.fetch_add(3, Ordering::SeqCst);
        self.cached_team = Some(CachedTeam {
            team_id,
            team_stats_id: team_id + 1,
            team_analysis_id: team_id + 2,
        });
        self.teams.lock().push((team_id, "Cached Home".to_string()));
        self.stats.lock().insert(
            team_id,
            json!({
                "PPG": 82.0, "REB": 41.0, "FG%": 51.0, "3P%": 36.0,
                "TO": 9.0, "AST": 19.0, "STL": 8.0, "BLK": 5.0,
            }),
        );
        self
    }

    /// Make the named operation fail when the pipeline reaches it.
    pub fn failing_on(mut self, operation: &'static str) -> Self {
        self.fail_on = Some(operation);
        self
    }

    pub fn operations(&self) -> Vec<String> {
        self.operations.lock().clone()
    }

    pub fn team_names(&self) -> Vec<String> {
        self.teams.lock().iter().map(|(_, name)| name.clone()).collect()
    }

    fn begin(&self, operation: &str) -> anyhow::Result<()> {
        self.operations.lock().push(operation.to_string());
        if self.fail_on == Some(operation) {
            anyhow::bail!("scripted {operation} failure");
        }
        Ok(())
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

#[async_trait]
impl MatchupRepository for RecordingRepository {
    async fn insert_team(&self, details: &TeamDetails) -> anyhow::Result<i64> {
        self.begin("insert_team")?;
        let team_id = self.next_id();
        self.teams.lock().push((team_id, details.team_name.clone()));
        Ok(team_id)
    }

    async fn insert_team_stats(&self, team_id: i64, stats: &Value) -> anyhow::Result<i64> {
        self.begin("insert_team_stats")?;
        self.stats.lock().insert(team_id, stats.clone());
        Ok(self.next_id())
    }

    async fn insert_team_analysis(
        &self,
        _team_id: i64,
        _analysis: &TeamAnalysis,
    ) -> anyhow::Result<i64> {
        self.begin("insert_team_analysis")?;
        Ok(self.next_id())
    }

    async fn find_cached_team(&self, _team_uuid: Uuid) -> anyhow::Result<Option<CachedTeam>> {
        self.begin("find_cached_team")?;
        Ok(self.cached_team)
    }

    async fn team_profile(&self, team_id: i64) -> anyhow::Result<TeamProfile> {
        self.begin("team_profile")?;
        let stats = self.stats.lock();
        let sheet = stats
            .get(&team_id)
            .ok_or_else(|| anyhow::anyhow!("no stats stored for team {team_id}"))?;
        let name = self
            .teams
            .lock()
            .iter()
            .find(|(id, _)| *id == team_id)
            .map(|(_, name)| name.clone())
            .unwrap_or_else(|| format!("team-{team_id}"));
        Ok(TeamProfile::from_stats(name, sheet))
    }

    async fn insert_game(&self, _home_team_id: i64, _away_team_id: i64) -> anyhow::Result<GameRef> {
        self.begin("insert_game")?;
        Ok(GameRef {
            game_id: self.next_id(),
            game_uuid: Uuid::new_v4(),
        })
    }

    async fn attach_stats_to_game(&self, _team_stats_id: i64, _game_id: i64) -> anyhow::Result<()> {
        self.begin("attach_stats_to_game")?;
        Ok(())
    }

    async fn insert_report(
        &self,
        _game_id: i64,
        kind: ReportKind,
        _path: &Path,
    ) -> anyhow::Result<i64> {
        self.begin(&format!("insert_report:{}", kind.as_str()))?;
        Ok(self.next_id())
    }

    async fn insert_game_simulation(
        &self,
        _game_id: i64,
        result: &AggregateSimulationResult,
    ) -> anyhow::Result<i64> {
        self.begin("insert_game_simulation")?;
        anyhow::ensure!(
            result.team_a_wins + result.team_b_wins == result.num_simulations,
            "aggregate wins do not partition trials"
        );
        Ok(self.next_id())
    }

    async fn insert_simulation_details(
        &self,
        _simulation_id: i64,
        _game_id: i64,
        _home_team_id: i64,
        _away_team_id: i64,
        _result: &AggregateSimulationResult,
    ) -> anyhow::Result<i64> {
        self.begin("insert_simulation_details")?;
        Ok(self.next_id())
    }
}

/// Report writer fake rendering into a temp directory.
pub struct StubReports {
    dir: TempDir,
}

impl StubReports {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp dir for stub reports"),
        }
    }
}

#[async_trait]
impl ReportWriter for StubReports {
    async fn team_analysis_report(&self, team_id: i64) -> anyhow::Result<PathBuf> {
        let path = self.dir.path().join(format!("team_{team_id}.docx"));
        tokio::fs::write(&path, b"stub report").await?;
        Ok(path)
    }

    async fn game_report(&self, game_id: i64) -> anyhow::Result<PathBuf> {
        let path = self.dir.path().join(format!("game_{game_id}.docx"));
        tokio::fs::write(&path, b"stub report").await?;
        Ok(path)
    }
}

/// Store wrapper that records every committed (status, step) pair, in order,
/// so tests can assert what a poller could have observed.
pub struct ObservedStore {
    inner: InMemoryTaskStore,
    observed: Mutex<Vec<(TaskStatus, i32)>>,
}

impl ObservedStore {
    pub fn new() -> Self {
        Self {
            inner: InMemoryTaskStore::new(),
            observed: Mutex::new(Vec::new()),
        }
    }

    pub fn observed(&self) -> Vec<(TaskStatus, i32)> {
        self.observed.lock().clone()
    }
}

#[async_trait]
impl TaskStatusStore for ObservedStore {
    async fn create(&self, record: ProcessingTask) -> CoreResult<()> {
        let snapshot = (record.status, record.step);
        self.inner.create(record).await?;
        self.observed.lock().push(snapshot);
        Ok(())
    }

    async fn get(&self, task_uuid: Uuid) -> CoreResult<Option<ProcessingTask>> {
        self.inner.get(task_uuid).await
    }

    async fn apply(&self, task_uuid: Uuid, event: TaskEvent) -> CoreResult<ProcessingTask> {
        let record = self.inner.apply(task_uuid, event).await?;
        self.observed.lock().push((record.status, record.step));
        Ok(record)
    }

    async fn recently_completed(&self, limit: usize) -> CoreResult<Vec<ProcessingTask>> {
        self.inner.recently_completed(limit).await
    }
}

/// Everything an integration test needs, wired together.
pub struct Harness {
    pub dispatcher: PipelineDispatcher<ObservedStore>,
    pub store: Arc<ObservedStore>,
    pub analyzer: Arc<ScriptedAnalyzer>,
    pub repository: Arc<RecordingRepository>,
}

pub fn harness(analyzer: ScriptedAnalyzer, repository: RecordingRepository) -> Harness {
    harness_with(analyzer, repository, test_config())
}

pub fn harness_with(
    analyzer: ScriptedAnalyzer,
    repository: RecordingRepository,
    config: PipelineConfig,
) -> Harness {
    let store = Arc::new(ObservedStore::new());
    let analyzer = Arc::new(analyzer);
    let repository = Arc::new(repository);
    let reports = Arc::new(StubReports::new());

    let orchestrator = PipelineOrchestrator::new(
        store.clone(),
        analyzer.clone() as Arc<dyn TeamAnalyzer>,
        repository.clone() as Arc<dyn MatchupRepository>,
        reports as Arc<dyn ReportWriter>,
        config,
    );

    Harness {
        dispatcher: PipelineDispatcher::new(orchestrator, store.clone()),
        store,
        analyzer,
        repository,
    }
}

/// Deterministic pipeline configuration for tests.
pub fn test_config() -> PipelineConfig {
    PipelineConfig {
        num_simulations: 50,
        simulation_seed: Some(7),
        ..PipelineConfig::default()
    }
}
