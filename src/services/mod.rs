//! # External Collaborators
//!
//! Trait seams for the services the pipeline calls into but does not own:
//! the document analyzer (LLM-backed in production), the matchup repository
//! (teams, games, simulations, reports), and the report writer. Their
//! failures are opaque external conditions, so every method returns
//! `anyhow::Result`; the orchestrator adds stage context when wrapping them
//! into pipeline errors.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::models::{AggregateSimulationResult, TeamAnalysis, TeamDetails, TeamDossier, TeamProfile, TeamRole};

/// Extracts a structured statistical dossier for one team from a raw
/// document. Slow and failure-prone; one call per team per pipeline run.
#[async_trait]
pub trait TeamAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        document: &Path,
        role: TeamRole,
        name_override: Option<&str>,
    ) -> anyhow::Result<TeamDossier>;
}

/// Generated identifiers for a team whose dossier is already persisted.
#[derive(Debug, Clone, Copy)]
pub struct CachedTeam {
    pub team_id: i64,
    pub team_stats_id: i64,
    pub team_analysis_id: i64,
}

/// Generated identifiers for a created game row.
#[derive(Debug, Clone, Copy)]
pub struct GameRef {
    pub game_id: i64,
    pub game_uuid: Uuid,
}

/// Report categories recorded against a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    TeamAnalysis,
    OpponentAnalysis,
    GameAnalysis,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TeamAnalysis => "team_analysis",
            Self::OpponentAnalysis => "opponent_analysis",
            Self::GameAnalysis => "game_analysis",
        }
    }
}

/// Persistence collaborator for analysis artifacts. Each write returns the
/// generated identifier; any error fails the pipeline stage that issued it.
/// The two analysis tasks write disjoint rows, so concurrent writers need no
/// coordination from this side.
#[async_trait]
pub trait MatchupRepository: Send + Sync {
    async fn insert_team(&self, details: &TeamDetails) -> anyhow::Result<i64>;

    async fn insert_team_stats(&self, team_id: i64, stats: &Value) -> anyhow::Result<i64>;

    async fn insert_team_analysis(
        &self,
        team_id: i64,
        analysis: &TeamAnalysis,
    ) -> anyhow::Result<i64>;

    /// Resolve an already-analyzed team by its public identifier, for the
    /// path where only the opponent document needs fresh analysis.
    async fn find_cached_team(&self, team_uuid: Uuid) -> anyhow::Result<Option<CachedTeam>>;

    /// Load the persisted stat sheet for a team as a typed simulation profile.
    async fn team_profile(&self, team_id: i64) -> anyhow::Result<TeamProfile>;

    async fn insert_game(&self, home_team_id: i64, away_team_id: i64) -> anyhow::Result<GameRef>;

    async fn attach_stats_to_game(&self, team_stats_id: i64, game_id: i64) -> anyhow::Result<()>;

    async fn insert_report(
        &self,
        game_id: i64,
        kind: ReportKind,
        path: &Path,
    ) -> anyhow::Result<i64>;

    async fn insert_game_simulation(
        &self,
        game_id: i64,
        result: &AggregateSimulationResult,
    ) -> anyhow::Result<i64>;

    async fn insert_simulation_details(
        &self,
        simulation_id: i64,
        game_id: i64,
        home_team_id: i64,
        away_team_id: i64,
        result: &AggregateSimulationResult,
    ) -> anyhow::Result<i64>;
}

/// Renders analysis documents to files, once per pipeline run per report.
#[async_trait]
pub trait ReportWriter: Send + Sync {
    async fn team_analysis_report(&self, team_id: i64) -> anyhow::Result<PathBuf>;

    async fn game_report(&self, game_id: i64) -> anyhow::Result<PathBuf>;
}
