//! # Orchestration Types
//!
//! Inputs and intermediate results shared across the orchestration
//! components.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::CachedTeam;

/// Where the home team's dossier comes from for this run.
#[derive(Debug, Clone)]
pub enum HomeSource {
    /// Fresh analysis of an uploaded document
    Document(PathBuf),
    /// An already-analyzed team, resolved from the repository by public id
    Cached(Uuid),
}

/// Fully validated input for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineInput {
    pub task_uuid: Uuid,
    pub home: HomeSource,
    pub away_document: PathBuf,
    pub home_name: Option<String>,
    pub away_name: Option<String>,
}

/// Generated identifiers from one team's completed analysis.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TeamAnalysisOutcome {
    pub team_id: i64,
    pub team_stats_id: i64,
    pub team_analysis_id: i64,
}

impl From<CachedTeam> for TeamAnalysisOutcome {
    fn from(cached: CachedTeam) -> Self {
        Self {
            team_id: cached.team_id,
            team_stats_id: cached.team_stats_id,
            team_analysis_id: cached.team_analysis_id,
        }
    }
}

/// Identifiers produced by a successful pipeline run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PipelineOutcome {
    pub game_id: i64,
    pub game_uuid: Uuid,
    pub simulation_id: i64,
    pub report_id: i64,
}
