//! # Team Models
//!
//! Analyzer output (the loosely-typed dossier extracted from an uploaded
//! document) and the typed statistical profile consumed by the simulation.
//!
//! Upstream stat sheets are loosely typed: keys may be missing and percentage
//! fields arrive either as numbers or as `"47.5%"` strings. All of that
//! tolerance lives in one normalization step, [`TeamProfile::from_stats`];
//! everything downstream works with validated `f64` fields.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::simulation::SimulationError;

/// Which side of the matchup a team occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamRole {
    Home,
    Away,
}

impl fmt::Display for TeamRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => write!(f, "home"),
            Self::Away => write!(f, "away"),
        }
    }
}

/// Identifying details extracted for a team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamDetails {
    pub team_name: String,
    #[serde(default)]
    pub record: Option<String>,
    #[serde(default)]
    pub ranking: Option<String>,
}

/// Narrative analysis extracted for a team.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamAnalysis {
    #[serde(default)]
    pub playing_style: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub key_players: Vec<String>,
}

/// Everything the analyzer produces for one team: identity, a raw stat sheet,
/// and narrative analysis. The stat sheet stays loosely typed here; it is
/// normalized into a [`TeamProfile`] only at the simulation boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamDossier {
    pub details: TeamDetails,
    pub stats: Value,
    #[serde(default)]
    pub analysis: TeamAnalysis,
}

impl TeamDossier {
    /// Apply a caller-supplied display name over the extracted one.
    pub fn with_name_override(mut self, name: Option<&str>) -> Self {
        if let Some(name) = name {
            self.details.team_name = name.to_string();
        }
        self
    }
}

/// Typed per-team aggregate statistics consumed by the simulation engine.
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamProfile {
    pub team_name: String,
    /// Points per game
    pub ppg: f64,
    /// Rebounds per game
    pub rpg: f64,
    /// Field-goal percentage (0..100)
    pub fg_pct: f64,
    /// Three-point percentage (0..100)
    pub three_pct: f64,
    /// Turnovers per game
    pub topg: f64,
    /// Assists per game
    pub apg: f64,
    /// Steals per game
    pub spg: f64,
    /// Blocks per game
    pub bpg: f64,
}

impl TeamProfile {
    /// Normalize a loose stat sheet into a typed profile. Missing keys default
    /// to zero; numbers and `"47.5%"`-style strings are both accepted.
    pub fn from_stats(team_name: impl Into<String>, stats: &Value) -> Self {
        Self {
            team_name: team_name.into(),
            ppg: stat_value(stats, "PPG"),
            rpg: stat_value(stats, "REB"),
            fg_pct: stat_value(stats, "FG%"),
            three_pct: stat_value(stats, "3P%"),
            topg: stat_value(stats, "TO"),
            apg: stat_value(stats, "AST"),
            spg: stat_value(stats, "STL"),
            bpg: stat_value(stats, "BLK"),
        }
    }

    /// Fail fast on profiles that would make every trial silently wrong:
    /// non-finite values, a non-positive scoring baseline, or negative rates.
    pub fn validate(&self) -> Result<(), SimulationError> {
        let fields = [
            ("PPG", self.ppg),
            ("REB", self.rpg),
            ("FG%", self.fg_pct),
            ("3P%", self.three_pct),
            ("TO", self.topg),
            ("AST", self.apg),
            ("STL", self.spg),
            ("BLK", self.bpg),
        ];

        for (field, value) in fields {
            if !value.is_finite() {
                return Err(SimulationError::InvalidProfile {
                    team: self.team_name.clone(),
                    field: field.to_string(),
                    reason: format!("value {value} is not finite"),
                });
            }
            if value < 0.0 {
                return Err(SimulationError::InvalidProfile {
                    team: self.team_name.clone(),
                    field: field.to_string(),
                    reason: format!("value {value} is negative"),
                });
            }
        }

        if self.ppg == 0.0 {
            return Err(SimulationError::InvalidProfile {
                team: self.team_name.clone(),
                field: "PPG".to_string(),
                reason: "scoring baseline is missing or zero".to_string(),
            });
        }

        Ok(())
    }
}

/// Extract one numeric stat from a loose sheet: a JSON number, or a string
/// with an optional trailing percent sign. Anything else counts as zero.
fn stat_value(stats: &Value, key: &str) -> f64 {
    match stats.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}
