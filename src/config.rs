//! # Pipeline Configuration
//!
//! Configuration loading for the matchup pipeline: defaults, an optional
//! `matchup.toml` file, and `MATCHUP_*` environment overrides, in that order.
//! There are no silent fallbacks past this layer; components receive a fully
//! resolved [`PipelineConfig`].

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default number of Monte Carlo trials per simulation run.
pub const DEFAULT_NUM_SIMULATIONS: u32 = 100;

/// Resolved configuration for the pipeline and simulation stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of Monte Carlo trials per simulation run
    pub num_simulations: u32,
    /// Worker threads for the simulation stage; 1 runs trials sequentially
    pub simulation_workers: usize,
    /// Fixed seed for reproducible simulation runs; None draws a fresh seed per run
    pub simulation_seed: Option<u64>,
    /// Upper bound on a single pipeline stage, in seconds; None means unbounded,
    /// matching the default behavior of letting a hung external call block its stage
    pub stage_timeout_seconds: Option<u64>,
    /// Postgres connection string for the task-status store
    pub database_url: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            num_simulations: DEFAULT_NUM_SIMULATIONS,
            simulation_workers: 1,
            simulation_seed: None,
            stage_timeout_seconds: None,
            database_url: None,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from `matchup.toml` (if present) and `MATCHUP_*`
    /// environment variables, on top of built-in defaults.
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name("matchup").required(false))
            .add_source(Environment::with_prefix("MATCHUP"))
            .build()?;

        let loaded: PipelineConfig = settings.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Reject configurations that would make a simulation run meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.num_simulations == 0 {
            return Err(crate::error::MatchupError::Configuration {
                message: "num_simulations must be at least 1".to_string(),
            });
        }
        if self.simulation_workers == 0 {
            return Err(crate::error::MatchupError::Configuration {
                message: "simulation_workers must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
