//! # Game Simulation
//!
//! Monte Carlo simulation of a two-team contest from aggregate statistics.
//!
//! [`engine`] turns two [`TeamProfile`](crate::models::TeamProfile)s into one
//! simulated game; [`aggregator`] runs the engine many times and reduces the
//! trials into win probabilities, average scores, notable games, a margin
//! histogram, and per-factor attribution. All randomness flows through an
//! injected [`rand::Rng`], so runs are reproducible under a fixed seed.

use thiserror::Error;

pub mod aggregator;
pub mod engine;

pub use aggregator::{run_simulations, run_simulations_parallel, SimulationAccumulator};
pub use engine::{simulate_game, simulate_game_with_variance};

/// Errors raised before or during a simulation run.
///
/// Profile problems are detected before the first trial runs; aggregating N
/// trials over invalid input would produce a silently wrong result instead of
/// a visible error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("invalid profile for {team}: {field}: {reason}")]
    InvalidProfile {
        team: String,
        field: String,
        reason: String,
    },

    #[error("simulation requires at least one trial")]
    NoTrials,
}
