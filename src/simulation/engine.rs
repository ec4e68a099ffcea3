//! # Simulation Engine
//!
//! Simulates one game between two teams: a deterministic core that converts
//! statistical differentials into points, plus bounded multiplicative
//! randomness on each team's final score.
//!
//! The scoring model starts from each team's season points per game, computes
//! seven pairwise factor differentials, converts each to points through a
//! fixed weight table, and adds the summed effect to team A's score only.
//! Team A is the side whose advantage is being measured; its opponent's
//! baseline is left untouched so the same differential is not counted twice.

use rand::Rng;

use crate::models::{FactorEffects, SimulatedGame, TeamProfile, Winner};

/// Lower bound of the per-team score variance draw.
pub const SCORE_VARIANCE_MIN: f64 = 0.88;
/// Upper bound of the per-team score variance draw.
pub const SCORE_VARIANCE_MAX: f64 = 1.12;

// Points per unit of differential, per statistical factor.
const REBOUND_WEIGHT: f64 = 0.7;
const FIELD_GOAL_WEIGHT: f64 = 0.25;
const THREE_POINT_WEIGHT: f64 = 0.15;
const TURNOVER_WEIGHT: f64 = 1.0;
const ASSIST_WEIGHT: f64 = 0.5;
const STEAL_WEIGHT: f64 = 1.0;
const BLOCK_WEIGHT: f64 = 0.8;

/// Weighted point contributions of each factor differential, from team A's
/// perspective. Turnovers are inverted so that fewer turnovers for A counts
/// as a positive effect.
fn factor_effects(team_a: &TeamProfile, team_b: &TeamProfile) -> FactorEffects {
    let rebounding = (team_a.rpg - team_b.rpg) * REBOUND_WEIGHT;
    let field_goal = (team_a.fg_pct - team_b.fg_pct) * FIELD_GOAL_WEIGHT;
    let three_point = (team_a.three_pct - team_b.three_pct) * THREE_POINT_WEIGHT;
    let turnovers = (team_b.topg - team_a.topg) * TURNOVER_WEIGHT;
    let assists = (team_a.apg - team_b.apg) * ASSIST_WEIGHT;
    let steals = (team_a.spg - team_b.spg) * STEAL_WEIGHT;
    let blocks = (team_a.bpg - team_b.bpg) * BLOCK_WEIGHT;

    let total = rebounding + field_goal + three_point + turnovers + assists + steals + blocks;

    FactorEffects {
        rebounding,
        field_goal,
        three_point,
        turnovers,
        assists,
        steals,
        blocks,
        total,
    }
}

/// Simulate one game, drawing each team's variance factor independently and
/// uniformly from [[`SCORE_VARIANCE_MIN`], [`SCORE_VARIANCE_MAX`]].
pub fn simulate_game<R: Rng + ?Sized>(
    team_a: &TeamProfile,
    team_b: &TeamProfile,
    rng: &mut R,
) -> SimulatedGame {
    let variance_a = rng.gen_range(SCORE_VARIANCE_MIN..=SCORE_VARIANCE_MAX);
    let variance_b = rng.gen_range(SCORE_VARIANCE_MIN..=SCORE_VARIANCE_MAX);
    simulate_game_with_variance(team_a, team_b, variance_a, variance_b)
}

/// Deterministic core of the engine: simulate one game with fixed variance
/// factors. Passing `1.0` for both factors removes randomness entirely.
///
/// Equal rounded scores award the win to team A, the modeled side.
pub fn simulate_game_with_variance(
    team_a: &TeamProfile,
    team_b: &TeamProfile,
    variance_a: f64,
    variance_b: f64,
) -> SimulatedGame {
    let effects = factor_effects(team_a, team_b);

    let score_a = ((team_a.ppg + effects.total) * variance_a).round() as i32;
    let score_b = (team_b.ppg * variance_b).round() as i32;

    let winner = if score_b > score_a {
        Winner::TeamB
    } else {
        Winner::TeamA
    };

    SimulatedGame {
        score_a,
        score_b,
        winner,
        margin: (score_a - score_b).abs(),
        effects: effects.rounded(),
    }
}
