//! # Simulation Aggregator
//!
//! Runs the engine N times and reduces the trials into an
//! [`AggregateSimulationResult`]. Trials are independent, so two execution
//! models are supported: a sequential loop against one injected rng, and a
//! merge-of-partials mode that partitions trials into contiguous per-worker
//! chunks on crossbeam scoped threads and merges the partial accumulators in
//! worker order. Global 1-based trial indices are stable in both modes, so
//! closest/blowout tie-breaking (first trial encountered wins) is identical.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::models::simulation::round1;
use crate::models::{
    AggregateSimulationResult, MarginBucket, MarginDistribution, NotableGame, SimulatedGame,
    FactorEffects, TeamProfile,
};

use super::engine::simulate_game;
use super::SimulationError;

/// Running reduction over simulated games.
///
/// Accumulators over disjoint trial ranges can be merged; merging keeps the
/// earliest trial on equal margins, matching sequential behavior.
#[derive(Debug, Default)]
pub struct SimulationAccumulator {
    trials: u32,
    team_a_wins: u32,
    team_b_wins: u32,
    score_a_total: f64,
    score_b_total: f64,
    effect_totals: FactorEffects,
    closest: Option<NotableGame>,
    blowout: Option<NotableGame>,
    distribution: MarginDistribution,
}

impl SimulationAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one trial into the running totals. `game_number` is the global
    /// 1-based trial index.
    pub fn record(&mut self, game_number: usize, game: &SimulatedGame) {
        self.trials += 1;
        match game.winner {
            crate::models::Winner::TeamA => self.team_a_wins += 1,
            crate::models::Winner::TeamB => self.team_b_wins += 1,
        }
        self.score_a_total += f64::from(game.score_a);
        self.score_b_total += f64::from(game.score_b);
        self.effect_totals.accumulate(&game.effects);

        // Strict comparisons keep the first trial on equal margins.
        let replace_closest = self
            .closest
            .as_ref()
            .map(|current| game.margin < current.margin)
            .unwrap_or(true);
        if replace_closest {
            self.closest = Some(NotableGame::from_trial(game_number, game));
        }

        let replace_blowout = self
            .blowout
            .as_ref()
            .map(|current| game.margin > current.margin)
            .unwrap_or(true);
        if replace_blowout {
            self.blowout = Some(NotableGame::from_trial(game_number, game));
        }

        self.distribution
            .bucket_mut(MarginBucket::for_margin(game.margin))
            .count += 1;
    }

    /// Merge a partial accumulator covering a later trial range into this one.
    pub fn merge(&mut self, other: SimulationAccumulator) {
        self.trials += other.trials;
        self.team_a_wins += other.team_a_wins;
        self.team_b_wins += other.team_b_wins;
        self.score_a_total += other.score_a_total;
        self.score_b_total += other.score_b_total;
        self.effect_totals.accumulate(&other.effect_totals);

        self.closest = pick_notable(self.closest.take(), other.closest, |a, b| {
            a.margin < b.margin || (a.margin == b.margin && a.game_number <= b.game_number)
        });
        self.blowout = pick_notable(self.blowout.take(), other.blowout, |a, b| {
            a.margin > b.margin || (a.margin == b.margin && a.game_number <= b.game_number)
        });

        for bucket in MarginBucket::ALL {
            self.distribution.bucket_mut(bucket).count += other.distribution.bucket(bucket).count;
        }
    }

    /// Number of trials folded in so far.
    pub fn trials(&self) -> u32 {
        self.trials
    }

    /// Final reduction: win percentages, averages, and bucket percentages,
    /// all rounded to one decimal.
    pub fn finalize(mut self) -> Result<AggregateSimulationResult, SimulationError> {
        if self.trials == 0 {
            return Err(SimulationError::NoTrials);
        }

        let n = f64::from(self.trials);
        for bucket in MarginBucket::ALL {
            let stat = self.distribution.bucket_mut(bucket);
            stat.percentage = round1(f64::from(stat.count) / n * 100.0);
        }

        Ok(AggregateSimulationResult {
            num_simulations: self.trials,
            team_a_wins: self.team_a_wins,
            team_b_wins: self.team_b_wins,
            team_a_win_pct: round1(f64::from(self.team_a_wins) / n * 100.0),
            team_b_win_pct: round1(f64::from(self.team_b_wins) / n * 100.0),
            avg_score_a: round1(self.score_a_total / n),
            avg_score_b: round1(self.score_b_total / n),
            closest_game: self.closest.expect("at least one trial recorded"),
            blowout_game: self.blowout.expect("at least one trial recorded"),
            margin_distribution: self.distribution,
            avg_effects: self.effect_totals.mean(self.trials),
        })
    }
}

/// Keep whichever notable game wins the comparison; `prefer_left` decides
/// whether the left candidate survives when both are present.
fn pick_notable(
    left: Option<NotableGame>,
    right: Option<NotableGame>,
    prefer_left: impl Fn(&NotableGame, &NotableGame) -> bool,
) -> Option<NotableGame> {
    match (left, right) {
        (Some(a), Some(b)) => {
            if prefer_left(&a, &b) {
                Some(a)
            } else {
                Some(b)
            }
        }
        (a, b) => a.or(b),
    }
}

/// Run `num_simulations` trials sequentially against the injected rng and
/// reduce them. Profiles are validated before the first trial runs.
pub fn run_simulations<R: Rng + ?Sized>(
    team_a: &TeamProfile,
    team_b: &TeamProfile,
    num_simulations: u32,
    rng: &mut R,
) -> Result<AggregateSimulationResult, SimulationError> {
    team_a.validate()?;
    team_b.validate()?;
    if num_simulations == 0 {
        return Err(SimulationError::NoTrials);
    }

    let mut accumulator = SimulationAccumulator::new();
    for trial in 1..=num_simulations {
        let game = simulate_game(team_a, team_b, rng);
        accumulator.record(trial as usize, &game);
    }
    accumulator.finalize()
}

/// Run `num_simulations` trials across `workers` scoped threads, one partial
/// accumulator per worker, merged in worker order.
///
/// Trials are partitioned into contiguous chunks so global trial indices are
/// identical to a sequential run. Each worker derives its own ChaCha8 rng
/// from the seed and its chunk position, so a fixed seed and worker count
/// reproduce the same result.
pub fn run_simulations_parallel(
    team_a: &TeamProfile,
    team_b: &TeamProfile,
    num_simulations: u32,
    workers: usize,
    seed: u64,
) -> Result<AggregateSimulationResult, SimulationError> {
    team_a.validate()?;
    team_b.validate()?;
    if num_simulations == 0 {
        return Err(SimulationError::NoTrials);
    }

    let workers = workers.max(1).min(num_simulations as usize);
    if workers == 1 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        return run_simulations(team_a, team_b, num_simulations, &mut rng);
    }

    debug!(num_simulations, workers, "partitioning trials across workers");

    let base = num_simulations as usize / workers;
    let remainder = num_simulations as usize % workers;

    let partials = crossbeam::thread::scope(|scope| {
        let mut handles = Vec::with_capacity(workers);
        let mut start = 0usize;
        for worker in 0..workers {
            let count = base + usize::from(worker < remainder);
            let chunk_start = start;
            start += count;

            handles.push(scope.spawn(move |_| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(worker as u64 + 1));
                let mut partial = SimulationAccumulator::new();
                for offset in 0..count {
                    let game = simulate_game(team_a, team_b, &mut rng);
                    partial.record(chunk_start + offset + 1, &game);
                }
                partial
            }));
        }

        handles
            .into_iter()
            .map(|handle| handle.join().expect("simulation worker panicked"))
            .collect::<Vec<_>>()
    })
    .expect("simulation scope panicked");

    let mut accumulator = SimulationAccumulator::new();
    for partial in partials {
        accumulator.merge(partial);
    }
    accumulator.finalize()
}
