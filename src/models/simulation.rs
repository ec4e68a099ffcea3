//! # Simulation Models
//!
//! Trial outputs and the Monte Carlo reduction. Serialized field names keep
//! the camelCase wire shape consumed by the dashboard and the simulation
//! tables (`numSimulations`, `teamAWins`, `marginDistribution`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Round to one decimal place, the precision used for all reported
/// percentages, averages, and factor effects.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Which team won a simulated game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    #[serde(rename = "A")]
    TeamA,
    #[serde(rename = "B")]
    TeamB,
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TeamA => write!(f, "A"),
            Self::TeamB => write!(f, "B"),
        }
    }
}

/// Point contribution attributed to each statistical factor in one simulated
/// game, positive when it favors team A.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorEffects {
    pub rebounding: f64,
    pub field_goal: f64,
    pub three_point: f64,
    pub turnovers: f64,
    pub assists: f64,
    pub steals: f64,
    pub blocks: f64,
    pub total: f64,
}

impl FactorEffects {
    /// Copy with every factor rounded to one decimal, the precision recorded
    /// per trial for attribution.
    pub fn rounded(&self) -> Self {
        Self {
            rebounding: round1(self.rebounding),
            field_goal: round1(self.field_goal),
            three_point: round1(self.three_point),
            turnovers: round1(self.turnovers),
            assists: round1(self.assists),
            steals: round1(self.steals),
            blocks: round1(self.blocks),
            total: round1(self.total),
        }
    }

    /// Add another game's effects into this running total.
    pub fn accumulate(&mut self, other: &FactorEffects) {
        self.rebounding += other.rebounding;
        self.field_goal += other.field_goal;
        self.three_point += other.three_point;
        self.turnovers += other.turnovers;
        self.assists += other.assists;
        self.steals += other.steals;
        self.blocks += other.blocks;
        self.total += other.total;
    }

    /// Per-trial mean of an accumulated total, rounded for reporting.
    pub fn mean(&self, trials: u32) -> Self {
        let n = f64::from(trials);
        Self {
            rebounding: round1(self.rebounding / n),
            field_goal: round1(self.field_goal / n),
            three_point: round1(self.three_point / n),
            turnovers: round1(self.turnovers / n),
            assists: round1(self.assists / n),
            steals: round1(self.steals / n),
            blocks: round1(self.blocks / n),
            total: round1(self.total / n),
        }
    }
}

/// One trial's outcome. Ephemeral: exists only inside the aggregation loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatedGame {
    pub score_a: i32,
    pub score_b: i32,
    pub winner: Winner,
    /// Absolute point difference between the two scores
    pub margin: i32,
    pub effects: FactorEffects,
}

/// A trial worth calling out in the reduction (closest game or biggest
/// blowout), annotated with its 1-based trial index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotableGame {
    pub game_number: usize,
    pub score_a: i32,
    pub score_b: i32,
    pub winner: Winner,
    pub margin: i32,
}

impl NotableGame {
    pub fn from_trial(game_number: usize, game: &SimulatedGame) -> Self {
        Self {
            game_number,
            score_a: game.score_a,
            score_b: game.score_b,
            winner: game.winner,
            margin: game.margin,
        }
    }
}

/// Fixed margin ranges for the distribution histogram. Every trial falls into
/// exactly one bucket; a zero margin folds into the lowest range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarginBucket {
    OneToFive,
    SixToTen,
    ElevenToFifteen,
    SixteenToTwenty,
    TwentyOnePlus,
}

impl MarginBucket {
    pub const ALL: [MarginBucket; 5] = [
        Self::OneToFive,
        Self::SixToTen,
        Self::ElevenToFifteen,
        Self::SixteenToTwenty,
        Self::TwentyOnePlus,
    ];

    /// Bucket a margin. Margins of zero land in the lowest bucket.
    pub fn for_margin(margin: i32) -> Self {
        match margin {
            i32::MIN..=5 => Self::OneToFive,
            6..=10 => Self::SixToTen,
            11..=15 => Self::ElevenToFifteen,
            16..=20 => Self::SixteenToTwenty,
            _ => Self::TwentyOnePlus,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::OneToFive => "1-5",
            Self::SixToTen => "6-10",
            Self::ElevenToFifteen => "11-15",
            Self::SixteenToTwenty => "16-20",
            Self::TwentyOnePlus => "21+",
        }
    }
}

/// Count and share of trials landing in one margin bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketStat {
    pub count: u32,
    pub percentage: f64,
}

/// Histogram of trial margins over the five fixed point ranges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarginDistribution {
    #[serde(rename = "1-5")]
    pub one_to_five: BucketStat,
    #[serde(rename = "6-10")]
    pub six_to_ten: BucketStat,
    #[serde(rename = "11-15")]
    pub eleven_to_fifteen: BucketStat,
    #[serde(rename = "16-20")]
    pub sixteen_to_twenty: BucketStat,
    #[serde(rename = "21+")]
    pub twenty_one_plus: BucketStat,
}

impl MarginDistribution {
    pub fn bucket(&self, bucket: MarginBucket) -> &BucketStat {
        match bucket {
            MarginBucket::OneToFive => &self.one_to_five,
            MarginBucket::SixToTen => &self.six_to_ten,
            MarginBucket::ElevenToFifteen => &self.eleven_to_fifteen,
            MarginBucket::SixteenToTwenty => &self.sixteen_to_twenty,
            MarginBucket::TwentyOnePlus => &self.twenty_one_plus,
        }
    }

    pub fn bucket_mut(&mut self, bucket: MarginBucket) -> &mut BucketStat {
        match bucket {
            MarginBucket::OneToFive => &mut self.one_to_five,
            MarginBucket::SixToTen => &mut self.six_to_ten,
            MarginBucket::ElevenToFifteen => &mut self.eleven_to_fifteen,
            MarginBucket::SixteenToTwenty => &mut self.sixteen_to_twenty,
            MarginBucket::TwentyOnePlus => &mut self.twenty_one_plus,
        }
    }

    /// Sum of all bucket counts; equals the trial count after a full run.
    pub fn total_count(&self) -> u32 {
        MarginBucket::ALL
            .iter()
            .map(|bucket| self.bucket(*bucket).count)
            .sum()
    }
}

/// Reduction over all trials of one simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSimulationResult {
    pub num_simulations: u32,
    pub team_a_wins: u32,
    pub team_b_wins: u32,
    pub team_a_win_pct: f64,
    pub team_b_win_pct: f64,
    pub avg_score_a: f64,
    pub avg_score_b: f64,
    pub closest_game: NotableGame,
    pub blowout_game: NotableGame,
    pub margin_distribution: MarginDistribution,
    pub avg_effects: FactorEffects,
}
