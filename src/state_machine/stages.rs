//! # Pipeline Stage Sequence
//!
//! The fixed, ordered list of stages one analysis job moves through. The
//! orchestrator advances the persisted step counter by exactly one stage at a
//! time; pollers resolve the counter back to a description through this enum.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One named step in the fixed pipeline sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Run both team analyses concurrently and persist each dossier
    AnalyzingStatistics,
    /// Create the game row and link the persisted team stats to it
    StoringData,
    /// Generate and record the per-team analysis reports
    GeneratingAnalysis,
    /// Run the Monte Carlo simulation and persist its results
    SimulatingGame,
    /// Generate and record the final matchup report
    GeneratingFinalReport,
    /// Terminal marker, written together with the completed status
    Ready,
}

impl PipelineStage {
    /// All stages in execution order.
    pub const ALL: [PipelineStage; 6] = [
        Self::AnalyzingStatistics,
        Self::StoringData,
        Self::GeneratingAnalysis,
        Self::SimulatingGame,
        Self::GeneratingFinalReport,
        Self::Ready,
    ];

    /// Position of this stage in the sequence.
    pub fn index(&self) -> i32 {
        match self {
            Self::AnalyzingStatistics => 0,
            Self::StoringData => 1,
            Self::GeneratingAnalysis => 2,
            Self::SimulatingGame => 3,
            Self::GeneratingFinalReport => 4,
            Self::Ready => 5,
        }
    }

    /// Resolve a persisted step index back to its stage.
    pub fn from_index(index: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|stage| stage.index() == index)
    }

    /// Human-readable progress description served to status pollers.
    pub fn description(&self) -> &'static str {
        match self {
            Self::AnalyzingStatistics => "Analyzing team statistics",
            Self::StoringData => "Storing data in database",
            Self::GeneratingAnalysis => "Generating team analysis report",
            Self::SimulatingGame => "Simulating game",
            Self::GeneratingFinalReport => "Generating final report",
            Self::Ready => "Your report is ready",
        }
    }

    /// Number of stages in the fixed sequence.
    pub fn total_steps() -> i32 {
        Self::ALL.len() as i32
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}
