//! Per-puzzle results of an experiment run

use crate::sat::{PuzzleVariant, SolverStatistics};
use crate::sudoku::Grid;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What happened when one puzzle was solved as one variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleOutcome {
    /// Position of the puzzle in the dataset
    pub puzzle_index: usize,
    pub variant: PuzzleVariant,
    pub satisfiable: bool,
    pub max_decision_level: Option<u64>,
    pub decisions: Option<u64>,
    pub added_conflict_clauses: Option<u64>,
    #[serde(skip)]
    pub solve_time: Duration,
    /// Decoded grid for satisfiable instances
    pub solution: Option<Grid>,
    /// Rule violations found by re-checking the decoded grid
    #[serde(default)]
    pub violations: Vec<String>,
}

impl PuzzleOutcome {
    pub fn unsatisfiable(puzzle_index: usize, variant: PuzzleVariant, statistics: &SolverStatistics) -> Self {
        Self::from_statistics(puzzle_index, variant, statistics, None, Vec::new())
    }

    pub fn solved(
        puzzle_index: usize,
        variant: PuzzleVariant,
        statistics: &SolverStatistics,
        solution: Grid,
        violations: Vec<String>,
    ) -> Self {
        Self::from_statistics(puzzle_index, variant, statistics, Some(solution), violations)
    }

    fn from_statistics(
        puzzle_index: usize,
        variant: PuzzleVariant,
        statistics: &SolverStatistics,
        solution: Option<Grid>,
        violations: Vec<String>,
    ) -> Self {
        Self {
            puzzle_index,
            variant,
            satisfiable: solution.is_some(),
            max_decision_level: statistics.max_decision_level,
            decisions: statistics.decisions,
            added_conflict_clauses: statistics.added_conflict_clauses,
            solve_time: statistics.solve_time,
            solution,
            violations,
        }
    }

    /// Satisfiable and the decoded grid passed validation
    pub fn is_valid_solution(&self) -> bool {
        self.satisfiable && self.violations.is_empty()
    }

    /// One row of `metrics.csv`
    pub fn csv_row(&self) -> String {
        fn field(value: Option<u64>) -> String {
            value.map(|v| v.to_string()).unwrap_or_default()
        }
        format!(
            "{},{},{},{},{},{},{}",
            self.puzzle_index,
            self.variant,
            self.satisfiable,
            field(self.max_decision_level),
            field(self.decisions),
            field(self.added_conflict_clauses),
            self.solve_time.as_millis()
        )
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
