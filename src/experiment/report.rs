//! Aggregated experiment results and their persistence

use super::PuzzleOutcome;
use crate::config::{OutputConfig, OutputFormat};
use crate::sat::PuzzleVariant;
use crate::sudoku::save_grid_to_file;
use anyhow::{Context, Result};
use itertools::Itertools;
use std::fmt;
use std::path::{Path, PathBuf};

pub const METRICS_HEADER: &str =
    "puzzle,variant,satisfiable,max_decision_level,decisions,conflict_clauses,solve_time_ms";

#[derive(Debug, Clone)]
pub struct ExperimentReport {
    pub puzzle_count: usize,
    pub variants: Vec<PuzzleVariant>,
    /// Sorted by puzzle index, then by variant order
    pub outcomes: Vec<PuzzleOutcome>,
}

impl ExperimentReport {
    pub fn new(puzzle_count: usize, variants: Vec<PuzzleVariant>, mut outcomes: Vec<PuzzleOutcome>) -> Self {
        let order = |variant: PuzzleVariant| variants.iter().position(|&v| v == variant);
        outcomes.sort_by_key(|outcome| (outcome.puzzle_index, order(outcome.variant)));
        Self {
            puzzle_count,
            variants,
            outcomes,
        }
    }

    pub fn solvable_count(&self, variant: PuzzleVariant) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.variant == variant && outcome.satisfiable)
            .count()
    }

    /// Puzzles that are satisfiable under every variant of the run
    pub fn solvable_under_all(&self) -> usize {
        self.outcomes
            .iter()
            .into_group_map_by(|outcome| outcome.puzzle_index)
            .values()
            .filter(|group| group.len() == self.variants.len() && group.iter().all(|outcome| outcome.satisfiable))
            .count()
    }

    /// Satisfiable outcomes whose decoded grid broke a rule
    pub fn invalid_solutions(&self) -> impl Iterator<Item = &PuzzleOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.satisfiable && !outcome.is_valid_solution())
    }

    pub fn metrics_csv(&self) -> String {
        let mut csv = String::from(METRICS_HEADER);
        csv.push('\n');
        for outcome in &self.outcomes {
            csv.push_str(&outcome.csv_row());
            csv.push('\n');
        }
        csv
    }

    pub fn write_metrics_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(&path, self.metrics_csv())
            .with_context(|| format!("Failed to write metrics: {}", path.as_ref().display()))
    }

    /// Write `metrics.csv` and, when configured, one file per solved grid.
    /// Returns the paths written.
    pub fn save(&self, output: &OutputConfig) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(&output.directory)
            .with_context(|| format!("Failed to create output directory: {}", output.directory.display()))?;

        let metrics_path = output.directory.join("metrics.csv");
        self.write_metrics_csv(&metrics_path)?;
        let mut written = vec![metrics_path];

        if output.save_solutions {
            for outcome in &self.outcomes {
                let Some(solution) = &outcome.solution else {
                    continue;
                };
                let stem = format!("puzzle_{:05}_{}", outcome.puzzle_index, outcome.variant);
                let path = match output.format {
                    OutputFormat::Text => {
                        let path = output.directory.join(format!("{}.txt", stem));
                        save_grid_to_file(solution, &path)?;
                        path
                    }
                    OutputFormat::Json => {
                        let path = output.directory.join(format!("{}.json", stem));
                        let json = outcome.to_json().context("Failed to serialize outcome")?;
                        std::fs::write(&path, json)
                            .with_context(|| format!("Failed to write solution: {}", path.display()))?;
                        path
                    }
                };
                written.push(path);
            }
        }

        log::info!("wrote {} files to {}", written.len(), output.directory.display());
        Ok(written)
    }
}

impl fmt::Display for ExperimentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Experiment Summary:")?;
        writeln!(f, "  Puzzles: {}", self.puzzle_count)?;
        for &variant in &self.variants {
            writeln!(
                f,
                "  Solvable as {}: {}/{}",
                variant,
                self.solvable_count(variant),
                self.puzzle_count
            )?;
        }
        if self.variants.len() > 1 {
            writeln!(f, "  Solvable under all variants: {}", self.solvable_under_all())?;
        }
        let invalid = self.invalid_solutions().count();
        if invalid > 0 {
            writeln!(f, "  Invalid decoded solutions: {}", invalid)?;
        }
        Ok(())
    }
}
