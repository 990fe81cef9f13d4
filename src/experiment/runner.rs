//! Solving a dataset of puzzles under several variants

use super::{ExperimentReport, PuzzleOutcome};
use crate::config::Settings;
use crate::sat::{FormulaAssembler, PuzzleVariant, SatOracle, SolutionDecoder};
use crate::sudoku::{PuzzleRecord, SolutionValidator};
use anyhow::{Context, Result};
use rayon::prelude::*;

/// Encodes, solves, decodes and checks every puzzle under every variant
pub struct Experiment<O: SatOracle> {
    settings: Settings,
    oracle: O,
    assemblers: Vec<(PuzzleVariant, FormulaAssembler)>,
    decoder: SolutionDecoder,
}

impl<O: SatOracle> Experiment<O> {
    /// Pre-assemble the rule clauses of each configured variant
    pub fn new(settings: Settings, oracle: O) -> Result<Self> {
        let size = settings.puzzle.size;
        let mut assemblers = Vec::with_capacity(settings.encoding.variants.len());
        for &variant in &settings.encoding.variants {
            let assembler = FormulaAssembler::for_size(size, variant.options(settings.encoding.mode))
                .with_context(|| format!("Failed to encode {} rules", variant))?;
            log::info!(
                "{} rules: {} clauses over {} variables",
                variant,
                assembler.rules().len(),
                assembler.num_variables()
            );
            assemblers.push((variant, assembler));
        }
        let decoder = SolutionDecoder::for_size(size)?;

        Ok(Self {
            settings,
            oracle,
            assemblers,
            decoder,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn variants(&self) -> Vec<PuzzleVariant> {
        self.assemblers.iter().map(|(variant, _)| *variant).collect()
    }

    /// Solve one puzzle under the variant at `variant_index`
    pub fn solve_one(&self, puzzle_index: usize, record: &PuzzleRecord, variant_index: usize) -> Result<PuzzleOutcome> {
        let (variant, assembler) = self
            .assemblers
            .get(variant_index)
            .ok_or_else(|| anyhow::anyhow!("No variant at index {}", variant_index))?;

        let instance = assembler
            .assemble(&record.puzzle)
            .with_context(|| format!("Failed to encode puzzle {}", puzzle_index))?;
        let outcome = self
            .oracle
            .solve(&instance)
            .with_context(|| format!("{} failed on puzzle {} as {}", self.oracle.name(), puzzle_index, variant))?;

        let Some(assignment) = outcome.assignment() else {
            log::debug!("puzzle {} is unsatisfiable as {}", puzzle_index, variant);
            return Ok(PuzzleOutcome::unsatisfiable(puzzle_index, *variant, &outcome.statistics));
        };

        let solution = self
            .decoder
            .decode(assignment, instance.num_variables)
            .with_context(|| format!("Failed to decode puzzle {} as {}", puzzle_index, variant))?;
        let report = SolutionValidator::new(*variant).validate(&record.puzzle, &solution);
        if !report.is_valid() {
            log::warn!("puzzle {} decoded to an invalid {} grid:\n{}", puzzle_index, variant, report);
        }
        let violations = report.violations.iter().map(ToString::to_string).collect();

        log::debug!("puzzle {} solved as {} in {:?}", puzzle_index, variant, outcome.statistics.solve_time);
        Ok(PuzzleOutcome::solved(puzzle_index, *variant, &outcome.statistics, solution, violations))
    }

    /// Solve every (puzzle, variant) pair in parallel
    pub fn run(&self, records: &[PuzzleRecord]) -> Result<ExperimentReport> {
        let jobs: Vec<(usize, usize)> = (0..records.len())
            .flat_map(|puzzle| (0..self.assemblers.len()).map(move |variant| (puzzle, variant)))
            .collect();
        log::info!("solving {} puzzles x {} variants", records.len(), self.assemblers.len());

        let solve_all = || -> Result<Vec<PuzzleOutcome>> {
            jobs.par_iter()
                .map(|&(puzzle, variant)| self.solve_one(puzzle, &records[puzzle], variant))
                .collect()
        };

        let outcomes = match self.settings.solver.threads {
            0 => solve_all()?,
            threads => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .context("Failed to build worker pool")?
                .install(solve_all)?,
        };

        Ok(ExperimentReport::new(records.len(), self.variants(), outcomes))
    }
}
