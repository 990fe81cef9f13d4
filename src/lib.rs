//! Sudoku SAT Encoder
//!
//! Encodes sudoku puzzles and their variants (X-sudoku, stripe, X-stripe)
//! as CNF formulas, hands them to a SAT solver and decodes the models back
//! into grids.

pub mod config;
pub mod experiment;
pub mod sat;
pub mod sudoku;
pub mod utils;

pub use config::Settings;
pub use experiment::{Experiment, ExperimentReport};
pub use sat::{EncodingMode, PuzzleVariant, SatOracle};
pub use sudoku::Grid;

use anyhow::Result;

/// Solve a single puzzle; `None` when it has no solution under `variant`
pub fn solve_puzzle<O: SatOracle>(
    grid: &Grid,
    variant: PuzzleVariant,
    mode: EncodingMode,
    oracle: &O,
) -> Result<Option<Grid>> {
    let instance = sat::encode_puzzle(grid, variant.options(mode))?;
    let outcome = oracle.solve(&instance)?;

    match outcome.assignment() {
        Some(assignment) => {
            let decoder = sat::SolutionDecoder::for_size(grid.size())?;
            Ok(Some(decoder.decode(assignment, instance.num_variables)?))
        }
        None => Ok(None),
    }
}
