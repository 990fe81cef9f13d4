//! Sudoku grids, datasets and solution checking

pub mod grid;
pub mod io;
pub mod validator;

pub use grid::Grid;
pub use io::{grid_to_digits, load_dataset, parse_dataset, save_grid_to_file, PuzzleRecord};
pub use validator::{SolutionValidator, ValidationReport, Violation};
