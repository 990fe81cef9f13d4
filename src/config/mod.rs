//! Configuration management for the sudoku SAT solver

pub mod settings;

pub use settings::{
    CliOverrides, EncodingConfig, InputConfig, OutputConfig, OutputFormat, PuzzleConfig, Settings,
    SolverBackend, SolverConfig,
};
