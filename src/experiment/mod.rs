//! Dataset experiments: solve many puzzles under several variants

pub mod outcome;
pub mod report;
pub mod runner;

pub use outcome::PuzzleOutcome;
pub use report::{ExperimentReport, METRICS_HEADER};
pub use runner::Experiment;
