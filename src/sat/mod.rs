//! SAT encoding, DIMACS serialization, decoding and oracle access

pub mod constraints;
pub mod decoder;
pub mod dimacs;
pub mod encoder;
pub mod error;
pub mod solver;
pub mod solver_factory;
pub mod variables;

pub use constraints::{Clause, ConstraintGenerator, EncodingMode, StripeFamily};
pub use decoder::SolutionDecoder;
pub use dimacs::{parse_solver_output, to_dimacs, SatResult, SolverOutput};
pub use encoder::{encode_puzzle, CnfInstance, EncodingOptions, FormulaAssembler, PuzzleVariant};
pub use error::{EncodingError, SolverOutputError};
pub use solver::{CadicalOracle, ExternalOracle, OracleOutcome, SatOracle, SolverStatistics};
pub use solver_factory::UnifiedOracle;
pub use variables::{Dimensions, VariableIndexer, VariableKind};
