//! Error values surfaced by the encode/decode core

use thiserror::Error;

/// Errors raised while indexing, assembling, serializing or decoding a formula
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// The requested board shape cannot be encoded at all
    #[error("cannot encode a {rows}x{columns} board with {values} values")]
    MalformedDimensions {
        rows: usize,
        columns: usize,
        values: usize,
    },

    /// A (row, column, value) triple lies outside the board
    #[error("cell ({row}, {column}) with value {value} is outside a {rows}x{columns}x{values} board")]
    CoordinateOutOfRange {
        row: usize,
        column: usize,
        value: usize,
        rows: usize,
        columns: usize,
        values: usize,
    },

    /// A variable lies outside `[1, max]`
    #[error("variable {variable} is outside the range 1..={max}")]
    IndexOutOfRange { variable: i32, max: i32 },

    /// The header would declare fewer variables than the clauses use
    #[error("declared variable count {declared} is smaller than the largest literal {max_literal}")]
    DeclaredVarCountTooSmall { declared: usize, max_literal: usize },

    /// A clause contains the reserved terminator literal
    #[error("clause {clause} contains the literal 0")]
    ZeroLiteral { clause: usize },

    /// No positive literal assigned a value to this cell
    #[error("assignment leaves cell ({row}, {column}) without a value")]
    IncompleteAssignment { row: usize, column: usize },

    /// Two positive literals claim the same cell
    #[error("assignment gives cell ({row}, {column}) both {first} and {second}")]
    ConflictingAssignment {
        row: usize,
        column: usize,
        first: usize,
        second: usize,
    },
}

/// Errors raised while reading a solver's textual output
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverOutputError {
    /// Neither an `s` status line nor a `RESULT:` marker was found
    #[error("solver output has no satisfiability verdict")]
    MissingResult,

    /// The solver gave up or printed a verdict we do not recognise
    #[error("solver reported `{0}` instead of a verdict")]
    Indeterminate(String),

    /// The verdict was satisfiable but no model followed
    #[error("solver reported SAT without an assignment")]
    MissingAssignment,

    /// A token in the model was not an integer literal
    #[error("`{0}` is not a literal")]
    InvalidLiteral(String),

    /// A statistic was announced but its value was absent or malformed
    #[error("statistic `{0}` has no numeric value")]
    InvalidStatistic(String),
}
