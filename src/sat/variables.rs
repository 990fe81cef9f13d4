//! Variable indexing for the SAT encoding
//!
//! Every proposition "cell (row, column) holds value v" maps to a positive
//! integer `row * C * K + column * K + v` with `v` in `1..=K`, so the base
//! space is the dense range `1..=R * C * K`. Auxiliary variables live above it.

use super::EncodingError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shape of a puzzle: rows, columns and the number of candidate values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub rows: usize,
    pub columns: usize,
    pub values: usize,
}

impl Dimensions {
    /// Create dimensions, rejecting empty boards and boards whose base
    /// variable space does not fit in a DIMACS literal
    pub fn new(rows: usize, columns: usize, values: usize) -> Result<Self, EncodingError> {
        let malformed = EncodingError::MalformedDimensions { rows, columns, values };
        if rows == 0 || columns == 0 || values == 0 {
            return Err(malformed);
        }
        let fits = rows
            .checked_mul(columns)
            .and_then(|cells| cells.checked_mul(values))
            .is_some_and(|count| count <= i32::MAX as usize);
        if !fits {
            return Err(malformed);
        }
        Ok(Self { rows, columns, values })
    }

    /// An N x N board with values 1..=N
    pub fn square(size: usize) -> Result<Self, EncodingError> {
        Self::new(size, size, size)
    }

    /// Number of base (cell) variables
    pub fn base_count(&self) -> usize {
        self.rows * self.columns * self.values
    }

    /// Height and width of a sub-block, when both sides have integer square roots
    pub fn block_shape(&self) -> Option<(usize, usize)> {
        Some((integer_sqrt(self.rows)?, integer_sqrt(self.columns)?))
    }

    /// Whether the two main diagonals are well defined
    pub fn has_diagonals(&self) -> bool {
        self.rows == self.columns
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} ({} values)", self.rows, self.columns, self.values)
    }
}

/// Exact square root of `n`, if there is one
pub fn integer_sqrt(n: usize) -> Option<usize> {
    let mut root = (n as f64).sqrt() as usize;
    // correct float rounding at the edges
    while root * root > n {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= n {
        root += 1;
    }
    (root * root == n).then_some(root)
}

/// What a variable stands for once the formula has auxiliaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    /// Cell (row, column) holds value (1-based)
    Cell { row: usize, column: usize, value: usize },
    /// Auxiliary with no cell meaning; `offset` counts from the first auxiliary
    Auxiliary { offset: usize },
}

/// Bijection between (row, column, value) triples and base variables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableIndexer {
    dims: Dimensions,
}

impl VariableIndexer {
    pub fn new(dims: Dimensions) -> Self {
        Self { dims }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// Number of base variables; the largest base variable
    pub fn base_count(&self) -> i32 {
        self.dims.base_count() as i32
    }

    /// First index available to auxiliary variables
    pub fn first_auxiliary(&self) -> i32 {
        self.base_count() + 1
    }

    /// Variable for "cell (row, column) holds value", with `value` in `1..=K`
    pub fn index(&self, row: usize, column: usize, value: usize) -> Result<i32, EncodingError> {
        let Dimensions { rows, columns, values } = self.dims;
        if row >= rows || column >= columns || value == 0 || value > values {
            return Err(EncodingError::CoordinateOutOfRange {
                row,
                column,
                value,
                rows,
                columns,
                values,
            });
        }
        Ok(self.var(row, column, value))
    }

    /// Unchecked form of [`index`](Self::index) for encoders iterating in range
    pub(crate) fn var(&self, row: usize, column: usize, value: usize) -> i32 {
        debug_assert!(row < self.dims.rows && column < self.dims.columns);
        debug_assert!((1..=self.dims.values).contains(&value));
        (row * self.dims.columns * self.dims.values + column * self.dims.values + value) as i32
    }

    /// Inverse of [`index`](Self::index): recover (row, column, value)
    ///
    /// The value is taken from the remainder first so that `value == K`
    /// (remainder zero) does not push the column or row one step too far.
    pub fn decode_index(&self, variable: i32) -> Result<(usize, usize, usize), EncodingError> {
        let max = self.base_count();
        if variable < 1 || variable > max {
            return Err(EncodingError::IndexOutOfRange { variable, max });
        }
        let var = variable as usize;
        let k = self.dims.values;
        let row_span = self.dims.columns * k;

        let value = (var - 1) % k + 1;
        let column = ((var - value) % row_span) / k;
        let row = (var - value - column * k) / row_span;
        Ok((row, column, value))
    }

    /// Classify a variable of a formula declaring `total` variables
    pub fn classify(&self, variable: i32, total: i32) -> Result<VariableKind, EncodingError> {
        if variable < 1 || variable > total {
            return Err(EncodingError::IndexOutOfRange { variable, max: total });
        }
        if variable > self.base_count() {
            return Ok(VariableKind::Auxiliary {
                offset: (variable - self.first_auxiliary()) as usize,
            });
        }
        let (row, column, value) = self.decode_index(variable)?;
        Ok(VariableKind::Cell { row, column, value })
    }
}
