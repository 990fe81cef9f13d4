//! Turning a satisfying assignment back into a grid

use super::{Dimensions, EncodingError, VariableIndexer, VariableKind};
use crate::sudoku::Grid;

/// Maps solver assignments over the base variables back to grids
#[derive(Debug, Clone, Copy)]
pub struct SolutionDecoder {
    indexer: VariableIndexer,
}

impl SolutionDecoder {
    /// Decoder for an N x N grid with values 1..=N
    pub fn for_size(size: usize) -> Result<Self, EncodingError> {
        let dims = Dimensions::square(size)?;
        if size > Grid::MAX_SIZE {
            return Err(EncodingError::MalformedDimensions {
                rows: size,
                columns: size,
                values: size,
            });
        }
        Ok(Self {
            indexer: VariableIndexer::new(dims),
        })
    }

    /// Build a grid from the positive base literals of `assignment`, an
    /// assignment for a formula declaring `num_variables` variables
    ///
    /// Negative literals, the `0` terminator and auxiliary variables carry no
    /// cell information and are skipped. Any variable outside
    /// `1..=num_variables` is rejected.
    pub fn decode(&self, assignment: &[i32], num_variables: usize) -> Result<Grid, EncodingError> {
        let size = self.indexer.dimensions().rows;
        let total = i32::try_from(num_variables).unwrap_or(i32::MAX);
        let mut cells = vec![0u8; size * size];

        for &literal in assignment.iter().filter(|&&lit| lit != 0) {
            let variable = literal
                .checked_abs()
                .ok_or(EncodingError::IndexOutOfRange { variable: literal, max: total })?;
            let VariableKind::Cell { row, column, value } = self.indexer.classify(variable, total)? else {
                continue;
            };
            if literal < 0 {
                continue;
            }
            let cell = &mut cells[row * size + column];
            if *cell != 0 {
                return Err(EncodingError::ConflictingAssignment {
                    row,
                    column,
                    first: *cell as usize,
                    second: value,
                });
            }
            *cell = value as u8;
        }

        if let Some(i) = cells.iter().position(|&v| v == 0) {
            return Err(EncodingError::IncompleteAssignment {
                row: i / size,
                column: i % size,
            });
        }

        Ok(Grid::from_decoded(size, cells))
    }
}
