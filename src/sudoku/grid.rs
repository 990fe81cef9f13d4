//! Puzzle grid representation

use crate::sat::{Dimensions, EncodingError};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An N x N sudoku grid, row-major, `0` marking an empty cell
///
/// Grids are never resized or edited after construction; decoding a solver
/// assignment produces a fresh grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    cells: Vec<u8>,
}

impl Grid {
    /// Largest side length a grid can hold
    pub const MAX_SIZE: usize = u8::MAX as usize;

    /// Largest side length the one-character-per-cell notation can express
    pub const MAX_DIGITS_SIZE: usize = 35;

    /// Create an empty grid
    pub fn empty(size: usize) -> Result<Self> {
        Self::from_cells(size, vec![0; size * size])
    }

    /// Create a grid from row-major cells
    pub fn from_cells(size: usize, cells: Vec<u8>) -> Result<Self> {
        if size == 0 || size > Self::MAX_SIZE {
            anyhow::bail!("Grid size {} is outside 1..={}", size, Self::MAX_SIZE);
        }
        if cells.len() != size * size {
            anyhow::bail!("Expected {} cells for a {}x{} grid, got {}", size * size, size, size, cells.len());
        }
        if let Some((i, &value)) = cells.iter().enumerate().find(|&(_, &v)| v as usize > size) {
            anyhow::bail!("Cell ({}, {}) holds {} but values must be in 0..={}", i / size, i % size, value, size);
        }
        Ok(Self { size, cells })
    }

    /// Create a grid from a 2D array
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self> {
        let size = rows.len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != size {
                anyhow::bail!("Row {} has length {}, expected {}", i, row.len(), size);
            }
        }
        Self::from_cells(size, rows.into_iter().flatten().collect())
    }

    /// Parse the flat dataset notation: one character per cell, `0` or `.`
    /// for an empty cell, base-36 digits for values, so sizes up to
    /// [`Grid::MAX_DIGITS_SIZE`]
    pub fn from_digits(size: usize, digits: &str) -> Result<Self> {
        if size > Self::MAX_DIGITS_SIZE {
            anyhow::bail!("Grid size {} cannot be written one character per cell", size);
        }
        let digits = digits.trim();
        let mut cells = Vec::with_capacity(size * size);
        for (i, ch) in digits.chars().enumerate() {
            let value = match ch {
                '.' => 0,
                _ => ch
                    .to_digit(36)
                    .ok_or_else(|| anyhow::anyhow!("Invalid character '{}' at position {}", ch, i))?,
            };
            cells.push(value as u8);
        }
        Self::from_cells(size, cells)
    }

    /// Built by the decoder once every cell is known to be in range
    pub(crate) fn from_decoded(size: usize, cells: Vec<u8>) -> Self {
        debug_assert_eq!(cells.len(), size * size);
        Self { size, cells }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Encoding dimensions for this grid (N rows, N columns, N values)
    pub fn dimensions(&self) -> Result<Dimensions, EncodingError> {
        Dimensions::square(self.size)
    }

    /// Value at (row, column); 0 when empty
    pub fn get(&self, row: usize, column: usize) -> u8 {
        self.cells[row * self.size + column]
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Iterate over rows
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks(self.size)
    }

    /// Filled cells as (row, column, value)
    pub fn givens(&self) -> impl Iterator<Item = (usize, usize, u8)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v != 0)
            .map(|(i, &v)| (i / self.size, i % self.size, v))
    }

    /// Count of filled cells
    pub fn given_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v != 0).count()
    }

    /// True when no cell is empty
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|&v| v != 0)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::empty(9).unwrap();
        assert_eq!(grid.size(), 9);
        assert_eq!(grid.cells().len(), 81);
        assert_eq!(grid.given_count(), 0);
        assert!(!grid.is_complete());
    }

    #[test]
    fn test_grid_from_rows() {
        let grid = Grid::from_rows(vec![
            vec![1, 0, 0, 4],
            vec![0, 0, 0, 0],
            vec![0, 3, 0, 0],
            vec![0, 0, 0, 2],
        ])
        .unwrap();
        assert_eq!(grid.get(0, 3), 4);
        assert_eq!(grid.given_count(), 4);
        let givens: Vec<_> = grid.givens().collect();
        assert_eq!(givens, vec![(0, 0, 1), (0, 3, 4), (2, 1, 3), (3, 3, 2)]);
    }

    #[test]
    fn test_from_digits() {
        let digits = "004300209005009001070060043006002087190007400050083000600000105003508690042910300";
        let grid = Grid::from_digits(9, digits).unwrap();
        assert_eq!(grid.get(0, 2), 4);
        assert_eq!(grid.get(8, 8), 0);
        assert_eq!(grid.given_count(), digits.chars().filter(|&c| c != '0').count());

        let dotted = Grid::from_digits(4, "1..4....3......2").unwrap();
        assert_eq!(dotted.get(0, 3), 4);
        assert_eq!(dotted.get(3, 3), 2);
    }

    #[test]
    fn test_invalid_input() {
        // wrong length
        assert!(Grid::from_digits(4, "123").is_err());
        // value above size
        assert!(Grid::from_digits(4, "5000000000000000").is_err());
        // not a digit
        assert!(Grid::from_digits(4, "x000000000000000").is_err());
        // ragged rows
        assert!(Grid::from_rows(vec![vec![0, 0], vec![0]]).is_err());
        assert!(Grid::empty(0).is_err());
        // too large for single-character cells
        assert!(Grid::from_digits(36, &"0".repeat(36 * 36)).is_err());
    }

    #[test]
    fn test_display() {
        let grid = Grid::from_digits(4, "1234341221434321").unwrap();
        assert_eq!(grid.to_string(), "1 2 3 4\n3 4 1 2\n2 1 4 3\n4 3 2 1\n");
    }
}
