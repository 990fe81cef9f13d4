//! Independent checking of decoded solutions

use super::Grid;
use crate::sat::PuzzleVariant;
use crate::sat::variables::integer_sqrt;
use std::collections::HashSet;
use std::fmt;

/// A single way in which a solution breaks the puzzle rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    SizeMismatch { puzzle: usize, solution: usize },
    GivenChanged { row: usize, column: usize, given: u8, found: u8 },
    EmptyCell { row: usize, column: usize },
    DuplicateInRow { row: usize, value: u8 },
    DuplicateInColumn { column: usize, value: u8 },
    DuplicateInBlock { block: usize, value: u8 },
    DuplicateOnDiagonal { anti: bool, value: u8 },
    NoStripe,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::SizeMismatch { puzzle, solution } => {
                write!(f, "solution is {0}x{0} but the puzzle is {1}x{1}", solution, puzzle)
            }
            Violation::GivenChanged { row, column, given, found } => {
                write!(f, "given {} at ({}, {}) became {}", given, row, column, found)
            }
            Violation::EmptyCell { row, column } => write!(f, "cell ({}, {}) is empty", row, column),
            Violation::DuplicateInRow { row, value } => write!(f, "{} repeats in row {}", value, row),
            Violation::DuplicateInColumn { column, value } => {
                write!(f, "{} repeats in column {}", value, column)
            }
            Violation::DuplicateInBlock { block, value } => write!(f, "{} repeats in block {}", value, block),
            Violation::DuplicateOnDiagonal { anti, value } => {
                let which = if *anti { "anti-diagonal" } else { "main diagonal" };
                write!(f, "{} repeats on the {}", value, which)
            }
            Violation::NoStripe => write!(f, "no row, column or block runs in order"),
        }
    }
}

/// Result of solution validation
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            return writeln!(f, "Solution is valid");
        }
        writeln!(f, "Solution has {} violation(s):", self.violations.len())?;
        for violation in &self.violations {
            writeln!(f, "  - {}", violation)?;
        }
        Ok(())
    }
}

/// Validates solved grids against a puzzle and its variant
pub struct SolutionValidator {
    variant: PuzzleVariant,
}

impl SolutionValidator {
    pub fn new(variant: PuzzleVariant) -> Self {
        Self { variant }
    }

    /// Check `solution` against `puzzle` under every rule of the variant
    pub fn validate(&self, puzzle: &Grid, solution: &Grid) -> ValidationReport {
        let mut violations = Vec::new();
        let size = solution.size();

        if puzzle.size() != size {
            violations.push(Violation::SizeMismatch {
                puzzle: puzzle.size(),
                solution: size,
            });
            return ValidationReport { violations };
        }

        for (row, column, given) in puzzle.givens() {
            let found = solution.get(row, column);
            if found != given {
                violations.push(Violation::GivenChanged { row, column, given, found });
            }
        }

        for row in 0..size {
            for column in 0..size {
                if solution.get(row, column) == 0 {
                    violations.push(Violation::EmptyCell { row, column });
                }
            }
        }

        let rows = row_units(size);
        let columns = column_units(size);
        let blocks = block_units(size);

        for (row, unit) in rows.iter().enumerate() {
            for value in duplicates(solution, unit) {
                violations.push(Violation::DuplicateInRow { row, value });
            }
        }
        for (column, unit) in columns.iter().enumerate() {
            for value in duplicates(solution, unit) {
                violations.push(Violation::DuplicateInColumn { column, value });
            }
        }
        for (block, unit) in blocks.iter().enumerate() {
            for value in duplicates(solution, unit) {
                violations.push(Violation::DuplicateInBlock { block, value });
            }
        }

        if self.variant.has_diagonals() {
            let main: Vec<(usize, usize)> = (0..size).map(|i| (i, i)).collect();
            let anti: Vec<(usize, usize)> = (0..size).map(|i| (i, size - 1 - i)).collect();
            for value in duplicates(solution, &main) {
                violations.push(Violation::DuplicateOnDiagonal { anti: false, value });
            }
            for value in duplicates(solution, &anti) {
                violations.push(Violation::DuplicateOnDiagonal { anti: true, value });
            }
        }

        if self.variant.has_stripe() {
            let striped = rows
                .iter()
                .chain(&columns)
                .chain(&blocks)
                .any(|unit| is_stripe(solution, unit));
            if !striped {
                violations.push(Violation::NoStripe);
            }
        }

        ValidationReport { violations }
    }
}

fn row_units(size: usize) -> Vec<Vec<(usize, usize)>> {
    (0..size).map(|r| (0..size).map(|c| (r, c)).collect()).collect()
}

fn column_units(size: usize) -> Vec<Vec<(usize, usize)>> {
    (0..size).map(|c| (0..size).map(|r| (r, c)).collect()).collect()
}

/// Row-major blocks with row-major cells; empty for non-square sizes
fn block_units(size: usize) -> Vec<Vec<(usize, usize)>> {
    let Some(side) = integer_sqrt(size) else {
        return Vec::new();
    };
    let mut units = Vec::with_capacity(size);
    for block_row in 0..side {
        for block_column in 0..side {
            let mut cells = Vec::with_capacity(size);
            for r in 0..side {
                for c in 0..side {
                    cells.push((block_row * side + r, block_column * side + c));
                }
            }
            units.push(cells);
        }
    }
    units
}

/// Values appearing more than once in the unit, each reported once
fn duplicates(grid: &Grid, unit: &[(usize, usize)]) -> Vec<u8> {
    let mut seen = HashSet::new();
    let mut repeated = Vec::new();
    for &(r, c) in unit {
        let value = grid.get(r, c);
        if value != 0 && !seen.insert(value) && !repeated.contains(&value) {
            repeated.push(value);
        }
    }
    repeated
}

/// Unit reads 1, 2, .., N or N, .., 2, 1 along its traversal
fn is_stripe(grid: &Grid, unit: &[(usize, usize)]) -> bool {
    let n = unit.len();
    let values: Vec<usize> = unit.iter().map(|&(r, c)| grid.get(r, c) as usize).collect();
    let ascending = values.iter().enumerate().all(|(i, &v)| v == i + 1);
    let descending = values.iter().enumerate().all(|(i, &v)| v == n - i);
    ascending || descending
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUZZLE: &str = "004300209005009001070060043006002087190007400050083000600000105003508690042910300";
    const SOLVED: &str = "864371259325849761971265843436192587198657432257483916689734125713528694542916378";

    fn grid(size: usize, digits: &str) -> Grid {
        Grid::from_digits(size, digits).unwrap()
    }

    #[test]
    fn test_valid_standard_solution() {
        let report = SolutionValidator::new(PuzzleVariant::Standard).validate(&grid(9, PUZZLE), &grid(9, SOLVED));
        assert!(report.is_valid(), "{}", report);
    }

    #[test]
    fn test_swapped_cells_repeat_in_column() {
        let mut cells = grid(9, SOLVED).cells().to_vec();
        cells.swap(0, 1); // (0,0)=8 <-> (0,1)=6
        let broken = Grid::from_cells(9, cells).unwrap();
        let report = SolutionValidator::new(PuzzleVariant::Standard).validate(&grid(9, PUZZLE), &broken);
        assert!(!report.is_valid());
        assert!(report.violations.contains(&Violation::DuplicateInColumn { column: 0, value: 6 }));
    }

    #[test]
    fn test_given_changed() {
        let puzzle = grid(4, "2000000000000000");
        let solution = grid(4, "1234341221434321");
        let report = SolutionValidator::new(PuzzleVariant::Standard).validate(&puzzle, &solution);
        assert_eq!(
            report.violations,
            vec![Violation::GivenChanged { row: 0, column: 0, given: 2, found: 1 }]
        );
    }

    #[test]
    fn test_empty_cells_reported() {
        let puzzle = grid(4, "0000000000000000");
        let report = SolutionValidator::new(PuzzleVariant::Standard).validate(&puzzle, &puzzle);
        assert_eq!(report.violations.len(), 16);
    }

    #[test]
    fn test_diagonals() {
        // both diagonals hold 1, 4, 4, 1 here
        let solution = grid(4, "1234341221434321");
        let x = SolutionValidator::new(PuzzleVariant::XSudoku);
        let report = x.validate(&Grid::empty(4).unwrap(), &solution);
        assert!(report.violations.contains(&Violation::DuplicateOnDiagonal { anti: false, value: 1 }));
        assert!(report.violations.contains(&Violation::DuplicateOnDiagonal { anti: true, value: 4 }));

        // main diagonal 1 4 2 3, anti-diagonal 4 1 3 2
        let x_solution = grid(4, "1234341243212143");
        let report = x.validate(&Grid::empty(4).unwrap(), &x_solution);
        assert!(report.is_valid(), "{}", report);
    }

    #[test]
    fn test_stripe() {
        let stripe = SolutionValidator::new(PuzzleVariant::Stripe);
        // first row ascends
        let report = stripe.validate(&Grid::empty(4).unwrap(), &grid(4, "1234341221434321"));
        assert!(report.is_valid(), "{}", report);

        // no row, column or block reads 1234 or 4321
        let unordered = grid(4, "1243431221343421");
        let report = SolutionValidator::new(PuzzleVariant::Standard).validate(&Grid::empty(4).unwrap(), &unordered);
        assert!(report.is_valid(), "{}", report);
        let report = stripe.validate(&Grid::empty(4).unwrap(), &unordered);
        assert_eq!(report.violations, vec![Violation::NoStripe]);
    }

    #[test]
    fn test_size_mismatch() {
        let report = SolutionValidator::new(PuzzleVariant::Standard)
            .validate(&Grid::empty(4).unwrap(), &grid(9, SOLVED));
        assert_eq!(report.violations, vec![Violation::SizeMismatch { puzzle: 4, solution: 9 }]);
    }
}
