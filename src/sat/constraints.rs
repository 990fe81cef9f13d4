//! Clause generation for each sudoku constraint family
//!
//! Every encoder is a pure function of the board dimensions. Givens are not
//! consulted here; the assembler adds them as unit clauses afterwards.

use super::{Dimensions, VariableIndexer};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Represents a SAT clause (disjunction of literals)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clause {
    pub literals: Vec<i32>, // Positive for variable, negative for negation
}

impl Clause {
    /// Create a new clause from literals
    pub fn new(literals: Vec<i32>) -> Self {
        Self { literals }
    }

    /// Create a unit clause (single literal)
    pub fn unit(literal: i32) -> Self {
        Self { literals: vec![literal] }
    }

    /// Create a binary clause (two literals)
    pub fn binary(lit1: i32, lit2: i32) -> Self {
        Self { literals: vec![lit1, lit2] }
    }

    /// Check if clause is empty (unsatisfiable)
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Check if clause is unit
    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }

    /// Largest variable mentioned by the clause
    pub fn max_variable(&self) -> usize {
        self.literals.iter().map(|lit| lit.unsigned_abs() as usize).max().unwrap_or(0)
    }
}

impl From<Vec<i32>> for Clause {
    fn from(literals: Vec<i32>) -> Self {
        Self::new(literals)
    }
}

/// Whether clauses implied by other families are emitted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum EncodingMode {
    /// At-least-one per cell, at-most-one per row, column, block and diagonal.
    #[default]
    Minimal,
    /// Adds per-cell at-most-one and per-unit at-least-one clauses.
    Redundant,
}

/// Clauses and auxiliaries produced by one stripe encoder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StripeFamily {
    pub clauses: Vec<Clause>,
    /// One flag per unit, true when that unit is striped
    pub unit_flags: Vec<i32>,
    /// First auxiliary index not used by this family
    pub next_free: i32,
}

impl StripeFamily {
    fn empty(next_free: i32) -> Self {
        Self {
            clauses: Vec::new(),
            unit_flags: Vec::new(),
            next_free,
        }
    }
}

/// Generates the clauses of every constraint family for a board shape
#[derive(Debug, Clone, Copy)]
pub struct ConstraintGenerator {
    indexer: VariableIndexer,
    mode: EncodingMode,
}

impl ConstraintGenerator {
    pub fn new(dims: Dimensions, mode: EncodingMode) -> Self {
        Self {
            indexer: VariableIndexer::new(dims),
            mode,
        }
    }

    pub fn indexer(&self) -> &VariableIndexer {
        &self.indexer
    }

    pub fn mode(&self) -> EncodingMode {
        self.mode
    }

    fn dims(&self) -> Dimensions {
        self.indexer.dimensions()
    }

    fn redundant(&self) -> bool {
        self.mode == EncodingMode::Redundant
    }

    /// Every cell holds at least one value
    pub fn cell_constraints(&self) -> Vec<Clause> {
        let Dimensions { rows, columns, values } = self.dims();
        let mut clauses = Vec::new();

        for row in 0..rows {
            for column in 0..columns {
                let candidates: Vec<i32> =
                    (1..=values).map(|v| self.indexer.var(row, column, v)).collect();
                if self.redundant() {
                    push_at_most_one(&candidates, &mut clauses);
                }
                clauses.push(Clause::new(candidates));
            }
        }

        clauses
    }

    /// Each value at most once per row
    pub fn row_constraints(&self) -> Vec<Clause> {
        let Dimensions { rows, columns, .. } = self.dims();
        let units: Vec<Vec<(usize, usize)>> = (0..rows)
            .map(|row| (0..columns).map(|column| (row, column)).collect())
            .collect();
        self.unit_constraints(&units)
    }

    /// Each value at most once per column
    pub fn column_constraints(&self) -> Vec<Clause> {
        let Dimensions { rows, columns, .. } = self.dims();
        let units: Vec<Vec<(usize, usize)>> = (0..columns)
            .map(|column| (0..rows).map(|row| (row, column)).collect())
            .collect();
        self.unit_constraints(&units)
    }

    /// Each value at most once per sub-block; empty when blocks are not square
    pub fn block_constraints(&self) -> Vec<Clause> {
        match self.block_units() {
            Some(units) => self.unit_constraints(&units),
            None => {
                log::debug!("no square sub-blocks for {}, skipping block clauses", self.dims());
                Vec::new()
            }
        }
    }

    /// Each value at most once along both main diagonals (X-sudoku)
    pub fn diagonal_constraints(&self) -> Vec<Clause> {
        let Dimensions { rows, columns, .. } = self.dims();
        if !self.dims().has_diagonals() {
            log::debug!("{} has no main diagonals, skipping diagonal clauses", self.dims());
            return Vec::new();
        }
        let main: Vec<(usize, usize)> = (0..rows).map(|i| (i, i)).collect();
        let anti: Vec<(usize, usize)> = (0..rows).map(|i| (i, columns - 1 - i)).collect();
        self.unit_constraints(&[main, anti])
    }

    /// Pairwise at-most-one per value over each unit, plus at-least-one in
    /// redundant mode
    fn unit_constraints(&self, units: &[Vec<(usize, usize)>]) -> Vec<Clause> {
        let values = self.dims().values;
        let mut clauses = Vec::new();

        for unit in units {
            for value in 1..=values {
                for (&(r1, c1), &(r2, c2)) in unit.iter().tuple_combinations() {
                    clauses.push(Clause::binary(
                        -self.indexer.var(r1, c1, value),
                        -self.indexer.var(r2, c2, value),
                    ));
                }
                if self.redundant() && unit.len() == values {
                    clauses.push(Clause::new(
                        unit.iter().map(|&(r, c)| self.indexer.var(r, c, value)).collect(),
                    ));
                }
            }
        }

        clauses
    }

    /// Cells of every sub-block in row-major order, blocks in row-major order
    fn block_units(&self) -> Option<Vec<Vec<(usize, usize)>>> {
        let Dimensions { rows, columns, .. } = self.dims();
        let (block_height, block_width) = self.dims().block_shape()?;

        let mut units = Vec::new();
        for block_row in 0..rows / block_height {
            for block_column in 0..columns / block_width {
                let cells = (0..block_height)
                    .cartesian_product(0..block_width)
                    .map(|(r, c)| (block_row * block_height + r, block_column * block_width + c))
                    .collect();
                units.push(cells);
            }
        }
        Some(units)
    }

    /// Stripe flags for rows, numbered from `next_free`
    pub fn stripe_rows(&self, next_free: i32) -> StripeFamily {
        let Dimensions { rows, columns, .. } = self.dims();
        let units: Vec<Vec<(usize, usize)>> = (0..rows)
            .map(|row| (0..columns).map(|column| (row, column)).collect())
            .collect();
        self.stripe_family(&units, next_free)
    }

    /// Stripe flags for columns, numbered from `next_free`
    pub fn stripe_columns(&self, next_free: i32) -> StripeFamily {
        let Dimensions { rows, columns, .. } = self.dims();
        let units: Vec<Vec<(usize, usize)>> = (0..columns)
            .map(|column| (0..rows).map(|row| (row, column)).collect())
            .collect();
        self.stripe_family(&units, next_free)
    }

    /// Stripe flags for sub-blocks (row-major traversal), numbered from `next_free`
    pub fn stripe_blocks(&self, next_free: i32) -> StripeFamily {
        match self.block_units() {
            Some(units) => self.stripe_family(&units, next_free),
            None => {
                log::debug!("no square sub-blocks for {}, skipping block stripes", self.dims());
                StripeFamily::empty(next_free)
            }
        }
    }

    /// Unit `i` owns auxiliaries `next_free + 3i` (ascending),
    /// `next_free + 3i + 1` (descending) and `next_free + 3i + 2` (unit flag).
    fn stripe_family(&self, units: &[Vec<(usize, usize)>], next_free: i32) -> StripeFamily {
        let values = self.dims().values;
        if units.is_empty() || units.iter().any(|unit| unit.len() != values) {
            log::debug!("units of {} do not hold every value once, skipping stripes", self.dims());
            return StripeFamily::empty(next_free);
        }

        let mut clauses = Vec::new();
        let mut definitions = Vec::new();
        let mut unit_flags = Vec::with_capacity(units.len());

        for (unit_index, unit) in units.iter().enumerate() {
            let ascending: Vec<i32> = unit
                .iter()
                .enumerate()
                .map(|(position, &(r, c))| self.indexer.var(r, c, position + 1))
                .collect();
            let descending: Vec<i32> = unit
                .iter()
                .enumerate()
                .map(|(position, &(r, c))| self.indexer.var(r, c, values - position))
                .collect();

            let asc_flag = next_free + 3 * unit_index as i32;
            let dsc_flag = asc_flag + 1;
            let unit_flag = asc_flag + 2;

            // flag -> every later position follows the run
            clauses.extend(ascending[1..].iter().map(|&lit| Clause::binary(-asc_flag, lit)));
            clauses.extend(descending[1..].iter().map(|&lit| Clause::binary(-dsc_flag, lit)));

            definitions.push(Clause::new(vec![-unit_flag, ascending[0], dsc_flag]));
            definitions.push(Clause::new(vec![-unit_flag, descending[0], asc_flag]));
            unit_flags.push(unit_flag);
        }

        clauses.extend(definitions);
        StripeFamily {
            clauses,
            unit_flags,
            next_free: next_free + 3 * units.len() as i32,
        }
    }
}

/// Pairwise negative binary clauses over `literals`
fn push_at_most_one(literals: &[i32], clauses: &mut Vec<Clause>) {
    clauses.extend(
        literals
            .iter()
            .tuple_combinations()
            .map(|(&a, &b)| Clause::binary(-a, -b)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn generator(size: usize, mode: EncodingMode) -> ConstraintGenerator {
        ConstraintGenerator::new(Dimensions::square(size).unwrap(), mode)
    }

    fn choose_two(n: usize) -> usize {
        n * (n - 1) / 2
    }

    #[test]
    fn test_clause_creation() {
        let clause = Clause::new(vec![1, -2, 3]);
        assert_eq!(clause.literals, vec![1, -2, 3]);
        assert!(!clause.is_empty());
        assert!(!clause.is_unit());
        assert_eq!(clause.max_variable(), 3);

        let unit_clause = Clause::unit(5);
        assert!(unit_clause.is_unit());
        assert_eq!(unit_clause.literals, vec![5]);
    }

    #[test]
    fn test_base_clause_count_closed_form() {
        for n in [4, 9, 16] {
            let cg = generator(n, EncodingMode::Minimal);
            let total = cg.cell_constraints().len()
                + cg.row_constraints().len()
                + cg.column_constraints().len();
            assert_eq!(total, n * n + 2 * n * n * choose_two(n), "size {n}");
        }
    }

    #[test]
    fn test_cell_clause_lists_every_value() {
        let cg = generator(9, EncodingMode::Minimal);
        let cells = cg.cell_constraints();
        assert_eq!(cells.len(), 81);
        assert_eq!(cells[0].literals, (1..=9).collect::<Vec<i32>>());
        assert_eq!(cells[80].literals, (721..=729).collect::<Vec<i32>>());
    }

    #[test]
    fn test_row_pairs_are_negative_binary() {
        let cg = generator(4, EncodingMode::Minimal);
        let rows = cg.row_constraints();
        // row 0, value 1: cells (0,0) and (0,1) are variables 1 and 5
        assert_eq!(rows[0], Clause::binary(-1, -5));
        assert!(rows.iter().all(|c| c.literals.len() == 2 && c.literals.iter().all(|&l| l < 0)));
    }

    #[test]
    fn test_column_pairs() {
        let cg = generator(4, EncodingMode::Minimal);
        let columns = cg.column_constraints();
        // column 0, value 1: rows 0 and 1 are variables 1 and 17
        assert_eq!(columns[0], Clause::binary(-1, -17));
    }

    #[test]
    fn test_block_on_non_square_dimensions_is_empty() {
        let cg = generator(6, EncodingMode::Minimal);
        assert!(cg.block_constraints().is_empty());
        let cg = generator(6, EncodingMode::Redundant);
        assert!(cg.block_constraints().is_empty());
    }

    #[test]
    fn test_block_minimal_emits_every_pair() {
        let cg = generator(9, EncodingMode::Minimal);
        // per block and value: all 36 pairs, aligned ones included
        assert_eq!(cg.block_constraints().len(), 9 * 9 * 36);

        let indexer = cg.indexer();
        let down_left = Clause::binary(
            -indexer.index(0, 2, 1).unwrap(),
            -indexer.index(1, 0, 1).unwrap(),
        );
        let down_right = Clause::binary(
            -indexer.index(0, 0, 1).unwrap(),
            -indexer.index(1, 1, 1).unwrap(),
        );
        let same_row = Clause::binary(
            -indexer.index(0, 0, 1).unwrap(),
            -indexer.index(0, 1, 1).unwrap(),
        );
        let blocks = cg.block_constraints();
        assert!(blocks.contains(&down_left));
        assert!(blocks.contains(&down_right));
        assert!(blocks.contains(&same_row));
    }

    #[test]
    fn test_block_redundant_counts() {
        let cg = generator(4, EncodingMode::Redundant);
        // 4 blocks x 4 values x (6 pairs + 1 at-least-one)
        assert_eq!(cg.block_constraints().len(), 4 * 4 * 7);
    }

    #[test]
    fn test_redundant_adds_implied_clauses() {
        let n = 4;
        let cg = generator(n, EncodingMode::Redundant);
        assert_eq!(cg.cell_constraints().len(), n * n * (1 + choose_two(n)));
        assert_eq!(cg.row_constraints().len(), n * n * (choose_two(n) + 1));
        assert_eq!(cg.column_constraints().len(), n * n * (choose_two(n) + 1));
    }

    #[test]
    fn test_diagonal_constraints() {
        let cg = generator(9, EncodingMode::Minimal);
        let diagonal = cg.diagonal_constraints();
        assert_eq!(diagonal.len(), 2 * 9 * choose_two(9));

        let indexer = cg.indexer();
        let main = Clause::binary(-indexer.index(0, 0, 3).unwrap(), -indexer.index(8, 8, 3).unwrap());
        let anti = Clause::binary(-indexer.index(0, 8, 3).unwrap(), -indexer.index(8, 0, 3).unwrap());
        assert!(diagonal.contains(&main));
        assert!(diagonal.contains(&anti));
    }

    #[test]
    fn test_diagonal_needs_square_board() {
        let cg = ConstraintGenerator::new(Dimensions::new(4, 9, 9).unwrap(), EncodingMode::Minimal);
        assert!(cg.diagonal_constraints().is_empty());
    }

    #[test]
    fn test_stripe_row_layout() {
        let cg = generator(4, EncodingMode::Minimal);
        let start = 65;
        let family = cg.stripe_rows(start);

        assert_eq!(family.next_free, start + 12);
        assert_eq!(family.unit_flags, vec![67, 70, 73, 76]);
        // per row: 3 ascending + 3 descending implications, then 2 definitions per row
        assert_eq!(family.clauses.len(), 4 * 6 + 4 * 2);

        // row 0 ascending: (0,1)=2 is variable 4 + 2 = 6
        assert_eq!(family.clauses[0], Clause::binary(-65, 6));
        // row 0 descending: (0,1)=3 is variable 7
        assert_eq!(family.clauses[3], Clause::binary(-66, 7));
        // definitions: first position ascending is (0,0)=1, descending (0,0)=4
        assert_eq!(family.clauses[24].literals, vec![-67, 1, 66]);
        assert_eq!(family.clauses[25].literals, vec![-67, 4, 65]);
    }

    #[test]
    fn test_stripe_block_traversal() {
        let cg = generator(4, EncodingMode::Minimal);
        let family = cg.stripe_blocks(100);
        assert_eq!(family.unit_flags.len(), 4);
        let indexer = cg.indexer();
        // block 0 ascending: (0,1)=2, (1,0)=3, (1,1)=4
        assert_eq!(family.clauses[0], Clause::binary(-100, indexer.index(0, 1, 2).unwrap()));
        assert_eq!(family.clauses[1], Clause::binary(-100, indexer.index(1, 0, 3).unwrap()));
        assert_eq!(family.clauses[2], Clause::binary(-100, indexer.index(1, 1, 4).unwrap()));
    }

    #[test]
    fn test_stripe_blocks_inapplicable_keeps_counter() {
        let cg = generator(6, EncodingMode::Minimal);
        let family = cg.stripe_blocks(217);
        assert!(family.clauses.is_empty());
        assert!(family.unit_flags.is_empty());
        assert_eq!(family.next_free, 217);
    }

    fn stripe_variables(family: &StripeFamily, first_aux: i32) -> HashSet<i32> {
        family
            .clauses
            .iter()
            .flat_map(|c| c.literals.iter().map(|l| l.abs()))
            .filter(|&v| v >= first_aux)
            .collect()
    }

    proptest! {
        #[test]
        fn prop_stripe_ranges_never_overlap(size in prop::sample::select(vec![4usize, 9, 16]), offset in 0i32..500) {
            let cg = generator(size, EncodingMode::Minimal);
            let first_aux = cg.indexer().first_auxiliary();
            let start = first_aux + offset;

            let rows = cg.stripe_rows(start);
            let columns = cg.stripe_columns(rows.next_free);
            let blocks = cg.stripe_blocks(columns.next_free);

            let mut all = HashSet::new();
            let mut total = 0;
            for family in [&rows, &columns, &blocks] {
                let vars = stripe_variables(family, first_aux);
                total += vars.len();
                all.extend(vars);
            }
            prop_assert_eq!(all.len(), total);
            prop_assert_eq!(total, 3 * 3 * size);
            prop_assert_eq!(blocks.next_free, start + 9 * size as i32);
            prop_assert!(all.iter().all(|&v| v >= start && v < blocks.next_free));
        }
    }
}
