//! Formula assembly: rule families plus the puzzle's givens

use super::constraints::{Clause, ConstraintGenerator, EncodingMode};
use super::{Dimensions, EncodingError, VariableIndexer};
use crate::sudoku::Grid;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A CNF formula with its declared variable count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CnfInstance {
    pub num_variables: usize,
    pub clauses: Vec<Clause>,
}

impl CnfInstance {
    pub fn new(num_variables: usize, clauses: Vec<Clause>) -> Self {
        Self { num_variables, clauses }
    }

    /// Largest variable used by any clause
    pub fn max_variable(&self) -> usize {
        self.clauses.iter().map(Clause::max_variable).max().unwrap_or(0)
    }

    /// Check that no clause uses literal 0 and that the declared count
    /// covers every literal
    pub fn validate(&self) -> Result<(), EncodingError> {
        if let Some(clause) = self.clauses.iter().position(|c| c.literals.contains(&0)) {
            return Err(EncodingError::ZeroLiteral { clause });
        }
        let max_literal = self.max_variable();
        if max_literal > self.num_variables {
            return Err(EncodingError::DeclaredVarCountTooSmall {
                declared: self.num_variables,
                max_literal,
            });
        }
        Ok(())
    }

    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    /// Unit clauses in order of appearance
    pub fn unit_clauses(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter().filter(|c| c.is_unit())
    }
}

/// Which optional families to add on top of cell/row/column/block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingOptions {
    pub mode: EncodingMode,
    pub diagonal: bool,
    pub stripe: bool,
}

/// Puzzle variants the solver knows how to encode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum PuzzleVariant {
    Standard,
    XSudoku,
    Stripe,
    XStripe,
}

impl PuzzleVariant {
    pub fn has_diagonals(self) -> bool {
        matches!(self, PuzzleVariant::XSudoku | PuzzleVariant::XStripe)
    }

    pub fn has_stripe(self) -> bool {
        matches!(self, PuzzleVariant::Stripe | PuzzleVariant::XStripe)
    }

    pub fn options(self, mode: EncodingMode) -> EncodingOptions {
        EncodingOptions {
            mode,
            diagonal: self.has_diagonals(),
            stripe: self.has_stripe(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PuzzleVariant::Standard => "standard",
            PuzzleVariant::XSudoku => "x_sudoku",
            PuzzleVariant::Stripe => "stripe",
            PuzzleVariant::XStripe => "x_stripe",
        }
    }
}

impl fmt::Display for PuzzleVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rule clauses for one board shape and option set, ready to be combined
/// with any number of puzzles
#[derive(Debug, Clone)]
pub struct FormulaAssembler {
    dims: Dimensions,
    options: EncodingOptions,
    rules: Vec<Clause>,
    num_variables: usize,
}

impl FormulaAssembler {
    /// Generate the rule clauses once
    pub fn new(dims: Dimensions, options: EncodingOptions) -> Self {
        let generator = ConstraintGenerator::new(dims, options.mode);
        let indexer = generator.indexer();

        let mut rules = generator.cell_constraints();
        rules.extend(generator.row_constraints());
        rules.extend(generator.column_constraints());
        rules.extend(generator.block_constraints());

        if options.diagonal {
            rules.extend(generator.diagonal_constraints());
        }

        let mut next_free = indexer.first_auxiliary();
        if options.stripe {
            let rows = generator.stripe_rows(next_free);
            let columns = generator.stripe_columns(rows.next_free);
            let blocks = generator.stripe_blocks(columns.next_free);
            next_free = blocks.next_free;

            let mut unit_flags = Vec::new();
            for family in [rows, columns, blocks] {
                rules.extend(family.clauses);
                unit_flags.extend(family.unit_flags);
            }
            if unit_flags.is_empty() {
                log::warn!("no unit of {} can hold a stripe, stripe rule dropped", dims);
            } else {
                // some row, column or block is striped
                rules.push(Clause::new(unit_flags));
            }
        }

        let num_variables = (next_free - 1) as usize;
        log::debug!(
            "assembled {} rule clauses over {} variables ({} auxiliary) for {}",
            rules.len(),
            num_variables,
            num_variables - dims.base_count(),
            dims
        );

        Self {
            dims,
            options,
            rules,
            num_variables,
        }
    }

    /// Assembler for an N x N grid with values 1..=N
    pub fn for_size(size: usize, options: EncodingOptions) -> Result<Self, EncodingError> {
        Ok(Self::new(Dimensions::square(size)?, options))
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    pub fn options(&self) -> EncodingOptions {
        self.options
    }

    pub fn rules(&self) -> &[Clause] {
        &self.rules
    }

    /// Base variables plus every auxiliary the enabled families consumed
    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    /// Rules followed by one unit clause per given cell
    pub fn assemble(&self, grid: &Grid) -> Result<CnfInstance, EncodingError> {
        let grid_dims = grid.dimensions()?;
        if grid_dims != self.dims {
            return Err(EncodingError::MalformedDimensions {
                rows: grid_dims.rows,
                columns: grid_dims.columns,
                values: grid_dims.values,
            });
        }

        let indexer = VariableIndexer::new(self.dims);
        let mut clauses = Vec::with_capacity(self.rules.len() + grid.given_count());
        clauses.extend_from_slice(&self.rules);
        for (row, column, value) in grid.givens() {
            clauses.push(Clause::unit(indexer.index(row, column, value as usize)?));
        }

        let instance = CnfInstance::new(self.num_variables, clauses);
        instance.validate()?;
        Ok(instance)
    }

    /// Get encoding statistics
    pub fn statistics(&self) -> EncodingStatistics {
        EncodingStatistics {
            dimensions: self.dims,
            mode: self.options.mode,
            total_variables: self.num_variables,
            auxiliary_variables: self.num_variables - self.dims.base_count(),
            rule_clauses: self.rules.len(),
        }
    }
}

/// Encode a puzzle in one step
pub fn encode_puzzle(grid: &Grid, options: EncodingOptions) -> Result<CnfInstance, EncodingError> {
    FormulaAssembler::new(grid.dimensions()?, options).assemble(grid)
}

/// Statistics about the SAT encoding
#[derive(Debug, Clone)]
pub struct EncodingStatistics {
    pub dimensions: Dimensions,
    pub mode: EncodingMode,
    pub total_variables: usize,
    pub auxiliary_variables: usize,
    pub rule_clauses: usize,
}

impl fmt::Display for EncodingStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SAT Encoding Statistics:")?;
        writeln!(f, "  Board: {}", self.dimensions)?;
        writeln!(f, "  Mode: {:?}", self.mode)?;
        writeln!(f, "  Total variables: {}", self.total_variables)?;
        writeln!(f, "  Auxiliary variables: {}", self.auxiliary_variables)?;
        writeln!(f, "  Rule clauses: {}", self.rule_clauses)?;
        Ok(())
    }
}
