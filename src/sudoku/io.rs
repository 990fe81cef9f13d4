//! Reading puzzle datasets and writing grids

use super::Grid;
use anyhow::{Context, Result};
use std::path::Path;

/// One dataset row: a puzzle and, when the dataset has it, its solution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleRecord {
    pub puzzle: Grid,
    pub solution: Option<Grid>,
}

/// Load puzzles from a CSV file with a header line and `puzzle,solution` rows
pub fn load_dataset<P: AsRef<Path>>(path: P, size: usize, limit: Option<usize>) -> Result<Vec<PuzzleRecord>> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read dataset file: {}", path.as_ref().display()))?;

    parse_dataset(&content, size, limit)
        .with_context(|| format!("Failed to parse dataset file: {}", path.as_ref().display()))
}

/// Parse dataset text; the first line is a header and blank lines are skipped
pub fn parse_dataset(content: &str, size: usize, limit: Option<usize>) -> Result<Vec<PuzzleRecord>> {
    let rows = content
        .lines()
        .skip(1)
        .enumerate()
        .map(|(i, line)| (i + 2, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .take(limit.unwrap_or(usize::MAX));

    let mut records = Vec::new();
    for (line_number, line) in rows {
        let mut fields = line.split(',');
        let puzzle = fields
            .next()
            .map(|digits| Grid::from_digits(size, digits))
            .transpose()
            .with_context(|| format!("Bad puzzle on line {}", line_number))?
            .ok_or_else(|| anyhow::anyhow!("Missing puzzle on line {}", line_number))?;
        let solution = fields
            .next()
            .filter(|digits| !digits.trim().is_empty())
            .map(|digits| Grid::from_digits(size, digits))
            .transpose()
            .with_context(|| format!("Bad solution on line {}", line_number))?;
        records.push(PuzzleRecord { puzzle, solution });
    }

    if records.is_empty() {
        anyhow::bail!("Dataset contains no puzzles");
    }
    log::info!("parsed {} puzzles of size {}", records.len(), size);
    Ok(records)
}

/// Flat dataset notation of a grid, the inverse of [`Grid::from_digits`]
pub fn grid_to_digits(grid: &Grid) -> Result<String> {
    if grid.size() > Grid::MAX_DIGITS_SIZE {
        anyhow::bail!("Grid size {} cannot be written one character per cell", grid.size());
    }
    grid.cells()
        .iter()
        .map(|&v| {
            std::char::from_digit(v as u32, 36).ok_or_else(|| anyhow::anyhow!("Value {} has no digit", v))
        })
        .collect()
}

/// Save a grid to a text file, one row per line
pub fn save_grid_to_file<P: AsRef<Path>>(grid: &Grid, path: P) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(&path, grid.to_string())
        .with_context(|| format!("Failed to write grid to file: {}", path.as_ref().display()))?;

    Ok(())
}
