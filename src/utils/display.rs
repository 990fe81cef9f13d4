//! Display and output formatting utilities

use crate::experiment::ExperimentReport;
use crate::sat::variables::integer_sqrt;
use crate::sudoku::Grid;

/// Format grids and reports for the console
pub struct GridFormatter;

impl GridFormatter {
    /// Format a grid with block separators; empty cells print as '.'
    pub fn format_grid(grid: &Grid) -> String {
        let size = grid.size();
        let block = integer_sqrt(size).unwrap_or(size);
        let width = size.to_string().len();
        let mut output = String::new();

        let separator = (0..size / block)
            .map(|_| "-".repeat(block * (width + 1) + 1))
            .collect::<Vec<_>>()
            .join("+");

        for (r, row) in grid.rows().enumerate() {
            if r > 0 && r % block == 0 {
                output.push_str(&separator);
                output.push('\n');
            }
            for (c, &value) in row.iter().enumerate() {
                if c > 0 && c % block == 0 {
                    output.push_str(" |");
                }
                output.push(' ');
                if value == 0 {
                    output.push_str(&format!("{:>width$}", ".", width = width));
                } else {
                    output.push_str(&format!("{:>width$}", value, width = width));
                }
            }
            output.push('\n');
        }

        output
    }

    /// Format a puzzle and its solution next to each other
    pub fn side_by_side(puzzle: &Grid, solution: &Grid) -> String {
        let left = Self::format_grid(puzzle);
        let right = Self::format_grid(solution);
        let pad = left.lines().map(str::len).max().unwrap_or(0);

        left.lines()
            .zip(right.lines())
            .map(|(l, r)| format!("{:<pad$}   {}\n", l, r, pad = pad))
            .collect()
    }

    /// Per-puzzle table of an experiment run
    pub fn format_report_table(report: &ExperimentReport) -> String {
        let mut output = String::new();

        output.push_str("Puzzle | Variant    | Result | Decisions | Time(ms)\n");
        output.push_str("-------|------------|--------|-----------|---------\n");

        for outcome in &report.outcomes {
            let result = match (outcome.satisfiable, outcome.is_valid_solution()) {
                (false, _) => "UNSAT",
                (true, true) => "SAT",
                (true, false) => "BAD",
            };
            let decisions = outcome
                .decisions
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string());
            output.push_str(&format!(
                "{:6} | {:10} | {:6} | {:>9} | {:8}\n",
                outcome.puzzle_index,
                outcome.variant.name(),
                result,
                decisions,
                outcome.solve_time.as_millis()
            ));
        }

        output
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() && std::env::var("TERM").unwrap_or_default() != "dumb"
    }

    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiment::PuzzleOutcome;
    use crate::sat::{PuzzleVariant, SolverStatistics};

    #[test]
    fn test_grid_formatting() {
        let grid = Grid::from_digits(4, "1..4....3......2").unwrap();
        let formatted = GridFormatter::format_grid(&grid);
        let lines: Vec<_> = formatted.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], " 1 . | . 4");
        assert_eq!(lines[2], "-----+-----");
        assert_eq!(lines[4], " . . | . 2");
    }

    #[test]
    fn test_side_by_side() {
        let puzzle = Grid::from_digits(4, "1..4....3......2").unwrap();
        let solution = Grid::from_digits(4, "1234341221434321").unwrap();
        let output = GridFormatter::side_by_side(&puzzle, &solution);
        assert_eq!(output.lines().next(), Some(" 1 . | . 4     1 2 | 3 4"));
    }

    #[test]
    fn test_report_table() {
        let statistics = SolverStatistics {
            decisions: Some(17),
            ..SolverStatistics::default()
        };
        let outcomes = vec![PuzzleOutcome::unsatisfiable(0, PuzzleVariant::Stripe, &statistics)];
        let report = ExperimentReport::new(1, vec![PuzzleVariant::Stripe], outcomes);

        let table = GridFormatter::format_report_table(&report);
        assert!(table.contains("UNSAT"));
        assert!(table.contains("17"));
    }

    #[test]
    fn test_color_output() {
        let colored = ColorOutput::colored("test", Color::Red);
        assert!(colored.contains("test"));

        let success = ColorOutput::success("OK");
        assert!(success.contains("OK"));
    }
}
