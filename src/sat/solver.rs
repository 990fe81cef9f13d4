//! Satisfiability oracles: in-process CaDiCaL or an external solver binary

use super::dimacs::{parse_solver_output, to_dimacs, SatResult};
use super::CnfInstance;
use anyhow::{Context, Result};
use cadical::Solver;
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;
use std::time::{Duration, Instant};

/// Search statistics reported alongside a verdict
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolverStatistics {
    pub max_decision_level: Option<u64>,
    pub decisions: Option<u64>,
    pub added_conflict_clauses: Option<u64>,
    pub solve_time: Duration,
}

/// Result of one oracle call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleOutcome {
    pub result: SatResult,
    pub statistics: SolverStatistics,
}

impl OracleOutcome {
    /// The model, if the instance was satisfiable
    pub fn assignment(&self) -> Option<&[i32]> {
        match &self.result {
            SatResult::Satisfiable(model) => Some(model),
            SatResult::Unsatisfiable => None,
        }
    }
}

/// A black-box SAT solver: one blocking call per instance
pub trait SatOracle: Send + Sync {
    fn name(&self) -> &str;

    fn solve(&self, instance: &CnfInstance) -> Result<OracleOutcome>;
}

/// In-process CaDiCaL; a fresh solver per call
#[derive(Debug, Clone, Copy, Default)]
pub struct CadicalOracle;

impl CadicalOracle {
    pub fn new() -> Self {
        Self
    }
}

impl SatOracle for CadicalOracle {
    fn name(&self) -> &str {
        "cadical"
    }

    fn solve(&self, instance: &CnfInstance) -> Result<OracleOutcome> {
        instance.validate().context("Refusing to solve a malformed instance")?;

        let mut solver: Solver = Solver::new();
        for clause in &instance.clauses {
            if clause.is_empty() {
                anyhow::bail!("Cannot add empty clause (unsatisfiable)");
            }
            solver.add_clause(clause.literals.iter().copied());
        }

        let start_time = Instant::now();
        let verdict = solver.solve();
        let solve_time = start_time.elapsed();

        let result = match verdict {
            Some(true) => {
                let model = (1..=instance.num_variables as i32)
                    .map(|var| match solver.value(var) {
                        Some(false) => -var,
                        // unassigned variables are free; report them positive
                        _ => var,
                    })
                    .collect();
                SatResult::Satisfiable(model)
            }
            Some(false) => SatResult::Unsatisfiable,
            None => anyhow::bail!("CaDiCaL stopped without a verdict"),
        };

        Ok(OracleOutcome {
            result,
            statistics: SolverStatistics {
                solve_time,
                ..SolverStatistics::default()
            },
        })
    }
}

/// A solver binary taking a DIMACS file path as its last argument
#[derive(Debug, Clone)]
pub struct ExternalOracle {
    command: PathBuf,
    args: Vec<String>,
}

impl ExternalOracle {
    pub fn new(command: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }
}

impl SatOracle for ExternalOracle {
    fn name(&self) -> &str {
        self.command.to_str().unwrap_or("external")
    }

    fn solve(&self, instance: &CnfInstance) -> Result<OracleOutcome> {
        let dimacs = to_dimacs(instance, &["This DIMACS format CNF file was generated by sudoku_sat", "Do not edit."])
            .context("Failed to serialize instance")?;

        let mut file = tempfile::Builder::new()
            .prefix("query")
            .suffix(".cnf")
            .tempfile()
            .context("Failed to create temporary CNF file")?;
        file.write_all(dimacs.as_bytes())
            .and_then(|_| file.flush())
            .context("Failed to write temporary CNF file")?;

        let start_time = Instant::now();
        let output = Command::new(&self.command)
            .args(&self.args)
            .arg(file.path())
            .output()
            .with_context(|| format!("Failed to run solver: {}", self.command.display()))?;
        let solve_time = start_time.elapsed();

        // solvers signal the verdict through exit codes 10/20, so only stdout decides
        let stdout = String::from_utf8_lossy(&output.stdout);
        let parsed = parse_solver_output(&stdout)
            .with_context(|| format!("Unreadable output from {}", self.command.display()))?;

        Ok(OracleOutcome {
            result: parsed.result,
            statistics: SolverStatistics {
                max_decision_level: parsed.max_decision_level,
                decisions: parsed.decisions,
                added_conflict_clauses: parsed.added_conflict_clauses,
                solve_time,
            },
        })
    }
}

impl std::fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn show(value: Option<u64>) -> String {
            value.map_or_else(|| "n/a".to_string(), |v| v.to_string())
        }
        writeln!(f, "SAT Solver Statistics:")?;
        writeln!(f, "  Max decision level: {}", show(self.max_decision_level))?;
        writeln!(f, "  Decisions: {}", show(self.decisions))?;
        writeln!(f, "  Added conflict clauses: {}", show(self.added_conflict_clauses))?;
        writeln!(f, "  Solve time: {:.3}s", self.solve_time.as_secs_f64())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::Clause;

    #[test]
    fn test_simple_satisfiable() {
        // x1 ∨ x2, ¬x1 ∨ x2
        let instance = CnfInstance::new(2, vec![Clause::new(vec![1, 2]), Clause::new(vec![-1, 2])]);
        let outcome = CadicalOracle::new().solve(&instance).unwrap();
        let model = outcome.assignment().unwrap();
        assert_eq!(model.len(), 2);
        assert!(model.contains(&2));
    }

    #[test]
    fn test_unsatisfiable() {
        let instance = CnfInstance::new(1, vec![Clause::unit(1), Clause::unit(-1)]);
        let outcome = CadicalOracle::new().solve(&instance).unwrap();
        assert_eq!(outcome.result, SatResult::Unsatisfiable);
        assert!(outcome.assignment().is_none());
    }

    #[test]
    fn test_empty_clause_error() {
        let instance = CnfInstance::new(1, vec![Clause::new(vec![])]);
        assert!(CadicalOracle::new().solve(&instance).is_err());
    }

    #[test]
    fn test_malformed_instance_rejected() {
        let instance = CnfInstance::new(1, vec![Clause::new(vec![1, 5])]);
        assert!(CadicalOracle::new().solve(&instance).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_external_oracle_reads_competition_output() {
        // the CNF path arrives as $0
        let script = r#"grep -q "^p cnf 3 2$" "$0" && printf 's SATISFIABLE\nv 1 -2 3 0\n'"#;
        let oracle = ExternalOracle::new("sh", vec!["-c".to_string(), script.to_string()]);
        let instance = CnfInstance::new(3, vec![Clause::new(vec![1, -2]), Clause::unit(3)]);
        let outcome = oracle.solve(&instance).unwrap();
        assert_eq!(outcome.result, SatResult::Satisfiable(vec![1, -2, 3]));
        assert_eq!(outcome.statistics.decisions, None);
    }

    #[cfg(unix)]
    #[test]
    fn test_external_oracle_unreadable_output() {
        let oracle = ExternalOracle::new("sh", vec!["-c".to_string(), "echo nothing useful".to_string()]);
        let instance = CnfInstance::new(1, vec![Clause::unit(1)]);
        assert!(oracle.solve(&instance).is_err());
    }

    #[test]
    fn test_missing_binary() {
        let oracle = ExternalOracle::new("/nonexistent/solver-binary", Vec::new());
        let instance = CnfInstance::new(1, vec![Clause::unit(1)]);
        assert!(oracle.solve(&instance).is_err());
    }
}
