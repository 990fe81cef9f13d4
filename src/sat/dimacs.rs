//! DIMACS text: writing CNF instances and reading solver output

use super::error::SolverOutputError;
use super::{CnfInstance, EncodingError};

/// Serialize `instance` with one `c` line per comment
///
/// Rejects instances whose declared variable count does not cover the
/// literals in use.
pub fn to_dimacs(instance: &CnfInstance, comments: &[&str]) -> Result<String, EncodingError> {
    instance.validate()?;

    let mut dimacs = String::new();
    for comment in comments {
        dimacs.push_str(&format!("c {}\n", comment));
    }
    dimacs.push_str(&format!("p cnf {} {}\n", instance.num_variables, instance.clauses.len()));
    for clause in &instance.clauses {
        for literal in &clause.literals {
            dimacs.push_str(&format!("{} ", literal));
        }
        dimacs.push_str("0\n");
    }
    Ok(dimacs)
}

/// Verdict reported by a solver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SatResult {
    /// Signed literals of a model
    Satisfiable(Vec<i32>),
    Unsatisfiable,
}

impl SatResult {
    pub fn is_sat(&self) -> bool {
        matches!(self, SatResult::Satisfiable(_))
    }
}

/// A solver's verdict plus whatever search statistics it printed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverOutput {
    pub result: SatResult,
    pub max_decision_level: Option<u64>,
    pub decisions: Option<u64>,
    pub added_conflict_clauses: Option<u64>,
}

/// Parse the stdout of an external solver
///
/// Accepts the competition format (`s SATISFIABLE` and `v` lines) and the
/// zChaff report format (`Instance Satisfiable`, literals up to `Random`,
/// statistics, `RESULT: SAT`).
pub fn parse_solver_output(output: &str) -> Result<SolverOutput, SolverOutputError> {
    if output.lines().any(|line| line.starts_with("s ")) {
        parse_competition(output)
    } else {
        parse_zchaff(output)
    }
}

fn parse_competition(output: &str) -> Result<SolverOutput, SolverOutputError> {
    let mut verdict = None;
    let mut model = Vec::new();

    for line in output.lines().map(str::trim) {
        if let Some(status) = line.strip_prefix("s ") {
            verdict = Some(status.trim().to_string());
        } else if let Some(values) = line
            .strip_prefix('v')
            .filter(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
        {
            for token in values.split_whitespace() {
                model.push(parse_literal(token)?);
            }
        }
    }
    model.retain(|&lit| lit != 0);

    let result = match verdict.as_deref() {
        Some("SATISFIABLE") if model.is_empty() => return Err(SolverOutputError::MissingAssignment),
        Some("SATISFIABLE") => SatResult::Satisfiable(model),
        Some("UNSATISFIABLE") => SatResult::Unsatisfiable,
        Some(other) => return Err(SolverOutputError::Indeterminate(other.to_string())),
        None => return Err(SolverOutputError::MissingResult),
    };

    Ok(SolverOutput {
        result,
        max_decision_level: None,
        decisions: None,
        added_conflict_clauses: None,
    })
}

fn parse_zchaff(output: &str) -> Result<SolverOutput, SolverOutputError> {
    let tokens: Vec<&str> = output.split_whitespace().collect();

    let verdict = statistic_token(&tokens, &["RESULT:"]).ok_or(SolverOutputError::MissingResult)?;
    let result = match verdict {
        "SAT" => {
            let start = tokens
                .iter()
                .position(|&t| t == "Satisfiable")
                .ok_or(SolverOutputError::MissingAssignment)?;
            let model = tokens[start + 1..]
                .iter()
                .take_while(|&&t| t != "Random")
                .map(|t| parse_literal(t))
                .filter(|lit| !matches!(lit, Ok(0)))
                .collect::<Result<Vec<i32>, _>>()?;
            if model.is_empty() {
                return Err(SolverOutputError::MissingAssignment);
            }
            SatResult::Satisfiable(model)
        }
        "UNSAT" => SatResult::Unsatisfiable,
        other => return Err(SolverOutputError::Indeterminate(other.to_string())),
    };

    Ok(SolverOutput {
        result,
        max_decision_level: statistic(&tokens, &["Max", "Decision", "Level"])?,
        decisions: statistic(&tokens, &["Num.", "of", "Decisions"])?,
        added_conflict_clauses: statistic(&tokens, &["Added", "Conflict", "Clauses"])?,
    })
}

/// Token right after the first occurrence of `label`
fn statistic_token<'a>(tokens: &[&'a str], label: &[&str]) -> Option<&'a str> {
    tokens
        .windows(label.len() + 1)
        .find(|window| window[..label.len()] == *label)
        .map(|window| window[label.len()])
}

fn statistic(tokens: &[&str], label: &[&str]) -> Result<Option<u64>, SolverOutputError> {
    statistic_token(tokens, label)
        .map(|token| {
            token
                .parse()
                .map_err(|_| SolverOutputError::InvalidStatistic(label.join(" ")))
        })
        .transpose()
}

fn parse_literal(token: &str) -> Result<i32, SolverOutputError> {
    token
        .parse()
        .map_err(|_| SolverOutputError::InvalidLiteral(token.to_string()))
}
