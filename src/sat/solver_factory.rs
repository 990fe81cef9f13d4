//! Factory for creating SAT oracles based on configuration

use super::solver::{CadicalOracle, ExternalOracle, OracleOutcome, SatOracle};
use super::CnfInstance;
use crate::config::{SolverBackend, SolverConfig};
use anyhow::Result;

/// Unified oracle interface that can use different backends
#[derive(Debug, Clone)]
pub enum UnifiedOracle {
    Cadical(CadicalOracle),
    External(ExternalOracle),
}

impl UnifiedOracle {
    /// Create an oracle for the configured backend
    pub fn from_config(config: &SolverConfig) -> Result<Self> {
        match config.backend {
            SolverBackend::Cadical => Ok(UnifiedOracle::Cadical(CadicalOracle::new())),
            SolverBackend::External => {
                let command = config
                    .command
                    .as_ref()
                    .filter(|path| !path.as_os_str().is_empty())
                    .ok_or_else(|| anyhow::anyhow!("External solver backend needs a command"))?;
                Ok(UnifiedOracle::External(ExternalOracle::new(command.clone(), config.args.clone())))
            }
        }
    }

    /// Get the backend type being used
    pub fn backend(&self) -> SolverBackend {
        match self {
            UnifiedOracle::Cadical(_) => SolverBackend::Cadical,
            UnifiedOracle::External(_) => SolverBackend::External,
        }
    }
}

impl SatOracle for UnifiedOracle {
    fn name(&self) -> &str {
        match self {
            UnifiedOracle::Cadical(oracle) => oracle.name(),
            UnifiedOracle::External(oracle) => oracle.name(),
        }
    }

    fn solve(&self, instance: &CnfInstance) -> Result<OracleOutcome> {
        match self {
            UnifiedOracle::Cadical(oracle) => oracle.solve(instance),
            UnifiedOracle::External(oracle) => oracle.solve(instance),
        }
    }
}

impl Default for UnifiedOracle {
    fn default() -> Self {
        UnifiedOracle::Cadical(CadicalOracle::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::{Clause, SatResult};
    use std::path::PathBuf;

    fn config(backend: SolverBackend, command: Option<&str>) -> SolverConfig {
        SolverConfig {
            backend,
            command: command.map(PathBuf::from),
            args: Vec::new(),
            threads: 0,
        }
    }

    #[test]
    fn test_cadical_oracle_creation() {
        let oracle = UnifiedOracle::from_config(&config(SolverBackend::Cadical, None)).unwrap();
        assert_eq!(oracle.backend(), SolverBackend::Cadical);
        assert_eq!(oracle.name(), "cadical");
    }

    #[test]
    fn test_external_oracle_creation() {
        let oracle = UnifiedOracle::from_config(&config(SolverBackend::External, Some("zchaff"))).unwrap();
        assert_eq!(oracle.backend(), SolverBackend::External);
        assert_eq!(oracle.name(), "zchaff");
    }

    #[test]
    fn test_external_requires_command() {
        assert!(UnifiedOracle::from_config(&config(SolverBackend::External, None)).is_err());
        assert!(UnifiedOracle::from_config(&config(SolverBackend::External, Some(""))).is_err());
    }

    #[test]
    fn test_unsatisfiable_cadical() {
        let oracle = UnifiedOracle::default();
        let instance = CnfInstance::new(1, vec![Clause::unit(1), Clause::unit(-1)]);
        assert_eq!(oracle.solve(&instance).unwrap().result, SatResult::Unsatisfiable);
    }
}
