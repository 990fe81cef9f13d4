//! Configuration settings for the sudoku SAT solver

use crate::sat::{EncodingMode, PuzzleVariant};
use crate::sat::variables::integer_sqrt;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub puzzle: PuzzleConfig,
    pub encoding: EncodingConfig,
    pub solver: SolverConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleConfig {
    pub size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodingConfig {
    pub mode: EncodingMode,
    pub variants: Vec<PuzzleVariant>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    /// Solver binary for the external backend
    #[serde(default)]
    pub command: Option<PathBuf>,
    #[serde(default)]
    pub args: Vec<String>,
    /// Worker threads for dataset runs, 0 for the rayon default
    #[serde(default)]
    pub threads: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SolverBackend {
    Cadical,
    External,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub dataset_file: PathBuf,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub format: OutputFormat,
    pub save_solutions: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            puzzle: PuzzleConfig { size: 9 },
            encoding: EncodingConfig {
                mode: EncodingMode::Minimal,
                variants: vec![PuzzleVariant::XSudoku, PuzzleVariant::Stripe],
            },
            solver: SolverConfig {
                backend: SolverBackend::Cadical,
                command: None,
                args: Vec::new(),
                threads: 0,
            },
            input: InputConfig {
                dataset_file: PathBuf::from("input/sudoku.csv"),
                limit: None,
            },
            output: OutputConfig {
                directory: PathBuf::from("output"),
                format: OutputFormat::Text,
                save_solutions: false,
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.puzzle.size == 0 {
            anyhow::bail!("Puzzle size must be positive");
        }

        if integer_sqrt(self.puzzle.size).is_none() {
            log::warn!("Puzzle size {} has no square blocks; block rules will be skipped", self.puzzle.size);
        }

        if self.encoding.variants.is_empty() {
            anyhow::bail!("At least one puzzle variant must be selected");
        }

        if self.solver.backend == SolverBackend::External
            && self.solver.command.as_ref().map_or(true, |c| c.as_os_str().is_empty())
        {
            anyhow::bail!("The external solver backend needs a command");
        }

        if self.input.limit == Some(0) {
            anyhow::bail!("Puzzle limit must be positive");
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(ref dataset) = cli_overrides.dataset_file {
            self.input.dataset_file = dataset.clone();
        }
        if let Some(limit) = cli_overrides.limit {
            self.input.limit = Some(limit);
        }
        if let Some(ref output_dir) = cli_overrides.output_dir {
            self.output.directory = output_dir.clone();
        }
        if let Some(mode) = cli_overrides.mode {
            self.encoding.mode = mode;
        }
        if let Some(ref variants) = cli_overrides.variants {
            self.encoding.variants = variants.clone();
        }
        if let Some(backend) = cli_overrides.backend {
            self.solver.backend = backend;
        }
        if let Some(ref command) = cli_overrides.solver_command {
            self.solver.command = Some(command.clone());
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dataset_file: Option<PathBuf>,
    pub limit: Option<usize>,
    pub output_dir: Option<PathBuf>,
    pub mode: Option<EncodingMode>,
    pub variants: Option<Vec<PuzzleVariant>>,
    pub backend: Option<SolverBackend>,
    pub solver_command: Option<PathBuf>,
}
