//! Main CLI application for the sudoku SAT encoder

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;
use sudoku_sat::{
    config::{CliOverrides, OutputFormat, Settings, SolverBackend, SolverConfig},
    experiment::Experiment,
    sat::{to_dimacs, EncodingMode, FormulaAssembler, PuzzleVariant, SatOracle, SolutionDecoder, UnifiedOracle},
    sudoku::{load_dataset, Grid, SolutionValidator},
    utils::{ColorOutput, GridFormatter},
};

const EXAMPLE_DATASET: &str = "quizzes,solutions
004300209005009001070060043006002087190007400050083000600000105003508690042910300,864371259325849761971265843436192587198657432257483916689734125713528694542916378
070000043040009610800634900094052000358460020000800530080070091902100005007040802,679518243543729618821634957794352186358461729216897534485276391962183475137945862
";

#[derive(Parser)]
#[command(name = "sudoku_sat")]
#[command(about = "Sudoku SAT Encoder")]
#[command(version = "0.1.0")]
struct Cli {
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the CNF encoding of a puzzle in DIMACS format
    Encode {
        /// Puzzle digits in row-major order, 0 or '.' for empty cells;
        /// only the rules are written when omitted
        #[arg(short, long)]
        puzzle: Option<String>,

        #[arg(short, long, default_value_t = 9)]
        size: usize,

        #[arg(long, value_enum, default_value = "standard")]
        variant: PuzzleVariant,

        #[arg(short, long, value_enum, default_value = "minimal")]
        mode: EncodingMode,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Solve a single puzzle
    Solve {
        /// Puzzle digits in row-major order, 0 or '.' for empty cells
        #[arg(short, long)]
        puzzle: String,

        #[arg(short, long, default_value_t = 9)]
        size: usize,

        #[arg(long, value_enum, default_value = "standard")]
        variant: PuzzleVariant,

        #[arg(short, long, value_enum, default_value = "minimal")]
        mode: EncodingMode,

        /// Configuration file supplying the solver section
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Solver backend (overrides config)
        #[arg(short, long, value_enum)]
        backend: Option<SolverBackend>,

        /// Solver binary for the external backend (overrides config)
        #[arg(long)]
        solver_command: Option<PathBuf>,

        /// Extra arguments passed to the external solver before the CNF path
        #[arg(long, allow_hyphen_values = true)]
        solver_arg: Vec<String>,
    },

    /// Solve every puzzle of a dataset under the configured variants
    Run {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Dataset file (overrides config)
        #[arg(short, long)]
        dataset: Option<PathBuf>,

        /// Maximum puzzles to load (overrides config)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long, value_enum)]
        mode: Option<EncodingMode>,

        /// Comma separated variants (overrides config)
        #[arg(long, value_enum, value_delimiter = ',')]
        variants: Option<Vec<PuzzleVariant>>,

        #[arg(short, long, value_enum)]
        backend: Option<SolverBackend>,

        #[arg(long)]
        solver_command: Option<PathBuf>,

        /// Print one line per puzzle and variant
        #[arg(long)]
        table: bool,
    },

    /// Create example configuration and input files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Encode {
            puzzle,
            size,
            variant,
            mode,
            output,
        } => encode_command(puzzle.as_deref(), size, variant, mode, output),
        Commands::Solve {
            puzzle,
            size,
            variant,
            mode,
            config,
            backend,
            solver_command,
            solver_arg,
        } => {
            let mut solver = match config {
                Some(path) => Settings::from_file(&path)
                    .with_context(|| format!("Failed to load config from {}", path.display()))?
                    .solver,
                None => Settings::default().solver,
            };
            if let Some(backend) = backend {
                solver.backend = backend;
            }
            if solver_command.is_some() {
                solver.command = solver_command;
            }
            if !solver_arg.is_empty() {
                solver.args = solver_arg;
            }
            solve_command(&puzzle, size, variant, mode, &solver)
        }
        Commands::Run {
            config,
            dataset,
            limit,
            output,
            mode,
            variants,
            backend,
            solver_command,
            table,
        } => {
            let overrides = CliOverrides {
                dataset_file: dataset,
                limit,
                output_dir: output,
                mode,
                variants,
                backend,
                solver_command,
            };
            run_command(config, &overrides, table)
        }
        Commands::Setup { directory, force } => setup_command(directory, force),
    }
}

fn encode_command(
    digits: Option<&str>,
    size: usize,
    variant: PuzzleVariant,
    mode: EncodingMode,
    output: Option<PathBuf>,
) -> Result<()> {
    let grid = match digits {
        Some(digits) => Grid::from_digits(size, digits).context("Failed to parse puzzle")?,
        None => Grid::empty(size)?,
    };
    let assembler = FormulaAssembler::for_size(size, variant.options(mode))?;
    let instance = assembler.assemble(&grid).context("Failed to encode puzzle")?;
    log::info!("{}", assembler.statistics());

    let header = format!("{} sudoku {}x{}, {:?} encoding", variant, size, size, mode);
    let dimacs = to_dimacs(&instance, &[&header])?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {}", parent.display()))?;
            }
            std::fs::write(&path, dimacs).with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "{}",
                ColorOutput::success(&format!(
                    "Wrote {} clauses over {} variables to {}",
                    instance.clause_count(),
                    instance.num_variables,
                    path.display()
                ))
            );
        }
        None => print!("{}", dimacs),
    }

    Ok(())
}

fn solve_command(
    digits: &str,
    size: usize,
    variant: PuzzleVariant,
    mode: EncodingMode,
    solver: &SolverConfig,
) -> Result<()> {
    let puzzle = Grid::from_digits(size, digits).context("Failed to parse puzzle")?;
    let oracle = UnifiedOracle::from_config(solver)?;

    println!("{}", ColorOutput::info(&format!("Solving {} puzzle with {}...", variant, oracle.name())));

    let assembler = FormulaAssembler::for_size(size, variant.options(mode))?;
    let instance = assembler.assemble(&puzzle).context("Failed to encode puzzle")?;
    let outcome = oracle.solve(&instance)?;
    log::debug!("{}", outcome.statistics);

    let Some(assignment) = outcome.assignment() else {
        println!("{}", ColorOutput::warning("No solution exists"));
        return Ok(());
    };

    let solution = SolutionDecoder::for_size(size)?.decode(assignment, instance.num_variables)?;
    println!("{}", GridFormatter::side_by_side(&puzzle, &solution));

    let report = SolutionValidator::new(variant).validate(&puzzle, &solution);
    if report.is_valid() {
        println!(
            "{}",
            ColorOutput::success(&format!("Solved in {:.3}s", outcome.statistics.solve_time.as_secs_f64()))
        );
    } else {
        println!("{}", ColorOutput::error("Decoded grid breaks the rules"));
        println!("{}", report);
    }

    Ok(())
}

fn run_command(config_path: PathBuf, overrides: &CliOverrides, table: bool) -> Result<()> {
    let mut settings = if config_path.exists() {
        Settings::from_file(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        println!(
            "{}",
            ColorOutput::warning(&format!("Config file {} not found, using defaults", config_path.display()))
        );
        Settings::default()
    };
    settings.merge_with_cli(overrides);
    settings.validate().context("Configuration validation failed")?;

    let records = load_dataset(&settings.input.dataset_file, settings.puzzle.size, settings.input.limit)?;
    let oracle = UnifiedOracle::from_config(&settings.solver)?;
    let output = settings.output.clone();

    println!(
        "{}",
        ColorOutput::info(&format!("Solving {} puzzles with {}...", records.len(), oracle.name()))
    );

    let start_time = Instant::now();
    let experiment = Experiment::new(settings, oracle)?;
    let report = experiment.run(&records)?;

    if table {
        println!("{}", GridFormatter::format_report_table(&report));
    }
    println!("{}", report);

    let invalid = report.invalid_solutions().count();
    if invalid > 0 {
        println!("{}", ColorOutput::error(&format!("{} decoded solutions break the rules", invalid)));
    }

    let written = report.save(&output).context("Failed to save results")?;
    println!(
        "{}",
        ColorOutput::success(&format!(
            "Finished in {:.3}s, {} files written to {}",
            start_time.elapsed().as_secs_f64(),
            written.len(),
            output.directory.display()
        ))
    );

    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up project structure..."));

    let config_dir = directory.join("config");
    let input_dir = directory.join("input");
    let output_dir = directory.join("output");

    for dir in [&config_dir, &input_dir, &output_dir] {
        std::fs::create_dir_all(dir).with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    let dataset_path = input_dir.join("sudoku.csv");
    if !dataset_path.exists() || force {
        std::fs::write(&dataset_path, EXAMPLE_DATASET)
            .with_context(|| format!("Failed to write {}", dataset_path.display()))?;
        println!("Created: {}", dataset_path.display());
    } else {
        println!("Skipped: {} (already exists)", dataset_path.display());
    }

    let examples_dir = config_dir.join("examples");
    std::fs::create_dir_all(&examples_dir)?;

    let mut all_variants = Settings::default();
    all_variants.encoding.variants = vec![
        PuzzleVariant::Standard,
        PuzzleVariant::XSudoku,
        PuzzleVariant::Stripe,
        PuzzleVariant::XStripe,
    ];
    all_variants.output.save_solutions = true;
    all_variants.output.format = OutputFormat::Json;
    all_variants.to_file(&examples_dir.join("all_variants.yaml"))?;

    let mut zchaff = Settings::default();
    zchaff.encoding.mode = EncodingMode::Redundant;
    zchaff.solver.backend = SolverBackend::External;
    zchaff.solver.command = Some(PathBuf::from("zchaff"));
    zchaff.to_file(&examples_dir.join("zchaff.yaml"))?;

    println!("Created example configurations in: {}", examples_dir.display());

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Put your puzzles in {}", dataset_path.display());
    println!("3. Run: cargo run -- run --config config/default.yaml");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "sudoku_sat",
            "run",
            "--config",
            "test.yaml",
            "--variants",
            "standard,x_stripe",
            "--limit",
            "5",
        ]);
        let Commands::Run { variants, limit, .. } = cli.unwrap().command else {
            panic!("expected run command");
        };
        assert_eq!(variants, Some(vec![PuzzleVariant::Standard, PuzzleVariant::XStripe]));
        assert_eq!(limit, Some(5));

        let cli = Cli::try_parse_from(["sudoku_sat", "-v", "solve", "--puzzle", "1..4....3......2", "--size", "4"]);
        assert!(cli.unwrap().verbose);
    }

    #[test]
    fn test_encode_to_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("puzzle.cnf");
        encode_command(
            Some("1..4....3......2"),
            4,
            PuzzleVariant::Standard,
            EncodingMode::Minimal,
            Some(path.clone()),
        )
        .unwrap();

        let dimacs = std::fs::read_to_string(path).unwrap();
        assert!(dimacs.lines().any(|line| line.starts_with("p cnf 64 ")));
        assert!(dimacs.lines().any(|line| line == "1 0"));
    }

    #[test]
    fn test_encode_rules_only() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("rules.cnf");
        encode_command(None, 9, PuzzleVariant::Standard, EncodingMode::Minimal, Some(path.clone())).unwrap();

        let rules = 81 + 3 * 81 * 36;
        let dimacs = std::fs::read_to_string(path).unwrap();
        assert!(dimacs.lines().any(|line| line == format!("p cnf 729 {}", rules)));
        let clauses: Vec<_> = dimacs
            .lines()
            .filter(|line| !line.starts_with('c') && !line.starts_with('p'))
            .collect();
        assert_eq!(clauses.len(), rules);
        assert!(clauses.iter().all(|line| line.split_whitespace().count() > 2));
    }

    #[test]
    fn test_solve_command() {
        let solver = Settings::default().solver;
        assert!(solve_command("1..4....3......2", 4, PuzzleVariant::Standard, EncodingMode::Minimal, &solver).is_ok());
        assert!(solve_command("1..4", 4, PuzzleVariant::Standard, EncodingMode::Minimal, &solver).is_err());
    }

    #[test]
    fn test_setup_command() {
        let temp_dir = tempdir().unwrap();
        let result = setup_command(temp_dir.path().to_path_buf(), false);

        assert!(result.is_ok());
        assert!(temp_dir.path().join("config/default.yaml").exists());
        assert!(temp_dir.path().join("config/examples/zchaff.yaml").exists());

        let records = load_dataset(temp_dir.path().join("input/sudoku.csv"), 9, None).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|record| record.solution.is_some()));
    }

    #[test]
    fn test_run_on_setup_dataset() {
        let temp_dir = tempdir().unwrap();
        setup_command(temp_dir.path().to_path_buf(), false).unwrap();

        let overrides = CliOverrides {
            dataset_file: Some(temp_dir.path().join("input/sudoku.csv")),
            output_dir: Some(temp_dir.path().join("output")),
            variants: Some(vec![PuzzleVariant::Standard]),
            ..CliOverrides::default()
        };
        run_command(temp_dir.path().join("config/default.yaml"), &overrides, true).unwrap();

        let metrics = std::fs::read_to_string(temp_dir.path().join("output/metrics.csv")).unwrap();
        assert_eq!(metrics.lines().count(), 3);
        assert!(metrics.lines().skip(1).all(|line| line.contains(",standard,true,")));
    }
}
