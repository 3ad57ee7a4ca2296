#![allow(clippy::cast_precision_loss)]

use binairo_sat::binairo::encoder::Encoding;
use binairo_sat::binairo::facts::{DEFAULT_PREDICATE, DEFAULT_SYMBOLS};
use binairo_sat::binairo::grid::{Cell, Grid};
use binairo_sat::binairo::rules::RuleSet;
use binairo_sat::binairo::solver::{Binairo, Solved};
use binairo_sat::sat::solver::ExternalSolver;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tikv_jemalloc_ctl::{epoch, stats};
use tracing::info;

/// Defines the command-line interface for the binairo solver.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(
    name = "binairo-sat",
    version,
    about = "Solves binairo puzzles with an external SAT solver"
)]
pub(crate) struct Cli {
    /// An optional global path argument. If provided without a subcommand,
    /// it's treated as the path to a grid file to solve.
    #[arg(global = true)]
    pub path: Option<PathBuf>,

    /// Specifies the subcommand to execute (e.g. `solve`, `batch`, `export`).
    #[clap(subcommand)]
    pub command: Option<Commands>,

    /// Common options applicable to all commands.
    #[command(flatten)]
    pub common: CommonOptions,
}

/// Enumerates the available subcommands.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Solve one puzzle.
    /// The grid is compiled to CNF, handed to the solver and every model decoded back.
    Solve {
        /// Path to the grid file: the size on the first line, then one row per line
        /// using `.`, `0` and `1`.
        #[arg(long)]
        path: PathBuf,

        /// Read the file as `hint(row, col, symbol).` facts of a grid with this side
        /// length instead of grid text.
        #[arg(long, value_name = "SIZE")]
        facts: Option<usize>,

        /// Also print each solution as facts.
        #[arg(long, default_value_t = false)]
        print_facts: bool,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve every grid file (`.txt`) below a directory, in parallel.
    Batch {
        /// Directory to search.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Write the CNF of a puzzle, or its givens as facts, without solving it.
    Export {
        /// Path to the grid file.
        #[arg(long)]
        path: PathBuf,

        /// What to write.
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Dimacs)]
        format: ExportFormat,

        /// Output file. Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Output formats of the `export` subcommand.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExportFormat {
    /// The clause set in DIMACS CNF.
    Dimacs,
    /// The givens as `hint(row, col, symbol).` facts.
    Facts,
}

/// Defines common command-line options shared across different subcommands.
#[derive(Args, Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct CommonOptions {
    /// Enable debug output, providing more verbose logging during the solving process.
    #[arg(short, long, default_value_t = false)]
    pub(crate) debug: bool,

    /// Check every model against the clause set and the givens.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub(crate) verify: bool,

    /// Enable printing of problem and solver statistics after solving.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub(crate) stats: bool,

    /// Print the raw model (auxiliaries included) next to each solution.
    #[arg(short, long, default_value_t = false)]
    pub(crate) print_solution: bool,

    /// Maximum number of models to ask for; 0 asks for all of them.
    #[arg(short = 'n', long, default_value_t = 1)]
    pub(crate) models: usize,

    /// SAT solver program. It reads DIMACS on stdin and prints `v`/`s` lines.
    #[arg(long, default_value_t = String::from("clasp"))]
    pub(crate) solver: String,

    /// Extra argument for the solver, repeatable.
    #[arg(long = "solver-arg", allow_hyphen_values = true)]
    pub(crate) solver_args: Vec<String>,

    /// Flag the solver takes the model limit with.
    #[arg(long, default_value_t = String::from("-n"))]
    pub(crate) models_flag: String,

    /// Do not pass any model limit to the solver.
    #[arg(long, default_value_t = false)]
    pub(crate) no_models_flag: bool,

    /// Kill the solver after this many seconds.
    #[arg(long, value_name = "SECONDS")]
    pub(crate) timeout: Option<u64>,

    /// Leave out the no-three-in-a-row rule.
    #[arg(long, default_value_t = false)]
    pub(crate) no_run_length: bool,

    /// Leave out the balance rule.
    #[arg(long, default_value_t = false)]
    pub(crate) no_balance: bool,

    /// Leave out the distinct-lines rule.
    #[arg(long, default_value_t = false)]
    pub(crate) no_distinct: bool,
}

impl CommonOptions {
    /// The rule families left switched on.
    pub(crate) const fn rules(&self) -> RuleSet {
        RuleSet {
            run_length: !self.no_run_length,
            balance: !self.no_balance,
            distinct: !self.no_distinct,
        }
    }

    /// The solver process described by the options.
    pub(crate) fn external_solver(&self) -> ExternalSolver {
        let flag = (!self.no_models_flag).then(|| self.models_flag.clone());
        ExternalSolver::new(self.solver.as_str())
            .args(self.solver_args.iter().cloned())
            .models_flag(flag)
            .timeout(self.timeout.map(Duration::from_secs))
    }
}

/// Timings and results of solving one puzzle file.
#[derive(Debug)]
pub(crate) struct Report {
    pub(crate) puzzle: Binairo,
    pub(crate) solved: Solved,
    pub(crate) parse_time: Duration,
    pub(crate) solve_time: Duration,
}

impl Report {
    /// `true` if every model satisfies the clause set, fills the grid and keeps its givens.
    pub(crate) fn verify(&self) -> bool {
        let cnf = &self.solved.encoding.cnf;
        self.solved.solutions.iter().all(|solution| {
            cnf.verify(&solution.model)
                && solution.grid.is_complete()
                && solution.grid.agrees_with(&self.puzzle.grid)
        })
    }
}

/// Loads a puzzle from grid text, or from facts when `facts` names the grid size.
///
/// # Errors
///
/// If the file cannot be read or parsed.
pub(crate) fn load_grid(path: &Path, facts: Option<usize>) -> Result<Grid, String> {
    if !path.is_file() {
        return Err(format!("Provided path is not a file: {}", path.display()));
    }
    match facts {
        Some(size) => std::fs::read_to_string(path)
            .map(|text| Grid::from_facts(size, &text, DEFAULT_PREDICATE, DEFAULT_SYMBOLS))
            .map_err(|e| format!("Unable to read {}: {e}", path.display())),
        None => Grid::from_file(path).map_err(|e| format!("Error parsing {}: {e}", path.display())),
    }
}

/// Compiles and solves one grid.
///
/// # Errors
///
/// If compilation or the solver fails.
pub(crate) fn solve(grid: Grid, common: &CommonOptions, parse_time: Duration) -> Result<Report, String> {
    let puzzle = Binairo::new(grid).with_rules(common.rules());
    let solver = common.external_solver();

    let time = Instant::now();
    let solved = puzzle
        .solve(&solver, common.models)
        .map_err(|e| e.to_string())?;
    let solve_time = time.elapsed();

    Ok(Report {
        puzzle,
        solved,
        parse_time,
        solve_time,
    })
}

/// Solves one puzzle file and prints the solutions, statistics and verification result.
///
/// # Errors
///
/// If the file cannot be loaded, solving fails, or a model fails verification.
pub(crate) fn solve_and_report(
    path: &Path,
    facts: Option<usize>,
    print_facts: bool,
    common: &CommonOptions,
) -> Result<(), String> {
    let time = Instant::now();
    let grid = load_grid(path, facts)?;
    let parse_time = time.elapsed();

    println!("Solving: {}", path.display());
    println!("Parsed grid:\n{grid}\n");

    let report = solve(grid, common, parse_time)?;

    for (i, solution) in report.solved.solutions.iter().enumerate() {
        println!("Solution {}:\n{}", i + 1, solution.grid);
        for violation in &solution.violations {
            println!("  encoding violation: {violation}");
        }
        if common.print_solution {
            println!("Model: {}", solution.model);
        }
        if print_facts {
            print!("{}", solution.grid.to_facts(DEFAULT_PREDICATE, DEFAULT_SYMBOLS));
        }
        println!();
    }
    if report.solved.solutions.is_empty() {
        println!("No solution found");
    }

    if common.stats {
        print_stats(&report);
    }

    if common.verify {
        verify_solution(&report)?;
    }
    Ok(())
}

/// Checks every model of a report.
///
/// Prints whether the verification was successful and fails if it was not.
///
/// # Errors
///
/// If a model does not satisfy the clause set or contradicts the givens.
pub(crate) fn verify_solution(report: &Report) -> Result<(), String> {
    if report.solved.solutions.is_empty() {
        println!("{}", report.solved.status);
        return Ok(());
    }
    let ok = report.verify();
    println!("Verified: {ok:?}");
    if ok {
        Ok(())
    } else {
        Err("Solution failed verification!".to_owned())
    }
}

/// Solves every grid file in a directory tree in parallel and prints one line per file.
///
/// # Errors
///
/// If `path` is not a directory or any puzzle failed.
pub(crate) fn solve_dir(path: &Path, common: &CommonOptions) -> Result<(), String> {
    if !path.is_dir() {
        return Err(format!("Provided path is not a directory: {}", path.display()));
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(Result::ok)
        .map(walkdir::DirEntry::into_path)
        .filter(|file| file.is_file() && file.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    files.sort();
    info!(files = files.len(), dir = %path.display(), "solving directory");

    let results: Vec<(PathBuf, Result<Report, String>)> = files
        .into_par_iter()
        .map(|file| {
            let time = Instant::now();
            let result = load_grid(&file, None).and_then(|grid| solve(grid, common, time.elapsed()));
            info!(file = %file.display(), ok = result.is_ok(), "finished");
            (file, result)
        })
        .collect();

    println!("\n==========================[ Batch Results ]==========================");
    let mut failed = 0;
    for (file, result) in &results {
        let name = file.strip_prefix(path).unwrap_or(file).display().to_string();
        match result {
            Ok(report) if !common.verify || report.verify() => {
                let summary = format!(
                    "{} {}/{} {:.3}s",
                    report.solved.status,
                    report.solved.valid().count(),
                    report.solved.solutions.len(),
                    report.solve_time.as_secs_f64()
                );
                stat_line(&name, summary);
            }
            Ok(_) => {
                failed += 1;
                stat_line(&name, "FAILED VERIFICATION");
            }
            Err(e) => {
                failed += 1;
                stat_line(&name, "ERROR");
                eprintln!("{name}: {e}");
            }
        }
    }
    println!("=====================================================================");

    if failed > 0 {
        return Err(format!("{failed} of {} puzzles failed", results.len()));
    }
    Ok(())
}

/// Writes the clause set or the facts of a puzzle to `output`, or stdout.
///
/// # Errors
///
/// If the grid cannot be loaded or compiled, or the output cannot be written.
pub(crate) fn export(
    path: &Path,
    format: ExportFormat,
    output: Option<&Path>,
    common: &CommonOptions,
) -> Result<(), String> {
    let grid = load_grid(path, None)?;
    let text = match format {
        ExportFormat::Dimacs => Binairo::new(grid)
            .with_rules(common.rules())
            .to_cnf()
            .map_err(|e| e.to_string())?
            .to_dimacs(),
        ExportFormat::Facts => grid.to_facts(DEFAULT_PREDICATE, DEFAULT_SYMBOLS),
    };

    match output {
        Some(out) => {
            std::fs::write(out, text).map_err(|e| format!("Unable to write {}: {e}", out.display()))?;
            println!("Written to: {}", out.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

/// Allocated and resident memory in MiB, if jemalloc can report them.
fn memory_usage() -> Option<(f64, f64)> {
    epoch::advance().ok()?;
    let allocated = stats::allocated::read().ok()?;
    let resident = stats::resident::read().ok()?;
    Some((
        allocated as f64 / (1024.0 * 1024.0),
        resident as f64 / (1024.0 * 1024.0),
    ))
}

/// Helper function to print a single statistic line in a formatted table row.
///
/// # Arguments
/// * `label` - The description of the statistic.
/// * `value` - The value of the statistic, implementing `std::fmt::Display`.
pub(crate) fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Helper function to print a statistic line that includes a rate (value/second).
pub(crate) fn stat_line_with_rate(label: &str, value: usize, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

/// Prints a summary of problem and solver statistics.
pub(crate) fn print_stats(report: &Report) {
    let Encoding {
        size,
        cnf,
        aux_vars,
    } = &report.solved.encoding;
    let givens = report
        .puzzle
        .grid
        .cells()
        .iter()
        .filter(|&&cell| cell != Cell::Empty)
        .count();
    let solve_secs = report.solve_time.as_secs_f64();

    println!("\n=======================[ Problem Statistics ]=========================");
    stat_line("Parse time (s)", format!("{:.3}", report.parse_time.as_secs_f64()));
    stat_line("Grid size", format!("{size}x{size}"));
    stat_line("Given cells", givens);
    stat_line("Variables", cnf.num_vars());
    stat_line("Auxiliary variables", aux_vars);
    stat_line("Clauses", cnf.num_clauses());
    stat_line("Literals", cnf.num_literals());

    println!("========================[ Search Statistics ]========================");
    stat_line("Status", report.solved.status.to_string());
    stat_line_with_rate("Models", report.solved.solutions.len(), solve_secs);
    stat_line("Valid models", report.solved.valid().count());
    if let Some((allocated, resident)) = memory_usage() {
        stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
        stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    }
    stat_line("Wall time (s)", format!("{solve_secs:.3}"));
    println!("=====================================================================");
}
