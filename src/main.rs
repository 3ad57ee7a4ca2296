//! # binairo-sat
//!
//! `binairo-sat` solves binairo (takuzu) puzzles. A puzzle is compiled into CNF,
//! handed to an external SAT solver (by default `clasp`) over the DIMACS text
//! protocol, and every model the solver prints is decoded back into a grid.
//!
//! ## Features
//!
//! -   **Input formats**:
//!     -   Grid text: the size on the first line, then rows of `.`, `0` and `1`.
//!     -   `hint(row, col, symbol).` facts (`--facts <SIZE>`).
//! -   **Rule selection**: each of the run-length, balance and distinct-lines rules
//!     can be left out; the givens are always encoded.
//! -   **Multiple models**: `-n <N>` asks the solver for up to `N` models, `-n 0` for all.
//! -   **Verification**: every model is checked against the clause set and the givens,
//!     and decoded grids are re-checked for identical lines.
//! -   **Statistics**: clause and variable counts, timings and memory usage.
//! -   **Batch mode**: every `.txt` grid below a directory, solved in parallel.
//! -   **Export**: the CNF in DIMACS, or the givens as facts.
//!
//! ## Usage
//!
//! ```sh
//! binairo-sat [OPTIONS] [PATH] [SUBCOMMAND]
//! ```
//!
//! A bare `PATH` is solved like `binairo-sat solve --path PATH`.
//!
//! ### Subcommands
//!
//! 1.  **`solve`**: Solve one puzzle.
//!     ```sh
//!     binairo-sat solve --path puzzle.txt -n 0
//!     ```
//!
//! 2.  **`batch`**: Solve a directory of puzzles.
//!     ```sh
//!     binairo-sat batch --path samples/
//!     ```
//!
//! 3.  **`export`**: Write the CNF or the facts of a puzzle.
//!     ```sh
//!     binairo-sat export --path puzzle.txt --output puzzle.cnf
//!     binairo-sat export --path puzzle.txt --format facts
//!     ```
//!
//! 4.  **`completions`**: Print a shell completion script.
//!
//! ### Common Options
//!
//! -   `-d, --debug`: Debug logging on stderr (default: `false`).
//! -   `--verify <BOOL>`: Verify models (default: `true`).
//! -   `--stats <BOOL>`: Print statistics (default: `true`).
//! -   `-p, --print-solution`: Print raw models (default: `false`).
//! -   `-n, --models <N>`: Model limit, `0` for all (default: `1`).
//! -   `--solver <PROGRAM>`, `--solver-arg <ARG>`: The solver and its extra arguments.
//! -   `--models-flag <FLAG>`, `--no-models-flag`: How the model limit is passed.
//! -   `--timeout <SECONDS>`: Kill the solver after this long.
//! -   `--no-run-length`, `--no-balance`, `--no-distinct`: Leave out a rule.

use crate::command_line::cli::{Cli, Commands, export, solve_and_report, solve_dir};
use clap::{CommandFactory, Parser};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod command_line;

/// Global allocator using `tikv-jemallocator` for memory usage tracking.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Main entry point.
///
/// Parses command-line arguments, sets up logging and dispatches to the handler
/// of the chosen subcommand. Errors are printed to stderr with a non-zero exit.
fn main() {
    let cli = Cli::parse();

    let debug = match &cli.command {
        Some(
            Commands::Solve { common, .. }
            | Commands::Batch { common, .. }
            | Commands::Export { common, .. },
        ) => common.debug || cli.common.debug,
        _ => cli.common.debug,
    };
    init_logging(debug);

    let result = match cli.command {
        Some(Commands::Solve {
            path,
            facts,
            print_facts,
            common,
        }) => solve_and_report(&path, facts, print_facts, &common),
        Some(Commands::Batch { path, common }) => solve_dir(&path, &common),
        Some(Commands::Export {
            path,
            format,
            output,
            common,
        }) => export(&path, format, output.as_deref(), &common),
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
        None => match &cli.path {
            Some(path) => solve_and_report(path, None, false, &cli.common),
            None => Err("No command provided. Use --help for more information.".to_owned()),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Installs the log subscriber: debug level with `--debug`, warnings otherwise.
/// Logs go to stderr so exported CNF on stdout stays clean.
fn init_logging(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {e}");
    }
}
