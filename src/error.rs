//! Error types shared by the grid model, the CNF compiler and the solver bridge.

use std::time::Duration;
use thiserror::Error;

/// Failures raised while building grids, compiling them to CNF, or solving them.
#[derive(Error, Debug)]
pub enum Error {
    /// A row or column index outside `[0, size)`.
    #[error("index {index} is out of range for a {size}x{size} grid")]
    OutOfRange {
        /// The offending row or column index.
        index: usize,
        /// Side length of the grid.
        size: usize,
    },

    /// The grid body does not contain exactly `size * size` cells.
    #[error("expected {expected} cells, found {found}")]
    SizeMismatch {
        /// `size * size`.
        expected: usize,
        /// Number of non-whitespace characters actually read.
        found: usize,
    },

    /// An assignment whose length has no exact integer square root.
    #[error("assignment of length {len} does not describe a square grid")]
    NotSquare {
        /// Length of the rejected assignment.
        len: usize,
    },

    /// An assignment mentions a variable outside the grid's cells.
    #[error("literal {literal} refers to a variable outside [1, {cells}]")]
    IndexOutOfBounds {
        /// The offending literal.
        literal: i32,
        /// Number of cells in the grid being built.
        cells: usize,
    },

    /// The size line of a grid file is not a positive integer.
    #[error("invalid grid size line: {0:?}")]
    InvalidSize(String),

    /// A cell character outside `.`, `0` and `1`.
    #[error("invalid symbol {symbol:?} at cell {position}")]
    InvalidSymbol {
        /// The character that was read.
        symbol: char,
        /// Row-major index of the cell it was meant for.
        position: usize,
    },

    /// The balance rule cannot be satisfied by an odd-sized grid.
    #[error("the balance rule needs an even grid size, got {size}")]
    OddSize {
        /// Side length of the rejected grid.
        size: usize,
    },

    /// The grid needs more variables than a DIMACS literal can number.
    #[error("a {size}x{size} grid needs more than {max} variables under the selected rules")]
    TooLarge {
        /// Side length of the rejected grid.
        size: usize,
        /// Highest variable id a literal can carry.
        max: u32,
    },

    /// A clause refers to a variable the compilation never issued.
    #[error("literal {literal} exceeds the {num_vars} declared variables")]
    UnknownVariable {
        /// The offending literal (0 is also reported through this variant).
        literal: i32,
        /// Declared variable count of the clause set.
        num_vars: u32,
    },

    /// DIMACS text that could not be read back into a clause set.
    #[error("malformed DIMACS input: {0}")]
    MalformedDimacs(String),

    /// Reading a grid or CNF file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The external solver failed.
    #[error(transparent)]
    Solver(#[from] SolverError),
}

/// Failures of the external SAT solver process or of its output.
#[derive(Error, Debug)]
pub enum SolverError {
    /// The solver wrote to its error stream. The CNF it was given is kept so the
    /// failure can be reproduced.
    #[error("solver reported an error: {stderr}")]
    Diagnostic {
        /// Everything the solver wrote to stderr.
        stderr: String,
        /// The DIMACS text that was fed to the solver.
        input: String,
    },

    /// The solver process could not be started.
    #[error("failed to start solver {program:?}: {source}")]
    Spawn {
        /// Program that was executed.
        program: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// Talking to the running solver failed.
    #[error("solver I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The solver was killed after running longer than allowed.
    #[error("solver did not finish within {0:?}")]
    Timeout(Duration),

    /// A model line contained something other than integers.
    #[error("malformed solver output line: {0:?}")]
    MalformedOutput(String),

    /// The output ended without a status line.
    #[error("solver output has no status line")]
    MissingStatus,
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
