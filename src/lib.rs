#![deny(missing_docs)]
//! Solves binairo puzzles by compiling them to CNF, handing the clause set to an
//! external SAT solver and decoding the models it prints back into grids.

/// The `binairo` module holds the puzzle model, the CNF compiler and the decoder.
pub mod binairo;

/// Error types shared across the crate.
pub mod error;

/// The `sat` module provides literals, clauses, the DIMACS protocol and the
/// external solver bridge.
pub mod sat;

pub use error::{Error, Result, SolverError};
