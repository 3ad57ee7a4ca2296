#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Binairo (takuzu) puzzles: the grid model, its compilation to CNF and the way
//! back from solver models to grids.
//!
//! A puzzle is a square grid of even side `n` whose cells are `0`, `1` or empty.
//! A solution fills every cell so that
//! - no line holds three equal symbols in a row,
//! - every line holds as many `0`s as `1`s,
//! - no two rows and no two columns are identical.
//!
//! Cell `(row, col)` is variable `row * n + col + 1`; true means `1`.

/// Textual rendering of the board as `hint(row, col, symbol)` facts.
pub mod facts;

/// Cells, lines and the grid itself.
pub mod grid;

/// Allocation of cell and auxiliary variables.
pub mod numbering;

/// The clause generators, one per rule.
pub mod rules;

/// Runs the generators in order and assembles the clause set.
pub mod encoder;

/// Models back to grids, plus the independent distinctness check.
pub mod decode;

/// One puzzle from grid to decoded solutions.
pub mod solver;
