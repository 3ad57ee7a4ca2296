#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Generic CNF plumbing: literals, clauses, clause sets, the DIMACS text
//! protocol and the bridge to an external solver.

pub mod assignment;
pub mod clause;
pub mod cnf;
pub mod dimacs;
pub mod literal;
pub mod solver;
