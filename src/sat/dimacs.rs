#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The text side of the solver protocol.
//!
//! Two directions are handled here:
//! - DIMACS CNF, the solver's input. Rendering lives on [`Cnf`]'s `Display`; this
//!   module reads it back (`p cnf <vars> <clauses>` header, `c` comments, clauses
//!   terminated by `0`, optional `%` end marker).
//! - The solver's answer: `v` lines carrying model literals, possibly spread over
//!   several lines and closed by `0`, and a single `s` line with the verdict.
//!   Nothing after the status line is read.

use crate::error::{Error, Result, SolverError};
use crate::sat::assignment::Assignment;
use crate::sat::clause::Clause;
use crate::sat::cnf::Cnf;
use crate::sat::literal::{Literal, Variable};
use crate::sat::solver::{SolverOutcome, Status};
use std::io::{self, BufRead};
use std::path::Path;
use tracing::trace;

/// First token of a line carrying model literals.
pub const MODEL_PREFIX: &str = "v";

/// First token of the line carrying the solver's verdict.
pub const STATUS_PREFIX: &str = "s";

/// Parses DIMACS formatted data from a `BufRead` source into a [`Cnf`].
///
/// Clauses may span lines; a trailing clause without its `0` is still kept. When a
/// problem line is present its variable count is used, so declared but unused
/// variables survive a render/parse round trip.
///
/// # Errors
///
/// - [`Error::Io`] if reading fails.
/// - [`Error::MalformedDimacs`] for a bad problem line or a non-integer literal.
/// - [`Error::UnknownVariable`] if a clause mentions a variable above the declared count.
pub fn parse_dimacs<R: BufRead>(reader: R) -> Result<Cnf> {
    let mut declared_vars: Option<Variable> = None;
    let mut clauses = Vec::new();
    let mut current: Vec<Literal> = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();

        if trimmed.starts_with('%') {
            break;
        }
        if trimmed.is_empty() || trimmed.starts_with('c') {
            continue;
        }
        if let Some(header) = trimmed.strip_prefix('p') {
            declared_vars = Some(parse_header(header)?);
            continue;
        }

        for token in trimmed.split_whitespace() {
            let value: i32 = token
                .parse()
                .map_err(|e| Error::MalformedDimacs(format!("literal {token:?}: {e}")))?;
            match Literal::from_i32(value) {
                Some(lit) => current.push(lit),
                None => clauses.push(Clause::new(current.drain(..))),
            }
        }
    }

    if !current.is_empty() {
        clauses.push(Clause::new(current));
    }

    match declared_vars {
        Some(num_vars) => Cnf::new(clauses, num_vars),
        None => Ok(Cnf::from_clauses(clauses)),
    }
}

fn parse_header(header: &str) -> Result<Variable> {
    let mut parts = header.split_whitespace();
    if parts.next() != Some("cnf") {
        return Err(Error::MalformedDimacs(format!("problem line: p{header}")));
    }
    parts
        .next()
        .and_then(|vars| vars.parse().ok())
        .ok_or_else(|| Error::MalformedDimacs(format!("problem line: p{header}")))
}

/// Parses a DIMACS CNF file specified by its path.
///
/// # Errors
///
/// See [`parse_dimacs`]; opening the file may also fail with [`Error::Io`].
pub fn parse_file(path: impl AsRef<Path>) -> Result<Cnf> {
    let file = std::fs::File::open(path)?;
    parse_dimacs(io::BufReader::new(file))
}

/// Reads the solver's standard output into models and a verdict.
///
/// Every `0` on a model line closes the model accumulated so far. At most
/// `max_solutions` models are returned, `0` meaning no limit. Comment lines and
/// anything else without a known prefix are skipped; a model left open when the
/// status line arrives is discarded.
///
/// # Errors
///
/// - [`SolverError::MalformedOutput`] if a model line holds a non-integer token.
/// - [`SolverError::MissingStatus`] if the output ends without a status line.
pub fn parse_output(
    output: &str,
    max_solutions: usize,
) -> std::result::Result<SolverOutcome, SolverError> {
    let mut solutions = Vec::new();
    let mut current: Vec<Literal> = Vec::new();

    for line in output.lines() {
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some(MODEL_PREFIX) => {
                for token in tokens {
                    let value: i32 = token
                        .parse()
                        .map_err(|_| SolverError::MalformedOutput(line.to_owned()))?;
                    if let Some(lit) = Literal::from_i32(value) {
                        current.push(lit);
                        continue;
                    }
                    let model = std::mem::take(&mut current);
                    if max_solutions == 0 || solutions.len() < max_solutions {
                        solutions.push(Assignment::new(model));
                    }
                }
            }
            Some(STATUS_PREFIX) => {
                let verdict = tokens.collect::<Vec<_>>().join(" ");
                return Ok(SolverOutcome {
                    status: Status::from_verdict(&verdict),
                    solutions,
                });
            }
            _ => trace!(line, "skipping solver output line"),
        }
    }

    Err(SolverError::MissingStatus)
}
