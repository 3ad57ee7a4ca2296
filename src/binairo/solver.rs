//! End-to-end solving of one puzzle: compile, run the solver, decode, re-check.

use crate::binairo::decode::{EncodingViolation, decode, validate_distinct};
use crate::binairo::encoder::{Encoding, compile};
use crate::binairo::grid::Grid;
use crate::binairo::rules::RuleSet;
use crate::error::Result;
use crate::sat::assignment::Assignment;
use crate::sat::cnf::Cnf;
use crate::sat::solver::{Solver, Status};
use tracing::{debug, warn};

/// A puzzle together with the rules it is solved under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binairo {
    /// The givens.
    pub grid: Grid,
    /// Rule families compiled in addition to the givens.
    pub rules: RuleSet,
}

/// One model turned back into a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSolution {
    /// The filled grid.
    pub grid: Grid,
    /// The full model, auxiliaries included.
    pub model: Assignment,
    /// Identical line pairs found by [`validate_distinct`]. Only checked when the
    /// distinctness rule was compiled in.
    pub violations: Vec<EncodingViolation>,
}

impl DecodedSolution {
    /// `true` if the grid passed the independent distinctness check.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Everything one solver run produced for a puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solved {
    /// Verdict of the solver.
    pub status: Status,
    /// The clause set that was solved.
    pub encoding: Encoding,
    /// Every model the solver printed, decoded.
    pub solutions: Vec<DecodedSolution>,
}

impl Solved {
    /// Solutions that passed the distinctness check.
    pub fn valid(&self) -> impl Iterator<Item = &Grid> {
        self.solutions
            .iter()
            .filter(|s| s.is_valid())
            .map(|s| &s.grid)
    }
}

impl Binairo {
    /// A puzzle solved under every rule.
    #[must_use]
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            rules: RuleSet::all(),
        }
    }

    /// Replaces the rule selection.
    #[must_use]
    pub const fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Side length of the grid.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.grid.size()
    }

    /// # Errors
    ///
    /// See [`compile`].
    pub fn encode(&self) -> Result<Encoding> {
        compile(&self.grid, self.rules)
    }

    /// # Errors
    ///
    /// See [`compile`].
    pub fn to_cnf(&self) -> Result<Cnf> {
        self.encode().map(|encoding| encoding.cnf)
    }

    /// Decodes `model` and, if distinctness is among the rules, re-checks it.
    ///
    /// # Errors
    ///
    /// See [`decode`].
    pub fn decode_solution(&self, model: &Assignment) -> Result<DecodedSolution> {
        let grid = decode(model, self.size())?;
        let violations = if self.rules.distinct {
            validate_distinct(&grid)
        } else {
            Vec::new()
        };
        for violation in &violations {
            warn!(%violation, "decoded solution breaks distinctness");
        }
        Ok(DecodedSolution {
            grid,
            model: model.clone(),
            violations,
        })
    }

    /// Compiles the puzzle, asks `solver` for up to `max_solutions` models
    /// (`0` = all) and decodes each of them.
    ///
    /// # Errors
    ///
    /// Compilation errors, [`crate::Error::Solver`] if the solver fails, and
    /// decoding errors if a model does not cover the grid.
    pub fn solve<S: Solver + ?Sized>(&self, solver: &S, max_solutions: usize) -> Result<Solved> {
        let encoding = self.encode()?;
        let outcome = solver.solve(&encoding.cnf, max_solutions)?;
        debug!(
            status = %outcome.status,
            models = outcome.solutions.len(),
            "decoding models"
        );

        let solutions = outcome
            .solutions
            .iter()
            .map(|model| self.decode_solution(model))
            .collect::<Result<Vec<_>>>()?;

        Ok(Solved {
            status: outcome.status,
            encoding,
            solutions,
        })
    }
}

impl From<Grid> for Binairo {
    fn from(grid: Grid) -> Self {
        Self::new(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SolverError;
    use crate::sat::solver::RawOutput;
    use std::cell::RefCell;

    /// Replays a canned answer and records what it was given.
    struct Canned {
        stdout: String,
        seen: RefCell<Option<(String, usize)>>,
    }

    impl Canned {
        fn new(stdout: &str) -> Self {
            Self {
                stdout: stdout.to_owned(),
                seen: RefCell::new(None),
            }
        }
    }

    impl Solver for Canned {
        fn invoke(&self, input: &str, max_solutions: usize) -> std::result::Result<RawOutput, SolverError> {
            *self.seen.borrow_mut() = Some((input.to_owned(), max_solutions));
            Ok(RawOutput {
                stdout: self.stdout.clone(),
                stderr: String::new(),
            })
        }
    }

    #[test]
    fn test_solve_decodes_models() {
        let puzzle = Binairo::new("2\n1.\n..".parse().unwrap());
        let solver = Canned::new("v 1 -2 -3 4 0\ns SATISFIABLE\n");
        let solved = puzzle.solve(&solver, 1).unwrap();

        assert_eq!(solved.status, Status::Satisfiable);
        assert_eq!(solved.solutions.len(), 1);
        assert_eq!(solved.solutions[0].grid.to_string(), "10\n01");
        assert_eq!(solved.valid().count(), 1);

        let (input, max) = solver.seen.borrow().clone().unwrap();
        assert!(input.starts_with("p cnf 8 "));
        assert_eq!(max, 1);
    }

    #[test]
    fn test_solve_flags_identical_lines() {
        let puzzle = Binairo::new(Grid::new(2));
        let solver = Canned::new("v 1 -2 3 -4 0\ns SATISFIABLE\n");
        let solved = puzzle.solve(&solver, 0).unwrap();
        assert!(!solved.solutions[0].is_valid());
        assert_eq!(solved.valid().count(), 0);
    }

    #[test]
    fn test_fixed_only_skips_distinctness_check() {
        let puzzle = Binairo::new(Grid::new(2)).with_rules(RuleSet::fixed_only());
        let model: Assignment = [1, -2, 3, -4]
            .iter()
            .filter_map(|&v| crate::sat::literal::Literal::from_i32(v))
            .collect();
        let decoded = puzzle.decode_solution(&model).unwrap();
        assert_eq!(decoded.grid.to_string(), "10\n10");
        assert!(decoded.is_valid());
    }

    #[test]
    fn test_unsatisfiable_has_no_solutions() {
        let puzzle = Binairo::new(Grid::new(2));
        let solved = puzzle.solve(&Canned::new("s UNSATISFIABLE\n"), 0).unwrap();
        assert_eq!(solved.status, Status::Unsatisfiable);
        assert!(solved.solutions.is_empty());
    }
}
