#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Clause sets in conjunctive normal form.

use crate::error::{Error, Result};
use crate::sat::assignment::Assignment;
use crate::sat::clause::Clause;
use crate::sat::literal::Variable;
use core::fmt;

/// A conjunction of clauses together with the number of variables it declares.
///
/// Every literal of every clause refers to a variable in `1..=num_vars`; the
/// constructors reject anything else, so a numbering bug in a rule generator is
/// reported as [`Error::UnknownVariable`] instead of producing a malformed
/// solver input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cnf {
    clauses: Vec<Clause>,
    num_vars: Variable,
}

impl Cnf {
    /// Builds a clause set declaring `num_vars` variables.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownVariable`] if any literal mentions a variable above `num_vars`.
    pub fn new(clauses: Vec<Clause>, num_vars: Variable) -> Result<Self> {
        if let Some(lit) = clauses
            .iter()
            .flat_map(|clause| clause.iter())
            .find(|lit| lit.variable() > num_vars)
        {
            return Err(Error::UnknownVariable {
                literal: lit.to_i32(),
                num_vars,
            });
        }
        Ok(Self { clauses, num_vars })
    }

    /// Builds a clause set declaring exactly the highest variable it mentions.
    #[must_use]
    pub fn from_clauses(clauses: Vec<Clause>) -> Self {
        let num_vars = clauses.iter().map(Clause::max_variable).max().unwrap_or(0);
        Self { clauses, num_vars }
    }

    /// Declared variable count, as written in the `p cnf` header.
    #[must_use]
    pub const fn num_vars(&self) -> Variable {
        self.num_vars
    }

    /// Number of clauses.
    #[must_use]
    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// Total literal occurrences over all clauses.
    #[must_use]
    pub fn num_literals(&self) -> usize {
        self.clauses.iter().map(Clause::len).sum()
    }

    /// The clauses in emission order.
    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Iterates over the clauses.
    pub fn iter(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    /// Checks that `assignment` satisfies every clause. Variables the assignment
    /// does not mention count as neither true nor false.
    #[must_use]
    pub fn verify(&self, assignment: &Assignment) -> bool {
        self.clauses
            .iter()
            .all(|clause| clause.is_satisfied_by(|var| assignment.value(var)))
    }

    /// The DIMACS text handed to a solver.
    #[must_use]
    pub fn to_dimacs(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Cnf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "p cnf {} {}", self.num_vars, self.clauses.len())?;
        for clause in &self.clauses {
            writeln!(f, "{clause}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::literal::Literal;

    fn clause(lits: &[i32]) -> Clause {
        lits.iter().filter_map(|&l| Literal::from_i32(l)).collect()
    }

    #[test]
    fn test_new_rejects_unknown_variable() {
        let result = Cnf::new(vec![clause(&[1, -2]), clause(&[5])], 4);
        assert!(matches!(
            result,
            Err(Error::UnknownVariable {
                literal: 5,
                num_vars: 4
            })
        ));
    }

    #[test]
    fn test_new_allows_unused_variables() {
        let cnf = Cnf::new(vec![clause(&[1])], 10).unwrap();
        assert_eq!(cnf.num_vars(), 10);
    }

    #[test]
    fn test_from_clauses_counts_variables() {
        let cnf = Cnf::from_clauses(vec![clause(&[1, -7]), clause(&[3])]);
        assert_eq!(cnf.num_vars(), 7);
        assert_eq!(cnf.num_clauses(), 2);
        assert_eq!(cnf.num_literals(), 3);
    }

    #[test]
    fn test_display_dimacs() {
        let cnf = Cnf::new(vec![clause(&[1, -2]), clause(&[2, 3])], 3).unwrap();
        assert_eq!(cnf.to_dimacs(), "p cnf 3 2\n1 -2 0\n2 3 0\n");
    }

    #[test]
    fn test_verify() {
        let cnf = Cnf::from_clauses(vec![clause(&[1, -2]), clause(&[2, 3])]);
        let good: Assignment = [1, 2, -3].iter().filter_map(|&v| Literal::from_i32(v)).collect();
        let bad: Assignment = [-1, 2, -3].iter().filter_map(|&v| Literal::from_i32(v)).collect();
        assert!(cnf.verify(&good));
        assert!(!cnf.verify(&bad));
    }
}
