#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A single disjunction of literals.

use crate::sat::literal::{Literal, Variable};
use core::fmt;
use core::ops::Index;
use smallvec::SmallVec;

/// Inline capacity of a clause. Run-length and equivalence clauses have three
/// literals; balance clauses have `size / 2 + 1`.
const INLINE_LITERALS: usize = 8;

/// A disjunction of literals: satisfied iff at least one literal is true.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Clause {
    literals: SmallVec<[Literal; INLINE_LITERALS]>,
}

impl Clause {
    /// Builds a clause, keeping the literal order.
    #[must_use]
    pub fn new(literals: impl IntoIterator<Item = Literal>) -> Self {
        Self {
            literals: literals.into_iter().collect(),
        }
    }

    /// A one-literal clause forcing `literal` true.
    #[must_use]
    pub fn unit(literal: Literal) -> Self {
        Self::new([literal])
    }

    /// Number of literals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// `true` for the empty (unsatisfiable) clause.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// `true` for a single-literal clause.
    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.len() == 1
    }

    /// Literals in order.
    pub fn iter(&self) -> impl Iterator<Item = &Literal> {
        self.literals.iter()
    }

    /// Highest variable mentioned by the clause, `0` when empty.
    #[must_use]
    pub fn max_variable(&self) -> Variable {
        self.literals
            .iter()
            .map(|lit| lit.variable())
            .max()
            .unwrap_or(0)
    }

    /// Evaluates the clause under `value`, which maps a variable to its truth value.
    pub fn is_satisfied_by(&self, mut value: impl FnMut(Variable) -> Option<bool>) -> bool {
        self.literals
            .iter()
            .any(|lit| value(lit.variable()) == Some(lit.polarity()))
    }
}

impl Index<usize> for Clause {
    type Output = Literal;

    fn index(&self, index: usize) -> &Self::Output {
        &self.literals[index]
    }
}

impl FromIterator<Literal> for Clause {
    fn from_iter<T: IntoIterator<Item = Literal>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl<'a> IntoIterator for &'a Clause {
    type Item = &'a Literal;
    type IntoIter = core::slice::Iter<'a, Literal>;

    fn into_iter(self) -> Self::IntoIter {
        self.literals.iter()
    }
}

/// DIMACS clause line: literals separated by spaces, terminated by `0`.
impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for lit in &self.literals {
            write!(f, "{lit} ")?;
        }
        write!(f, "0")
    }
}
