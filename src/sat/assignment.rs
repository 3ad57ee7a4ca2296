//! Variable assignments reported by a solver.

use crate::sat::literal::{Literal, Variable};
use core::fmt;
use core::ops::Index;

/// One model: a signed literal per variable, sign giving the truth value.
///
/// Solvers list the literals in variable order, so the literal of variable `v`
/// normally sits at index `v - 1`; lookups fall back to a scan otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Assignment(Vec<Literal>);

impl Assignment {
    /// Wraps the literals in solver order.
    #[must_use]
    pub const fn new(literals: Vec<Literal>) -> Self {
        Self(literals)
    }

    /// Number of literals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` if the model has no literals.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Literals in solver order.
    pub fn iter(&self) -> impl Iterator<Item = &Literal> {
        self.0.iter()
    }

    /// Literals in solver order.
    #[must_use]
    pub fn as_slice(&self) -> &[Literal] {
        &self.0
    }

    /// Truth value of `var`, or `None` if the assignment does not mention it.
    #[must_use]
    pub fn value(&self, var: Variable) -> Option<bool> {
        let slot = usize::try_from(var).ok()?.checked_sub(1)?;
        match self.0.get(slot) {
            Some(lit) if lit.variable() == var => Some(lit.polarity()),
            _ => self
                .0
                .iter()
                .find(|lit| lit.variable() == var)
                .map(|lit| lit.polarity()),
        }
    }

    /// The first `len` literals, i.e. the part of a model that covers the grid cells.
    #[must_use]
    pub fn truncated(&self, len: usize) -> Self {
        Self(self.0.iter().take(len).copied().collect())
    }

    /// The literals as DIMACS integers.
    #[must_use]
    pub fn to_i32s(&self) -> Vec<i32> {
        self.0.iter().map(|lit| lit.to_i32()).collect()
    }
}

impl Index<usize> for Assignment {
    type Output = Literal;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl From<Vec<Literal>> for Assignment {
    fn from(literals: Vec<Literal>) -> Self {
        Self::new(literals)
    }
}

impl FromIterator<Literal> for Assignment {
    fn from_iter<T: IntoIterator<Item = Literal>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for lit in &self.0 {
            if !first {
                write!(f, " ")?;
            }
            first = false;
            write!(f, "{lit}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(values: &[i32]) -> Assignment {
        values.iter().filter_map(|&v| Literal::from_i32(v)).collect()
    }

    #[test]
    fn test_value_in_order() {
        let a = assignment(&[1, -2, 3]);
        assert_eq!(a.value(1), Some(true));
        assert_eq!(a.value(2), Some(false));
        assert_eq!(a.value(4), None);
        assert_eq!(a.value(0), None);
    }

    #[test]
    fn test_value_out_of_order() {
        let a = assignment(&[-3, 1, 2]);
        assert_eq!(a.value(3), Some(false));
        assert_eq!(a.value(1), Some(true));
    }

    #[test]
    fn test_truncated() {
        let a = assignment(&[1, -2, 3, -4, 5]);
        assert_eq!(a.truncated(2).to_i32s(), vec![1, -2]);
        assert_eq!(a.truncated(10).len(), 5);
    }

    #[test]
    fn test_display() {
        assert_eq!(assignment(&[1, -2]).to_string(), "1 -2");
    }
}
