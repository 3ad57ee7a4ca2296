#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Signed DIMACS-style literals.
//!
//! A literal is a non-zero integer: its absolute value names the variable and its
//! sign gives the polarity. Zero is the DIMACS clause terminator, so it can never
//! be represented by [`Literal`].

use core::fmt;
use core::num::NonZeroI32;
use core::ops::{Neg, Not};

/// A 1-based variable id.
pub type Variable = u32;

/// A variable or its negation, stored the way DIMACS writes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal(NonZeroI32);

impl Literal {
    /// Builds the literal of `var` with the given polarity (`true` = positive).
    ///
    /// # Panics
    ///
    /// If `var` is zero or does not fit in an `i32`. Variables are only minted by
    /// the grid numbering, so this signals a numbering bug.
    #[must_use]
    pub fn new(var: Variable, polarity: bool) -> Self {
        let value = i32::try_from(var)
            .ok()
            .and_then(NonZeroI32::new)
            .unwrap_or_else(|| panic!("variable {var} is not a valid DIMACS variable"));
        if polarity { Self(value) } else { Self(-value) }
    }

    /// `var` asserted true.
    #[must_use]
    pub fn positive(var: Variable) -> Self {
        Self::new(var, true)
    }

    /// `var` asserted false.
    #[must_use]
    pub fn negative(var: Variable) -> Self {
        Self::new(var, false)
    }

    /// Reads a DIMACS integer; `None` for the `0` terminator.
    #[must_use]
    pub fn from_i32(value: i32) -> Option<Self> {
        NonZeroI32::new(value).map(Self)
    }

    /// The DIMACS integer.
    #[must_use]
    pub const fn to_i32(self) -> i32 {
        self.0.get()
    }

    /// The variable, without sign.
    #[must_use]
    pub const fn variable(self) -> Variable {
        self.0.get().unsigned_abs()
    }

    /// `true` for a positive literal.
    #[must_use]
    pub const fn polarity(self) -> bool {
        self.0.get() > 0
    }

    /// The same variable with the opposite sign.
    #[must_use]
    pub fn negated(self) -> Self {
        Self(-self.0)
    }
}

impl Neg for Literal {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.negated()
    }
}

impl Not for Literal {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.negated()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_neg() {
        assert_eq!(Literal::new(1, false).negated(), Literal::new(1, true));
        assert_eq!(-Literal::positive(7), Literal::negative(7));
        assert_eq!(!Literal::negative(7), Literal::positive(7));
    }

    #[test]
    fn test_literal_parts() {
        let lit = Literal::negative(12);
        assert_eq!(lit.variable(), 12);
        assert!(!lit.polarity());
        assert_eq!(lit.to_i32(), -12);
        assert_eq!(lit.to_string(), "-12");
    }

    #[test]
    fn test_from_i32_rejects_terminator() {
        assert_eq!(Literal::from_i32(0), None);
        assert_eq!(Literal::from_i32(-3), Some(Literal::negative(3)));
    }

    #[test]
    #[should_panic(expected = "not a valid DIMACS variable")]
    fn test_zero_variable_panics() {
        let _ = Literal::positive(0);
    }
}
