//! Fact-style notation for external analysis tools.
//!
//! ```text
//! #const size=4.
//! hint(1, 2, black).
//! hint(3, 1, white).
//! ```
//!
//! Indices are 1-based `(row, col)`. `0` cells are named `white` and `1` cells
//! `black` by default. Empty cells are not written.

use crate::binairo::grid::{Cell, Grid};
use std::fmt::Write;
use tracing::warn;

/// Predicate used for givens when none is specified.
pub const DEFAULT_PREDICATE: &str = "hint";

/// Names of the `0` and `1` symbols, in that order.
pub const DEFAULT_SYMBOLS: [&str; 2] = ["white", "black"];

impl Grid {
    /// Writes the size constant and one `name(row, col, symbol).` fact per
    /// non-empty cell, row by row.
    #[must_use]
    pub fn to_facts(&self, name: &str, symbols: [&str; 2]) -> String {
        let mut out = format!("#const size={}.\n", self.size());
        for (index, cell) in self.cells().iter().enumerate() {
            let symbol = match cell {
                Cell::Empty => continue,
                Cell::Zero => symbols[0],
                Cell::One => symbols[1],
            };
            let (row, col) = (index / self.size() + 1, index % self.size() + 1);
            let _ = writeln!(out, "{name}({row}, {col}, {symbol}).");
        }
        out
    }

    /// Reads the `name(row, col, symbol)` atoms of `text` into a `size`-sided grid.
    ///
    /// Anything else in the text is ignored. Atoms that cannot be used (bad
    /// arity or numbers, indices outside the grid, unknown symbol names) are
    /// skipped with a warning; a later atom for an already filled cell wins, also
    /// with a warning.
    #[must_use]
    pub fn from_facts(size: usize, text: &str, name: &str, symbols: [&str; 2]) -> Self {
        let mut grid = Self::new(size);
        let opening = format!("{name}(");
        let mut rest = text;

        while let Some(start) = rest.find(&opening) {
            let boundary = rest[..start]
                .chars()
                .next_back()
                .is_none_or(|c| !(c.is_alphanumeric() || c == '_'));
            let after = &rest[start + opening.len()..];
            let Some(end) = after.find(')') else {
                warn!(atom = after, "unterminated atom");
                break;
            };
            rest = &after[end + 1..];
            if !boundary {
                continue;
            }

            let args: Vec<&str> = after[..end].split(',').map(str::trim).collect();
            let &[row, col, symbol] = args.as_slice() else {
                warn!(atom = &after[..end], "skipping atom with wrong arity");
                continue;
            };
            let (Ok(row), Ok(col)) = (row.parse::<usize>(), col.parse::<usize>()) else {
                warn!(row, col, "skipping atom with non-numeric index");
                continue;
            };
            if row == 0 || col == 0 || row > size || col > size {
                warn!(row, col, size, "skipping atom outside the grid");
                continue;
            }
            let value = if symbol == symbols[0] {
                Cell::Zero
            } else if symbol == symbols[1] {
                Cell::One
            } else {
                warn!(symbol, "skipping atom with unknown symbol");
                continue;
            };

            if let Ok(previous) = grid.set(row - 1, col - 1, value) {
                if previous != Cell::Empty {
                    warn!(row, col, "overriding an already filled cell");
                }
            }
        }
        grid
    }
}
