//! Variable numbering for one compilation.
//!
//! Cell `(row, col)` of a `size`-sided grid is variable `row * size + col + 1`.
//! Auxiliary variables are handed out above the cells, in increasing order,
//! from a counter owned by the [`Numbering`]. Every rule generator of a
//! compilation shares the same instance, so no two generators can mint the same
//! auxiliary; independent compilations own independent instances.

use crate::sat::literal::{Literal, Variable};

/// Highest variable id a DIMACS literal can carry.
pub const MAX_VARIABLE: Variable = i32::MAX.unsigned_abs();

/// Cell variables and the auxiliary counter of one compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Numbering {
    size: usize,
    cells: Variable,
    next_aux: Variable,
}

impl Numbering {
    /// Numbering for a `size`-sided grid, with no auxiliaries issued yet.
    ///
    /// # Panics
    ///
    /// If the `size²` cell variables do not fit below [`MAX_VARIABLE`].
    /// [`compile`](crate::binairo::encoder::compile) rejects such grids first.
    #[must_use]
    pub fn new(size: usize) -> Self {
        let cells = size
            .checked_mul(size)
            .and_then(|cells| Variable::try_from(cells).ok())
            .filter(|&cells| cells <= MAX_VARIABLE)
            .unwrap_or_else(|| panic!("a {size}x{size} grid has more cells than DIMACS can number"));
        Self {
            size,
            cells,
            next_aux: cells + 1,
        }
    }

    /// Side length of the grid.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Variable of cell `(row, col)`, in `1..=size * size`.
    ///
    /// # Panics
    ///
    /// If `row` or `col` is not below the grid size.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn cell_var(&self, row: usize, col: usize) -> Variable {
        assert!(
            row < self.size && col < self.size,
            "cell ({row}, {col}) is outside a {0}x{0} grid",
            self.size
        );
        // At most `cells`, which `new` bounded by MAX_VARIABLE.
        (row * self.size + col + 1) as Variable
    }

    /// Literal asserting that cell `(row, col)` holds `1` (`polarity == true`) or `0`.
    #[must_use]
    pub fn cell_literal(&self, row: usize, col: usize, polarity: bool) -> Literal {
        Literal::new(self.cell_var(row, col), polarity)
    }

    /// Issues the next auxiliary variable. Never returns a cell variable or an
    /// id it has returned before.
    ///
    /// # Panics
    ///
    /// If the counter would pass [`MAX_VARIABLE`].
    pub const fn fresh_aux(&mut self) -> Variable {
        let var = self.next_aux;
        assert!(var <= MAX_VARIABLE, "auxiliary variables exhausted");
        self.next_aux += 1;
        var
    }

    /// Number of cell variables.
    #[must_use]
    pub const fn cells(&self) -> Variable {
        self.cells
    }

    /// Auxiliaries issued so far.
    #[must_use]
    pub const fn aux_issued(&self) -> Variable {
        self.next_aux - self.cells - 1
    }

    /// Highest variable id in use: the cells plus every auxiliary issued.
    #[must_use]
    pub const fn num_vars(&self) -> Variable {
        self.next_aux - 1
    }
}
