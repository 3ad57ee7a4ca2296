//! Compiles a grid and a [`RuleSet`] into one clause set.

use crate::binairo::grid::Grid;
use crate::binairo::numbering::{MAX_VARIABLE, Numbering};
use crate::binairo::rules::{
    RuleSet, balanced_lines, distinct_lines, fixed_cells, no_three_in_a_row,
};
use crate::error::{Error, Result};
use crate::sat::cnf::Cnf;
use crate::sat::literal::Variable;
use tracing::debug;

/// The clause set of one grid, plus what is needed to read models back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoding {
    /// Side length of the compiled grid.
    pub size: usize,
    /// Every clause of the selected rules.
    pub cnf: Cnf,
    /// Auxiliary variables above the `size²` cell variables.
    pub aux_vars: Variable,
}

/// Runs the selected generators over a single [`Numbering`], in a fixed order:
/// fixed cells, run length, balance, distinctness.
///
/// # Errors
///
/// - [`Error::TooLarge`] if the cells plus auxiliaries exceed [`MAX_VARIABLE`]:
///   `size³` variables with the distinctness rule (so `size <= 1290`), `size²`
///   without it.
/// - [`Error::OddSize`] if the balance rule is selected for an odd grid.
/// - [`Error::UnknownVariable`] if a generator emitted a literal outside
///   the numbering, which would be a bug in the generator.
pub fn compile(grid: &Grid, rules: RuleSet) -> Result<Encoding> {
    let size = grid.size();
    variables_needed(size, rules)
        .filter(|&needed| needed <= MAX_VARIABLE as usize)
        .ok_or(Error::TooLarge {
            size,
            max: MAX_VARIABLE,
        })?;
    let mut numbering = Numbering::new(size);

    let mut clauses = fixed_cells(grid, &numbering);
    debug!(clauses = clauses.len(), "fixed-cell rule");

    if rules.run_length {
        let run_length = no_three_in_a_row(grid, &numbering);
        debug!(clauses = run_length.len(), "run-length rule");
        clauses.extend(run_length);
    }

    if rules.balance {
        let balance = balanced_lines(grid, &numbering)?;
        debug!(clauses = balance.len(), "balance rule");
        clauses.extend(balance);
    }

    if rules.distinct {
        let distinct = distinct_lines(grid, &mut numbering);
        debug!(
            clauses = distinct.len(),
            aux = numbering.aux_issued(),
            "distinctness rule"
        );
        clauses.extend(distinct);
    }

    let cnf = Cnf::new(clauses, numbering.num_vars())?;
    debug!(
        size,
        variables = cnf.num_vars(),
        clauses = cnf.num_clauses(),
        "grid compiled"
    );

    Ok(Encoding {
        size,
        cnf,
        aux_vars: numbering.aux_issued(),
    })
}

/// Cell variables plus the `size²(size - 1)` distinctness auxiliaries, `None` on overflow.
fn variables_needed(size: usize, rules: RuleSet) -> Option<usize> {
    let cells = size.checked_mul(size)?;
    let aux = if rules.distinct {
        cells.checked_mul(size.saturating_sub(1))?
    } else {
        0
    };
    cells.checked_add(aux)
}
