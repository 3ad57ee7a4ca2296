//! Clause generators, one per puzzle rule.
//!
//! Generators read the grid and share the compilation's [`Numbering`]. Only the
//! distinctness rule mints auxiliary variables, and it does so through
//! [`encode_equivalence`].

use crate::binairo::grid::{Cell, Grid, Line};
use crate::binairo::numbering::Numbering;
use crate::error::{Error, Result};
use crate::sat::clause::Clause;
use crate::sat::literal::{Literal, Variable};
use itertools::Itertools;

/// Which rule families a compilation emits. The fixed-cell rule is always on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleSet {
    /// No three equal symbols next to each other in a line.
    pub run_length: bool,
    /// As many `0`s as `1`s in every line. Needs an even grid size.
    pub balance: bool,
    /// No two rows and no two columns are equal.
    pub distinct: bool,
}

impl RuleSet {
    /// Every puzzle rule.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            run_length: true,
            balance: true,
            distinct: true,
        }
    }

    /// Only the givens of the grid.
    #[must_use]
    pub const fn fixed_only() -> Self {
        Self {
            run_length: false,
            balance: false,
            distinct: false,
        }
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::all()
    }
}

/// Unit clauses pinning every non-empty cell: `[v]` for a `1`, `[-v]` for a `0`.
#[must_use]
pub fn fixed_cells(grid: &Grid, numbering: &Numbering) -> Vec<Clause> {
    let size = grid.size();
    (0..size)
        .cartesian_product(0..size)
        .filter_map(|(row, col)| {
            grid.cell(row, col)
                .polarity()
                .map(|polarity| Clause::unit(numbering.cell_literal(row, col, polarity)))
        })
        .collect()
}

/// Forbids `positions` from all holding the same symbol.
///
/// A direction is skipped when the givens in `positions` are all of the
/// opposite symbol: the fixed-cell units entail it. A window holding givens of
/// both symbols keeps both directions, so contradictory givens are not
/// special-cased. Emitted clauses always carry every position, givens included.
fn forbid_uniform(
    grid: &Grid,
    numbering: &Numbering,
    positions: &[(usize, usize)],
    clauses: &mut Vec<Clause>,
) {
    let holds = |cell: Cell| positions.iter().any(|&(r, c)| grid.cell(r, c) == cell);
    let (zero, one) = (holds(Cell::Zero), holds(Cell::One));

    if !zero || one {
        clauses.push(
            positions
                .iter()
                .map(|&(r, c)| numbering.cell_literal(r, c, false))
                .collect(),
        );
    }
    if !one || zero {
        clauses.push(
            positions
                .iter()
                .map(|&(r, c)| numbering.cell_literal(r, c, true))
                .collect(),
        );
    }
}

/// No line contains three consecutive equal symbols.
///
/// Each of the `size - 2` windows of every row and column gets `[-a, -b, -c]`
/// (not all `1`) and `[a, b, c]` (not all `0`), minus a direction whose givens in
/// the window are all of the opposite symbol. That pruning leans on [`fixed_cells`] being part
/// of the same clause set.
#[must_use]
pub fn no_three_in_a_row(grid: &Grid, numbering: &Numbering) -> Vec<Clause> {
    let size = grid.size();
    let mut clauses = Vec::new();
    for line in grid.lines() {
        let positions: Vec<_> = line.positions(size).collect();
        for window in positions.windows(3) {
            forbid_uniform(grid, numbering, window, &mut clauses);
        }
    }
    clauses
}

/// Every line holds as many `0`s as `1`s.
///
/// For a line of `size` cells that is the same as forbidding any `size / 2 + 1` of
/// them from being equal, so every such subset gets a "not all `1`" and a "not
/// all `0`" clause (pruned like [`no_three_in_a_row`]). The clause count grows as
/// `C(size, size / 2 + 1)` per line.
///
/// # Errors
///
/// [`Error::OddSize`] if the grid size is odd: the counts can never be equal.
pub fn balanced_lines(grid: &Grid, numbering: &Numbering) -> Result<Vec<Clause>> {
    let size = grid.size();
    if size % 2 != 0 {
        return Err(Error::OddSize { size });
    }

    let mut clauses = Vec::new();
    for line in grid.lines() {
        for subset in line.positions(size).combinations(size / 2 + 1) {
            forbid_uniform(grid, numbering, &subset, &mut clauses);
        }
    }
    Ok(clauses)
}

/// Introduces a fresh variable `eq` equivalent to `a ⇔ b`.
///
/// Returns `eq` and the four defining clauses
/// `[-eq, -a, b]`, `[-eq, a, -b]`, `[eq, a, b]`, `[eq, -a, -b]`.
pub fn encode_equivalence(
    numbering: &mut Numbering,
    a: Literal,
    b: Literal,
) -> (Variable, [Clause; 4]) {
    let eq = Literal::positive(numbering.fresh_aux());
    let clauses = [
        Clause::new([-eq, -a, b]),
        Clause::new([-eq, a, -b]),
        Clause::new([eq, a, b]),
        Clause::new([eq, -a, -b]),
    ];
    (eq.variable(), clauses)
}

/// One equivalence variable per position of two lines, true iff the lines agree
/// there. Returns the variables in position order and their `4 * size` clauses.
pub fn line_pair_equivalences(
    numbering: &mut Numbering,
    first: Line,
    second: Line,
) -> (Vec<Variable>, Vec<Clause>) {
    let size = numbering.size();
    let mut eqs = Vec::with_capacity(size);
    let mut clauses = Vec::with_capacity(4 * size);

    for ((r1, c1), (r2, c2)) in first.positions(size).zip(second.positions(size)) {
        let a = numbering.cell_literal(r1, c1, true);
        let b = numbering.cell_literal(r2, c2, true);
        let (eq, gadget) = encode_equivalence(numbering, a, b);
        eqs.push(eq);
        clauses.extend(gadget);
    }
    (eqs, clauses)
}

/// No two rows and no two columns are equal.
///
/// Every unordered pair of rows, then every unordered pair of columns, gets its
/// [`line_pair_equivalences`] plus the clause `[-eq_0, ..., -eq_{size-1}]`
/// demanding that at least one position differs.
///
/// This is the expensive rule: each pair costs `size` auxiliaries and
/// `4 * size + 1` clauses, so a grid needs `size² * (size - 1)` auxiliaries in
/// total. Cubic growth makes it the dominant term of the encoding.
pub fn distinct_lines(grid: &Grid, numbering: &mut Numbering) -> Vec<Clause> {
    let size = grid.size();
    let pairs = (0..size)
        .tuple_combinations()
        .map(|(k, i)| (Line::Row(k), Line::Row(i)))
        .chain(
            (0..size)
                .tuple_combinations()
                .map(|(k, i)| (Line::Column(k), Line::Column(i))),
        );

    let mut clauses = Vec::new();
    for (first, second) in pairs {
        let (eqs, gadgets) = line_pair_equivalences(numbering, first, second);
        clauses.extend(gadgets);
        clauses.push(eqs.into_iter().map(Literal::negative).collect());
    }
    clauses
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(text: &str) -> Grid {
        text.parse().unwrap()
    }

    fn as_i32(clauses: &[Clause]) -> Vec<Vec<i32>> {
        clauses
            .iter()
            .map(|c| c.iter().map(|l| l.to_i32()).collect())
            .collect()
    }

    #[test]
    fn test_fixed_cells() {
        let g = grid("2\n1.\n.0");
        let clauses = fixed_cells(&g, &Numbering::new(2));
        assert_eq!(as_i32(&clauses), vec![vec![1], vec![-4]]);
    }

    #[test]
    fn test_run_length_empty_grid_counts() {
        let g = Grid::new(4);
        let clauses = no_three_in_a_row(&g, &Numbering::new(4));
        // 8 lines, 2 windows each, 2 directions per window.
        assert_eq!(clauses.len(), 32);
        assert!(clauses.iter().all(|c| c.len() == 3));
        assert_eq!(as_i32(&clauses[..2]), vec![vec![-1, -2, -3], vec![1, 2, 3]]);
    }

    #[test]
    fn test_run_length_too_small_for_windows() {
        assert!(no_three_in_a_row(&Grid::new(2), &Numbering::new(2)).is_empty());
    }

    #[test]
    fn test_run_length_prunes_decided_directions() {
        let g = grid("4\n1...\n....\n....\n....");
        let clauses = as_i32(&no_three_in_a_row(&g, &Numbering::new(4)));
        // Row 0, window 0 holds a `1`: "all 0" is impossible, "all 1" remains.
        assert!(clauses.contains(&vec![-1, -2, -3]));
        assert!(!clauses.contains(&vec![1, 2, 3]));
        // Row 0, window 1 does not include the given.
        assert!(clauses.contains(&vec![2, 3, 4]));
        assert_eq!(clauses.len(), 30);
    }

    #[test]
    fn test_run_length_mixed_window_keeps_both_directions() {
        let g = grid("3\n10.\n...\n...");
        let clauses = as_i32(&no_three_in_a_row(&g, &Numbering::new(3)));
        assert!(clauses.contains(&vec![-1, -2, -3]));
        assert!(clauses.contains(&vec![1, 2, 3]));
        // Columns 0 and 1 each hold a single given and lose one direction.
        assert_eq!(clauses.len(), 10);
    }

    #[test]
    fn test_balance_mixed_subset_keeps_both_directions() {
        let g = grid("2\n10\n..");
        let clauses = as_i32(&balanced_lines(&g, &Numbering::new(2)).unwrap());
        assert!(clauses.contains(&vec![-1, -2]));
        assert!(clauses.contains(&vec![1, 2]));
        // Column 0 holds only a `1`: "all 0" is dropped there.
        assert!(clauses.contains(&vec![-1, -3]));
        assert!(!clauses.contains(&vec![1, 3]));
    }

    #[test]
    fn test_balance_rejects_odd_size() {
        assert!(matches!(
            balanced_lines(&Grid::new(3), &Numbering::new(3)),
            Err(Error::OddSize { size: 3 })
        ));
    }

    #[test]
    fn test_balance_subsets() {
        let clauses = balanced_lines(&Grid::new(4), &Numbering::new(4)).unwrap();
        // 8 lines, C(4, 3) subsets, 2 directions.
        assert_eq!(clauses.len(), 64);
        assert!(clauses.iter().all(|c| c.len() == 3));
        let clauses = as_i32(&clauses);
        assert!(clauses.contains(&vec![-1, -2, -4]));
        assert!(clauses.contains(&vec![4, 8, 16]));
    }

    #[test]
    fn test_balance_size_two() {
        let clauses = balanced_lines(&Grid::new(2), &Numbering::new(2)).unwrap();
        assert_eq!(as_i32(&clauses[..2]), vec![vec![-1, -2], vec![1, 2]]);
    }

    #[test]
    fn test_encode_equivalence_clauses() {
        let mut numbering = Numbering::new(2);
        let a = Literal::positive(1);
        let b = Literal::negative(2);
        let (eq, clauses) = encode_equivalence(&mut numbering, a, b);
        assert_eq!(eq, 5);
        assert_eq!(
            as_i32(&clauses),
            vec![vec![-5, -1, -2], vec![-5, 1, 2], vec![5, 1, -2], vec![5, -1, 2]]
        );
    }

    #[test]
    fn test_encode_equivalence_semantics() {
        let mut numbering = Numbering::new(2);
        let (eq, clauses) =
            encode_equivalence(&mut numbering, Literal::positive(1), Literal::positive(2));
        for a in [false, true] {
            for b in [false, true] {
                for e in [false, true] {
                    let value = |v: Variable| match v {
                        1 => Some(a),
                        2 => Some(b),
                        v if v == eq => Some(e),
                        _ => None,
                    };
                    let satisfied = clauses.iter().all(|c| c.is_satisfied_by(value));
                    assert_eq!(satisfied, e == (a == b), "a={a} b={b} eq={e}");
                }
            }
        }
    }

    #[test]
    fn test_line_pair_equivalences_uses_matching_positions() {
        let mut numbering = Numbering::new(3);
        let (eqs, clauses) =
            line_pair_equivalences(&mut numbering, Line::Column(0), Line::Column(2));
        assert_eq!(eqs, vec![10, 11, 12]);
        assert_eq!(clauses.len(), 12);
        assert_eq!(as_i32(&clauses[8..9]), vec![vec![-12, -7, 9]]);
    }

    #[test]
    fn test_distinct_lines_counts() {
        let g = Grid::new(4);
        let mut numbering = Numbering::new(4);
        let clauses = distinct_lines(&g, &mut numbering);
        // 6 row pairs + 6 column pairs, each 4 auxiliaries and 17 clauses.
        assert_eq!(numbering.aux_issued(), 48);
        assert_eq!(numbering.num_vars(), 64);
        assert_eq!(clauses.len(), 12 * 17);
        let last = clauses.last().unwrap();
        assert_eq!(last.len(), 4);
        assert!(last.iter().all(|l| !l.polarity() && l.variable() > 16));
    }

    #[test]
    fn test_distinct_lines_size_one() {
        let mut numbering = Numbering::new(1);
        assert!(distinct_lines(&Grid::new(1), &mut numbering).is_empty());
        assert_eq!(numbering.aux_issued(), 0);
    }
}
