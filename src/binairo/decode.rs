//! Turning models back into grids, and an independent distinctness check.

use crate::binairo::grid::{Cell, Grid, Line};
use crate::error::Result;
use crate::sat::assignment::Assignment;
use itertools::Itertools;
use rustc_hash::FxHashMap;
use std::fmt;
use std::hash::Hash;

/// Decodes the cell part of a model: its first `size²` literals.
///
/// # Errors
///
/// As [`Grid::from_assignment`], e.g. when the model is shorter than the grid.
pub fn decode(solution: &Assignment, size: usize) -> Result<Grid> {
    let cells = solution.truncated(size * size);
    Grid::from_assignment(cells.as_slice())
}

/// Two lines of a decoded grid that turned out identical.
///
/// The distinctness clauses forbid this, so a violation points at a bug in the
/// encoding (or in the solver), not at the puzzle. A grid carrying one should not
/// be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EncodingViolation {
    /// The earlier of the two lines.
    pub first: Line,
    /// The later line, equal to `first`.
    pub second: Line,
}

impl fmt::Display for EncodingViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} and {} are identical", self.first, self.second)
    }
}

/// Re-checks, without looking at any clause, that no two rows and no two columns
/// of `grid` are equal. Lines that still have empty cells are not compared.
///
/// Returns every offending pair; an empty result means the grid is distinct.
#[must_use]
pub fn validate_distinct(grid: &Grid) -> Vec<EncodingViolation> {
    let complete = |cells: &[Cell]| !cells.contains(&Cell::Empty);

    let rows = (0..grid.size())
        .filter_map(|y| grid.row(y).ok())
        .map(|row| complete(row).then_some(row));
    let columns = (0..grid.size())
        .filter_map(|x| grid.column(x).ok())
        .map(|column| complete(&column).then_some(column));

    identical_pairs(rows)
        .map(|(k, i)| (Line::Row(k), Line::Row(i)))
        .chain(identical_pairs(columns).map(|(k, i)| (Line::Column(k), Line::Column(i))))
        .map(|(first, second)| EncodingViolation { first, second })
        .collect()
}

/// Index pairs `(k, i)`, `k < i`, of equal keys. `None` keys never match.
fn identical_pairs<K: Hash + Eq>(
    keys: impl Iterator<Item = Option<K>>,
) -> impl Iterator<Item = (usize, usize)> {
    let mut groups: FxHashMap<K, Vec<usize>> = FxHashMap::default();
    for (index, key) in keys.enumerate() {
        if let Some(key) = key {
            groups.entry(key).or_default().push(index);
        }
    }
    groups
        .into_values()
        .filter(|indices| indices.len() > 1)
        .flat_map(|indices| indices.into_iter().tuple_combinations())
        .sorted()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::literal::Literal;

    fn assignment(values: &[i32]) -> Assignment {
        values.iter().filter_map(|&v| Literal::from_i32(v)).collect()
    }

    #[test]
    fn test_decode_truncates_auxiliaries() {
        let solution = assignment(&[1, -2, -3, 4, 5, -6, 7]);
        let grid = decode(&solution, 2).unwrap();
        assert_eq!(grid.to_string(), "10\n01");
    }

    #[test]
    fn test_decode_short_model_fails() {
        assert!(decode(&assignment(&[1, -2, 3]), 2).is_err());
    }

    #[test]
    fn test_validate_distinct_accepts_valid_grid() {
        let grid: Grid = "4\n0101\n1010\n0110\n1001".parse().unwrap();
        assert!(validate_distinct(&grid).is_empty());
    }

    #[test]
    fn test_validate_distinct_reports_rows_and_columns() {
        let grid: Grid = "4\n0101\n0101\n1010\n1010".parse().unwrap();
        let violations = validate_distinct(&grid);
        assert!(violations.contains(&EncodingViolation {
            first: Line::Row(0),
            second: Line::Row(1)
        }));
        assert!(violations.contains(&EncodingViolation {
            first: Line::Row(2),
            second: Line::Row(3)
        }));
        // Columns 0 and 2 are both 0011, columns 1 and 3 both 1100.
        assert!(violations.contains(&EncodingViolation {
            first: Line::Column(0),
            second: Line::Column(2)
        }));
        assert_eq!(violations.len(), 4);
        assert_eq!(violations[0].to_string(), "row 0 and row 1 are identical");
    }

    #[test]
    fn test_validate_distinct_reports_every_pair_of_a_group() {
        let grid: Grid = "3\n010\n010\n010".parse().unwrap();
        let rows: Vec<_> = validate_distinct(&grid)
            .into_iter()
            .filter(|v| matches!(v.first, Line::Row(_)))
            .collect();
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_validate_distinct_ignores_incomplete_lines() {
        let grid: Grid = "2\n1.\n1.".parse().unwrap();
        let violations = validate_distinct(&grid);
        assert!(violations.is_empty());
    }
}
