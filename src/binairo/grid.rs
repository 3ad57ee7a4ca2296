//! The puzzle grid: a square of cells that are empty, `0` or `1`.

use crate::error::{Error, Result};
use crate::sat::literal::Literal;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Content of one grid cell.
///
/// `One` is the symbol a positive literal decodes to, `Zero` the negative one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Cell {
    /// Not decided yet, written `.`.
    #[default]
    Empty,
    /// The `0` symbol; its variable is false.
    Zero,
    /// The `1` symbol; its variable is true.
    One,
}

impl Cell {
    /// The cell a variable with this truth value decodes to.
    #[must_use]
    pub const fn from_polarity(polarity: bool) -> Self {
        if polarity { Self::One } else { Self::Zero }
    }

    /// Truth value of the cell's variable, `None` while the cell is empty.
    #[must_use]
    pub const fn polarity(self) -> Option<bool> {
        match self {
            Self::Empty => None,
            Self::Zero => Some(false),
            Self::One => Some(true),
        }
    }

    /// The other symbol; empty stays empty.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Zero => Self::One,
            Self::One => Self::Zero,
        }
    }

    /// Character used in grid text.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Empty => '.',
            Self::Zero => '0',
            Self::One => '1',
        }
    }

    /// Reads a grid text character, `None` if it is not `.`, `0` or `1`.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '.' => Some(Self::Empty),
            '0' => Some(Self::Zero),
            '1' => Some(Self::One),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A row or a column. Every rule treats both kinds the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Line {
    /// Row `y`, read left to right.
    Row(usize),
    /// Column `x`, read top to bottom.
    Column(usize),
}

impl Line {
    /// Row or column number.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Row(i) | Self::Column(i) => i,
        }
    }

    /// `(row, col)` coordinates along the line, in order.
    pub fn positions(self, size: usize) -> impl Iterator<Item = (usize, usize)> {
        (0..size).map(move |k| match self {
            Self::Row(row) => (row, k),
            Self::Column(col) => (k, col),
        })
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Row(i) => write!(f, "row {i}"),
            Self::Column(i) => write!(f, "column {i}"),
        }
    }
}

/// A square binairo grid stored row-major: cell `(row, col)` lives at
/// `row * size + col`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// An empty grid with side length `size`.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// Side length.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// All cells, row-major.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    fn check(&self, index: usize) -> Result<usize> {
        if index < self.size {
            Ok(index)
        } else {
            Err(Error::OutOfRange {
                index,
                size: self.size,
            })
        }
    }

    /// Unchecked read for coordinates produced by [`Line::positions`].
    pub(crate) fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.size + col]
    }

    /// # Errors
    ///
    /// [`Error::OutOfRange`] if `row` or `col` is not below the grid size.
    pub fn get(&self, row: usize, col: usize) -> Result<Cell> {
        let (row, col) = (self.check(row)?, self.check(col)?);
        Ok(self.cell(row, col))
    }

    /// Stores `value` at `(row, col)` and returns the previous content.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if `row` or `col` is not below the grid size.
    pub fn set(&mut self, row: usize, col: usize, value: Cell) -> Result<Cell> {
        let (row, col) = (self.check(row)?, self.check(col)?);
        let slot = &mut self.cells[row * self.size + col];
        Ok(std::mem::replace(slot, value))
    }

    /// # Errors
    ///
    /// [`Error::OutOfRange`] if `y` is not below the grid size.
    pub fn row(&self, y: usize) -> Result<&[Cell]> {
        let start = self.check(y)? * self.size;
        Ok(&self.cells[start..start + self.size])
    }

    /// # Errors
    ///
    /// [`Error::OutOfRange`] if `x` is not below the grid size.
    pub fn column(&self, x: usize) -> Result<Vec<Cell>> {
        let x = self.check(x)?;
        Ok(self.cells.iter().skip(x).step_by(self.size).copied().collect())
    }

    /// Cells of a row or column, in order.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if the line index is not below the grid size.
    pub fn line(&self, line: Line) -> Result<Vec<Cell>> {
        match line {
            Line::Row(y) => self.row(y).map(<[Cell]>::to_vec),
            Line::Column(x) => self.column(x),
        }
    }

    /// Every row, then every column.
    pub fn lines(&self) -> impl Iterator<Item = Line> + use<> {
        let size = self.size;
        (0..size).map(Line::Row).chain((0..size).map(Line::Column))
    }

    /// `true` once no cell is empty.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.cells.contains(&Cell::Empty)
    }

    /// `true` if every non-empty cell of `puzzle` holds the same value here.
    #[must_use]
    pub fn agrees_with(&self, puzzle: &Self) -> bool {
        self.size == puzzle.size
            && self
                .cells
                .iter()
                .zip(&puzzle.cells)
                .all(|(&mine, &given)| given == Cell::Empty || mine == given)
    }

    /// Builds a grid from its size line and body text.
    ///
    /// The body holds `size * size` symbols from `.`, `0` and `1`; whitespace
    /// (including line breaks) anywhere in it is ignored.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSize`] if the size line is not a positive integer, or so
    ///   large that `size * size` overflows.
    /// - [`Error::InvalidSymbol`] for any other character.
    /// - [`Error::SizeMismatch`] if the number of symbols is not `size * size`.
    pub fn parse(size_line: &str, body: &str) -> Result<Self> {
        let size = size_line
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|&size| size > 0)
            .ok_or_else(|| Error::InvalidSize(size_line.to_owned()))?;

        let expected = size
            .checked_mul(size)
            .ok_or_else(|| Error::InvalidSize(size_line.to_owned()))?;
        let symbols: Vec<char> = body.chars().filter(|c| !c.is_whitespace()).collect();
        if symbols.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                found: symbols.len(),
            });
        }

        let cells = symbols
            .into_iter()
            .enumerate()
            .map(|(position, symbol)| {
                Cell::from_symbol(symbol).ok_or(Error::InvalidSymbol { symbol, position })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { size, cells })
    }

    /// Builds a grid from solver literals: literal `v` sets cell `|v| - 1` to `1`
    /// when positive and to `0` when negative. Cells no literal mentions stay
    /// empty. The side length is the square root of the number of literals.
    ///
    /// # Errors
    ///
    /// - [`Error::NotSquare`] if the literal count is not a non-zero perfect square.
    /// - [`Error::IndexOutOfBounds`] if a literal names a variable beyond the cells.
    pub fn from_assignment(values: &[Literal]) -> Result<Self> {
        let len = values.len();
        let size = len.isqrt();
        if len == 0 || size * size != len {
            return Err(Error::NotSquare { len });
        }

        let mut grid = Self::new(size);
        for &lit in values {
            let index = (lit.variable() as usize)
                .checked_sub(1)
                .filter(|&index| index < len)
                .ok_or(Error::IndexOutOfBounds {
                    literal: lit.to_i32(),
                    cells: len,
                })?;
            grid.cells[index] = Cell::from_polarity(lit.polarity());
        }
        Ok(grid)
    }

    /// Reads a grid file: size on the first line, cells below.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if the file cannot be read, otherwise as [`Grid::parse`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        std::fs::read_to_string(path)?.parse()
    }

    /// The grid file format: size line followed by one line per row.
    #[must_use]
    pub fn to_text(&self) -> String {
        format!("{}\n{self}\n", self.size)
    }
}

impl FromStr for Grid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (size_line, body) = s.split_once('\n').unwrap_or((s, ""));
        Self::parse(size_line, body)
    }
}

/// One row per line, no trailing newline, no size header.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.chunks(self.size.max(1)).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{cell}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lits(values: &[i32]) -> Vec<Literal> {
        values.iter().filter_map(|&v| Literal::from_i32(v)).collect()
    }

    #[test]
    fn test_parse_tolerates_whitespace() {
        let grid = Grid::parse("4", ".1 . .\n....\n0 0 1 1\n  ....  ").unwrap();
        assert_eq!(grid.size(), 4);
        assert_eq!(grid.get(0, 1).unwrap(), Cell::One);
        assert_eq!(grid.get(2, 0).unwrap(), Cell::Zero);
        assert_eq!(grid.get(3, 3).unwrap(), Cell::Empty);
    }

    #[test]
    fn test_parse_size_mismatch() {
        let result = Grid::parse("4", ".1..\n....\n....\n...");
        assert!(matches!(
            result,
            Err(Error::SizeMismatch {
                expected: 16,
                found: 15
            })
        ));
    }

    #[test]
    fn test_parse_bad_symbol_and_size() {
        assert!(matches!(
            Grid::parse("2", "0x10"),
            Err(Error::InvalidSymbol {
                symbol: 'x',
                position: 1
            })
        ));
        assert!(matches!(Grid::parse("two", "0110"), Err(Error::InvalidSize(_))));
        assert!(matches!(Grid::parse("0", ""), Err(Error::InvalidSize(_))));
    }

    #[test]
    fn test_parse_size_too_large_for_cell_count() {
        let huge = (usize::MAX / 2).to_string();
        assert!(matches!(Grid::parse(&huge, "0"), Err(Error::InvalidSize(s)) if s == huge));
        assert!(matches!(
            Grid::parse("1000", "0"),
            Err(Error::SizeMismatch {
                expected: 1_000_000,
                found: 1
            })
        ));
    }

    #[test]
    fn test_from_str_and_to_text_round_trip() {
        let text = "4\n.1..\n0..1\n....\n1100\n";
        let grid: Grid = text.parse().unwrap();
        assert_eq!(grid.to_text(), text);
        assert_eq!(grid.to_string(), ".1..\n0..1\n....\n1100");
    }

    #[test]
    fn test_get_set_bounds() {
        let mut grid = Grid::new(3);
        assert_eq!(grid.set(1, 2, Cell::One).unwrap(), Cell::Empty);
        assert_eq!(grid.set(1, 2, Cell::Zero).unwrap(), Cell::One);
        assert_eq!(grid.get(1, 2).unwrap(), Cell::Zero);
        assert!(matches!(
            grid.set(3, 0, Cell::One),
            Err(Error::OutOfRange { index: 3, size: 3 })
        ));
        assert!(matches!(
            grid.get(0, 5),
            Err(Error::OutOfRange { index: 5, size: 3 })
        ));
    }

    #[test]
    fn test_rows_and_columns() {
        let grid: Grid = "3\n01.\n1.0\n.10".parse().unwrap();
        assert_eq!(grid.row(1).unwrap(), &[Cell::One, Cell::Empty, Cell::Zero]);
        assert_eq!(
            grid.column(2).unwrap(),
            vec![Cell::Empty, Cell::Zero, Cell::Zero]
        );
        assert_eq!(grid.line(Line::Column(0)).unwrap(), grid.column(0).unwrap());
        assert!(grid.row(3).is_err());
        assert!(grid.column(3).is_err());
    }

    #[test]
    fn test_lines_cover_rows_then_columns() {
        let lines: Vec<_> = Grid::new(2).lines().collect();
        assert_eq!(
            lines,
            vec![Line::Row(0), Line::Row(1), Line::Column(0), Line::Column(1)]
        );
        let positions: Vec<_> = Line::Column(1).positions(3).collect();
        assert_eq!(positions, vec![(0, 1), (1, 1), (2, 1)]);
    }

    #[test]
    fn test_from_assignment() {
        let grid = Grid::from_assignment(&lits(&[1, -2, -3, 4])).unwrap();
        assert_eq!(grid.to_string(), "10\n01");
        assert!(grid.is_complete());
    }

    #[test]
    fn test_from_assignment_leaves_unmentioned_cells_empty() {
        let grid = Grid::from_assignment(&lits(&[4, 4, -1, 4])).unwrap();
        assert_eq!(grid.to_string(), "0.\n.1");
        assert!(!grid.is_complete());
    }

    #[test]
    fn test_from_assignment_errors() {
        assert!(matches!(
            Grid::from_assignment(&lits(&[1, 2, 3])),
            Err(Error::NotSquare { len: 3 })
        ));
        assert!(matches!(
            Grid::from_assignment(&[]),
            Err(Error::NotSquare { len: 0 })
        ));
        assert!(matches!(
            Grid::from_assignment(&lits(&[1, -2, 3, -5])),
            Err(Error::IndexOutOfBounds {
                literal: -5,
                cells: 4
            })
        ));
    }

    #[test]
    fn test_agrees_with() {
        let puzzle: Grid = "2\n.1\n..".parse().unwrap();
        let good: Grid = "2\n01\n10".parse().unwrap();
        let bad: Grid = "2\n10\n01".parse().unwrap();
        assert!(good.agrees_with(&puzzle));
        assert!(!bad.agrees_with(&puzzle));
    }
}
