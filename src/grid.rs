use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::cell::Cell;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Invalid grid dimensions {width}x{height}, both must be at least 1")]
    InvalidDimension { width: usize, height: usize },

    #[error("A {width}x{height} grid is too large to allocate")]
    TooLarge { width: usize, height: usize },

    #[error("Cell ({row}, {col}) is outside of a {width}x{height} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    },

    #[error("Row {row} has {found} cells, expected {expected}")]
    MalformedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// A fixed-size, row-major matrix of cells.
///
/// Coordinates are `(row, col)` with `row` in `[0, height)` and `col` in `[0, width)`. Once a
/// grid has been handed out for rendering or stepping it is only ever borrowed, so the next
/// generation is always written to a different `Grid`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an all-dead grid
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimension { width, height });
        }

        let too_large = || GridError::TooLarge { width, height };
        let len = width.checked_mul(height).ok_or_else(too_large)?;

        let mut cells = Vec::new();
        cells.try_reserve_exact(len).map_err(|_| too_large())?;
        cells.resize(len, Cell::Dead);

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Build a grid out of rows. Every row must have the same, non-zero, length.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);

        if let Some((row, cols)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(GridError::MalformedGrid {
                row,
                expected: width,
                found: cols.len(),
            });
        }

        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimension { width, height });
        }

        let cells: Vec<Cell> = rows.into_iter().flatten().collect();

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Returns `(width, height)`
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    pub const fn contains(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width
    }

    pub fn get(&self, row: usize, col: usize) -> Result<Cell, GridError> {
        self.check(row, col)?;

        Ok(self.at(row, col))
    }

    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> Result<(), GridError> {
        self.check(row, col)?;

        let i = self.index(row, col);
        self.cells[i] = cell;

        Ok(())
    }

    /// Number of alive cells
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|c| c.is_alive()).count()
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[Cell]> {
        self.cells.chunks_exact(self.width)
    }

    /// Coordinates of every alive cell, in row-major order
    pub fn alive(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_alive())
            .map(|(i, _)| (i / self.width, i % self.width))
    }

    /// Unchecked read. Callers must have verified `(row, col)` is inside the grid.
    pub(crate) fn at(&self, row: usize, col: usize) -> Cell {
        self.cells[self.index(row, col)]
    }

    /// Unchecked write, used while filling in a generation that nobody else can see yet.
    pub(crate) fn put(&mut self, row: usize, col: usize, cell: Cell) {
        let i = self.index(row, col);
        self.cells[i] = cell;
    }

    /// Take the dimensions of `other`, reusing the allocation. Cell contents are unspecified
    /// afterwards and must all be overwritten.
    pub(crate) fn reshape_like(&mut self, other: &Grid) {
        if self.dimensions() != other.dimensions() {
            self.width = other.width;
            self.height = other.height;
            self.cells.resize(other.cells.len(), Cell::Dead);
        }
    }

    const fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    fn check(&self, row: usize, col: usize) -> Result<(), GridError> {
        if self.contains(row, col) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds {
                row,
                col,
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// Writes the grid in the text-pattern format, one line of `0`s and `1`s per row.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for &cell in row {
                write!(f, "{}", cell.as_digit())?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl FromStr for Grid {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::seed::parse_pattern(s)
    }
}
