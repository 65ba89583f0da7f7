use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::grid::Grid;

/// Anything able to count the alive neighbors of a cell.
///
/// Implementations must be pure: the same grid and coordinate always give the same count, the
/// cell itself is never counted and the grid is never modified.
pub trait CountNeighbors {
    fn count(&self, grid: &Grid, row: usize, col: usize) -> u8;
}

/// `(row, col)` offsets of the 8 surrounding cells
const MOORE: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// `(row, col)` offsets of the 4 orthogonal cells
const VON_NEUMANN: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Neighborhood {
    /// 8-connected. Offsets falling off the grid are skipped.
    #[default]
    Moore,

    /// 4-connected. Offsets falling off the grid are skipped.
    VonNeumann,

    /// 8-connected, wrapping around the grid edges.
    ToroidalMoore,

    /// 4-connected, wrapping around the grid edges.
    ToroidalVonNeumann,
}

impl Neighborhood {
    pub const ALL: [Neighborhood; 4] = [
        Neighborhood::Moore,
        Neighborhood::VonNeumann,
        Neighborhood::ToroidalMoore,
        Neighborhood::ToroidalVonNeumann,
    ];

    pub const fn offsets(self) -> &'static [(isize, isize)] {
        match self {
            Neighborhood::Moore | Neighborhood::ToroidalMoore => &MOORE,
            Neighborhood::VonNeumann | Neighborhood::ToroidalVonNeumann => &VON_NEUMANN,
        }
    }

    pub const fn wraps(self) -> bool {
        matches!(
            self,
            Neighborhood::ToroidalMoore | Neighborhood::ToroidalVonNeumann
        )
    }

    /// Upper bound of [`CountNeighbors::count`]
    pub const fn max_neighbors(self) -> u8 {
        self.offsets().len() as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            Neighborhood::Moore => "moore",
            Neighborhood::VonNeumann => "von-neumann",
            Neighborhood::ToroidalMoore => "torus-moore",
            Neighborhood::ToroidalVonNeumann => "torus-von-neumann",
        }
    }

    /// Resolve an offset to an in-grid coordinate, if there is one
    fn resolve(
        self,
        grid: &Grid,
        row: usize,
        col: usize,
        (dr, dc): (isize, isize),
    ) -> Option<(usize, usize)> {
        let (width, height) = grid.dimensions();

        if self.wraps() {
            let r = (row as isize + dr).rem_euclid(height as isize) as usize;
            let c = (col as isize + dc).rem_euclid(width as isize) as usize;

            // On grids 1 or 2 cells across an offset can wrap back onto the cell itself
            if (r, c) == (row, col) {
                return None;
            }

            Some((r, c))
        } else {
            let r = row.checked_add_signed(dr)?;
            let c = col.checked_add_signed(dc)?;

            grid.contains(r, c).then_some((r, c))
        }
    }
}

impl CountNeighbors for Neighborhood {
    fn count(&self, grid: &Grid, row: usize, col: usize) -> u8 {
        debug_assert!(grid.contains(row, col));

        self.offsets()
            .iter()
            .filter_map(|&offset| self.resolve(grid, row, col, offset))
            .filter(|&(r, c)| grid.at(r, c).is_alive())
            .count() as u8
    }
}

impl<N: CountNeighbors + ?Sized> CountNeighbors for &N {
    fn count(&self, grid: &Grid, row: usize, col: usize) -> u8 {
        (**self).count(grid, row, col)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error(
    "Unknown neighborhood \"{got}\", expected one of moore, von-neumann, torus-moore, torus-von-neumann"
)]
pub struct NeighborhoodError {
    got: String,
}

impl FromStr for Neighborhood {
    type Err = NeighborhoodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase().replace('_', "-");

        Neighborhood::ALL
            .into_iter()
            .find(|n| n.name() == name)
            .ok_or_else(|| NeighborhoodError { got: s.to_string() })
    }
}

impl fmt::Display for Neighborhood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
