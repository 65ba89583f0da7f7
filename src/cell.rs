/// State of a single grid position.
#[repr(u8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Dead = 0,
    Alive = 1,
}

impl Cell {
    pub const fn is_alive(self) -> bool {
        matches!(self, Cell::Alive)
    }

    /// Reads a cell from its pattern-file digit. Anything but `'0'` or `'1'` yields `None`.
    pub const fn from_digit(c: char) -> Option<Self> {
        match c {
            '0' => Some(Cell::Dead),
            '1' => Some(Cell::Alive),
            _ => None,
        }
    }

    pub const fn as_digit(self) -> char {
        match self {
            Cell::Dead => '0',
            Cell::Alive => '1',
        }
    }
}

impl From<bool> for Cell {
    fn from(alive: bool) -> Self {
        if alive { Cell::Alive } else { Cell::Dead }
    }
}

impl From<Cell> for bool {
    fn from(cell: Cell) -> Self {
        cell.is_alive()
    }
}
