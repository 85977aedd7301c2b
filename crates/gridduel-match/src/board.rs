//! The N×N grid.

use std::fmt;

use gridduel_protocol::Coord;
use serde::{Deserialize, Serialize};

/// The content of one cell.
///
/// `X` is the first player's mark, `O` the second's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    pub fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// A square board of `size × size` cells, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an empty board. Size validation is the caller's job.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the cell at `(row, col)`. Panics if out of range.
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.size + col]
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, cell: Cell) {
        self.cells[row * self.size + col] = cell;
    }

    /// Converts a signed coordinate to `(row, col)` if it lies on the board.
    pub fn index_of(&self, coord: Coord) -> Option<(usize, usize)> {
        let row = usize::try_from(coord.x).ok().filter(|r| *r < self.size)?;
        let col = usize::try_from(coord.y).ok().filter(|c| *c < self.size)?;
        Some((row, col))
    }

    /// Returns `true` once every cell holds a mark.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    /// Number of marks placed so far.
    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// The board as nested rows, for snapshots.
    pub fn rows(&self) -> Vec<Vec<Cell>> {
        self.cells.chunks(self.size).map(<[Cell]>::to_vec).collect()
    }
}

/// Renders rows of `X`, `O` and `.` separated by spaces.
impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ch = match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        };
        write!(f, "{ch}")
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_rows(f, self.cells.chunks(self.size))
    }
}

/// Renders rows as lines of space-separated cells.
pub(crate) fn write_rows<'a>(
    f: &mut fmt::Formatter<'_>,
    rows: impl Iterator<Item = &'a [Cell]>,
) -> fmt::Result {
    for (i, row) in rows.enumerate() {
        if i > 0 {
            writeln!(f)?;
        }
        for (j, cell) in row.iter().enumerate() {
            if j > 0 {
                write!(f, " ")?;
            }
            write!(f, "{cell}")?;
        }
    }
    Ok(())
}
