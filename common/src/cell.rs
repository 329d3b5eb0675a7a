use std::fmt;

use itertools::iproduct;

/// A coordinate on the board, addressed by row and then column.
///
/// Cells order row-major, which keeps every set of cells (and therefore every
/// sentence built from them) in a canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Cell { row, col }
    }

    /// Every cell of a `height` x `width` board, in row-major order.
    pub fn all(height: usize, width: usize) -> impl Iterator<Item = Cell> {
        iproduct!(0..height, 0..width).map(Cell::from)
    }

    /// Whether this cell lies on a board of the given dimensions.
    pub fn within(self, height: usize, width: usize) -> bool {
        self.row < height && self.col < width
    }

    /// All valid neighbor coordinates of this cell.
    /// Handles board edges and corners and never yields the cell itself.
    pub fn neighbors(self, height: usize, width: usize) -> impl Iterator<Item = Cell> {
        (-1isize..=1).flat_map(move |dr| {
            (-1isize..=1).filter_map(move |dc| {
                if dr == 0 && dc == 0 {
                    return None;
                }

                let row = self.row.checked_add_signed(dr)?;
                let col = self.col.checked_add_signed(dc)?;
                let neighbor = Cell { row, col };
                neighbor.within(height, width).then_some(neighbor)
            })
        })
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Cell { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
