use std::collections::BTreeSet;
use std::fmt;

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::cell::Cell;

/// What the board shows when a cell is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reveal {
    Mine,
    /// The cell was safe; this many of its neighbors are mines.
    Count(u8),
}

/// The ground-truth board the agent plays against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Minesweeper {
    height: usize,
    width: usize,
    mines: BTreeSet<Cell>,
    /// Mines the player has flagged so far.
    flagged: BTreeSet<Cell>,
}

impl Minesweeper {
    /// Places `mines` mines uniformly at random.
    pub fn new(height: usize, width: usize, mines: usize, rng: &mut impl Rng) -> anyhow::Result<Self> {
        anyhow::ensure!(height > 0 && width > 0, "board must have at least one cell");
        anyhow::ensure!(
            mines <= height * width,
            "{mines} mines do not fit on a {height}x{width} board"
        );

        let cells: Vec<Cell> = Cell::all(height, width).collect();
        let placed = cells.choose_multiple(rng, mines).copied();
        Self::from_mines(height, width, placed)
    }

    /// Builds a board with a fixed mine layout.
    pub fn from_mines(
        height: usize,
        width: usize,
        mines: impl IntoIterator<Item = Cell>,
    ) -> anyhow::Result<Self> {
        let mines: BTreeSet<Cell> = mines.into_iter().collect();
        if let Some(cell) = mines.iter().find(|cell| !cell.within(height, width)) {
            anyhow::bail!("mine {cell} is off the {height}x{width} board");
        }

        Ok(Minesweeper {
            height,
            width,
            mines,
            flagged: BTreeSet::new(),
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn mines(&self) -> &BTreeSet<Cell> {
        &self.mines
    }

    pub fn is_mine(&self, cell: Cell) -> bool {
        self.mines.contains(&cell)
    }

    /// Number of mines among the neighbors of `cell`, not counting the cell itself.
    pub fn nearby_mines(&self, cell: Cell) -> u8 {
        cell.neighbors(self.height, self.width)
            .filter(|neighbor| self.is_mine(*neighbor))
            .count() as u8
    }

    /// Opens `cell`.
    pub fn reveal(&self, cell: Cell) -> anyhow::Result<Reveal> {
        anyhow::ensure!(
            cell.within(self.height, self.width),
            "cell {cell} is off the {}x{} board",
            self.height,
            self.width
        );

        if self.is_mine(cell) {
            return Ok(Reveal::Mine);
        }
        Ok(Reveal::Count(self.nearby_mines(cell)))
    }

    /// Records that the player believes `cell` holds a mine.
    pub fn flag(&mut self, cell: Cell) -> anyhow::Result<()> {
        anyhow::ensure!(
            cell.within(self.height, self.width),
            "cell {cell} is off the {}x{} board",
            self.height,
            self.width
        );
        self.flagged.insert(cell);
        Ok(())
    }

    pub fn flagged(&self) -> &BTreeSet<Cell> {
        &self.flagged
    }

    /// Checks if every mine, and nothing else, has been flagged.
    pub fn won(&self) -> bool {
        self.flagged == self.mines
    }
}

/// Renders where the mines are, one `|X|` per mine.
impl fmt::Display for Minesweeper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let border = "--".repeat(self.width) + "-";
        for row in 0..self.height {
            writeln!(f, "{border}")?;
            for col in 0..self.width {
                let mark = if self.is_mine(Cell::new(row, col)) { 'X' } else { ' ' };
                write!(f, "|{mark}")?;
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "{border}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_random_layout() {
        // The requested number of mines is placed, all on the board
        let mut rng = StdRng::seed_from_u64(42);
        let game = Minesweeper::new(8, 8, 8, &mut rng).unwrap();
        assert_eq!(game.mines().len(), 8);
        assert!(game.mines().iter().all(|cell| cell.within(8, 8)));
        assert!(!game.won());
    }

    #[test]
    fn test_too_many_mines() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(Minesweeper::new(2, 2, 5, &mut rng).is_err());
        assert!(Minesweeper::new(0, 3, 0, &mut rng).is_err());
        assert_eq!(Minesweeper::new(2, 2, 4, &mut rng).unwrap().mines().len(), 4);
    }

    #[test]
    fn test_nearby_mines() {
        let game =
            Minesweeper::from_mines(3, 3, [Cell::new(0, 0), Cell::new(2, 2)]).unwrap();
        assert_eq!(game.nearby_mines(Cell::new(1, 1)), 2);
        assert_eq!(game.nearby_mines(Cell::new(0, 1)), 1);
        assert_eq!(game.nearby_mines(Cell::new(2, 0)), 0);
        // A mine does not count itself
        assert_eq!(game.nearby_mines(Cell::new(0, 0)), 0);
    }

    #[test]
    fn test_reveal() {
        let game = Minesweeper::from_mines(2, 2, [Cell::new(0, 0)]).unwrap();
        assert_eq!(game.reveal(Cell::new(0, 0)).unwrap(), Reveal::Mine);
        assert_eq!(game.reveal(Cell::new(1, 1)).unwrap(), Reveal::Count(1));
        assert!(game.reveal(Cell::new(2, 0)).is_err());
    }

    #[test]
    fn test_mine_off_board() {
        assert!(Minesweeper::from_mines(2, 2, [Cell::new(0, 2)]).is_err());
    }

    #[test]
    fn test_won_after_flagging_every_mine() {
        let mut game = Minesweeper::from_mines(2, 2, [Cell::new(0, 1), Cell::new(1, 0)]).unwrap();
        game.flag(Cell::new(0, 1)).unwrap();
        assert!(!game.won());
        game.flag(Cell::new(1, 0)).unwrap();
        assert!(game.won());

        // A wrong flag spoils the win
        game.flag(Cell::new(1, 1)).unwrap();
        assert!(!game.won());
    }

    #[test]
    fn test_display() {
        let game = Minesweeper::from_mines(1, 2, [Cell::new(0, 1)]).unwrap();
        assert_eq!(game.to_string(), "-----\n| |X|\n-----\n");
    }
}
