use std::collections::BTreeSet;
use std::fmt;

use itertools::Itertools;

use crate::cell::Cell;
use crate::error::{Contradiction, InferenceError, Result};

/// A logical statement about the board: exactly `count` of `cells` are mines.
///
/// Cells are kept in a sorted set, so two sentences compare equal exactly when
/// they cover the same cells with the same count. That structural equality is
/// what the knowledge base relies on to suppress duplicate derivations.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Sentence {
    cells: BTreeSet<Cell>,
    count: usize,
}

impl Sentence {
    /// Builds a sentence, rejecting counts outside `0..=cells.len()`.
    pub fn new(cells: impl IntoIterator<Item = Cell>, count: isize) -> Result<Self> {
        let cells: BTreeSet<Cell> = cells.into_iter().collect();
        match usize::try_from(count) {
            Ok(count) if count <= cells.len() => Ok(Sentence { cells, count }),
            _ => Err(InferenceError::Constraint { cells, count }),
        }
    }

    pub fn cells(&self) -> &BTreeSet<Cell> {
        &self.cells
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Every cell, if the count says they are all mines.
    pub fn known_mines(&self) -> Option<&BTreeSet<Cell>> {
        (self.count == self.cells.len()).then_some(&self.cells)
    }

    /// Every cell, if the count says none of them are mines.
    pub fn known_safes(&self) -> Option<&BTreeSet<Cell>> {
        (self.count == 0).then_some(&self.cells)
    }

    /// Whether this sentence is fully determined, one way or the other.
    pub fn is_determined(&self) -> bool {
        self.count == 0 || self.count == self.cells.len()
    }

    /// Removes a cell known to be a mine, along with the mine it accounts for.
    ///
    /// Returns whether the cell was part of this sentence.
    pub fn mark_mine(&mut self, cell: Cell) -> Result<bool, Contradiction> {
        if !self.cells.contains(&cell) {
            return Ok(false);
        }
        if self.count == 0 {
            return Err(Contradiction::SafeAndMine(cell));
        }

        self.cells.remove(&cell);
        self.count -= 1;
        Ok(true)
    }

    /// Removes a cell known to be safe. The count is untouched.
    ///
    /// Returns whether the cell was part of this sentence.
    pub fn mark_safe(&mut self, cell: Cell) -> Result<bool, Contradiction> {
        if !self.cells.contains(&cell) {
            return Ok(false);
        }
        if self.count == self.cells.len() {
            return Err(Contradiction::SafeAndMine(cell));
        }

        self.cells.remove(&cell);
        Ok(true)
    }

    /// Whether this sentence's cells are a strict subset of `other`'s.
    pub fn is_strict_subset(&self, other: &Sentence) -> bool {
        self.cells.len() < other.cells.len() && self.cells.is_subset(&other.cells)
    }

    /// Subset resolution: if `subset` covers a strict subset of this
    /// sentence's cells, the mines this sentence has beyond `subset`'s must
    /// lie in the remaining cells.
    ///
    /// Returns `Ok(None)` when the two sentences are not in a strict subset
    /// relation.
    pub fn subtract(&self, subset: &Sentence) -> Result<Option<Sentence>, Contradiction> {
        if !subset.is_strict_subset(self) {
            return Ok(None);
        }

        let cells: BTreeSet<Cell> = self.cells.difference(&subset.cells).copied().collect();
        let count = self.count as isize - subset.count as isize;
        match usize::try_from(count) {
            Ok(count) if count <= cells.len() => Ok(Some(Sentence { cells, count })),
            _ => Err(Contradiction::NegativeDifference { cells, count }),
        }
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}} = {}", self.cells.iter().join(", "), self.count)
    }
}
