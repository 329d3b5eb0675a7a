use std::collections::BTreeSet;
use std::fmt;
use std::mem;

use itertools::Itertools;

use crate::cell::Cell;
use crate::error::{Contradiction, InferenceError, Result};
use crate::inference::{self, Trace, ignore};
use crate::sentence::Sentence;

/// Everything the agent knows about one game.
///
/// The knowledge base tracks the cells it has played, the cells proven safe or
/// mined, and the open sentences over the cells still in doubt. After every
/// public operation it holds these invariants:
///
/// - no cell is both safe and a mine,
/// - every played cell is safe,
/// - no sentence mentions a safe or mined cell,
/// - no sentence is empty and no two sentences are equal,
/// - safes and mines only ever grow.
///
/// Failing operations leave the knowledge base untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeBase {
    height: usize,
    width: usize,
    moves_made: BTreeSet<Cell>,
    safes: BTreeSet<Cell>,
    mines: BTreeSet<Cell>,
    sentences: Vec<Sentence>,
}

impl KnowledgeBase {
    pub fn new(height: usize, width: usize) -> Self {
        KnowledgeBase {
            height,
            width,
            moves_made: BTreeSet::new(),
            safes: BTreeSet::new(),
            mines: BTreeSet::new(),
            sentences: Vec::new(),
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Cells already played.
    pub fn moves_made(&self) -> &BTreeSet<Cell> {
        &self.moves_made
    }

    /// Cells proven safe, played or not.
    pub fn safes(&self) -> &BTreeSet<Cell> {
        &self.safes
    }

    /// Cells proven to be mines.
    pub fn mines(&self) -> &BTreeSet<Cell> {
        &self.mines
    }

    /// The open sentences, in the order they were learned.
    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    /// Every cell on the board.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        Cell::all(self.height, self.width)
    }

    /// Cells that are neither proven safe nor proven mines.
    pub fn unknown_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells()
            .filter(|cell| !self.safes.contains(cell) && !self.mines.contains(cell))
    }

    /// Records that `cell` was played and that `count` of its neighbors are
    /// mines, then closes the knowledge base under inference.
    pub fn add_knowledge(&mut self, cell: Cell, count: usize) -> Result<()> {
        self.add_knowledge_traced(cell, count, &mut ignore)
    }

    /// Same as [`KnowledgeBase::add_knowledge`], reporting every step of the
    /// deduction to `trace`.
    pub fn add_knowledge_traced(
        &mut self,
        cell: Cell,
        count: usize,
        trace: &mut impl FnMut(&Trace<'_>),
    ) -> Result<()> {
        self.check_bounds(cell)?;
        self.transaction(|kb| {
            kb.observe(cell, count, trace)?;
            inference::close(kb, trace)
        })
    }

    /// Marks `cell` as a mine everywhere and draws any follow-up conclusions.
    ///
    /// Returns `false` when the cell was already known to be a mine.
    pub fn mark_mine(&mut self, cell: Cell) -> Result<bool> {
        self.check_bounds(cell)?;
        self.transaction(|kb| {
            let changed = kb.assign_mine(cell, &mut ignore)?;
            inference::close(kb, &mut ignore)?;
            Ok(changed)
        })
    }

    /// Marks `cell` as safe everywhere and draws any follow-up conclusions.
    ///
    /// Returns `false` when the cell was already known to be safe.
    pub fn mark_safe(&mut self, cell: Cell) -> Result<bool> {
        self.check_bounds(cell)?;
        self.transaction(|kb| {
            let changed = kb.assign_safe(cell, &mut ignore)?;
            inference::close(kb, &mut ignore)?;
            Ok(changed)
        })
    }

    fn check_bounds(&self, cell: Cell) -> Result<()> {
        if cell.within(self.height, self.width) {
            Ok(())
        } else {
            Err(InferenceError::OutOfBounds(cell))
        }
    }

    /// Runs `update` against a scratch copy and keeps the result only if it
    /// succeeds.
    fn transaction<T>(&mut self, update: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let mut scratch = self.clone();
        let value = update(&mut scratch)?;
        *self = scratch;
        Ok(value)
    }

    /// Turns one revealed count into a sentence over the neighbors still in
    /// doubt.
    fn observe(&mut self, cell: Cell, count: usize, trace: &mut impl FnMut(&Trace<'_>)) -> Result<()> {
        self.moves_made.insert(cell);
        self.assign_safe(cell, trace)?;

        let mut remaining = count as isize;
        let mut unknown = BTreeSet::new();
        for neighbor in cell.neighbors(self.height, self.width) {
            if self.mines.contains(&neighbor) {
                remaining -= 1;
            } else if !self.safes.contains(&neighbor) {
                unknown.insert(neighbor);
            }
        }

        let sentence = Sentence::new(unknown, remaining)?;
        trace(&Trace::Observed {
            cell,
            sentence: &sentence,
        });
        self.insert(sentence);
        Ok(())
    }

    /// Adds a sentence unless an equal one is already known.
    pub(crate) fn insert(&mut self, sentence: Sentence) -> bool {
        if self.sentences.contains(&sentence) {
            return false;
        }
        self.sentences.push(sentence);
        true
    }

    /// Classifies `cell` as a mine and folds it out of every sentence.
    pub(crate) fn assign_mine(&mut self, cell: Cell, trace: &mut impl FnMut(&Trace<'_>)) -> Result<bool> {
        if self.mines.contains(&cell) {
            return Ok(false);
        }
        if self.safes.contains(&cell) {
            return Err(Contradiction::SafeAndMine(cell).into());
        }

        for sentence in &mut self.sentences {
            sentence.mark_mine(cell)?;
        }
        self.mines.insert(cell);
        self.dedup();
        trace(&Trace::Mine(cell));
        Ok(true)
    }

    /// Classifies `cell` as safe and folds it out of every sentence.
    pub(crate) fn assign_safe(&mut self, cell: Cell, trace: &mut impl FnMut(&Trace<'_>)) -> Result<bool> {
        if self.safes.contains(&cell) {
            return Ok(false);
        }
        if self.mines.contains(&cell) {
            return Err(Contradiction::SafeAndMine(cell).into());
        }

        for sentence in &mut self.sentences {
            sentence.mark_safe(cell)?;
        }
        self.safes.insert(cell);
        self.dedup();
        trace(&Trace::Safe(cell));
        Ok(true)
    }

    /// Drops sentences whose cells have all been classified.
    ///
    /// An empty sentence that still owes mines means the observations were
    /// inconsistent.
    pub(crate) fn prune_empty(&mut self) -> Result<()> {
        if let Some(owing) = self.sentences.iter().find(|s| s.is_empty() && s.count() > 0) {
            return Err(Contradiction::EmptySentence {
                count: owing.count(),
            }
            .into());
        }
        self.sentences.retain(|sentence| !sentence.is_empty());
        Ok(())
    }

    // Folding cells out can make two sentences equal.
    fn dedup(&mut self) {
        self.sentences = mem::take(&mut self.sentences).into_iter().unique().collect();
    }
}

impl fmt::Display for KnowledgeBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Knowledge ({})", self.sentences.len())?;
        for sentence in &self.sentences {
            writeln!(f, "{sentence}")?;
        }
        Ok(())
    }
}
