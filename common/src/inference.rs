//! Closing a knowledge base under subset resolution.
//!
//! One pass compares every pair of open sentences. Whenever one sentence's
//! cells are a strict subset of another's, the difference becomes a new
//! sentence: `B \ A` holds exactly `count(B) - count(A)` mines. After the
//! pass, every sentence that is now fully determined is folded into the
//! global safe and mine sets, which shrinks every other sentence in turn.
//! Passes repeat until one adds nothing.
//!
//! The loop terminates because each pass either adds a sentence that was not
//! known before (there are finitely many over the cells still in doubt) or
//! classifies at least one more cell (there are finitely many cells).

use std::collections::BTreeSet;
use std::fmt;

use itertools::Itertools;

use crate::cell::Cell;
use crate::error::{Contradiction, Result};
use crate::knowledge::KnowledgeBase;
use crate::sentence::Sentence;

/// A single step of the deduction, reported to an optional trace hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trace<'a> {
    /// A revealed count became a sentence over the unknown neighbors.
    Observed { cell: Cell, sentence: &'a Sentence },
    /// Subset resolution produced a sentence that was not known yet.
    Derived(&'a Sentence),
    Safe(Cell),
    Mine(Cell),
    /// A full pass finished.
    Pass {
        index: usize,
        derived: usize,
        folded: usize,
    },
}

impl fmt::Display for Trace<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trace::Observed { cell, sentence } => write!(f, "observed {cell}: {sentence}"),
            Trace::Derived(sentence) => write!(f, "inferred {sentence}"),
            Trace::Safe(cell) => write!(f, "safe {cell}"),
            Trace::Mine(cell) => write!(f, "mine {cell}"),
            Trace::Pass {
                index,
                derived,
                folded,
            } => write!(f, "pass {index}: {derived} new sentences, {folded} cells classified"),
        }
    }
}

/// A trace hook that discards everything.
pub fn ignore(_: &Trace<'_>) {}

/// Runs inference passes until nothing new can be learned.
pub(crate) fn close(kb: &mut KnowledgeBase, trace: &mut impl FnMut(&Trace<'_>)) -> Result<()> {
    let mut index = 0;
    loop {
        kb.prune_empty()?;

        let mut derived = 0;
        for sentence in derive_pass(kb.sentences())? {
            trace(&Trace::Derived(&sentence));
            if kb.insert(sentence) {
                derived += 1;
            }
        }

        let folded = fold_determined(kb, trace)?;
        trace(&Trace::Pass {
            index,
            derived,
            folded,
        });

        if derived == 0 && folded == 0 {
            return Ok(());
        }
        index += 1;
    }
}

/// One pass of subset resolution over every pair of sentences.
///
/// Returns the sentences that follow from some pair but are not among
/// `sentences` yet, without duplicates. An empty result means the pass made
/// no progress.
pub fn derive_pass(sentences: &[Sentence]) -> Result<Vec<Sentence>, Contradiction> {
    let mut derived: Vec<Sentence> = Vec::new();

    for (a, b) in sentences.iter().tuple_combinations() {
        if a.cells() == b.cells() {
            if a.count() != b.count() {
                return Err(Contradiction::ConflictingCounts {
                    cells: a.cells().clone(),
                    left: a.count(),
                    right: b.count(),
                });
            }
            continue;
        }

        let inferred = match b.subtract(a)? {
            Some(sentence) => Some(sentence),
            None => a.subtract(b)?,
        };

        if let Some(sentence) = inferred {
            if !sentences.contains(&sentence) && !derived.contains(&sentence) {
                derived.push(sentence);
            }
        }
    }

    Ok(derived)
}

/// Moves the cells of every determined sentence into the global safe and
/// mine sets. Returns how many cells were newly classified.
fn fold_determined(kb: &mut KnowledgeBase, trace: &mut impl FnMut(&Trace<'_>)) -> Result<usize> {
    let mut mines = BTreeSet::new();
    let mut safes = BTreeSet::new();
    for sentence in kb.sentences() {
        if let Some(cells) = sentence.known_mines() {
            mines.extend(cells.iter().copied());
        }
        if let Some(cells) = sentence.known_safes() {
            safes.extend(cells.iter().copied());
        }
    }

    let mut folded = 0;
    for cell in mines {
        if kb.assign_mine(cell, trace)? {
            folded += 1;
        }
    }
    for cell in safes {
        if kb.assign_safe(cell, trace)? {
            folded += 1;
        }
    }
    Ok(folded)
}
