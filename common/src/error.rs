use std::collections::BTreeSet;

use itertools::Itertools;
use thiserror::Error;

use crate::cell::Cell;

/// Errors raised by sentence construction and knowledge base updates.
///
/// Either kind aborts the call that raised it. The knowledge base is left as
/// it was before the call, but reasoning under the offending observation
/// stream cannot safely continue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    /// A sentence was built with a mine count outside `0..=cells.len()`.
    #[error("{count} mines is out of range for the {} cells {}", .cells.len(), fmt_cells(.cells))]
    Constraint { cells: BTreeSet<Cell>, count: isize },

    /// The accumulated knowledge is inconsistent.
    #[error("contradiction: {0}")]
    Contradiction(#[from] Contradiction),

    #[error("cell {0} is off the board")]
    OutOfBounds(Cell),
}

impl InferenceError {
    pub fn is_contradiction(&self) -> bool {
        matches!(self, InferenceError::Contradiction(_))
    }
}

/// The ways an observation stream can turn out to be inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Contradiction {
    /// Every candidate cell was classified but mines were still owed.
    #[error("no cells left to hold {count} remaining mines")]
    EmptySentence { count: usize },

    #[error("cell {0} is both safe and a mine")]
    SafeAndMine(Cell),

    /// Two sentences cover the same cells but disagree on the count.
    #[error("cells {} hold both {left} and {right} mines", fmt_cells(.cells))]
    ConflictingCounts {
        cells: BTreeSet<Cell>,
        left: usize,
        right: usize,
    },

    /// A subset derivation left the difference with an impossible count.
    #[error("cells {} cannot hold {count} mines", fmt_cells(.cells))]
    NegativeDifference { cells: BTreeSet<Cell>, count: isize },
}

fn fmt_cells(cells: &BTreeSet<Cell>) -> String {
    format!("{{{}}}", cells.iter().join(", "))
}

pub type Result<T, E = InferenceError> = std::result::Result<T, E>;
