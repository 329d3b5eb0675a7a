use rand::Rng;
use rand::seq::IndexedRandom;

use crate::cell::Cell;
use crate::knowledge::KnowledgeBase;

/// Why a move was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// The cell is proven safe.
    Safe,
    /// No safe cell was known, so this is a guess.
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub cell: Cell,
    pub kind: MoveKind,
}

/// A cell proven safe that has not been played yet.
pub fn choose_safe_move(kb: &KnowledgeBase) -> Option<Cell> {
    kb.safes().difference(kb.moves_made()).next().copied()
}

/// A uniformly random cell that is neither played nor a known mine.
pub fn choose_random_move(kb: &KnowledgeBase, rng: &mut impl Rng) -> Option<Cell> {
    let candidates: Vec<Cell> = kb
        .cells()
        .filter(|cell| !kb.moves_made().contains(cell) && !kb.mines().contains(cell))
        .collect();
    candidates.choose(rng).copied()
}

/// Prefers a safe move and guesses only when there is none.
pub fn next_move(kb: &KnowledgeBase, rng: &mut impl Rng) -> Option<Move> {
    if let Some(cell) = choose_safe_move(kb) {
        return Some(Move {
            cell,
            kind: MoveKind::Safe,
        });
    }
    choose_random_move(kb, rng).map(|cell| Move {
        cell,
        kind: MoveKind::Random,
    })
}
