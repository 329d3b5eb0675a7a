//! A knowledge-based minesweeper player.
//!
//! The agent keeps a [`KnowledgeBase`] of sentences, each saying how many of a
//! set of cells are mines. Every revealed count adds a sentence, and the
//! knowledge base is then closed under subset resolution until no further
//! cell can be proven safe or mined. The move selector plays proven-safe
//! cells first and guesses uniformly otherwise.
//!
//! ```
//! use minesweeper_ai::{Cell, KnowledgeBase, choose_safe_move};
//!
//! let mut kb = KnowledgeBase::new(3, 3);
//! kb.add_knowledge(Cell::new(0, 0), 0).unwrap();
//! assert!(kb.safes().contains(&Cell::new(1, 1)));
//! assert!(choose_safe_move(&kb).is_some());
//! ```

pub mod cell;
pub mod error;
pub mod game;
pub mod inference;
pub mod knowledge;
pub mod moves;
pub mod sentence;

pub use cell::Cell;
pub use error::{Contradiction, InferenceError};
pub use game::{Minesweeper, Reveal};
pub use inference::{Trace, derive_pass};
pub use knowledge::KnowledgeBase;
pub use moves::{Move, MoveKind, choose_random_move, choose_safe_move, next_move};
pub use sentence::Sentence;
