use std::collections::BTreeSet;

use minesweeper_ai::*;
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

const HEIGHT: usize = 5;
const WIDTH: usize = 5;

fn arb_cell() -> impl Strategy<Value = Cell> {
    (0..HEIGHT, 0..WIDTH).prop_map(Cell::from)
}

fn arb_sentence() -> impl Strategy<Value = Sentence> {
    prop::collection::btree_set(arb_cell(), 0..8).prop_flat_map(|cells| {
        let len = cells.len() as isize;
        (Just(cells), 0..=len).prop_map(|(cells, count)| Sentence::new(cells, count).unwrap())
    })
}

fn arb_layout() -> impl Strategy<Value = BTreeSet<Cell>> {
    prop::collection::btree_set(arb_cell(), 0..8)
}

// -------------------------------------------------------------------------
//  Sentences
// -------------------------------------------------------------------------
proptest! {
    #[test]
    fn marks_keep_count_in_range(
        mut sentence in arb_sentence(),
        marks in prop::collection::vec((arb_cell(), any::<bool>()), 0..12),
    ) {
        for (cell, mine) in marks {
            let before = sentence.clone();
            let result = if mine { sentence.mark_mine(cell) } else { sentence.mark_safe(cell) };
            match result {
                Ok(_) => prop_assert!(sentence.count() <= sentence.len()),
                // A rejected mark leaves the sentence as it was
                Err(_) => prop_assert_eq!(&sentence, &before),
            }
            prop_assert!(!sentence.contains(cell) || result.is_err());
        }
    }

    #[test]
    fn subtraction_is_entailed(
        layout in arb_layout(),
        small in prop::collection::btree_set(arb_cell(), 0..6),
        extra in prop::collection::btree_set(arb_cell(), 1..6),
    ) {
        // Counts taken from a real layout always subtract to the real count
        let large: BTreeSet<Cell> = small.union(&extra).copied().collect();
        prop_assume!(large.len() > small.len());

        let mines_in = |cells: &BTreeSet<Cell>| cells.intersection(&layout).count() as isize;
        let a = Sentence::new(small.iter().copied(), mines_in(&small)).unwrap();
        let b = Sentence::new(large.iter().copied(), mines_in(&large)).unwrap();

        let derived = b.subtract(&a).unwrap().unwrap();
        let rest: BTreeSet<Cell> = large.difference(&small).copied().collect();
        prop_assert_eq!(derived.cells(), &rest);
        prop_assert_eq!(derived.count() as isize, mines_in(&rest));
    }
}

// -------------------------------------------------------------------------
//  Knowledge base
// -------------------------------------------------------------------------
proptest! {
    #[test]
    fn observations_never_contradict_a_real_board(
        layout in arb_layout(),
        plays in prop::collection::vec(arb_cell(), 1..25),
    ) {
        let game = Minesweeper::from_mines(HEIGHT, WIDTH, layout.iter().copied()).unwrap();
        let mut kb = KnowledgeBase::new(HEIGHT, WIDTH);

        for cell in plays.into_iter().filter(|cell| !layout.contains(cell)) {
            let before = kb.clone();
            kb.add_knowledge(cell, usize::from(game.nearby_mines(cell))).unwrap();

            prop_assert!(kb.safes().is_disjoint(kb.mines()));
            prop_assert!(kb.moves_made().is_subset(kb.safes()));
            prop_assert!(before.safes().is_subset(kb.safes()));
            prop_assert!(before.mines().is_subset(kb.mines()));
            prop_assert!(kb.mines().is_subset(&layout));
            prop_assert!(kb.safes().is_disjoint(&layout));
            for sentence in kb.sentences() {
                prop_assert!(!sentence.is_empty());
                prop_assert!(sentence.cells().is_disjoint(kb.safes()));
                prop_assert!(sentence.cells().is_disjoint(kb.mines()));
            }
        }
    }

    #[test]
    fn marking_twice_changes_nothing(
        layout in arb_layout(),
        plays in prop::collection::vec(arb_cell(), 0..10),
        mark in arb_cell(),
    ) {
        let game = Minesweeper::from_mines(HEIGHT, WIDTH, layout.iter().copied()).unwrap();
        let mut kb = KnowledgeBase::new(HEIGHT, WIDTH);
        for cell in plays.into_iter().filter(|cell| !layout.contains(cell)) {
            kb.add_knowledge(cell, usize::from(game.nearby_mines(cell))).unwrap();
        }

        let result = if layout.contains(&mark) { kb.mark_mine(mark) } else { kb.mark_safe(mark) };
        prop_assert!(result.is_ok());
        let snapshot = kb.clone();

        let again = if layout.contains(&mark) { kb.mark_mine(mark) } else { kb.mark_safe(mark) };
        prop_assert_eq!(again, Ok(false));
        prop_assert_eq!(kb, snapshot);
    }

    #[test]
    fn random_moves_avoid_mines_and_played_cells(
        layout in arb_layout(),
        plays in prop::collection::vec(arb_cell(), 0..25),
        seed in any::<u64>(),
    ) {
        let game = Minesweeper::from_mines(HEIGHT, WIDTH, layout.iter().copied()).unwrap();
        let mut kb = KnowledgeBase::new(HEIGHT, WIDTH);
        for cell in plays.into_iter().filter(|cell| !layout.contains(cell)) {
            kb.add_knowledge(cell, usize::from(game.nearby_mines(cell))).unwrap();
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let covered = kb.moves_made().len() + kb.mines().len() == HEIGHT * WIDTH;
        match choose_random_move(&kb, &mut rng) {
            Some(cell) => {
                prop_assert!(!kb.moves_made().contains(&cell));
                prop_assert!(!kb.mines().contains(&cell));
            }
            None => prop_assert!(covered),
        }

        let unplayed_safe = !kb.safes().is_subset(kb.moves_made());
        prop_assert_eq!(choose_safe_move(&kb).is_some(), unplayed_safe);
    }
}
