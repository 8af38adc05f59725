//! Properties of the evaluator stack on generated boards.

use blockfall_engine::{Board, PieceKind};
use blockfall_evaluator::{
    BoardEvaluator as _, HeuristicEvaluator, WeightVector, board_analysis::BoardAnalysis,
    placement::enumerate_placement,
};
use proptest::prelude::*;

const SPAWN_ROWS: usize = 4;

/// Rows of a board, top to bottom; the spawn area is empty and no row is full.
fn rows_strategy() -> impl Strategy<Value = (usize, Vec<Vec<bool>>)> {
    (4usize..=10, 6usize..=16).prop_flat_map(|(width, height)| {
        let row = prop::collection::vec(any::<bool>(), width)
            .prop_map(|mut cells| {
                if cells.iter().all(|c| *c) {
                    cells[0] = false;
                }
                cells
            });
        (
            Just(width),
            prop::collection::vec(row, height - SPAWN_ROWS).prop_map(move |settled| {
                let mut rows = vec![vec![false; width]; SPAWN_ROWS];
                rows.extend(settled);
                rows
            }),
        )
    })
}

fn to_ascii(rows: &[Vec<bool>]) -> String {
    rows.iter()
        .map(|row| row.iter().map(|c| if *c { '#' } else { '.' }).collect::<String>() + "\n")
        .collect()
}

fn kind_strategy() -> impl Strategy<Value = PieceKind> {
    prop::sample::select(PieceKind::ALL.to_vec())
}

proptest! {
    #[test]
    fn placements_never_overlap_settled_cells(
        (_width, rows) in rows_strategy(),
        kind in kind_strategy(),
        target in 0i32..10,
        rotations in 0u8..4,
    ) {
        let mut board = Board::from_ascii(&to_ascii(&rows)).unwrap();
        prop_assume!(board.spawn_piece(kind).is_ok());
        let placement = enumerate_placement(&board, target, rotations);
        let after = placement.board();

        prop_assert_eq!(after.stats().placed_pieces(), 1);
        prop_assert_eq!(after.cells().count(), board.cells().count() + 4);
        for (x, y) in board.cells() {
            prop_assert!(after.is_occupied(x, y));
        }
    }

    #[test]
    fn evaluation_is_pure(
        (_width, rows) in rows_strategy(),
        weights in prop::collection::vec(-50.0f64..50.0, 7),
    ) {
        let board = Board::from_ascii(&to_ascii(&rows)).unwrap();
        let snapshot = board.to_string();
        let evaluator = HeuristicEvaluator::with_default_features(WeightVector::new(weights)).unwrap();
        let first = evaluator.evaluate(&board);
        let second = evaluator.evaluate(&board);
        prop_assert_eq!(first.to_bits(), second.to_bits());
        prop_assert_eq!(board.to_string(), snapshot);
    }

    /// Reveals the board one row at a time from the top, with full rows standing in
    /// for the rows not yet revealed. Each step swaps a full row for a real one, so
    /// cells are removed rather than added; the hole count must still grow row by row.
    #[test]
    fn holes_never_decrease_while_scanning_down((width, rows) in rows_strategy()) {
        let mut previous = 0;
        for scanned in 1..=rows.len() {
            let mut prefix = rows[..scanned].to_vec();
            // full rows below the scanned part contain no holes
            prefix.resize(rows.len(), vec![true; width]);
            let board = Board::from_ascii(&to_ascii(&prefix)).unwrap();
            let holes = BoardAnalysis::from_board(&board).holes();
            prop_assert!(holes >= previous);
            previous = holes;
        }
    }
}
