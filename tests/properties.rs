//! Property tests over positions reached by seeded random playouts.

use proptest::prelude::*;

use reversi_engine::board::{Board, Color, Pos};
use reversi_engine::config::{MinimaxConfig, PhaseWeights, Weights};
use reversi_engine::eval::Evaluator;
use reversi_engine::search::{SearchOptions, Searcher};
use reversi_engine::strategy::{GreedyAI, MinimaxAI, RandomAI};

/// Play up to `plies` random moves from the start, passing when stuck.
/// Returns the board and the color to move.
fn playout(seed: u64, plies: usize) -> (Board, Color) {
    let mut board = Board::new();
    let mut color = Color::Black;
    let mut ai = RandomAI::with_seed(seed);
    for _ in 0..plies {
        if board.is_terminal() {
            break;
        }
        if let Some(mv) = ai.choose_move(&board, color) {
            board.apply_move(mv, color).unwrap();
        }
        color = color.opponent();
    }
    (board, color)
}

fn all_cells(size: usize) -> impl Iterator<Item = Pos> {
    (0..size).flat_map(move |row| (0..size).map(move |col| Pos::new(row, col)))
}

proptest! {
    #[test]
    fn prop_legal_moves_are_empty_capturing_cells((seed, plies) in (any::<u64>(), 0usize..60)) {
        let (board, color) = playout(seed, plies);
        let legal = board.legal_moves(color);
        for pos in all_cells(board.size()) {
            let expected = board.get(pos).is_none() && board.flip_count(pos, color) > 0;
            prop_assert_eq!(legal.contains(&pos), expected, "{}", pos);
        }
    }

    #[test]
    fn prop_move_counts_and_undo((seed, plies) in (any::<u64>(), 0usize..60)) {
        let (mut board, color) = playout(seed, plies);
        let before = board.clone();
        for mv in board.legal_moves(color) {
            let own = board.count(color);
            let opp = board.count(color.opponent());
            let capture = board.apply_move(mv, color).unwrap();
            prop_assert!(capture.flip_count() >= 1);
            prop_assert_eq!(board.count(color), own + 1 + capture.flip_count());
            prop_assert_eq!(board.count(color.opponent()), opp - capture.flip_count());
            board.undo(&capture);
            prop_assert_eq!(&board, &before);
        }
    }

    #[test]
    fn prop_illegal_moves_leave_board_unchanged((seed, plies) in (any::<u64>(), 0usize..60)) {
        let (mut board, color) = playout(seed, plies);
        let before = board.clone();
        let legal = board.legal_moves(color);
        for pos in all_cells(board.size()).filter(|pos| !legal.contains(pos)) {
            prop_assert!(board.apply_move(pos, color).is_err());
        }
        prop_assert_eq!(board, before);
    }

    #[test]
    fn prop_evaluation_is_antisymmetric((seed, plies) in (any::<u64>(), 0usize..60)) {
        let (board, color) = playout(seed, plies);
        let eval = Evaluator::default();
        prop_assert_eq!(
            eval.evaluate(&board, color),
            -eval.evaluate(&board, color.opponent())
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_pruning_matches_plain_minimax(
        (seed, plies, depth) in (any::<u64>(), 4usize..40, 1usize..=3)
    ) {
        let (board, color) = playout(seed, plies);
        let eval = Evaluator::default();
        let pruned = Searcher::new(&eval, SearchOptions::new(depth)).search(&board, color);
        let plain = Searcher::new(
            &eval,
            SearchOptions { pruning: false, ..SearchOptions::new(depth) },
        )
        .search(&board, color);
        prop_assert_eq!(pruned.best_move, plain.best_move);
        prop_assert_eq!(pruned.score, plain.score);
        prop_assert!(pruned.nodes <= plain.nodes);
    }

    #[test]
    fn prop_material_depth_one_is_greedy((seed, plies) in (any::<u64>(), 0usize..50)) {
        let (board, color) = playout(seed, plies);
        // A move that ends the game is scored exactly, not by disc count
        prop_assume!(board.legal_moves(color).into_iter().all(|mv| {
            let mut next = board.clone();
            next.apply_move(mv, color).is_ok() && !next.is_terminal()
        }));

        let material_only = PhaseWeights::uniform(Weights::new(0.0, 1.0, 0.0));
        let mut ai = MinimaxAI::new(MinimaxConfig::new(1).with_weights(material_only)).unwrap();
        prop_assert_eq!(ai.choose_move(&board, color), GreedyAI.choose_move(&board, color));
    }
}
