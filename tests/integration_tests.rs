//! Integration tests for reversi-engine
//!
//! These exercise the public API end to end: board rules on hand-built
//! positions, strategy contracts, and complete games through the driver.

use std::time::Duration;

use reversi_engine::board::{Board, Color, MoveError, Pos};
use reversi_engine::config::{ConfigError, MinimaxConfig, PhaseWeights, Weights};
use reversi_engine::constants::WIN_SCORE;
use reversi_engine::game::{Game, GameError, Outcome, Play, Turn};
use reversi_engine::search::{SearchOptions, Searcher};
use reversi_engine::strategy::{GreedyAI, HumanInput, MinimaxAI, RandomAI, Strategy};

// =============================================================================
// Helper functions for setting up test positions
// =============================================================================

fn p(s: &str) -> Pos {
    s.parse().unwrap()
}

/// Play `moves` in order, alternating colors from Black and passing
/// automatically when the side to move has no legal move.
fn setup_position(moves: &[&str]) -> (Board, Color) {
    let mut board = Board::new();
    let mut color = Color::Black;
    for mv in moves {
        if !board.has_legal_move(color) {
            color = color.opponent();
        }
        board
            .apply_move(p(mv), color)
            .unwrap_or_else(|e| panic!("setup move {mv}: {e}"));
        color = color.opponent();
    }
    (board, color)
}

fn minimax(depth: usize) -> MinimaxAI {
    MinimaxAI::with_depth(depth).unwrap()
}

// =============================================================================
// Board engine
// =============================================================================

#[test]
fn test_standard_opening_has_four_moves() {
    let board = Board::new();
    let moves = board.legal_moves(Color::Black);
    assert_eq!(moves.len(), 4);
    for mv in ["d3", "c4", "f5", "e6"] {
        assert!(moves.contains(&p(mv)), "{mv} should be legal");
    }
}

#[test]
fn test_opening_sequence() {
    // Perpendicular opening
    let (board, to_move) = setup_position(&["f5", "f4", "e3", "f6", "d3"]);
    assert_eq!(to_move, Color::White);
    assert_eq!(board.disc_count(), 9);
    assert_eq!(board.score(), (5, 4));
    // f6 brackets f5 against f4 and e5 against d4
    assert_eq!(board.get(p("f5")), Some(Color::White));
    assert_eq!(board.get(p("e5")), Some(Color::White));
    // d3 takes d4 back
    for sq in ["d3", "e3", "d4", "e4", "d5"] {
        assert_eq!(board.get(p(sq)), Some(Color::Black), "{sq}");
    }
}

#[test]
fn test_illegal_moves_are_rejected_without_change() {
    let (mut board, color) = setup_position(&["d3", "c5"]);
    let before = board.clone();

    assert_eq!(
        board.apply_move(p("a8"), color),
        Err(MoveError::NoCapture {
            pos: p("a8"),
            color
        })
    );
    assert_eq!(board.apply_move(p("d3"), color), Err(MoveError::Occupied(p("d3"))));
    assert_eq!(
        board.apply_move(Pos::new(0, 9), color),
        Err(MoveError::OutOfBounds(Pos::new(0, 9)))
    );
    assert_eq!(board, before);
}

#[test]
fn test_move_changes_counts_exactly() {
    let (mut board, color) = setup_position(&["d3", "c5", "f6"]);
    for mv in board.legal_moves(color) {
        let (own, opp) = (board.count(color), board.count(color.opponent()));
        let capture = board.apply_move(mv, color).unwrap();
        let flipped = capture.flip_count();
        assert_eq!(board.count(color), own + 1 + flipped);
        assert_eq!(board.count(color.opponent()), opp - flipped);
        board.undo(&capture);
    }
}

#[test]
fn test_both_colors_stuck_is_terminal() {
    // Empty cells remain but neither side can capture anything
    let board = Board::from_rows(&[
        "XXXXXXXX",
        "XXXXXXXX",
        "XXXXXXXX",
        "XXXXXXXX",
        "........",
        "OOOOOOOO",
        "OOOOOOOO",
        "OOOOOOOO",
    ])
    .unwrap();
    assert!(!board.is_full());
    assert!(board.legal_moves(Color::Black).is_empty());
    assert!(board.legal_moves(Color::White).is_empty());
    assert!(board.is_terminal());
    assert_eq!(Outcome::of(&board), Outcome::Winner(Color::Black));
}

#[test]
fn test_full_board_tie() {
    let rows: Vec<String> = (0..8)
        .map(|r| if r % 2 == 0 { "XXXXXXXX" } else { "OOOOOOOO" }.to_string())
        .collect();
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    let board = Board::from_rows(&rows).unwrap();
    assert!(board.is_terminal());
    assert_eq!(board.score(), (32, 32));
    assert_eq!(Outcome::of(&board), Outcome::Tie);
}

#[test]
fn test_other_board_sizes() {
    for size in [4, 6, 10, 12] {
        let board = Board::with_size(size).unwrap();
        assert_eq!(board.legal_moves(Color::Black).len(), 4, "size {size}");
        assert_eq!(board.corners()[3], Pos::new(size - 1, size - 1));
    }
    assert_eq!(Board::with_size(7), Err(ConfigError::InvalidBoardSize(7)));
}

// =============================================================================
// Strategies
// =============================================================================

#[test]
fn test_minimax_configuration_errors() {
    assert_eq!(
        MinimaxAI::new(MinimaxConfig::new(0)).unwrap_err(),
        ConfigError::InvalidDepth(0)
    );
    let bad = PhaseWeights::uniform(Weights::new(f64::INFINITY, 1.0, 1.0));
    assert!(matches!(
        MinimaxAI::new(MinimaxConfig::new(2).with_weights(bad)),
        Err(ConfigError::InvalidWeight {
            name: "positional",
            ..
        })
    ));
}

#[test]
fn test_depth_one_material_minimax_agrees_with_greedy() {
    let material_only = PhaseWeights::uniform(Weights::new(0.0, 1.0, 0.0));
    let mut ai = MinimaxAI::new(MinimaxConfig::new(1).with_weights(material_only)).unwrap();
    let (board, color) = setup_position(&["f5", "d6", "c3", "d3", "c4", "f4", "f6"]);
    assert_eq!(
        ai.choose_move(&board, color),
        GreedyAI.choose_move(&board, color)
    );
}

#[test]
fn test_minimax_sees_past_greedy_in_endgame() {
    // Four empties, White has no move. Greedy takes a2 (seven discs, first
    // in row-major order) for a two-disc win; b8 flips as many and wins 40-24.
    let board = Board::from_rows(&[
        ".OOOOXXX",
        ".OOOOOOX",
        "XOXOOOXX",
        "XOXXXXOX",
        "XOXOXXOO",
        "XOOOOOOO",
        "XOOOOOXX",
        "..OOOOOX",
    ])
    .unwrap();
    assert!(board.legal_moves(Color::White).is_empty());
    assert_eq!(GreedyAI.choose_move(&board, Color::Black), Some(p("a2")));

    // Deep enough that every line ends on a terminal board
    let mut ai = minimax(8);
    assert_eq!(ai.choose_move(&board, Color::White), None);
    assert_eq!(ai.choose_move(&board, Color::Black), Some(p("b8")));
    assert_eq!(ai.last_result().unwrap().score, WIN_SCORE + 16.0);
}

#[test]
fn test_time_budget_returns_a_legal_move() {
    let config = MinimaxConfig::new(12).with_time_budget(Duration::from_millis(50));
    let mut ai = MinimaxAI::new(config).unwrap();
    let (board, color) = setup_position(&["d3", "c5", "f6", "f5"]);
    let mv = ai.choose_move(&board, color).unwrap();
    assert!(board.is_legal(mv, color));
    assert!(ai.last_result().unwrap().depth < 12);
}

#[test]
fn test_searcher_pruning_equivalence_midgame() {
    let (board, color) = setup_position(&[
        "f5", "d6", "c3", "d3", "c4", "f4", "f6", "f3", "e6", "e7",
    ]);
    let eval = reversi_engine::eval::Evaluator::default();
    for depth in 1..=4 {
        let pruned = Searcher::new(&eval, SearchOptions::new(depth)).search(&board, color);
        let plain = Searcher::new(
            &eval,
            SearchOptions {
                pruning: false,
                ..SearchOptions::new(depth)
            },
        )
        .search(&board, color);
        assert_eq!(pruned.best_move, plain.best_move, "depth {depth}");
        assert_eq!(pruned.score, plain.score, "depth {depth}");
    }
}

// =============================================================================
// Game driver
// =============================================================================

#[test]
fn test_driver_pass_does_not_touch_board() {
    // Black has nothing to flip; White can still play h8
    let board = Board::from_rows(&[
        "OOOOOOOO",
        "OOOOOOOO",
        "OOOOOOOO",
        "OOOOOOOO",
        "OOOOOOOO",
        "OOOOOOOO",
        "OOOOOOOX",
        "OOOOOOX.",
    ])
    .unwrap();
    let mut game = Game::new(
        board.clone(),
        Strategy::Greedy(GreedyAI),
        Strategy::Greedy(GreedyAI),
    );
    assert_eq!(game.step(), Ok(Turn::Passed(Color::Black)));
    assert_eq!(game.board(), &board);
    assert_eq!(game.to_move(), Color::White);
    assert!(matches!(game.step(), Ok(Turn::Moved(_))));
    assert_eq!(game.step(), Ok(Turn::Finished(Outcome::Winner(Color::White))));
    assert_eq!(game.plays()[0], Play::Pass(Color::Black));
}

#[test]
fn test_minimax_vs_random_full_game() {
    let mut game = Game::new(
        Board::new(),
        Strategy::Minimax(minimax(2)),
        Strategy::Random(RandomAI::with_seed(2024)),
    );
    let record = game.play().unwrap();
    assert!(game.board().is_terminal());
    assert_eq!(record.outcome, Outcome::of(game.board()));
    assert_eq!(record.black + record.white, game.board().disc_count());
}

#[test]
fn test_small_board_minimax_selfplay() {
    let mut game = Game::new(
        Board::with_size(6).unwrap(),
        Strategy::Minimax(minimax(3)),
        Strategy::Minimax(minimax(2)),
    );
    let record = game.play().unwrap();
    assert!(game.board().is_terminal());
    assert!(record.move_count() <= 32);
}

#[test]
fn test_same_seeds_same_game() {
    let play = |seed: u64| {
        Game::new(
            Board::new(),
            Strategy::Random(RandomAI::with_seed(seed)),
            Strategy::Random(RandomAI::with_seed(seed + 1)),
        )
        .play()
        .unwrap()
    };
    let a = play(99);
    let b = play(99);
    assert_eq!(a.plays, b.plays);
    assert_eq!(a.outcome, b.outcome);
}

#[test]
fn test_human_source_contract_violation() {
    let mut game = Game::new(
        Board::new(),
        Strategy::Human(HumanInput::new(|_, _| Some(Pos::new(3, 3)))),
        Strategy::Greedy(GreedyAI),
    );
    assert_eq!(
        game.step(),
        Err(GameError::IllegalMove(MoveError::Occupied(Pos::new(3, 3))))
    );
}
