//! Move-choosing strategies.
//!
//! The set of strategies is closed: [`Strategy`] is an enum over the four
//! kinds of player the engine knows about. Each one answers the same
//! question, "given this board and this color, which move?", and answers
//! `None` only when the color has no legal move.

use std::fmt;

use log::debug;

use crate::board::{Board, Color, Pos};
use crate::config::{ConfigError, MinimaxConfig};
use crate::eval::Evaluator;
use crate::search::{SearchOptions, SearchResult, Searcher};

/// Uniformly random legal moves.
#[derive(Debug, Clone)]
pub struct RandomAI {
    rng: fastrand::Rng,
}

impl Default for RandomAI {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomAI {
    /// Seeded from system entropy.
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    /// Same seed, same sequence of choices.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    pub fn choose_move(&mut self, board: &Board, color: Color) -> Option<Pos> {
        let moves = board.legal_moves(color);
        if moves.is_empty() {
            return None;
        }
        Some(moves[self.rng.usize(..moves.len())])
    }
}

/// Plays the move that flips the most discs, first in row-major order on ties.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyAI;

impl GreedyAI {
    pub fn choose_move(&self, board: &Board, color: Color) -> Option<Pos> {
        let mut best: Option<(Pos, usize)> = None;
        for mv in board.legal_moves(color) {
            let flips = board.flip_count(mv, color);
            if best.is_none_or(|(_, most)| flips > most) {
                best = Some((mv, flips));
            }
        }
        best.map(|(mv, _)| mv)
    }
}

/// Depth-limited alpha-beta search over the weighted evaluator.
#[derive(Debug, Clone)]
pub struct MinimaxAI {
    config: MinimaxConfig,
    eval: Evaluator,
    last: Option<SearchResult>,
}

impl MinimaxAI {
    /// # Errors
    /// Returns [`ConfigError`] for a zero depth, zero threads, non-finite
    /// weights, or unordered phase bounds.
    pub fn new(config: MinimaxConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let eval = Evaluator::new(config.weights, config.squares);
        Ok(Self {
            config,
            eval,
            last: None,
        })
    }

    pub fn with_depth(depth: usize) -> Result<Self, ConfigError> {
        Self::new(MinimaxConfig::new(depth))
    }

    pub fn config(&self) -> &MinimaxConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.eval
    }

    /// Statistics from the most recent search.
    pub fn last_result(&self) -> Option<&SearchResult> {
        self.last.as_ref()
    }

    pub fn choose_move(&mut self, board: &Board, color: Color) -> Option<Pos> {
        if !board.has_legal_move(color) {
            return None;
        }
        self.eval.resize(board.size());

        let result =
            Searcher::new(&self.eval, SearchOptions::from(&self.config)).search(board, color);
        debug!(
            "minimax {color}: {} score {:.2} depth {} nodes {} in {:?}",
            result.best_move.map(|mv| mv.to_string()).unwrap_or_default(),
            result.score,
            result.depth,
            result.nodes,
            result.elapsed
        );
        let best = result.best_move;
        self.last = Some(result);
        best
    }
}

/// Externally supplied move source, e.g. a person at a terminal or a GUI.
pub struct HumanInput {
    source: Box<dyn FnMut(&Board, Color) -> Option<Pos> + Send>,
}

impl HumanInput {
    pub fn new(source: impl FnMut(&Board, Color) -> Option<Pos> + Send + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    pub fn choose_move(&mut self, board: &Board, color: Color) -> Option<Pos> {
        if !board.has_legal_move(color) {
            return None;
        }
        (self.source)(board, color)
    }
}

impl fmt::Debug for HumanInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HumanInput")
    }
}

/// Every kind of player the engine can seat.
#[derive(Debug)]
pub enum Strategy {
    Random(RandomAI),
    Greedy(GreedyAI),
    Minimax(MinimaxAI),
    Human(HumanInput),
}

impl Strategy {
    /// Pick a move for `color`. `None` means `color` has no legal move and
    /// must pass.
    pub fn choose_move(&mut self, board: &Board, color: Color) -> Option<Pos> {
        match self {
            Strategy::Random(ai) => ai.choose_move(board, color),
            Strategy::Greedy(ai) => ai.choose_move(board, color),
            Strategy::Minimax(ai) => ai.choose_move(board, color),
            Strategy::Human(input) => input.choose_move(board, color),
        }
    }

    pub fn name(&self) -> String {
        match self {
            Strategy::Random(_) => "random".to_string(),
            Strategy::Greedy(_) => "greedy".to_string(),
            Strategy::Minimax(ai) => format!("minimax(d={})", ai.config().depth),
            Strategy::Human(_) => "human".to_string(),
        }
    }

    /// Build an AI strategy by kind. `config` is only used for minimax and
    /// `seed` only for random.
    pub fn from_kind(
        kind: StrategyKind,
        config: &MinimaxConfig,
        seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        Ok(match kind {
            StrategyKind::Random => Strategy::Random(match seed {
                Some(seed) => RandomAI::with_seed(seed),
                None => RandomAI::new(),
            }),
            StrategyKind::Greedy => Strategy::Greedy(GreedyAI),
            StrategyKind::Minimax => Strategy::Minimax(MinimaxAI::new(config.clone())?),
        })
    }
}

/// Names of the built-in AI strategies.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StrategyKind {
    Random,
    Greedy,
    Minimax,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_is_reproducible() {
        let board = Board::new();
        let mut a = RandomAI::with_seed(7);
        let mut b = RandomAI::with_seed(7);
        for _ in 0..20 {
            assert_eq!(
                a.choose_move(&board, Color::Black),
                b.choose_move(&board, Color::Black)
            );
        }
    }

    #[test]
    fn test_random_picks_legal_moves() {
        let board = Board::new();
        let legal = board.legal_moves(Color::White);
        let mut ai = RandomAI::with_seed(1);
        for _ in 0..50 {
            let mv = ai.choose_move(&board, Color::White).unwrap();
            assert!(legal.contains(&mv));
        }
    }

    #[test]
    fn test_no_moves_means_none() {
        let board = Board::from_rows(&["XXXX", "XXXX", "XXXX", "OOO."]).unwrap();
        assert_eq!(RandomAI::with_seed(3).choose_move(&board, Color::White), None);
        assert_eq!(GreedyAI.choose_move(&board, Color::White), None);
        let mut minimax = MinimaxAI::with_depth(2).unwrap();
        assert_eq!(minimax.choose_move(&board, Color::White), None);
        let mut human = HumanInput::new(|_, _| Some(Pos::new(3, 3)));
        assert_eq!(human.choose_move(&board, Color::White), None);
    }

    #[test]
    fn test_greedy_takes_largest_capture() {
        let board = Board::from_rows(&[
            "........",
            "........",
            "..XOOO..",
            "...OX...",
            "...XO...",
            "........",
            "........",
            "........",
        ])
        .unwrap();
        // g3 flips d3, e3, f3
        assert_eq!(GreedyAI.choose_move(&board, Color::Black), Some(Pos::new(2, 6)));
    }

    #[test]
    fn test_greedy_breaks_ties_row_major() {
        // Every opening move flips one disc; d3 comes first
        assert_eq!(
            GreedyAI.choose_move(&Board::new(), Color::Black),
            Some(Pos::new(2, 3))
        );
    }

    #[test]
    fn test_minimax_rejects_zero_depth() {
        assert_eq!(
            MinimaxAI::with_depth(0).unwrap_err(),
            ConfigError::InvalidDepth(0)
        );
    }

    #[test]
    fn test_minimax_records_last_result() {
        let mut ai = MinimaxAI::with_depth(2).unwrap();
        let mv = ai.choose_move(&Board::new(), Color::Black);
        let last = ai.last_result().unwrap();
        assert_eq!(last.best_move, mv);
        assert_eq!(last.depth, 2);
    }

    #[test]
    fn test_minimax_on_small_board() {
        let board = Board::with_size(6).unwrap();
        let mut ai = MinimaxAI::with_depth(3).unwrap();
        let mv = ai.choose_move(&board, Color::Black).unwrap();
        assert!(board.legal_moves(Color::Black).contains(&mv));
    }

    #[test]
    fn test_strategy_dispatch() {
        let config = MinimaxConfig::new(1);
        let board = Board::new();
        for kind in [
            StrategyKind::Random,
            StrategyKind::Greedy,
            StrategyKind::Minimax,
        ] {
            let mut strategy = Strategy::from_kind(kind, &config, Some(5)).unwrap();
            let mv = strategy.choose_move(&board, Color::Black).unwrap();
            assert!(board.is_legal(mv, Color::Black), "{}", strategy.name());
        }
    }
}
