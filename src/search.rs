//! Minimax search with alpha-beta pruning.
//!
//! The search uses the negamax formulation: every node scores the position
//! from the side to move, and a child's score is negated on the way up.
//! This works because [`Evaluator::evaluate`] is antisymmetric.
//!
//! # Features
//!
//! - Mutate-and-undo: one scratch board per search, moves are applied and
//!   reversed through their [`crate::board::Capture`] records
//! - Pass handling: a side without moves passes, which costs one ply; two
//!   consecutive passes end the game and the node returns the exact outcome
//! - Optional pruning switch so plain minimax can be compared against
//!   alpha-beta
//! - Iterative deepening under a time budget, keeping the deepest completed
//!   iteration
//! - Optional root split across scoped worker threads, each on its own
//!   board copy

use std::borrow::Cow;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, trace, warn};

use crate::board::{Board, Color, Pos};
use crate::config::MinimaxConfig;
use crate::constants::INF;
use crate::eval::{Evaluator, terminal_score};

/// Knobs for one search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    /// Depth in plies
    pub depth: usize,
    /// Alpha-beta cutoffs; off means plain minimax
    pub pruning: bool,
    pub time_budget: Option<Duration>,
    /// Root-split workers (1 = serial)
    pub threads: usize,
}

impl SearchOptions {
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            pruning: true,
            time_budget: None,
            threads: 1,
        }
    }
}

impl From<&MinimaxConfig> for SearchOptions {
    fn from(config: &MinimaxConfig) -> Self {
        Self {
            depth: config.depth,
            pruning: config.pruning,
            time_budget: config.time_budget,
            threads: config.threads,
        }
    }
}

/// Search result containing the best move found and associated statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Best move found; `None` only when the side to move has no legal move
    pub best_move: Option<Pos>,
    /// Score of `best_move` from the mover's point of view. When `depth` is
    /// 0 (no legal move, or the budget ran out before depth 1) this is the
    /// static evaluation of the root position instead.
    pub score: f64,
    /// Deepest fully searched depth (0 if the budget ran out before depth 1)
    pub depth: usize,
    /// Nodes visited, including interrupted iterations
    pub nodes: u64,
    pub elapsed: Duration,
}

/// Raised when the deadline passes mid-search; unwinds to the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Timeout;

pub struct Searcher<'a> {
    eval: Cow<'a, Evaluator>,
    options: SearchOptions,
    nodes: u64,
    deadline: Option<Instant>,
}

impl<'a> Searcher<'a> {
    pub fn new(eval: &'a Evaluator, options: SearchOptions) -> Self {
        Self {
            eval: Cow::Borrowed(eval),
            options,
            nodes: 0,
            deadline: None,
        }
    }

    /// Find the best move for `color` on `board`.
    ///
    /// Without a time budget this runs a single search at the configured
    /// depth. With one it deepens from 1 and keeps the last iteration that
    /// finished before the deadline.
    pub fn search(&mut self, board: &Board, color: Color) -> SearchResult {
        let start = Instant::now();
        self.nodes = 0;
        self.deadline = self.options.time_budget.map(|budget| start + budget);
        if self.eval.table_size() != board.size() {
            debug!("sizing evaluator for {}x{} board", board.size(), board.size());
            self.eval.to_mut().resize(board.size());
        }

        let moves = board.legal_moves(color);
        let mut result = SearchResult {
            best_move: moves.first().copied(),
            score: self.eval.evaluate(board, color),
            depth: 0,
            nodes: 0,
            elapsed: Duration::ZERO,
        };
        if moves.is_empty() {
            result.elapsed = start.elapsed();
            return result;
        }

        let first = if self.deadline.is_some() {
            1
        } else {
            self.options.depth
        };
        for depth in first..=self.options.depth {
            match self.search_root(board, color, &moves, depth) {
                Ok((best, score)) => {
                    trace!(
                        "depth {depth}: {best} scores {score:.2} after {} nodes",
                        self.nodes
                    );
                    result.best_move = Some(best);
                    result.score = score;
                    result.depth = depth;
                }
                Err(Timeout) => {
                    warn!(
                        "time budget hit during depth {depth}, keeping depth {} result",
                        result.depth
                    );
                    break;
                }
            }
        }

        result.nodes = self.nodes;
        result.elapsed = start.elapsed();
        result
    }

    /// Score every root move and keep the first one with the highest score.
    fn search_root(
        &mut self,
        board: &Board,
        color: Color,
        moves: &[Pos],
        depth: usize,
    ) -> Result<(Pos, f64), Timeout> {
        if self.options.threads > 1 && moves.len() > 1 {
            return self.search_root_parallel(board, color, moves, depth);
        }

        let mut scratch = board.clone();
        let mut best = (moves[0], -INF);
        let mut alpha = -INF;

        for &mv in moves {
            let capture = scratch.play_legal(mv, color);
            let score = self
                .negamax(&mut scratch, color.opponent(), depth - 1, -INF, -alpha)
                .map(|s| -s);
            scratch.undo(&capture);
            let score = score?;

            if score > best.1 {
                best = (mv, score);
            }
            if self.options.pruning {
                alpha = alpha.max(score);
            }
        }
        Ok(best)
    }

    /// Root split: moves are dealt round-robin to workers, each searching
    /// its own board clone with a full window. Merging in move order keeps
    /// the decision identical to the serial search.
    fn search_root_parallel(
        &mut self,
        board: &Board,
        color: Color,
        moves: &[Pos],
        depth: usize,
    ) -> Result<(Pos, f64), Timeout> {
        let workers = self.options.threads.min(moves.len());
        let eval: &Evaluator = &self.eval;
        let options = self.options;
        let deadline = self.deadline;

        let outcomes: Vec<(Vec<(usize, Result<f64, Timeout>)>, u64)> = thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|worker| {
                    scope.spawn(move || {
                        let mut searcher = Searcher {
                            eval: Cow::Borrowed(eval),
                            options,
                            nodes: 0,
                            deadline,
                        };
                        let mut scratch = board.clone();
                        let mut scores = Vec::new();
                        for (i, &mv) in moves.iter().enumerate().skip(worker).step_by(workers) {
                            let capture = scratch.play_legal(mv, color);
                            let score = searcher
                                .negamax(&mut scratch, color.opponent(), depth - 1, -INF, INF)
                                .map(|s| -s);
                            scratch.undo(&capture);
                            let timed_out = score.is_err();
                            scores.push((i, score));
                            if timed_out {
                                break;
                            }
                        }
                        (scores, searcher.nodes)
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect()
        });

        let mut scored: Vec<(usize, f64)> = Vec::with_capacity(moves.len());
        let mut timed_out = false;
        for (scores, nodes) in outcomes {
            self.nodes += nodes;
            for (i, score) in scores {
                match score {
                    Ok(s) => scored.push((i, s)),
                    Err(Timeout) => timed_out = true,
                }
            }
        }
        if timed_out {
            return Err(Timeout);
        }

        scored.sort_by_key(|&(i, _)| i);
        let mut best = (moves[0], -INF);
        for (i, score) in scored {
            if score > best.1 {
                best = (moves[i], score);
            }
        }
        Ok(best)
    }

    /// Negamax with an [alpha, beta] window, fail-soft.
    ///
    /// The board is restored to its entry state before returning, including
    /// on timeout.
    fn negamax(
        &mut self,
        board: &mut Board,
        color: Color,
        depth: usize,
        mut alpha: f64,
        beta: f64,
    ) -> Result<f64, Timeout> {
        self.nodes += 1;
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(Timeout);
            }
        }

        if depth == 0 {
            return Ok(self.eval.evaluate(board, color));
        }

        let moves = board.legal_moves(color);
        if moves.is_empty() {
            if !board.has_legal_move(color.opponent()) {
                return Ok(terminal_score(board, color));
            }
            // Pass: same board, other side, one ply used
            return self
                .negamax(board, color.opponent(), depth - 1, -beta, -alpha)
                .map(|s| -s);
        }

        let mut best = -INF;
        for mv in moves {
            let capture = board.play_legal(mv, color);
            let score = self
                .negamax(board, color.opponent(), depth - 1, -beta, -alpha)
                .map(|s| -s);
            board.undo(&capture);
            let score = score?;

            best = best.max(score);
            if self.options.pruning {
                alpha = alpha.max(score);
                if alpha >= beta {
                    break;
                }
            }
        }
        Ok(best)
    }
}
