//! Static evaluation of Othello positions.
//!
//! A position is scored from one color's point of view as a weighted sum of
//! three factors:
//! - positional: per-cell table values of own discs minus the opponent's
//! - material: own disc count minus the opponent's
//! - mobility: own legal-move count minus the opponent's
//!
//! The weight triple is looked up by [`GamePhase`] in a [`PhaseWeights`]
//! policy table. Every factor is antisymmetric, so
//! `evaluate(b, c) == -evaluate(b, c.opponent())`, which the negamax search
//! relies on.
//!
//! Positions where neither side can move are scored exactly from the final
//! disc differential, offset by [`WIN_SCORE`] so a decided game always
//! outranks any heuristic estimate.

use std::borrow::Cow;
use std::fmt;

use crate::board::{Board, Color, Pos};
use crate::config::{PhaseWeights, SquareValues, Weights};
use crate::constants::{DEFAULT_SIZE, WIN_SCORE};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GamePhase {
    Early,
    Mid,
    Late,
}

impl GamePhase {
    /// Fraction of the board covered by discs.
    pub fn progress(board: &Board) -> f64 {
        let cells = board.size() * board.size();
        board.disc_count() as f64 / cells as f64
    }

    pub fn of(board: &Board, weights: &PhaseWeights) -> GamePhase {
        let progress = Self::progress(board);
        if progress < weights.early_until {
            GamePhase::Early
        } else if progress < weights.late_from {
            GamePhase::Mid
        } else {
            GamePhase::Late
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GamePhase::Early => write!(f, "early"),
            GamePhase::Mid => write!(f, "mid"),
            GamePhase::Late => write!(f, "late"),
        }
    }
}

/// Positional value of every cell for one board size.
///
/// Values depend on how far a cell is from the nearest edge in each axis,
/// so the table has the board's 8-fold symmetry at any size. With default
/// [`SquareValues`] on 8x8 this is the classic table:
///
/// ```text
/// 100 -20  10   5   5  10 -20 100
/// -20 -50  -2  -2  -2  -2 -50 -20
///  10  -2   5   1   1   5  -2  10
///   5  -2   1   0   0   1  -2   5
/// ```
/// (lower half mirrored)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightTable {
    size: usize,
    values: Vec<i32>,
}

impl WeightTable {
    pub fn new(size: usize, squares: &SquareValues) -> Self {
        let mut values = Vec::with_capacity(size * size);
        for row in 0..size {
            for col in 0..size {
                let dr = row.min(size - 1 - row);
                let dc = col.min(size - 1 - col);
                values.push(ring_value(dr.min(dc), dr.max(dc), squares));
            }
        }
        Self { size, values }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, pos: Pos) -> i32 {
        self.values[pos.row * self.size + pos.col]
    }
}

/// Value for a cell `near` steps from one edge and `far` steps from the other.
fn ring_value(near: usize, far: usize, squares: &SquareValues) -> i32 {
    match (near, far) {
        (0, 0) => squares.corner,
        (0, 1) => squares.c_square,
        (0, 2) => squares.edge,
        (0, _) => squares.inner_edge,
        (1, 1) => squares.x_square,
        (1, _) => squares.second_ring,
        (2, 2) => squares.third_ring_corner,
        (2, _) => squares.third_ring,
        _ => squares.center,
    }
}

/// Per-factor report of one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Breakdown {
    pub phase: GamePhase,
    pub progress: f64,
    pub positional: i32,
    pub material: i32,
    pub my_moves: usize,
    pub opponent_moves: usize,
    pub mobility: i32,
    pub weights: Weights,
    /// Neither side can move; `score` is the exact outcome
    pub terminal: bool,
    pub score: f64,
}

impl fmt::Display for Breakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "phase:      {} ({:.1}% filled)",
            self.phase,
            self.progress * 100.0
        )?;
        writeln!(f, "positional: {} x {}", self.positional, self.weights.positional)?;
        writeln!(f, "material:   {} x {}", self.material, self.weights.material)?;
        writeln!(
            f,
            "mobility:   {} ({} - {}) x {}",
            self.mobility, self.my_moves, self.opponent_moves, self.weights.mobility
        )?;
        if self.terminal {
            writeln!(f, "terminal position")?;
        }
        write!(f, "score:      {:.2}", self.score)
    }
}

/// Exact score of a finished game from `color`'s point of view.
pub fn terminal_score(board: &Board, color: Color) -> f64 {
    let diff = board.count(color) as f64 - board.count(color.opponent()) as f64;
    if diff > 0.0 {
        WIN_SCORE + diff
    } else if diff < 0.0 {
        -WIN_SCORE + diff
    } else {
        0.0
    }
}

/// Weighted positional/material/mobility evaluator.
#[derive(Debug, Clone)]
pub struct Evaluator {
    weights: PhaseWeights,
    squares: SquareValues,
    table: WeightTable,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(PhaseWeights::default(), SquareValues::default())
    }
}

impl Evaluator {
    pub fn new(weights: PhaseWeights, squares: SquareValues) -> Self {
        let table = WeightTable::new(DEFAULT_SIZE, &squares);
        Self {
            weights,
            squares,
            table,
        }
    }

    /// Build the positional table ahead of time for boards of `size`.
    pub fn for_size(mut self, size: usize) -> Self {
        self.resize(size);
        self
    }

    pub fn resize(&mut self, size: usize) {
        if self.table.size() != size {
            self.table = WeightTable::new(size, &self.squares);
        }
    }

    /// Board size the positional table is currently built for.
    pub fn table_size(&self) -> usize {
        self.table.size()
    }

    pub fn weights(&self) -> &PhaseWeights {
        &self.weights
    }

    fn table(&self, size: usize) -> Cow<'_, WeightTable> {
        if self.table.size() == size {
            Cow::Borrowed(&self.table)
        } else {
            Cow::Owned(WeightTable::new(size, &self.squares))
        }
    }

    /// Score `board` from `color`'s point of view.
    pub fn evaluate(&self, board: &Board, color: Color) -> f64 {
        let my_moves = board.mobility(color);
        let opponent_moves = board.mobility(color.opponent());
        if my_moves == 0 && opponent_moves == 0 {
            return terminal_score(board, color);
        }
        let w = self.weights.for_phase(GamePhase::of(board, &self.weights));
        let positional = self.positional(board, color);
        let material = material(board, color);
        let mobility = my_moves as i32 - opponent_moves as i32;
        w.positional * positional as f64
            + w.material * material as f64
            + w.mobility * mobility as f64
    }

    /// Same computation as [`Evaluator::evaluate`], with every factor reported.
    pub fn breakdown(&self, board: &Board, color: Color) -> Breakdown {
        let phase = GamePhase::of(board, &self.weights);
        let weights = self.weights.for_phase(phase);
        let my_moves = board.mobility(color);
        let opponent_moves = board.mobility(color.opponent());
        let positional = self.positional(board, color);
        let material = material(board, color);
        let mobility = my_moves as i32 - opponent_moves as i32;
        let terminal = my_moves == 0 && opponent_moves == 0;
        let score = if terminal {
            terminal_score(board, color)
        } else {
            weights.positional * positional as f64
                + weights.material * material as f64
                + weights.mobility * mobility as f64
        };
        Breakdown {
            phase,
            progress: GamePhase::progress(board),
            positional,
            material,
            my_moves,
            opponent_moves,
            mobility,
            weights,
            terminal,
            score,
        }
    }

    /// Table sum over own discs minus the opponent's.
    ///
    /// An X-square only carries its value while the corner it touches is
    /// empty; once the corner is taken it no longer concedes anything.
    pub fn positional(&self, board: &Board, color: Color) -> i32 {
        let table = self.table(board.size());
        let settled: Vec<Pos> = board
            .x_squares()
            .iter()
            .filter(|(corner, _)| board.get(*corner).is_some())
            .map(|&(_, x)| x)
            .collect();

        board
            .cells()
            .filter_map(|(pos, cell)| {
                let value = if settled.contains(&pos) { 0 } else { table.get(pos) };
                match cell {
                    Some(c) if c == color => Some(value),
                    Some(_) => Some(-value),
                    None => None,
                }
            })
            .sum()
    }
}

/// Own disc count minus the opponent's.
pub fn material(board: &Board, color: Color) -> i32 {
    board.count(color) as i32 - board.count(color.opponent()) as i32
}
