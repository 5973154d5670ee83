//! Default values for board geometry, evaluation, and search.
//!
//! Everything here is a default. Callers override evaluation and search
//! parameters through [`crate::config::MinimaxConfig`] and pick the board
//! size at construction time through [`crate::board::Board::with_size`].

// =============================================================================
// Board Geometry
// =============================================================================

/// Standard Othello board size (NxN).
pub const DEFAULT_SIZE: usize = 8;

/// Smallest supported board size. Sizes must also be even.
pub const MIN_SIZE: usize = 4;

/// Column letters used by the `a1` coordinate notation.
pub const COLUMN_LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// Offsets to the 8 neighbouring cells as (row, col) deltas.
/// Order: N, NE, E, SE, S, SW, W, NW
pub const DIRECTIONS: [(isize, isize); 8] = [
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
];

// =============================================================================
// Positional Square Values
// =============================================================================

/// Corner cells can never be flipped.
pub const CORNER_VALUE: i32 = 100;

/// Edge cells orthogonally adjacent to a corner.
pub const C_SQUARE_VALUE: i32 = -20;

/// Cells diagonally adjacent to a corner.
pub const X_SQUARE_VALUE: i32 = -50;

/// Edge cells two steps from a corner.
pub const EDGE_VALUE: i32 = 10;

/// Remaining edge cells.
pub const INNER_EDGE_VALUE: i32 = 5;

/// Second ring, excluding X-squares.
pub const SECOND_RING_VALUE: i32 = -2;

/// Third-ring cells diagonal from a corner.
pub const THIRD_RING_CORNER_VALUE: i32 = 5;

/// Remaining third-ring cells.
pub const THIRD_RING_VALUE: i32 = 1;

/// Everything deeper than the third ring.
pub const CENTER_VALUE: i32 = 0;

// =============================================================================
// Phase-Dependent Weights
// =============================================================================

/// Board fill fraction below which the game is in its early phase.
pub const EARLY_UNTIL: f64 = 0.5;

/// Board fill fraction from which the game is in its late phase.
pub const LATE_FROM: f64 = 0.75;

/// Early game (positional, material, mobility): position and mobility matter most.
pub const EARLY_WEIGHTS: (f64, f64, f64) = (1.0, 0.5, 3.0);

/// Mid game: all factors balanced.
pub const MID_WEIGHTS: (f64, f64, f64) = (0.8, 1.0, 2.0);

/// Late game: disc count dominates.
pub const LATE_WEIGHTS: (f64, f64, f64) = (0.3, 2.0, 1.0);

// =============================================================================
// Search Parameters
// =============================================================================

/// Default search depth in plies.
pub const DEFAULT_DEPTH: usize = 3;

/// Base score of a decided game. Dominates any heuristic value.
pub const WIN_SCORE: f64 = 1_000_000.0;

/// Alpha-beta window bound.
pub const INF: f64 = f64::INFINITY;
