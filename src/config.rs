//! Runtime configuration for evaluation and search.
//!
//! Defaults come from [`crate::constants`]. Configuration is validated once,
//! when a [`crate::strategy::MinimaxAI`] is built, so a running search never
//! sees bad parameters.

use std::fmt;
use std::time::Duration;

use crate::constants::*;
use crate::eval::GamePhase;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Board size is odd, too small, or too large for coordinate notation
    InvalidBoardSize(usize),
    /// Search depth must be at least one ply
    InvalidDepth(usize),
    /// A weight is NaN or infinite
    InvalidWeight {
        phase: GamePhase,
        name: &'static str,
        value: f64,
    },
    /// Phase boundaries must satisfy 0 < early_until <= late_from <= 1
    InvalidPhaseBounds { early_until: f64, late_from: f64 },
    /// Parallel search needs at least one worker
    InvalidThreads(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBoardSize(n) => write!(
                f,
                "invalid board size {n}: must be even and between {MIN_SIZE} and {}",
                COLUMN_LETTERS.len()
            ),
            ConfigError::InvalidDepth(d) => write!(f, "invalid search depth {d}: must be >= 1"),
            ConfigError::InvalidWeight { phase, name, value } => {
                write!(f, "invalid {name} weight {value} for {phase} phase")
            }
            ConfigError::InvalidPhaseBounds {
                early_until,
                late_from,
            } => write!(
                f,
                "invalid phase bounds early_until={early_until} late_from={late_from}"
            ),
            ConfigError::InvalidThreads(n) => write!(f, "invalid thread count {n}: must be >= 1"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Multipliers for the three evaluation factors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub positional: f64,
    pub material: f64,
    pub mobility: f64,
}

impl Weights {
    pub const fn new(positional: f64, material: f64, mobility: f64) -> Self {
        Self {
            positional,
            material,
            mobility,
        }
    }

    const fn from_tuple((positional, material, mobility): (f64, f64, f64)) -> Self {
        Self::new(positional, material, mobility)
    }

    fn validate(&self, phase: GamePhase) -> Result<(), ConfigError> {
        for (name, value) in [
            ("positional", self.positional),
            ("material", self.material),
            ("mobility", self.mobility),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::InvalidWeight { phase, name, value });
            }
        }
        Ok(())
    }
}

/// Weight policy table: one weight triple per game phase, plus the fill
/// fractions at which the phases change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseWeights {
    pub early: Weights,
    pub mid: Weights,
    pub late: Weights,
    /// Fill fraction below which the game is early
    pub early_until: f64,
    /// Fill fraction from which the game is late
    pub late_from: f64,
}

impl Default for PhaseWeights {
    fn default() -> Self {
        Self {
            early: Weights::from_tuple(EARLY_WEIGHTS),
            mid: Weights::from_tuple(MID_WEIGHTS),
            late: Weights::from_tuple(LATE_WEIGHTS),
            early_until: EARLY_UNTIL,
            late_from: LATE_FROM,
        }
    }
}

impl PhaseWeights {
    /// The same weights in every phase.
    pub fn uniform(weights: Weights) -> Self {
        Self {
            early: weights,
            mid: weights,
            late: weights,
            ..Self::default()
        }
    }

    pub fn for_phase(&self, phase: GamePhase) -> Weights {
        match phase {
            GamePhase::Early => self.early,
            GamePhase::Mid => self.mid,
            GamePhase::Late => self.late,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.early.validate(GamePhase::Early)?;
        self.mid.validate(GamePhase::Mid)?;
        self.late.validate(GamePhase::Late)?;
        let ordered = self.early_until > 0.0
            && self.early_until <= self.late_from
            && self.late_from <= 1.0;
        if !ordered {
            return Err(ConfigError::InvalidPhaseBounds {
                early_until: self.early_until,
                late_from: self.late_from,
            });
        }
        Ok(())
    }
}

/// Per-cell values the positional weight table is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SquareValues {
    pub corner: i32,
    pub c_square: i32,
    pub x_square: i32,
    pub edge: i32,
    pub inner_edge: i32,
    pub second_ring: i32,
    pub third_ring_corner: i32,
    pub third_ring: i32,
    pub center: i32,
}

impl Default for SquareValues {
    fn default() -> Self {
        Self {
            corner: CORNER_VALUE,
            c_square: C_SQUARE_VALUE,
            x_square: X_SQUARE_VALUE,
            edge: EDGE_VALUE,
            inner_edge: INNER_EDGE_VALUE,
            second_ring: SECOND_RING_VALUE,
            third_ring_corner: THIRD_RING_CORNER_VALUE,
            third_ring: THIRD_RING_VALUE,
            center: CENTER_VALUE,
        }
    }
}

/// Everything a [`crate::strategy::MinimaxAI`] needs.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimaxConfig {
    /// Search depth in plies
    pub depth: usize,
    pub weights: PhaseWeights,
    pub squares: SquareValues,
    /// Alpha-beta pruning; off means plain minimax
    pub pruning: bool,
    /// Per-move time limit, enforced with iterative deepening
    pub time_budget: Option<Duration>,
    /// Worker threads for the root split (1 = serial)
    pub threads: usize,
}

impl Default for MinimaxConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH)
    }
}

impl MinimaxConfig {
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            weights: PhaseWeights::default(),
            squares: SquareValues::default(),
            pruning: true,
            time_budget: None,
            threads: 1,
        }
    }

    pub fn with_weights(mut self, weights: PhaseWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_squares(mut self, squares: SquareValues) -> Self {
        self.squares = squares;
        self
    }

    pub fn with_pruning(mut self, pruning: bool) -> Self {
        self.pruning = pruning;
        self
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth == 0 {
            return Err(ConfigError::InvalidDepth(self.depth));
        }
        if self.threads == 0 {
            return Err(ConfigError::InvalidThreads(self.threads));
        }
        self.weights.validate()
    }
}
