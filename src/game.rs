//! Turn-by-turn game driver.
//!
//! The driver owns the board and one [`Strategy`] per color and runs the
//! turn protocol:
//! - the side to move with a legal move asks its strategy and the move is
//!   applied
//! - the side to move without a legal move passes, leaving the board as is
//! - when neither side can move the game is over and the higher disc count
//!   wins
//!
//! A strategy that passes while holding a legal move, or answers an illegal
//! move, breaks the contract and ends the game with a [`GameError`].

use std::fmt;
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::board::{Board, Capture, Color, MoveError, Pos};
use crate::strategy::Strategy;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Winner(Color),
    Tie,
}

impl Outcome {
    /// Strict disc-count comparison.
    pub fn of(board: &Board) -> Outcome {
        let (black, white) = board.score();
        if black > white {
            Outcome::Winner(Color::Black)
        } else if white > black {
            Outcome::Winner(Color::White)
        } else {
            Outcome::Tie
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Winner(color) => write!(f, "{color} wins"),
            Outcome::Tie => write!(f, "tie"),
        }
    }
}

/// One entry of the game history.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Play {
    Place { color: Color, pos: Pos, flipped: usize },
    Pass(Color),
}

impl fmt::Display for Play {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Play::Place { color, pos, flipped } => write!(f, "{color} {pos} (+{flipped})"),
            Play::Pass(color) => write!(f, "{color} pass"),
        }
    }
}

/// What a single [`Game::step`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Turn {
    Moved(Capture),
    Passed(Color),
    Finished(Outcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// A strategy answered a move the board rejects
    IllegalMove(MoveError),
    /// A strategy answered `None` although it had legal moves
    UnexpectedPass(Color),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::IllegalMove(err) => write!(f, "{err}"),
            GameError::UnexpectedPass(color) => {
                write!(f, "{color} passed while holding a legal move")
            }
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::IllegalMove(err) => Some(err),
            GameError::UnexpectedPass(_) => None,
        }
    }
}

impl From<MoveError> for GameError {
    fn from(err: MoveError) -> Self {
        GameError::IllegalMove(err)
    }
}

/// Summary of a finished game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub outcome: Outcome,
    pub black: usize,
    pub white: usize,
    pub plays: Vec<Play>,
    pub duration: Duration,
}

impl GameRecord {
    /// Number of discs placed (passes excluded).
    pub fn move_count(&self) -> usize {
        self.plays
            .iter()
            .filter(|p| matches!(p, Play::Place { .. }))
            .count()
    }
}

pub struct Game {
    board: Board,
    black: Strategy,
    white: Strategy,
    to_move: Color,
    plays: Vec<Play>,
    outcome: Option<Outcome>,
}

impl Game {
    /// Start a game on `board` with Black to move.
    pub fn new(board: Board, black: Strategy, white: Strategy) -> Self {
        Self {
            board,
            black,
            white,
            to_move: Color::Black,
            plays: Vec::new(),
            outcome: None,
        }
    }

    /// Hand the first turn to `color` instead of Black.
    pub fn starting_with(mut self, color: Color) -> Self {
        self.to_move = color;
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Color {
        self.to_move
    }

    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    /// `Some` once neither side can move.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn strategy(&self, color: Color) -> &Strategy {
        match color {
            Color::Black => &self.black,
            Color::White => &self.white,
        }
    }

    /// Advance the game by one turn.
    ///
    /// # Errors
    /// Returns [`GameError`] if the side to move answers `None` while it
    /// has a legal move or answers an illegal move. The board is unchanged
    /// in both cases.
    pub fn step(&mut self) -> Result<Turn, GameError> {
        if let Some(outcome) = self.outcome {
            return Ok(Turn::Finished(outcome));
        }

        let color = self.to_move;
        if !self.board.has_legal_move(color) {
            if !self.board.has_legal_move(color.opponent()) {
                let outcome = Outcome::of(&self.board);
                let (black, white) = self.board.score();
                info!("game over: {outcome} ({black}-{white})");
                self.outcome = Some(outcome);
                return Ok(Turn::Finished(outcome));
            }
            info!("{color} has no legal move and passes");
            self.plays.push(Play::Pass(color));
            self.to_move = color.opponent();
            return Ok(Turn::Passed(color));
        }

        let strategy = match color {
            Color::Black => &mut self.black,
            Color::White => &mut self.white,
        };
        let Some(pos) = strategy.choose_move(&self.board, color) else {
            return Err(GameError::UnexpectedPass(color));
        };
        let capture = self.board.apply_move(pos, color)?;
        debug!("{color} plays {pos} flipping {}", capture.flip_count());

        self.plays.push(Play::Place {
            color,
            pos,
            flipped: capture.flip_count(),
        });
        self.to_move = color.opponent();
        Ok(Turn::Moved(capture))
    }

    /// Run the game to completion.
    pub fn play(&mut self) -> Result<GameRecord, GameError> {
        let start = Instant::now();
        loop {
            if let Turn::Finished(outcome) = self.step()? {
                let (black, white) = self.board.score();
                return Ok(GameRecord {
                    outcome,
                    black,
                    white,
                    plays: self.plays.clone(),
                    duration: start.elapsed(),
                });
            }
        }
    }
}

/// Tally over a series of games, kept by color.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesStats {
    pub games: usize,
    pub black_wins: usize,
    pub white_wins: usize,
    pub ties: usize,
    pub black_discs: usize,
    pub white_discs: usize,
    pub moves: usize,
}

impl SeriesStats {
    pub fn record(&mut self, game: &GameRecord) {
        self.games += 1;
        match game.outcome {
            Outcome::Winner(Color::Black) => self.black_wins += 1,
            Outcome::Winner(Color::White) => self.white_wins += 1,
            Outcome::Tie => self.ties += 1,
        }
        self.black_discs += game.black;
        self.white_discs += game.white;
        self.moves += game.move_count();
    }

    /// Share of games won by `color`, 0 when no games were played.
    pub fn win_rate(&self, color: Color) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        let wins = match color {
            Color::Black => self.black_wins,
            Color::White => self.white_wins,
        };
        wins as f64 / self.games as f64
    }
}

impl fmt::Display for SeriesStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "games:       {}", self.games)?;
        writeln!(
            f,
            "black wins:  {} ({:.1}%)",
            self.black_wins,
            self.win_rate(Color::Black) * 100.0
        )?;
        writeln!(
            f,
            "white wins:  {} ({:.1}%)",
            self.white_wins,
            self.win_rate(Color::White) * 100.0
        )?;
        writeln!(f, "ties:        {}", self.ties)?;
        if self.games > 0 {
            let n = self.games as f64;
            write!(
                f,
                "avg discs:   {:.1} - {:.1}, avg moves {:.1}",
                self.black_discs as f64 / n,
                self.white_discs as f64 / n,
                self.moves as f64 / n
            )?;
        }
        Ok(())
    }
}
