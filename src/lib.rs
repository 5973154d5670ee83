//! Reversi-Engine: an Othello/Reversi game engine with a minimax AI.
//!
//! ## Modules
//!
//! - [`constants`] - Default geometry, square values, weights, and search parameters
//! - [`board`] - Board state, legal moves, disc flipping with undo
//! - [`config`] - Validated search and evaluation configuration
//! - [`eval`] - Phase-aware positional/material/mobility evaluation
//! - [`search`] - Negamax alpha-beta search
//! - [`strategy`] - Random, greedy, minimax, and human players
//! - [`game`] - Turn protocol, passes, and game outcome
//!
//! ## Example
//!
//! ```
//! use reversi_engine::board::Board;
//! use reversi_engine::strategy::{GreedyAI, MinimaxAI, Strategy};
//! use reversi_engine::game::Game;
//!
//! let minimax = MinimaxAI::with_depth(2).unwrap();
//! let mut game = Game::new(
//!     Board::new(),
//!     Strategy::Minimax(minimax),
//!     Strategy::Greedy(GreedyAI),
//! );
//! let record = game.play().unwrap();
//! println!("{} ({}-{})", record.outcome, record.black, record.white);
//! assert!(game.board().is_terminal());
//! ```

pub mod board;
pub mod config;
pub mod constants;
pub mod eval;
pub mod game;
pub mod search;
pub mod strategy;
