//! Quoridor-Engine: a wall-racing board game engine with MCTS search.
//!
//! This crate implements the full rules of a Quoridor-style game on a
//! 9x9 grid for two or four players, plus a family of computer opponents
//! topped by a Monte Carlo Tree Search player.
//!
//! ## Modules
//!
//! - [`constants`] - Board dimensions and engine parameters
//! - [`board`] - Grid geometry, wall occupancy, and reachability
//! - [`state`] - Game state, players, and move application
//! - [`rules`] - Legal move generation and validation
//! - [`path`] - Shortest paths to goal edges
//! - [`playout`] - Biased game simulation for position evaluation
//! - [`mcts`] - Monte Carlo Tree Search over game futures
//! - [`strategy`] - Move selection policies and difficulty tiers
//! - [`protocol`] - Line-oriented text protocol
//! - [`error`] - Engine error taxonomy
//!
//! ## Example
//!
//! ```
//! use quoridor_engine::state::{PlayerId, Move, create_game, apply_move};
//! use quoridor_engine::rules::valid_moves;
//!
//! // Create a two-player game
//! let game = create_game(&[PlayerId(1), PlayerId(2)], 2).unwrap();
//!
//! // The first player has 3 pawn steps and 128 legal wall placements
//! let moves = valid_moves(&game, PlayerId(1)).unwrap();
//! assert_eq!(moves.len(), 131);
//!
//! // Apply one of them
//! let next = apply_move(&game, &moves[0]).unwrap();
//! assert_eq!(next.current, 1);
//! ```

pub mod board;
pub mod constants;
pub mod error;
pub mod mcts;
pub mod path;
pub mod playout;
pub mod protocol;
pub mod rules;
pub mod state;
pub mod strategy;

pub use error::EngineError;
pub use rules::{valid_moves, validate_move};
pub use state::{
    GameState, Move, PlayerId, apply_move, create_game, forfeit, is_finished, winner,
};
pub use strategy::{Difficulty, select_move};
