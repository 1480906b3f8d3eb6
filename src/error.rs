//! Error taxonomy for the engine.
//!
//! Illegal move requests are recoverable rejections reported as `Err`
//! values; the state machine never mutates state on rejection.
//! `UnreachableGoal` and `NoLegalMoves` indicate an engine defect (a broken
//! invariant), not a condition callers are expected to recover from.

use crate::state::PlayerId;

/// Errors produced by the game engine and the AI strategies.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The move fails the legality rules (pawn geometry, wall overlap,
    /// boundary, or connectivity).
    #[error("illegal move")]
    InvalidMove,

    /// The move was submitted by a player whose turn it is not.
    #[error("not the turn of player {player}")]
    NotYourTurn { player: PlayerId },

    /// The game is not in the `Playing` state.
    #[error("game is not in progress")]
    GameNotInProgress,

    /// The referenced player is not part of this game.
    #[error("unknown player {player}")]
    UnknownPlayer { player: PlayerId },

    /// Games are created with exactly 2 or 4 distinct players.
    #[error("invalid player roster: got {got} players, expected {expected}")]
    InvalidPlayerCount { got: usize, expected: usize },

    /// The same player id appears twice in a roster.
    #[error("duplicate player {player}")]
    DuplicatePlayer { player: PlayerId },

    /// A player has no path to their goal edge. Wall legality guarantees
    /// this never happens under legal play; seeing it means the engine is
    /// defective for this game instance.
    #[error("engine defect: player index {index} has no path to their goal")]
    UnreachableGoal { index: usize },

    /// The legal-move set is empty mid-game. Fatal engine defect.
    #[error("engine defect: no legal moves available")]
    NoLegalMoves,
}
