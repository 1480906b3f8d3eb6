//! Game state representation and the state machine.
//!
//! A [`GameState`] is a self-contained value: [`apply_move`] never mutates
//! its input, it validates the move against the legality rules, clones the
//! state and returns the successor. That keeps simulation branches in the
//! AI free to fan out without copy-on-write bookkeeping or rollback.
//!
//! The lifecycle is `Lobby -> Playing -> Finished`. Games built through
//! [`create_game`] come with a full roster and start in `Playing`; `Lobby`
//! exists for wrappers that assemble rosters incrementally. `Playing`
//! re-enters itself once per accepted move via the turn cursor, and
//! transitions to `Finished` when a pawn reaches its goal edge or all but
//! one player have forfeited.

use std::fmt;

use tracing::{info, warn};

use crate::board::{Goal, Orientation, Pos, WallGrid, goal_for, start_for};
use crate::constants::{N, WALLS_FOUR_PLAYER, WALLS_TWO_PLAYER};
use crate::error::EngineError;
use crate::rules;

/// Opaque player identifier assigned by the caller (session layer).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A placed wall. Immutable once placed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Wall {
    pub pos: Pos,
    pub orientation: Orientation,
    pub owner: PlayerId,
}

/// One player in a game. `index` fixes the turn order and the goal edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub index: usize,
    pub pos: Pos,
    pub walls_remaining: u8,
    /// False once the player forfeited or was dropped by the transport
    /// layer; disconnected players leave the turn rotation and the board.
    pub connected: bool,
}

impl Player {
    /// The edge this player must reach.
    pub fn goal(&self, player_count: usize) -> Goal {
        goal_for(self.index, player_count)
    }
}

/// A move request, always attributed to a player.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Move {
    Pawn {
        player: PlayerId,
        from: Pos,
        to: Pos,
    },
    Wall {
        player: PlayerId,
        pos: Pos,
        orientation: Orientation,
    },
}

impl Move {
    /// The player this move is attributed to.
    pub fn player(&self) -> PlayerId {
        match *self {
            Move::Pawn { player, .. } | Move::Wall { player, .. } => player,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Move::Pawn { from, to, .. } => write!(f, "move {} -> {}", from, to),
            Move::Wall {
                pos, orientation, ..
            } => write!(f, "wall {} {}", pos, orientation.letter()),
        }
    }
}

/// Game lifecycle states.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Lobby,
    Playing,
    Finished,
}

/// A full game position: players, walls, turn cursor, and history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    /// Turn order is list order; `index` matches the list position.
    pub players: Vec<Player>,
    /// Placement history with owners, in placement order.
    pub walls: Vec<Wall>,
    /// Bit-set occupancy used for all blocking and legality queries.
    pub grid: WallGrid,
    /// Index into `players` of the player to move.
    pub current: usize,
    pub status: Status,
    pub winner: Option<PlayerId>,
    pub history: Vec<Move>,
}

impl GameState {
    /// Resolve a player id to its index.
    pub fn index_of(&self, player: PlayerId) -> Result<usize, EngineError> {
        self.players
            .iter()
            .position(|p| p.id == player)
            .ok_or(EngineError::UnknownPlayer { player })
    }

    /// The player whose turn it is.
    pub fn current_player(&self) -> &Player {
        &self.players[self.current]
    }

    /// Number of seats in the game (2 or 4), forfeits included.
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Whether a connected pawn occupies the cell.
    pub fn occupied(&self, pos: Pos) -> bool {
        self.players.iter().any(|p| p.connected && p.pos == pos)
    }

    /// Advance the turn cursor cyclically, skipping disconnected players.
    fn advance_turn(&mut self) {
        for _ in 0..self.players.len() {
            self.current = (self.current + 1) % self.players.len();
            if self.players[self.current].connected {
                return;
            }
        }
    }
}

/// Create a fresh game for a full roster of 2 or 4 distinct players, at
/// their start positions with the fixed wall allowance.
pub fn create_game(player_ids: &[PlayerId], max_players: usize) -> Result<GameState, EngineError> {
    if !(max_players == 2 || max_players == 4) || player_ids.len() != max_players {
        return Err(EngineError::InvalidPlayerCount {
            got: player_ids.len(),
            expected: max_players,
        });
    }
    for (i, id) in player_ids.iter().enumerate() {
        if player_ids[..i].contains(id) {
            return Err(EngineError::DuplicatePlayer { player: *id });
        }
    }

    let walls_each = if max_players == 4 {
        WALLS_FOUR_PLAYER
    } else {
        WALLS_TWO_PLAYER
    };
    let players = player_ids
        .iter()
        .enumerate()
        .map(|(index, &id)| Player {
            id,
            index,
            pos: start_for(index, max_players),
            walls_remaining: walls_each,
            connected: true,
        })
        .collect();

    Ok(GameState {
        players,
        walls: Vec::new(),
        grid: WallGrid::new(),
        current: 0,
        status: Status::Playing,
        winner: None,
        history: Vec::new(),
    })
}

/// Validate and apply a move, returning the successor state.
///
/// Rejections carry no side effects: the input state is untouched and no
/// partial mutation ever escapes. On a winning move the game transitions
/// to `Finished` and the turn cursor freezes on the winner.
pub fn apply_move(state: &GameState, mv: &Move) -> Result<GameState, EngineError> {
    if state.status != Status::Playing {
        return Err(EngineError::GameNotInProgress);
    }
    let index = state.index_of(mv.player())?;
    if index != state.current {
        return Err(EngineError::NotYourTurn { player: mv.player() });
    }

    let mut next = state.clone();
    match *mv {
        Move::Pawn { from, to, .. } => {
            let player = &state.players[index];
            if from != player.pos || !rules::pawn_destinations(state, index).contains(&to) {
                return Err(EngineError::InvalidMove);
            }
            next.players[index].pos = to;
        }
        Move::Wall {
            pos, orientation, ..
        } => {
            let player = &state.players[index];
            if player.walls_remaining == 0 || !rules::wall_is_legal(state, pos, orientation) {
                return Err(EngineError::InvalidMove);
            }
            next.grid.place(pos.x, pos.y, orientation);
            next.walls.push(Wall {
                pos,
                orientation,
                owner: player.id,
            });
            next.players[index].walls_remaining -= 1;
        }
    }
    next.history.push(*mv);

    let player = &next.players[index];
    if player.goal(next.players.len()).contains(player.pos) {
        next.status = Status::Finished;
        next.winner = Some(player.id);
        info!(winner = %player.id, moves = next.history.len(), "game finished");
    } else {
        next.advance_turn();
    }
    Ok(next)
}

/// Remove a player from the turn rotation (forfeit or disconnection
/// timeout, as signalled by the transport layer). When a single connected
/// player remains, they win and the game finishes.
pub fn forfeit(state: &GameState, player: PlayerId) -> Result<GameState, EngineError> {
    if state.status != Status::Playing {
        return Err(EngineError::GameNotInProgress);
    }
    let index = state.index_of(player)?;
    if !state.players[index].connected {
        return Err(EngineError::UnknownPlayer { player });
    }

    let mut next = state.clone();
    next.players[index].connected = false;
    info!(%player, "player forfeited");

    let mut remaining = next.players.iter().filter(|p| p.connected);
    match (remaining.next(), remaining.next()) {
        (Some(last), None) => {
            next.winner = Some(last.id);
            next.current = last.index;
            next.status = Status::Finished;
        }
        (None, _) => {
            // Everyone gone; nothing sensible to report as a winner.
            warn!("all players forfeited");
            next.status = Status::Finished;
        }
        _ => {
            if index == next.current {
                next.advance_turn();
            }
        }
    }
    Ok(next)
}

/// Whether the game has finished.
pub fn is_finished(state: &GameState) -> bool {
    state.status == Status::Finished
}

/// The winning player, once the game is finished.
pub fn winner(state: &GameState) -> Option<PlayerId> {
    state.winner
}

impl fmt::Display for GameState {
    /// ASCII rendering: pawns as player indices, `|` and `---` for wall
    /// segments, row 8 at the top.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..N as u8).rev() {
            write!(f, "{y} ")?;
            for x in 0..N as u8 {
                let here = Pos { x, y };
                let cell = self
                    .players
                    .iter()
                    .find(|p| p.connected && p.pos == here)
                    .map(|p| char::from_digit(p.index as u32, 10).unwrap_or('?'))
                    .unwrap_or('.');
                write!(f, " {cell}")?;
                if (x as usize) < N - 1 {
                    let right = Pos { x: x + 1, y };
                    write!(f, "{}", if self.grid.blocks(here, right) { '|' } else { ' ' })?;
                }
            }
            writeln!(f)?;
            if y > 0 {
                write!(f, "  ")?;
                for x in 0..N as u8 {
                    let above = Pos { x, y };
                    let below = Pos { x, y: y - 1 };
                    write!(
                        f,
                        "{}",
                        if self.grid.blocks(below, above) { "---" } else { "   " }
                    )?;
                }
                writeln!(f)?;
            }
        }
        write!(f, "  ")?;
        for x in 0..N {
            write!(f, " {x} ")?;
        }
        writeln!(f)
    }
}
