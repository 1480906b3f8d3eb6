//! Move legality and move generation.
//!
//! Pawn moves come in three shapes: a simple step to an adjacent free
//! cell, a straight jump over an adjacent pawn, and a diagonal side-step
//! around a pawn whose far side is blocked by a wall or the board edge.
//! Wall placements must pass the anchor and overlap rules and must leave
//! every player with at least one path to their goal edge, verified on the
//! hypothetical post-placement grid. That connectivity check is mandatory;
//! a wall that traps any player is never legal.

use crate::board::{DIRECTIONS, Orientation, Pos, goal_for, reachable};
use crate::constants::WALL_N;
use crate::error::EngineError;
use crate::state::{GameState, Move, PlayerId, Status};

/// Pawn destinations for a player, evaluated as if their pawn stood on
/// `from`. Other pawns keep their actual positions; this override is what
/// lets the pathfinder reuse the exact legality relation from any cell.
pub fn pawn_destinations_from(state: &GameState, index: usize, from: Pos) -> Vec<Pos> {
    let grid = &state.grid;
    let occupied = |p: Pos| {
        state
            .players
            .iter()
            .any(|pl| pl.connected && pl.index != index && pl.pos == p)
    };

    let mut dests = Vec::with_capacity(5);
    for (dx, dy) in DIRECTIONS {
        let Some(adj) = from.offset(dx, dy) else {
            continue;
        };
        if grid.blocks(from, adj) {
            continue;
        }
        if !occupied(adj) {
            dests.push(adj);
            continue;
        }
        // A pawn occupies the adjacent cell.
        match adj.offset(dx, dy) {
            Some(beyond) if !grid.blocks(adj, beyond) => {
                // Straight jump; the landing cell must be free.
                if !occupied(beyond) {
                    dests.push(beyond);
                }
            }
            _ => {
                // Straight jump blocked by wall or board edge: the two
                // perpendicular side-steps around the pawn open up.
                for (sx, sy) in [(dy, dx), (-dy, -dx)] {
                    if let Some(side) = adj.offset(sx, sy)
                        && !grid.blocks(adj, side)
                        && !occupied(side)
                    {
                        dests.push(side);
                    }
                }
            }
        }
    }
    dests
}

/// Pawn destinations for a player from their actual position.
pub fn pawn_destinations(state: &GameState, index: usize) -> Vec<Pos> {
    pawn_destinations_from(state, index, state.players[index].pos)
}

/// Whether a wall placement is legal: anchor in range and non-overlapping,
/// and every connected player keeps a path to their goal afterwards.
pub fn wall_is_legal(state: &GameState, pos: Pos, orientation: Orientation) -> bool {
    if !state.grid.is_open(pos.x, pos.y, orientation) {
        return false;
    }
    let mut trial = state.grid;
    trial.place(pos.x, pos.y, orientation);
    state
        .players
        .iter()
        .filter(|p| p.connected)
        .all(|p| reachable(&trial, p.pos, goal_for(p.index, state.players.len())))
}

/// All legal moves for the player at `index`: every pawn destination plus,
/// while they hold walls, every legal wall placement.
pub fn moves_for_index(state: &GameState, index: usize) -> Vec<Move> {
    let player = &state.players[index];
    let mut moves: Vec<Move> = pawn_destinations(state, index)
        .into_iter()
        .map(|to| Move::Pawn {
            player: player.id,
            from: player.pos,
            to,
        })
        .collect();

    if player.walls_remaining > 0 {
        for y in 0..WALL_N as u8 {
            for x in 0..WALL_N as u8 {
                for orientation in [Orientation::Horizontal, Orientation::Vertical] {
                    let pos = Pos { x, y };
                    if wall_is_legal(state, pos, orientation) {
                        moves.push(Move::Wall {
                            player: player.id,
                            pos,
                            orientation,
                        });
                    }
                }
            }
        }
    }
    moves
}

/// All legal moves for a player id.
pub fn valid_moves(state: &GameState, player: PlayerId) -> Result<Vec<Move>, EngineError> {
    let index = state.index_of(player)?;
    Ok(moves_for_index(state, index))
}

/// Pure legality check; true iff `apply_move` would accept the move.
pub fn validate_move(state: &GameState, mv: &Move) -> bool {
    if state.status != Status::Playing {
        return false;
    }
    let Ok(index) = state.index_of(mv.player()) else {
        return false;
    };
    if index != state.current {
        return false;
    }
    let player = &state.players[index];
    match *mv {
        Move::Pawn { from, to, .. } => {
            from == player.pos && pawn_destinations(state, index).contains(&to)
        }
        Move::Wall {
            pos, orientation, ..
        } => player.walls_remaining > 0 && wall_is_legal(state, pos, orientation),
    }
}
