//! Shortest-path computation to a player's goal edge.
//!
//! The edge relation is exactly the pawn-move legality predicate, so jump
//! and side-step shortcuts count as single moves and wall blocking is
//! honored. Every AI strategy shares this one implementation.

use crate::board::Pos;
use crate::constants::CELLS;
use crate::rules::pawn_destinations_from;
use crate::state::{GameState, Move};

/// Result of a shortest-path query.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PathInfo {
    /// Number of pawn moves to the nearest goal cell; 0 when already there.
    pub distance: u32,
    /// The first cell to step to along a shortest path; `None` at distance 0.
    pub first_step: Option<Pos>,
}

/// Shortest path for the player at `index` from their current position.
///
/// Returns `None` when the goal is unreachable. Wall legality keeps that
/// from happening in any state produced by legal play, but callers still
/// treat it as an answerable query rather than assuming.
pub fn shortest_path(state: &GameState, index: usize) -> Option<PathInfo> {
    shortest_path_from(state, index, state.players[index].pos)
}

/// Shortest path for the player at `index` as if their pawn stood on `from`.
/// Used to evaluate candidate pawn moves without cloning the state.
pub fn shortest_path_from(state: &GameState, index: usize, from: Pos) -> Option<PathInfo> {
    let goal = state.players[index].goal(state.players.len());
    if goal.contains(from) {
        return Some(PathInfo {
            distance: 0,
            first_step: None,
        });
    }

    let mut dist = [u32::MAX; CELLS];
    let mut first: [Option<Pos>; CELLS] = [None; CELLS];
    let mut queue = [from; CELLS];
    let mut head = 0;
    let mut tail = 1;
    dist[from.index()] = 0;

    while head < tail {
        let p = queue[head];
        head += 1;
        for q in pawn_destinations_from(state, index, p) {
            if dist[q.index()] != u32::MAX {
                continue;
            }
            dist[q.index()] = dist[p.index()] + 1;
            first[q.index()] = first[p.index()].or(Some(q));
            if goal.contains(q) {
                return Some(PathInfo {
                    distance: dist[q.index()],
                    first_step: first[q.index()],
                });
            }
            queue[tail] = q;
            tail += 1;
        }
    }
    None
}

/// Shortest-path distance only; `None` when unreachable.
pub fn distance(state: &GameState, index: usize) -> Option<u32> {
    shortest_path(state, index).map(|info| info.distance)
}

/// The pawn move that follows a shortest path, when one exists and the
/// player is not already standing on their goal.
pub fn shortest_path_move(state: &GameState, index: usize) -> Option<Move> {
    let player = &state.players[index];
    shortest_path(state, index)
        .and_then(|info| info.first_step)
        .map(|to| Move::Pawn {
            player: player.id,
            from: player.pos,
            to,
        })
}
