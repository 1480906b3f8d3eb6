//! Biased random playouts for position evaluation.
//!
//! A rollout plays the game forward with a cheap policy until a terminal
//! state, a decisive path advantage, or the depth cap. Most plies advance
//! the mover along their best path-delta move; the rest inject randomness
//! so playouts do not collapse into a single deterministic line. The
//! result is a reward in `[0, 1]` from the searching player's perspective.

use crate::board::{Orientation, Pos};
use crate::constants::{
    CELLS, ROLLOUT_BIAS, ROLLOUT_DECISIVE, ROLLOUT_DEPTH, ROLLOUT_WALL_PROB, ROLLOUT_WALL_TRIES,
    SIGMOID_SCALE, WALL_N,
};
use crate::path;
use crate::rules::{pawn_destinations, wall_is_legal};
use crate::state::{GameState, Move, Status, apply_move};

/// Path advantage of `perspective`: nearest-opponent distance minus own
/// distance, in moves. Unreachable goals (a defect state) saturate.
pub fn advantage(state: &GameState, perspective: usize) -> i32 {
    let own = path::distance(state, perspective).unwrap_or(CELLS as u32) as i32;
    let opp = state
        .players
        .iter()
        .filter(|p| p.connected && p.index != perspective)
        .map(|p| path::distance(state, p.index).unwrap_or(CELLS as u32) as i32)
        .min()
        .unwrap_or(CELLS as i32);
    opp - own
}

/// Map a path advantage to a `[0, 1]` reward: 0.5 at parity, saturating
/// toward 1 as the advantage grows.
pub fn sigmoid(adv: i32) -> f64 {
    1.0 / (1.0 + (-(adv as f64) / SIGMOID_SCALE).exp())
}

/// Play one rollout from `start` and score it for `perspective`.
///
/// Terminal win/loss scores 1/0; a cut-off rollout scores the sigmoid of
/// the final path advantage.
pub fn rollout(start: &GameState, perspective: usize, rng: &mut fastrand::Rng) -> f64 {
    let mut state = start.clone();
    for _ in 0..ROLLOUT_DEPTH {
        if state.status == Status::Finished {
            break;
        }
        let adv = advantage(&state, perspective);
        if adv.abs() >= ROLLOUT_DECISIVE {
            // Decisive either way; no point simulating the endgame out.
            return sigmoid(adv);
        }

        let side = state.current;
        let mv = if rng.f64() < ROLLOUT_BIAS {
            best_delta_move(&state, side)
        } else {
            random_move(&state, side, rng)
        };
        match mv.and_then(|mv| apply_move(&state, &mv).ok()) {
            Some(next) => state = next,
            None => break,
        }
    }

    if state.status == Status::Finished {
        let won = state.winner == Some(state.players[perspective].id);
        if won { 1.0 } else { 0.0 }
    } else {
        sigmoid(advantage(&state, perspective))
    }
}

/// The pawn move minimizing the mover's own resulting distance.
fn best_delta_move(state: &GameState, side: usize) -> Option<Move> {
    let player = &state.players[side];
    pawn_destinations(state, side)
        .into_iter()
        .filter_map(|to| {
            path::shortest_path_from(state, side, to).map(|info| (info.distance, to))
        })
        .min_by_key(|&(d, _)| d)
        .map(|(_, to)| Move::Pawn {
            player: player.id,
            from: player.pos,
            to,
        })
}

/// A random legal move: occasionally a sampled wall placement, otherwise a
/// uniform pawn step.
fn random_move(state: &GameState, side: usize, rng: &mut fastrand::Rng) -> Option<Move> {
    let player = &state.players[side];
    if player.walls_remaining > 0 && rng.f64() < ROLLOUT_WALL_PROB {
        for _ in 0..ROLLOUT_WALL_TRIES {
            let pos = Pos {
                x: rng.u8(0..WALL_N as u8),
                y: rng.u8(0..WALL_N as u8),
            };
            let orientation = if rng.bool() {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            if wall_is_legal(state, pos, orientation) {
                return Some(Move::Wall {
                    player: player.id,
                    pos,
                    orientation,
                });
            }
        }
    }
    let dests = pawn_destinations(state, side);
    if dests.is_empty() {
        return None;
    }
    let to = dests[rng.usize(0..dests.len())];
    Some(Move::Pawn {
        player: player.id,
        from: player.pos,
        to,
    })
}
