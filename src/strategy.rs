//! Move selection policies, from uniform random up to full tree search.
//!
//! A [`Strategy`] owns its RNG, so two strategies with the same seed pick
//! the same moves and concurrent games never share mutable state. The
//! difficulty tiers only change the MCTS budget and exploration constant;
//! the cheaper policies are kept around as fallbacks and as sparring
//! partners for tests and self-play.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, error};

use crate::board::{Orientation, Pos, reachable};
use crate::constants::{
    BEHIND_MARGIN, CENTER_COLUMN, GREEDY_CLOSENESS_EASY, GREEDY_CLOSENESS_HARD,
    GREEDY_CLOSENESS_MEDIUM, MAX_SELF_HARM, MCTS_SIMS_EASY, MCTS_SIMS_HARD, MCTS_SIMS_MEDIUM,
    MCTS_UCB_EASY, MCTS_UCB_HARD, MCTS_UCB_MEDIUM, MIN_OPPONENT_GAIN, NEAR_GOAL, OPENING_MOVES,
    WALL_N,
};
use crate::error::EngineError;
use crate::mcts;
use crate::path;
use crate::rules::{pawn_destinations, wall_is_legal};
use crate::state::{GameState, Move, PlayerId};

/// Strength tier exposed to the outside world.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    fn mcts_iterations(self) -> usize {
        match self {
            Difficulty::Easy => MCTS_SIMS_EASY,
            Difficulty::Medium => MCTS_SIMS_MEDIUM,
            Difficulty::Hard => MCTS_SIMS_HARD,
        }
    }

    fn mcts_exploration(self) -> f64 {
        match self {
            Difficulty::Easy => MCTS_UCB_EASY,
            Difficulty::Medium => MCTS_UCB_MEDIUM,
            Difficulty::Hard => MCTS_UCB_HARD,
        }
    }

    fn greedy_closeness(self) -> u32 {
        match self {
            Difficulty::Easy => GREEDY_CLOSENESS_EASY,
            Difficulty::Medium => GREEDY_CLOSENESS_MEDIUM,
            Difficulty::Hard => GREEDY_CLOSENESS_HARD,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        f.write_str(s)
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Difficulty, String> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{other}'")),
        }
    }
}

/// How moves are picked.
#[derive(Copy, Clone, Debug, PartialEq)]
enum Policy {
    /// Uniform over the legal moves.
    Random,
    /// Block a nearby opponent, otherwise race.
    Greedy { closeness: u32 },
    /// Two-phase rule set: wall phase, then run phase.
    Heuristic,
    /// Tree search with the given budget.
    Mcts { iterations: usize, exploration: f64 },
}

/// A move selector with its own random stream.
pub struct Strategy {
    policy: Policy,
    rng: fastrand::Rng,
}

impl Strategy {
    pub fn random() -> Strategy {
        Strategy {
            policy: Policy::Random,
            rng: fastrand::Rng::new(),
        }
    }

    pub fn greedy(difficulty: Difficulty) -> Strategy {
        Strategy {
            policy: Policy::Greedy {
                closeness: difficulty.greedy_closeness(),
            },
            rng: fastrand::Rng::new(),
        }
    }

    pub fn heuristic() -> Strategy {
        Strategy {
            policy: Policy::Heuristic,
            rng: fastrand::Rng::new(),
        }
    }

    /// The standard tier mapping: every difficulty runs MCTS, with budget
    /// and exploration scaled to the tier.
    pub fn for_difficulty(difficulty: Difficulty) -> Strategy {
        Strategy {
            policy: Policy::Mcts {
                iterations: difficulty.mcts_iterations(),
                exploration: difficulty.mcts_exploration(),
            },
            rng: fastrand::Rng::new(),
        }
    }

    /// Fix the random stream, for reproducible games.
    pub fn seeded(mut self, seed: u64) -> Strategy {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    /// Pick a move for `player` in `state`.
    pub fn select(&mut self, state: &GameState, player: PlayerId) -> Result<Move, EngineError> {
        let index = state.index_of(player)?;
        match self.policy {
            Policy::Random => self.select_random(state, index),
            Policy::Greedy { closeness } => self.select_greedy(state, index, closeness),
            Policy::Heuristic => self.select_heuristic(state, index),
            Policy::Mcts {
                iterations,
                exploration,
            } => self.select_mcts(state, index, iterations, exploration),
        }
    }

    fn select_random(&mut self, state: &GameState, index: usize) -> Result<Move, EngineError> {
        let moves = crate::rules::moves_for_index(state, index);
        if moves.is_empty() {
            return Err(EngineError::NoLegalMoves);
        }
        Ok(moves[self.rng.usize(0..moves.len())])
    }

    /// The pathfinder found no route. Its edge relation honors pawn
    /// occupancy, so this also happens in legal positions where an
    /// opponent pawn parks on the last doorway to the goal edge. If the
    /// raw grid still connects, the blockade is transient and a random
    /// move keeps the game going; only a broken grid is an engine defect.
    fn blocked_fallback(&mut self, state: &GameState, index: usize) -> Result<Move, EngineError> {
        let player = &state.players[index];
        if reachable(&state.grid, player.pos, player.goal(state.player_count())) {
            return self.select_random(state, index);
        }
        error!(index, "player has no path to their goal");
        Err(EngineError::UnreachableGoal { index })
    }

    /// Wall off the nearest opponent when they get close, otherwise step
    /// along a path that strictly shortens our own.
    fn select_greedy(
        &mut self,
        state: &GameState,
        index: usize,
        closeness: u32,
    ) -> Result<Move, EngineError> {
        let player = &state.players[index];
        if player.walls_remaining > 0
            && let Some((opp, opp_dist)) = nearest_opponent_distance(state, index)
            && opp_dist <= closeness
            && let Some(mv) = best_blocking_wall(state, index, opp)
        {
            return Ok(mv);
        }
        let Some(own) = path::distance(state, index) else {
            return self.blocked_fallback(state, index);
        };
        let mut best: Option<(u32, Move)> = None;
        for to in pawn_destinations(state, index) {
            let d = path::shortest_path_from(state, index, to)
                .map(|info| info.distance)
                .unwrap_or(u32::MAX);
            if d < own && best.as_ref().is_none_or(|&(bd, _)| d < bd) {
                best = Some((
                    d,
                    Move::Pawn {
                        player: player.id,
                        from: player.pos,
                        to,
                    },
                ));
            }
        }
        match best {
            Some((_, mv)) => Ok(mv),
            None => self.select_random(state, index),
        }
    }

    /// Two phases. While both sides are far from their goals and we are
    /// not badly behind, spend walls on the placement that slows the
    /// nearest opponent the most without hurting us. Otherwise run,
    /// breaking distance ties toward the center column.
    fn select_heuristic(&mut self, state: &GameState, index: usize) -> Result<Move, EngineError> {
        let player = &state.players[index];
        let Some(own) = path::distance(state, index) else {
            return self.blocked_fallback(state, index);
        };

        if player.walls_remaining > 0
            && let Some((opp, opp_dist)) = nearest_opponent_distance(state, index)
            && own > NEAR_GOAL
            && opp_dist > NEAR_GOAL
            && own as i64 <= opp_dist as i64 + BEHIND_MARGIN as i64
            && let Some(mv) = best_tradeoff_wall(state, index, opp, own)
        {
            return Ok(mv);
        }

        let mut best: Option<(u32, u8, Move)> = None;
        for to in pawn_destinations(state, index) {
            let d = path::shortest_path_from(state, index, to)
                .map(|info| info.distance)
                .unwrap_or(u32::MAX);
            let centrality = to.x.abs_diff(CENTER_COLUMN);
            if best
                .as_ref()
                .is_none_or(|&(bd, bc, _)| d < bd || (d == bd && centrality < bc))
            {
                best = Some((
                    d,
                    centrality,
                    Move::Pawn {
                        player: player.id,
                        from: player.pos,
                        to,
                    },
                ));
            }
        }
        match best {
            Some((_, _, mv)) => Ok(mv),
            None => self.select_random(state, index),
        }
    }

    fn select_mcts(
        &mut self,
        state: &GameState,
        index: usize,
        iterations: usize,
        exploration: f64,
    ) -> Result<Move, EngineError> {
        // Openings and wall-less endgames are pure racing; skip the search.
        let any_walls = state.players.iter().any(|p| p.walls_remaining > 0);
        if (state.history.len() < OPENING_MOVES || !any_walls)
            && let Some(mv) = path::shortest_path_move(state, index)
        {
            debug!(ply = state.history.len(), "shortcutting search with shortest-path step");
            return Ok(mv);
        }
        match mcts::search(state, index, iterations, exploration, &mut self.rng) {
            Ok(mv) => Ok(mv),
            Err(EngineError::NoLegalMoves) => Err(EngineError::NoLegalMoves),
            Err(_) => {
                let closeness = GREEDY_CLOSENESS_MEDIUM;
                self.select_greedy(state, index, closeness)
            }
        }
    }
}

/// The connected opponent nearest their goal, with that distance.
fn nearest_opponent_distance(state: &GameState, index: usize) -> Option<(usize, u32)> {
    state
        .players
        .iter()
        .filter(|p| p.connected && p.index != index)
        .filter_map(|p| path::distance(state, p.index).map(|d| (p.index, d)))
        .min_by_key(|&(_, d)| d)
}

/// Scan every anchor for the legal wall that lengthens `opp`'s path the
/// most. Returns `None` when no wall slows them at all.
fn best_blocking_wall(state: &GameState, index: usize, opp: usize) -> Option<Move> {
    let before = path::distance(state, opp)?;
    let mut scratch = state.clone();
    let mut best: Option<(u32, Move)> = None;
    for_each_anchor(|pos, orientation| {
        if !wall_is_legal(state, pos, orientation) {
            return;
        }
        scratch.grid = state.grid;
        scratch.grid.place(pos.x, pos.y, orientation);
        let after = path::distance(&scratch, opp).unwrap_or(u32::MAX);
        if after > before && best.as_ref().is_none_or(|&(bd, _)| after > bd) {
            best = Some((
                after,
                Move::Wall {
                    player: state.players[index].id,
                    pos,
                    orientation,
                },
            ));
        }
    });
    best.map(|(_, mv)| mv)
}

/// The wall maximizing opponent delay minus our own delay, subject to a
/// minimum opponent gain and a cap on self-harm. First-found wins ties.
fn best_tradeoff_wall(state: &GameState, index: usize, opp: usize, own: u32) -> Option<Move> {
    let opp_before = path::distance(state, opp)? as i64;
    let own_before = own as i64;
    let mut scratch = state.clone();
    let mut best: Option<(i64, Move)> = None;
    for_each_anchor(|pos, orientation| {
        if !wall_is_legal(state, pos, orientation) {
            return;
        }
        scratch.grid = state.grid;
        scratch.grid.place(pos.x, pos.y, orientation);
        let opp_delta = path::distance(&scratch, opp).unwrap_or(u32::MAX) as i64 - opp_before;
        let own_delta = path::distance(&scratch, index).unwrap_or(u32::MAX) as i64 - own_before;
        if opp_delta < MIN_OPPONENT_GAIN as i64 || own_delta > MAX_SELF_HARM as i64 {
            return;
        }
        let score = opp_delta - own_delta;
        if best.as_ref().is_none_or(|&(bs, _)| score > bs) {
            best = Some((
                score,
                Move::Wall {
                    player: state.players[index].id,
                    pos,
                    orientation,
                },
            ));
        }
    });
    best.map(|(_, mv)| mv)
}

fn for_each_anchor(mut f: impl FnMut(Pos, Orientation)) {
    for y in 0..WALL_N as u8 {
        for x in 0..WALL_N as u8 {
            let pos = Pos { x, y };
            f(pos, Orientation::Horizontal);
            f(pos, Orientation::Vertical);
        }
    }
}

/// One-shot selection at the standard tier mapping.
pub fn select_move(
    state: &GameState,
    player: PlayerId,
    difficulty: Difficulty,
) -> Result<Move, EngineError> {
    Strategy::for_difficulty(difficulty).select(state, player)
}
