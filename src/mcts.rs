//! Monte Carlo Tree Search over simulated game futures.
//!
//! The tree lives in an arena: nodes are addressed by index and hold a
//! parent index plus a child index list, so selection walks down and
//! backpropagation walks up without ownership cycles. Child selection uses
//! UCB1 with a small shortest-path bias; expansion pops one untried move
//! per iteration; leaf evaluation runs a biased playout; the final answer
//! is the most-visited root child (the robust statistic under UCB1).
//!
//! Branching is kept tractable by curating the untried-move set on
//! opponent turns: the shortest-path step plus the top path-blocking walls
//! near the pawns, instead of the full 100+ move list.

use tracing::debug;

use crate::board::{Orientation, Pos};
use crate::constants::{
    MAX_PATH_LEN, MCTS_BIAS_WEIGHT, MCTS_MIN_WALL_CONFIDENCE, MCTS_TOP_WALLS, WALL_N,
};
use crate::error::EngineError;
use crate::path;
use crate::playout::{advantage, rollout};
use crate::rules::{moves_for_index, wall_is_legal};
use crate::state::{GameState, Move, Status, apply_move};

/// One node of the search tree.
struct Node {
    state: GameState,
    /// The move that produced this state; `None` at the root.
    mv: Option<Move>,
    /// Index of the player who made `mv`.
    mover: Option<usize>,
    parent: Option<usize>,
    children: Vec<usize>,
    untried: Vec<Move>,
    visits: u32,
    /// Accumulated reward from the viewpoint of `mover`.
    value: f64,
    /// Normalized path-delta of `mv` for its mover, in roughly [-1, 1].
    bias: f64,
}

struct Tree {
    nodes: Vec<Node>,
    perspective: usize,
    exploration: f64,
}

impl Tree {
    fn new(state: &GameState, perspective: usize, exploration: f64) -> Tree {
        let untried = untried_moves(state, perspective);
        Tree {
            nodes: vec![Node {
                state: state.clone(),
                mv: None,
                mover: None,
                parent: None,
                children: Vec::new(),
                untried,
                visits: 0,
                value: 0.0,
                bias: 0.0,
            }],
            perspective,
            exploration,
        }
    }

    /// Descend from the root to a node that still has untried moves or is
    /// terminal, picking the highest-scoring child at each level.
    fn select(&self) -> usize {
        let mut idx = 0;
        loop {
            let node = &self.nodes[idx];
            if !node.untried.is_empty()
                || node.children.is_empty()
                || node.state.status == Status::Finished
            {
                return idx;
            }
            idx = match self.best_child(idx) {
                Some(child) => child,
                None => return idx,
            };
        }
    }

    /// UCB1 with heuristic bias; unvisited children have infinite priority.
    fn best_child(&self, idx: usize) -> Option<usize> {
        let parent_visits = self.nodes[idx].visits.max(1) as f64;
        let score = |c: usize| -> f64 {
            let node = &self.nodes[c];
            if node.visits == 0 {
                return f64::INFINITY;
            }
            let v = node.visits as f64;
            let exploitation = node.value / v;
            let exploration = self.exploration * (parent_visits.ln() / v).sqrt();
            exploitation + exploration + MCTS_BIAS_WEIGHT * node.bias
        };
        self.nodes[idx]
            .children
            .iter()
            .copied()
            .max_by(|&a, &b| {
                score(a)
                    .partial_cmp(&score(b))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    /// Pop one untried move of `idx` and add the resulting child node.
    fn expand(&mut self, idx: usize, rng: &mut fastrand::Rng) -> Option<usize> {
        let pick = {
            let untried = &mut self.nodes[idx].untried;
            if untried.is_empty() {
                return None;
            }
            untried.swap_remove(rng.usize(0..untried.len()))
        };
        let parent_state = &self.nodes[idx].state;
        let mover = parent_state.current;
        let child_state = apply_move(parent_state, &pick).ok()?;
        let bias =
            (advantage(&child_state, mover) - advantage(parent_state, mover)) as f64 / MAX_PATH_LEN;
        let untried = untried_moves(&child_state, self.perspective);
        let child = Node {
            state: child_state,
            mv: Some(pick),
            mover: Some(mover),
            parent: Some(idx),
            children: Vec::new(),
            untried,
            visits: 0,
            value: 0.0,
            bias,
        };
        self.nodes.push(child);
        let child_idx = self.nodes.len() - 1;
        self.nodes[idx].children.push(child_idx);
        Some(child_idx)
    }

    /// Propagate a reward (for the perspective player) up the parent chain.
    fn backpropagate(&mut self, mut idx: usize, reward: f64) {
        loop {
            let node = &mut self.nodes[idx];
            node.visits += 1;
            node.value += match node.mover {
                Some(mover) if mover != self.perspective => 1.0 - reward,
                _ => reward,
            };
            match node.parent {
                Some(parent) => idx = parent,
                None => break,
            }
        }
    }
}

/// Untried-move set for a node: the full legal-move list on the searching
/// player's turns, a curated strategic subset on opponent turns.
fn untried_moves(state: &GameState, perspective: usize) -> Vec<Move> {
    if state.status != Status::Playing {
        return Vec::new();
    }
    if state.current == perspective {
        moves_for_index(state, state.current)
    } else {
        curated_moves(state, state.current)
    }
}

/// Strategic subset for tree growth: the shortest-path step plus the
/// top-scoring legal walls near any pawn, ranked by how much they slow the
/// mover's nearest opponent.
fn curated_moves(state: &GameState, side: usize) -> Vec<Move> {
    let mut moves = Vec::new();
    if let Some(mv) = path::shortest_path_move(state, side) {
        moves.push(mv);
    }

    let player = &state.players[side];
    if player.walls_remaining > 0
        && let Some(opp) = nearest_opponent(state, side)
    {
        let before = path::distance(state, opp).unwrap_or(0) as i64;
        let mut scratch = state.clone();
        let mut scored: Vec<(i64, Move)> = Vec::new();
        for (pos, orientation) in candidate_anchors(state) {
            if !wall_is_legal(state, pos, orientation) {
                continue;
            }
            scratch.grid = state.grid;
            scratch.grid.place(pos.x, pos.y, orientation);
            let after = path::distance(&scratch, opp).unwrap_or(0) as i64;
            if after > before {
                scored.push((
                    after - before,
                    Move::Wall {
                        player: player.id,
                        pos,
                        orientation,
                    },
                ));
            }
        }
        scored.sort_by_key(|&(gain, _)| std::cmp::Reverse(gain));
        moves.extend(scored.into_iter().take(MCTS_TOP_WALLS).map(|(_, mv)| mv));
    }

    if moves.is_empty() {
        // Degenerate position; fall back to the full move list.
        moves = moves_for_index(state, side);
    }
    moves
}

/// The connected opponent of `side` closest to their own goal.
fn nearest_opponent(state: &GameState, side: usize) -> Option<usize> {
    state
        .players
        .iter()
        .filter(|p| p.connected && p.index != side)
        .filter_map(|p| path::distance(state, p.index).map(|d| (d, p.index)))
        .min_by_key(|&(d, _)| d)
        .map(|(_, index)| index)
}

/// Wall anchors within one ring of any connected pawn, both orientations.
fn candidate_anchors(state: &GameState) -> Vec<(Pos, Orientation)> {
    let mut seen = [[false; WALL_N]; WALL_N];
    let mut anchors = Vec::new();
    for p in state.players.iter().filter(|p| p.connected) {
        let (cx, cy) = (p.pos.x as i16, p.pos.y as i16);
        for y in cy - 2..=cy + 1 {
            for x in cx - 2..=cx + 1 {
                if (0..WALL_N as i16).contains(&x)
                    && (0..WALL_N as i16).contains(&y)
                    && !seen[y as usize][x as usize]
                {
                    seen[y as usize][x as usize] = true;
                    let pos = Pos {
                        x: x as u8,
                        y: y as u8,
                    };
                    anchors.push((pos, Orientation::Horizontal));
                    anchors.push((pos, Orientation::Vertical));
                }
            }
        }
    }
    anchors
}

/// Run MCTS from `state` for the player at `perspective` and return the
/// best move found.
pub fn search(
    state: &GameState,
    perspective: usize,
    iterations: usize,
    exploration: f64,
    rng: &mut fastrand::Rng,
) -> Result<Move, EngineError> {
    let mut tree = Tree::new(state, perspective, exploration);
    if tree.nodes[0].untried.is_empty() {
        return Err(EngineError::NoLegalMoves);
    }

    for _ in 0..iterations {
        let selected = tree.select();
        let leaf = tree.expand(selected, rng).unwrap_or(selected);
        let reward = rollout(&tree.nodes[leaf].state, perspective, rng);
        tree.backpropagate(leaf, reward);
    }

    let best = tree.nodes[0]
        .children
        .iter()
        .copied()
        .max_by_key(|&c| tree.nodes[c].visits)
        .ok_or(EngineError::NoLegalMoves)?;
    let node = &tree.nodes[best];
    let win_rate = if node.visits > 0 {
        node.value / node.visits as f64
    } else {
        0.0
    };
    let mut chosen = node.mv.ok_or(EngineError::NoLegalMoves)?;
    debug!(
        iterations,
        children = tree.nodes[0].children.len(),
        visits = node.visits,
        win_rate,
        %chosen,
        "mcts search finished"
    );

    // A low-confidence wall is riskier than just racing: override it with
    // the shortest-path step when the statistics do not back it up.
    if matches!(chosen, Move::Wall { .. })
        && win_rate < MCTS_MIN_WALL_CONFIDENCE
        && let Some(mv) = path::shortest_path_move(state, perspective)
    {
        debug!(win_rate, "overriding low-confidence wall with pawn move");
        chosen = mv;
    }
    Ok(chosen)
}
