//! Constants for board geometry, wall allowances, and AI parameters.
//!
//! This module collects the tunable parameters of the engine: the board
//! dimensions, the per-player wall counts, and the knobs for the greedy,
//! rule-based and MCTS strategies.

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN cells). Quoridor is played on a 9x9 board.
pub const N: usize = 9;

/// Number of cells on the board.
pub const CELLS: usize = N * N;

/// Side length of the wall anchor grid. A wall anchor sits on the crossing
/// between four cells, so there are (N-1) x (N-1) anchors.
pub const WALL_N: usize = N - 1;

/// Theoretical upper bound on any shortest path, used to normalize
/// path-length deltas into roughly [-1, 1].
pub const MAX_PATH_LEN: f64 = CELLS as f64;

/// Center column, used as a tie-breaker by the rule-based run phase.
pub const CENTER_COLUMN: u8 = (N / 2) as u8;

// =============================================================================
// Wall Allowances
// =============================================================================

/// Walls per player in a two-player game.
pub const WALLS_TWO_PLAYER: u8 = 10;

/// Walls per player in a four-player game.
pub const WALLS_FOUR_PLAYER: u8 = 5;

// =============================================================================
// MCTS Parameters
// =============================================================================

/// Iteration budget for the easy MCTS tier.
pub const MCTS_SIMS_EASY: usize = 200;

/// Iteration budget for the medium MCTS tier.
pub const MCTS_SIMS_MEDIUM: usize = 600;

/// Iteration budget for the hard MCTS tier.
pub const MCTS_SIMS_HARD: usize = 1500;

/// UCB1 exploration constant for the easy tier (explores widely).
pub const MCTS_UCB_EASY: f64 = 1.6;

/// UCB1 exploration constant for the medium tier.
pub const MCTS_UCB_MEDIUM: f64 = 1.41;

/// UCB1 exploration constant for the hard tier (exploits harder).
pub const MCTS_UCB_HARD: f64 = 1.2;

/// Weight of the shortest-path heuristic bias added to the UCB1 score.
/// Small enough that visit statistics dominate once a child is explored.
pub const MCTS_BIAS_WEIGHT: f64 = 0.15;

/// Number of top path-blocking walls kept when curating the untried-move
/// set for opponent turns during tree growth.
pub const MCTS_TOP_WALLS: usize = 6;

/// Minimum empirical win rate a wall move needs at the root; below this the
/// search falls back to the shortest-path pawn move.
pub const MCTS_MIN_WALL_CONFIDENCE: f64 = 0.35;

/// Number of opening plies during which search is skipped in favor of the
/// shortest-path pawn move.
pub const OPENING_MOVES: usize = 4;

// =============================================================================
// Rollout (simulation) Parameters
// =============================================================================

/// Maximum rollout depth in plies before the position is scored heuristically.
pub const ROLLOUT_DEPTH: usize = 60;

/// Probability that a rollout ply picks the best path-delta move instead of
/// a random one.
pub const ROLLOUT_BIAS: f64 = 0.75;

/// Path advantage (in moves) at which a rollout is cut off as decisive.
pub const ROLLOUT_DECISIVE: i32 = 6;

/// Probability that the random branch of a rollout ply tries a wall
/// placement instead of a pawn move.
pub const ROLLOUT_WALL_PROB: f64 = 0.2;

/// Random wall anchors sampled per rollout wall attempt before giving up.
pub const ROLLOUT_WALL_TRIES: usize = 4;

/// Scale of the sigmoid mapping a path advantage to a [0, 1] reward.
pub const SIGMOID_SCALE: f64 = 2.0;

// =============================================================================
// Greedy / Rule-Based Parameters
// =============================================================================

/// Closeness threshold for the greedy blocking strategy at easy difficulty:
/// an opponent at or below this distance triggers the wall scan.
pub const GREEDY_CLOSENESS_EASY: u32 = 3;

/// Greedy closeness threshold at medium difficulty.
pub const GREEDY_CLOSENESS_MEDIUM: u32 = 4;

/// Greedy closeness threshold at hard difficulty.
pub const GREEDY_CLOSENESS_HARD: u32 = 5;

/// Rule-based wall phase: a player this close to their goal stops
/// considering walls and just runs.
pub const NEAR_GOAL: u32 = 2;

/// Rule-based wall phase: minimum distance a wall must add to the
/// opponent's path to be worth playing.
pub const MIN_OPPONENT_GAIN: i32 = 1;

/// Rule-based wall phase: maximum distance a wall may add to our own path.
pub const MAX_SELF_HARM: i32 = 1;

/// Rule-based wall phase: walls are only considered when we are not behind
/// by more than this margin.
pub const BEHIND_MARGIN: i32 = 2;
