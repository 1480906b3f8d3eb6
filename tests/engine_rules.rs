//! Rules regression suite: move legality, wall geometry, jump rules,
//! turn rotation, and the reachability invariant, exercised through the
//! public crate API the way a game server would drive it.

use quoridor_engine::board::{Orientation, Pos};
use quoridor_engine::constants::{N, WALLS_FOUR_PLAYER, WALLS_TWO_PLAYER};
use quoridor_engine::path::distance;
use quoridor_engine::rules::{moves_for_index, pawn_destinations, valid_moves, validate_move};
use quoridor_engine::state::{
    GameState, Move, PlayerId, Status, apply_move, create_game, forfeit,
};

// =============================================================================
// Helper functions
// =============================================================================

fn two_player() -> GameState {
    create_game(&[PlayerId(1), PlayerId(2)], 2).unwrap()
}

fn four_player() -> GameState {
    create_game(&[PlayerId(1), PlayerId(2), PlayerId(3), PlayerId(4)], 4).unwrap()
}

/// Apply a scripted sequence of pawn destinations, alternating turns.
fn play_pawns(mut game: GameState, steps: &[(u8, u8)]) -> GameState {
    for &(x, y) in steps {
        let mover = game.current_player();
        let mv = Move::Pawn {
            player: mover.id,
            from: mover.pos,
            to: Pos { x, y },
        };
        game = apply_move(&game, &mv).unwrap();
    }
    game
}

/// Place a wall for the current player.
fn place_wall(game: &GameState, x: u8, y: u8, orientation: Orientation) -> GameState {
    let mv = Move::Wall {
        player: game.current_player().id,
        pos: Pos { x, y },
        orientation,
    };
    apply_move(game, &mv).unwrap()
}

// =============================================================================
// Game setup
// =============================================================================

#[test]
fn test_two_player_setup() {
    let game = two_player();
    assert_eq!(game.status, Status::Playing);
    assert_eq!(game.players[0].pos, Pos { x: 4, y: 0 });
    assert_eq!(game.players[1].pos, Pos { x: 4, y: N as u8 - 1 });
    assert!(game.players.iter().all(|p| p.walls_remaining == WALLS_TWO_PLAYER));
    assert_eq!(game.current, 0);
}

#[test]
fn test_four_player_setup() {
    let game = four_player();
    assert!(game.players.iter().all(|p| p.walls_remaining == WALLS_FOUR_PLAYER));
    let positions: Vec<Pos> = game.players.iter().map(|p| p.pos).collect();
    assert_eq!(positions.len(), 4);
    // All four start on distinct edge midpoints.
    for (i, a) in positions.iter().enumerate() {
        for b in &positions[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn test_rejects_wrong_player_counts() {
    assert!(create_game(&[PlayerId(1)], 2).is_err());
    assert!(create_game(&[PlayerId(1), PlayerId(2), PlayerId(3)], 4).is_err());
    assert!(create_game(&[PlayerId(1), PlayerId(1)], 2).is_err());
}

// =============================================================================
// Turn rotation
// =============================================================================

#[test]
fn test_round_robin_cycles_through_all_players() {
    let mut game = four_player();
    let order: Vec<usize> = (0..8)
        .map(|_| {
            let idx = game.current;
            let mover = game.current_player();
            let to = pawn_destinations(&game, idx)[0];
            let mv = Move::Pawn {
                player: mover.id,
                from: mover.pos,
                to,
            };
            game = apply_move(&game, &mv).unwrap();
            idx
        })
        .collect();
    assert_eq!(order, vec![0, 1, 2, 3, 0, 1, 2, 3]);
}

#[test]
fn test_out_of_turn_move_is_rejected() {
    let game = two_player();
    let mv = Move::Pawn {
        player: PlayerId(2),
        from: Pos { x: 4, y: 8 },
        to: Pos { x: 4, y: 7 },
    };
    assert!(apply_move(&game, &mv).is_err());
}

#[test]
fn test_forfeit_skips_player_in_rotation() {
    let game = four_player();
    let game = forfeit(&game, PlayerId(3)).unwrap();
    assert_eq!(game.status, Status::Playing);
    // Play around the table: seat 2 never gets a turn.
    let mut game = game;
    let mut seats = Vec::new();
    for _ in 0..6 {
        seats.push(game.current);
        let mover = game.current_player();
        let to = pawn_destinations(&game, game.current)[0];
        let mv = Move::Pawn {
            player: mover.id,
            from: mover.pos,
            to,
        };
        game = apply_move(&game, &mv).unwrap();
    }
    assert!(!seats.contains(&2));
}

#[test]
fn test_forfeit_down_to_one_ends_the_game() {
    let game = two_player();
    let game = forfeit(&game, PlayerId(2)).unwrap();
    assert_eq!(game.status, Status::Finished);
    assert_eq!(game.winner, Some(PlayerId(1)));
}

// =============================================================================
// Wall geometry
// =============================================================================

#[test]
fn test_wall_blocks_both_covered_edges() {
    let game = two_player();
    let game = place_wall(&game, 3, 0, Orientation::Horizontal);
    // Covered cells (3,0) and (4,0) can no longer step up.
    assert!(!pawn_destinations(&game, 1).is_empty());
    let game = play_pawns(game, &[(4, 7)]);
    // Back to player 1, pawn at (4,0): up is walled off.
    let dests = pawn_destinations(&game, 0);
    assert!(!dests.contains(&Pos { x: 4, y: 1 }));
    assert!(dests.contains(&Pos { x: 3, y: 0 }));
    assert!(dests.contains(&Pos { x: 5, y: 0 }));
}

#[test]
fn test_overlapping_and_crossing_walls_are_rejected() {
    let game = two_player();
    let game = place_wall(&game, 3, 3, Orientation::Horizontal);
    let game = play_pawns(game, &[(4, 7)]);

    for (x, y, orientation) in [
        (3, 3, Orientation::Horizontal), // exact duplicate
        (2, 3, Orientation::Horizontal), // parallel overlap from the left
        (4, 3, Orientation::Horizontal), // parallel overlap from the right
        (3, 3, Orientation::Vertical),   // crossing at the same anchor
    ] {
        let mv = Move::Wall {
            player: PlayerId(1),
            pos: Pos { x, y },
            orientation,
        };
        assert!(apply_move(&game, &mv).is_err(), "wall ({x},{y}) should be rejected");
    }

    // Adjacent but non-overlapping placements stay legal.
    let mv = Move::Wall {
        player: PlayerId(1),
        pos: Pos { x: 2, y: 3 },
        orientation: Orientation::Vertical,
    };
    assert!(apply_move(&game, &mv).is_ok());
}

#[test]
fn test_out_of_range_anchor_is_rejected() {
    let game = two_player();
    for (x, y) in [(8, 4), (4, 8), (8, 8)] {
        for orientation in [Orientation::Horizontal, Orientation::Vertical] {
            let mv = Move::Wall {
                player: PlayerId(1),
                pos: Pos { x, y },
                orientation,
            };
            assert!(apply_move(&game, &mv).is_err());
        }
    }
}

#[test]
fn test_wall_allowance_is_spent_and_enforced() {
    let mut game = two_player();
    game.players[0].walls_remaining = 1;
    let game = place_wall(&game, 0, 0, Orientation::Vertical);
    assert_eq!(game.players[0].walls_remaining, 0);
    let game = play_pawns(game, &[(4, 7)]);

    // No wall moves remain in the move list and direct placement fails.
    let moves = valid_moves(&game, PlayerId(1)).unwrap();
    assert!(moves.iter().all(|m| matches!(m, Move::Pawn { .. })));
    let mv = Move::Wall {
        player: PlayerId(1),
        pos: Pos { x: 5, y: 5 },
        orientation: Orientation::Horizontal,
    };
    assert!(apply_move(&game, &mv).is_err());
}

#[test]
fn test_wall_sealing_a_player_in_is_rejected() {
    let mut game = two_player();
    // Box player 2 against their own goal row corner.
    game.players[1].pos = Pos { x: 0, y: 8 };
    game.grid.place(0, 7, Orientation::Horizontal);
    // The vertical wall at (1,7) would close the last gap out of the
    // corner cells (0,8) and (1,8).
    let mv = Move::Wall {
        player: PlayerId(1),
        pos: Pos { x: 1, y: 7 },
        orientation: Orientation::Vertical,
    };
    assert!(!validate_move(&game, &mv));
    assert!(apply_move(&game, &mv).is_err());
}

#[test]
fn test_rejected_wall_leaves_state_unchanged() {
    let game = two_player();
    let mv = Move::Wall {
        player: PlayerId(1),
        pos: Pos { x: 8, y: 0 },
        orientation: Orientation::Horizontal,
    };
    let before_walls = game.grid.count();
    assert!(apply_move(&game, &mv).is_err());
    assert_eq!(game.grid.count(), before_walls);
    assert_eq!(game.current, 0);
    assert!(game.history.is_empty());
    // Rejection is idempotent.
    assert!(apply_move(&game, &mv).is_err());
}

// =============================================================================
// Jumps and distances
// =============================================================================

#[test]
fn test_straight_jump_over_adjacent_pawn() {
    let mut game = two_player();
    game.players[0].pos = Pos { x: 4, y: 3 };
    game.players[1].pos = Pos { x: 4, y: 4 };
    let dests = pawn_destinations(&game, 0);
    assert!(dests.contains(&Pos { x: 4, y: 5 }));
    assert!(!dests.contains(&Pos { x: 4, y: 4 }));
}

#[test]
fn test_diagonal_side_step_when_jump_is_walled() {
    let mut game = two_player();
    game.players[0].pos = Pos { x: 4, y: 3 };
    game.players[1].pos = Pos { x: 4, y: 4 };
    // Wall behind the opponent blocks the straight jump.
    game.grid.place(3, 4, Orientation::Horizontal);
    let dests = pawn_destinations(&game, 0);
    assert!(!dests.contains(&Pos { x: 4, y: 5 }));
    assert!(dests.contains(&Pos { x: 3, y: 4 }));
    assert!(dests.contains(&Pos { x: 5, y: 4 }));
}

#[test]
fn test_starting_distance_is_eight() {
    let game = two_player();
    assert_eq!(distance(&game, 0), Some(8));
    assert_eq!(distance(&game, 1), Some(8));
}

#[test]
fn test_wall_near_goal_forces_detour() {
    let game = two_player();
    let game = place_wall(&game, 3, 7, Orientation::Horizontal);
    // Player 2's first step from (4,8) toward row 0 is walled off.
    assert!(distance(&game, 1).unwrap() >= 9);
    assert_eq!(distance(&game, 0), Some(8));
}

// =============================================================================
// Winning
// =============================================================================

#[test]
fn test_reaching_the_goal_row_wins() {
    let mut game = two_player();
    game.players[0].pos = Pos { x: 2, y: 7 };
    let mv = Move::Pawn {
        player: PlayerId(1),
        from: Pos { x: 2, y: 7 },
        to: Pos { x: 2, y: 8 },
    };
    let game = apply_move(&game, &mv).unwrap();
    assert_eq!(game.status, Status::Finished);
    assert_eq!(game.winner, Some(PlayerId(1)));

    // No moves are accepted after the game ends.
    let follow = Move::Pawn {
        player: PlayerId(2),
        from: Pos { x: 4, y: 8 },
        to: Pos { x: 4, y: 7 },
    };
    assert!(apply_move(&game, &follow).is_err());
}

// =============================================================================
// Invariants under random legal play
// =============================================================================

#[test]
fn test_invariants_hold_under_random_legal_play() {
    let mut rng = fastrand::Rng::with_seed(0xC0FFEE);
    for _ in 0..5 {
        let mut game = two_player();
        for _ in 0..60 {
            if game.status != Status::Playing {
                break;
            }
            let moves = moves_for_index(&game, game.current);
            assert!(!moves.is_empty());
            let mv = moves[rng.usize(0..moves.len())];
            assert!(validate_move(&game, &mv));
            game = apply_move(&game, &mv).unwrap();

            // Both players always keep a path to their goal.
            for p in &game.players {
                assert!(distance(&game, p.index).is_some());
            }
            // Pawns never share a cell.
            assert_ne!(game.players[0].pos, game.players[1].pos);
            // Placed walls never exceed the combined allowance.
            assert!(game.grid.count() <= 2 * WALLS_TWO_PLAYER as u32);
        }
    }
}
