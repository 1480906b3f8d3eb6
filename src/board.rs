//! Board geometry and connectivity.
//!
//! This module provides the static board model for Quoridor:
//! - Cell coordinates and bounds-checked orthogonal stepping
//! - Goal edges assigned by player index and player count
//! - The wall grid: bit-set occupancy over the 8x8 anchor grid, with O(1)
//!   edge-blocking and overlap queries
//! - Breadth-first reachability from a cell to a goal edge
//!
//! A wall anchor at `(x, y)` sits on the crossing between the four cells
//! `(x, y)`, `(x+1, y)`, `(x, y+1)` and `(x+1, y+1)`. A horizontal wall
//! there blocks the edges `(x,y)-(x,y+1)` and `(x+1,y)-(x+1,y+1)`; a
//! vertical wall blocks `(x,y)-(x+1,y)` and `(x,y+1)-(x+1,y+1)`.

use std::fmt;

use crate::constants::{CELLS, N, WALL_N};

/// A cell on the 9x9 board, `0 <= x, y <= 8`. `y` grows toward row 8.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: u8,
    pub y: u8,
}

/// The four orthogonal step directions: up, right, down, left.
pub const DIRECTIONS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

impl Pos {
    /// Create a position, returning `None` when out of bounds.
    pub fn new(x: u8, y: u8) -> Option<Pos> {
        if (x as usize) < N && (y as usize) < N {
            Some(Pos { x, y })
        } else {
            None
        }
    }

    /// Index into a flat `CELLS`-sized array.
    #[inline]
    pub fn index(self) -> usize {
        self.y as usize * N + self.x as usize
    }

    /// Step by `(dx, dy)`, returning `None` when the result is off-board.
    pub fn offset(self, dx: i8, dy: i8) -> Option<Pos> {
        let x = self.x as i16 + dx as i16;
        let y = self.y as i16 + dy as i16;
        if (0..N as i16).contains(&x) && (0..N as i16).contains(&y) {
            Some(Pos {
                x: x as u8,
                y: y as u8,
            })
        } else {
            None
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Orientation of a wall segment.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// One-letter form used by the text protocol (`h` / `v`).
    pub fn letter(self) -> char {
        match self {
            Orientation::Horizontal => 'h',
            Orientation::Vertical => 'v',
        }
    }
}

/// The edge a player must reach to win: a full row or column.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Goal {
    Row(u8),
    Col(u8),
}

impl Goal {
    /// Whether a cell lies on this goal edge.
    #[inline]
    pub fn contains(self, p: Pos) -> bool {
        match self {
            Goal::Row(y) => p.y == y,
            Goal::Col(x) => p.x == x,
        }
    }
}

/// Goal edge for a player index, given the player count.
///
/// Two players race across rows; four players get one edge each, goals
/// opposite their start edge.
pub fn goal_for(index: usize, player_count: usize) -> Goal {
    let last = (N - 1) as u8;
    if player_count == 4 {
        match index {
            0 => Goal::Row(0),
            1 => Goal::Col(0),
            2 => Goal::Col(last),
            _ => Goal::Row(last),
        }
    } else if index == 0 {
        Goal::Row(last)
    } else {
        Goal::Row(0)
    }
}

/// Start position for a player index: the center of the edge opposite
/// their goal.
pub fn start_for(index: usize, player_count: usize) -> Pos {
    let mid = (N / 2) as u8;
    let last = (N - 1) as u8;
    if player_count == 4 {
        match index {
            0 => Pos { x: mid, y: last },
            1 => Pos { x: last, y: mid },
            2 => Pos { x: 0, y: mid },
            _ => Pos { x: mid, y: 0 },
        }
    } else if index == 0 {
        Pos { x: mid, y: 0 }
    } else {
        Pos { x: mid, y: last }
    }
}

/// Occupancy of the 8x8 wall anchor grid, one bit set per placed wall.
///
/// Cheap to copy, which keeps hypothetical placements during legality
/// checks and search allocation-free.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct WallGrid {
    horizontal: u64,
    vertical: u64,
}

impl WallGrid {
    /// Empty grid.
    pub fn new() -> WallGrid {
        WallGrid::default()
    }

    #[inline]
    fn bit(x: u8, y: u8) -> u64 {
        1u64 << (y as usize * WALL_N + x as usize)
    }

    /// Whether a wall occupies the anchor. Out-of-range anchors read as
    /// unoccupied.
    #[inline]
    pub fn has(&self, x: u8, y: u8, orientation: Orientation) -> bool {
        if x as usize >= WALL_N || y as usize >= WALL_N {
            return false;
        }
        let bits = match orientation {
            Orientation::Horizontal => self.horizontal,
            Orientation::Vertical => self.vertical,
        };
        bits & Self::bit(x, y) != 0
    }

    /// Occupy an anchor. The caller checks legality first.
    pub fn place(&mut self, x: u8, y: u8, orientation: Orientation) {
        match orientation {
            Orientation::Horizontal => self.horizontal |= Self::bit(x, y),
            Orientation::Vertical => self.vertical |= Self::bit(x, y),
        }
    }

    /// Number of walls placed.
    pub fn count(&self) -> u32 {
        self.horizontal.count_ones() + self.vertical.count_ones()
    }

    /// Whether an anchor is geometrically available: inside the `[0, 7]`
    /// anchor range (an anchor touching index 8 would lie on or protrude
    /// past the boundary line and is rejected before any connectivity
    /// check), not already occupied in either orientation at the same
    /// crossing, and not overlapping a parallel neighbor along its run.
    pub fn is_open(&self, x: u8, y: u8, orientation: Orientation) -> bool {
        if x as usize >= WALL_N || y as usize >= WALL_N {
            return false;
        }
        // Same crossing: either orientation conflicts.
        if self.has(x, y, Orientation::Horizontal) || self.has(x, y, Orientation::Vertical) {
            return false;
        }
        match orientation {
            Orientation::Horizontal => {
                !(x > 0 && self.has(x - 1, y, Orientation::Horizontal))
                    && !self.has(x + 1, y, Orientation::Horizontal)
            }
            Orientation::Vertical => {
                !(y > 0 && self.has(x, y - 1, Orientation::Vertical))
                    && !self.has(x, y + 1, Orientation::Vertical)
            }
        }
    }

    /// Whether a wall blocks the edge between two orthogonally adjacent
    /// cells. Non-adjacent pairs are never blocked by this test.
    pub fn blocks(&self, from: Pos, to: Pos) -> bool {
        if from.x == to.x && from.y.abs_diff(to.y) == 1 {
            // Vertical step: blocked by a horizontal wall on the line
            // between the two rows.
            let y = from.y.min(to.y);
            self.has(from.x, y, Orientation::Horizontal)
                || (from.x > 0 && self.has(from.x - 1, y, Orientation::Horizontal))
        } else if from.y == to.y && from.x.abs_diff(to.x) == 1 {
            // Horizontal step: blocked by a vertical wall on the line
            // between the two columns.
            let x = from.x.min(to.x);
            self.has(x, from.y, Orientation::Vertical)
                || (from.y > 0 && self.has(x, from.y - 1, Orientation::Vertical))
        } else {
            false
        }
    }
}

/// Breadth-first reachability from `from` to any cell of `goal`, using raw
/// orthogonal edges not blocked by `grid`.
///
/// Pawn jump and side-step rules do not apply here; connectivity only cares
/// whether a path of single steps exists, ignoring pawns. Runs on fixed
/// arrays with no heap allocation, since it is called once per candidate
/// wall placement in hot search paths.
pub fn reachable(grid: &WallGrid, from: Pos, goal: Goal) -> bool {
    if goal.contains(from) {
        return true;
    }
    let mut visited = [false; CELLS];
    let mut queue = [from; CELLS];
    let mut head = 0;
    let mut tail = 1;
    visited[from.index()] = true;

    while head < tail {
        let p = queue[head];
        head += 1;
        for (dx, dy) in DIRECTIONS {
            let Some(q) = p.offset(dx, dy) else { continue };
            if visited[q.index()] || grid.blocks(p, q) {
                continue;
            }
            if goal.contains(q) {
                return true;
            }
            visited[q.index()] = true;
            queue[tail] = q;
            tail += 1;
        }
    }
    false
}
