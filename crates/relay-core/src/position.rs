//! Square grid coordinate system using (row, col) pairs.
//!
//! This module provides the coordinate types for the delivery board:
//! - `Position`: Identifies individual cells (row grows downward, col grows rightward)
//! - `Direction`: The four orthogonal steps a worker can take
//!
//! Coordinates are signed so that a requested destination outside the board can
//! still be represented and rejected by the engine instead of wrapping around.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Orthogonal step direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Up (row - 1)
    North,
    /// Right (col + 1)
    East,
    /// Down (row + 1)
    South,
    /// Left (col - 1)
    West,
}

impl Direction {
    /// All directions in clockwise order starting from North
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Row/column offset for one step in this direction
    pub const fn offset(&self) -> (i32, i32) {
        match self {
            Direction::North => (-1, 0),
            Direction::East => (0, 1),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
        }
    }
}

/// A cell coordinate on the board.
///
/// `(0, 0)` is the top-left corner where the worker starts; the delivery
/// target sits in the opposite corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Position {
    /// Row index (increases going down)
    pub row: i32,
    /// Column index (increases going right)
    pub col: i32,
}

impl Position {
    /// Create a new position
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The neighbouring cell one step in `direction` (may be off the board)
    pub fn neighbor(&self, direction: Direction) -> Position {
        let (dr, dc) = direction.offset();
        Position::new(self.row + dr, self.col + dc)
    }

    /// The four orthogonal neighbours in clockwise order starting from North
    pub fn neighbors(&self) -> [Position; 4] {
        Direction::ALL.map(|dir| self.neighbor(dir))
    }

    /// Manhattan distance: |dr| + |dc|
    pub fn distance_to(&self, other: &Position) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Whether `other` is exactly one orthogonal step away
    pub fn is_adjacent(&self, other: &Position) -> bool {
        self.distance_to(other) == 1
    }

    /// Whether this position lies on a square board of side `size`
    pub fn in_bounds(&self, size: usize) -> bool {
        let size = size as i32;
        (0..size).contains(&self.row) && (0..size).contains(&self.col)
    }

    /// Row-major index on a square board of side `size`.
    ///
    /// Returns `None` when the position is off the board.
    pub fn to_index(&self, size: usize) -> Option<usize> {
        if self.in_bounds(size) {
            Some(self.row as usize * size + self.col as usize)
        } else {
            None
        }
    }

    /// Inverse of [`Position::to_index`]
    pub fn from_index(index: usize, size: usize) -> Self {
        Self::new((index / size) as i32, (index % size) as i32)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(i32, i32)> for Position {
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}
