//! Undo history.
//!
//! Every accepted mutating command pushes a full copy of the mutable part of
//! the game state before it runs. Undo pops and restores the latest copy.
//! The board is tiny, so cloning it per command is cheaper than keeping
//! per-command inverse deltas.

use crate::board::Board;
use crate::position::Position;
use serde::{Deserialize, Serialize};

/// The rolled-back portion of a game state.
///
/// Session-level fields (difficulty, target, goal, game-over flag) are not
/// part of a snapshot and are never touched by undo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub board: Board,
    pub player_position: Position,
    pub moves_remaining: u32,
    pub carried_resources: u32,
    pub delivered_resources: u32,
    pub score: u32,
}

/// Stack of snapshots, newest last
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    entries: Vec<Snapshot>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, snapshot: Snapshot) {
        self.entries.push(snapshot);
    }

    pub fn pop(&mut self) -> Option<Snapshot> {
        self.entries.pop()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
