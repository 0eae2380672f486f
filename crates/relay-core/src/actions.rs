//! Commands the player can issue and the events they produce.
//!
//! Shells translate input into a [`GameAction`], hand it to the engine, and
//! render the returned [`GameEvent`]s.

use crate::config::Difficulty;
use crate::position::{Direction, Position};
use serde::{Deserialize, Serialize};

/// All commands that change the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameAction {
    /// Move the worker to a cell
    Move(Position),
    /// Move the worker one cell in a direction
    Step(Direction),
    /// Pick up the resources on the current cell
    Collect,
    /// Hand in carried resources at the target
    Deliver,
    /// Roll back the last accepted command
    Undo,
    /// Start a new session at another difficulty
    SetDifficulty(Difficulty),
    /// Start a new session at the current difficulty
    Reset,
}

/// Events that occur as a result of actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A fresh board was dealt
    SessionStarted { difficulty: Difficulty },

    /// The worker moved
    Moved {
        from: Position,
        to: Position,
        moves_remaining: u32,
    },

    /// A bonus cell was consumed
    BonusCollected { position: Position, moves: u32 },

    /// Resources were picked up
    ResourcesCollected {
        position: Position,
        amount: u32,
        carried: u32,
    },

    /// Carried resources were handed in at the target
    ResourcesDelivered { amount: u32, total: u32 },

    /// Delivery goal reached
    GameWon { score: u32 },

    /// Ran out of moves
    GameLost,

    /// The last command was rolled back
    MoveUndone,
}

impl GameEvent {
    /// Player-facing message for this event, if it warrants one
    pub fn message(&self) -> Option<String> {
        match self {
            GameEvent::SessionStarted { difficulty } => {
                Some(format!("Switched to {} mode! Game reset.", difficulty))
            }
            GameEvent::Moved { .. } => None,
            GameEvent::BonusCollected { moves, .. } => Some(format!("Bonus! +{} moves!", moves)),
            GameEvent::ResourcesCollected { .. } => Some("Collected resources!".to_string()),
            GameEvent::ResourcesDelivered { .. } => Some("Resources delivered!".to_string()),
            GameEvent::GameWon { score } => Some(format!("Victory! Final Score: {}", score)),
            GameEvent::GameLost => Some("Game Over! Out of moves!".to_string()),
            GameEvent::MoveUndone => Some("Move undone!".to_string()),
        }
    }

    /// Whether this event ends the session
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameEvent::GameWon { .. } | GameEvent::GameLost)
    }
}
