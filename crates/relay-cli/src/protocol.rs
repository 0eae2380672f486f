//! Line-delimited JSON protocol between a UI shell and the engine.

use relay_core::{CommandOutcome, Difficulty, Direction, GameAction, GameState, HintKind, Position};
use serde::{Deserialize, Serialize};

/// Messages read from stdin, one per line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ClientMessage {
    /// Submit any engine command
    Action { action: GameAction },

    /// Move to a cell
    Move { row: i32, col: i32 },

    /// Move one cell in a direction
    Step { direction: Direction },

    Collect,

    Deliver,

    Undo,

    /// Ask where to head next
    Hint,

    /// Switch difficulty (starts a new session)
    SetDifficulty { difficulty: Difficulty },

    /// Start a new session at the current difficulty
    Reset,

    /// Request the full state
    GetState,

    /// Request the commands that would currently be accepted
    ValidActions,

    /// Ping for keepalive
    Ping,
}

/// Messages written to stdout, one per line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerMessage {
    /// Sent once at startup
    Welcome { state: GameState },

    /// Result of a command
    ActionResult { outcome: CommandOutcome },

    /// Game state updated
    GameState { state: GameState },

    /// Hint answer; `position` is absent when nothing is left to collect
    Hint {
        position: Option<Position>,
        kind: Option<HintKind>,
        message: Option<String>,
    },

    /// Valid actions for the current state
    ValidActions { actions: Vec<GameAction> },

    /// Session ended
    GameOver { won: bool, score: u32 },

    /// Error occurred
    Error { message: String },

    /// Pong response
    Pong,
}
