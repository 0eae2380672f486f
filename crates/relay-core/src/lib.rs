//! Resource Relay - a single-player grid delivery puzzle engine
//!
//! A worker walks a square board from the top-left corner, picks up resource
//! piles and hands them in at the delivery target in the opposite corner
//! before running out of moves.
//!
//! This crate provides the core game logic:
//! - Grid coordinates and board generation under placement constraints
//! - Move, collect and deliver commands with bonus-move handling
//! - Win/loss detection and scoring
//! - Full-state undo history
//! - A proximity hint heuristic
//!
//! # Architecture
//!
//! The engine is platform-agnostic and purely in-memory. It can be compiled to:
//! - Native Rust, driven by the `relay-cli` stdio shell
//! - WebAssembly for a browser UI (feature `wasm`)
//!
//! Shells issue commands, render the returned events, and read state through
//! the engine's accessors. They hold no game rules.
//!
//! # Modules
//!
//! - [`position`]: Cell coordinates and directions
//! - [`config`]: Difficulty rule table and engine options
//! - [`board`]: Cells, the grid and board generation
//! - [`actions`]: Commands and events
//! - [`history`]: Undo snapshots
//! - [`hint`]: Next-step suggestion
//! - [`game`]: Game state and engine

pub mod actions;
pub mod board;
pub mod config;
pub mod game;
pub mod hint;
pub mod history;
pub mod position;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::{GameAction, GameEvent};
pub use board::{Board, Cell};
pub use config::{
    ConfigError, Difficulty, DifficultyConfig, EngineConfig, ParseDifficultyError,
    DEFAULT_GRID_SIZE, MIN_GRID_SIZE,
};
pub use game::{CommandOutcome, Game, GameError, GameState, Outcome, START_POSITION};
pub use hint::{Hint, HintKind};
pub use history::{History, Snapshot};
pub use position::{Direction, Position};
