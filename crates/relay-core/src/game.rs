//! Core game state machine.
//!
//! This module contains the `GameState` aggregate, the `Game` engine that owns
//! it together with the undo history, and all command handling.

use crate::actions::{GameAction, GameEvent};
use crate::board::{Board, Cell};
use crate::config::{ConfigError, Difficulty, DifficultyConfig, EngineConfig};
use crate::hint::{self, Hint};
use crate::history::{History, Snapshot};
use crate::position::{Direction, Position};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Where the worker starts every session
pub const START_POSITION: Position = Position::new(0, 0);

/// Reasons a command was rejected.
///
/// The `Display` text is the message shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Cannot move outside the grid!")]
    OutOfBounds,

    #[error("Cannot move to obstacle!")]
    Obstructed,

    #[error("Can only move to adjacent cells!")]
    NotAdjacent,

    #[error("Game is over")]
    GameAlreadyOver,

    /// Also ends the session as a loss
    #[error("Game Over! Out of moves!")]
    OutOfMoves,

    #[error("No resources to collect here!")]
    NothingToCollect,

    #[error("Must be at target location to deliver!")]
    NotAtTarget,

    #[error("No resources to deliver!")]
    NothingToDeliver,

    #[error("No moves to undo!")]
    NothingToUndo,

    #[error("No resources left to collect!")]
    NoResourcesLeft,
}

/// How the session stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    InProgress,
    Won { score: u32 },
    Lost,
}

/// Flattened command result for JSON boundaries: `{accepted, reason, message, events}`.
///
/// A rejection carries no events, except `OutOfMoves`, which ends the session
/// and so reports `GameLost` alongside the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutcome {
    pub accepted: bool,
    pub reason: Option<GameError>,
    /// Text to show the player; the latest event's message wins
    pub message: Option<String>,
    pub events: Vec<GameEvent>,
}

impl From<Result<Vec<GameEvent>, GameError>> for CommandOutcome {
    fn from(result: Result<Vec<GameEvent>, GameError>) -> Self {
        match result {
            Ok(events) => Self {
                accepted: true,
                reason: None,
                message: events.iter().rev().find_map(GameEvent::message),
                events,
            },
            Err(error) => Self {
                accepted: false,
                reason: Some(error),
                message: Some(error.to_string()),
                events: match error {
                    GameError::OutOfMoves => vec![GameEvent::GameLost],
                    _ => Vec::new(),
                },
            },
        }
    }
}

/// The complete game state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// The game board
    pub board: Board,
    /// Where the worker stands
    pub player_position: Position,
    /// Delivery cell, fixed for the session
    pub target_position: Position,
    /// Moves left before the session is lost
    pub moves_remaining: u32,
    /// Resources the worker is holding
    pub carried_resources: u32,
    /// Resources handed in so far
    pub delivered_resources: u32,
    /// Delivery goal
    pub target_resources: u32,
    /// Final score, set on a win
    pub score: u32,
    /// Set once the session is won or lost
    pub is_over: bool,
    pub difficulty: Difficulty,
}

impl GameState {
    /// Fresh state for `difficulty` around an already generated board
    pub fn new(difficulty: Difficulty, board: Board) -> Self {
        let config = difficulty.config();
        let last = board.size() as i32 - 1;

        Self {
            board,
            player_position: START_POSITION,
            target_position: Position::new(last, last),
            moves_remaining: config.initial_moves,
            carried_resources: 0,
            delivered_resources: 0,
            target_resources: config.target_resources,
            score: 0,
            is_over: false,
            difficulty,
        }
    }

    /// Deal a new board and build the initial state
    pub fn generate(difficulty: Difficulty, grid_size: usize, rng: &mut StdRng) -> Self {
        let last = grid_size as i32 - 1;
        let board = Board::generate_with_rng(
            grid_size,
            START_POSITION,
            Position::new(last, last),
            &difficulty.config(),
            rng,
        );
        Self::new(difficulty, board)
    }

    /// Rule table for this session's difficulty
    pub fn config(&self) -> DifficultyConfig {
        self.difficulty.config()
    }

    pub fn is_at_target(&self) -> bool {
        self.player_position == self.target_position
    }

    pub fn current_cell(&self) -> Option<&Cell> {
        self.board.get(self.player_position)
    }

    pub fn outcome(&self) -> Outcome {
        if !self.is_over {
            Outcome::InProgress
        } else if self.delivered_resources >= self.target_resources {
            Outcome::Won { score: self.score }
        } else {
            Outcome::Lost
        }
    }

    /// Copy of everything undo can roll back
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            player_position: self.player_position,
            moves_remaining: self.moves_remaining,
            carried_resources: self.carried_resources,
            delivered_resources: self.delivered_resources,
            score: self.score,
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.board = snapshot.board;
        self.player_position = snapshot.player_position;
        self.moves_remaining = snapshot.moves_remaining;
        self.carried_resources = snapshot.carried_resources;
        self.delivered_resources = snapshot.delivered_resources;
        self.score = snapshot.score;
    }
}

/// The game engine: one session's state, its undo history and the board RNG.
///
/// Create one with [`Game::new`], drive it with commands, start over with
/// [`Game::reset`] or [`Game::set_difficulty`], and drop it when done.
#[derive(Debug, Clone)]
pub struct Game {
    state: GameState,
    history: History,
    config: EngineConfig,
    rng: StdRng,
}

impl Game {
    /// Create a new session
    pub fn new(config: EngineConfig) -> Self {
        let mut rng = seeded_rng(config.seed);
        let state = GameState::generate(config.difficulty, config.grid_size(), &mut rng);
        info!(difficulty = %config.difficulty, seed = ?config.seed, "Session started");

        Self {
            state,
            history: History::new(),
            config,
            rng,
        }
    }

    /// Create a session with default options at a difficulty
    pub fn with_difficulty(difficulty: Difficulty) -> Self {
        Self::new(EngineConfig::new(difficulty))
    }

    /// Resume from a prepared state with an empty history.
    ///
    /// Later resets deal boards of the same size as `state.board`. Fails if
    /// that board is too small to hold distinct start and target cells.
    pub fn from_state(config: EngineConfig, state: GameState) -> Result<Self, ConfigError> {
        let mut config = config.with_grid_size(state.board.size())?;
        config.difficulty = state.difficulty;
        let rng = seeded_rng(config.seed);

        Ok(Self {
            state,
            history: History::new(),
            config,
            rng,
        })
    }

    // ==================== Lifecycle ====================

    /// Start a new session at the current difficulty
    pub fn reset(&mut self) -> Vec<GameEvent> {
        self.state =
            GameState::generate(self.config.difficulty, self.config.grid_size(), &mut self.rng);
        self.history.clear();
        info!(difficulty = %self.config.difficulty, "Session reset");

        vec![GameEvent::SessionStarted {
            difficulty: self.config.difficulty,
        }]
    }

    /// Switch difficulty, which always starts a new session
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> Vec<GameEvent> {
        self.config.difficulty = difficulty;
        self.reset()
    }

    // ==================== Commands ====================

    /// Apply a command
    pub fn apply_action(&mut self, action: GameAction) -> Result<Vec<GameEvent>, GameError> {
        match action {
            GameAction::Move(pos) => self.move_to(pos),
            GameAction::Step(direction) => self.step(direction),
            GameAction::Collect => self.collect(),
            GameAction::Deliver => self.deliver(),
            GameAction::Undo => self.undo(),
            GameAction::SetDifficulty(difficulty) => Ok(self.set_difficulty(difficulty)),
            GameAction::Reset => Ok(self.reset()),
        }
    }

    /// Move the worker to `destination`.
    ///
    /// Checks run in this order: game over, out of moves (which ends the
    /// session as a loss), bounds, obstacle, then adjacency when enforced.
    pub fn move_to(&mut self, destination: Position) -> Result<Vec<GameEvent>, GameError> {
        if self.state.is_over {
            return Err(rejected("move", GameError::GameAlreadyOver));
        }

        if self.state.moves_remaining == 0 {
            self.state.is_over = true;
            info!(
                delivered = self.state.delivered_resources,
                target = self.state.target_resources,
                "Game lost, out of moves"
            );
            return Err(rejected("move", GameError::OutOfMoves));
        }

        if !self.state.board.contains(destination) {
            return Err(rejected("move", GameError::OutOfBounds));
        }

        if self.state.board.is_obstacle(destination) {
            return Err(rejected("move", GameError::Obstructed));
        }

        if self.config.enforce_adjacency && !self.is_adjacent(destination) {
            return Err(rejected("move", GameError::NotAdjacent));
        }

        self.history.push(self.state.snapshot());

        let from = self.state.player_position;
        self.state.player_position = destination;
        self.state.moves_remaining -= 1;

        let mut events = vec![GameEvent::Moved {
            from,
            to: destination,
            moves_remaining: self.state.moves_remaining,
        }];

        let bonus_moves = self.state.config().bonus_moves;
        if let Some(cell) = self.state.board.get_mut(destination) {
            if cell.is_bonus {
                cell.is_bonus = false;
                self.state.moves_remaining += bonus_moves;
                events.push(GameEvent::BonusCollected {
                    position: destination,
                    moves: bonus_moves,
                });
            }
        }

        debug!(
            %from,
            to = %destination,
            moves_remaining = self.state.moves_remaining,
            "Moved"
        );

        Ok(events)
    }

    /// Move one cell in `direction`
    pub fn step(&mut self, direction: Direction) -> Result<Vec<GameEvent>, GameError> {
        self.move_to(self.state.player_position.neighbor(direction))
    }

    /// Pick up everything on the current cell
    pub fn collect(&mut self) -> Result<Vec<GameEvent>, GameError> {
        if self.state.is_over {
            return Err(rejected("collect", GameError::GameAlreadyOver));
        }

        let position = self.state.player_position;
        let amount = self
            .state
            .current_cell()
            .map(|c| c.resources)
            .unwrap_or(0);
        if amount == 0 {
            return Err(rejected("collect", GameError::NothingToCollect));
        }

        self.history.push(self.state.snapshot());

        if let Some(cell) = self.state.board.get_mut(position) {
            cell.resources = 0;
        }
        self.state.carried_resources += amount;

        debug!(%position, amount, carried = self.state.carried_resources, "Collected");

        Ok(vec![GameEvent::ResourcesCollected {
            position,
            amount,
            carried: self.state.carried_resources,
        }])
    }

    /// Hand in carried resources; wins the session once the goal is met
    pub fn deliver(&mut self) -> Result<Vec<GameEvent>, GameError> {
        if self.state.is_over {
            return Err(rejected("deliver", GameError::GameAlreadyOver));
        }

        if !self.state.is_at_target() {
            return Err(rejected("deliver", GameError::NotAtTarget));
        }

        if self.state.carried_resources == 0 {
            return Err(rejected("deliver", GameError::NothingToDeliver));
        }

        self.history.push(self.state.snapshot());

        let amount = self.state.carried_resources;
        self.state.delivered_resources += amount;
        self.state.carried_resources = 0;

        debug!(amount, total = self.state.delivered_resources, "Delivered");

        let mut events = vec![GameEvent::ResourcesDelivered {
            amount,
            total: self.state.delivered_resources,
        }];
        events.extend(self.check_win_condition());

        Ok(events)
    }

    /// Roll back the last accepted command
    pub fn undo(&mut self) -> Result<Vec<GameEvent>, GameError> {
        if self.state.is_over {
            return Err(rejected("undo", GameError::GameAlreadyOver));
        }

        let snapshot = self
            .history
            .pop()
            .ok_or_else(|| rejected("undo", GameError::NothingToUndo))?;
        self.state.restore(snapshot);

        debug!(history = self.history.len(), "Undone");

        Ok(vec![GameEvent::MoveUndone])
    }

    // ==================== Queries ====================

    /// Where the worker should head next
    pub fn hint(&self) -> Result<Hint, GameError> {
        hint::suggest(&self.state).ok_or(GameError::NoResourcesLeft)
    }

    /// [`Game::hint`] reduced to the suggested cell
    pub fn hint_position(&self) -> Option<Position> {
        self.hint().ok().map(|h| h.position)
    }

    /// Whether `pos` is one orthogonal step from the worker
    pub fn is_adjacent(&self, pos: Position) -> bool {
        self.state.player_position.is_adjacent(&pos)
    }

    /// Neighbouring cells a move would currently be accepted for
    pub fn reachable_moves(&self) -> Vec<Position> {
        if self.state.is_over || self.state.moves_remaining == 0 {
            return Vec::new();
        }

        self.state
            .player_position
            .neighbors()
            .into_iter()
            .filter(|p| self.state.board.contains(*p) && !self.state.board.is_obstacle(*p))
            .collect()
    }

    /// All commands that would currently be accepted
    pub fn valid_actions(&self) -> Vec<GameAction> {
        let mut actions = Vec::new();

        if self.state.is_over {
            actions.push(GameAction::Reset);
            return actions;
        }

        let here = self.state.player_position;
        let reachable = self.reachable_moves();
        for direction in Direction::ALL {
            if reachable.contains(&here.neighbor(direction)) {
                actions.push(GameAction::Step(direction));
            }
        }

        if self.state.current_cell().is_some_and(|c| c.has_resources()) {
            actions.push(GameAction::Collect);
        }

        if self.state.is_at_target() && self.state.carried_resources > 0 {
            actions.push(GameAction::Deliver);
        }

        if !self.history.is_empty() {
            actions.push(GameAction::Undo);
        }

        actions.push(GameAction::Reset);
        actions
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.state.board.get(pos)
    }

    pub fn player_position(&self) -> Position {
        self.state.player_position
    }

    pub fn target_position(&self) -> Position {
        self.state.target_position
    }

    pub fn moves_remaining(&self) -> u32 {
        self.state.moves_remaining
    }

    pub fn carried_resources(&self) -> u32 {
        self.state.carried_resources
    }

    pub fn delivered_resources(&self) -> u32 {
        self.state.delivered_resources
    }

    pub fn target_resources(&self) -> u32 {
        self.state.target_resources
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over
    }

    pub fn difficulty(&self) -> Difficulty {
        self.state.difficulty
    }

    pub fn outcome(&self) -> Outcome {
        self.state.outcome()
    }

    /// Number of commands that can be undone
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    // ==================== Helper Methods ====================

    fn check_win_condition(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();

        if self.state.delivered_resources >= self.state.target_resources {
            let score = self
                .state
                .config()
                .score(self.state.delivered_resources, self.state.moves_remaining);
            self.state.score = score;
            self.state.is_over = true;
            info!(score, delivered = self.state.delivered_resources, "Game won");
            events.push(GameEvent::GameWon { score });
        }

        events
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn rejected(command: &str, error: GameError) -> GameError {
    debug!(command, reason = ?error, "Command rejected");
    error
}
