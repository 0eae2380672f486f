//! Session configuration and the per-difficulty rule table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Side length of the standard board
pub const DEFAULT_GRID_SIZE: usize = 5;

/// Smallest board that keeps start and target on different cells
pub const MIN_GRID_SIZE: usize = 2;

/// Difficulty level, fixed for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 2] = [Difficulty::Easy, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Hard => "hard",
        }
    }

    /// Rule table for this difficulty
    pub fn config(&self) -> DifficultyConfig {
        DifficultyConfig::for_difficulty(*self)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown difficulty: {0}")]
pub struct ParseDifficultyError(pub String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "hard" => Ok(Difficulty::Hard),
            other => Err(ParseDifficultyError(other.to_string())),
        }
    }
}

/// All numbers that vary with difficulty.
///
/// Board generation reads the placement fields; the engine reads the move,
/// goal, bonus and scoring fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    /// Moves available at session start
    pub initial_moves: u32,
    /// Delivered resources needed to win
    pub target_resources: u32,
    /// Number of resource cells to place
    pub resource_cells: usize,
    /// Smallest amount a resource cell can hold
    pub resource_amount_min: u32,
    /// Largest amount a resource cell can hold
    pub resource_amount_max: u32,
    /// Resource cells must satisfy `row + col <= limit` when set
    pub resource_reach_limit: Option<u32>,
    /// Number of obstacles requested (fewer may be placed)
    pub obstacle_cells: usize,
    /// Random draws allowed per obstacle before it is skipped
    pub obstacle_attempts: u32,
    /// Keep the cells next to start and target free of obstacles
    pub protect_endpoints: bool,
    /// Number of bonus cells to place
    pub bonus_cells: usize,
    /// Moves granted when stepping on a bonus cell
    pub bonus_moves: u32,
    /// Final score multiplier
    pub score_multiplier: u32,
}

impl DifficultyConfig {
    pub const EASY: DifficultyConfig = DifficultyConfig {
        initial_moves: 20,
        target_resources: 10,
        resource_cells: 8,
        resource_amount_min: 2,
        resource_amount_max: 4,
        resource_reach_limit: None,
        obstacle_cells: 3,
        obstacle_attempts: 20,
        protect_endpoints: false,
        bonus_cells: 3,
        bonus_moves: 3,
        score_multiplier: 1,
    };

    pub const HARD: DifficultyConfig = DifficultyConfig {
        initial_moves: 15,
        target_resources: 15,
        resource_cells: 6,
        resource_amount_min: 3,
        resource_amount_max: 4,
        resource_reach_limit: Some(6),
        obstacle_cells: 5,
        obstacle_attempts: 20,
        protect_endpoints: true,
        bonus_cells: 2,
        bonus_moves: 2,
        score_multiplier: 2,
    };

    pub const fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self::EASY,
            Difficulty::Hard => Self::HARD,
        }
    }

    /// Final score for a win: `(delivered * 100 + moves_left * 10) * multiplier`
    pub fn score(&self, delivered: u32, moves_remaining: u32) -> u32 {
        (delivered * 100 + moves_remaining * 10) * self.score_multiplier
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ConfigError {
    #[error("Grid size {0} is too small, need at least 2")]
    GridTooSmall(usize),
}

/// Options recognised when a session is created.
///
/// The grid size can only be changed through [`EngineConfig::with_grid_size`],
/// so a config always describes a playable board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineConfig {
    pub difficulty: Difficulty,
    /// Board side length
    grid_size: usize,
    /// Seed for board generation; `None` draws one from entropy
    pub seed: Option<u64>,
    /// Reject moves to non-neighbouring cells with `NotAdjacent`
    pub enforce_adjacency: bool,
}

impl EngineConfig {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_adjacency(mut self, enforce: bool) -> Self {
        self.enforce_adjacency = enforce;
        self
    }

    pub fn with_grid_size(mut self, size: usize) -> Result<Self, ConfigError> {
        self.grid_size = validate_grid_size(size)?;
        Ok(self)
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }
}

/// Reject boards where start and target would collapse onto one cell
pub fn validate_grid_size(size: usize) -> Result<usize, ConfigError> {
    if size < MIN_GRID_SIZE {
        return Err(ConfigError::GridTooSmall(size));
    }
    Ok(size)
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            grid_size: DEFAULT_GRID_SIZE,
            seed: None,
            enforce_adjacency: false,
        }
    }
}
