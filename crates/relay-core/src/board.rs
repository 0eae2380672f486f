//! Board representation and random board generation.
//!
//! This module contains:
//! - `Cell`: resource amount plus obstacle/bonus flags for one square
//! - `Board`: the square grid, stored row-major
//! - Placement of resources, obstacles and bonus cells under the
//!   exclusion rules of the chosen difficulty

use crate::config::DifficultyConfig;
use crate::position::Position;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// A single square on the board.
///
/// An obstacle never carries resources or a bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cell {
    /// Resources waiting to be collected (0 = none)
    pub resources: u32,
    /// Impassable square
    pub is_obstacle: bool,
    /// Grants extra moves the first time it is entered
    pub is_bonus: bool,
}

impl Cell {
    /// An empty, walkable cell
    pub const fn empty() -> Self {
        Self {
            resources: 0,
            is_obstacle: false,
            is_bonus: false,
        }
    }

    pub const fn with_resources(amount: u32) -> Self {
        Self {
            resources: amount,
            is_obstacle: false,
            is_bonus: false,
        }
    }

    pub const fn obstacle() -> Self {
        Self {
            resources: 0,
            is_obstacle: true,
            is_bonus: false,
        }
    }

    pub const fn bonus() -> Self {
        Self {
            resources: 0,
            is_obstacle: false,
            is_bonus: true,
        }
    }

    /// Nothing on this cell
    pub fn is_empty(&self) -> bool {
        self.resources == 0 && !self.is_obstacle && !self.is_bonus
    }

    pub fn has_resources(&self) -> bool {
        self.resources > 0
    }
}

/// The square game board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Side length
    size: usize,
    /// Cells in row-major order
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board of side `size`
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::empty(); size * size],
        }
    }

    /// Generate a board for a difficulty using thread-local randomness
    pub fn generate(
        size: usize,
        start: Position,
        target: Position,
        config: &DifficultyConfig,
    ) -> Self {
        let mut rng = rand::thread_rng();
        Self::generate_with_rng(size, start, target, config, &mut rng)
    }

    /// Generate a board with a provided RNG.
    ///
    /// Resources go down first, then obstacles, then bonus cells; each
    /// stage only considers cells the earlier stages left untouched. The
    /// start and target cells are never used.
    pub fn generate_with_rng<R: Rng>(
        size: usize,
        start: Position,
        target: Position,
        config: &DifficultyConfig,
        rng: &mut R,
    ) -> Self {
        let mut board = Self::empty(size);
        let reserved = [start, target];

        let resources = board.place_resources(&reserved, config, rng);

        let protected: Vec<Position> = if config.protect_endpoints {
            start
                .neighbors()
                .into_iter()
                .chain(target.neighbors())
                .filter(|p| p.in_bounds(size))
                .collect()
        } else {
            Vec::new()
        };
        let obstacles = board.place_obstacles(
            &reserved,
            &protected,
            config.obstacle_cells,
            config.obstacle_attempts,
            rng,
        );

        let bonuses = board.place_bonuses(&reserved, config.bonus_cells, rng);

        debug!(
            resources,
            obstacles,
            bonuses,
            requested_obstacles = config.obstacle_cells,
            "Board generated"
        );

        board
    }

    /// Place `config.resource_cells` resource piles on free cells.
    ///
    /// Each pile is drawn uniformly from the cells that are still eligible,
    /// so placement always terminates; it stops early only if the board runs
    /// out of eligible cells. Returns the number of piles placed.
    pub fn place_resources<R: Rng>(
        &mut self,
        reserved: &[Position],
        config: &DifficultyConfig,
        rng: &mut R,
    ) -> usize {
        let mut placed = 0;

        for _ in 0..config.resource_cells {
            let candidates: Vec<Position> = self
                .positions()
                .filter(|pos| !reserved.contains(pos))
                .filter(|pos| {
                    config
                        .resource_reach_limit
                        .map_or(true, |limit| (pos.row + pos.col) as u32 <= limit)
                })
                .filter(|pos| self.cell(*pos).is_empty())
                .collect();

            let Some(&pos) = candidates.choose(rng) else {
                debug!(placed, "No free cell left for resources");
                break;
            };

            let amount = rng.gen_range(config.resource_amount_min..=config.resource_amount_max);
            self.cell_mut(pos).resources = amount;
            trace!(%pos, amount, "Placed resources");
            placed += 1;
        }

        placed
    }

    /// Place up to `count` obstacles by rejection sampling.
    ///
    /// Each obstacle gets at most `attempts` uniform draws over the whole
    /// board; a draw is rejected if it hits a reserved or protected cell or
    /// a cell that already holds something. An obstacle with no accepted
    /// draw is skipped, so the result may be smaller than `count`.
    pub fn place_obstacles<R: Rng>(
        &mut self,
        reserved: &[Position],
        protected: &[Position],
        count: usize,
        attempts: u32,
        rng: &mut R,
    ) -> usize {
        let mut placed = 0;

        for _ in 0..count {
            let spot = (0..attempts)
                .map(|_| self.random_position(rng))
                .find(|pos| {
                    !reserved.contains(pos) && !protected.contains(pos) && self.cell(*pos).is_empty()
                });

            match spot {
                Some(pos) => {
                    self.cell_mut(pos).is_obstacle = true;
                    trace!(%pos, "Placed obstacle");
                    placed += 1;
                }
                None => debug!(attempts, "Skipped obstacle, no valid cell found"),
            }
        }

        placed
    }

    /// Place `count` bonus cells on cells holding nothing.
    ///
    /// Returns the number placed, which is short of `count` only when no free
    /// cell remains.
    pub fn place_bonuses<R: Rng>(
        &mut self,
        reserved: &[Position],
        count: usize,
        rng: &mut R,
    ) -> usize {
        let mut placed = 0;

        for _ in 0..count {
            let candidates: Vec<Position> = self
                .positions()
                .filter(|pos| !reserved.contains(pos) && self.cell(*pos).is_empty())
                .collect();

            let Some(&pos) = candidates.choose(rng) else {
                debug!(placed, "No free cell left for bonuses");
                break;
            };

            self.cell_mut(pos).is_bonus = true;
            trace!(%pos, "Placed bonus");
            placed += 1;
        }

        placed
    }

    fn random_position<R: Rng>(&self, rng: &mut R) -> Position {
        let size = self.size as i32;
        Position::new(rng.gen_range(0..size), rng.gen_range(0..size))
    }

    // ==================== Queries ====================

    /// Side length
    pub fn size(&self) -> usize {
        self.size
    }

    /// Get a cell, or `None` when `pos` is off the board
    pub fn get(&self, pos: Position) -> Option<&Cell> {
        pos.to_index(self.size).map(|i| &self.cells[i])
    }

    /// Mutable cell access, or `None` when `pos` is off the board
    pub fn get_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        match pos.to_index(self.size) {
            Some(i) => Some(&mut self.cells[i]),
            None => None,
        }
    }

    // Callers guarantee `pos` came from `positions()` or `random_position()`.
    fn cell(&self, pos: Position) -> &Cell {
        &self.cells[pos.row as usize * self.size + pos.col as usize]
    }

    fn cell_mut(&mut self, pos: Position) -> &mut Cell {
        &mut self.cells[pos.row as usize * self.size + pos.col as usize]
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.in_bounds(self.size)
    }

    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.get(pos).is_some_and(|c| c.is_obstacle)
    }

    /// All positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let size = self.size;
        (0..size * size).map(move |i| Position::from_index(i, size))
    }

    /// All cells with their positions in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (Position, &Cell)> {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (Position::from_index(i, size), cell))
    }

    /// Total resources still lying on the board
    pub fn resource_total(&self) -> u32 {
        self.cells.iter().map(|c| c.resources).sum()
    }

    /// Number of cells that hold resources
    pub fn resource_cell_count(&self) -> usize {
        self.cells.iter().filter(|c| c.has_resources()).count()
    }

    pub fn obstacle_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_obstacle).count()
    }

    pub fn bonus_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_bonus).count()
    }

    /// Nested rows for shells that render a 2D grid
    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        self.cells.chunks(self.size).map(|row| row.to_vec()).collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty(crate::config::DEFAULT_GRID_SIZE)
    }
}
