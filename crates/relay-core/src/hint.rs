//! Hint heuristic.
//!
//! Suggests where the worker should head next:
//! - Carrying anything: go deliver at the target
//! - Otherwise: the nearest resource pile by Manhattan distance

use crate::board::Board;
use crate::game::GameState;
use crate::position::Position;
use serde::{Deserialize, Serialize};

/// Why a cell is being suggested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HintKind {
    /// Head to the target and deliver
    Deliver,
    /// Head to a resource pile and collect
    Collect,
}

/// A suggested destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    pub position: Position,
    pub kind: HintKind,
}

/// Compute a hint for the current state, or `None` if nothing is left to do.
pub fn suggest(state: &GameState) -> Option<Hint> {
    if state.carried_resources > 0 {
        return Some(Hint {
            position: state.target_position,
            kind: HintKind::Deliver,
        });
    }

    nearest_resource(&state.board, state.player_position).map(|position| Hint {
        position,
        kind: HintKind::Collect,
    })
}

/// Closest resource-bearing cell to `from`.
///
/// Ties go to the first cell in row-major order.
pub fn nearest_resource(board: &Board, from: Position) -> Option<Position> {
    board
        .cells()
        .filter(|(_, cell)| cell.has_resources())
        .min_by_key(|(pos, _)| from.distance_to(pos))
        .map(|(pos, _)| pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;

    #[test]
    fn test_nearest_wins_over_far() {
        let mut board = Board::empty(5);
        *board.get_mut(Position::new(3, 0)).unwrap() = Cell::with_resources(2);
        *board.get_mut(Position::new(1, 0)).unwrap() = Cell::with_resources(4);

        let from = Position::new(0, 0);
        assert_eq!(nearest_resource(&board, from), Some(Position::new(1, 0)));
    }

    #[test]
    fn test_tie_goes_to_row_major_first() {
        let mut board = Board::empty(5);
        *board.get_mut(Position::new(2, 1)).unwrap() = Cell::with_resources(2);
        *board.get_mut(Position::new(1, 2)).unwrap() = Cell::with_resources(2);

        // Both are distance 2 from (2, 2); (1, 2) comes first row-major
        let from = Position::new(2, 2);
        assert_eq!(nearest_resource(&board, from), Some(Position::new(1, 2)));
    }

    #[test]
    fn test_empty_board_has_no_resource() {
        let board = Board::empty(5);
        assert_eq!(nearest_resource(&board, Position::new(0, 0)), None);
    }
}
