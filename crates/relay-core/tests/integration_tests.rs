//! Integration tests for the Resource Relay engine.
//!
//! These tests drive whole sessions through the public API, from a fresh
//! board through to a win or a loss.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use relay_core::*;

/// Empty 5x5 board with a few placed cells
fn board_with(cells: &[(Position, Cell)]) -> Board {
    let mut board = Board::empty(DEFAULT_GRID_SIZE);
    for (pos, cell) in cells {
        if let Some(slot) = board.get_mut(*pos) {
            *slot = *cell;
        }
    }
    board
}

fn game_on(difficulty: Difficulty, board: Board) -> Game {
    Game::from_state(
        EngineConfig::new(difficulty).with_seed(0),
        GameState::new(difficulty, board),
    )
    .expect("5x5 board is playable")
}

/// Walk to `to` one step at a time, rows first then columns
fn walk(game: &mut Game, to: Position) {
    while game.player_position().row != to.row {
        let dir = if game.player_position().row < to.row {
            Direction::South
        } else {
            Direction::North
        };
        game.step(dir).expect("walk blocked");
    }
    while game.player_position().col != to.col {
        let dir = if game.player_position().col < to.col {
            Direction::East
        } else {
            Direction::West
        };
        game.step(dir).expect("walk blocked");
    }
}

#[test]
fn test_initialize_for_all_difficulties() {
    for difficulty in Difficulty::ALL {
        for seed in 0..20 {
            let game = Game::new(EngineConfig::new(difficulty).with_seed(seed));

            assert_eq!(game.player_position(), Position::new(0, 0));
            assert_eq!(game.target_position(), Position::new(4, 4));
            for pos in [game.player_position(), game.target_position()] {
                assert!(game.cell(pos).unwrap().is_empty());
            }
            assert!(!game.is_over());
            assert_eq!(game.history_len(), 0);
            assert_eq!(game.difficulty(), difficulty);
        }
    }
}

#[test]
fn test_full_easy_session_to_victory() {
    let board = board_with(&[
        (Position::new(0, 2), Cell::with_resources(4)),
        (Position::new(2, 2), Cell::with_resources(3)),
        (Position::new(4, 2), Cell::with_resources(3)),
        (Position::new(1, 2), Cell::bonus()),
    ]);
    let mut game = game_on(Difficulty::Easy, board);
    assert_eq!(game.board().resource_total(), 10);

    walk(&mut game, Position::new(0, 2));
    game.collect().unwrap();
    assert_eq!(game.board().resource_total(), 6);
    walk(&mut game, Position::new(2, 2));
    game.collect().unwrap();
    walk(&mut game, Position::new(4, 2));
    game.collect().unwrap();
    assert_eq!(game.carried_resources(), 10);
    assert_eq!(game.board().resource_total(), 0);

    assert_eq!(game.hint_position(), Some(game.target_position()));

    walk(&mut game, Position::new(4, 4));
    let events = game.deliver().unwrap();

    // 8 steps taken, one bonus of 3
    let moves_left = 20 - 8 + 3;
    assert_eq!(game.moves_remaining(), moves_left);
    let expected = (10 * 100 + moves_left * 10) * 1;
    assert_eq!(game.score(), expected);
    assert_eq!(game.outcome(), Outcome::Won { score: expected });
    assert_eq!(
        events.last(),
        Some(&GameEvent::GameWon { score: expected })
    );

    // Terminal state is sticky until reset
    assert_eq!(game.step(Direction::West), Err(GameError::GameAlreadyOver));
    assert_eq!(game.undo(), Err(GameError::GameAlreadyOver));
    assert!(game.is_over());

    game.reset();
    assert!(!game.is_over());
    assert_eq!(game.score(), 0);
}

#[test]
fn test_running_out_of_moves_loses() {
    let mut game = game_on(Difficulty::Hard, Board::empty(DEFAULT_GRID_SIZE));

    // Bounce between two cells until the budget is gone
    for i in 0..15 {
        let dir = if i % 2 == 0 {
            Direction::East
        } else {
            Direction::West
        };
        game.step(dir).unwrap();
    }
    assert_eq!(game.moves_remaining(), 0);
    assert!(!game.is_over());

    let outcome = CommandOutcome::from(game.step(Direction::South));
    assert!(!outcome.accepted);
    assert_eq!(outcome.reason, Some(GameError::OutOfMoves));
    assert_eq!(outcome.message.as_deref(), Some("Game Over! Out of moves!"));
    assert_eq!(outcome.events, vec![GameEvent::GameLost]);
    assert_eq!(game.outcome(), Outcome::Lost);
    assert_eq!(game.score(), 0);
}

#[test]
fn test_undo_does_not_revive_session_fields() {
    let board = board_with(&[(Position::new(4, 3), Cell::with_resources(4))]);
    let mut game = game_on(Difficulty::Easy, board);

    game.move_to(Position::new(4, 3)).unwrap();
    game.collect().unwrap();
    game.move_to(Position::new(4, 4)).unwrap();
    game.deliver().unwrap();
    assert_eq!(game.delivered_resources(), 4);

    game.undo().unwrap();
    assert_eq!(game.delivered_resources(), 0);
    assert_eq!(game.carried_resources(), 4);
    assert_eq!(game.target_resources(), 10);
    assert_eq!(game.target_position(), Position::new(4, 4));
    assert_eq!(game.difficulty(), Difficulty::Easy);
    assert!(!game.is_over());
}

#[test]
fn test_rejections_leave_state_untouched() {
    let board = board_with(&[(Position::new(0, 1), Cell::obstacle())]);
    let mut game = game_on(Difficulty::Easy, board);
    let before = game.state().clone();

    let rejected = [
        game.move_to(Position::new(0, 1)),
        game.move_to(Position::new(5, 5)),
        game.move_to(Position::new(-1, 3)),
        game.collect(),
        game.deliver(),
        game.undo(),
    ];

    assert_eq!(
        rejected.iter().map(|r| r.clone().unwrap_err()).collect::<Vec<_>>(),
        vec![
            GameError::Obstructed,
            GameError::OutOfBounds,
            GameError::OutOfBounds,
            GameError::NothingToCollect,
            GameError::NotAtTarget,
            GameError::NothingToUndo,
        ]
    );
    assert_eq!(game.state(), &before);
    assert_eq!(game.history_len(), 0);
}

#[test]
fn test_hint_picks_closer_resource() {
    let board = board_with(&[
        (Position::new(0, 3), Cell::with_resources(2)),
        (Position::new(1, 0), Cell::with_resources(2)),
    ]);
    let game = game_on(Difficulty::Easy, board);

    let hint = game.hint().unwrap();
    assert_eq!(hint.position, Position::new(1, 0));
    assert_eq!(hint.kind, HintKind::Collect);
}

#[test]
fn test_reachable_moves_follow_board() {
    let board = board_with(&[(Position::new(1, 0), Cell::obstacle())]);
    let game = game_on(Difficulty::Easy, board);

    assert_eq!(game.reachable_moves(), vec![Position::new(0, 1)]);
    assert!(game.is_adjacent(Position::new(0, 1)));
    assert!(!game.is_adjacent(Position::new(1, 1)));
}

#[test]
fn test_rejects_unplayable_grid_sizes() {
    for size in [0, 1] {
        assert_eq!(
            EngineConfig::default().with_grid_size(size),
            Err(ConfigError::GridTooSmall(size))
        );
        let state = GameState::new(Difficulty::Hard, Board::empty(size));
        assert_eq!(
            Game::from_state(EngineConfig::default(), state).err(),
            Some(ConfigError::GridTooSmall(size))
        );
    }
}

#[test]
fn test_state_serializes_for_shells() {
    let game = Game::new(EngineConfig::default().with_seed(3));
    let json = serde_json::to_value(game.state()).unwrap();

    assert_eq!(json["player_position"]["row"], 0);
    assert_eq!(json["difficulty"], "easy");
    assert_eq!(json["moves_remaining"], 20);
}

proptest! {
    #[test]
    fn prop_generated_boards_respect_constraints(seed in any::<u64>(), hard in any::<bool>()) {
        let difficulty = if hard { Difficulty::Hard } else { Difficulty::Easy };
        let config = difficulty.config();
        let game = Game::new(EngineConfig::new(difficulty).with_seed(seed));
        let board = game.board();

        prop_assert!(board.obstacle_count() <= config.obstacle_cells);
        prop_assert_eq!(board.resource_cell_count(), config.resource_cells);
        prop_assert_eq!(board.bonus_count(), config.bonus_cells);

        for (pos, cell) in board.cells() {
            if cell.is_obstacle {
                prop_assert!(!cell.has_resources() && !cell.is_bonus);
            }
            if cell.has_resources() {
                prop_assert!(!cell.is_bonus);
            }
            if pos == game.player_position() || pos == game.target_position() {
                prop_assert!(cell.is_empty());
            }
        }
    }

    #[test]
    fn prop_n_commands_then_n_undos_restore_state(
        seed in any::<u64>(),
        commands in prop::collection::vec(0u8..6, 1..40),
    ) {
        let mut game = Game::new(EngineConfig::default().with_seed(seed));
        let initial = game.state().clone();

        let mut accepted = 0;
        for code in commands {
            let result = match code {
                0 => game.step(Direction::North),
                1 => game.step(Direction::East),
                2 => game.step(Direction::South),
                3 => game.step(Direction::West),
                4 => game.collect(),
                _ => game.deliver(),
            };
            if game.is_over() {
                break;
            }
            if result.is_ok() {
                accepted += 1;
            }
        }

        if !game.is_over() {
            prop_assert_eq!(game.history_len(), accepted);
            for _ in 0..accepted {
                prop_assert!(game.undo().is_ok());
            }
            prop_assert_eq!(game.state(), &initial);
            prop_assert_eq!(game.undo(), Err(GameError::NothingToUndo));
        }
    }
}
