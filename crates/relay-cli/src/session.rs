//! One engine session behind the stdio protocol.

use relay_core::{CommandOutcome, EngineConfig, Game, GameAction, GameEvent, Outcome, Position};
use thiserror::Error;
use tracing::{debug, info};

use crate::protocol::{ClientMessage, ServerMessage};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid message: {0}")]
    InvalidMessage(String),
}

/// Owns the engine and turns client messages into replies.
pub struct Session {
    game: Game,
}

impl Session {
    pub fn new(config: EngineConfig) -> Self {
        Self::from_game(Game::new(config))
    }

    /// Serve an engine that was already set up
    pub fn from_game(game: Game) -> Self {
        Self { game }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn welcome(&self) -> ServerMessage {
        ServerMessage::Welcome {
            state: self.game.state().clone(),
        }
    }

    /// Parse one input line and handle it
    pub fn handle_line(&mut self, line: &str) -> Result<Vec<ServerMessage>, SessionError> {
        let msg: ClientMessage = serde_json::from_str(line)
            .map_err(|e| SessionError::InvalidMessage(e.to_string()))?;
        Ok(self.handle(msg))
    }

    pub fn handle(&mut self, msg: ClientMessage) -> Vec<ServerMessage> {
        debug!(?msg, "Handling message");

        match msg {
            ClientMessage::Action { action } => self.apply(action),
            ClientMessage::Move { row, col } => self.apply(GameAction::Move(Position::new(row, col))),
            ClientMessage::Step { direction } => self.apply(GameAction::Step(direction)),
            ClientMessage::Collect => self.apply(GameAction::Collect),
            ClientMessage::Deliver => self.apply(GameAction::Deliver),
            ClientMessage::Undo => self.apply(GameAction::Undo),
            ClientMessage::SetDifficulty { difficulty } => {
                self.apply(GameAction::SetDifficulty(difficulty))
            }
            ClientMessage::Reset => self.apply(GameAction::Reset),
            ClientMessage::Hint => {
                let reply = match self.game.hint() {
                    Ok(hint) => ServerMessage::Hint {
                        position: Some(hint.position),
                        kind: Some(hint.kind),
                        message: None,
                    },
                    Err(e) => ServerMessage::Hint {
                        position: None,
                        kind: None,
                        message: Some(e.to_string()),
                    },
                };
                vec![reply]
            }
            ClientMessage::GetState => vec![ServerMessage::GameState {
                state: self.game.state().clone(),
            }],
            ClientMessage::ValidActions => vec![ServerMessage::ValidActions {
                actions: self.game.valid_actions(),
            }],
            ClientMessage::Ping => vec![ServerMessage::Pong],
        }
    }

    fn apply(&mut self, action: GameAction) -> Vec<ServerMessage> {
        let outcome = CommandOutcome::from(self.game.apply_action(action));
        // Terminal events only come with the transition, so this fires once
        let ended = outcome.events.iter().any(GameEvent::is_terminal);

        let mut replies = vec![
            ServerMessage::ActionResult { outcome },
            ServerMessage::GameState {
                state: self.game.state().clone(),
            },
        ];

        if ended {
            match self.game.outcome() {
                Outcome::Won { score } => {
                    info!(score, "Session won");
                    replies.push(ServerMessage::GameOver { won: true, score });
                }
                Outcome::Lost => {
                    info!("Session lost");
                    replies.push(ServerMessage::GameOver {
                        won: false,
                        score: self.game.score(),
                    });
                }
                Outcome::InProgress => {}
            }
        }

        replies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use relay_core::{Board, Cell, Difficulty, Direction, GameError, GameState, DEFAULT_GRID_SIZE};

    fn session() -> Session {
        Session::new(EngineConfig::new(Difficulty::Easy).with_seed(17))
    }

    #[test]
    fn test_ping() {
        let mut s = session();
        let replies = s.handle_line(r#"{"type":"Ping"}"#).unwrap();
        assert_eq!(replies, vec![ServerMessage::Pong]);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let mut s = session();
        assert!(matches!(
            s.handle_line("not json"),
            Err(SessionError::InvalidMessage(_))
        ));
    }

    #[test]
    fn test_out_of_bounds_step_is_rejected() {
        let mut s = session();
        let replies = s.handle(ClientMessage::Step {
            direction: Direction::North,
        });

        match &replies[0] {
            ServerMessage::ActionResult { outcome } => {
                assert!(!outcome.accepted);
                assert_eq!(outcome.reason, Some(GameError::OutOfBounds));
            }
            other => panic!("unexpected reply {:?}", other),
        }
        assert_eq!(s.game().history_len(), 0);
    }

    #[test]
    fn test_move_payload_parses() {
        let mut s = session();
        let replies = s
            .handle_line(r#"{"type":"Move","payload":{"row":9,"col":9}}"#)
            .unwrap();
        assert!(matches!(
            &replies[0],
            ServerMessage::ActionResult { outcome } if outcome.reason == Some(GameError::OutOfBounds)
        ));
    }

    #[test]
    fn test_set_difficulty_reports_new_state() {
        let mut s = session();
        let replies = s.handle(ClientMessage::SetDifficulty {
            difficulty: Difficulty::Hard,
        });

        assert!(matches!(
            &replies[1],
            ServerMessage::GameState { state } if state.difficulty == Difficulty::Hard && state.moves_remaining == 15
        ));
    }

    /// Session on an empty easy board, optionally with one resource pile
    fn session_on(pile: Option<(Position, u32)>) -> Session {
        let mut board = Board::empty(DEFAULT_GRID_SIZE);
        if let Some((pos, amount)) = pile {
            *board.get_mut(pos).unwrap() = Cell::with_resources(amount);
        }
        let state = GameState::new(Difficulty::Easy, board);
        let game = Game::from_state(EngineConfig::default().with_seed(2), state).unwrap();
        Session::from_game(game)
    }

    fn game_over_notices(replies: &[ServerMessage]) -> Vec<ServerMessage> {
        replies
            .iter()
            .filter(|r| matches!(r, ServerMessage::GameOver { .. }))
            .cloned()
            .collect()
    }

    #[test]
    fn test_loss_announced_once() {
        let mut s = session_on(None);
        let mut notices = Vec::new();

        for direction in [Direction::East, Direction::West].repeat(10) {
            notices.extend(game_over_notices(&s.handle(ClientMessage::Step { direction })));
        }
        assert_eq!(s.game().moves_remaining(), 0);
        assert!(notices.is_empty());

        // The first attempt with no moves left ends the session, the rest bounce
        for _ in 0..3 {
            notices.extend(game_over_notices(&s.handle(ClientMessage::Step {
                direction: Direction::East,
            })));
        }

        assert_eq!(s.game().outcome(), Outcome::Lost);
        assert_eq!(notices, vec![ServerMessage::GameOver { won: false, score: 0 }]);
    }

    #[test]
    fn test_win_announced_once() {
        let mut s = session_on(Some((Position::new(4, 3), 10)));
        let mut notices = Vec::new();

        let script = [
            ClientMessage::Move { row: 4, col: 3 },
            ClientMessage::Collect,
            ClientMessage::Move { row: 4, col: 4 },
            ClientMessage::Deliver,
            ClientMessage::Deliver,
            ClientMessage::Undo,
        ];
        for msg in script {
            notices.extend(game_over_notices(&s.handle(msg)));
        }

        // 10 delivered, 18 moves left, easy multiplier
        let score = 10 * 100 + 18 * 10;
        assert_eq!(s.game().outcome(), Outcome::Won { score });
        assert_eq!(notices, vec![ServerMessage::GameOver { won: true, score }]);
    }

    #[test]
    fn test_reset_after_game_over_is_not_announced() {
        let mut s = session_on(Some((Position::new(4, 3), 10)));
        s.handle(ClientMessage::Move { row: 4, col: 3 });
        s.handle(ClientMessage::Collect);
        s.handle(ClientMessage::Move { row: 4, col: 4 });
        s.handle(ClientMessage::Deliver);
        assert!(s.game().is_over());

        let replies = s.handle(ClientMessage::Reset);
        assert!(game_over_notices(&replies).is_empty());
        assert!(!s.game().is_over());
    }
}
