//! WebAssembly bindings for the Resource Relay engine.
//!
//! This module exposes the engine to a JavaScript UI through wasm-bindgen.
//! Commands return a JSON-encoded `CommandOutcome`; the UI renders cells,
//! messages and animations from that and the state getters.

use wasm_bindgen::prelude::*;

use crate::actions::GameAction;
use crate::config::Difficulty;
use crate::game::{CommandOutcome, Game, GameError};
use crate::position::Position;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// WASM-exposed game wrapper
#[wasm_bindgen]
pub struct WasmGame {
    game: Game,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a new session; difficulty is "easy" or "hard"
    #[wasm_bindgen(constructor)]
    pub fn new(difficulty: &str) -> Result<WasmGame, JsValue> {
        let difficulty: Difficulty = difficulty
            .parse()
            .map_err(|e| JsValue::from_str(&format!("{}", e)))?;

        Ok(WasmGame {
            game: Game::with_difficulty(difficulty),
        })
    }

    /// Get the current game state as JSON
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        serde_json::to_string(self.game.state()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Get the board as nested rows of cells
    #[wasm_bindgen(js_name = getBoard)]
    pub fn get_board(&self) -> String {
        serde_json::to_string(&self.game.board().to_rows()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Move to a cell, returns outcome JSON
    #[wasm_bindgen(js_name = movePlayer)]
    pub fn move_player(&mut self, row: i32, col: i32) -> String {
        outcome_json(self.game.move_to(Position::new(row, col)).into())
    }

    #[wasm_bindgen(js_name = collectResource)]
    pub fn collect_resource(&mut self) -> String {
        outcome_json(self.game.collect().into())
    }

    #[wasm_bindgen(js_name = deliverResource)]
    pub fn deliver_resource(&mut self) -> String {
        outcome_json(self.game.deliver().into())
    }

    #[wasm_bindgen(js_name = undoMove)]
    pub fn undo_move(&mut self) -> String {
        outcome_json(self.game.undo().into())
    }

    /// Apply an action from JSON, returns outcome JSON or error
    #[wasm_bindgen(js_name = applyAction)]
    pub fn apply_action(&mut self, action_json: &str) -> Result<String, JsValue> {
        let action: GameAction = serde_json::from_str(action_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid action JSON: {}", e)))?;

        Ok(outcome_json(self.game.apply_action(action).into()))
    }

    /// Switch difficulty and start a new session
    #[wasm_bindgen(js_name = setDifficulty)]
    pub fn set_difficulty(&mut self, difficulty: &str) -> Result<String, JsValue> {
        let difficulty: Difficulty = difficulty
            .parse()
            .map_err(|e| JsValue::from_str(&format!("{}", e)))?;

        let events = self.game.set_difficulty(difficulty);
        Ok(outcome_json(CommandOutcome::from(Ok::<_, GameError>(events))))
    }

    /// Suggested cell as `{row, col}` JSON, or null when nothing is left
    #[wasm_bindgen(js_name = getHint)]
    pub fn get_hint(&self) -> String {
        match self.game.hint_position() {
            Some(pos) => serde_json::to_string(&pos).unwrap_or_else(|_| "null".to_string()),
            None => "null".to_string(),
        }
    }

    /// Whether a click on this cell is a one-step move
    #[wasm_bindgen(js_name = isAdjacent)]
    pub fn is_adjacent(&self, row: i32, col: i32) -> bool {
        self.game.is_adjacent(Position::new(row, col))
    }

    #[wasm_bindgen(js_name = isOver)]
    pub fn is_over(&self) -> bool {
        self.game.is_over()
    }

    #[wasm_bindgen(js_name = getScore)]
    pub fn get_score(&self) -> u32 {
        self.game.score()
    }

    #[wasm_bindgen(js_name = getMovesRemaining)]
    pub fn get_moves_remaining(&self) -> u32 {
        self.game.moves_remaining()
    }
}

fn outcome_json(outcome: CommandOutcome) -> String {
    serde_json::to_string(&outcome).unwrap_or_else(|_| "{}".to_string())
}
