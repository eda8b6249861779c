use std::sync::{Mutex, MutexGuard};

use once_cell::sync::Lazy;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::prelude::*;

use crate::coord::{BOARD_SIZE, Coordinate};
use crate::game::{Action, Game};
use crate::types::{GameConfig, GameEventView};

static SESSION: Lazy<Mutex<Option<Game>>> = Lazy::new(|| Mutex::new(None));

/// Starts a fresh session, replacing any running game. `config` may be
/// undefined to take the defaults.
#[wasm_bindgen]
pub fn new_game(config: JsValue) -> Result<JsValue, JsValue> {
    let config: GameConfig = if config.is_undefined() || config.is_null() {
        GameConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config).map_err(to_js_error)?
    };
    let game = Game::new_with_random_selector(config).map_err(|e| JsValue::from_str(&e))?;
    let state = serde_wasm_bindgen::to_value(&game.to_game_state()).map_err(to_js_error)?;
    *session()? = Some(game);
    Ok(state)
}

#[wasm_bindgen]
pub fn select(file: u8, rank: u8) -> Result<JsValue, JsValue> {
    submit(Action::Select(coordinate_from(file, rank)?))
}

#[wasm_bindgen]
pub fn deselect(file: u8, rank: u8) -> Result<JsValue, JsValue> {
    submit(Action::Deselect(coordinate_from(file, rank)?))
}

#[wasm_bindgen]
pub fn move_to(file: u8, rank: u8) -> Result<JsValue, JsValue> {
    submit(Action::Move(coordinate_from(file, rank)?))
}

/// Plays one AI turn for the side to move. Equal seeds replay equal
/// choices.
#[wasm_bindgen]
pub fn ai_turn(seed: u64) -> Result<JsValue, JsValue> {
    let mut guard = session()?;
    let game = guard.as_mut().ok_or_else(no_game)?;
    let mut rng = SmallRng::seed_from_u64(seed);
    game.do_ai_turn(&mut rng).map_err(|e| JsValue::from_str(&e))?;
    serde_wasm_bindgen::to_value(&game.to_game_state()).map_err(to_js_error)
}

#[wasm_bindgen]
pub fn game_state() -> Result<JsValue, JsValue> {
    let guard = session()?;
    let game = guard.as_ref().ok_or_else(no_game)?;
    serde_wasm_bindgen::to_value(&game.to_game_state()).map_err(to_js_error)
}

#[wasm_bindgen]
pub fn game_result() -> Result<JsValue, JsValue> {
    let guard = session()?;
    let game = guard.as_ref().ok_or_else(no_game)?;
    serde_wasm_bindgen::to_value(&game.to_game_result()).map_err(to_js_error)
}

/// Drains the queued events, oldest first.
#[wasm_bindgen]
pub fn take_events() -> Result<JsValue, JsValue> {
    let mut guard = session()?;
    let game = guard.as_mut().ok_or_else(no_game)?;
    let views: Vec<GameEventView> = game.take_events().iter().map(GameEventView::from).collect();
    serde_wasm_bindgen::to_value(&views).map_err(to_js_error)
}

/// Parses `"C4"` notation to a flat 0..=63 index.
#[wasm_bindgen]
pub fn parse_coordinate(text: &str) -> Option<u8> {
    Coordinate::parse(text).map(|coordinate| coordinate.index() as u8)
}

/// Formats a square back into `"C4"` notation.
#[wasm_bindgen]
pub fn format_coordinate(file: u8, rank: u8) -> Result<String, JsValue> {
    Ok(coordinate_from(file, rank)?.to_string())
}

fn submit(action: Action) -> Result<JsValue, JsValue> {
    let mut guard = session()?;
    let game = guard.as_mut().ok_or_else(no_game)?;
    game.submit(action);
    serde_wasm_bindgen::to_value(&game.to_game_state()).map_err(to_js_error)
}

fn session() -> Result<MutexGuard<'static, Option<Game>>, JsValue> {
    SESSION
        .lock()
        .map_err(|_| JsValue::from_str("session lock poisoned"))
}

fn coordinate_from(file: u8, rank: u8) -> Result<Coordinate, JsValue> {
    if file as usize >= BOARD_SIZE || rank as usize >= BOARD_SIZE {
        return Err(JsValue::from_str("file/rank out of range"));
    }
    Ok(Coordinate::new(file, rank))
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn no_game() -> JsValue {
    JsValue::from_str("no active game")
}
