#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsValue;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

use checkers::api;
use checkers::types::{GameConfig, PlayerConfig};

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn engine_reports_ready() {
    assert!(checkers::wasm_ready());
}

#[wasm_bindgen_test]
fn a_session_runs_one_turn_end_to_end() {
    let state = api::new_game(JsValue::UNDEFINED).unwrap();
    assert!(state.is_object());

    api::select(2, 5).unwrap();
    api::move_to(1, 4).unwrap();

    let events = api::take_events().unwrap();
    assert!(js_sys::Array::is_array(&events));
    assert!(js_sys::Array::from(&events).length() > 0);

    let state = api::game_state().unwrap();
    assert!(state.is_object());
    let result = api::game_result().unwrap();
    assert!(result.is_object());
}

#[wasm_bindgen_test]
fn an_ai_side_moves_from_a_seed() {
    let config = GameConfig {
        bottom: PlayerConfig {
            name: "Robo".to_string(),
            ai: true,
        },
        ..GameConfig::default()
    };
    let config = serde_wasm_bindgen::to_value(&config).unwrap();
    api::new_game(config).unwrap();

    let state = api::ai_turn(7).unwrap();
    assert!(state.is_object());
}

#[wasm_bindgen_test]
fn coordinate_text_round_trips() {
    assert_eq!(api::parse_coordinate("A6"), Some(40));
    assert_eq!(api::parse_coordinate("Z9"), None);
    assert_eq!(api::format_coordinate(0, 5).unwrap(), "A6");
}
