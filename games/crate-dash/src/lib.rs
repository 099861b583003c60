use wasm_bindgen::prelude::*;

pub mod config;
pub mod game;
pub mod hud;
pub mod input;
pub mod level;
pub mod movement;
pub mod powerup;
pub mod round;
pub mod rules;

pub use config::{ConfigError, DashConfig};
pub use game::CrateDash;
pub use hud::{Hud, Presenter};

dash_web::export_game!(CrateDash, "crate-dash");

/// Current HUD text as JSON: `{"timer": "...", "banner": ..., "message": ...}`.
#[wasm_bindgen]
pub fn get_hud_json() -> Result<String, JsValue> {
    with_runner(|r| r.game().hud().to_json())
        .unwrap_or_else(|| Ok(String::from("{}")))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Validate a JSON config and use it from the next restart on.
#[wasm_bindgen]
pub fn game_load_config(json: &str) -> Result<(), JsValue> {
    let config = DashConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    log::info!("crate-dash: config loaded, applies on restart");
    with_runner(|r| r.game_mut().load_config(config))
        .ok_or_else(|| JsValue::from_str("game_init() has not run"))
}
