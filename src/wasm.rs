//! Browser bindings
//!
//! JS owns the canvas, the images, audio and the player sprite. Each frame
//! it pushes the player snapshot in, calls `tick`, then pulls draw commands
//! and events out as JSON.

use wasm_bindgen::prelude::*;

use crate::renderer::DrawList;
use crate::settings::RunnerSettings;
use crate::sim::{GameState, PlayerSnapshot, RunnerInput, apply_input, set_visible, tick};

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::warn!("Logger already initialized");
    }
    log::info!("Horizon Runner core loaded");
}

/// One game session driven from JS
#[wasm_bindgen]
pub struct WebRunner {
    state: GameState,
    player: PlayerSnapshot,
    draws: DrawList,
}

#[wasm_bindgen]
impl WebRunner {
    /// `seed` defaults to a random one; `settings_json` may override any
    /// subset of the balance keys.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<f64>, settings_json: Option<String>) -> Result<WebRunner, JsValue> {
        let seed = seed.unwrap_or_else(|| (js_sys::Math::random() * u32::MAX as f64).floor());
        let settings = match settings_json {
            Some(json) => RunnerSettings::from_json(&json).map_err(to_js_error)?,
            None => RunnerSettings::default(),
        };
        log::info!("New session, seed {}", seed as u64);

        Ok(Self {
            state: GameState::new(seed as u64, settings),
            player: PlayerSnapshot::default(),
            draws: DrawList::new(),
        })
    }

    pub fn set_assets_ready(&mut self, ready: bool) {
        self.state.set_assets_ready(ready);
    }

    /// Replace the player view (JSON `PlayerSnapshot`)
    pub fn set_player(&mut self, json: &str) -> Result<(), JsValue> {
        self.player = serde_json::from_str(json).map_err(to_js_error)?;
        Ok(())
    }

    pub fn tick(&mut self, now: f64) {
        tick(&mut self.state, &self.player, now);
    }

    pub fn jump(&mut self, now: f64) {
        apply_input(&mut self.state, RunnerInput::Jump, &self.player, now);
    }

    pub fn restart(&mut self, now: f64) {
        apply_input(&mut self.state, RunnerInput::Restart, &self.player, now);
    }

    pub fn pause(&mut self, now: f64) {
        apply_input(&mut self.state, RunnerInput::Pause, &self.player, now);
    }

    pub fn set_visible(&mut self, visible: bool, now: f64) {
        set_visible(&mut self.state, visible, now);
    }

    pub fn update_config_setting(&mut self, key: &str, value: f64) {
        self.state.update_config_setting(key, value);
    }

    /// This frame's draw commands as a JSON array
    pub fn render(&mut self) -> Result<String, JsValue> {
        self.draws.clear();
        self.state.render(&mut self.draws);
        serde_json::to_string(&self.draws.draws).map_err(to_js_error)
    }

    /// Events since the last call as a JSON array
    pub fn drain_events(&mut self) -> Result<String, JsValue> {
        let events = self.state.drain_events();
        serde_json::to_string(&events).map_err(to_js_error)
    }

    pub fn collisions(&self) -> u32 {
        self.state.collisions
    }

    pub fn distance(&self) -> f64 {
        self.state.distance_ran
    }

    pub fn high_score(&self) -> u32 {
        self.state.score_meter.high_score
    }

    pub fn phase(&self) -> String {
        format!("{:?}", self.state.phase)
    }
}
