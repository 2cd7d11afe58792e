//! Browser surface
//!
//! The JavaScript side owns the renderer, the scene graph and input events.
//! It feeds input into a [`GameHandle`], calls `update` once per animation
//! frame, then reads back poses and drains cues as JSON.

use glam::{Vec2, Vec3};
use wasm_bindgen::prelude::*;

use crate::layout::WorldLayout;
use crate::settings::Settings;
use crate::sim::{GamePhase, SimState, TickInput, tick};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialised".into());
    }
    log::info!("Glenblade core loaded");
}

fn to_js(v: Vec3) -> Vec<f32> {
    v.to_array().to_vec()
}

#[wasm_bindgen]
pub struct GameHandle {
    state: SimState,
    input: TickInput,
    settings: Settings,
    announced_game_over: bool,
}

#[wasm_bindgen]
impl GameHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> GameHandle {
        let settings = Settings::load();
        let mut state = SimState::new(seed, Tuning::default());
        state.apply_settings(&settings);
        GameHandle {
            state,
            input: TickInput::default(),
            settings,
            announced_game_over: false,
        }
    }

    /// Replace tuning; call before `load_layout`
    pub fn load_tuning(&mut self, json: &str) -> Result<(), JsError> {
        let tuning =
            Tuning::from_json(json).inspect_err(|e| log::warn!("Rejected tuning: {}", e))?;
        let mut state = SimState::new(self.state.seed, tuning);
        state.apply_settings(&self.settings);
        self.state = state;
        Ok(())
    }

    /// Populate the world from the scenery builder's layout
    pub fn load_layout(&mut self, json: &str) -> Result<(), JsError> {
        let layout =
            WorldLayout::from_json(json).inspect_err(|e| log::warn!("Rejected layout: {}", e))?;
        layout.populate(&mut self.state);
        Ok(())
    }

    /// Current settings as JSON
    pub fn settings_json(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.settings)?)
    }

    /// Replace and persist settings
    pub fn set_settings_json(&mut self, json: &str) -> Result<(), JsError> {
        self.settings = serde_json::from_str(json)?;
        self.settings.save();
        self.state.apply_settings(&self.settings);
        Ok(())
    }

    pub fn set_movement(&mut self, forward: bool, backward: bool, left: bool, right: bool) {
        self.input.forward = forward;
        self.input.backward = backward;
        self.input.left = left;
        self.input.right = right;
    }

    pub fn set_jump(&mut self, held: bool) {
        self.input.jump = held;
    }

    /// Accumulate pointer movement until the next update
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.input.orbit += Vec2::new(dx, dy);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.input.zoom += delta;
    }

    pub fn attack(&mut self) {
        self.input.attack = true;
    }

    pub fn toggle_lock(&mut self) {
        self.input.toggle_lock = true;
    }

    pub fn reset_position(&mut self) {
        self.input.reset = true;
    }

    /// Pickup collected by the interaction layer
    pub fn heal(&mut self, amount: u8) {
        self.state.heal(amount);
    }

    /// Advance one rendered frame (`dt` in seconds)
    pub fn update(&mut self, dt: f32) {
        tick(&mut self.state, &self.input, None, dt);

        // Clear one-shot inputs after processing
        self.input.attack = false;
        self.input.toggle_lock = false;
        self.input.reset = false;
        self.input.orbit = Vec2::ZERO;
        self.input.zoom = 0.0;

        if self.state.phase == GamePhase::GameOver && !self.announced_game_over {
            self.announced_game_over = true;
            if let Some(window) = web_sys::window() {
                let _ = window.alert_with_message("Game Over! Reload to try again.");
            }
        }
    }

    pub fn player_position(&self) -> Vec<f32> {
        self.state
            .player
            .as_ref()
            .map(|p| to_js(p.position))
            .unwrap_or_default()
    }

    pub fn player_yaw(&self) -> f32 {
        self.state.player.as_ref().map(|p| p.yaw).unwrap_or(0.0)
    }

    pub fn player_health(&self) -> u8 {
        self.state.player.as_ref().map(|p| p.health).unwrap_or(0)
    }

    pub fn camera_eye(&self) -> Vec<f32> {
        to_js(self.state.camera.eye())
    }

    pub fn camera_look_at(&self) -> Vec<f32> {
        to_js(self.state.camera.look_at)
    }

    pub fn is_locked(&self) -> bool {
        self.state.is_locked()
    }

    /// World position of the locked enemy for the reticle (empty when unlocked)
    pub fn lock_target_position(&self) -> Vec<f32> {
        self.state
            .lock_target()
            .map(|t| to_js(t.position))
            .unwrap_or_default()
    }

    /// Live enemies as JSON `[{"id", "position", "yaw", "health"}]`
    pub fn enemies_json(&self) -> Result<String, JsError> {
        let enemies: Vec<_> = self
            .state
            .enemies
            .iter()
            .map(|e| {
                serde_json::json!({
                    "id": e.id.0,
                    "position": e.position,
                    "yaw": e.yaw,
                    "health": e.health,
                })
            })
            .collect();
        Ok(serde_json::to_string(&enemies)?)
    }

    /// Cues accumulated since the last call
    pub fn drain_events_json(&mut self) -> Result<String, JsError> {
        let events = self.state.drain_events();
        Ok(serde_json::to_string(&events)?)
    }

    pub fn is_game_over(&self) -> bool {
        self.state.phase == GamePhase::GameOver
    }
}
