//! Browser bindings
//!
//! The page owns the canvas, the input listeners and the render loop; it calls
//! [`WebArena::frame`] once per animation frame and draws the returned snapshot.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::session::Arena;
use crate::settings::{QualityPreset, Settings};
use crate::sim::command::{Command, MarketAction};
use crate::sim::control::ControlMode;
use crate::sim::state::GameEvent;
use crate::sim::tick::TickInput;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }
    log::info!("Swarm Arena module loaded");
}

fn point(x: Option<f32>, y: Option<f32>) -> Option<Vec2> {
    match (x, y) {
        (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some(Vec2::new(x, y)),
        _ => None,
    }
}

#[wasm_bindgen]
pub struct WebArena {
    arena: Arena,
    on_health: Option<js_sys::Function>,
    on_score: Option<js_sys::Function>,
    on_game_over: Option<js_sys::Function>,
}

#[wasm_bindgen]
impl WebArena {
    /// `role` is the room role ("STREAMER" / "VIEWER") or a mode name
    #[wasm_bindgen(constructor)]
    pub fn new(role: &str, seed: Option<f64>) -> WebArena {
        let mode = role.parse::<ControlMode>().unwrap_or_else(|e| {
            log::warn!("{}, falling back to direct control", e);
            ControlMode::Direct
        });
        let seed = seed.unwrap_or_else(js_sys::Date::now) as u64;
        WebArena {
            arena: Arena::new(mode, seed, Settings::load()),
            on_health: None,
            on_score: None,
            on_game_over: None,
        }
    }

    pub fn set_bounds(&mut self, width: f32, height: f32) {
        self.arena.set_bounds(width, height);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn set_input(
        &mut self,
        up: bool,
        down: bool,
        left: bool,
        right: bool,
        px: f32,
        py: f32,
        fire: bool,
    ) {
        self.arena.set_input(TickInput {
            up,
            down,
            left,
            right,
            pointer: Vec2::new(px, py),
            fire,
        });
    }

    pub fn spawn_enemy(&mut self, is_boss: bool, count: i32, x: Option<f32>, y: Option<f32>) {
        self.arena
            .push(Command::spawn(is_boss, i64::from(count), point(x, y)));
    }

    pub fn heal_player(&mut self, amount: f32) {
        self.arena.push(Command::Heal(amount));
    }

    pub fn upgrade_weapon(&mut self) {
        self.arena.push(Command::UpgradeWeapon);
    }

    pub fn trigger_effect(&mut self, id: String, x: Option<f32>, y: Option<f32>) {
        self.arena.push(Command::Effect { id, at: point(x, y) });
    }

    /// Queue a viewer purchase by its wire name; returns false if it was dropped
    pub fn market_action(
        &mut self,
        kind: &str,
        effect_id: Option<String>,
        x: Option<f32>,
        y: Option<f32>,
    ) -> bool {
        match kind.parse::<MarketAction>() {
            Ok(action) => self
                .arena
                .market_action(action, effect_id.as_deref(), point(x, y)),
            Err(e) => {
                log::warn!("{}", e);
                false
            }
        }
    }

    pub fn on_health_change(&mut self, callback: js_sys::Function) {
        self.on_health = Some(callback);
    }

    pub fn on_score_change(&mut self, callback: js_sys::Function) {
        self.on_score = Some(callback);
    }

    pub fn on_game_over(&mut self, callback: js_sys::Function) {
        self.on_game_over = Some(callback);
    }

    /// Run one frame and return the snapshot as JSON
    pub fn frame(&mut self, now_ms: f64) -> String {
        for event in self.arena.frame(now_ms) {
            self.dispatch(event);
        }
        match self.arena.snapshot().to_json() {
            Ok(json) => json,
            Err(e) => {
                log::error!("Snapshot serialization failed: {}", e);
                String::new()
            }
        }
    }

    pub fn reset(&mut self) {
        self.arena.push(Command::Reset {
            seed: js_sys::Date::now() as u64,
        });
    }

    /// Replace the settings from JSON and persist them; malformed input is rejected
    pub fn set_settings(&mut self, json: &str) -> bool {
        match Settings::from_json(json) {
            Ok(settings) => {
                self.apply_settings(settings);
                true
            }
            Err(e) => {
                log::warn!("Rejected settings: {}", e);
                false
            }
        }
    }

    /// Switch quality preset by name ("low" / "medium" / "high")
    pub fn set_quality(&mut self, name: &str) -> bool {
        match QualityPreset::parse(name) {
            Some(quality) => {
                let settings = Settings {
                    quality,
                    ..self.arena.settings().clone()
                };
                self.apply_settings(settings);
                true
            }
            None => {
                log::warn!("Unknown quality preset: {}", name);
                false
            }
        }
    }

    pub fn settings_json(&self) -> String {
        serde_json::to_string(self.arena.settings()).unwrap_or_default()
    }

    pub fn score(&self) -> f64 {
        self.arena.state().score as f64
    }

    pub fn health(&self) -> f32 {
        self.arena.state().health
    }
}

impl WebArena {
    fn apply_settings(&mut self, settings: Settings) {
        settings.save();
        self.arena.set_settings(settings);
    }

    fn dispatch(&self, event: GameEvent) {
        let (callback, arg) = match event {
            GameEvent::HealthChanged(health) => {
                (&self.on_health, JsValue::from_f64(f64::from(health)))
            }
            GameEvent::ScoreChanged(score) => (&self.on_score, JsValue::from_f64(score as f64)),
            GameEvent::GameOver => (&self.on_game_over, JsValue::UNDEFINED),
        };
        if let Some(f) = callback {
            if let Err(e) = f.call1(&JsValue::NULL, &arg) {
                log::error!("Host callback threw: {:?}", e);
            }
        }
    }
}
