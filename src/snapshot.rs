//! Per-frame view of the world for the renderer
//!
//! Borrowed straight out of [`GameState`], so building one costs nothing until
//! it is serialized for the JS host.

use glam::Vec2;
use serde::Serialize;

use crate::settings::Settings;
use crate::sim::state::{
    Enemy, GameState, Particle, Player, PlayerStatus, Projectile, Splatter, Turret,
};

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub tick: u64,
    pub bounds: Option<Vec2>,
    pub player: &'a Player,
    pub status: PlayerStatus,
    pub health: f32,
    pub score: u64,
    pub game_over: bool,
    pub enemies: &'a [Enemy],
    pub projectiles: &'a [Projectile],
    pub turrets: &'a [Turret],
    pub particles: &'a [Particle],
    pub splatters: &'a [Splatter],
    pub camera_shake: f32,
    /// Flash ticks remaining (white overlay while > 0)
    pub flash: u32,
    pub enemy_freeze: u32,
}

impl GameState {
    /// Raw view of the current frame
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            tick: self.time_ticks,
            bounds: self.bounds,
            player: &self.player,
            status: self.status,
            health: self.health,
            score: self.score,
            game_over: self.is_game_over(),
            enemies: &self.enemies,
            projectiles: &self.projectiles,
            turrets: &self.turrets,
            particles: self.particles.as_slice(),
            splatters: self.splatters.as_slice(),
            camera_shake: self.camera_shake,
            flash: self.flash,
            enemy_freeze: self.enemy_freeze,
        }
    }
}

impl Snapshot<'_> {
    /// Drop the effects the player has switched off
    pub fn presented(mut self, settings: &Settings) -> Self {
        if !settings.effective_screen_shake() {
            self.camera_shake = 0.0;
        }
        if !settings.effective_flash() {
            self.flash = 0;
        }
        self
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
