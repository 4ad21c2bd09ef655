//! Swarm Arena - top-down arena shooter simulation core
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (entities, AI, collisions, effects)
//! - `snapshot`: Read-only per-frame view for the renderer
//! - `session`: Single owner of a running simulation and its host command queue
//! - `settings`: Player preferences and quality presets
//! - `web`: `wasm_bindgen` surface for the browser host (wasm32 only)

pub mod session;
pub mod settings;
pub mod sim;
pub mod snapshot;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use session::{Arena, FrameClock};
pub use settings::{QualityPreset, Settings};
pub use snapshot::Snapshot;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Length of one normalized tick in host milliseconds (60 Hz)
    pub const TICK_MS: f32 = 16.67;
    /// Longest host frame the clock will accept before clamping
    pub const MAX_FRAME_MS: f32 = 50.0;

    /// Inset from the world edge the player may not cross
    pub const WORLD_MARGIN: f32 = 30.0;
    /// Player spawn point used until the host reports world bounds
    pub const DEFAULT_PLAYER_POS: (f32, f32) = (400.0, 300.0);

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 14.0;
    pub const PLAYER_BASE_SPEED: f32 = 4.0;
    pub const PLAYER_MAX_HP: f32 = 100.0;

    /// Weapon
    pub const MAX_WEAPON_LEVEL: u8 = 5;
    pub const PROJECTILE_SPEED: f32 = 15.0;
    pub const PROJECTILE_RADIUS: f32 = 3.0;
    /// Distance in front of the player where shots appear
    pub const MUZZLE_OFFSET: f32 = 20.0;
    /// Camera shake set by every volley
    pub const RECOIL_SHAKE: f32 = 2.0;

    /// Extra slack on projectile vs enemy overlap tests
    pub const HIT_TOLERANCE: f32 = 5.0;
    /// Fraction of an enemy's contact damage applied per overlapping tick
    pub const CONTACT_DAMAGE_SCALE: f32 = 0.1;
    /// Fraction of the enemy->player offset applied as pushback on contact
    pub const CONTACT_PUSHBACK: f32 = 0.1;

    /// Autopilot keeps at least this far from its target
    pub const STANDOFF_DISTANCE: f32 = 180.0;

    /// Camera shake multiplier per tick
    pub const SHAKE_DECAY: f32 = 0.9;

    /// Ambient spawns land at least this far from the player
    pub const AMBIENT_SPAWN_MIN_DIST: f32 = 300.0;
    /// Ambient spawns stay this far inside the world edge
    pub const SPAWN_PADDING: f32 = 50.0;

    /// Floor decal pool
    pub const MAX_SPLATTERS: usize = 300;
    pub const SPLATTER_EVICT_BATCH: usize = 50;
}

/// Heading (radians) of the line from `from` to `to`
#[inline]
pub fn heading_to(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Unit vector pointing along `theta`
#[inline]
pub fn unit(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Clamp a point so it stays `margin` inside a `size`-sized world
#[inline]
pub fn clamp_inset(pos: Vec2, size: Vec2, margin: f32) -> Vec2 {
    let lo = Vec2::splat(margin);
    // Degenerate worlds (smaller than two margins) pin to the lower inset
    let hi = (size - Vec2::splat(margin)).max(lo);
    pos.clamp(lo, hi)
}
