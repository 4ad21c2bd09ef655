//! Frame-driven simulation module
//!
//! All gameplay logic lives here. Everything hangs off one [`GameState`]:
//! - Timers count ticks, cooldowns count normalized time
//! - Seeded RNG only
//! - Entities keep spawn order, removal happens in one sweep per tick
//! - No rendering or platform dependencies

pub mod ai;
pub mod collision;
pub mod command;
pub mod control;
pub mod effects;
pub mod pool;
pub mod spawn;
pub mod state;
pub mod tick;

pub use ai::{pursue_player, update_turrets};
pub use collision::{circles_overlap, resolve};
pub use command::{Command, MarketAction, UnknownAction};
pub use control::{Autopilot, ControlMode, DirectControl, MovementPolicy, Steering, UnknownMode};
pub use effects::{
    EffectKind, UnknownEffect, heal_player, trigger_effect, trigger_effect_id, upgrade_weapon,
};
pub use pool::{ParticlePool, SplatterPool};
pub use spawn::{spawn_enemies, spawn_enemy};
pub use state::{
    Color, Enemy, EnemyKind, GameEvent, GameState, Particle, ParticleKind, Player, PlayerStatus,
    Projectile, Splatter, SplatterKind, Turret,
};
pub use tick::{TickInput, tick};
