//! Turret targeting and enemy pursuit

use glam::Vec2;

use super::state::{GameState, Projectile, Turret, palette};
use crate::consts::PROJECTILE_RADIUS;
use crate::heading_to;

/// Turret engagement radius
pub const TURRET_RANGE: f32 = 200.0;
/// Ticks between turret shots
pub const TURRET_PERIOD: f32 = 30.0;
pub const TURRET_RADIUS: f32 = 12.0;
pub const TURRET_SHOT_SPEED: f32 = 12.0;

/// Animation phase advance per tick
const ENEMY_FRAME_STEP: f32 = 0.2;

impl Turret {
    /// A ready-to-fire turret at `pos`
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            radius: TURRET_RADIUS,
            range: TURRET_RANGE,
            cooldown: 0.0,
            period: TURRET_PERIOD,
            alive: true,
        }
    }
}

/// Tick every turret: cool down, then shoot the nearest enemy in range.
///
/// A turret with nothing in range keeps its cooldown at or below zero so it
/// fires the moment a target walks in.
pub fn update_turrets(state: &mut GameState, dt: f32) {
    let mut shots: Vec<(Vec2, Vec2)> = Vec::new();

    for turret in state.turrets.iter_mut().filter(|t| t.alive) {
        if turret.cooldown > 0.0 {
            turret.cooldown -= dt;
        }
        if turret.cooldown > 0.0 {
            continue;
        }

        let target = state
            .enemies
            .iter()
            .filter(|e| e.alive)
            .map(|e| (e.pos, e.pos.distance(turret.pos)))
            .filter(|&(_, d)| d < turret.range)
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        if let Some((target_pos, _)) = target {
            let dir = crate::unit(heading_to(turret.pos, target_pos));
            shots.push((turret.pos, dir * TURRET_SHOT_SPEED));
            turret.cooldown = turret.period;
        }
    }

    for (pos, vel) in shots {
        let id = state.next_entity_id();
        state.projectiles.push(Projectile {
            id,
            pos,
            vel,
            radius: PROJECTILE_RADIUS,
            color: palette::TURRET_SHOT,
            special: true,
            alive: true,
        });
    }
}

/// Every enemy walks straight at the player unless enemies are frozen
pub fn pursue_player(state: &mut GameState) {
    let frozen = state.enemy_freeze > 0;
    let target = state.player.pos;

    for enemy in state.enemies.iter_mut().filter(|e| e.alive) {
        enemy.frame += ENEMY_FRAME_STEP;
        if frozen {
            continue;
        }
        let dir = (target - enemy.pos).normalize_or_zero();
        enemy.pos += dir * enemy.speed;
    }
}
