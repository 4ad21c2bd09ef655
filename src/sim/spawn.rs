//! Enemy variants and spawning
//!
//! Two placement modes: ambient (somewhere in the world, away from the player)
//! and targeted (near a caller-supplied point, announced with a spark burst).

use glam::Vec2;
use rand::Rng;

use super::state::{Color, Enemy, EnemyKind, GameState, ParticleKind, palette};
use crate::consts::{AMBIENT_SPAWN_MIN_DIST, SPAWN_PADDING};

/// Base stats of one enemy variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub kind: EnemyKind,
    pub boss: bool,
    pub hp: u32,
    /// Before per-spawn jitter
    pub speed: f32,
    pub radius: f32,
    pub damage: f32,
    pub color: Color,
}

pub const BOSS: EnemyStats = EnemyStats {
    kind: EnemyKind::Tank,
    boss: true,
    hp: 200,
    speed: 1.2,
    radius: 35.0,
    damage: 20.0,
    color: palette::BOSS,
};

pub const TANK: EnemyStats = EnemyStats {
    kind: EnemyKind::Tank,
    boss: false,
    hp: 10,
    speed: 1.5,
    radius: 20.0,
    damage: 10.0,
    color: palette::TANK,
};

pub const SPITTER: EnemyStats = EnemyStats {
    kind: EnemyKind::Spitter,
    boss: false,
    hp: 2,
    speed: 3.5,
    radius: 12.0,
    damage: 5.0,
    color: palette::SPITTER,
};

pub const CRAWLER: EnemyStats = EnemyStats {
    kind: EnemyKind::Crawler,
    boss: false,
    hp: 3,
    speed: 2.0,
    radius: 12.0,
    damage: 5.0,
    color: palette::CRAWLER,
};

/// Upper bound of the uniform speed bonus each spawn gets
pub const SPEED_JITTER: f32 = 0.5;
/// Width of the square window a targeted spawn lands in, centred on the target
pub const TARGET_JITTER: f32 = 20.0;
/// Placement tries before an ambient spawn settles for the farthest candidate
const AMBIENT_ATTEMPTS: usize = 64;
const PORTAL_SPARKS: usize = 10;

/// Pick a non-boss variant from a uniform roll in `[0, 1)`
pub fn variant_for_roll(roll: f32) -> &'static EnemyStats {
    if roll > 0.8 {
        &TANK
    } else if roll > 0.6 {
        &SPITTER
    } else {
        &CRAWLER
    }
}

/// Spawn `count` enemies, targeted at `at` or ambient when `at` is `None`.
///
/// Returns how many were actually placed; ambient spawns need world bounds.
pub fn spawn_enemies(state: &mut GameState, boss: bool, count: usize, at: Option<Vec2>) -> usize {
    let mut placed = 0;
    for _ in 0..count {
        if spawn_enemy(state, boss, at).is_some() {
            placed += 1;
        }
    }
    placed
}

/// Spawn a single enemy and return its id
pub fn spawn_enemy(state: &mut GameState, boss: bool, at: Option<Vec2>) -> Option<u32> {
    let pos = match at {
        Some(target) => {
            let jitter = Vec2::new(
                state.rng.random::<f32>() - 0.5,
                state.rng.random::<f32>() - 0.5,
            ) * TARGET_JITTER;
            let pos = target + jitter;
            state
                .particles
                .emit(&mut state.rng, pos, palette::PORTAL, PORTAL_SPARKS, ParticleKind::Spark);
            pos
        }
        None => ambient_point(state)?,
    };

    let roll = state.rng.random::<f32>();
    let stats = if boss { &BOSS } else { variant_for_roll(roll) };
    let speed = stats.speed + state.rng.random::<f32>() * SPEED_JITTER;
    let frame = state.rng.random::<f32>() * 10.0;

    let id = state.next_entity_id();
    state.enemies.push(Enemy {
        id,
        pos,
        radius: stats.radius,
        color: stats.color,
        speed,
        hp: stats.hp,
        max_hp: stats.hp,
        boss: stats.boss,
        kind: stats.kind,
        frame,
        damage: stats.damage,
        alive: true,
    });

    if boss {
        log::info!("Boss {} spawned at ({:.0}, {:.0})", id, pos.x, pos.y);
    }
    Some(id)
}

/// Random point inside the padded world, at least AMBIENT_SPAWN_MIN_DIST from the player
fn ambient_point(state: &mut GameState) -> Option<Vec2> {
    let size = state.bounds?;
    let span = (size - Vec2::splat(SPAWN_PADDING * 2.0)).max(Vec2::ZERO);
    let player = state.player.pos;

    let mut best = None;
    let mut best_dist = f32::NEG_INFINITY;
    for _ in 0..AMBIENT_ATTEMPTS {
        let candidate = Vec2::splat(SPAWN_PADDING)
            + Vec2::new(state.rng.random::<f32>(), state.rng.random::<f32>()) * span;
        let dist = candidate.distance(player);
        if dist >= AMBIENT_SPAWN_MIN_DIST {
            return Some(candidate);
        }
        if dist > best_dist {
            best_dist = dist;
            best = Some(candidate);
        }
    }
    log::debug!(
        "Ambient spawn could not clear {} units from the player; using farthest candidate",
        AMBIENT_SPAWN_MIN_DIST
    );
    best
}
