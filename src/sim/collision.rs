//! Collision detection and damage resolution
//!
//! Plain pairwise circle tests: entity counts stay in the low hundreds, so
//! enemies x projectiles is cheap enough without a spatial index.

use glam::Vec2;
use rand::Rng;

use super::state::{GameEvent, GameState, ParticleKind, palette};
use crate::consts::{CONTACT_DAMAGE_SCALE, CONTACT_PUSHBACK, HIT_TOLERANCE};

/// Blood particles on a projectile hit
const HIT_BLOOD: usize = 3;
/// Blood particles on a kill
const KILL_BLOOD: usize = 15;
/// Blood particles when the player gets bitten
const BITE_BLOOD: usize = 2;
/// Chance per overlapping tick that a bite draws blood
const BITE_BLOOD_CHANCE: f32 = 0.2;

/// Whether two circles overlap, with `slack` extra reach
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32, slack: f32) -> bool {
    a.distance_squared(b) < (ra + rb + slack).powi(2)
}

/// Resolve all combat for this tick: bites, hits, then deaths
pub fn resolve(state: &mut GameState) {
    resolve_contacts(state);
    resolve_hits(state);
    reap_enemies(state);
}

/// Enemy bodies touching the player deal continuous damage
pub fn resolve_contacts(state: &mut GameState) {
    if !state.player.alive || state.status.is_shielded() {
        return;
    }

    let health_before = state.health;
    for enemy in state.enemies.iter().filter(|e| e.alive && e.hp > 0) {
        let player = &mut state.player;
        if !circles_overlap(enemy.pos, enemy.radius, player.pos, player.radius, 0.0) {
            continue;
        }

        state.health = (state.health - enemy.damage * CONTACT_DAMAGE_SCALE).max(0.0);
        player.pos += (player.pos - enemy.pos) * CONTACT_PUSHBACK;

        if state.rng.random::<f32>() < BITE_BLOOD_CHANCE {
            let at = player.pos;
            state
                .particles
                .emit(&mut state.rng, at, palette::PLAYER_BLOOD, BITE_BLOOD, ParticleKind::Blood);
        }

        if state.health <= 0.0 {
            break;
        }
    }

    if state.health != health_before {
        state.player.pos = state.confine(state.player.pos);
        let health = state.health;
        state.push_event(GameEvent::HealthChanged(health));
    }

    if state.health <= 0.0 {
        state.player.alive = false;
        state.push_event(GameEvent::GameOver);
        log::info!("Player down at tick {} with score {}", state.time_ticks, state.score);
    }
}

/// Projectiles chip one hit point off the first live enemy they touch
pub fn resolve_hits(state: &mut GameState) {
    for enemy in state.enemies.iter_mut().filter(|e| e.alive && e.hp > 0) {
        for shot in state.projectiles.iter_mut().filter(|p| p.alive) {
            if !circles_overlap(enemy.pos, enemy.radius, shot.pos, shot.radius, HIT_TOLERANCE) {
                continue;
            }
            shot.alive = false;
            enemy.wound(1);
            state.particles.emit(
                &mut state.rng,
                shot.pos,
                enemy.blood_color(),
                HIT_BLOOD,
                ParticleKind::Blood,
            );
            if enemy.hp == 0 {
                break;
            }
        }
    }
}

/// Remove enemies at zero hit points, paying out score and leaving gore
pub fn reap_enemies(state: &mut GameState) {
    for enemy in state.enemies.iter_mut().filter(|e| e.is_dying()) {
        enemy.alive = false;
        state.score += enemy.bounty();
        state.events.push(GameEvent::ScoreChanged(state.score));
        state.particles.emit(
            &mut state.rng,
            enemy.pos,
            enemy.blood_color(),
            KILL_BLOOD,
            ParticleKind::Blood,
        );
        state
            .splatters
            .stamp(&mut state.rng, enemy.pos, enemy.stain_color());
    }
}
