//! Simulation tick
//!
//! Advances the whole world by one logical 60 Hz step.

use glam::Vec2;
use rand::Rng;

use super::ai::{pursue_player, update_turrets};
use super::collision::resolve;
use super::control::{MovementPolicy, SteerContext};
use super::state::{GameState, Projectile, palette};
use crate::consts::*;
use crate::unit;

/// Input snapshot for a single tick, already normalized by the host
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Cursor position in world space
    pub pointer: Vec2,
    /// Pointer held down
    pub fire: bool,
}

/// Ticks between volleys at a weapon level
pub fn weapon_cooldown(level: u8) -> f32 {
    if level >= MAX_WEAPON_LEVEL {
        5.0
    } else {
        15.0 - f32::from(level.max(1)) * 2.0
    }
}

/// Projectiles per volley at a weapon level
pub fn volley_size(level: u8) -> usize {
    match level {
        0 | 1 => 1,
        2 | 3 => 2,
        _ => 3,
    }
}

/// Total angular spread (radians) of a volley at a weapon level
pub fn volley_spread(level: u8) -> f32 {
    if level > 2 { 0.2 } else { 0.05 }
}

/// Advance the game state by one tick.
///
/// `dt` is elapsed time in ticks (1.0 = 1/60 s), already clamped by the
/// caller. A zero or NaN `dt` only sweeps; a dead player makes the tick a no-op.
/// Without world bounds nothing fires and nothing stays in flight.
pub fn tick(state: &mut GameState, policy: &mut dyn MovementPolicy, input: &TickInput, dt: f32) {
    if state.is_game_over() {
        return;
    }
    if dt.is_nan() || dt <= 0.0 {
        state.sweep();
        return;
    }

    state.time_ticks += 1;

    // Timers
    state.enemy_freeze = state.enemy_freeze.saturating_sub(1);
    state.flash = state.flash.saturating_sub(1);
    state.status.tick();

    let speed = PLAYER_BASE_SPEED * state.status.speed_multiplier();
    let frozen = state.status.is_frozen();

    // Movement and aim
    let mut wants_fire = false;
    if !frozen {
        let steering = policy.steer(&SteerContext {
            player: &state.player,
            enemies: &state.enemies,
            input,
            speed,
            inverted: state.status.is_inverted(),
        });
        if let Some(facing) = steering.facing {
            state.player.angle = facing;
        }
        // Without a render surface there is nothing to clamp against, so hold still
        if let Some(size) = state.bounds {
            let moved = state.player.pos + steering.delta;
            state.player.pos = crate::clamp_inset(moved, size, WORLD_MARGIN);
        }
        wants_fire = steering.fire;
    }

    // Weapon
    if state.player.cooldown > 0.0 {
        state.player.cooldown -= dt;
    }
    let armed = state.bounds.is_some() && !frozen;
    if wants_fire && armed && state.player.cooldown <= 0.0 {
        fire_volley(state);
    }

    // Decay screen shake
    state.camera_shake *= SHAKE_DECAY;
    if state.camera_shake < 0.01 {
        state.camera_shake = 0.0;
    }

    if state.bounds.is_some() {
        update_turrets(state, dt);
    }
    pursue_player(state);

    // Projectiles
    match state.bounds {
        Some(size) => {
            for shot in state.projectiles.iter_mut().filter(|p| p.alive) {
                shot.pos += shot.vel;
                let out = shot.pos.x < 0.0
                    || shot.pos.x > size.x
                    || shot.pos.y < 0.0
                    || shot.pos.y > size.y;
                if out {
                    shot.alive = false;
                }
            }
        }
        None => state.projectiles.clear(),
    }

    resolve(state);

    state.particles.update();
    state.sweep();
}

/// Fire one volley from the player's muzzle and restart the cooldown
pub fn fire_volley(state: &mut GameState) {
    let level = state.player.weapon_level;
    let spread = volley_spread(level);

    for _ in 0..volley_size(level) {
        let angle = state.player.angle + (state.rng.random::<f32>() - 0.5) * spread;
        let dir = unit(angle);
        let id = state.next_entity_id();
        state.projectiles.push(Projectile {
            id,
            pos: state.player.pos + dir * MUZZLE_OFFSET,
            vel: dir * PROJECTILE_SPEED,
            radius: PROJECTILE_RADIUS,
            color: palette::PLAYER_SHOT,
            special: false,
            alive: true,
        });
    }

    state.camera_shake = RECOIL_SHAKE;
    state.player.cooldown = weapon_cooldown(level);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::control::{Autopilot, DirectControl};
    use crate::sim::effects::{EffectKind, trigger_effect};
    use crate::sim::spawn::{spawn_enemies, spawn_enemy};
    use crate::sim::state::{GameEvent, Turret};
    use proptest::prelude::*;

    fn arena(seed: u64) -> GameState {
        GameState::with_bounds(seed, 800.0, 600.0)
    }

    #[test]
    fn test_weapon_tables() {
        let cooldowns: Vec<f32> = (1..=5).map(weapon_cooldown).collect();
        assert_eq!(cooldowns, vec![13.0, 11.0, 9.0, 7.0, 5.0]);
        let sizes: Vec<usize> = (1..=5).map(volley_size).collect();
        assert_eq!(sizes, vec![1, 2, 2, 3, 3]);
        assert_eq!(volley_spread(2), 0.05);
        assert_eq!(volley_spread(3), 0.2);
    }

    #[test]
    fn test_zero_dt_only_sweeps() {
        let mut state = arena(1);
        state.status.shield = 10;
        state.enemy_freeze = 10;
        spawn_enemy(&mut state, false, Some(Vec2::new(100.0, 100.0)));
        state.enemies[0].alive = false;
        let pos = state.player.pos;

        tick(&mut state, &mut DirectControl, &TickInput { right: true, ..Default::default() }, 0.0);
        assert!(state.enemies.is_empty());
        assert_eq!(state.status.shield, 10);
        assert_eq!(state.enemy_freeze, 10);
        assert_eq!(state.player.pos, pos);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_timers_decay_once_per_tick() {
        let mut state = arena(2);
        state.status.slow = 2;
        state.status.darkness = 1;
        state.flash = 3;
        state.enemy_freeze = 1;

        for _ in 0..2 {
            tick(&mut state, &mut DirectControl, &TickInput::default(), 1.0);
        }
        assert_eq!(state.status.slow, 0);
        assert_eq!(state.status.darkness, 0);
        assert_eq!(state.flash, 1);
        assert_eq!(state.enemy_freeze, 0);
    }

    #[test]
    fn test_slow_and_boost_multiply() {
        let mut state = arena(3);
        let start = state.player.pos;
        let right = TickInput {
            right: true,
            pointer: Vec2::new(800.0, 300.0),
            ..Default::default()
        };

        state.status.slow = 100;
        tick(&mut state, &mut DirectControl, &right, 1.0);
        assert!((state.player.pos.x - (start.x + 2.0)).abs() < 1e-4);

        state.status.speed = 100;
        tick(&mut state, &mut DirectControl, &right, 1.0);
        assert!((state.player.pos.x - (start.x + 6.0)).abs() < 1e-4);
    }

    #[test]
    fn test_frozen_player_neither_moves_nor_fires() {
        let mut state = arena(4);
        state.status.freeze = 5;
        let pos = state.player.pos;
        let input = TickInput {
            left: true,
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &mut DirectControl, &input, 1.0);
        assert_eq!(state.player.pos, pos);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_firing_spawns_volley_and_shakes() {
        let mut state = arena(5);
        let input = TickInput {
            fire: true,
            pointer: Vec2::new(800.0, 300.0),
            ..Default::default()
        };
        tick(&mut state, &mut DirectControl, &input, 1.0);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.player.cooldown, 13.0);
        assert!((state.camera_shake - RECOIL_SHAKE * SHAKE_DECAY).abs() < 1e-5);

        // Still cooling down
        tick(&mut state, &mut DirectControl, &input, 1.0);
        assert_eq!(state.projectiles.len(), 1);

        state.player.weapon_level = 5;
        state.player.cooldown = 0.0;
        tick(&mut state, &mut DirectControl, &input, 1.0);
        assert_eq!(state.projectiles.len(), 4);
    }

    #[test]
    fn test_cooldown_scales_with_dt() {
        let mut state = arena(6);
        state.player.cooldown = 6.0;
        tick(&mut state, &mut DirectControl, &TickInput::default(), 2.5);
        assert!((state.player.cooldown - 3.5).abs() < 1e-5);
    }

    #[test]
    fn test_projectiles_leave_the_world() {
        let mut state = arena(7);
        let id = state.next_entity_id();
        state.projectiles.push(Projectile {
            id,
            pos: Vec2::new(790.0, 300.0),
            vel: Vec2::new(15.0, 0.0),
            radius: 3.0,
            color: palette::PLAYER_SHOT,
            special: false,
            alive: true,
        });
        tick(&mut state, &mut DirectControl, &TickInput::default(), 1.0);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_adjacent_enemy_bites_once_per_tick() {
        let mut state = arena(8);
        state.enemy_freeze = 10;
        let p = state.player.pos;
        spawn_enemy(&mut state, false, Some(p));
        state.enemies[0].pos = p + Vec2::new(5.0, 0.0);
        let damage = state.enemies[0].damage;

        tick(&mut state, &mut DirectControl, &TickInput::default(), 1.0);
        assert!((state.health - (100.0 - damage * 0.1)).abs() < 1e-5);
    }

    #[test]
    fn test_nuke_then_tick_reaps_and_scores() {
        let mut state = arena(9);
        spawn_enemies(&mut state, false, 5, Some(Vec2::new(100.0, 100.0)));
        trigger_effect(&mut state, EffectKind::Nuke, None);
        assert!(state.enemies.iter().all(|e| e.hp == 0));
        assert_eq!(state.flash, 20);

        tick(&mut state, &mut DirectControl, &TickInput::default(), 1.0);
        assert!(state.enemies.is_empty());
        assert_eq!(state.score, 250);
        assert_eq!(state.flash, 19);
    }

    #[test]
    fn test_game_over_is_terminal() {
        let mut state = arena(10);
        state.health = 0.1;
        let p = state.player.pos;
        spawn_enemy(&mut state, true, Some(p));
        state.enemies[0].pos = p;

        tick(&mut state, &mut DirectControl, &TickInput::default(), 1.0);
        assert!(state.is_game_over());
        let events = state.drain_events();
        assert_eq!(events.iter().filter(|e| **e == GameEvent::GameOver).count(), 1);

        let ticks = state.time_ticks;
        for _ in 0..5 {
            tick(&mut state, &mut DirectControl, &TickInput::default(), 1.0);
        }
        assert_eq!(state.time_ticks, ticks);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_missing_bounds_skips_movement() {
        let mut state = GameState::new(11);
        let pos = state.player.pos;
        let input = TickInput {
            down: true,
            ..Default::default()
        };
        tick(&mut state, &mut DirectControl, &input, 1.0);
        assert_eq!(state.player.pos, pos);
    }

    #[test]
    fn test_nan_dt_only_sweeps() {
        let mut state = arena(13);
        state.player.cooldown = 4.0;
        tick(&mut state, &mut DirectControl, &TickInput::default(), f32::NAN);
        assert_eq!(state.player.cooldown, 4.0);
        assert_eq!(state.time_ticks, 0);

        tick(&mut state, &mut DirectControl, &TickInput::default(), 1.0);
        assert_eq!(state.player.cooldown, 3.0);
    }

    #[test]
    fn test_nothing_fires_without_bounds() {
        let mut state = GameState::new(14);
        let id = state.next_entity_id();
        state.turrets.push(Turret::new(id, Vec2::new(400.0, 300.0)));
        spawn_enemy(&mut state, false, Some(Vec2::new(5000.0, 300.0)));
        spawn_enemy(&mut state, false, Some(Vec2::new(450.0, 300.0)));
        state.enemy_freeze = 10_000;
        state.status.shield = 10_000;

        let mut bot = Autopilot::default();
        for _ in 0..600 {
            tick(&mut state, &mut bot, &TickInput::default(), 1.0);
            assert!(state.projectiles.is_empty());
        }
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_stale_shots_drop_when_bounds_go_away() {
        let mut state = arena(15);
        let input = TickInput {
            fire: true,
            pointer: Vec2::new(800.0, 300.0),
            ..Default::default()
        };
        tick(&mut state, &mut DirectControl, &input, 1.0);
        assert_eq!(state.projectiles.len(), 1);

        state.set_bounds(0.0, 0.0);
        tick(&mut state, &mut DirectControl, &input, 1.0);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_autopilot_session_runs() {
        let mut state = arena(12);
        state.status.shield = 10_000;
        spawn_enemies(&mut state, false, 8, None);
        let mut bot = Autopilot::default();
        for _ in 0..600 {
            tick(&mut state, &mut bot, &TickInput::default(), 1.0);
        }
        assert!(state.score > 0);
        assert_eq!(state.health, 100.0);
    }

    proptest! {
        #[test]
        fn player_stays_inside_margin(
            seed in any::<u64>(),
            moves in proptest::collection::vec(
                (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()),
                1..120,
            ),
            boosted in any::<bool>(),
        ) {
            let mut state = GameState::with_bounds(seed, 320.0, 240.0);
            if boosted {
                state.status.speed = 1_000;
            }
            spawn_enemies(&mut state, false, 4, Some(Vec2::new(160.0, 120.0)));
            for (up, down, left, right) in moves {
                let input = TickInput { up, down, left, right, ..Default::default() };
                tick(&mut state, &mut DirectControl, &input, 1.0);
                let p = state.player.pos;
                prop_assert!(p.x >= WORLD_MARGIN && p.x <= 320.0 - WORLD_MARGIN);
                prop_assert!(p.y >= WORLD_MARGIN && p.y <= 240.0 - WORLD_MARGIN);
            }
        }

        #[test]
        fn shield_blocks_all_contact(seed in any::<u64>(), crowd in 1usize..30) {
            let mut state = GameState::with_bounds(seed, 800.0, 600.0);
            state.status.shield = 100;
            let p = state.player.pos;
            spawn_enemies(&mut state, false, crowd, Some(p));
            tick(&mut state, &mut DirectControl, &TickInput::default(), 1.0);
            prop_assert_eq!(state.health, 100.0);
        }
    }
}
