//! Purchasable gameplay effects and player support actions
//!
//! Effects are a closed enum. Identifiers arriving as strings from the item
//! catalog go through [`trigger_effect_id`], which ignores names it does not
//! know so newly listed items never break a running game.

use std::f32::consts::TAU;
use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::spawn::spawn_enemy;
use super::state::{GameEvent, GameState, ParticleKind, Turret, palette};
use crate::consts::MAX_WEAPON_LEVEL;
use crate::unit;

/// Explosion kill radius
pub const EXPLOSION_RADIUS: f32 = 200.0;
/// Damage an explosion deals to bosses caught in it
pub const EXPLOSION_BOSS_DAMAGE: u32 = 50;
pub const EXPLOSION_SHAKE: f32 = 20.0;
pub const NUKE_SHAKE: f32 = 40.0;
pub const NUKE_FLASH_TICKS: u32 = 20;
pub const ENEMY_FREEZE_TICKS: u32 = 300;
pub const SWARM_SIZE: usize = 20;
/// Radius of the disc swarm members scatter over before spawn jitter
pub const SWARM_SCATTER: f32 = 35.0;
pub const SLOW_TICKS: u32 = 300;
pub const FREEZE_PLAYER_TICKS: u32 = 120;
pub const SHIELD_TICKS: u32 = 480;
pub const SPEED_TICKS: u32 = 600;
pub const INVERT_TICKS: u32 = 300;
pub const DARKNESS_TICKS: u32 = 300;

/// Every effect an item can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectKind {
    Explosion,
    Nuke,
    Freeze,
    BossAcid,
    Swarm,
    SlowPlayer,
    FreezePlayer,
    SpawnTurret,
    Shield,
    SpeedBoost,
    InvertControls,
    Darkness,
}

impl EffectKind {
    pub const ALL: [EffectKind; 12] = [
        EffectKind::Explosion,
        EffectKind::Nuke,
        EffectKind::Freeze,
        EffectKind::BossAcid,
        EffectKind::Swarm,
        EffectKind::SlowPlayer,
        EffectKind::FreezePlayer,
        EffectKind::SpawnTurret,
        EffectKind::Shield,
        EffectKind::SpeedBoost,
        EffectKind::InvertControls,
        EffectKind::Darkness,
    ];

    /// Catalog identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectKind::Explosion => "EXPLOSION",
            EffectKind::Nuke => "NUKE",
            EffectKind::Freeze => "FREEZE",
            EffectKind::BossAcid => "BOSS_ACID",
            EffectKind::Swarm => "SWARM",
            EffectKind::SlowPlayer => "SLOW_PLAYER",
            EffectKind::FreezePlayer => "FREEZE_PLAYER",
            EffectKind::SpawnTurret => "SPAWN_TURRET",
            EffectKind::Shield => "SHIELD",
            EffectKind::SpeedBoost => "SPEED_BOOST",
            EffectKind::InvertControls => "INVERT_CONTROLS",
            EffectKind::Darkness => "DARKNESS",
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An effect identifier no variant matches
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown effect id: {0}")]
pub struct UnknownEffect(pub String);

impl FromStr for EffectKind {
    type Err = UnknownEffect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EffectKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownEffect(s.to_string()))
    }
}

/// Apply `kind` at `at`, or at the player when no point is given
pub fn trigger_effect(state: &mut GameState, kind: EffectKind, at: Option<Vec2>) {
    let target = at.unwrap_or(state.player.pos);
    let player_pos = state.player.pos;
    log::debug!("Effect {} at ({:.0}, {:.0})", kind, target.x, target.y);

    match kind {
        EffectKind::Explosion => {
            state
                .particles
                .emit(&mut state.rng, target, palette::UPGRADE, 50, ParticleKind::Spark);
            state.camera_shake = EXPLOSION_SHAKE;
            for enemy in state.enemies.iter_mut().filter(|e| e.alive) {
                if enemy.pos.distance(target) < EXPLOSION_RADIUS {
                    if enemy.boss {
                        enemy.wound(EXPLOSION_BOSS_DAMAGE);
                    } else {
                        enemy.hp = 0;
                    }
                }
            }
        }
        EffectKind::Nuke => {
            state.flash = NUKE_FLASH_TICKS;
            state.camera_shake = NUKE_SHAKE;
            for enemy in state.enemies.iter_mut().filter(|e| e.alive) {
                enemy.hp = 0;
                state
                    .particles
                    .emit(&mut state.rng, enemy.pos, palette::NUKE_SMOKE, 10, ParticleKind::Smoke);
            }
        }
        EffectKind::Freeze => {
            state.enemy_freeze = ENEMY_FREEZE_TICKS;
        }
        EffectKind::BossAcid => {
            spawn_enemy(state, true, Some(target));
        }
        EffectKind::Swarm => {
            for _ in 0..SWARM_SIZE {
                let angle = state.rng.random::<f32>() * TAU;
                let offset = unit(angle) * (state.rng.random::<f32>() * SWARM_SCATTER);
                spawn_enemy(state, false, Some(target + offset));
            }
        }
        EffectKind::SlowPlayer => {
            state.status.slow = SLOW_TICKS;
            state
                .particles
                .emit(&mut state.rng, player_pos, palette::SLOW_SMOKE, 20, ParticleKind::Smoke);
        }
        EffectKind::FreezePlayer => {
            state.status.freeze = FREEZE_PLAYER_TICKS;
            state
                .particles
                .emit(&mut state.rng, player_pos, palette::FREEZE_SPARK, 20, ParticleKind::Spark);
        }
        EffectKind::SpawnTurret => {
            let id = state.next_entity_id();
            state.turrets.push(Turret::new(id, target));
            state
                .particles
                .emit(&mut state.rng, target, palette::TURRET, 15, ParticleKind::Spark);
        }
        EffectKind::Shield => {
            state.status.shield = SHIELD_TICKS;
            state
                .particles
                .emit(&mut state.rng, player_pos, palette::HEAL, 20, ParticleKind::Spark);
        }
        EffectKind::SpeedBoost => {
            state.status.speed = SPEED_TICKS;
            state
                .particles
                .emit(&mut state.rng, player_pos, palette::SPEED_SPARK, 20, ParticleKind::Spark);
        }
        EffectKind::InvertControls => {
            state.status.invert = INVERT_TICKS;
        }
        EffectKind::Darkness => {
            state.status.darkness = DARKNESS_TICKS;
        }
    }
}

/// String-keyed entry point for catalog items; unknown ids are ignored.
///
/// Returns the effect that ran, if any.
pub fn trigger_effect_id(state: &mut GameState, id: &str, at: Option<Vec2>) -> Option<EffectKind> {
    match id.parse::<EffectKind>() {
        Ok(kind) => {
            trigger_effect(state, kind, at);
            Some(kind)
        }
        Err(err) => {
            log::debug!("Ignoring effect: {}", err);
            None
        }
    }
}

/// Restore up to `amount` health (negative or NaN amounts heal nothing)
pub fn heal_player(state: &mut GameState, amount: f32) {
    let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
    state.health = (state.health + amount).min(state.player.max_hp);
    let health = state.health;
    state.push_event(GameEvent::HealthChanged(health));

    let at = state.player.pos;
    state
        .particles
        .emit(&mut state.rng, at, palette::HEAL, 20, ParticleKind::Spark);
}

/// Raise the weapon one level, up to MAX_WEAPON_LEVEL
pub fn upgrade_weapon(state: &mut GameState) {
    state.player.weapon_level = state.player.weapon_level.saturating_add(1).min(MAX_WEAPON_LEVEL);

    let at = state.player.pos;
    state
        .particles
        .emit(&mut state.rng, at, palette::UPGRADE, 30, ParticleKind::Spark);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn::spawn_enemies;

    #[test]
    fn test_effect_ids_roundtrip() {
        for kind in EffectKind::ALL {
            assert_eq!(kind.as_str().parse::<EffectKind>(), Ok(kind));
        }
        assert_eq!(
            "MEGA_LASER".parse::<EffectKind>(),
            Err(UnknownEffect("MEGA_LASER".into()))
        );
        // Catalog ids are case-sensitive
        assert!("nuke".parse::<EffectKind>().is_err());
    }

    #[test]
    fn test_unknown_effect_is_a_no_op() {
        let mut state = GameState::new(1);
        spawn_enemies(&mut state, false, 3, Some(Vec2::new(100.0, 100.0)));
        let before = (state.enemies.len(), state.particles.len(), state.status, state.score);

        assert_eq!(trigger_effect_id(&mut state, "TELEPORT_HOME", None), None);
        let after = (state.enemies.len(), state.particles.len(), state.status, state.score);
        assert_eq!(before, after);
    }

    #[test]
    fn test_nuke_zeroes_everyone() {
        let mut state = GameState::new(2);
        spawn_enemies(&mut state, false, 4, Some(Vec2::new(100.0, 100.0)));
        spawn_enemy(&mut state, true, Some(Vec2::new(700.0, 500.0)));
        assert_eq!(state.enemies.len(), 5);

        trigger_effect(&mut state, EffectKind::Nuke, None);
        assert!(state.enemies.iter().all(|e| e.hp == 0));
        assert_eq!(state.flash, NUKE_FLASH_TICKS);
        assert_eq!(state.camera_shake, NUKE_SHAKE);
    }

    #[test]
    fn test_explosion_spares_distant_and_wounds_bosses() {
        let mut state = GameState::new(3);
        let blast = Vec2::new(300.0, 300.0);
        spawn_enemy(&mut state, false, Some(blast + Vec2::new(50.0, 0.0)));
        spawn_enemy(&mut state, false, Some(blast + Vec2::new(400.0, 0.0)));
        spawn_enemy(&mut state, true, Some(blast));

        trigger_effect(&mut state, EffectKind::Explosion, Some(blast));
        assert_eq!(state.enemies[0].hp, 0);
        assert!(state.enemies[1].hp > 0);
        assert_eq!(state.enemies[2].hp, 150);
        assert_eq!(state.camera_shake, EXPLOSION_SHAKE);

        for _ in 0..5 {
            trigger_effect(&mut state, EffectKind::Explosion, Some(blast));
        }
        assert_eq!(state.enemies[2].hp, 0);
    }

    #[test]
    fn test_swarm_lands_twenty_near_target() {
        let mut state = GameState::new(4);
        let target = Vec2::new(100.0, 100.0);
        trigger_effect(&mut state, EffectKind::Swarm, Some(target));

        assert_eq!(state.enemies.len(), SWARM_SIZE);
        for e in &state.enemies {
            assert!(!e.boss);
            assert!(e.pos.distance(target) <= 50.0);
        }
    }

    #[test]
    fn test_boss_acid_spawns_one_boss() {
        let mut state = GameState::new(5);
        trigger_effect(&mut state, EffectKind::BossAcid, Some(Vec2::new(50.0, 60.0)));
        assert_eq!(state.enemies.len(), 1);
        assert!(state.enemies[0].boss);
    }

    #[test]
    fn test_status_effects_set_timers() {
        let mut state = GameState::new(6);
        trigger_effect(&mut state, EffectKind::SlowPlayer, None);
        trigger_effect(&mut state, EffectKind::FreezePlayer, None);
        trigger_effect(&mut state, EffectKind::Shield, None);
        trigger_effect(&mut state, EffectKind::SpeedBoost, None);
        trigger_effect(&mut state, EffectKind::InvertControls, None);
        trigger_effect(&mut state, EffectKind::Darkness, None);
        trigger_effect(&mut state, EffectKind::Freeze, None);

        let s = state.status;
        assert_eq!(
            (s.slow, s.freeze, s.shield, s.speed, s.invert, s.darkness),
            (300, 120, 480, 600, 300, 300)
        );
        assert_eq!(state.enemy_freeze, ENEMY_FREEZE_TICKS);
    }

    #[test]
    fn test_spawn_turret_defaults_to_player() {
        let mut state = GameState::new(7);
        trigger_effect(&mut state, EffectKind::SpawnTurret, None);
        let t = &state.turrets[0];
        assert_eq!(t.pos, state.player.pos);
        assert_eq!((t.range, t.period), (200.0, 30.0));
    }

    #[test]
    fn test_heal_clamps() {
        let mut state = GameState::new(8);
        state.health = 50.0;
        heal_player(&mut state, 20.0);
        assert_eq!(state.health, 70.0);
        heal_player(&mut state, 500.0);
        assert_eq!(state.health, 100.0);

        state.health = 40.0;
        heal_player(&mut state, -30.0);
        heal_player(&mut state, f32::NAN);
        assert_eq!(state.health, 40.0);
        assert_eq!(state.events.last(), Some(&GameEvent::HealthChanged(40.0)));
    }

    #[test]
    fn test_upgrade_caps_at_max_level() {
        let mut state = GameState::new(9);
        for _ in 0..10 {
            upgrade_weapon(&mut state);
        }
        assert_eq!(state.player.weapon_level, MAX_WEAPON_LEVEL);
    }
}
