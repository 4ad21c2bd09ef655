//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in [`GameState`]; subsystems take it
//! by `&mut` instead of reaching for globals.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::pool::{ParticlePool, SplatterPool};
use crate::clamp_inset;
use crate::consts::*;

/// Packed `0xRRGGBB` color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    /// CSS hex form, e.g. `#39ff14`
    pub fn to_css(self) -> String {
        format!("#{:06x}", self.0 & 0x00ff_ffff)
    }
}

pub mod palette {
    use super::Color;

    pub const PLAYER: Color = Color(0x10b981);
    pub const PLAYER_SHOT: Color = Color(0xe0f2fe);
    pub const TURRET: Color = Color(0x14b8a6);
    pub const TURRET_SHOT: Color = Color(0x2dd4bf);

    pub const BOSS: Color = Color(0xef4444);
    pub const TANK: Color = Color(0xeab308);
    pub const SPITTER: Color = Color(0x22c55e);
    pub const CRAWLER: Color = Color(0x39ff14);

    pub const BOSS_BLOOD: Color = Color(0x9f1239);
    pub const TANK_BLOOD: Color = Color(0xd97706);
    pub const ACID_BLOOD: Color = Color(0x39ff14);
    pub const PLAYER_BLOOD: Color = Color(0xdc2626);

    pub const BOSS_STAIN: Color = Color(0x4c0519);
    pub const TANK_STAIN: Color = Color(0x713f12);
    pub const ACID_STAIN: Color = Color(0x14532d);

    pub const HEAL: Color = Color(0x3b82f6);
    pub const UPGRADE: Color = Color(0xf59e0b);
    pub const NUKE_SMOKE: Color = Color(0xf97316);
    pub const SLOW_SMOKE: Color = Color(0x9333ea);
    pub const FREEZE_SPARK: Color = Color(0x06b6d4);
    pub const SPEED_SPARK: Color = Color(0xeab308);
    pub const PORTAL: Color = Color(0x8b5cf6);
}

/// The player-controlled soldier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    /// Facing (radians)
    pub angle: f32,
    /// Ticks until the weapon may fire again (may dip below zero)
    pub cooldown: f32,
    /// 1..=MAX_WEAPON_LEVEL
    pub weapon_level: u8,
    pub max_hp: f32,
    pub alive: bool,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            radius: PLAYER_RADIUS,
            angle: 0.0,
            cooldown: 0.0,
            weapon_level: 1,
            max_hp: PLAYER_MAX_HP,
            alive: true,
        }
    }
}

/// Countdown timers (ticks) for the six player status effects.
///
/// Each field is independent; several can run at once and their effects
/// stack rather than cancel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStatus {
    /// Half movement speed
    pub slow: u32,
    /// No movement, no shooting
    pub freeze: u32,
    /// Immune to contact damage
    pub shield: u32,
    /// Double movement speed
    pub speed: u32,
    /// Direct-control directions reversed
    pub invert: u32,
    /// Vision reduced (renderer only)
    pub darkness: u32,
}

impl PlayerStatus {
    /// Count every running timer down by one tick
    pub fn tick(&mut self) {
        for timer in [
            &mut self.slow,
            &mut self.freeze,
            &mut self.shield,
            &mut self.speed,
            &mut self.invert,
            &mut self.darkness,
        ] {
            *timer = timer.saturating_sub(1);
        }
    }

    pub fn is_slowed(&self) -> bool {
        self.slow > 0
    }

    pub fn is_frozen(&self) -> bool {
        self.freeze > 0
    }

    pub fn is_shielded(&self) -> bool {
        self.shield > 0
    }

    pub fn is_boosted(&self) -> bool {
        self.speed > 0
    }

    pub fn is_inverted(&self) -> bool {
        self.invert > 0
    }

    pub fn is_dark(&self) -> bool {
        self.darkness > 0
    }

    /// Movement speed multiplier; slow and boost multiply together
    pub fn speed_multiplier(&self) -> f32 {
        let mut m = 1.0;
        if self.is_slowed() {
            m *= 0.5;
        }
        if self.is_boosted() {
            m *= 2.0;
        }
        m
    }
}

/// Enemy archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    Crawler,
    Spitter,
    Tank,
}

/// A hostile bug chasing the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub color: Color,
    pub speed: f32,
    pub hp: u32,
    pub max_hp: u32,
    pub boss: bool,
    pub kind: EnemyKind,
    /// Animation phase (advances every tick, renderer only)
    pub frame: f32,
    /// Contact damage before CONTACT_DAMAGE_SCALE is applied
    pub damage: f32,
    pub alive: bool,
}

impl Enemy {
    /// Remove `amount` hit points, stopping at zero
    pub fn wound(&mut self, amount: u32) {
        self.hp = self.hp.saturating_sub(amount);
    }

    pub fn is_dying(&self) -> bool {
        self.alive && self.hp == 0
    }

    /// Tint of hit/death particles
    pub fn blood_color(&self) -> Color {
        match (self.boss, self.kind) {
            (true, _) => palette::BOSS_BLOOD,
            (false, EnemyKind::Tank) => palette::TANK_BLOOD,
            _ => palette::ACID_BLOOD,
        }
    }

    /// Tint of the floor decal left on death (darker than the blood)
    pub fn stain_color(&self) -> Color {
        match (self.boss, self.kind) {
            (true, _) => palette::BOSS_STAIN,
            (false, EnemyKind::Tank) => palette::TANK_STAIN,
            _ => palette::ACID_STAIN,
        }
    }

    /// Points awarded for the kill
    pub fn bounty(&self) -> u64 {
        if self.boss { 500 } else { 50 }
    }
}

/// A shot in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Color,
    /// Fired by a turret rather than the player
    pub special: bool,
    pub alive: bool,
}

/// A stationary auto-turret
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turret {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub range: f32,
    /// Ticks until the next shot
    pub cooldown: f32,
    /// Cooldown restored after each shot
    pub period: f32,
    pub alive: bool,
}

/// Cosmetic particle categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleKind {
    Blood,
    Spark,
    Smoke,
    Shell,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Color,
    /// 1.0 at birth, gone at 0.0
    pub life: f32,
    pub kind: ParticleKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplatterKind {
    Stain,
    Puddle,
}

/// A floor decal left by a kill
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Splatter {
    pub pos: Vec2,
    pub radius: f32,
    pub color: Color,
    pub alpha: f32,
    pub kind: SplatterKind,
}

/// Outbound notifications for the host UI
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum GameEvent {
    HealthChanged(f32),
    ScoreChanged(u64),
    /// Emitted once when the player dies
    GameOver,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// World size; `None` until the host reports a render surface
    pub bounds: Option<Vec2>,
    pub player: Player,
    pub status: PlayerStatus,
    /// 0..=player.max_hp
    pub health: f32,
    pub score: u64,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub turrets: Vec<Turret>,
    pub particles: ParticlePool,
    pub splatters: SplatterPool,
    /// Decaying screen-shake magnitude
    pub camera_shake: f32,
    /// Full-screen flash ticks remaining
    pub flash: u32,
    /// Global enemy freeze ticks remaining
    pub enemy_freeze: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Notifications raised since the last drain
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64) -> Self {
        let (x, y) = DEFAULT_PLAYER_POS;
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            bounds: None,
            player: Player::new(Vec2::new(x, y)),
            status: PlayerStatus::default(),
            health: PLAYER_MAX_HP,
            score: 0,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            turrets: Vec::new(),
            particles: ParticlePool::default(),
            splatters: SplatterPool::default(),
            camera_shake: 0.0,
            flash: 0,
            enemy_freeze: 0,
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// New state with a known world size; the player starts at its centre
    pub fn with_bounds(seed: u64, width: f32, height: f32) -> Self {
        let mut state = Self::new(seed);
        state.player.pos = Vec2::new(width, height) * 0.5;
        state.set_bounds(width, height);
        state
    }

    /// Record the world size and pull the player back inside it
    pub fn set_bounds(&mut self, width: f32, height: f32) {
        if !(width > 0.0 && height > 0.0) {
            self.bounds = None;
            return;
        }
        let size = Vec2::new(width, height);
        self.bounds = Some(size);
        self.player.pos = clamp_inset(self.player.pos, size, WORLD_MARGIN);
    }

    /// Start a fresh run, keeping the world size and particle budget.
    ///
    /// Undrained notifications survive, followed by the new run's health and score.
    pub fn reset(&mut self, seed: u64) {
        let cap = self.particles.capacity();
        let events = std::mem::take(&mut self.events);
        *self = match self.bounds {
            Some(size) => Self::with_bounds(seed, size.x, size.y),
            None => Self::new(seed),
        };
        self.particles.set_capacity(cap);
        self.events = events;
        let health = self.health;
        self.push_event(GameEvent::HealthChanged(health));
        self.push_event(GameEvent::ScoreChanged(0));
        log::info!("Run reset (seed {})", seed);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_game_over(&self) -> bool {
        !self.player.alive
    }

    /// Keep a point inside the playable inset (no-op without bounds)
    pub fn confine(&self, pos: Vec2) -> Vec2 {
        match self.bounds {
            Some(size) => clamp_inset(pos, size, WORLD_MARGIN),
            None => pos,
        }
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all notifications raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop every inactive entity
    pub fn sweep(&mut self) {
        self.enemies.retain(|e| e.alive);
        self.projectiles.retain(|p| p.alive);
        self.turrets.retain(|t| t.alive);
        self.particles.sweep();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_status_multiplier_stacks() {
        let mut status = PlayerStatus::default();
        assert_eq!(status.speed_multiplier(), 1.0);
        status.slow = 10;
        assert_eq!(status.speed_multiplier(), 0.5);
        status.speed = 10;
        assert_eq!(status.speed_multiplier(), 1.0);
        status.slow = 0;
        assert_eq!(status.speed_multiplier(), 2.0);
    }

    #[test]
    fn test_enemy_wound_clamps_at_zero() {
        let mut state = GameState::new(1);
        let id = state.next_entity_id();
        let mut enemy = Enemy {
            id,
            pos: Vec2::ZERO,
            radius: 12.0,
            color: palette::CRAWLER,
            speed: 2.0,
            hp: 3,
            max_hp: 3,
            boss: false,
            kind: EnemyKind::Crawler,
            frame: 0.0,
            damage: 5.0,
            alive: true,
        };
        enemy.wound(2);
        assert_eq!(enemy.hp, 1);
        enemy.wound(50);
        assert_eq!(enemy.hp, 0);
        assert!(enemy.is_dying());
    }

    #[test]
    fn test_set_bounds_pulls_player_inside() {
        let mut state = GameState::new(7);
        state.set_bounds(200.0, 150.0);
        assert_eq!(state.player.pos, Vec2::new(170.0, 120.0));

        state.set_bounds(0.0, 100.0);
        assert!(state.bounds.is_none());
    }

    #[test]
    fn test_reset_restores_fresh_run() {
        let mut state = GameState::with_bounds(3, 800.0, 600.0);
        state.particles.set_capacity(42);
        state.player.weapon_level = 4;
        state.score = 900;
        state.health = 12.0;
        state.player.alive = false;

        state.reset(4);
        assert_eq!(state.player.weapon_level, 1);
        assert_eq!(state.score, 0);
        assert_eq!(state.health, PLAYER_MAX_HP);
        assert!(state.player.alive);
        assert_eq!(state.bounds, Some(Vec2::new(800.0, 600.0)));
        assert_eq!(state.particles.capacity(), 42);
    }

    #[test]
    fn test_reset_keeps_pending_events_and_announces_new_run() {
        let mut state = GameState::with_bounds(5, 800.0, 600.0);
        state.health = 0.0;
        state.push_event(GameEvent::HealthChanged(0.0));
        state.push_event(GameEvent::GameOver);

        state.reset(6);
        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::HealthChanged(0.0),
                GameEvent::GameOver,
                GameEvent::HealthChanged(PLAYER_MAX_HP),
                GameEvent::ScoreChanged(0),
            ]
        );
    }

    #[test]
    fn test_color_css() {
        assert_eq!(palette::CRAWLER.to_css(), "#39ff14");
        assert_eq!(Color(0x0000ff).to_css(), "#0000ff");
    }

    proptest! {
        #[test]
        fn status_timers_count_down_by_one_and_stop_at_zero(
            start in proptest::array::uniform6(0u32..20),
            ticks in 0u32..40,
        ) {
            let mut status = PlayerStatus {
                slow: start[0],
                freeze: start[1],
                shield: start[2],
                speed: start[3],
                invert: start[4],
                darkness: start[5],
            };
            for _ in 0..ticks {
                status.tick();
            }
            let got = [
                status.slow,
                status.freeze,
                status.shield,
                status.speed,
                status.invert,
                status.darkness,
            ];
            for (s, g) in start.iter().zip(got.iter()) {
                prop_assert_eq!(*g, s.saturating_sub(ticks));
            }
        }
    }
}
