//! Bounded pools for cosmetic feedback (particles and floor decals)
//!
//! Neither pool takes part in collisions. Both are capped: particles drop the
//! oldest overflow as soon as they exceed their budget, decals are trimmed in
//! one batch of [`SPLATTER_EVICT_BATCH`] once they pass [`MAX_SPLATTERS`].

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use super::state::{Color, Particle, ParticleKind, Splatter, SplatterKind};
use crate::consts::{MAX_SPLATTERS, SPLATTER_EVICT_BATCH};
use crate::unit;

/// Particle budget used until settings say otherwise
pub const DEFAULT_MAX_PARTICLES: usize = 500;

/// Velocity kept per tick
const PARTICLE_DAMPING: f32 = 0.85;
/// Life lost per tick
const PARTICLE_FADE: f32 = 0.05;

#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct ParticlePool {
    items: Vec<Particle>,
    #[serde(skip)]
    cap: usize,
}

impl Default for ParticlePool {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_PARTICLES)
    }
}

impl ParticlePool {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            items: Vec::new(),
            cap,
        }
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Change the budget, evicting the oldest particles if now over it
    pub fn set_capacity(&mut self, cap: usize) {
        self.cap = cap;
        self.evict_overflow();
    }

    /// Spray `count` particles from `at` in random directions
    pub fn emit<R: Rng>(
        &mut self,
        rng: &mut R,
        at: Vec2,
        color: Color,
        count: usize,
        kind: ParticleKind,
    ) {
        if self.cap == 0 {
            return;
        }
        let (max_speed, max_radius) = match kind {
            ParticleKind::Blood => (4.0, 3.0),
            _ => (8.0, 2.0),
        };
        for _ in 0..count {
            let angle = rng.random::<f32>() * TAU;
            let speed = rng.random::<f32>() * max_speed;
            self.items.push(Particle {
                pos: at,
                vel: unit(angle) * speed,
                radius: rng.random::<f32>() * max_radius,
                color,
                life: 1.0,
                kind,
            });
        }
        self.evict_overflow();
    }

    /// Integrate, damp and fade every particle by one tick
    pub fn update(&mut self) {
        for p in &mut self.items {
            p.pos += p.vel;
            p.vel *= PARTICLE_DAMPING;
            p.life = (p.life - PARTICLE_FADE).max(0.0);
        }
    }

    /// Drop faded particles
    pub fn sweep(&mut self) {
        self.items.retain(|p| p.life > 0.0);
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn evict_overflow(&mut self) {
        if self.items.len() > self.cap {
            let excess = self.items.len() - self.cap;
            self.items.drain(..excess);
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct SplatterPool {
    items: Vec<Splatter>,
}

impl SplatterPool {
    /// Leave an irregular cluster of 3-7 marks around `at`
    pub fn stamp<R: Rng>(&mut self, rng: &mut R, at: Vec2, color: Color) {
        let count = rng.random_range(3..=7);
        for _ in 0..count {
            let offset = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * 30.0;
            let kind = if rng.random::<f32>() > 0.8 {
                SplatterKind::Puddle
            } else {
                SplatterKind::Stain
            };
            self.items.push(Splatter {
                pos: at + offset,
                radius: 5.0 + rng.random::<f32>() * 15.0,
                color,
                alpha: 0.7 + rng.random::<f32>() * 0.3,
                kind,
            });
        }
        if self.items.len() > MAX_SPLATTERS {
            // Oldest marks go first, in one batch
            self.items.drain(..SPLATTER_EVICT_BATCH);
        }
    }

    pub fn as_slice(&self) -> &[Splatter] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
