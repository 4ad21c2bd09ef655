//! Player movement policies
//!
//! A session picks one [`MovementPolicy`] up front: [`DirectControl`] follows
//! the host's keyboard/pointer snapshot, [`Autopilot`] kites the nearest enemy
//! on its own. The tick only sees the resulting [`Steering`].

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Enemy, Player};
use super::tick::TickInput;
use crate::consts::STANDOFF_DISTANCE;
use crate::{heading_to, unit};

/// What the policy wants the player to do this tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Steering {
    /// Displacement before world clamping
    pub delta: Vec2,
    /// New facing, or `None` to keep the current one
    pub facing: Option<f32>,
    pub fire: bool,
}

/// Everything a policy may look at
pub struct SteerContext<'a> {
    pub player: &'a Player,
    pub enemies: &'a [Enemy],
    pub input: &'a TickInput,
    /// Effective speed after status multipliers
    pub speed: f32,
    /// Control-inversion status is active
    pub inverted: bool,
}

pub trait MovementPolicy {
    fn steer(&mut self, ctx: &SteerContext<'_>) -> Steering;
}

/// Keyboard + pointer control
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectControl;

impl MovementPolicy for DirectControl {
    fn steer(&mut self, ctx: &SteerContext<'_>) -> Steering {
        let input = ctx.input;
        let step = if ctx.inverted { -ctx.speed } else { ctx.speed };

        let mut delta = Vec2::ZERO;
        // Screen space: +y points down
        if input.up {
            delta.y -= step;
        }
        if input.down {
            delta.y += step;
        }
        if input.left {
            delta.x -= step;
        }
        if input.right {
            delta.x += step;
        }

        Steering {
            delta,
            facing: Some(heading_to(ctx.player.pos, input.pointer)),
            fire: input.fire,
        }
    }
}

/// Bot that keeps its distance from the nearest enemy and circles it
#[derive(Debug, Clone, Copy)]
pub struct Autopilot {
    pub standoff: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            standoff: STANDOFF_DISTANCE,
        }
    }
}

impl MovementPolicy for Autopilot {
    fn steer(&mut self, ctx: &SteerContext<'_>) -> Steering {
        let origin = ctx.player.pos;
        let nearest = ctx
            .enemies
            .iter()
            .filter(|e| e.alive)
            .map(|e| (e, e.pos.distance(origin)))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        let Some((target, dist)) = nearest else {
            return Steering::default();
        };

        let facing = heading_to(origin, target.pos);
        let delta = if dist < self.standoff {
            // Back straight off
            -unit(facing) * ctx.speed
        } else {
            // Strafe around it at half speed
            unit(facing + std::f32::consts::FRAC_PI_2) * ctx.speed * 0.5
        };

        Steering {
            delta,
            facing: Some(facing),
            fire: true,
        }
    }
}

/// Which policy a session runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControlMode {
    /// The streamer plays with keyboard and mouse
    #[default]
    Direct,
    /// Viewers watch a bot play
    Autopilot,
}

impl ControlMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlMode::Direct => "direct",
            ControlMode::Autopilot => "autopilot",
        }
    }

    pub fn policy(&self) -> Box<dyn MovementPolicy> {
        match self {
            ControlMode::Direct => Box::new(DirectControl),
            ControlMode::Autopilot => Box::new(Autopilot::default()),
        }
    }
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown control mode: {0}")]
pub struct UnknownMode(pub String);

impl FromStr for ControlMode {
    type Err = UnknownMode;

    /// Accepts mode names as well as the host's room roles
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "direct" | "streamer" => Ok(ControlMode::Direct),
            "autopilot" | "bot" | "viewer" => Ok(ControlMode::Autopilot),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}
