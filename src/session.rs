//! Running session
//!
//! [`Arena`] owns one [`GameState`] plus everything the host feeds into it:
//! the latest input, queued commands and the frame clock.

use std::collections::VecDeque;

use glam::Vec2;

use crate::consts::{MAX_FRAME_MS, TICK_MS};
use crate::settings::Settings;
use crate::sim::command::{Command, MarketAction};
use crate::sim::control::{ControlMode, MovementPolicy};
use crate::sim::effects::{self, EffectKind};
use crate::sim::spawn::{spawn_enemies, spawn_enemy};
use crate::sim::state::{GameEvent, GameState};
use crate::sim::tick::{TickInput, tick};
use crate::snapshot::Snapshot;

/// Turns host timestamps into normalized tick time
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed ticks since the previous call, capped at one long frame.
    ///
    /// The first call only primes the clock and returns 0.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last).max(0.0) as f32).min(MAX_FRAME_MS) / TICK_MS,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        dt
    }
}

pub struct Arena {
    state: GameState,
    mode: ControlMode,
    policy: Box<dyn MovementPolicy>,
    input: TickInput,
    commands: VecDeque<Command>,
    clock: FrameClock,
    settings: Settings,
    /// Ticks since the last ambient spawn
    ambient_ticks: u32,
}

impl Arena {
    pub fn new(mode: ControlMode, seed: u64, settings: Settings) -> Self {
        let mut state = GameState::new(seed);
        state.particles.set_capacity(settings.max_particles());
        log::info!(
            "Arena ready: mode={}, seed={}, quality={}",
            mode,
            seed,
            settings.quality.as_str()
        );
        Self {
            state,
            mode,
            policy: mode.policy(),
            input: TickInput::default(),
            commands: VecDeque::new(),
            clock: FrameClock::new(),
            settings,
            ambient_ticks: 0,
        }
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.state.particles.set_capacity(settings.max_particles());
        self.settings = settings;
    }

    /// Report the render surface size; non-positive sizes mean "unknown"
    pub fn set_bounds(&mut self, width: f32, height: f32) {
        self.state.set_bounds(width, height);
    }

    pub fn set_input(&mut self, input: TickInput) {
        self.input = input;
    }

    /// Queue a command for the start of the next frame
    pub fn push(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    /// Queue a viewer purchase; returns whether it produced a command
    pub fn market_action(
        &mut self,
        action: MarketAction,
        effect_id: Option<&str>,
        at: Option<Vec2>,
    ) -> bool {
        match action.into_command(effect_id, at) {
            Some(command) => {
                self.push(command);
                true
            }
            None => {
                log::warn!("{:?} without an effect id", action);
                false
            }
        }
    }

    pub fn pending(&self) -> usize {
        self.commands.len()
    }

    // Immediate variants for callers already between ticks. A finished run
    // ignores them all.

    pub fn spawn_enemy(&mut self, boss: bool, count: usize, at: Option<Vec2>) -> usize {
        if self.state.is_game_over() {
            return 0;
        }
        spawn_enemies(&mut self.state, boss, count, at)
    }

    pub fn heal_player(&mut self, amount: f32) {
        if !self.state.is_game_over() {
            effects::heal_player(&mut self.state, amount);
        }
    }

    pub fn upgrade_weapon(&mut self) {
        if !self.state.is_game_over() {
            effects::upgrade_weapon(&mut self.state);
        }
    }

    pub fn trigger_effect(&mut self, id: &str, at: Option<Vec2>) -> Option<EffectKind> {
        if self.state.is_game_over() {
            return None;
        }
        effects::trigger_effect_id(&mut self.state, id, at)
    }

    /// Start a new run with `seed`
    pub fn reset(&mut self, seed: u64) {
        self.state.reset(seed);
        self.input = TickInput::default();
        self.ambient_ticks = 0;
    }

    /// Advance by one host frame and return the notifications it raised
    pub fn frame(&mut self, now_ms: f64) -> Vec<GameEvent> {
        let dt = self.clock.advance(now_ms);
        self.step(dt)
    }

    /// Apply queued commands, then run one tick of `dt`.
    ///
    /// Once the run is over only `Reset` gets through; everything else is dropped.
    pub fn step(&mut self, dt: f32) -> Vec<GameEvent> {
        while let Some(command) = self.commands.pop_front() {
            match command {
                Command::Reset { .. } => self.ambient_ticks = 0,
                _ if self.state.is_game_over() => {
                    log::debug!("Dropping {:?}: run is over", command);
                    continue;
                }
                _ => {}
            }
            command.apply(&mut self.state);
        }

        if dt > 0.0 && !self.state.is_game_over() {
            self.ambient_spawn();
        }

        tick(&mut self.state, self.policy.as_mut(), &self.input, dt);
        self.state.drain_events()
    }

    fn ambient_spawn(&mut self) {
        let interval = self.settings.ambient_spawn_interval;
        if interval == 0 {
            return;
        }
        self.ambient_ticks += 1;
        if self.ambient_ticks >= interval {
            self.ambient_ticks = 0;
            if spawn_enemy(&mut self.state, false, None).is_none() {
                log::debug!("Ambient spawn skipped: no world bounds");
            }
        }
    }

    /// Renderer view of the current frame, with disabled effects removed
    pub fn snapshot(&self) -> Snapshot<'_> {
        self.state.snapshot().presented(&self.settings)
    }
}
