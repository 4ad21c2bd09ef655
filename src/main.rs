//! Swarm Arena headless harness
//!
//! Usage: swarm-arena [--seed N] [--ticks N] [--settings path]
//!
//! Runs an autopilot session with ambient spawning and reports the outcome.
//! The browser build has no `main`; the page drives `WebArena` directly.

#[cfg(not(target_arch = "wasm32"))]
use anyhow::{Context, Result, bail};

#[cfg(not(target_arch = "wasm32"))]
const USAGE: &str = "swarm-arena [--seed N] [--ticks N] [--settings path]";

#[cfg(not(target_arch = "wasm32"))]
struct Args {
    seed: u64,
    ticks: u64,
    settings: Option<std::path::PathBuf>,
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_args() -> Result<Args> {
    let mut args = Args {
        seed: 1,
        ticks: 3600,
        settings: None,
    };
    let mut it = std::env::args().skip(1);
    while let Some(flag) = it.next() {
        let value = it
            .next()
            .with_context(|| format!("{flag} needs a value"))?;
        match flag.as_str() {
            "--seed" => args.seed = value.parse().context("--seed must be an integer")?,
            "--ticks" => args.ticks = value.parse().context("--ticks must be an integer")?,
            "--settings" => args.settings = Some(value.into()),
            _ => bail!("unknown flag {flag}; usage: {USAGE}"),
        }
    }
    Ok(args)
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<()> {
    use swarm_arena::sim::{ControlMode, GameEvent};
    use swarm_arena::{Arena, Settings};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;
    let mut settings = match &args.settings {
        Some(path) => Settings::load_file(path).unwrap_or_else(|e| {
            log::warn!("{}; using default settings", e);
            Settings::default()
        }),
        None => Settings::load(),
    };
    if settings.ambient_spawn_interval == 0 {
        settings.ambient_spawn_interval = 60;
    }

    log::info!("Swarm Arena (native) starting: seed={}, ticks={}", args.seed, args.ticks);

    let mut arena = Arena::new(ControlMode::Autopilot, args.seed, settings);
    arena.set_bounds(800.0, 600.0);

    let mut kills = 0u32;
    for _ in 0..args.ticks {
        for event in arena.step(1.0) {
            match event {
                GameEvent::ScoreChanged(_) => kills += 1,
                GameEvent::GameOver => log::info!("Game over"),
                GameEvent::HealthChanged(_) => {}
            }
        }
        if arena.state().is_game_over() {
            break;
        }
        if arena.state().time_ticks % 600 == 0 {
            let state = arena.state();
            log::debug!(
                "tick {}: health {:.1}, score {}, enemies {}",
                state.time_ticks,
                state.health,
                state.score,
                state.enemies.len()
            );
        }
    }

    let state = arena.state();
    log::info!(
        "Finished after {} ticks: score {}, kills {}, health {:.1}, weapon level {}",
        state.time_ticks,
        state.score,
        kills,
        state.health,
        state.player.weapon_level
    );
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::start, this is just to satisfy the compiler
}
