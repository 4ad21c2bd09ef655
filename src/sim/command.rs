//! Host-issued commands
//!
//! Purchases can confirm at any time, so the host never touches [`GameState`]
//! directly: it queues [`Command`]s and the session applies them between ticks.

use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::effects::{heal_player, trigger_effect_id, upgrade_weapon};
use super::spawn::spawn_enemies;
use super::state::GameState;

/// Health restored by a GIVE_HEALTH purchase
pub const MEDKIT_HEAL: f32 = 20.0;
/// Enemies dropped by a SPAWN_ENEMY purchase
pub const SPAWN_PACK_SIZE: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    SpawnEnemy {
        boss: bool,
        count: usize,
        at: Option<Vec2>,
    },
    Heal(f32),
    UpgradeWeapon,
    /// Catalog effect by id; unknown ids are ignored
    Effect { id: String, at: Option<Vec2> },
    /// Start a fresh run with the given seed
    Reset { seed: u64 },
}

impl Command {
    /// Spawn request from an untyped boundary; negative counts spawn nothing
    pub fn spawn(boss: bool, count: i64, at: Option<Vec2>) -> Self {
        Command::SpawnEnemy {
            boss,
            count: usize::try_from(count).unwrap_or(0),
            at,
        }
    }

    pub fn apply(self, state: &mut GameState) {
        log::debug!("Applying {:?}", self);
        match self {
            Command::SpawnEnemy { boss, count, at } => {
                spawn_enemies(state, boss, count, at);
            }
            Command::Heal(amount) => heal_player(state, amount),
            Command::UpgradeWeapon => upgrade_weapon(state),
            Command::Effect { id, at } => {
                trigger_effect_id(state, &id, at);
            }
            Command::Reset { seed } => state.reset(seed),
        }
    }
}

/// Actions a viewer can buy from the room's action bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketAction {
    SpawnEnemy,
    SpawnBoss,
    GiveHealth,
    GiveWeapon,
    UseSpecialItem,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown market action: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for MarketAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SPAWN_ENEMY" => Ok(MarketAction::SpawnEnemy),
            "SPAWN_BOSS" => Ok(MarketAction::SpawnBoss),
            "GIVE_HEALTH" => Ok(MarketAction::GiveHealth),
            "GIVE_WEAPON" => Ok(MarketAction::GiveWeapon),
            "USE_SPECIAL_ITEM" => Ok(MarketAction::UseSpecialItem),
            _ => Err(UnknownAction(s.to_string())),
        }
    }
}

impl MarketAction {
    /// Translate a purchase into a command.
    ///
    /// `USE_SPECIAL_ITEM` needs the item's effect id and yields `None` without one.
    pub fn into_command(self, effect_id: Option<&str>, at: Option<Vec2>) -> Option<Command> {
        let command = match self {
            MarketAction::SpawnEnemy => Command::SpawnEnemy {
                boss: false,
                count: SPAWN_PACK_SIZE,
                at,
            },
            MarketAction::SpawnBoss => Command::SpawnEnemy {
                boss: true,
                count: 1,
                at,
            },
            MarketAction::GiveHealth => Command::Heal(MEDKIT_HEAL),
            MarketAction::GiveWeapon => Command::UpgradeWeapon,
            MarketAction::UseSpecialItem => Command::Effect {
                id: effect_id?.to_string(),
                at,
            },
        };
        Some(command)
    }
}
