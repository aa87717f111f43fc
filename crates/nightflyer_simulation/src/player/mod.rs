//! Игрок: тело-цель врагов + правила его атак
//!
//! Управление (input) — снаружи симуляции: здесь тело игрока, которое
//! получает урон, knockback и может умереть, и обработка запросов
//! `MeleeRequested` / `ShootRequested`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::{Actor, Collider, Faction, Health, LinearDamping, Player, Position};
use crate::config::ConfigError;
use crate::SimulationSet;

pub mod combat;

pub use combat::{
    fire_due_shots, resolve_melee_requests, resolve_shoot_requests, tick_player_attacks, MeleeRequested,
    PendingShot, PlayerAttack, PlayerAttackConfig, ShootRequested,
};

/// Параметры тела игрока
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub position: Vec2,
    pub max_health: f32,
    pub body_radius: f32,
    /// Затухание knockback скорости (1/сек)
    pub damping: f32,
    pub attack: PlayerAttackConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            position: Vec2::new(0.0, 1.0),
            max_health: 100.0,
            body_radius: 0.4,
            damping: 8.0,
            attack: PlayerAttackConfig::default(),
        }
    }
}

impl PlayerConfig {
    pub fn bundle(&self) -> impl Bundle {
        (
            Player,
            Actor::new(Faction::Player),
            Health::new(self.max_health),
            Position(self.position),
            LinearDamping(self.damping),
            Collider::solid_circle(self.body_radius),
            PlayerAttack::new(self.attack),
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_health.is_finite() && self.max_health > 0.0) {
            return Err(ConfigError::invalid("max_health", "must be positive"));
        }
        self.attack.validate().map_err(|err| err.within("attack"))
    }
}

/// Player Plugin
///
/// Атаки игрока — SimulationSet::Actions: до того как враги подумают,
/// так что убитый ударом враг в этом тике уже не атакует.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<MeleeRequested>().add_event::<ShootRequested>();

        app.add_systems(
            FixedUpdate,
            (
                tick_player_attacks,
                resolve_melee_requests,
                resolve_shoot_requests,
                fire_due_shots,
            )
                .chain()
                .in_set(SimulationSet::Actions),
        );
    }
}
