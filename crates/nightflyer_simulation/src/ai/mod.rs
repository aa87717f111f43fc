//! AI decision-making module
//!
//! State machine летающего врага: patrol → chase → windup → dash/ranged →
//! recoil → cooldown. Логика тика — чистая функция `brain::think`,
//! ECS-системы только собирают perception и применяют результат.

use bevy::prelude::*;

use crate::components::{Actor, Collider, Faction, Health, Position};
use crate::physics::apply_linear_damping;
use crate::SimulationSet;

pub mod brain;
pub mod components;
pub mod events;
pub mod systems;
pub mod targeting;

#[cfg(test)]
mod brain_tests;

// Re-export основных типов
pub use brain::{think, Perception, ThinkOutcome};
pub use components::*;
pub use events::FlyerStateChanged;
pub use targeting::TargetRegistry;

/// Полный набор компонентов летающего врага по профилю
pub fn flyer_bundle(config: FlyerConfig, position: Vec2) -> impl Bundle {
    let collider = if config.base_is_trigger() {
        Collider::trigger_circle(config.body_radius)
    } else {
        Collider::solid_circle(config.body_radius)
    };

    (
        Flyer,
        Actor::new(Faction::Hostile),
        Health::new(config.max_health),
        Position(position),
        collider,
        config,
    )
}

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. refresh_target_registry — SimulationSet::Perception
/// 2. flyer_think — SimulationSet::Think
/// 3. clamp_to_patrol_area, update_facing — SimulationSet::Motion (после интеграции)
/// 4. retarget_patrol_on_obstacle — SimulationSet::Resolve
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TargetRegistry>()
            .add_event::<FlyerStateChanged>();

        app.add_systems(
            FixedUpdate,
            (
                targeting::refresh_target_registry.in_set(SimulationSet::Perception),
                systems::flyer_think.in_set(SimulationSet::Think),
                (systems::clamp_to_patrol_area, systems::update_facing)
                    .chain()
                    .after(apply_linear_damping)
                    .in_set(SimulationSet::Motion),
                systems::retarget_patrol_on_obstacle.in_set(SimulationSet::Resolve),
            ),
        );
    }
}
