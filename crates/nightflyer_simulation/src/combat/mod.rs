//! Combat module
//!
//! ECS ответственность:
//! - Урон и смерть: Health → DamageDealt / EntityDied, Dead, деспавн трупов
//! - Рывок: контакт Dashing-врага с игроком → урон + knockback
//! - Снаряды: спавн, TTL, попадания по фракции
//! - Kill zone: летальный урон игроку

use bevy::prelude::*;

use crate::SimulationSet;

pub mod damage;
pub mod dash;
pub mod kill_zone;
pub mod projectile;

// Re-export основных типов
pub use damage::{apply_damage, DamageDealt, DamageSource, Dead, DespawnAfter, EntityDied, CORPSE_LIFETIME};
pub use dash::resolve_dash_contacts;
pub use kill_zone::{KillZone, KillZoneConfig, KILL_ZONE_DAMAGE};
pub use projectile::{Projectile, ProjectileFired};

/// Combat Plugin
///
/// Порядок выполнения (FixedUpdate):
/// 1. SimulationSet::Projectiles — TTL, спавн из ProjectileFired
/// 2. SimulationSet::Resolve — рывок, снаряды, kill zone (по Contact событиям)
/// 3. SimulationSet::Cleanup — Dead маркер, деспавн трупов
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<DamageDealt>()
            .add_event::<EntityDied>()
            .add_event::<ProjectileFired>();

        app.add_systems(
            FixedUpdate,
            (
                (projectile::tick_projectile_lifetime, projectile::spawn_projectiles)
                    .chain()
                    .in_set(SimulationSet::Projectiles),
                (
                    dash::resolve_dash_contacts,
                    projectile::resolve_projectile_contacts,
                    kill_zone::resolve_kill_zone_contacts,
                )
                    .chain()
                    .in_set(SimulationSet::Resolve),
                (damage::mark_dead, damage::despawn_after_timeout)
                    .chain()
                    .in_set(SimulationSet::Cleanup),
            ),
        );
    }
}
