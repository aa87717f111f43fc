//! Урон и смерть
//!
//! Health сам решает исход удара (`HealthChange`), здесь исход превращается
//! в события: `DamageDealt` — только нелетальный удар, `EntityDied` — только
//! летальный (ровно один раз за жизнь).

use bevy::prelude::*;

use crate::components::{Actor, Collider, Faction, Health, HealthChange};

/// Сколько секунд труп врага остаётся в мире
pub const CORPSE_LIFETIME: f32 = 1.0;

/// Источник урона (для логов и потребителей событий)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum DamageSource {
    Dash,
    Projectile,
    KillZone,
    /// Ближняя атака игрока
    Melee,
}

/// Событие: нелетальный урон нанесен
#[derive(Event, Debug, Clone)]
pub struct DamageDealt {
    pub attacker: Option<Entity>,
    pub target: Entity,
    pub damage: f32,
    pub source: DamageSource,
}

/// Событие: entity умер (health <= 0)
#[derive(Event, Debug, Clone)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
    pub source: DamageSource,
}

/// Компонент-маркер: entity мертв
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Dead;

/// Компонент-маркер: деспавн entity после указанного времени
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct DespawnAfter {
    /// Время деспавна (секунды fixed-времени от старта)
    pub despawn_time: f32,
}

/// Применить урон к Health и отправить ровно одно событие по исходу
pub fn apply_damage(
    health: &mut Health,
    target: Entity,
    attacker: Option<Entity>,
    amount: f32,
    source: DamageSource,
    damage_dealt_events: &mut EventWriter<DamageDealt>,
    entity_died_events: &mut EventWriter<EntityDied>,
) -> HealthChange {
    let change = health.take_damage(amount);

    match change {
        HealthChange::Ignored => {}
        HealthChange::Damaged(damage) => {
            damage_dealt_events.write(DamageDealt {
                attacker,
                target,
                damage,
                source,
            });
            crate::log(&format!(
                "💥 {:?} took {:.1} {:?} damage (hp {:.1}/{:.1})",
                target,
                damage,
                source,
                health.current(),
                health.max()
            ));
        }
        HealthChange::Died => {
            entity_died_events.write(EntityDied {
                entity: target,
                killer: attacker,
                source,
            });
            crate::log_info(&format!("☠️ {:?} killed by {:?} ({:?})", target, attacker, source));
        }
    }

    change
}

/// Система: EntityDied → Dead (+ деспавн трупа врага через CORPSE_LIFETIME)
///
/// Коллайдер трупа убирается сразу: мёртвые не блокируют снаряды.
pub fn mark_dead(
    mut commands: Commands,
    mut death_events: EventReader<EntityDied>,
    actors: Query<&Actor>,
    time: Res<Time<Fixed>>,
) {
    for event in death_events.read() {
        let Ok(mut entity_commands) = commands.get_entity(event.entity) else {
            continue;
        };

        entity_commands.insert(Dead);

        let hostile = actors
            .get(event.entity)
            .map(|actor| actor.faction == Faction::Hostile)
            .unwrap_or(false);
        if hostile {
            entity_commands.remove::<Collider>().insert(DespawnAfter {
                despawn_time: time.elapsed_secs() + CORPSE_LIFETIME,
            });
        }
    }
}

/// Система: деспавн entities с истёкшим DespawnAfter timeout
pub fn despawn_after_timeout(
    mut commands: Commands,
    query: Query<(Entity, &DespawnAfter)>,
    time: Res<Time<Fixed>>,
) {
    let current_time = time.elapsed_secs();

    for (entity, despawn_after) in query.iter() {
        if current_time >= despawn_after.despawn_time {
            crate::log(&format!("⚰️ Despawning entity {:?} (timeout)", entity));
            commands.entity(entity).despawn();
        }
    }
}
