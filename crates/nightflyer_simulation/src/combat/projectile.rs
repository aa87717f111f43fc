//! Снаряды: прямой полёт, TTL, попадание по фракции
//!
//! Снаряд не меняет курс после спавна. Первый контакт с актором целевой
//! фракции (кроме владельца) наносит урон и уничтожает снаряд; твёрдый
//! коллайдер уничтожает без урона.

use bevy::prelude::*;

use super::damage::{apply_damage, DamageDealt, DamageSource, EntityDied};
use crate::components::{Actor, Collider, Faction, Health, Position, Velocity};
use crate::physics::Contact;

/// Событие: запрос на спавн снаряда (враги и пули игрока)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ProjectileFired {
    pub owner: Entity,
    pub origin: Vec2,
    /// Направление (нормализуется при спавне, ноль → +X)
    pub direction: Vec2,
    pub speed: f32,
    pub damage: f32,
    pub lifetime: f32,
    pub radius: f32,
    /// Кого снаряд ранит
    pub target_faction: Faction,
}

/// Снаряд в полёте
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
#[require(Position, Velocity)]
pub struct Projectile {
    pub owner: Entity,
    pub damage: f32,
    pub target_faction: Faction,
    /// Оставшееся время жизни (сек)
    pub lifetime: f32,
    /// Уже сработал (ждёт деспавна) — повторных попаданий нет
    pub spent: bool,
}

impl Projectile {
    fn consume(&mut self) -> bool {
        if self.spent {
            return false;
        }
        self.spent = true;
        true
    }
}

/// Система: спавн снарядов из ProjectileFired
pub fn spawn_projectiles(mut commands: Commands, mut fired_events: EventReader<ProjectileFired>) {
    for event in fired_events.read() {
        let direction = event.direction.try_normalize().unwrap_or(Vec2::X);

        let entity = commands
            .spawn((
                Projectile {
                    owner: event.owner,
                    damage: event.damage,
                    target_faction: event.target_faction,
                    lifetime: event.lifetime,
                    spent: false,
                },
                Position(event.origin),
                Velocity(direction * event.speed),
                Collider::trigger_circle(event.radius),
            ))
            .id();

        crate::log(&format!(
            "🔫 {:?} fired projectile {:?} from {:?} dir {:?}",
            event.owner, entity, event.origin, direction
        ));
    }
}

/// Система: TTL снарядов
pub fn tick_projectile_lifetime(
    mut commands: Commands,
    mut projectiles: Query<(Entity, &mut Projectile)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut projectile) in projectiles.iter_mut() {
        projectile.lifetime -= delta;
        if crate::timer_expired(projectile.lifetime) && projectile.consume() {
            commands.entity(entity).despawn();
        }
    }
}

/// Система: попадания снарядов
pub fn resolve_projectile_contacts(
    mut commands: Commands,
    mut contacts: EventReader<Contact>,
    mut projectiles: Query<&mut Projectile>,
    mut actors: Query<(&Actor, &mut Health)>,
    colliders: Query<&Collider>,
    mut damage_dealt_events: EventWriter<DamageDealt>,
    mut entity_died_events: EventWriter<EntityDied>,
) {
    for contact in contacts.read() {
        let Ok(mut projectile) = projectiles.get_mut(contact.entity) else {
            continue;
        };
        if projectile.spent || contact.other == projectile.owner {
            continue;
        }

        if let Ok((actor, mut health)) = actors.get_mut(contact.other) {
            if actor.faction == projectile.target_faction {
                projectile.consume();
                apply_damage(
                    &mut health,
                    contact.other,
                    Some(projectile.owner),
                    projectile.damage,
                    DamageSource::Projectile,
                    &mut damage_dealt_events,
                    &mut entity_died_events,
                );
                commands.entity(contact.entity).despawn();
                continue;
            }
        }

        let solid = colliders
            .get(contact.other)
            .map(|collider| collider.is_solid())
            .unwrap_or(false);
        if solid && projectile.consume() {
            commands.entity(contact.entity).despawn();
        }
    }
}
