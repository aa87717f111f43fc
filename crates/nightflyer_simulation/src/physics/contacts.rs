//! Контакты коллайдеров (overlap-детекция вместо физического движка)
//!
//! Каждый тик все пары пересекающихся коллайдеров превращаются в `Contact`
//! события (по одному на каждую сторону пары). Фаза `Started` — пара
//! пересеклась впервые, `Persisting` — пересекалась и на прошлом тике.

use bevy::prelude::*;
use std::collections::HashSet;

use crate::components::{Collider, Obstacle, Position};

/// Фаза контакта
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum ContactPhase {
    /// Первый тик пересечения (enter)
    Started,
    /// Пересечение продолжается (stay)
    Persisting,
}

/// Событие: `entity` касается `other`
///
/// Для пары (A, B) отправляются оба события: A→B и B→A, так что
/// потребитель фильтрует по `entity` (своей стороне контакта).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub entity: Entity,
    pub other: Entity,
    pub phase: ContactPhase,
}

/// Пары, пересекавшиеся на прошлом тике (упорядоченные: меньший Entity первым)
#[derive(Resource, Debug, Default)]
pub struct ActiveContacts {
    pairs: HashSet<(Entity, Entity)>,
}

impl ActiveContacts {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn contains(&self, a: Entity, b: Entity) -> bool {
        self.pairs.contains(&ordered(a, b))
    }
}

fn ordered(a: Entity, b: Entity) -> (Entity, Entity) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Система: overlap-детекция всех пар коллайдеров
///
/// Порядок событий детерминирован (сортировка по Entity).
/// Пары двух препятствий пропускаются (статика не интересна).
pub fn detect_contacts(
    colliders: Query<(Entity, &Position, &Collider, Has<Obstacle>)>,
    mut active: ResMut<ActiveContacts>,
    mut contacts: EventWriter<Contact>,
) {
    let mut bodies: Vec<(Entity, Vec2, Collider, bool)> = colliders
        .iter()
        .map(|(entity, position, collider, obstacle)| (entity, position.0, *collider, obstacle))
        .collect();
    bodies.sort_by_key(|(entity, ..)| *entity);

    let mut current = HashSet::new();

    for (i, &(a, a_pos, a_collider, a_obstacle)) in bodies.iter().enumerate() {
        for &(b, b_pos, b_collider, b_obstacle) in &bodies[i + 1..] {
            if a_obstacle && b_obstacle {
                continue;
            }
            if !a_collider.overlaps(a_pos, &b_collider, b_pos) {
                continue;
            }

            let pair = ordered(a, b);
            let phase = if active.pairs.contains(&pair) {
                ContactPhase::Persisting
            } else {
                ContactPhase::Started
            };
            current.insert(pair);

            contacts.write(Contact { entity: a, other: b, phase });
            contacts.write(Contact { entity: b, other: a, phase });
        }
    }

    // Разошедшиеся и деспавненные пары выпадают сами
    active.pairs = current;
}

/// Overlap-запрос: все тела, задевающие круг `center`/`radius`
///
/// Фильтр по маске (фракция, живость) делает caller, отбирая `bodies`.
/// Результат отсортирован по entity.
pub fn overlap_circle<'a>(
    center: Vec2,
    radius: f32,
    bodies: impl IntoIterator<Item = (Entity, Vec2, &'a Collider)>,
) -> Vec<Entity> {
    let area = Collider::trigger_circle(radius);
    let mut hits: Vec<Entity> = bodies
        .into_iter()
        .filter(|(_, position, collider)| area.overlaps(center, collider, *position))
        .map(|(entity, _, _)| entity)
        .collect();
    hits.sort();
    hits
}
