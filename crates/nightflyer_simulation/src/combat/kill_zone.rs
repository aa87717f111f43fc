//! Kill zone: trigger-область, убивающая игрока при касании (падение в пропасть)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::damage::{apply_damage, DamageDealt, DamageSource, EntityDied};
use crate::components::{Actor, Bounds2, Collider, Faction, Health, Position};
use crate::physics::Contact;

/// Урон по умолчанию — гарантированно летальный
pub const KILL_ZONE_DAMAGE: f32 = 99999.0;

#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
#[require(Position)]
pub struct KillZone {
    pub damage: f32,
}

impl Default for KillZone {
    fn default() -> Self {
        Self {
            damage: KILL_ZONE_DAMAGE,
        }
    }
}

/// Описание kill zone в конфиге
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KillZoneConfig {
    pub area: Bounds2,
    #[serde(default = "default_kill_zone_damage")]
    pub damage: f32,
}

fn default_kill_zone_damage() -> f32 {
    KILL_ZONE_DAMAGE
}

impl KillZoneConfig {
    pub fn bundle(&self) -> impl Bundle {
        (
            KillZone { damage: self.damage },
            Position(self.area.center()),
            Collider::trigger_rect(self.area.half_extents()),
        )
    }
}

/// Система: урон игроку внутри kill zone
pub fn resolve_kill_zone_contacts(
    mut contacts: EventReader<Contact>,
    zones: Query<&KillZone>,
    mut actors: Query<(&Actor, &mut Health)>,
    mut damage_dealt_events: EventWriter<DamageDealt>,
    mut entity_died_events: EventWriter<EntityDied>,
) {
    for contact in contacts.read() {
        let Ok(zone) = zones.get(contact.entity) else {
            continue;
        };
        let Ok((actor, mut health)) = actors.get_mut(contact.other) else {
            continue;
        };
        if actor.faction != Faction::Player {
            continue;
        }

        apply_damage(
            &mut health,
            contact.other,
            None,
            zone.damage,
            DamageSource::KillZone,
            &mut damage_dealt_events,
            &mut entity_died_events,
        );
    }
}
