//! Удар рывком: контакт летающего врага в Dashing с игроком
//!
//! Урон — не чаще одного раза за рывок (`DashAttempt::hit_registered`),
//! сколько бы Contact событий ни пришло (enter + stay каждый тик).

use bevy::prelude::*;

use super::damage::{apply_damage, DamageDealt, DamageSource, EntityDied};
use crate::ai::brain::register_dash_hit;
use crate::ai::components::{Flyer, FlyerConfig, FlyerMemory, FlyerState};
use crate::components::{Actor, Faction, Health};
use crate::physics::{Contact, ImpulseApplied};

/// Система: урон + knockback при контакте рывка с игроком
pub fn resolve_dash_contacts(
    mut contacts: EventReader<Contact>,
    mut flyers: Query<(&mut FlyerState, &mut FlyerMemory, &FlyerConfig, &Health), With<Flyer>>,
    mut targets: Query<(&Actor, &mut Health), Without<Flyer>>,
    mut damage_dealt_events: EventWriter<DamageDealt>,
    mut entity_died_events: EventWriter<EntityDied>,
    mut impulses: EventWriter<ImpulseApplied>,
) {
    for contact in contacts.read() {
        let Ok((mut state, mut memory, config, flyer_health)) = flyers.get_mut(contact.entity) else {
            continue;
        };
        if !flyer_health.is_alive() {
            continue;
        }

        let Ok((actor, mut target_health)) = targets.get_mut(contact.other) else {
            continue;
        };
        if actor.faction != Faction::Player || !target_health.is_alive() {
            continue;
        }

        let Some(hit) = register_dash_hit(&mut state, &mut memory, config) else {
            continue;
        };

        crate::log(&format!(
            "🗡️ Dash hit: {:?} → {:?} ({} dmg, knockback {})",
            contact.entity, contact.other, hit.damage, hit.knockback
        ));

        apply_damage(
            &mut target_health,
            contact.other,
            Some(contact.entity),
            hit.damage,
            DamageSource::Dash,
            &mut damage_dealt_events,
            &mut entity_died_events,
        );

        if hit.knockback > 0.0 {
            impulses.write(ImpulseApplied {
                entity: contact.other,
                impulse: hit.direction * hit.knockback,
            });
        }
    }
}
