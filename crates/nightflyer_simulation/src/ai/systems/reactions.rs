//! AI reaction systems (контакты с препятствиями).

use bevy::prelude::*;

use crate::ai::components::{Flyer, FlyerConfig, FlyerMemory, FlyerState};
use crate::components::{Collider, Obstacle};
use crate::physics::{Contact, ContactPhase};
use crate::DeterministicRng;

/// System: патрульный врезался в стену → новая patrol-точка
///
/// Только enter-контакт с твёрдым препятствием и только в Patrolling:
/// в погоне и атаках маршрут задаёт цель.
pub fn retarget_patrol_on_obstacle(
    mut contacts: EventReader<Contact>,
    mut flyers: Query<(&FlyerState, &mut FlyerMemory, &FlyerConfig), With<Flyer>>,
    obstacles: Query<&Collider, With<Obstacle>>,
    mut rng: ResMut<DeterministicRng>,
) {
    for contact in contacts.read() {
        if contact.phase != ContactPhase::Started {
            continue;
        }

        let Ok((state, mut memory, config)) = flyers.get_mut(contact.entity) else {
            continue;
        };
        if !matches!(state, FlyerState::Patrolling) {
            continue;
        }

        let solid = obstacles
            .get(contact.other)
            .map(|collider| collider.is_solid())
            .unwrap_or(false);
        if !solid {
            continue;
        }

        memory.patrol.target = config.patrol_area.random_point(&mut rng.rng);
        memory.patrol.retarget_timer = config.patrol_change_time;

        crate::log(&format!(
            "🧱 {:?} hit obstacle {:?} → new patrol point {:?}",
            contact.entity, contact.other, memory.patrol.target
        ));
    }
}
