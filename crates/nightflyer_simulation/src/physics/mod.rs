//! Physics stand-in module
//!
//! Без солвера: интеграция скорости, затухание, импульсы, overlap-контакты.
//! Коллизии не разрешаются — контакты только сообщаются потребителям.

use bevy::prelude::*;

use crate::SimulationSet;

pub mod contacts;
pub mod movement;

// Re-export основных типов
pub use contacts::{detect_contacts, overlap_circle, ActiveContacts, Contact, ContactPhase};
pub use movement::{apply_impulses, apply_linear_damping, integrate_motion, ImpulseApplied};

/// Physics Plugin
///
/// Порядок выполнения (FixedUpdate):
/// 1. integrate_motion, apply_linear_damping — SimulationSet::Motion
/// 2. detect_contacts — SimulationSet::Contacts
/// 3. apply_impulses — SimulationSet::Cleanup (после всех resolve систем)
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<Contact>()
            .add_event::<ImpulseApplied>()
            .init_resource::<ActiveContacts>();

        app.add_systems(
            FixedUpdate,
            (
                (integrate_motion, apply_linear_damping)
                    .chain()
                    .in_set(SimulationSet::Motion),
                detect_contacts.in_set(SimulationSet::Contacts),
                apply_impulses.in_set(SimulationSet::Cleanup),
            ),
        );
    }
}
