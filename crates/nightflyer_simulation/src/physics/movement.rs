//! Кинематика без физического движка
//!
//! - Position += Velocity × dt (для всех тел с Velocity)
//! - LinearDamping гасит накопленную скорость (knockback игрока)
//! - ImpulseApplied добавляется к Velocity мгновенно
//!
//! Детерминизм: fixed timestep (60Hz), без солвера

use bevy::prelude::*;

use crate::components::{LinearDamping, Position, Velocity};

/// Событие: мгновенный импульс (knockback) для entity
///
/// Единичная масса: impulse сразу добавляется к скорости.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ImpulseApplied {
    pub entity: Entity,
    pub impulse: Vec2,
}

/// Система интеграции позиции
///
/// Работает в FixedUpdate (60Hz) для детерминизма.
pub fn integrate_motion(
    mut bodies: Query<(&mut Position, &Velocity)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut position, velocity) in bodies.iter_mut() {
        if velocity.0 != Vec2::ZERO {
            position.0 += velocity.0 * delta;
        }
    }
}

/// Система затухания скорости (линейное, до нуля без overshoot)
pub fn apply_linear_damping(
    mut bodies: Query<(&mut Velocity, &LinearDamping)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut velocity, damping) in bodies.iter_mut() {
        if velocity.0 == Vec2::ZERO {
            continue;
        }
        let factor = (1.0 - damping.0 * delta).max(0.0);
        velocity.0 *= factor;
        if velocity.0.length_squared() < 1e-6 {
            velocity.0 = Vec2::ZERO;
        }
    }
}

/// Система применения импульсов (knockback от рывка)
pub fn apply_impulses(
    mut impulses: EventReader<ImpulseApplied>,
    mut bodies: Query<&mut Velocity>,
) {
    for event in impulses.read() {
        let Ok(mut velocity) = bodies.get_mut(event.entity) else {
            continue;
        };
        velocity.0 += event.impulse;
    }
}
