//! AI movement systems (после интеграции позиции).

use bevy::prelude::*;

use crate::ai::components::{Flyer, FlyerConfig};
use crate::components::{Facing, Position, Velocity};

/// Система: летающий враг не покидает patrol area
///
/// Работает после integrate_motion — клампим уже сдвинутую позицию.
pub fn clamp_to_patrol_area(mut flyers: Query<(&mut Position, &FlyerConfig), With<Flyer>>) {
    for (mut position, config) in flyers.iter_mut() {
        let clamped = config.patrol_area.clamp(position.0);
        // Проверяем что позиция изменилась — иначе Changed<Position> спамит
        if clamped != position.0 {
            position.0 = clamped;
        }
    }
}

/// Система: направление спрайта из знака velocity.x (с мёртвой зоной)
pub fn update_facing(mut query: Query<(&Velocity, &mut Facing)>) {
    for (velocity, mut facing) in query.iter_mut() {
        let next = Facing::from_velocity(*facing, velocity.0);
        if next != *facing {
            *facing = next;
        }
    }
}
