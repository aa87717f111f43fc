//! Movement компоненты: позиция, скорость, затухание, направление спрайта

use bevy::prelude::*;

/// Позиция в 2D мире (ECS authoritative, метры)
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub struct Position(pub Vec2);

/// Текущая скорость (метры/сек)
///
/// Для врагов перезаписывается каждый тик из FlyerState (velocity intent).
/// Для игрока — накапливает импульсы (knockback) и гасится LinearDamping.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub struct Velocity(pub Vec2);

/// Экспоненциальное затухание скорости (1/сек)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct LinearDamping(pub f32);

impl Default for LinearDamping {
    fn default() -> Self {
        Self(8.0)
    }
}

/// Куда смотрит спрайт (косметика, выводится из знака velocity.x)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Component)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    /// Мёртвая зона: малые скорости не переворачивают спрайт
    pub const DEAD_ZONE: f32 = 0.1;

    pub fn from_velocity(current: Facing, velocity: Vec2) -> Facing {
        if velocity.x > Self::DEAD_ZONE {
            Facing::Right
        } else if velocity.x < -Self::DEAD_ZONE {
            Facing::Left
        } else {
            current
        }
    }
}
