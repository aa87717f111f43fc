//! Профили настройки летающего врага
//!
//! Варианты врагов — это разные профили одной state machine:
//! - `aggressive` — рывок + дальняя атака, коллайдер pass-through только в рывке
//! - `gated` — как aggressive, но коллайдер всегда trigger и выстрел открывается
//!   после N ближних атак
//! - `bat` — только контактный рывок (без снарядов)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::Bounds2;
use crate::config::ConfigError;

/// Как ведёт себя коллайдер врага
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum ColliderMode {
    /// Твёрдый, trigger только во время Dashing
    #[default]
    ToggleOnDash,
    /// Всегда trigger
    AlwaysTrigger,
}

/// Что считается "ближней атакой" для unlock counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum UnlockRule {
    /// Только рывки, которые попали
    #[default]
    Hits,
    /// Любой завершённый рывок (попал или промахнулся)
    Attempts,
}

/// Gate дальней атаки: нужно `required` ближних атак с последнего выстрела
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct RangedUnlock {
    pub required: u32,
    #[serde(default)]
    pub rule: UnlockRule,
}

/// Атака 1: рывок сквозь игрока
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    pub start_range: f32,
    pub windup_time: f32,
    pub speed: f32,
    pub max_time: f32,
    pub damage: f32,
    /// Импульс отбрасывания игрока вдоль направления рывка
    pub knockback: f32,
    /// Немного пролететь "сквозь" после удара
    pub post_hit_time: f32,
    pub recoil_speed: f32,
    pub recoil_time: f32,
    pub cooldown: f32,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            start_range: 2.2,
            windup_time: 0.15,
            speed: 12.0,
            max_time: 0.5,
            damage: 25.0,
            knockback: 5.0,
            post_hit_time: 0.08,
            recoil_speed: 7.0,
            recoil_time: 0.35,
            cooldown: 1.6,
        }
    }
}

/// Атака 2: снаряд
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct RangedConfig {
    /// Не стреляем вплотную
    pub min_range: f32,
    pub max_range: f32,
    pub windup_time: f32,
    pub cooldown: f32,
    pub projectile_speed: f32,
    pub projectile_damage: f32,
    pub projectile_lifetime: f32,
    pub projectile_radius: f32,
    /// Точка вылета относительно позиции врага
    pub spawn_offset: Vec2,
}

impl Default for RangedConfig {
    fn default() -> Self {
        Self {
            min_range: 3.5,
            max_range: 8.0,
            windup_time: 0.25,
            cooldown: 1.2,
            projectile_speed: 10.0,
            projectile_damage: 12.0,
            projectile_lifetime: 4.0,
            projectile_radius: 0.2,
            spawn_offset: Vec2::ZERO,
        }
    }
}

/// Параметры летающего врага (все пороги state machine)
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct FlyerConfig {
    pub max_health: f32,
    pub body_radius: f32,
    pub collider_mode: ColliderMode,

    // Патруль
    pub patrol_speed: f32,
    /// Секунды между сменой patrol-точки
    pub patrol_change_time: f32,
    pub patrol_area: Bounds2,

    // Преследование
    pub chase_speed: f32,
    pub detection_range: f32,
    /// Гистерезис: уже преследуя, цель теряем только дальше
    /// `detection_range * lose_range_factor`
    pub lose_range_factor: f32,

    pub dash: DashConfig,
    /// None — нет способности стрелять (нет prefab снаряда)
    pub ranged: Option<RangedConfig>,
    pub ranged_unlock: Option<RangedUnlock>,
}

impl Default for FlyerConfig {
    fn default() -> Self {
        Self::aggressive()
    }
}

impl FlyerConfig {
    /// Рывок + снаряды, без gate
    pub fn aggressive() -> Self {
        Self {
            max_health: 50.0,
            body_radius: 0.5,
            collider_mode: ColliderMode::ToggleOnDash,
            patrol_speed: 3.0,
            patrol_change_time: 3.0,
            patrol_area: Bounds2::from_corners(Vec2::new(-10.0, 2.0), Vec2::new(10.0, 5.0)),
            chase_speed: 6.0,
            detection_range: 10.0,
            lose_range_factor: 1.0,
            dash: DashConfig::default(),
            ranged: Some(RangedConfig::default()),
            ranged_unlock: None,
        }
    }

    /// Выстрел открывается после двух попавших рывков, коллайдер всегда trigger
    pub fn gated() -> Self {
        Self {
            collider_mode: ColliderMode::AlwaysTrigger,
            ranged_unlock: Some(RangedUnlock {
                required: 2,
                rule: UnlockRule::Hits,
            }),
            ..Self::aggressive()
        }
    }

    /// Летучая мышь: контактный удар на 1.5× скорости погони, без снарядов,
    /// погоня бросается только за 1.2× радиуса обнаружения
    pub fn bat() -> Self {
        let chase_speed = 6.0;
        Self {
            max_health: 30.0,
            chase_speed,
            lose_range_factor: 1.2,
            dash: DashConfig {
                start_range: 1.5,
                windup_time: 0.05,
                speed: chase_speed * 1.5,
                max_time: 0.4,
                damage: 25.0,
                knockback: 5.0,
                post_hit_time: 0.0,
                recoil_speed: 3.0,
                recoil_time: 0.2,
                cooldown: 1.5,
            },
            ranged: None,
            ranged_unlock: None,
            ..Self::aggressive()
        }
    }

    /// Коллайдер вне рывка
    pub fn base_is_trigger(&self) -> bool {
        self.collider_mode == ColliderMode::AlwaysTrigger
    }

    /// Проверка профиля; поле в ошибке — путь внутри профиля (`dash.speed`)
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("max_health", self.max_health),
            ("body_radius", self.body_radius),
            ("patrol_speed", self.patrol_speed),
            ("patrol_change_time", self.patrol_change_time),
            ("chase_speed", self.chase_speed),
            ("detection_range", self.detection_range),
            ("dash.start_range", self.dash.start_range),
            ("dash.windup_time", self.dash.windup_time),
            ("dash.speed", self.dash.speed),
            ("dash.max_time", self.dash.max_time),
            ("dash.damage", self.dash.damage),
            ("dash.knockback", self.dash.knockback),
            ("dash.post_hit_time", self.dash.post_hit_time),
            ("dash.recoil_speed", self.dash.recoil_speed),
            ("dash.recoil_time", self.dash.recoil_time),
            ("dash.cooldown", self.dash.cooldown),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(
                    name,
                    format!("must be a non-negative number, got {}", value),
                ));
            }
        }

        if !(self.lose_range_factor.is_finite() && self.lose_range_factor >= 1.0) {
            return Err(ConfigError::invalid(
                "lose_range_factor",
                format!("must be at least 1.0, got {}", self.lose_range_factor),
            ));
        }

        if self.patrol_area.min.cmpgt(self.patrol_area.max).any() {
            return Err(ConfigError::invalid("patrol_area", "min must not exceed max"));
        }

        if let Some(ranged) = &self.ranged {
            if ranged.min_range < 0.0 || ranged.min_range > ranged.max_range {
                return Err(ConfigError::invalid(
                    "ranged.min_range",
                    format!(
                        "must satisfy 0 <= min_range <= max_range, got {}..{}",
                        ranged.min_range, ranged.max_range
                    ),
                ));
            }
            if ranged.projectile_lifetime <= 0.0 {
                return Err(ConfigError::invalid("ranged.projectile_lifetime", "must be positive"));
            }
        }

        Ok(())
    }
}
