//! Базовые компоненты акторов: Actor, Faction, Player, Health

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Сторона конфликта. Используется для фильтрации урона (снаряды, рывок, kill zone).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum Faction {
    /// Игрок (цель всех врагов)
    Player,
    /// Летающие враги
    #[default]
    Hostile,
}

/// Актор (игрок или враг) — базовый компонент для живых существ
///
/// Автоматически добавляет Health, Position, Velocity через Required Components.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(Health, crate::components::Position, crate::components::Velocity)]
pub struct Actor {
    pub faction: Faction,
}

impl Actor {
    pub fn new(faction: Faction) -> Self {
        Self { faction }
    }
}

/// Маркер: единственная цель врагов (ищется через TargetRegistry)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Player;

/// Результат одного вызова `Health::take_damage`
///
/// Для одного удара — либо Damaged, либо Died, никогда оба.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HealthChange {
    /// Уже мертв — урон проигнорирован
    Ignored,
    /// Нелетальный урон (запрошенная величина)
    Damaged(f32),
    /// Летальный удар (ровно один раз за жизнь)
    Died,
}

/// Здоровье актора
///
/// Инварианты: 0 ≤ current ≤ max; `alive` — защёлка (true → false, обратно никогда).
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Health {
    current: f32,
    max: f32,
    alive: bool,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self {
            current: max,
            max,
            alive: max > 0.0,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }

    pub fn take_damage(&mut self, amount: f32) -> HealthChange {
        if !self.alive {
            return HealthChange::Ignored;
        }

        let amount = amount.max(0.0);
        self.current = (self.current - amount).max(0.0);

        if self.current <= 0.0 {
            self.alive = false;
            HealthChange::Died
        } else {
            HealthChange::Damaged(amount)
        }
    }

    /// Лечение (мёртвых не лечим). Возвращает фактически восстановленное HP.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if !self.alive {
            return 0.0;
        }

        let before = self.current;
        self.current = (self.current + amount.max(0.0)).min(self.max);
        self.current - before
    }
}
