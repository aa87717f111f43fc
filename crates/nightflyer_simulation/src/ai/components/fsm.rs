//! FSM компоненты летающего врага (state machine, память, маркер).

use bevy::prelude::*;

use super::config::{FlyerConfig, UnlockRule};

/// Маркер: летающий враг под управлением FlyerState
///
/// Автоматически добавляет FSM-компоненты через Required Components.
/// FlyerConfig задаётся явно при спавне (профиль варианта).
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(FlyerState, FlyerMemory, crate::components::Facing)]
pub struct Flyer;

/// Запись одного рывка (живёт от DashWindup до входа в Cooldown)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct DashAttempt {
    /// Направление, зафиксированное на входе в windup (unit vector)
    pub direction: Vec2,
    /// Урон уже нанесён в этом рывке (идемпотентность)
    pub hit_registered: bool,
    /// "Пролететь сквозь" после удара, потом recoil
    pub post_hit_timer: f32,
}

impl DashAttempt {
    pub fn new(direction: Vec2, post_hit_time: f32) -> Self {
        Self {
            direction,
            hit_registered: false,
            post_hit_timer: post_hit_time,
        }
    }
}

/// FSM состояния летающего врага
///
/// Таймеры хранятся прямо в вариантах: выход из состояния = потеря таймера,
/// сбросить таймер можно только повторным входом.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub enum FlyerState {
    /// Случайное блуждание внутри patrol area
    Patrolling,

    /// Полёт к цели
    Chasing,

    /// Замер перед рывком (направление уже зафиксировано)
    DashWindup { timer: f32, dash: DashAttempt },

    /// Рывок сквозь цель, коллайдер pass-through
    Dashing { timer: f32, dash: DashAttempt },

    /// Отлёт назад после рывка
    DashRecoil { timer: f32, dash: DashAttempt },

    /// Замер перед выстрелом
    RangedWindup { timer: f32 },

    /// Атаки заблокированы, отлетаем от цели
    Cooldown { timer: f32 },
}

impl Default for FlyerState {
    fn default() -> Self {
        Self::Patrolling
    }
}

impl FlyerState {
    pub fn kind(&self) -> FlyerStateKind {
        match self {
            FlyerState::Patrolling => FlyerStateKind::Patrolling,
            FlyerState::Chasing => FlyerStateKind::Chasing,
            FlyerState::DashWindup { .. } => FlyerStateKind::DashWindup,
            FlyerState::Dashing { .. } => FlyerStateKind::Dashing,
            FlyerState::DashRecoil { .. } => FlyerStateKind::DashRecoil,
            FlyerState::RangedWindup { .. } => FlyerStateKind::RangedWindup,
            FlyerState::Cooldown { .. } => FlyerStateKind::Cooldown,
        }
    }

    /// Committed-состояния не прерываются distance-решениями и потерей цели
    pub fn is_committed(&self) -> bool {
        self.kind().is_committed()
    }

    /// Текущая запись рывка (только dash-цикл)
    pub fn dash(&self) -> Option<&DashAttempt> {
        match self {
            FlyerState::DashWindup { dash, .. }
            | FlyerState::Dashing { dash, .. }
            | FlyerState::DashRecoil { dash, .. } => Some(dash),
            _ => None,
        }
    }

    /// Остаток таймера активного состояния (Patrolling/Chasing — без таймера)
    pub fn timer(&self) -> Option<f32> {
        match self {
            FlyerState::Patrolling | FlyerState::Chasing => None,
            FlyerState::DashWindup { timer, .. }
            | FlyerState::Dashing { timer, .. }
            | FlyerState::DashRecoil { timer, .. }
            | FlyerState::RangedWindup { timer }
            | FlyerState::Cooldown { timer } => Some(*timer),
        }
    }
}

/// Состояние без payload — для событий, логов и сравнений
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum FlyerStateKind {
    Patrolling,
    Chasing,
    DashWindup,
    Dashing,
    DashRecoil,
    RangedWindup,
    Cooldown,
}

impl FlyerStateKind {
    pub fn is_committed(&self) -> bool {
        matches!(
            self,
            FlyerStateKind::DashWindup
                | FlyerStateKind::Dashing
                | FlyerStateKind::DashRecoil
                | FlyerStateKind::RangedWindup
                | FlyerStateKind::Cooldown
        )
    }

    /// Индикатор атаки (косметика): горит в windup и во время рывка
    pub fn shows_attack_indicator(&self) -> bool {
        matches!(
            self,
            FlyerStateKind::DashWindup | FlyerStateKind::Dashing | FlyerStateKind::RangedWindup
        )
    }
}

/// Текущая patrol-точка и таймер до её смены
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct PatrolRoute {
    pub target: Vec2,
    /// 0 → новая точка на ближайшем тике патруля
    pub retarget_timer: f32,
}

/// Runtime-память врага вне FSM-состояния
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct FlyerMemory {
    /// false только в Cooldown
    pub can_attack: bool,
    /// Закэшированная цель (weak ref: только lookup, инвалидируется при смерти)
    pub target: Option<Entity>,
    pub patrol: PatrolRoute,
    /// Unlock counter: ближние атаки с последнего выстрела
    pub close_attacks: u32,
}

impl Default for FlyerMemory {
    fn default() -> Self {
        Self {
            can_attack: true,
            target: None,
            patrol: PatrolRoute::default(),
            close_attacks: 0,
        }
    }
}

impl FlyerMemory {
    /// Разрешена ли дальняя атака по unlock counter (без gate — всегда)
    pub fn ranged_unlocked(&self, config: &FlyerConfig) -> bool {
        match &config.ranged_unlock {
            Some(unlock) => self.close_attacks >= unlock.required,
            None => true,
        }
    }

    /// Учёт ближней атаки по правилу профиля
    pub fn record_close_attack(&mut self, config: &FlyerConfig, rule: UnlockRule) {
        if let Some(unlock) = &config.ranged_unlock {
            if unlock.rule == rule {
                self.close_attacks = self.close_attacks.saturating_add(1);
            }
        }
    }
}
