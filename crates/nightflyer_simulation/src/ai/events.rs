//! AI Events — уведомления state machine летающего врага
//!
//! Потребители (тинт спрайта, индикатор атаки, анимации) — снаружи симуляции.

use bevy::prelude::*;

use super::components::FlyerStateKind;

/// Враг сменил состояние FSM
///
/// Отправляется ровно один раз на каждый переход (без повторов для
/// "перехода" в то же состояние).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlyerStateChanged {
    pub entity: Entity,
    pub from: FlyerStateKind,
    pub to: FlyerStateKind,
}

impl FlyerStateChanged {
    /// Включился индикатор атаки (windup/рывок)
    pub fn attack_indicator_on(&self) -> bool {
        self.to.shows_attack_indicator() && !self.from.shows_attack_indicator()
    }

    /// Погас индикатор атаки
    pub fn attack_indicator_off(&self) -> bool {
        self.from.shows_attack_indicator() && !self.to.shows_attack_indicator()
    }
}
