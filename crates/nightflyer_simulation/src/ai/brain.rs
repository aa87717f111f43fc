//! Один тик state machine летающего врага (без ECS)
//!
//! Порядок внутри тика:
//! 1. таймер активного состояния (истёк → переход по таблице)
//! 2. distance-решение (только вне committed-состояний)
//! 3. patrol upkeep (смена patrol-точки)
//! 4. velocity intent из итогового состояния
//!
//! Смерть и валидация цели — снаружи (система `flyer_think`): сюда приходит
//! уже проверенная позиция живой цели или None.

use bevy::prelude::*;
use rand::Rng;

use crate::timer_expired;

use super::components::{
    DashAttempt, FlyerConfig, FlyerMemory, FlyerState, FlyerStateKind, UnlockRule,
};

/// Что враг "видит" в этом тике
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perception {
    pub position: Vec2,
    /// Позиция живой цели (None — цели нет или она мертва)
    pub target: Option<Vec2>,
}

/// Параметры снаряда, который нужно заспавнить
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileLaunch {
    pub origin: Vec2,
    pub direction: Vec2,
    pub speed: f32,
    pub damage: f32,
    pub lifetime: f32,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: FlyerStateKind,
    pub to: FlyerStateKind,
}

/// Результат тика: intent для движения + побочные эффекты
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThinkOutcome {
    pub velocity: Vec2,
    pub launch: Option<ProjectileLaunch>,
    /// Some(true) — вошли в Dashing, Some(false) — вышли (вернуть коллайдер)
    pub pass_through: Option<bool>,
    pub transitions: Vec<Transition>,
}

/// Результат засчитанного удара рывком
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashHit {
    pub direction: Vec2,
    pub damage: f32,
    pub knockback: f32,
}

/// Нормализованное направление; совпадение позиций → Vec2::X
pub fn locked_direction(from: Vec2, to: Vec2) -> Vec2 {
    let direction = (to - from).normalize_or_zero();
    if direction.length_squared() < 0.0001 {
        Vec2::X
    } else {
        direction
    }
}

pub fn think(
    state: &mut FlyerState,
    memory: &mut FlyerMemory,
    config: &FlyerConfig,
    perception: Perception,
    delta: f32,
    rng: &mut impl Rng,
) -> ThinkOutcome {
    let mut outcome = ThinkOutcome::default();

    tick_state_timer(state, memory, config, perception, delta, &mut outcome);
    decide(state, memory, config, perception, &mut outcome);
    upkeep_patrol(state, memory, config, perception, delta, rng);
    outcome.velocity = movement_intent(state, memory, config, perception);

    outcome
}

/// Засчитать контакт с целью во время рывка (не чаще раза за рывок)
pub fn register_dash_hit(
    state: &mut FlyerState,
    memory: &mut FlyerMemory,
    config: &FlyerConfig,
) -> Option<DashHit> {
    let FlyerState::Dashing { dash, .. } = state else {
        return None;
    };

    if dash.hit_registered {
        return None;
    }

    dash.hit_registered = true;
    dash.post_hit_timer = config.dash.post_hit_time;
    let direction = dash.direction;
    memory.record_close_attack(config, UnlockRule::Hits);

    Some(DashHit {
        direction,
        damage: config.dash.damage,
        knockback: config.dash.knockback,
    })
}

/// Единственная точка смены состояния: pass-through ставится на входе в
/// Dashing и снимается ровно один раз на выходе из него.
fn transition(state: &mut FlyerState, next: FlyerState, outcome: &mut ThinkOutcome) {
    let from = state.kind();
    let to = next.kind();

    if from == FlyerStateKind::Dashing && to != FlyerStateKind::Dashing {
        outcome.pass_through = Some(false);
    }
    if to == FlyerStateKind::Dashing && from != FlyerStateKind::Dashing {
        outcome.pass_through = Some(true);
    }

    *state = next;

    if from != to {
        outcome.transitions.push(Transition { from, to });
    }
}

fn enter_cooldown(state: &mut FlyerState, memory: &mut FlyerMemory, seconds: f32, outcome: &mut ThinkOutcome) {
    memory.can_attack = false;
    transition(state, FlyerState::Cooldown { timer: seconds }, outcome);
}

fn tick_state_timer(
    state: &mut FlyerState,
    memory: &mut FlyerMemory,
    config: &FlyerConfig,
    perception: Perception,
    delta: f32,
    outcome: &mut ThinkOutcome,
) {
    match *state {
        FlyerState::Patrolling | FlyerState::Chasing => {}

        FlyerState::DashWindup { timer, dash } => {
            let timer = timer - delta;
            if timer_expired(timer) {
                let next = FlyerState::Dashing {
                    timer: config.dash.max_time,
                    dash,
                };
                transition(state, next, outcome);
            } else {
                *state = FlyerState::DashWindup { timer, dash };
            }
        }

        FlyerState::Dashing { timer, mut dash } => {
            let timer = timer - delta;

            // После попадания maxTime уже не важен — ждём post-hit
            let finished = if dash.hit_registered {
                dash.post_hit_timer -= delta;
                timer_expired(dash.post_hit_timer)
            } else {
                timer_expired(timer)
            };

            if finished {
                memory.record_close_attack(config, UnlockRule::Attempts);
                let next = FlyerState::DashRecoil {
                    timer: config.dash.recoil_time,
                    dash,
                };
                transition(state, next, outcome);
            } else {
                *state = FlyerState::Dashing { timer, dash };
            }
        }

        FlyerState::DashRecoil { timer, dash } => {
            let timer = timer - delta;
            if timer_expired(timer) {
                enter_cooldown(state, memory, config.dash.cooldown, outcome);
            } else {
                *state = FlyerState::DashRecoil { timer, dash };
            }
        }

        FlyerState::RangedWindup { timer } => {
            let timer = timer - delta;
            if timer_expired(timer) {
                outcome.launch = fire_projectile(config, perception);
                if outcome.launch.is_some() {
                    memory.close_attacks = 0;
                }
                let cooldown = config
                    .ranged
                    .map(|ranged| ranged.cooldown)
                    .unwrap_or(config.dash.cooldown);
                enter_cooldown(state, memory, cooldown, outcome);
            } else {
                *state = FlyerState::RangedWindup { timer };
            }
        }

        FlyerState::Cooldown { timer } => {
            let timer = timer - delta;
            if timer_expired(timer) {
                memory.can_attack = true;

                let target_in_range = perception
                    .target
                    .is_some_and(|target| perception.position.distance(target) <= config.detection_range);
                let next = if target_in_range {
                    FlyerState::Chasing
                } else {
                    FlyerState::Patrolling
                };
                transition(state, next, outcome);
            } else {
                *state = FlyerState::Cooldown { timer };
            }
        }
    }
}

fn decide(
    state: &mut FlyerState,
    memory: &FlyerMemory,
    config: &FlyerConfig,
    perception: Perception,
    outcome: &mut ThinkOutcome,
) {
    if state.is_committed() {
        return;
    }

    let Some(target) = perception.target else {
        transition(state, FlyerState::Patrolling, outcome);
        return;
    };

    let distance = perception.position.distance(target);

    let lose_range = if *state == FlyerState::Chasing {
        config.detection_range * config.lose_range_factor
    } else {
        config.detection_range
    };
    if distance > lose_range {
        transition(state, FlyerState::Patrolling, outcome);
        return;
    }

    if !memory.can_attack {
        transition(state, FlyerState::Chasing, outcome);
        return;
    }

    // 1) Вблизи — рывок
    if distance <= config.dash.start_range {
        let dash = DashAttempt::new(
            locked_direction(perception.position, target),
            config.dash.post_hit_time,
        );
        let next = FlyerState::DashWindup {
            timer: config.dash.windup_time,
            dash,
        };
        transition(state, next, outcome);
        return;
    }

    // 2) На дистанции — выстрел
    if let Some(ranged) = &config.ranged {
        if memory.ranged_unlocked(config) && distance >= ranged.min_range && distance <= ranged.max_range {
            let next = FlyerState::RangedWindup {
                timer: ranged.windup_time,
            };
            transition(state, next, outcome);
            return;
        }
    }

    transition(state, FlyerState::Chasing, outcome);
}

fn upkeep_patrol(
    state: &FlyerState,
    memory: &mut FlyerMemory,
    config: &FlyerConfig,
    perception: Perception,
    delta: f32,
    rng: &mut impl Rng,
) {
    memory.patrol.retarget_timer = (memory.patrol.retarget_timer - delta).max(0.0);

    match state {
        FlyerState::Patrolling if timer_expired(memory.patrol.retarget_timer) => {
            memory.patrol.target = config.patrol_area.random_point(rng);
            memory.patrol.retarget_timer = config.patrol_change_time;
        }
        FlyerState::Chasing => {
            // Потеряв цель, патруль сначала долетит до её последней позиции
            if let Some(target) = perception.target {
                memory.patrol.target = target;
            }
        }
        _ => {}
    }
}

fn movement_intent(
    state: &FlyerState,
    memory: &FlyerMemory,
    config: &FlyerConfig,
    perception: Perception,
) -> Vec2 {
    let position = perception.position;

    match state {
        FlyerState::Patrolling => {
            (memory.patrol.target - position).normalize_or_zero() * config.patrol_speed
        }
        FlyerState::Chasing => perception
            .target
            .map(|target| (target - position).normalize_or_zero() * config.chase_speed)
            .unwrap_or(Vec2::ZERO),
        FlyerState::DashWindup { .. } | FlyerState::RangedWindup { .. } => Vec2::ZERO,
        FlyerState::Dashing { dash, .. } => dash.direction * config.dash.speed,
        FlyerState::DashRecoil { dash, .. } => -dash.direction * config.dash.recoil_speed,
        // Во время кд отлетаем от цели, чтобы не липнуть
        FlyerState::Cooldown { .. } => perception
            .target
            .map(|target| (position - target).normalize_or_zero() * config.patrol_speed)
            .unwrap_or(Vec2::ZERO),
    }
}

fn fire_projectile(config: &FlyerConfig, perception: Perception) -> Option<ProjectileLaunch> {
    let ranged = config.ranged.as_ref()?;
    let target = perception.target?;

    let origin = perception.position + ranged.spawn_offset;
    Some(ProjectileLaunch {
        origin,
        direction: locked_direction(origin, target),
        speed: ranged.projectile_speed,
        damage: ranged.projectile_damage,
        lifetime: ranged.projectile_lifetime,
        radius: ranged.projectile_radius,
    })
}
