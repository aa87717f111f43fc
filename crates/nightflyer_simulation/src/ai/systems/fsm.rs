//! FSM AI system: один тик state machine для каждого летающего врага.

use bevy::prelude::*;

use crate::ai::brain::{think, Perception};
use crate::ai::components::{Flyer, FlyerConfig, FlyerMemory, FlyerState};
use crate::ai::events::FlyerStateChanged;
use crate::ai::targeting::TargetRegistry;
use crate::combat::ProjectileFired;
use crate::components::{Collider, Faction, Health, Position, Velocity};
use crate::DeterministicRng;

/// Система: AI FSM тик летающих врагов
///
/// 1. Мёртвый враг — нулевая скорость, пропуск
/// 2. Валидация закэшированной цели (нет/мертва → сброс, перезахват из TargetRegistry)
/// 3. `think`: таймеры, решения, patrol, velocity intent
/// 4. Побочные эффекты: коллайдер pass-through, ProjectileFired, FlyerStateChanged
pub fn flyer_think(
    mut flyers: Query<
        (
            Entity,
            &mut FlyerState,
            &mut FlyerMemory,
            &FlyerConfig,
            &Health,
            &Position,
            &mut Velocity,
            Option<&mut Collider>,
        ),
        With<Flyer>,
    >,
    targets: Query<(&Position, &Health), Without<Flyer>>,
    registry: Res<TargetRegistry>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
    mut fired_events: EventWriter<ProjectileFired>,
    mut state_events: EventWriter<FlyerStateChanged>,
) {
    let delta = time.delta_secs();

    for (entity, mut state, mut memory, config, health, position, mut velocity, collider) in
        flyers.iter_mut()
    {
        // Труп без коллайдера тоже должен замереть
        if !health.is_alive() {
            if velocity.0 != Vec2::ZERO {
                velocity.0 = Vec2::ZERO;
            }
            continue;
        }

        let target = resolve_target(&mut memory, &registry, &targets);
        let perception = Perception {
            position: position.0,
            target,
        };

        let outcome = think(&mut state, &mut memory, config, perception, delta, &mut rng.rng);

        velocity.0 = outcome.velocity;

        if let (Some(pass_through), Some(mut collider)) = (outcome.pass_through, collider) {
            collider.is_trigger = pass_through || config.base_is_trigger();
        }

        if let Some(launch) = outcome.launch {
            fired_events.write(ProjectileFired {
                owner: entity,
                origin: launch.origin,
                direction: launch.direction,
                speed: launch.speed,
                damage: launch.damage,
                lifetime: launch.lifetime,
                radius: launch.radius,
                target_faction: Faction::Player,
            });
        }

        for transition in outcome.transitions {
            crate::log(&format!("🦇 {:?} {:?} → {:?}", entity, transition.from, transition.to));
            state_events.write(FlyerStateChanged {
                entity,
                from: transition.from,
                to: transition.to,
            });
        }
    }
}

/// Позиция живой цели; мёртвая/исчезнувшая цель сбрасывается из памяти
fn resolve_target(
    memory: &mut FlyerMemory,
    registry: &TargetRegistry,
    targets: &Query<(&Position, &Health), Without<Flyer>>,
) -> Option<Vec2> {
    if memory.target.is_none() {
        memory.target = registry.player();
    }

    let target = memory.target?;
    match targets.get(target) {
        Ok((position, health)) if health.is_alive() => Some(position.0),
        _ => {
            memory.target = None;
            None
        }
    }
}
