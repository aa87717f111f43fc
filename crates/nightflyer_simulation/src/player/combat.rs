//! Атаки игрока: ближний удар и пистолет
//!
//! Ввод живёт снаружи симуляции: input-слой шлёт `MeleeRequested` /
//! `ShootRequested`, здесь только правила (кулдауны, зона удара, пуля).
//!
//! Порядок в тике (SimulationSet::Actions):
//! 1. tick_player_attacks — кулдауны и задержка выстрела
//! 2. resolve_melee_requests — overlap круга удара → урон врагам
//! 3. resolve_shoot_requests — старт выстрела (достать пистолет)
//! 4. fire_due_shots — пуля вылетает после задержки → ProjectileFired

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::{apply_damage, DamageDealt, DamageSource, EntityDied, ProjectileFired};
use crate::components::{Actor, Collider, Faction, Health, Player, Position};
use crate::config::ConfigError;
use crate::physics::overlap_circle;
use crate::timer_expired;

/// Параметры атак игрока
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerAttackConfig {
    pub melee_cooldown: f32,
    pub melee_damage: f32,
    /// Радиус круга удара
    pub melee_range: f32,
    /// Центр круга удара: на сколько вынесен от игрока по направлению удара
    pub melee_reach: f32,

    pub shoot_cooldown: f32,
    pub shoot_damage: f32,
    /// Доставание пистолета + кадр выстрела: пуля вылетает с этой задержкой
    pub shoot_delay: f32,
    pub bullet_speed: f32,
    pub bullet_lifetime: f32,
    pub bullet_radius: f32,
    /// Точка вылета пули относительно игрока
    pub shoot_offset: Vec2,
}

impl Default for PlayerAttackConfig {
    fn default() -> Self {
        Self {
            melee_cooldown: 0.5,
            melee_damage: 20.0,
            melee_range: 1.0,
            melee_reach: 0.6,
            shoot_cooldown: 0.25,
            shoot_damage: 12.0,
            shoot_delay: 0.15,
            bullet_speed: 18.0,
            bullet_lifetime: 3.0,
            bullet_radius: 0.15,
            shoot_offset: Vec2::ZERO,
        }
    }
}

impl PlayerAttackConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("melee_cooldown", self.melee_cooldown),
            ("melee_damage", self.melee_damage),
            ("melee_range", self.melee_range),
            ("melee_reach", self.melee_reach),
            ("shoot_cooldown", self.shoot_cooldown),
            ("shoot_damage", self.shoot_damage),
            ("shoot_delay", self.shoot_delay),
            ("bullet_speed", self.bullet_speed),
            ("bullet_radius", self.bullet_radius),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(
                    name,
                    format!("must be a non-negative number, got {}", value),
                ));
            }
        }
        if !(self.bullet_lifetime.is_finite() && self.bullet_lifetime > 0.0) {
            return Err(ConfigError::invalid("bullet_lifetime", "must be positive"));
        }
        Ok(())
    }
}

/// Выстрел, ждущий конца анимации доставания
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct PendingShot {
    pub timer: f32,
    /// Точка прицела в мире
    pub aim: Vec2,
}

/// Состояние атак игрока
///
/// Кулдаун считается от начала атаки: повторный запрос внутри кулдауна
/// игнорируется (не ставится в очередь).
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PlayerAttack {
    pub config: PlayerAttackConfig,
    /// Оставшийся кулдаун удара (0 = готов)
    pub melee_cooldown: f32,
    /// Оставшийся кулдаун выстрела (0 = готов)
    pub shoot_cooldown: f32,
    pub pending_shot: Option<PendingShot>,
}

impl Default for PlayerAttack {
    fn default() -> Self {
        Self::new(PlayerAttackConfig::default())
    }
}

impl PlayerAttack {
    pub fn new(config: PlayerAttackConfig) -> Self {
        Self {
            config,
            melee_cooldown: 0.0,
            shoot_cooldown: 0.0,
            pending_shot: None,
        }
    }

    pub fn can_melee(&self) -> bool {
        timer_expired(self.melee_cooldown)
    }

    pub fn can_shoot(&self) -> bool {
        timer_expired(self.shoot_cooldown) && self.pending_shot.is_none()
    }

    /// Начать удар (false — ещё кулдаун)
    pub fn start_melee(&mut self) -> bool {
        if !self.can_melee() {
            return false;
        }
        self.melee_cooldown = self.config.melee_cooldown;
        true
    }

    /// Начать выстрел в точку `aim` (false — ещё кулдаун)
    pub fn start_shot(&mut self, aim: Vec2) -> bool {
        if !self.can_shoot() {
            return false;
        }
        self.shoot_cooldown = self.config.shoot_cooldown;
        self.pending_shot = Some(PendingShot {
            timer: self.config.shoot_delay,
            aim,
        });
        true
    }

    pub fn tick(&mut self, delta: f32) {
        self.melee_cooldown = (self.melee_cooldown - delta).max(0.0);
        self.shoot_cooldown = (self.shoot_cooldown - delta).max(0.0);
        if let Some(shot) = self.pending_shot.as_mut() {
            shot.timer = (shot.timer - delta).max(0.0);
        }
    }

    /// Забрать выстрел, задержка которого истекла
    pub fn take_due_shot(&mut self) -> Option<PendingShot> {
        match self.pending_shot {
            Some(shot) if timer_expired(shot.timer) => self.pending_shot.take(),
            _ => None,
        }
    }
}

/// Событие: input-слой просит ближний удар
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct MeleeRequested {
    pub attacker: Entity,
    /// Направление удара (ноль → +X)
    pub direction: Vec2,
}

/// Событие: input-слой просит выстрел
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ShootRequested {
    pub shooter: Entity,
    /// Точка прицела в мире (курсор)
    pub aim: Vec2,
}

/// Система: кулдауны и задержка выстрела
pub fn tick_player_attacks(mut attackers: Query<&mut PlayerAttack>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();
    for mut attack in attackers.iter_mut() {
        attack.tick(delta);
    }
}

/// Система: ближний удар по всем врагам в круге
pub fn resolve_melee_requests(
    mut requests: EventReader<MeleeRequested>,
    mut players: Query<(&Position, &Health, &mut PlayerAttack), With<Player>>,
    mut targets: Query<(Entity, &Actor, &Position, &Collider, &mut Health), Without<Player>>,
    mut damage_dealt_events: EventWriter<DamageDealt>,
    mut entity_died_events: EventWriter<EntityDied>,
) {
    for request in requests.read() {
        let Ok((position, health, mut attack)) = players.get_mut(request.attacker) else {
            crate::log_warning(&format!("MeleeRequested: attacker {:?} is not a player", request.attacker));
            continue;
        };
        if !health.is_alive() || !attack.start_melee() {
            continue;
        }

        let config = attack.config;
        let direction = request.direction.try_normalize().unwrap_or(Vec2::X);
        let center = position.0 + direction * config.melee_reach;

        let hits = overlap_circle(
            center,
            config.melee_range,
            targets
                .iter()
                .filter(|(_, actor, _, _, health)| actor.faction == Faction::Hostile && health.is_alive())
                .map(|(entity, _, position, collider, _)| (entity, position.0, collider)),
        );

        crate::log(&format!(
            "🗡️ {:?} melee at {:?} → {} hit(s)",
            request.attacker,
            center,
            hits.len()
        ));

        for target in hits {
            if let Ok((_, _, _, _, mut target_health)) = targets.get_mut(target) {
                apply_damage(
                    &mut target_health,
                    target,
                    Some(request.attacker),
                    config.melee_damage,
                    DamageSource::Melee,
                    &mut damage_dealt_events,
                    &mut entity_died_events,
                );
            }
        }
    }
}

/// Система: старт выстрела (пуля вылетит после `shoot_delay`)
pub fn resolve_shoot_requests(
    mut requests: EventReader<ShootRequested>,
    mut players: Query<(&Health, &mut PlayerAttack), With<Player>>,
) {
    for request in requests.read() {
        let Ok((health, mut attack)) = players.get_mut(request.shooter) else {
            crate::log_warning(&format!("ShootRequested: shooter {:?} is not a player", request.shooter));
            continue;
        };
        if !health.is_alive() {
            continue;
        }
        if !attack.start_shot(request.aim) {
            crate::log(&format!("{:?} shot ignored (cooldown)", request.shooter));
        }
    }
}

/// Система: пуля вылетает → ProjectileFired по врагам
pub fn fire_due_shots(
    mut players: Query<(Entity, &Position, &Health, &mut PlayerAttack), With<Player>>,
    mut fired_events: EventWriter<ProjectileFired>,
) {
    for (entity, position, health, mut attack) in players.iter_mut() {
        let Some(shot) = attack.take_due_shot() else {
            continue;
        };
        // Умер, пока доставал пистолет
        if !health.is_alive() {
            continue;
        }

        let config = attack.config;
        let origin = position.0 + config.shoot_offset;
        let direction = (shot.aim - origin).try_normalize().unwrap_or(Vec2::X);

        fired_events.write(ProjectileFired {
            owner: entity,
            origin,
            direction,
            speed: config.bullet_speed,
            damage: config.shoot_damage,
            lifetime: config.bullet_lifetime,
            radius: config.bullet_radius,
            target_faction: Faction::Hostile,
        });
    }
}
