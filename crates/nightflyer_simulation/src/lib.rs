//! Nightflyer Simulation Core
//!
//! Headless ECS-симуляция на Bevy 0.16: боевой AI летающих врагов
//! (patrol → chase → windup → dash/ranged → recoil → cooldown), атаки
//! игрока, урон, снаряды, спавнер волн.
//!
//! Рендер, анимации, ввод и звук — снаружи: симуляция отдаёт события
//! (`FlyerStateChanged`, `DamageDealt`, `EntityDied`, ...), а caller сам
//! крутит `App::update` (один update = один fixed tick). Ввод приходит
//! событиями `MeleeRequested` / `ShootRequested`.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod logger;
pub mod physics;
pub mod player;
pub mod spawner;

// Re-export базовых компонентов для удобства
pub use ai::{
    flyer_bundle, AIPlugin, Flyer, FlyerConfig, FlyerMemory, FlyerState, FlyerStateChanged, FlyerStateKind,
    TargetRegistry,
};
pub use combat::{
    CombatPlugin, DamageDealt, DamageSource, Dead, EntityDied, KillZone, KillZoneConfig, Projectile, ProjectileFired,
};
pub use components::*;
pub use config::{ConfigError, SimulationConfig};
pub use logger::{init_logger, log, log_error, log_info, log_warning, LogLevel};
pub use physics::{overlap_circle, Contact, ContactPhase, ImpulseApplied, PhysicsPlugin};
pub use player::{MeleeRequested, PlayerAttack, PlayerAttackConfig, PlayerConfig, PlayerPlugin, ShootRequested};
pub use spawner::{FlyerProfiles, SpawnerConfig, SpawnerPlugin, WaveSpawner};

/// Частота fixed tick по умолчанию
pub const DEFAULT_TICK_HZ: f64 = 60.0;

/// Допуск для таймеров на накопленную ошибку f32
///
/// 15 тиков по 1/60 в f32 не дают ровно 0.25: без допуска windup 0.25s
/// закончился бы на 16-м тике.
pub const TIMER_EPSILON: f32 = 1e-4;

/// Таймер (оставшееся время) истёк
pub fn timer_expired(remaining: f32) -> bool {
    remaining <= TIMER_EPSILON
}

/// Фазы одного тика (FixedUpdate, строго по порядку)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Обновление TargetRegistry
    Perception,
    /// Атаки игрока (запросы от input-слоя)
    Actions,
    /// FSM врагов (velocity intent, выстрелы)
    Think,
    /// Интеграция позиций, клампы, facing
    Motion,
    /// TTL и спавн снарядов
    Projectiles,
    /// Overlap-детекция → Contact события
    Contacts,
    /// Реакции на контакты: урон, knockback, смена patrol-точки
    Resolve,
    /// Импульсы, Dead маркеры, деспавн
    Cleanup,
    /// Спавнер волн
    Spawn,
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Time<Fixed> и DeterministicRng ставит caller (`create_headless_app`),
/// plugin их не перезаписывает.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::Perception,
                SimulationSet::Actions,
                SimulationSet::Think,
                SimulationSet::Motion,
                SimulationSet::Projectiles,
                SimulationSet::Contacts,
                SimulationSet::Resolve,
                SimulationSet::Cleanup,
                SimulationSet::Spawn,
            )
                .chain(),
        )
        .add_plugins((PhysicsPlugin, AIPlugin, CombatPlugin, PlayerPlugin, SpawnerPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции (60Hz)
///
/// Время двигается вручную: каждый `app.update()` — ровно один fixed tick.
pub fn create_headless_app(seed: u64) -> App {
    create_headless_app_with_rate(seed, DEFAULT_TICK_HZ)
}

pub fn create_headless_app_with_rate(seed: u64, tick_hz: f64) -> App {
    let mut app = App::new();
    init_logger();

    let fixed = Time::<Fixed>::from_hz(tick_hz);
    let timestep = fixed.timestep();

    app.add_plugins(MinimalPlugins)
        .insert_resource(fixed)
        .insert_resource(TimeUpdateStrategy::ManualDuration(timestep))
        .insert_resource(DeterministicRng::new(seed))
        .add_plugins(SimulationPlugin);

    // Первый update только запускает часы (delta = 0, FixedUpdate не бежит)
    app.update();

    app
}

/// App по конфигу: игрок, kill zones, спавнер и профили уже в мире
pub fn create_app_from_config(config: &SimulationConfig) -> App {
    let mut app = create_headless_app_with_rate(config.seed, config.tick_hz);
    let world = app.world_mut();

    world.insert_resource(config.flyer_profiles());
    world.spawn(config.player.bundle());
    for zone in &config.kill_zones {
        world.spawn(zone.bundle());
    }
    if let Some(spawner) = &config.spawner {
        world.spawn(WaveSpawner::new(spawner.clone()));
    }

    log_info(&format!(
        "Arena ready: seed {}, {} Hz, {} kill zone(s), spawner {}",
        config.seed,
        config.tick_hz,
        config.kill_zones.len(),
        if config.spawner.is_some() { "on" } else { "off" }
    ));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    // Собираем все компоненты в детерминированный формат
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
