//! Wave spawner
//!
//! Сначала волны по порядку (каждая — `count` врагов одного профиля), потом
//! бесконечный режим. Живых врагов от спавнера — не больше `max_alive`.
//! Попытка спавна — после `initial_delay`, затем каждые `spawn_interval`.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ai::{flyer_bundle, FlyerConfig};
use crate::components::{Bounds2, Health};
use crate::config::ConfigError;
use crate::{DeterministicRng, SimulationSet};

/// Профили врагов по имени (на них ссылаются волны)
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct FlyerProfiles(pub BTreeMap<String, FlyerConfig>);

impl Default for FlyerProfiles {
    fn default() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert("aggressive".to_string(), FlyerConfig::aggressive());
        profiles.insert("gated".to_string(), FlyerConfig::gated());
        profiles.insert("bat".to_string(), FlyerConfig::bat());
        Self(profiles)
    }
}

impl FlyerProfiles {
    pub fn get(&self, name: &str) -> Option<&FlyerConfig> {
        self.0.get(name)
    }
}

/// Что спавнить после того, как все волны отыграны
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InfiniteMode {
    /// По кругу через профили волн: 1 → 2 → 1 → 2...
    #[default]
    Alternate,
    /// Равновероятно среди профилей волн (детерминированный RNG)
    Random,
    /// Только профиль первой волны
    Repeat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wave {
    pub profile: String,
    pub count: u32,
}

impl Wave {
    pub fn new(profile: impl Into<String>, count: u32) -> Self {
        Self {
            profile: profile.into(),
            count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    pub spawn_area: Bounds2,
    pub max_alive: usize,
    pub spawn_interval: f32,
    pub initial_delay: f32,
    pub waves: Vec<Wave>,
    pub infinite_mode: InfiniteMode,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            spawn_area: Bounds2::from_corners(Vec2::new(6.0, 2.5), Vec2::new(9.0, 4.5)),
            max_alive: 3,
            spawn_interval: 1.25,
            initial_delay: 0.5,
            waves: vec![Wave::new("aggressive", 10), Wave::new("bat", 10)],
            infinite_mode: InfiniteMode::Alternate,
        }
    }
}

impl SpawnerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.spawn_interval.is_finite() && self.spawn_interval >= 0.0) {
            return Err(ConfigError::invalid(
                "spawn_interval",
                format!("must be non-negative, got {}", self.spawn_interval),
            ));
        }
        if !(self.initial_delay.is_finite() && self.initial_delay >= 0.0) {
            return Err(ConfigError::invalid(
                "initial_delay",
                format!("must be non-negative, got {}", self.initial_delay),
            ));
        }
        Ok(())
    }
}

/// Спавнер врагов (config + прогресс по волнам)
#[derive(Component, Debug, Clone)]
pub struct WaveSpawner {
    pub config: SpawnerConfig,
    /// До следующей попытки спавна (сек)
    timer: f32,
    wave: usize,
    spawned_in_wave: u32,
    alternate_next: usize,
    alive: Vec<Entity>,
}

impl WaveSpawner {
    pub fn new(config: SpawnerConfig) -> Self {
        Self {
            timer: config.initial_delay,
            config,
            wave: 0,
            spawned_in_wave: 0,
            alternate_next: 0,
            alive: Vec::new(),
        }
    }

    pub fn alive(&self) -> &[Entity] {
        &self.alive
    }

    /// Все волны отыграны
    pub fn is_infinite(&self) -> bool {
        self.wave >= self.config.waves.len()
    }

    /// Наступила ли попытка спавна на этом тике
    pub fn tick(&mut self, delta: f32) -> bool {
        self.timer -= delta;
        if !crate::timer_expired(self.timer) {
            return false;
        }
        self.timer = self.timer.max(0.0) + self.config.spawn_interval;
        true
    }

    /// Убрать мёртвых и исчезнувших из счётчика живых
    pub fn prune(&mut self, is_alive: impl Fn(Entity) -> bool) {
        self.alive.retain(|&entity| is_alive(entity));
    }

    pub fn has_room(&self) -> bool {
        self.alive.len() < self.config.max_alive
    }

    /// Следующий профиль по расписанию волн (None — волн нет вообще)
    pub fn next_profile(&mut self, rng: &mut impl Rng) -> Option<String> {
        // Исчерпанная волна сразу уступает следующей в той же попытке.
        // В исходной игре смена фазы съедала попытку целиком, и между
        // волнами был лишний spawn_interval; здесь этой паузы нет.
        while let Some(wave) = self.config.waves.get(self.wave) {
            if self.spawned_in_wave < wave.count {
                self.spawned_in_wave += 1;
                return Some(wave.profile.clone());
            }
            self.wave += 1;
            self.spawned_in_wave = 0;
        }

        let waves = &self.config.waves;
        if waves.is_empty() {
            return None;
        }

        let index = match self.config.infinite_mode {
            InfiniteMode::Alternate => {
                let index = self.alternate_next % waves.len();
                self.alternate_next = (index + 1) % waves.len();
                index
            }
            InfiniteMode::Random => rng.gen_range(0..waves.len()),
            InfiniteMode::Repeat => 0,
        };
        Some(waves[index].profile.clone())
    }
}

/// Система: попытки спавна по таймеру
pub fn run_wave_spawner(
    mut commands: Commands,
    mut spawners: Query<(Entity, &mut WaveSpawner)>,
    healths: Query<&Health>,
    profiles: Res<FlyerProfiles>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (spawner_entity, mut spawner) in spawners.iter_mut() {
        if !spawner.tick(delta) {
            continue;
        }

        spawner.prune(|entity| healths.get(entity).map(|health| health.is_alive()).unwrap_or(false));
        if !spawner.has_room() {
            continue;
        }

        let Some(name) = spawner.next_profile(&mut rng.rng) else {
            continue;
        };

        let Some(config) = profiles.get(&name) else {
            crate::log_warning(&format!("Spawner {:?}: unknown flyer profile '{}', skipping", spawner_entity, name));
            continue;
        };

        let position = spawner.config.spawn_area.random_point(&mut rng.rng);
        let flyer = commands.spawn(flyer_bundle(config.clone(), position)).id();
        spawner.alive.push(flyer);

        crate::log_info(&format!(
            "🦇 Spawner {:?}: spawned '{}' {:?} at {:?} ({} alive)",
            spawner_entity,
            name,
            flyer,
            position,
            spawner.alive.len()
        ));
    }
}

/// Spawner Plugin
///
/// FlyerProfiles по умолчанию — три встроенных профиля (конфиг может заменить).
pub struct SpawnerPlugin;

impl Plugin for SpawnerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FlyerProfiles>()
            .add_systems(FixedUpdate, run_wave_spawner.in_set(SimulationSet::Spawn));
    }
}
