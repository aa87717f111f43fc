//! Конфигурация симуляции (RON)
//!
//! Все поля опциональны: отсутствующее поле берётся из значения по умолчанию,
//! так что пустой файл `()` даёт стандартную арену.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::ai::FlyerConfig;
use crate::combat::KillZoneConfig;
use crate::components::Bounds2;
use crate::player::PlayerConfig;
use crate::spawner::{FlyerProfiles, SpawnerConfig};

use bevy::math::Vec2;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid {field}: {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Префикс пути поля: `dash.speed` → `profiles.swift.dash.speed`
    pub(crate) fn within(self, scope: &str) -> Self {
        match self {
            Self::Invalid { field, reason } => Self::Invalid {
                field: format!("{}.{}", scope, field),
                reason,
            },
            other => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub seed: u64,
    pub tick_hz: f64,
    pub player: PlayerConfig,
    pub kill_zones: Vec<KillZoneConfig>,
    pub spawner: Option<SpawnerConfig>,
    /// Дополнительные/переопределённые профили (поверх встроенных)
    pub profiles: BTreeMap<String, FlyerConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_hz: 60.0,
            player: PlayerConfig::default(),
            kill_zones: vec![KillZoneConfig {
                area: Bounds2::from_corners(Vec2::new(-30.0, -12.0), Vec2::new(30.0, -10.0)),
                damage: crate::combat::KILL_ZONE_DAMAGE,
            }],
            spawner: Some(SpawnerConfig::default()),
            profiles: BTreeMap::new(),
        }
    }
}

impl SimulationConfig {
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_hz.is_finite() && self.tick_hz > 0.0) {
            return Err(ConfigError::invalid(
                "tick_hz",
                format!("must be positive, got {}", self.tick_hz),
            ));
        }
        self.player.validate().map_err(|err| err.within("player"))?;

        let profiles = self.flyer_profiles();
        for (name, profile) in &profiles.0 {
            profile
                .validate()
                .map_err(|err| err.within(&format!("profiles.{}", name)))?;
        }

        if let Some(spawner) = &self.spawner {
            spawner.validate().map_err(|err| err.within("spawner"))?;
            if let Some(wave) = spawner.waves.iter().find(|wave| profiles.get(&wave.profile).is_none()) {
                return Err(ConfigError::invalid(
                    "spawner.waves",
                    format!("unknown profile '{}'", wave.profile),
                ));
            }
        }

        Ok(())
    }

    /// Встроенные профили + профили из файла (файл побеждает)
    pub fn flyer_profiles(&self) -> FlyerProfiles {
        let mut profiles = FlyerProfiles::default();
        for (name, profile) in &self.profiles {
            profiles.0.insert(name.clone(), profile.clone());
        }
        profiles
    }
}
