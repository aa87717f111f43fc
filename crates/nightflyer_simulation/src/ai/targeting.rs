//! Target discovery: кэш единственного игрока
//!
//! Враги не ищут игрока сами — берут Entity из TargetRegistry и проверяют
//! его Health при каждом тике (weak reference).

use bevy::prelude::*;

use crate::components::Player;

#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct TargetRegistry {
    player: Option<Entity>,
}

impl TargetRegistry {
    pub fn player(&self) -> Option<Entity> {
        self.player
    }
}

/// Система: обновление TargetRegistry (первый по Entity игрок)
pub fn refresh_target_registry(players: Query<Entity, With<Player>>, mut registry: ResMut<TargetRegistry>) {
    let player = players.iter().min();

    if registry.player != player {
        crate::log(&format!("🎯 TargetRegistry: player {:?} → {:?}", registry.player, player));
        registry.player = player;
    }
}
