//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: базовые характеристики (Actor, Faction, Player, Health)
//! - movement: позиция и скорость (Position, Velocity, LinearDamping, Facing)
//! - world: области и коллайдеры (Bounds2, Collider, Obstacle)
//!
//! AI-компоненты врагов живут в `crate::ai`, боевые — в `crate::combat`.

pub mod actor;
pub mod movement;
pub mod world;

// Re-exports для удобного импорта
pub use actor::*;
pub use movement::*;
pub use world::*;
