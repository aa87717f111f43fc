//! World компоненты: прямоугольные области, коллайдеры, препятствия

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Axis-aligned прямоугольник (patrol area, spawn area, kill zone)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct Bounds2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds2 {
    /// Строит прямоугольник по двум любым углам (порядок не важен)
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    pub fn clamp(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }

    /// Равномерная случайная точка (вырожденный прямоугольник → его угол)
    pub fn random_point(&self, rng: &mut impl Rng) -> Vec2 {
        let size = self.max - self.min;
        Vec2::new(
            self.min.x + rng.gen::<f32>() * size.x,
            self.min.y + rng.gen::<f32>() * size.y,
        )
    }
}

/// Форма коллайдера
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum ColliderShape {
    Circle { radius: f32 },
    /// Прямоугольник с центром в Position
    Rect { half_extents: Vec2 },
}

/// Коллайдер для overlap-детекции контактов
///
/// `is_trigger == true` — проходимый (pass-through), не блокирует снаряды.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Collider {
    pub shape: ColliderShape,
    pub is_trigger: bool,
}

impl Default for Collider {
    fn default() -> Self {
        Self::solid_circle(0.5)
    }
}

impl Collider {
    pub fn solid_circle(radius: f32) -> Self {
        Self {
            shape: ColliderShape::Circle { radius },
            is_trigger: false,
        }
    }

    pub fn trigger_circle(radius: f32) -> Self {
        Self {
            shape: ColliderShape::Circle { radius },
            is_trigger: true,
        }
    }

    pub fn solid_rect(half_extents: Vec2) -> Self {
        Self {
            shape: ColliderShape::Rect { half_extents },
            is_trigger: false,
        }
    }

    pub fn trigger_rect(half_extents: Vec2) -> Self {
        Self {
            shape: ColliderShape::Rect { half_extents },
            is_trigger: true,
        }
    }

    pub fn is_solid(&self) -> bool {
        !self.is_trigger
    }

    /// Пересекаются ли два коллайдера (касание считается контактом)
    pub fn overlaps(&self, position: Vec2, other: &Collider, other_position: Vec2) -> bool {
        match (self.shape, other.shape) {
            (ColliderShape::Circle { radius: a }, ColliderShape::Circle { radius: b }) => {
                position.distance_squared(other_position) <= (a + b) * (a + b)
            }
            (ColliderShape::Circle { radius }, ColliderShape::Rect { half_extents }) => {
                circle_rect_overlap(position, radius, other_position, half_extents)
            }
            (ColliderShape::Rect { half_extents }, ColliderShape::Circle { radius }) => {
                circle_rect_overlap(other_position, radius, position, half_extents)
            }
            (ColliderShape::Rect { half_extents: a }, ColliderShape::Rect { half_extents: b }) => {
                let delta = (position - other_position).abs();
                delta.x <= a.x + b.x && delta.y <= a.y + b.y
            }
        }
    }
}

fn circle_rect_overlap(center: Vec2, radius: f32, rect_center: Vec2, half_extents: Vec2) -> bool {
    let closest = center.clamp(rect_center - half_extents, rect_center + half_extents);
    center.distance_squared(closest) <= radius * radius
}

/// Маркер: твёрдое препятствие (стена, платформа)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(crate::components::Position, Collider)]
pub struct Obstacle;

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_bounds_from_corners_any_order() {
        let bounds = Bounds2::from_corners(Vec2::new(5.0, -1.0), Vec2::new(-3.0, 4.0));
        assert_eq!(bounds.min, Vec2::new(-3.0, -1.0));
        assert_eq!(bounds.max, Vec2::new(5.0, 4.0));
        assert_eq!(bounds.center(), Vec2::new(1.0, 1.5));
    }

    #[test]
    fn test_bounds_clamp() {
        let bounds = Bounds2::from_corners(Vec2::new(-10.0, 2.0), Vec2::new(10.0, 5.0));
        assert_eq!(bounds.clamp(Vec2::new(15.0, 0.0)), Vec2::new(10.0, 2.0));
        assert_eq!(bounds.clamp(Vec2::new(1.0, 3.0)), Vec2::new(1.0, 3.0));
    }

    #[test]
    fn test_random_point_inside() {
        let bounds = Bounds2::from_corners(Vec2::new(-10.0, 2.0), Vec2::new(10.0, 5.0));
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..100 {
            assert!(bounds.contains(bounds.random_point(&mut rng)));
        }
    }

    #[test]
    fn test_degenerate_bounds_random_point() {
        let corner = Vec2::new(3.0, 3.0);
        let bounds = Bounds2::from_corners(corner, corner);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(bounds.random_point(&mut rng), corner);
    }

    #[test]
    fn test_circle_overlaps() {
        let a = Collider::solid_circle(0.5);
        let b = Collider::trigger_circle(0.5);
        assert!(a.overlaps(Vec2::ZERO, &b, Vec2::new(0.9, 0.0)));
        assert!(!a.overlaps(Vec2::ZERO, &b, Vec2::new(1.1, 0.0)));
    }

    #[test]
    fn test_circle_rect_overlaps() {
        let wall = Collider::solid_rect(Vec2::new(1.0, 5.0));
        let ball = Collider::trigger_circle(0.25);
        assert!(wall.overlaps(Vec2::ZERO, &ball, Vec2::new(1.2, 3.0)));
        assert!(ball.overlaps(Vec2::new(1.2, 3.0), &wall, Vec2::ZERO));
        assert!(!wall.overlaps(Vec2::ZERO, &ball, Vec2::new(1.3, 0.0)));
    }

    #[test]
    fn test_rect_rect_overlaps() {
        let a = Collider::trigger_rect(Vec2::splat(1.0));
        let b = Collider::solid_rect(Vec2::splat(0.5));
        assert!(a.overlaps(Vec2::ZERO, &b, Vec2::new(1.4, 1.4)));
        assert!(!a.overlaps(Vec2::ZERO, &b, Vec2::new(1.6, 0.0)));
    }
}
