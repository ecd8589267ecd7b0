//! Collision detection and response for axis-aligned geometry
//!
//! Everything in the blocks game is either a circle (the ball) or an
//! axis-aligned rectangle (paddle, bricks, screen edges).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, origin at the top-left corner (y grows down)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if a point lies inside the rectangle (edges inclusive)
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Collision point on the rectangle surface (if hit)
    pub point: Vec2,
    /// Surface normal at collision (pointing toward ball center, for reflection)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check collision between a circle and a rectangle
///
/// Uses the closest point on the rectangle to the circle center. When the
/// center is already inside the rectangle (fast ball, thin brick), the
/// normal is taken along the axis of least overlap so the ball is pushed
/// out through the nearest face.
pub fn circle_rect_collision(center: Vec2, radius: f32, rect: &Rect) -> CollisionResult {
    let closest = center.clamp(rect.min(), rect.max());
    let delta = center - closest;
    let dist_sq = delta.length_squared();

    if dist_sq > 0.0 {
        if dist_sq >= radius * radius {
            return CollisionResult::miss();
        }
        let dist = dist_sq.sqrt();
        return CollisionResult {
            hit: true,
            point: closest,
            normal: delta / dist,
            penetration: radius - dist,
        };
    }

    // Center inside the rectangle
    let min = rect.min();
    let max = rect.max();
    let left = center.x - min.x;
    let right = max.x - center.x;
    let top = center.y - min.y;
    let bottom = max.y - center.y;

    let smallest = left.min(right).min(top).min(bottom);
    let (normal, point) = if smallest == left {
        (Vec2::NEG_X, Vec2::new(min.x, center.y))
    } else if smallest == right {
        (Vec2::X, Vec2::new(max.x, center.y))
    } else if smallest == top {
        (Vec2::NEG_Y, Vec2::new(center.x, min.y))
    } else {
        (Vec2::Y, Vec2::new(center.x, max.y))
    };

    CollisionResult {
        hit: true,
        point,
        normal,
        penetration: smallest + radius,
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Snap a contact normal to the dominant axis
///
/// Corner hits on bricks produce diagonal normals; reflecting on the
/// dominant axis keeps the ball speed components unchanged in magnitude.
pub fn axis_normal(normal: Vec2) -> Vec2 {
    if normal.x.abs() > normal.y.abs() {
        Vec2::new(normal.x.signum(), 0.0)
    } else {
        Vec2::new(0.0, normal.y.signum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_circle_rect_miss() {
        let rect = Rect::new(100.0, 100.0, 40.0, 20.0);
        let result = circle_rect_collision(Vec2::new(50.0, 50.0), 10.0, &rect);
        assert!(!result.hit);
    }

    #[test]
    fn test_circle_rect_hit_from_below() {
        let rect = Rect::new(100.0, 100.0, 40.0, 20.0);
        // Ball just under the bottom edge (y = 120), overlapping by 4px
        let result = circle_rect_collision(Vec2::new(120.0, 126.0), 10.0, &rect);
        assert!(result.hit);
        assert!((result.normal - Vec2::Y).length() < 0.001);
        assert!((result.penetration - 4.0).abs() < 0.001);
        assert!((result.point - Vec2::new(120.0, 120.0)).length() < 0.001);
    }

    #[test]
    fn test_circle_rect_touching_is_not_a_hit() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let result = circle_rect_collision(Vec2::new(20.0, 5.0), 10.0, &rect);
        assert!(!result.hit);
    }

    #[test]
    fn test_circle_rect_center_inside_uses_nearest_face() {
        let rect = Rect::new(0.0, 0.0, 100.0, 20.0);
        // 2px below the top face, far from the sides
        let result = circle_rect_collision(Vec2::new(50.0, 2.0), 5.0, &rect);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::NEG_Y);
        assert!((result.penetration - 7.0).abs() < 0.001);
    }

    #[test]
    fn test_reflect_velocity() {
        // Ball moving up, hits the underside of a brick (normal pointing down)
        let reflected = reflect_velocity(Vec2::new(3.0, -5.0), Vec2::Y);
        assert!((reflected - Vec2::new(3.0, 5.0)).length() < 0.001);
    }

    #[test]
    fn test_axis_normal() {
        assert_eq!(axis_normal(Vec2::new(0.8, 0.6)), Vec2::X);
        assert_eq!(axis_normal(Vec2::new(-0.3, 0.9)), Vec2::Y);
        assert_eq!(axis_normal(Vec2::new(0.1, -0.9)), Vec2::NEG_Y);
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(10.0, 10.0, 5.0, 5.0);
        assert!(rect.contains(Vec2::new(12.0, 12.0)));
        assert!(rect.contains(Vec2::new(15.0, 15.0)));
        assert!(!rect.contains(Vec2::new(16.0, 12.0)));
        assert_eq!(rect.center(), Vec2::new(12.5, 12.5));
    }

    proptest! {
        #[test]
        fn pushing_out_by_penetration_separates(
            cx in -50.0f32..150.0,
            cy in -50.0f32..150.0,
            radius in 1.0f32..20.0,
        ) {
            let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
            let center = Vec2::new(cx, cy);
            let result = circle_rect_collision(center, radius, &rect);
            if result.hit {
                prop_assert!(result.penetration > 0.0);
                prop_assert!((result.normal.length() - 1.0).abs() < 1e-3);
                let moved = center + result.normal * (result.penetration + 0.01);
                prop_assert!(!circle_rect_collision(moved, radius, &rect).hit);
            }
        }
    }
}
