//! Shape generation for 2D primitives
//!
//! Everything is emitted as triangle lists in screen pixels (y down), the
//! same coordinates the game simulates in.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Segments used for circles unless asked otherwise
pub const CIRCLE_SEGMENTS: u32 = 36;

/// Accumulates colored triangles for one frame
#[derive(Debug, Default, Clone)]
pub struct ShapeBatch {
    vertices: Vec<Vertex>,
}

impl ShapeBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
        self.vertices.push(Vertex::new(a.x, a.y, color));
        self.vertices.push(Vertex::new(b.x, b.y, color));
        self.vertices.push(Vertex::new(c.x, c.y, color));
    }

    /// Filled rectangle from its top-left corner
    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: [f32; 4]) {
        let tl = Vec2::new(x, y);
        let tr = Vec2::new(x + width, y);
        let bl = Vec2::new(x, y + height);
        let br = Vec2::new(x + width, y + height);

        self.triangle(tl, bl, tr, color);
        self.triangle(tr, bl, br, color);
    }

    /// Filled circle as a triangle fan
    pub fn circle(&mut self, center: Vec2, radius: f32, color: [f32; 4]) {
        self.circle_segments(center, radius, color, CIRCLE_SEGMENTS);
    }

    pub fn circle_segments(&mut self, center: Vec2, radius: f32, color: [f32; 4], segments: u32) {
        let segments = segments.max(3);
        self.vertices.reserve((segments * 3) as usize);

        for i in 0..segments {
            let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
            let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

            // Triangle from center to edge
            self.triangle(
                center,
                center + radius * Vec2::new(theta1.cos(), theta1.sin()),
                center + radius * Vec2::new(theta2.cos(), theta2.sin()),
                color,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_is_two_triangles() {
        let mut batch = ShapeBatch::new();
        batch.rect(10.0, 20.0, 30.0, 40.0, [1.0; 4]);
        assert_eq!(batch.vertices().len(), 6);

        let xs: Vec<f32> = batch.vertices().iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = batch.vertices().iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 40.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 20.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 60.0);
    }

    #[test]
    fn test_circle_stays_within_radius() {
        let mut batch = ShapeBatch::new();
        let center = Vec2::new(100.0, 100.0);
        batch.circle(center, 10.0, [1.0; 4]);
        assert_eq!(batch.vertices().len(), (CIRCLE_SEGMENTS * 3) as usize);
        for v in batch.vertices() {
            let d = Vec2::from(v.position).distance(center);
            assert!(d <= 10.0 + 1e-4);
        }
    }

    #[test]
    fn test_batch_accumulates_shapes() {
        let mut batch = ShapeBatch::new();
        assert!(batch.is_empty());
        batch.rect(0.0, 0.0, 100.0, 50.0, [1.0; 4]);
        batch.rect(10.0, 10.0, 5.0, 5.0, [1.0; 4]);
        assert_eq!(batch.vertices().len(), 12);
    }
}
