//! Small geometry helpers shared by stroke capture and sprite synthesis.
//!
//! Screen space is y-up with the viewport origin at its bottom-left corner.
//! Raster space (the drawing surface) is y-down with row 0 at the top of the
//! viewport.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Euclidean distance between two points.
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

/// The visible part of the screen, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Viewport {
    pub fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Y coordinate of the top edge in screen space.
    pub fn top(&self) -> f32 {
        self.origin.y + self.size.y
    }

    /// Clamp `p` into `[origin + inset, origin + size - inset]` on each axis.
    ///
    /// When the inset is larger than half the viewport the upper bound wins,
    /// so the result is still stable under repeated clamping.
    pub fn clamp_inset(&self, p: Vec2, inset: f32) -> Vec2 {
        let min = self.origin + Vec2::splat(inset);
        let max = self.origin + self.size - Vec2::splat(inset);
        p.max(min).min(max)
    }

    /// Convert a screen point to drawing-surface coordinates.
    pub fn to_raster(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x - self.origin.x, self.top() - p.y)
    }

    /// Surface dimensions in whole pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            self.size.x.round().max(1.0) as u32,
            self.size.y.round().max(1.0) as u32,
        )
    }
}

/// Axis-aligned bounding box accumulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn empty() -> Self {
        Self {
            min: Vec2::splat(f32::INFINITY),
            max: Vec2::splat(f32::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn include_point(&mut self, p: Vec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn include_circle(&mut self, center: Vec2, radius: f32) {
        self.include_point(center - Vec2::splat(radius));
        self.include_point(center + Vec2::splat(radius));
    }

    /// Scale both corners, e.g. to convert world units to screen pixels.
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            min: self.min * factor,
            max: self.max * factor,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

/// A rectangle given by its origin corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// Smallest rect on the integer pixel grid that covers this one.
    pub fn snapped(&self) -> Self {
        let x0 = self.x.floor();
        let y0 = self.y.floor();
        let x1 = (self.x + self.width).ceil();
        let y1 = (self.y + self.height).ceil();
        Self::new(x0, y0, (x1 - x0).max(1.0), (y1 - y0).max(1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(Vec2::new(10.0, 20.0), Vec2::new(300.0, 200.0))
    }

    #[test]
    fn distance_is_euclidean() {
        assert!((distance(Vec2::ZERO, Vec2::new(3.0, 4.0)) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn clamp_keeps_point_inside_inset_bounds() {
        let vp = viewport();
        let samples = [
            Vec2::new(-100.0, -100.0),
            Vec2::new(1000.0, 1000.0),
            Vec2::new(15.0, 500.0),
            Vec2::new(150.0, 120.0),
        ];
        for radius in [0.0, 4.0, 16.0, 99.0] {
            for p in samples {
                let c = vp.clamp_inset(p, radius);
                assert!(c.x >= vp.origin.x + radius && c.x <= vp.origin.x + vp.size.x - radius);
                assert!(c.y >= vp.origin.y + radius && c.y <= vp.origin.y + vp.size.y - radius);
                assert_eq!(vp.clamp_inset(c, radius), c);
            }
        }
    }

    #[test]
    fn clamp_is_stable_when_inset_exceeds_half_size() {
        let vp = viewport();
        let once = vp.clamp_inset(Vec2::new(-5.0, 900.0), 150.0);
        assert_eq!(vp.clamp_inset(once, 150.0), once);
    }

    #[test]
    fn raster_space_is_flipped_vertically() {
        let vp = viewport();
        assert_eq!(vp.to_raster(Vec2::new(10.0, 220.0)), Vec2::new(0.0, 0.0));
        assert_eq!(vp.to_raster(Vec2::new(310.0, 20.0)), Vec2::new(300.0, 200.0));
    }

    #[test]
    fn aabb_accumulates_circles_and_points() {
        let mut bb = Aabb::empty();
        assert!(bb.is_empty());
        bb.include_circle(Vec2::new(1.0, 1.0), 0.5);
        bb.include_point(Vec2::new(4.0, -2.0));
        assert!(!bb.is_empty());
        assert_eq!(bb.min, Vec2::new(0.5, -2.0));
        assert_eq!(bb.max, Vec2::new(4.0, 1.5));
        assert_eq!(bb.scaled(2.0).size(), Vec2::new(7.0, 7.0));
    }

    #[test]
    fn snapped_rect_covers_original() {
        let r = Rect::new(1.5, -0.25, 3.0, 2.0).snapped();
        assert_eq!(r, Rect::new(1.0, -1.0, 4.0, 3.0));
    }
}
