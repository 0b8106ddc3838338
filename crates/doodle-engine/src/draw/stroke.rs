use glam::Vec2;

use crate::api::error::StrokeError;
use crate::api::types::TouchId;
use crate::core::geometry::{distance, Viewport};
use crate::draw::brush::Brush;
use crate::draw::surface::DrawingSurface;

/// Everything a finished stroke hands to body and sprite synthesis.
#[derive(Debug)]
pub struct CompletedStroke {
    /// Clamped screen-space samples, in drawing order. Never empty.
    pub points: Vec<Vec2>,
    pub surface: DrawingSurface,
}

/// Accumulates one pointer drag at a time into points and ink.
///
/// Only the touch that started a stroke may continue or finish it; a second
/// `begin` while a stroke is active is rejected without touching any state.
pub struct StrokeCapture {
    viewport: Viewport,
    brush: Brush,
    active: Option<TouchId>,
    points: Vec<Vec2>,
    surface: Option<DrawingSurface>,
}

impl StrokeCapture {
    pub fn new(viewport: Viewport, brush: Brush) -> Self {
        Self {
            viewport,
            brush,
            active: None,
            points: Vec::new(),
            surface: None,
        }
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_touch(&self) -> Option<TouchId> {
        self.active
    }

    /// Points captured so far for the active stroke.
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// The live surface, for feedback rendering while drawing.
    pub fn surface(&self) -> Option<&DrawingSurface> {
        self.surface.as_ref()
    }

    /// Clamp so the brush never stamps partially off the surface.
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        self.viewport.clamp_inset(point, self.brush.radius())
    }

    /// Start a stroke at `point`.
    pub fn begin(&mut self, touch: TouchId, point: Vec2) -> Result<(), StrokeError> {
        if self.active.is_some() {
            return Err(StrokeError::AlreadyActive);
        }

        self.active = Some(touch);
        let viewport = self.viewport;
        let surface = self
            .surface
            .get_or_insert_with(|| DrawingSurface::new(viewport));
        self.points.clear();

        let point = self.viewport.clamp_inset(point, self.brush.radius());
        surface.stamp(&self.brush, point);
        self.points.push(point);
        Ok(())
    }

    /// Extend the active stroke from `prev` to `point`, stamping the brush
    /// about once per pixel of travel.
    pub fn continue_to(&mut self, touch: TouchId, prev: Vec2, point: Vec2) -> Result<(), StrokeError> {
        self.check_owner(touch)?;
        let start = self.clamp(prev);
        let end = self.clamp(point);

        let surface = self.surface.as_mut().ok_or(StrokeError::NoActiveStroke)?;
        let dist = distance(start, end);
        let stamps = dist.round() as usize;
        let delta = end - start;
        for i in 0..stamps {
            let t = i as f32 / dist;
            surface.stamp(&self.brush, start + delta * t);
        }

        self.points.push(end);
        Ok(())
    }

    /// End the active stroke, handing over its points and surface.
    pub fn finish(&mut self, touch: TouchId) -> Result<CompletedStroke, StrokeError> {
        self.check_owner(touch)?;
        self.active = None;

        let points = std::mem::take(&mut self.points);
        let surface = self.surface.take();
        match surface {
            Some(surface) if !points.is_empty() => Ok(CompletedStroke { points, surface }),
            _ => Err(StrokeError::EmptyStroke),
        }
    }

    /// Drop any stroke in progress, discarding its ink.
    pub fn cancel(&mut self) {
        self.active = None;
        self.points.clear();
        self.surface = None;
    }

    fn check_owner(&self, touch: TouchId) -> Result<(), StrokeError> {
        match self.active {
            None => Err(StrokeError::NoActiveStroke),
            Some(expected) if expected != touch => Err(StrokeError::TouchMismatch {
                expected,
                got: touch,
            }),
            Some(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const T1: TouchId = TouchId(1);
    const T2: TouchId = TouchId(2);

    fn capture() -> StrokeCapture {
        StrokeCapture::new(
            Viewport::new(Vec2::ZERO, Vec2::new(200.0, 100.0)),
            Brush::round(8, Rgba([0, 0, 0, 255])),
        )
    }

    fn alpha_at(capture: &StrokeCapture, screen: Vec2) -> u8 {
        let surface = capture.surface().unwrap();
        let raster = surface.viewport().to_raster(screen);
        surface.pixels().get_pixel(raster.x as u32, raster.y as u32)[3]
    }

    #[test]
    fn begin_records_clamped_point_and_creates_surface() {
        let mut c = capture();
        assert!(c.surface().is_none());
        c.begin(T1, Vec2::new(-20.0, 500.0)).unwrap();
        assert!(c.is_active());
        assert_eq!(c.points(), &[Vec2::new(4.0, 96.0)]);
        assert!(c.surface().is_some());
    }

    #[test]
    fn second_begin_is_rejected_without_side_effects() {
        let mut c = capture();
        c.begin(T1, Vec2::new(50.0, 50.0)).unwrap();
        c.continue_to(T1, Vec2::new(50.0, 50.0), Vec2::new(70.0, 50.0)).unwrap();

        assert_eq!(c.begin(T2, Vec2::new(10.0, 10.0)), Err(StrokeError::AlreadyActive));
        assert_eq!(c.active_touch(), Some(T1));
        assert_eq!(c.points().len(), 2);
        assert_eq!(alpha_at(&c, Vec2::new(10.0, 10.0)), 0);
    }

    #[test]
    fn continue_requires_the_owning_touch() {
        let mut c = capture();
        assert_eq!(
            c.continue_to(T1, Vec2::ZERO, Vec2::ONE),
            Err(StrokeError::NoActiveStroke)
        );
        c.begin(T1, Vec2::new(50.0, 50.0)).unwrap();
        assert_eq!(
            c.continue_to(T2, Vec2::ZERO, Vec2::ONE),
            Err(StrokeError::TouchMismatch {
                expected: T1,
                got: T2
            })
        );
        assert_eq!(c.points().len(), 1);
    }

    #[test]
    fn continue_inks_the_whole_segment() {
        let mut c = capture();
        c.begin(T1, Vec2::new(20.0, 50.0)).unwrap();
        c.continue_to(T1, Vec2::new(20.0, 50.0), Vec2::new(120.0, 50.0)).unwrap();

        for x in (20..120).step_by(5) {
            assert_eq!(alpha_at(&c, Vec2::new(x as f32, 50.0)), 255, "gap at x={}", x);
        }
        assert_eq!(alpha_at(&c, Vec2::new(160.0, 50.0)), 0);
        assert_eq!(c.points(), &[Vec2::new(20.0, 50.0), Vec2::new(120.0, 50.0)]);
    }

    #[test]
    fn continue_clamps_both_endpoints() {
        let mut c = capture();
        c.begin(T1, Vec2::new(100.0, 50.0)).unwrap();
        c.continue_to(T1, Vec2::new(100.0, 50.0), Vec2::new(400.0, -30.0)).unwrap();
        assert_eq!(c.points()[1], Vec2::new(196.0, 4.0));
    }

    #[test]
    fn finish_hands_over_points_and_resets() {
        let mut c = capture();
        c.begin(T1, Vec2::new(30.0, 30.0)).unwrap();
        c.continue_to(T1, Vec2::new(30.0, 30.0), Vec2::new(60.0, 30.0)).unwrap();

        assert!(matches!(c.finish(T2), Err(StrokeError::TouchMismatch { .. })));
        let stroke = c.finish(T1).unwrap();
        assert_eq!(stroke.points.len(), 2);
        assert!(stroke.surface.pixels().pixels().any(|p| p[3] > 0));

        assert!(!c.is_active());
        assert!(c.points().is_empty());
        assert!(c.surface().is_none());
        assert!(matches!(c.finish(T1), Err(StrokeError::NoActiveStroke)));
    }

    #[test]
    fn each_stroke_gets_a_fresh_surface() {
        let mut c = capture();
        c.begin(T1, Vec2::new(30.0, 30.0)).unwrap();
        c.finish(T1).unwrap();
        c.begin(T2, Vec2::new(150.0, 70.0)).unwrap();
        assert_eq!(alpha_at(&c, Vec2::new(30.0, 30.0)), 0);
        assert_eq!(alpha_at(&c, Vec2::new(150.0, 70.0)), 255);
    }
}
