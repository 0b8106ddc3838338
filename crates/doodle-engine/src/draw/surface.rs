use glam::Vec2;
use image::{imageops, RgbaImage};

use crate::core::geometry::Viewport;
use crate::draw::brush::Brush;

/// Off-screen RGBA target covering the viewport. Row 0 is the top edge.
///
/// Pixels hold straight (non-premultiplied) alpha; stamps are composited
/// with source-over blending.
#[derive(Debug, Clone)]
pub struct DrawingSurface {
    viewport: Viewport,
    pixels: RgbaImage,
}

impl DrawingSurface {
    /// A fully transparent surface sized to the viewport.
    pub fn new(viewport: Viewport) -> Self {
        let (w, h) = viewport.pixel_size();
        Self {
            viewport,
            pixels: RgbaImage::new(w, h),
        }
    }

    /// Composite the brush centered on a screen-space point.
    pub fn stamp(&mut self, brush: &Brush, point: Vec2) {
        let top_left = (self.viewport.to_raster(point) - brush.size() / 2.0).round();
        imageops::overlay(
            &mut self.pixels,
            brush.stamp(),
            top_left.x as i64,
            top_left.y as i64,
        );
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Extract the rasterized contents, consuming the surface.
    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }
}
