use glam::Vec2;
use image::{ImageError, ImageFormat, Rgba, RgbaImage};

/// A fixed stamp image plus the radius derived from it.
#[derive(Debug, Clone)]
pub struct Brush {
    stamp: RgbaImage,
    radius: f32,
}

impl Brush {
    /// Wrap an existing stamp. The radius is half the larger dimension.
    pub fn from_image(stamp: RgbaImage) -> Self {
        let (w, h) = stamp.dimensions();
        let radius = w.max(h) as f32 / 2.0;
        Self { stamp, radius }
    }

    /// Decode a PNG stamp.
    pub fn from_png(bytes: &[u8]) -> Result<Self, ImageError> {
        let image = image::load_from_memory_with_format(bytes, ImageFormat::Png)?;
        Ok(Self::from_image(image.into_rgba8()))
    }

    /// A solid round stamp with an anti-aliased rim.
    pub fn round(diameter: u32, color: Rgba<u8>) -> Self {
        let diameter = diameter.max(1);
        let r = diameter as f32 / 2.0;
        let stamp = RgbaImage::from_fn(diameter, diameter, |x, y| {
            let d = Vec2::new(x as f32 + 0.5 - r, y as f32 + 0.5 - r).length();
            let coverage = (r - d + 0.5).clamp(0.0, 1.0);
            let alpha = (color[3] as f32 * coverage).round() as u8;
            Rgba([color[0], color[1], color[2], alpha])
        });
        Self::from_image(stamp)
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Stamp size in pixels.
    pub fn size(&self) -> Vec2 {
        let (w, h) = self.stamp.dimensions();
        Vec2::new(w as f32, h as f32)
    }

    /// Visual height of the stamp; the thickness of box fixtures.
    pub fn height(&self) -> f32 {
        self.stamp.height() as f32
    }

    pub fn stamp(&self) -> &RgbaImage {
        &self.stamp
    }
}
