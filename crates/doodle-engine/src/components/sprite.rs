use glam::Vec2;

use crate::api::types::TextureId;
use crate::core::geometry::Rect;

/// A sprite textured with ink cropped from the drawing surface.
///
/// `anchor` is normalized sprite-local and measured from the bottom-left
/// corner (y-up): it names the texel that sits on the body's origin.
#[derive(Debug, Clone, PartialEq)]
pub struct InkSprite {
    pub texture: TextureId,
    /// Rendered size in screen pixels.
    pub size: Vec2,
    pub anchor: Vec2,
}

impl InkSprite {
    pub fn new(texture: TextureId, size: Vec2, anchor: Vec2) -> Self {
        Self {
            texture,
            size,
            anchor,
        }
    }

    /// Unrotated screen-space bounds when the anchor sits at `pos`.
    pub fn bounds(&self, pos: Vec2) -> Rect {
        let origin = pos - self.anchor * self.size;
        Rect::new(origin.x, origin.y, self.size.x, self.size.y)
    }
}
