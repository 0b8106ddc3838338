use glam::Vec2;
use image::{imageops, RgbaImage};

use crate::assets::textures::TextureRegistry;
use crate::components::sprite::InkSprite;
use crate::core::geometry::{Aabb, Rect, Viewport};
use crate::core::physics::{FixtureShape, PhysicsBody, PhysicsWorld};
use crate::draw::surface::DrawingSurface;

/// Axis-aligned bounds of every fixture on `body`, in screen pixels.
pub fn body_bounds(world: &PhysicsWorld, body: &PhysicsBody, ptm_ratio: f32) -> Aabb {
    let mut bounds = Aabb::empty();
    for shape in world.fixtures(body) {
        match shape {
            FixtureShape::Circle { center, radius } => bounds.include_circle(center, radius),
            FixtureShape::Polygon { vertices } => {
                for v in vertices {
                    bounds.include_point(v);
                }
            }
            FixtureShape::Edge { a, b } => {
                bounds.include_point(a);
                bounds.include_point(b);
            }
        }
    }
    bounds.scaled(ptm_ratio)
}

/// Surface-space crop rect for a body's screen bounds.
///
/// The origin moves out by the brush radius and the size grows by the same
/// amount, covering stamp overhang above and left of the fixtures.
pub fn sprite_rect(bounds: &Aabb, viewport: &Viewport, brush_radius: f32) -> Rect {
    let size = bounds.size();
    Rect::new(
        bounds.min.x - viewport.origin.x - brush_radius,
        viewport.top() - bounds.max.y - brush_radius,
        size.x + brush_radius,
        size.y + brush_radius,
    )
}

/// Copy `rect` out of `image`. Pixels outside the image come out transparent.
pub fn crop_surface(image: &RgbaImage, rect: &Rect) -> RgbaImage {
    let mut out = RgbaImage::new(rect.width.max(1.0) as u32, rect.height.max(1.0) as u32);
    imageops::replace(&mut out, image, -(rect.x as i64), -(rect.y as i64));
    out
}

/// Normalized anchor (bottom-left origin) that puts `body_screen` on the
/// texel it was drawn under.
pub fn anchor_for(body_screen: Vec2, rect: &Rect, viewport: &Viewport) -> Vec2 {
    let x = body_screen.x - viewport.origin.x - rect.x;
    let y = body_screen.y - viewport.origin.y + rect.y + rect.height - viewport.size.y;
    Vec2::new(x / rect.width, y / rect.height)
}

/// Extract the stroke's ink into a texture and build the sprite that tracks
/// `body`. The surface is consumed.
pub fn synthesize_sprite(
    world: &PhysicsWorld,
    body: &PhysicsBody,
    surface: DrawingSurface,
    brush_radius: f32,
    ptm_ratio: f32,
    textures: &mut TextureRegistry,
) -> InkSprite {
    let viewport = *surface.viewport();
    let image = surface.into_image();

    let bounds = body_bounds(world, body, ptm_ratio);
    let rect = sprite_rect(&bounds, &viewport, brush_radius).snapped();
    let texture = textures.insert(crop_surface(&image, &rect));

    let (body_pos, _) = world.body_position(body);
    let anchor = anchor_for(body_pos * ptm_ratio, &rect, &viewport);
    InkSprite::new(texture, Vec2::new(rect.width, rect.height), anchor)
}
