use crate::components::entity::Entity;
use crate::renderer::instance::{RenderBuffer, RenderInstance};

/// Rebuild the render buffer from the visible sprite entities, in scene order.
pub fn build_render_buffer<'a>(entities: impl Iterator<Item = &'a Entity>, buffer: &mut RenderBuffer) {
    buffer.clear();

    for entity in entities {
        if !entity.visible {
            continue;
        }

        let sprite = match &entity.sprite {
            Some(s) => s,
            None => continue,
        };

        buffer.push(RenderInstance {
            x: entity.pos.x,
            y: entity.pos.y,
            rotation: entity.rotation,
            anchor_x: sprite.anchor.x,
            anchor_y: sprite.anchor.y,
            width: sprite.size.x,
            height: sprite.size.y,
            texture: sprite.texture.0 as f32,
        });
    }
}
