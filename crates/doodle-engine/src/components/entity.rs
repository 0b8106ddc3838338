use glam::Vec2;

use crate::api::types::EntityId;
use crate::components::sprite::InkSprite;
use crate::core::physics::PhysicsBody;

/// Fat Entity: a single struct with optional components.
/// A drawn shape is one entity carrying both a sprite and the body driving it.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// Label for finding entities by role ("stroke", "goal", ...).
    pub label: String,
    /// Whether this entity is drawn.
    pub visible: bool,
    /// Position in screen space.
    pub pos: Vec2,
    /// Rotation in radians (counter-clockwise).
    pub rotation: f32,
    pub sprite: Option<InkSprite>,
    pub body: Option<PhysicsBody>,
}

impl Entity {
    /// Create a new entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            label: String::new(),
            visible: true,
            pos: Vec2::ZERO,
            rotation: 0.0,
            sprite: None,
            body: None,
        }
    }

    // -- Builder pattern --

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_sprite(mut self, sprite: InkSprite) -> Self {
        self.sprite = Some(sprite);
        self
    }

    pub fn with_body(mut self, body: PhysicsBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}
