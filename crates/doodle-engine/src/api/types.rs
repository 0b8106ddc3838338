use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Unique identifier for an entity in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub u32);

/// Identity of a touch or pointer, as reported by the input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TouchId(pub i32);

/// Identifies the scene that hosts a level. Reported with the level outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SceneId(pub u32);

/// Opaque handle scripts receive as the level's self-reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LevelId(pub u32);

/// Semantic role of a body for scripted collision handling (goal, hazard, ...).
/// Zero means untagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollisionTag(pub i32);

impl CollisionTag {
    pub const NONE: CollisionTag = CollisionTag(0);

    pub fn is_tagged(self) -> bool {
        self.0 != 0
    }
}

/// Handle into the texture registry.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct TextureId(pub u32);
