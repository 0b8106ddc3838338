pub mod api;
pub mod core;
pub mod components;
pub mod assets;
pub mod draw;
pub mod synth;
pub mod script;
pub mod level;
pub mod systems;
pub mod renderer;
pub mod input;

// Re-export key types at crate root for convenience
pub use api::config::{ColliderMaterial, LevelConfig};
pub use api::error::{ConfigError, LevelError, ScriptError, StrokeError};
pub use api::types::{CollisionTag, EntityId, LevelId, SceneId, TextureId, TouchId};
pub use assets::textures::TextureRegistry;
pub use components::entity::Entity;
pub use components::sprite::InkSprite;
pub use core::geometry::{Rect, Viewport};
pub use core::physics::{BodyDesc, BodyType, Contact, FixtureDesc, FixtureShape, PhysicsBody, PhysicsWorld};
pub use core::scene::Scene;
pub use draw::brush::Brush;
pub use draw::stroke::{CompletedStroke, StrokeCapture};
pub use draw::surface::DrawingSurface;
pub use input::queue::{InputEvent, InputQueue};
pub use level::{GameStateManager, LevelCommand, LevelLayer, LevelState, MAX_STARS};
pub use renderer::instance::{RenderBuffer, RenderInstance};
pub use script::{ScriptBridge, ScriptHost, ScriptValue};
pub use systems::debug::{collider_outlines, DebugLine};
pub use systems::render::build_render_buffer;

pub use image::{Rgba, RgbaImage};
