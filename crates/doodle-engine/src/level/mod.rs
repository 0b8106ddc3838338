//! The playable level: drawn strokes become physics bodies with ink sprites,
//! contacts between tagged bodies are forwarded to the level script.

mod state;

pub use state::{LevelState, MAX_STARS};

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use crate::api::config::LevelConfig;
use crate::api::error::LevelError;
use crate::api::types::{CollisionTag, EntityId, LevelId, SceneId, TouchId};
use crate::assets::textures::TextureRegistry;
use crate::components::entity::Entity;
use crate::core::physics::{BodyDesc, PhysicsBody, PhysicsWorld};
use crate::core::scene::Scene;
use crate::draw::brush::Brush;
use crate::draw::stroke::StrokeCapture;
use crate::draw::surface::DrawingSurface;
use crate::input::queue::{InputEvent, InputQueue};
use crate::script::{ScriptBridge, ScriptHost};
use crate::synth::body::synthesize_body;
use crate::synth::sprite::synthesize_sprite;
#[cfg(debug_assertions)]
use crate::systems::debug::{collider_outlines, DebugLine};

/// Label of entities created from strokes.
pub const STROKE_LABEL: &str = "stroke";
/// Label of bodies placed by the level loader.
pub const LEVEL_BODY_LABEL: &str = "level";

/// Receives the outcome of a level.
pub trait GameStateManager {
    fn game_over(&mut self, scene: SceneId, success: bool);
}

/// Requests a script can queue while the level is busy calling into it.
/// The embedder applies them with [`LevelLayer::apply`] once the call returns.
#[derive(Debug, Clone, PartialEq)]
pub enum LevelCommand {
    SetGoalReached,
    CollectStar(usize),
    Complete,
    ClearDrawnBodies,
    SpawnBody { desc: BodyDesc, tag: CollisionTag },
}

pub struct LevelLayer {
    config: LevelConfig,
    state: LevelState,
    scene: Scene,
    world: PhysicsWorld,
    capture: StrokeCapture,
    textures: TextureRegistry,
    game_manager: Box<dyn GameStateManager>,
    completed: bool,
    #[cfg(debug_assertions)]
    debug: bool,
}

impl LevelLayer {
    /// Build the world, hook contacts up to the script and run `LoadLevel`.
    pub fn new(
        number: u32,
        config: LevelConfig,
        brush: Brush,
        script: Box<dyn ScriptHost>,
        game_manager: Box<dyn GameStateManager>,
    ) -> Result<Self, LevelError> {
        config.validate()?;
        let mut world = PhysicsWorld::new(&config);
        let script = Rc::new(RefCell::new(ScriptBridge::new(script)));

        let begin = Rc::clone(&script);
        world.on_contact_begin(move |contact| {
            begin.borrow_mut().begin_contact(contact);
        });
        let end = Rc::clone(&script);
        world.on_contact_end(move |contact| {
            end.borrow_mut().end_contact(contact);
        });

        script.borrow_mut().load_level(LevelId(number), number)?;
        log::info!("level {} loaded", number);

        Ok(Self {
            capture: StrokeCapture::new(config.viewport, brush),
            config,
            state: LevelState::new(number),
            scene: Scene::new(SceneId(number)),
            world,
            textures: TextureRegistry::new(),
            game_manager,
            completed: false,
            #[cfg(debug_assertions)]
            debug: false,
        })
    }

    // -- Input --

    /// Start drawing. Returns false if a stroke is already in progress or the
    /// level is over.
    pub fn pointer_down(&mut self, id: TouchId, p: Vec2) -> bool {
        if self.completed {
            return false;
        }
        match self.capture.begin(id, p) {
            Ok(()) => true,
            Err(err) => {
                log::debug!("pointer {:?} down ignored: {}", id, err);
                false
            }
        }
    }

    /// Extend the stroke owned by `id`. Other touches are ignored.
    pub fn pointer_moved(&mut self, id: TouchId, p: Vec2, prev: Vec2) {
        if self.completed {
            return;
        }
        if let Err(err) = self.capture.continue_to(id, prev, p) {
            log::trace!("pointer {:?} move ignored: {}", id, err);
        }
    }

    /// Finish the stroke owned by `id`, turning it into a body and a sprite.
    /// Returns the new entity, or `None` if `id` was not drawing.
    pub fn pointer_up(&mut self, id: TouchId) -> Result<Option<EntityId>, LevelError> {
        if self.completed || self.capture.active_touch() != Some(id) {
            return Ok(None);
        }

        let stroke = self.capture.finish(id)?;
        let body = synthesize_body(
            &mut self.world,
            &stroke.points,
            self.capture.brush(),
            &self.config,
        )?;
        let sprite = synthesize_sprite(
            &self.world,
            &body,
            stroke.surface,
            self.capture.brush().radius(),
            self.config.ptm_ratio,
            &mut self.textures,
        );

        let entity_id = self.scene.next_id();
        let (pos, rotation) = self.world.body_position(&body);
        let entity = Entity::new(entity_id)
            .with_label(STROKE_LABEL)
            .with_pos(pos * self.config.ptm_ratio)
            .with_rotation(rotation)
            .with_sprite(sprite)
            .with_body(body)
            .with_visible(!self.debug_enabled());
        self.scene.spawn(entity);
        Ok(Some(entity_id))
    }

    /// Dispatch every queued event. Returns the entities created by finished
    /// strokes.
    pub fn handle_input(&mut self, input: &mut InputQueue) -> Result<Vec<EntityId>, LevelError> {
        let mut created = Vec::new();
        for event in input.drain() {
            match event {
                InputEvent::PointerDown { id, x, y } => {
                    self.pointer_down(id, Vec2::new(x, y));
                }
                InputEvent::PointerMove {
                    id,
                    x,
                    y,
                    prev_x,
                    prev_y,
                } => self.pointer_moved(id, Vec2::new(x, y), Vec2::new(prev_x, prev_y)),
                InputEvent::PointerUp { id } => created.extend(self.pointer_up(id)?),
                #[cfg(debug_assertions)]
                InputEvent::ToggleDebug => {
                    self.toggle_debug();
                }
            }
        }
        Ok(created)
    }

    // -- Frame --

    /// Step the world once and move every entity onto its body.
    pub fn update(&mut self, dt: f32) {
        if self.completed {
            return;
        }
        self.world.step(dt);

        let ptm = self.config.ptm_ratio;
        for entity in self.scene.iter_mut() {
            if let Some(body) = &entity.body {
                let (pos, rotation) = self.world.body_position(body);
                entity.pos = pos * ptm;
                entity.rotation = rotation;
            }
        }
    }

    /// End the level successfully. Stepping and input stop; the game-state
    /// manager hears about it once. Returns false if already complete.
    pub fn level_complete(&mut self) -> bool {
        if self.completed {
            return false;
        }
        self.completed = true;
        self.capture.cancel();
        log::info!(
            "level {} complete, {} stars",
            self.state.number(),
            self.state.stars_collected()
        );
        self.game_manager.game_over(self.scene.id(), true);
        true
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    // -- Level state --

    pub fn set_goal_reached(&mut self) {
        self.state.set_goal_reached();
    }

    pub fn goal_reached(&self) -> bool {
        self.state.goal_reached()
    }

    pub fn collect_star(&mut self, index: usize) -> bool {
        self.state.collect_star(index)
    }

    pub fn stars_collected(&self) -> usize {
        self.state.stars_collected()
    }

    pub fn level_number(&self) -> u32 {
        self.state.number()
    }

    pub fn state(&self) -> &LevelState {
        &self.state
    }

    /// Remove every drawn shape along with its body and texture.
    pub fn clear_drawn_bodies(&mut self) -> usize {
        let removed = self.scene.despawn_labelled(STROKE_LABEL);
        for entity in &removed {
            if let Some(body) = &entity.body {
                self.world.remove_body(body);
            }
            if let Some(sprite) = &entity.sprite {
                self.textures.remove(sprite.texture);
            }
        }
        removed.len()
    }

    /// Place a tagged body described in world units, tracked by a sprite-less
    /// entity.
    pub fn spawn_tagged_body(&mut self, desc: &BodyDesc, tag: CollisionTag) -> (EntityId, PhysicsBody) {
        let body = self.world.create_body(desc, self.config.material);
        self.world.set_tag(&body, tag);

        let entity_id = self.scene.next_id();
        let (pos, rotation) = self.world.body_position(&body);
        self.scene.spawn(
            Entity::new(entity_id)
                .with_label(LEVEL_BODY_LABEL)
                .with_pos(pos * self.config.ptm_ratio)
                .with_rotation(rotation)
                .with_body(body),
        );
        (entity_id, body)
    }

    /// Apply a request queued by the script.
    pub fn apply(&mut self, command: LevelCommand) {
        match command {
            LevelCommand::SetGoalReached => self.set_goal_reached(),
            LevelCommand::CollectStar(index) => {
                if !self.collect_star(index) {
                    log::debug!("star {} not collected", index);
                }
            }
            LevelCommand::Complete => {
                self.level_complete();
            }
            LevelCommand::ClearDrawnBodies => {
                self.clear_drawn_bodies();
            }
            LevelCommand::SpawnBody { desc, tag } => {
                self.spawn_tagged_body(&desc, tag);
            }
        }
    }

    // -- Debug --

    /// Flip between sprites and collider wireframes. Returns the new state.
    #[cfg(debug_assertions)]
    pub fn toggle_debug(&mut self) -> bool {
        self.debug = !self.debug;
        for entity in self.scene.iter_mut() {
            if entity.sprite.is_some() {
                entity.visible = !self.debug;
            }
        }
        log::info!("debug draw {}", if self.debug { "on" } else { "off" });
        self.debug
    }

    /// Collider outlines in screen units; empty unless debug draw is on.
    #[cfg(debug_assertions)]
    pub fn debug_lines(&self) -> Vec<DebugLine> {
        if !self.debug {
            return Vec::new();
        }
        collider_outlines(&self.world, self.config.ptm_ratio)
    }

    fn debug_enabled(&self) -> bool {
        #[cfg(debug_assertions)]
        {
            self.debug
        }
        #[cfg(not(debug_assertions))]
        {
            false
        }
    }

    // -- Accessors --

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn textures(&self) -> &TextureRegistry {
        &self.textures
    }

    pub fn is_drawing(&self) -> bool {
        self.capture.is_active()
    }

    /// Ink of the stroke in progress, for live feedback.
    pub fn drawing_surface(&self) -> Option<&DrawingSurface> {
        self.capture.surface()
    }
}
