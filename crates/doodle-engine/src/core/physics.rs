use glam::Vec2;
use rapier2d::prelude::*;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Mutex;

use crate::api::config::{ColliderMaterial, LevelConfig};
use crate::api::types::CollisionTag;

// ---------------------------------------------------------------------------
// Conversion helpers (private): glam to nalgebra and back
// ---------------------------------------------------------------------------

fn vec2_to_na(v: Vec2) -> nalgebra::Vector2<f32> {
    nalgebra::Vector2::new(v.x, v.y)
}

fn na_to_vec2(v: &nalgebra::Vector2<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

fn point_to_vec2(p: &nalgebra::Point2<f32>) -> Vec2 {
    Vec2::new(p.x, p.y)
}

fn na_iso_to_pos_rot(iso: &nalgebra::Isometry2<f32>) -> (Vec2, f32) {
    let pos = Vec2::new(iso.translation.x, iso.translation.y);
    let rot = iso.rotation.angle();
    (pos, rot)
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// The kind of rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    Dynamic,
    Fixed,
}

impl BodyType {
    fn to_rapier(self) -> RigidBodyType {
        match self {
            BodyType::Dynamic => RigidBodyType::Dynamic,
            BodyType::Fixed => RigidBodyType::Fixed,
        }
    }
}

/// One rigid shape attached to a body, in body-local world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FixtureDesc {
    Circle {
        center: Vec2,
        radius: f32,
    },
    /// Oriented box. Takes half-extents, not full dimensions.
    Box {
        center: Vec2,
        half_width: f32,
        half_height: f32,
        angle: f32,
    },
    Edge {
        a: Vec2,
        b: Vec2,
    },
}

impl FixtureDesc {
    fn build_collider(&self) -> ColliderBuilder {
        match *self {
            FixtureDesc::Circle { center, radius } => {
                ColliderBuilder::ball(radius).translation(vec2_to_na(center))
            }
            FixtureDesc::Box {
                center,
                half_width,
                half_height,
                angle,
            } => ColliderBuilder::cuboid(half_width, half_height)
                .position(nalgebra::Isometry2::new(vec2_to_na(center), angle)),
            FixtureDesc::Edge { a, b } => ColliderBuilder::segment(
                nalgebra::Point2::new(a.x, a.y),
                nalgebra::Point2::new(b.x, b.y),
            ),
        }
    }
}

/// A fixture after the body transform has been applied (world units).
#[derive(Debug, Clone, PartialEq)]
pub enum FixtureShape {
    Circle { center: Vec2, radius: f32 },
    Polygon { vertices: Vec<Vec2> },
    Edge { a: Vec2, b: Vec2 },
}

/// Builder for describing a rigid body before creation.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub position: Vec2,
    pub rotation: f32,
    pub velocity: Vec2,
    pub fixtures: Vec<FixtureDesc>,
    pub can_sleep: bool,
    pub ccd: bool,
    pub sensor: bool,
    pub tag: CollisionTag,
}

impl BodyDesc {
    /// A dynamic body with no fixtures yet.
    pub fn dynamic() -> Self {
        Self {
            body_type: BodyType::Dynamic,
            position: Vec2::ZERO,
            rotation: 0.0,
            velocity: Vec2::ZERO,
            fixtures: Vec::new(),
            can_sleep: true,
            ccd: false,
            sensor: false,
            tag: CollisionTag::NONE,
        }
    }

    /// A fixed (static) body with no fixtures yet.
    pub fn fixed() -> Self {
        Self {
            body_type: BodyType::Fixed,
            ..Self::dynamic()
        }
    }

    pub fn with_position(mut self, pos: Vec2) -> Self {
        self.position = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.velocity = vel;
        self
    }

    pub fn with_fixture(mut self, fixture: FixtureDesc) -> Self {
        self.fixtures.push(fixture);
        self
    }

    pub fn with_fixtures(mut self, fixtures: impl IntoIterator<Item = FixtureDesc>) -> Self {
        self.fixtures.extend(fixtures);
        self
    }

    pub fn with_sleeping(mut self, can_sleep: bool) -> Self {
        self.can_sleep = can_sleep;
        self
    }

    pub fn with_ccd(mut self, enabled: bool) -> Self {
        self.ccd = enabled;
        self
    }

    /// Sensor fixtures report contacts but never push bodies (goal zones).
    pub fn with_sensor(mut self, sensor: bool) -> Self {
        self.sensor = sensor;
        self
    }

    pub fn with_tag(mut self, tag: CollisionTag) -> Self {
        self.tag = tag;
        self
    }
}

/// Handle to a body in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhysicsBody {
    pub body_handle: RigidBodyHandle,
}

/// A contact between two bodies, with their collision tags resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub body_a: PhysicsBody,
    pub body_b: PhysicsBody,
    pub tag_a: CollisionTag,
    pub tag_b: CollisionTag,
}

/// Callback invoked for contact begin/end notifications.
pub type ContactCallback = Box<dyn FnMut(&Contact)>;

#[derive(Debug, Clone, Copy)]
struct BodyMeta {
    tag: CollisionTag,
}

// ---------------------------------------------------------------------------
// WASM-safe event collector (no crossbeam)
// ---------------------------------------------------------------------------

struct DirectEventCollector {
    collisions: Mutex<Vec<CollisionEvent>>,
}

impl DirectEventCollector {
    fn new() -> Self {
        Self {
            collisions: Mutex::new(Vec::new()),
        }
    }

    fn drain_collisions(&self) -> Vec<CollisionEvent> {
        match self.collisions.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl EventHandler for DirectEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        if let Ok(mut events) = self.collisions.lock() {
            events.push(event);
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: f32,
    ) {
    }
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Owns the simulation, the static ground and the contact callbacks.
/// All lengths are in world units (meters); y points up.
pub struct PhysicsWorld {
    gravity: nalgebra::Vector2<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    pub(crate) bodies: RigidBodySet,
    pub(crate) colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    event_collector: DirectEventCollector,
    body_meta: HashMap<RigidBodyHandle, BodyMeta>,
    /// Collider → owning body. Outlives body removal by one step so that
    /// contacts ended by the removal can still be resolved.
    collider_owner: HashMap<ColliderHandle, RigidBodyHandle>,
    retired: Vec<RigidBodyHandle>,
    ground: PhysicsBody,
    on_begin: Option<ContactCallback>,
    on_end: Option<ContactCallback>,
}

impl PhysicsWorld {
    /// Create the world described by `config`, including a static ground edge
    /// along the bottom of the visible area.
    pub fn new(config: &LevelConfig) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.num_solver_iterations =
            NonZeroUsize::new(config.velocity_iterations).unwrap_or(NonZeroUsize::MIN);
        integration_parameters.num_internal_stabilization_iterations = config.position_iterations;

        let mut world = Self {
            gravity: vec2_to_na(config.gravity),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            event_collector: DirectEventCollector::new(),
            body_meta: HashMap::new(),
            collider_owner: HashMap::new(),
            retired: Vec::new(),
            ground: PhysicsBody {
                body_handle: RigidBodyHandle::invalid(),
            },
            on_begin: None,
            on_end: None,
        };

        let viewport = config.viewport;
        log::info!("origin: {:.0}x{:.0}", viewport.origin.x, viewport.origin.y);
        log::info!("size: {:.0}x{:.0}", viewport.size.x, viewport.size.y);

        let world_width = config.screen_to_world(viewport.size).x;
        let ground_desc = BodyDesc::fixed()
            .with_position(config.screen_to_world(viewport.origin))
            .with_fixture(FixtureDesc::Edge {
                a: Vec2::ZERO,
                b: Vec2::new(world_width, 0.0),
            });
        let ground_material = ColliderMaterial {
            density: 0.0,
            friction: 0.2,
            restitution: 0.0,
        };
        world.ground = world.create_body(&ground_desc, ground_material);
        world
    }

    /// Register the callback for contacts that begin during a step.
    pub fn on_contact_begin(&mut self, callback: impl FnMut(&Contact) + 'static) {
        self.on_begin = Some(Box::new(callback));
    }

    /// Register the callback for contacts that end during a step.
    pub fn on_contact_end(&mut self, callback: impl FnMut(&Contact) + 'static) {
        self.on_end = Some(Box::new(callback));
    }

    /// The static ground body.
    pub fn ground(&self) -> PhysicsBody {
        self.ground
    }

    /// Create a rigid body with all of its fixtures. Every fixture shares `material`.
    pub fn create_body(&mut self, desc: &BodyDesc, material: ColliderMaterial) -> PhysicsBody {
        let rb = RigidBodyBuilder::new(desc.body_type.to_rapier())
            .translation(vec2_to_na(desc.position))
            .rotation(desc.rotation)
            .linvel(vec2_to_na(desc.velocity))
            .can_sleep(desc.can_sleep)
            .ccd_enabled(desc.ccd)
            .build();

        let body_handle = self.bodies.insert(rb);

        for fixture in &desc.fixtures {
            let collider = fixture
                .build_collider()
                .density(material.density)
                .friction(material.friction)
                .restitution(material.restitution)
                .sensor(desc.sensor)
                .active_events(ActiveEvents::COLLISION_EVENTS)
                .build();
            let collider_handle =
                self.colliders
                    .insert_with_parent(collider, body_handle, &mut self.bodies);
            self.collider_owner.insert(collider_handle, body_handle);
        }

        self.body_meta.insert(body_handle, BodyMeta { tag: desc.tag });
        PhysicsBody { body_handle }
    }

    /// Remove a body and all its fixtures from the simulation.
    pub fn remove_body(&mut self, body: &PhysicsBody) {
        self.bodies.remove(
            body.body_handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        self.retired.push(body.body_handle);
    }

    /// Attach a collision tag to a body.
    pub fn set_tag(&mut self, body: &PhysicsBody, tag: CollisionTag) {
        if let Some(meta) = self.body_meta.get_mut(&body.body_handle) {
            meta.tag = tag;
        }
    }

    /// Collision tag of a body; untagged and unknown bodies report zero.
    pub fn tag(&self, body: &PhysicsBody) -> CollisionTag {
        self.body_meta
            .get(&body.body_handle)
            .map(|meta| meta.tag)
            .unwrap_or(CollisionTag::NONE)
    }

    /// Advance the simulation by `dt` seconds with the configured iteration
    /// counts, then dispatch contact begin/end callbacks.
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.event_collector,
        );

        let mut contacts = Vec::new();
        for event in self.event_collector.drain_collisions() {
            let (h1, h2, started) = match event {
                CollisionEvent::Started(h1, h2, _) => (h1, h2, true),
                CollisionEvent::Stopped(h1, h2, _) => (h1, h2, false),
            };
            if let Some(contact) = self.resolve_contact(h1, h2) {
                contacts.push((contact, started));
            }
        }

        for (contact, started) in &contacts {
            let callback = if *started {
                self.on_begin.as_mut()
            } else {
                self.on_end.as_mut()
            };
            if let Some(callback) = callback {
                callback(contact);
            }
        }

        self.purge_retired();
    }

    /// Get the current position and rotation of a body.
    pub fn body_position(&self, body: &PhysicsBody) -> (Vec2, f32) {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_iso_to_pos_rot(rb.position()))
            .unwrap_or((Vec2::ZERO, 0.0))
    }

    /// Number of rigid bodies in the simulation, ground included.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Whether the body is still part of the simulation.
    pub fn contains(&self, body: &PhysicsBody) -> bool {
        self.bodies.contains(body.body_handle)
    }

    /// All bodies currently in the simulation.
    pub fn bodies(&self) -> impl Iterator<Item = PhysicsBody> + '_ {
        self.bodies
            .iter()
            .map(|(body_handle, _)| PhysicsBody { body_handle })
    }

    /// The body's fixtures with its current transform applied.
    pub fn fixtures(&self, body: &PhysicsBody) -> Vec<FixtureShape> {
        let rb = match self.bodies.get(body.body_handle) {
            Some(rb) => rb,
            None => return Vec::new(),
        };

        let mut shapes = Vec::with_capacity(rb.colliders().len());
        for handle in rb.colliders() {
            let collider = match self.colliders.get(*handle) {
                Some(c) => c,
                None => continue,
            };
            let iso = collider.position();
            let shape = collider.shape();
            if let Some(ball) = shape.as_ball() {
                shapes.push(FixtureShape::Circle {
                    center: na_to_vec2(&iso.translation.vector),
                    radius: ball.radius,
                });
            } else if let Some(cuboid) = shape.as_cuboid() {
                let he = cuboid.half_extents;
                let corners = [
                    nalgebra::Point2::new(-he.x, -he.y),
                    nalgebra::Point2::new(he.x, -he.y),
                    nalgebra::Point2::new(he.x, he.y),
                    nalgebra::Point2::new(-he.x, he.y),
                ];
                let vertices = corners
                    .iter()
                    .map(|c| point_to_vec2(&iso.transform_point(c)))
                    .collect();
                shapes.push(FixtureShape::Polygon { vertices });
            } else if let Some(segment) = shape.as_segment() {
                shapes.push(FixtureShape::Edge {
                    a: point_to_vec2(&iso.transform_point(&segment.a)),
                    b: point_to_vec2(&iso.transform_point(&segment.b)),
                });
            }
        }
        shapes
    }

    // -- private helpers --

    fn resolve_contact(&self, h1: ColliderHandle, h2: ColliderHandle) -> Option<Contact> {
        let body_a = PhysicsBody {
            body_handle: *self.collider_owner.get(&h1)?,
        };
        let body_b = PhysicsBody {
            body_handle: *self.collider_owner.get(&h2)?,
        };
        Some(Contact {
            body_a,
            body_b,
            tag_a: self.tag(&body_a),
            tag_b: self.tag(&body_b),
        })
    }

    fn purge_retired(&mut self) {
        if self.retired.is_empty() {
            return;
        }
        for handle in std::mem::take(&mut self.retired) {
            self.body_meta.remove(&handle);
            self.collider_owner.retain(|_, owner| *owner != handle);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    const DT: f32 = 1.0 / 60.0;

    fn ball(radius: f32) -> FixtureDesc {
        FixtureDesc::Circle {
            center: Vec2::ZERO,
            radius,
        }
    }

    fn zero_g() -> LevelConfig {
        LevelConfig::default().with_gravity(Vec2::ZERO)
    }

    #[test]
    fn new_world_has_ground_edge() {
        let world = PhysicsWorld::new(&LevelConfig::default());
        assert_eq!(world.body_count(), 1);
        let shapes = world.fixtures(&world.ground());
        assert_eq!(shapes.len(), 1);
        match &shapes[0] {
            FixtureShape::Edge { a, b } => {
                assert!(a.abs_diff_eq(Vec2::ZERO, 1e-5));
                assert!(b.abs_diff_eq(Vec2::new(800.0 / 32.0, 0.0), 1e-5));
            }
            other => panic!("expected edge, got {:?}", other),
        }
        assert_eq!(world.tag(&world.ground()), CollisionTag::NONE);
    }

    #[test]
    fn ground_follows_viewport_origin() {
        let config = LevelConfig::default().with_viewport(crate::core::geometry::Viewport::new(
            Vec2::new(64.0, 32.0),
            Vec2::new(320.0, 240.0),
        ));
        let world = PhysicsWorld::new(&config);
        let (pos, _) = world.body_position(&world.ground());
        assert!(pos.abs_diff_eq(Vec2::new(2.0, 1.0), 1e-5));
    }

    #[test]
    fn create_compound_body_and_remove() {
        let mut world = PhysicsWorld::new(&LevelConfig::default());
        let desc = BodyDesc::dynamic()
            .with_position(Vec2::new(3.0, 4.0))
            .with_fixture(ball(0.5))
            .with_fixture(FixtureDesc::Circle {
                center: Vec2::new(2.0, 0.0),
                radius: 0.5,
            })
            .with_fixture(FixtureDesc::Box {
                center: Vec2::new(1.0, 0.0),
                half_width: 1.0,
                half_height: 0.25,
                angle: 0.0,
            });
        let body = world.create_body(&desc, ColliderMaterial::default());
        assert_eq!(world.body_count(), 2);

        let shapes = world.fixtures(&body);
        let circles = shapes
            .iter()
            .filter(|s| matches!(s, FixtureShape::Circle { .. }))
            .count();
        let polygons = shapes
            .iter()
            .filter(|s| matches!(s, FixtureShape::Polygon { .. }))
            .count();
        assert_eq!((circles, polygons), (2, 1));

        world.remove_body(&body);
        assert_eq!(world.body_count(), 1);
        assert!(!world.contains(&body));
        assert!(world.fixtures(&body).is_empty());
    }

    #[test]
    fn fixtures_are_reported_in_world_space() {
        let mut world = PhysicsWorld::new(&LevelConfig::default());
        let body = world.create_body(
            &BodyDesc::fixed()
                .with_position(Vec2::new(10.0, 5.0))
                .with_rotation(std::f32::consts::FRAC_PI_2)
                .with_fixture(FixtureDesc::Circle {
                    center: Vec2::new(1.0, 0.0),
                    radius: 0.5,
                }),
            ColliderMaterial::default(),
        );
        match &world.fixtures(&body)[0] {
            FixtureShape::Circle { center, radius } => {
                assert!(center.abs_diff_eq(Vec2::new(10.0, 6.0), 1e-4), "{:?}", center);
                assert!((radius - 0.5).abs() < 1e-6);
            }
            other => panic!("expected circle, got {:?}", other),
        }
    }

    #[test]
    fn dynamic_body_falls_and_lands_on_ground() {
        let mut world = PhysicsWorld::new(&LevelConfig::default());
        let body = world.create_body(
            &BodyDesc::dynamic()
                .with_position(Vec2::new(5.0, 5.0))
                .with_fixture(ball(0.5)),
            ColliderMaterial::default(),
        );

        for _ in 0..30 {
            world.step(DT);
        }
        let (mid, _) = world.body_position(&body);
        assert!(mid.y < 5.0, "body should fall: y={}", mid.y);

        for _ in 0..300 {
            world.step(DT);
        }
        let (rest, _) = world.body_position(&body);
        assert!(rest.y > 0.3 && rest.y < 0.7, "body should rest on ground: y={}", rest.y);
    }

    #[test]
    fn tags_round_trip_and_default_to_zero() {
        let mut world = PhysicsWorld::new(&LevelConfig::default());
        let body = world.create_body(
            &BodyDesc::dynamic().with_fixture(ball(0.5)),
            ColliderMaterial::default(),
        );
        assert_eq!(world.tag(&body), CollisionTag::NONE);
        world.set_tag(&body, CollisionTag(9));
        assert_eq!(world.tag(&body), CollisionTag(9));

        let tagged = world.create_body(
            &BodyDesc::fixed().with_fixture(ball(0.5)).with_tag(CollisionTag(4)),
            ColliderMaterial::default(),
        );
        assert_eq!(world.tag(&tagged), CollisionTag(4));
    }

    #[test]
    fn contact_callbacks_receive_tags_on_begin_and_end() {
        let mut world = PhysicsWorld::new(&zero_g());
        let began = Rc::new(RefCell::new(Vec::new()));
        let ended = Rc::new(RefCell::new(Vec::new()));
        {
            let began = Rc::clone(&began);
            world.on_contact_begin(move |c| began.borrow_mut().push((c.tag_a, c.tag_b)));
        }
        {
            let ended = Rc::clone(&ended);
            world.on_contact_end(move |c| ended.borrow_mut().push((c.tag_a, c.tag_b)));
        }

        // Goal sensor in the path of a ball sliding right.
        world.create_body(
            &BodyDesc::fixed()
                .with_position(Vec2::new(5.0, 3.0))
                .with_fixture(FixtureDesc::Box {
                    center: Vec2::ZERO,
                    half_width: 0.5,
                    half_height: 0.5,
                    angle: 0.0,
                })
                .with_sensor(true)
                .with_tag(CollisionTag(3)),
            ColliderMaterial::default(),
        );
        world.create_body(
            &BodyDesc::dynamic()
                .with_position(Vec2::new(0.0, 3.0))
                .with_velocity(Vec2::new(10.0, 0.0))
                .with_sleeping(false)
                .with_fixture(ball(0.5))
                .with_tag(CollisionTag(5)),
            ColliderMaterial::default(),
        );

        for _ in 0..120 {
            world.step(DT);
        }

        let began = began.borrow();
        let ended = ended.borrow();
        assert_eq!(began.len(), 1, "began: {:?}", *began);
        assert_eq!(ended.len(), 1, "ended: {:?}", *ended);
        let mut pair = [began[0].0 .0, began[0].1 .0];
        pair.sort();
        assert_eq!(pair, [3, 5]);
    }

    #[test]
    fn removing_a_body_still_reports_its_ended_contact() {
        let mut world = PhysicsWorld::new(&zero_g());
        let ended = Rc::new(RefCell::new(Vec::new()));
        {
            let ended = Rc::clone(&ended);
            world.on_contact_end(move |c| ended.borrow_mut().push((c.tag_a, c.tag_b)));
        }

        world.create_body(
            &BodyDesc::fixed()
                .with_position(Vec2::new(5.0, 3.0))
                .with_fixture(FixtureDesc::Box {
                    center: Vec2::ZERO,
                    half_width: 1.0,
                    half_height: 1.0,
                    angle: 0.0,
                })
                .with_sensor(true)
                .with_tag(CollisionTag(3)),
            ColliderMaterial::default(),
        );
        let ball_body = world.create_body(
            &BodyDesc::dynamic()
                .with_position(Vec2::new(5.0, 3.0))
                .with_fixture(ball(0.25))
                .with_tag(CollisionTag(5)),
            ColliderMaterial::default(),
        );

        for _ in 0..5 {
            world.step(DT);
        }
        assert!(ended.borrow().is_empty());

        world.remove_body(&ball_body);
        assert!(world.body_meta.contains_key(&ball_body.body_handle));
        world.step(DT);

        let ended = ended.borrow();
        assert_eq!(ended.len(), 1, "ended: {:?}", *ended);
        let mut pair = [ended[0].0 .0, ended[0].1 .0];
        pair.sort();
        assert_eq!(pair, [3, 5]);

        assert!(world.retired.is_empty());
        assert!(!world.body_meta.contains_key(&ball_body.body_handle));
        assert!(world
            .collider_owner
            .values()
            .all(|owner| *owner != ball_body.body_handle));
        assert_eq!(world.tag(&ball_body), CollisionTag::NONE);
    }

    #[test]
    fn stepping_is_deterministic_regardless_of_batching() {
        fn build() -> (PhysicsWorld, PhysicsBody) {
            let mut world = PhysicsWorld::new(&LevelConfig::default());
            let body = world.create_body(
                &BodyDesc::dynamic()
                    .with_position(Vec2::new(4.0, 6.0))
                    .with_rotation(0.3)
                    .with_fixture(ball(0.4))
                    .with_fixture(FixtureDesc::Box {
                        center: Vec2::new(1.0, 0.2),
                        half_width: 1.0,
                        half_height: 0.2,
                        angle: 0.2,
                    }),
                ColliderMaterial::default(),
            );
            (world, body)
        }

        let (mut a, body_a) = build();
        let (mut b, body_b) = build();

        for _ in 0..120 {
            a.step(DT);
        }
        for _ in 0..45 {
            b.step(DT);
        }
        let _ = b.body_position(&body_b);
        for _ in 0..75 {
            b.step(DT);
        }

        let (pa, ra) = a.body_position(&body_a);
        let (pb, rb) = b.body_position(&body_b);
        assert!(pa.abs_diff_eq(pb, 1e-6), "{:?} vs {:?}", pa, pb);
        assert!((ra - rb).abs() < 1e-6);
    }

    #[test]
    fn iteration_counts_come_from_config() {
        let mut config = LevelConfig::default();
        config.velocity_iterations = 0;
        config.position_iterations = 3;
        let world = PhysicsWorld::new(&config);
        assert_eq!(world.integration_parameters.num_solver_iterations.get(), 1);
        assert_eq!(world.integration_parameters.num_internal_stabilization_iterations, 3);
    }
}
