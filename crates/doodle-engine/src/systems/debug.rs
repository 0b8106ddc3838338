//! Debug wireframes: fixture outlines for every body in the world.

use glam::Vec2;

use crate::core::physics::{FixtureShape, PhysicsWorld};

/// Segments used to approximate a circle outline.
const CIRCLE_SEGMENTS: usize = 24;

/// A polyline in screen units.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugLine {
    pub points: Vec<[f32; 2]>,
}

/// Outlines for all fixtures of all bodies, ground included.
pub fn collider_outlines(world: &PhysicsWorld, ptm_ratio: f32) -> Vec<DebugLine> {
    let mut lines = Vec::new();
    for body in world.bodies() {
        for shape in world.fixtures(&body) {
            lines.push(DebugLine {
                points: fixture_outline(&shape, ptm_ratio),
            });
        }
    }
    lines
}

/// Outline points for one world-space fixture, scaled to screen units.
/// Closed shapes repeat their first point at the end.
fn fixture_outline(shape: &FixtureShape, ptm_ratio: f32) -> Vec<[f32; 2]> {
    let screen = |p: Vec2| {
        let s = p * ptm_ratio;
        [s.x, s.y]
    };
    match shape {
        FixtureShape::Circle { center, radius } => (0..=CIRCLE_SEGMENTS)
            .map(|i| {
                let angle = (i as f32 / CIRCLE_SEGMENTS as f32) * std::f32::consts::TAU;
                screen(*center + Vec2::new(angle.cos(), angle.sin()) * *radius)
            })
            .collect(),
        FixtureShape::Polygon { vertices } => {
            let mut points: Vec<[f32; 2]> = vertices.iter().map(|v| screen(*v)).collect();
            if let Some(&first) = points.first() {
                points.push(first);
            }
            points
        }
        FixtureShape::Edge { a, b } => vec![screen(*a), screen(*b)],
    }
}
