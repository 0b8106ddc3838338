use glam::Vec2;

use crate::api::config::LevelConfig;
use crate::api::error::StrokeError;
use crate::core::geometry::distance;
use crate::core::physics::{BodyDesc, FixtureDesc, PhysicsBody, PhysicsWorld};
use crate::draw::brush::Brush;

/// Fixture layout for a stroke, in world units relative to `position`.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyPlan {
    /// Body origin in world units (the first stroke point).
    pub position: Vec2,
    pub fixtures: Vec<FixtureDesc>,
}

impl BodyPlan {
    pub fn circle_count(&self) -> usize {
        self.fixtures
            .iter()
            .filter(|f| matches!(f, FixtureDesc::Circle { .. }))
            .count()
    }

    pub fn box_count(&self) -> usize {
        self.fixtures
            .iter()
            .filter(|f| matches!(f, FixtureDesc::Box { .. }))
            .count()
    }

    /// A dynamic body description carrying every planned fixture.
    pub fn to_desc(&self, config: &LevelConfig) -> BodyDesc {
        BodyDesc::dynamic()
            .with_position(self.position)
            .with_fixtures(self.fixtures.iter().copied())
            .with_sleeping(config.allow_sleeping)
            .with_ccd(config.continuous_physics)
    }
}

/// Lay out fixtures along a stroke of screen-space points.
///
/// A circle caps each end. Consecutive points are joined by oriented boxes as
/// thick as the brush; a segment shorter than the brush radius is folded into
/// the next one unless it is the final segment, which is always kept.
pub fn plan_body(points: &[Vec2], brush: &Brush, ptm_ratio: f32) -> Result<BodyPlan, StrokeError> {
    let (first, last) = match (points.first(), points.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Err(StrokeError::EmptyStroke),
    };

    let position = first / ptm_ratio;
    let radius = brush.radius() / ptm_ratio;
    let half_height = brush.height() / ptm_ratio / 2.0;
    let min_box_length = brush.radius();

    let mut fixtures = Vec::with_capacity(points.len() + 1);
    fixtures.push(FixtureDesc::Circle {
        center: first / ptm_ratio - position,
        radius,
    });
    fixtures.push(FixtureDesc::Circle {
        center: last / ptm_ratio - position,
        radius,
    });

    let last_index = points.len() - 1;
    let mut start = first;
    for (i, &end) in points.iter().enumerate().skip(1) {
        let length = distance(start, end);
        if length < min_box_length && i != last_index {
            continue;
        }
        let d = start - end;
        fixtures.push(FixtureDesc::Box {
            center: (start + end) / 2.0 / ptm_ratio - position,
            half_width: length / ptm_ratio / 2.0,
            half_height,
            angle: d.y.atan2(d.x),
        });
        start = end;
    }

    Ok(BodyPlan { position, fixtures })
}

/// Build the compound body for a stroke and add it to the world.
pub fn synthesize_body(
    world: &mut PhysicsWorld,
    points: &[Vec2],
    brush: &Brush,
    config: &LevelConfig,
) -> Result<PhysicsBody, StrokeError> {
    let plan = plan_body(points, brush, config.ptm_ratio)?;
    log::debug!(
        "new body from {} points: {} circles, {} boxes",
        points.len(),
        plan.circle_count(),
        plan.box_count()
    );
    Ok(world.create_body(&plan.to_desc(config), config.material))
}
