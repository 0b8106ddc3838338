use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::error::ConfigError;
use crate::core::geometry::Viewport;

/// Physical material shared by every fixture of a drawn body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColliderMaterial {
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            density: 1.0,
            friction: 0.2,
            restitution: 0.1,
        }
    }
}

/// Configuration for a level, provided by the embedder or parsed from JSON.
/// Every field falls back to its default when missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Pixels per physics meter.
    pub ptm_ratio: f32,
    /// Solver velocity iterations per step.
    pub velocity_iterations: usize,
    /// Solver position (stabilization) iterations per step.
    pub position_iterations: usize,
    /// Gravity in meters/s². The world is y-up, so downward is negative Y.
    pub gravity: Vec2,
    /// Let resting bodies fall asleep.
    pub allow_sleeping: bool,
    /// Continuous collision detection for drawn bodies.
    pub continuous_physics: bool,
    /// Material for drawn bodies.
    pub material: ColliderMaterial,
    /// Visible area in screen pixels.
    pub viewport: Viewport,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            ptm_ratio: 32.0,
            velocity_iterations: 8,
            position_iterations: 1,
            gravity: Vec2::new(0.0, -9.8),
            allow_sleeping: true,
            continuous_physics: true,
            material: ColliderMaterial::default(),
            viewport: Viewport::new(Vec2::ZERO, Vec2::new(800.0, 600.0)),
        }
    }
}

impl LevelConfig {
    /// Parse and validate a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would put NaN or infinities into the world.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.ptm_ratio.is_finite() && self.ptm_ratio > 0.0) {
            return Err(ConfigError::PtmRatio(self.ptm_ratio));
        }
        let size = self.viewport.size;
        if !(size.is_finite() && size.x > 0.0 && size.y > 0.0) {
            return Err(ConfigError::ViewportSize(size));
        }
        if !self.viewport.origin.is_finite() {
            return Err(ConfigError::ViewportOrigin(self.viewport.origin));
        }
        if !self.gravity.is_finite() {
            return Err(ConfigError::Gravity(self.gravity));
        }
        Ok(())
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_material(mut self, material: ColliderMaterial) -> Self {
        self.material = material;
        self
    }

    pub fn screen_to_world(&self, v: Vec2) -> Vec2 {
        v / self.ptm_ratio
    }

    pub fn world_to_screen(&self, v: Vec2) -> Vec2 {
        v * self.ptm_ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_tuning() {
        let config = LevelConfig::default();
        assert_eq!(config.ptm_ratio, 32.0);
        assert_eq!(config.velocity_iterations, 8);
        assert_eq!(config.position_iterations, 1);
        assert!((config.material.density - 1.0).abs() < 0.001);
        assert!((config.material.friction - 0.2).abs() < 0.001);
        assert!((config.material.restitution - 0.1).abs() < 0.001);
    }

    #[test]
    fn parse_partial_json_fills_defaults() {
        let json = r#"{
            "ptm_ratio": 64.0,
            "material": { "friction": 0.9 },
            "viewport": { "origin": [0.0, 0.0], "size": [1024.0, 768.0] }
        }"#;
        let config = LevelConfig::from_json(json).unwrap();
        assert_eq!(config.ptm_ratio, 64.0);
        assert_eq!(config.velocity_iterations, 8);
        assert!((config.material.friction - 0.9).abs() < 0.001);
        assert!((config.material.density - 1.0).abs() < 0.001);
        assert_eq!(config.viewport.size, Vec2::new(1024.0, 768.0));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            LevelConfig::from_json("{ \"ptm_ratio\": \"big\" }"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn unusable_values_are_rejected() {
        assert!(matches!(
            LevelConfig::from_json(r#"{"ptm_ratio": 0.0}"#),
            Err(ConfigError::PtmRatio(_))
        ));
        assert!(matches!(
            LevelConfig::from_json(r#"{"ptm_ratio": -8.0}"#),
            Err(ConfigError::PtmRatio(_))
        ));
        assert!(matches!(
            LevelConfig::from_json(r#"{"viewport": {"origin": [0.0, 0.0], "size": [640.0, 0.0]}}"#),
            Err(ConfigError::ViewportSize(_))
        ));

        let config = LevelConfig::default().with_gravity(Vec2::new(0.0, f32::NAN));
        assert!(matches!(config.validate(), Err(ConfigError::Gravity(_))));
        let config = LevelConfig {
            ptm_ratio: f32::INFINITY,
            ..LevelConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::PtmRatio(_))));
        assert!(LevelConfig::default().validate().is_ok());
    }

    #[test]
    fn screen_world_conversion() {
        let config = LevelConfig::default();
        let world = config.screen_to_world(Vec2::new(64.0, 32.0));
        assert_eq!(world, Vec2::new(2.0, 1.0));
        assert_eq!(config.world_to_screen(world), Vec2::new(64.0, 32.0));
    }
}
