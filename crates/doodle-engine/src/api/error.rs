use thiserror::Error;

use crate::api::types::TouchId;

/// Failure talking to the scripting collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("script function `{0}` is not defined")]
    MissingFunction(String),
    #[error("script function `{name}` failed: {message}")]
    Call { name: String, message: String },
}

/// Stroke-capture contract violations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StrokeError {
    #[error("a stroke is already in progress")]
    AlreadyActive,
    #[error("no stroke is in progress")]
    NoActiveStroke,
    #[error("touch {got:?} does not own the active stroke (owner {expected:?})")]
    TouchMismatch { expected: TouchId, got: TouchId },
    #[error("cannot build a body from an empty stroke")]
    EmptyStroke,
}

/// A level config that cannot be parsed or describes an unusable world.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("ptm_ratio must be positive and finite, got {0}")]
    PtmRatio(f32),
    #[error("viewport size must be positive and finite, got {0:?}")]
    ViewportSize(glam::Vec2),
    #[error("viewport origin must be finite, got {0:?}")]
    ViewportOrigin(glam::Vec2),
    #[error("gravity must be finite, got {0:?}")]
    Gravity(glam::Vec2),
}

/// Errors surfaced by the level layer.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level script error: {0}")]
    Script(#[from] ScriptError),
    #[error("invalid level config: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid brush image: {0}")]
    Brush(#[from] image::ImageError),
    #[error("stroke error: {0}")]
    Stroke(#[from] StrokeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_error_converts_into_level_error() {
        let err: LevelError = ScriptError::MissingFunction("LoadLevel".into()).into();
        assert!(matches!(err, LevelError::Script(ScriptError::MissingFunction(_))));
        assert_eq!(
            err.to_string(),
            "level script error: script function `LoadLevel` is not defined"
        );
    }
}
