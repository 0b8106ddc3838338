//! Scripting collaborator seam. The script engine itself lives outside this
//! crate; the level talks to it through an injected [`ScriptHost`].

mod bridge;

pub use bridge::{ScriptBridge, BEGIN_CONTACT, END_CONTACT, LOAD_LEVEL};

use crate::api::error::ScriptError;
use crate::api::types::LevelId;

/// A value passed to a script function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptValue {
    /// The level's self-reference.
    Level(LevelId),
    Int(i32),
}

/// The scripting environment as seen from the level.
pub trait ScriptHost {
    /// Whether a global function with this name is defined.
    fn has_function(&self, name: &str) -> bool;

    /// Invoke a global function.
    fn call(&mut self, name: &str, args: &[ScriptValue]) -> Result<(), ScriptError>;
}
