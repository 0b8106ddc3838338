//! Turning a finished stroke into a compound rigid body and a sprite bound to it.

pub mod body;
pub mod sprite;
