//! Stroke capture: brush stamps rasterized into an off-screen surface while
//! the pointer moves, plus the ordered point list the body is built from.

pub mod brush;
pub mod stroke;
pub mod surface;
