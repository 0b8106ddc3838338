pub mod geometry;
pub mod physics;
pub mod scene;
