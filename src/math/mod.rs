//! Matrix and bounding-box kernel shared by the scene, picker and renderer.

pub mod bbox;
pub mod matrix;

pub use bbox::BBox;
pub use matrix::{Matrix, compose};
