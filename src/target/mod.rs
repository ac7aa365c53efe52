pub mod geometry;
pub mod render;

pub use geometry::{FaceKind, TargetFace};
pub use render::{render_target, target_dimensions};
