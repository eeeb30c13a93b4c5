//! Ray hit-testing for Solar Quest, backed by Rapier3D.

pub mod collision;
pub mod hit_world;
pub mod raycast;

pub use collision::*;
pub use hit_world::*;
pub use raycast::*;

// Re-export Rapier for downstream crates
pub use rapier3d;

pub use rapier3d::prelude::ColliderHandle;
