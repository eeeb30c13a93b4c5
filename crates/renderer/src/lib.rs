//! Render-side data for Solar Quest: camera, CPU meshes, and the
//! model-or-fallback renderable chosen for each body.

pub mod camera;
pub mod mesh;
pub mod renderable;
pub mod vertex;

pub use camera::*;
pub use mesh::*;
pub use renderable::*;
pub use vertex::*;
