//! Core types shared by every Solar Quest crate.
//!
//! - Transform and orbit components
//! - Simulated frame time
//! - Named, cancelable one-shot and repeating timers

pub mod components;
pub mod scheduler;
pub mod time;
pub mod transform;

pub use components::*;
pub use scheduler::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
pub use hecs::{Entity, World};
