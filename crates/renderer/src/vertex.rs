//! Vertex types handed to the render collaborator.

use bytemuck::{Pod, Zeroable};

/// Standard vertex with position, normal, UV coordinates, and color.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coords: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            tex_coords,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// One background star: position and brightness.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct StarInstance {
    pub position: [f32; 3],
    pub brightness: f32,
}
