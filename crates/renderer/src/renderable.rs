//! What the render collaborator draws for a body: its glTF model when one
//! loads, otherwise a procedural sphere. The choice is made once, when the
//! scene is composed.

use crate::mesh::MeshData;
use crate::vertex::Vertex;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a model could not be used.
#[derive(Debug, Error)]
pub enum LoadFailure {
    #[error("model file not found: {0}")]
    Missing(PathBuf),
    #[error("failed to import {path}: {source}")]
    Import {
        path: PathBuf,
        #[source]
        source: gltf::Error,
    },
    #[error("model {0} has no triangle geometry")]
    Empty(PathBuf),
}

/// A successfully loaded glTF model.
#[derive(Debug, Clone)]
pub struct ModelRenderable {
    pub path: PathBuf,
    pub mesh: MeshData,
    /// Uniform scale applied by the scene.
    pub scale: f32,
}

/// Stand-in sphere used when a model is unavailable.
#[derive(Debug, Clone)]
pub struct FallbackRenderable {
    pub mesh: MeshData,
    pub radius: f32,
    pub color: [f32; 4],
}

#[derive(Debug, Clone)]
pub enum Renderable {
    Model(ModelRenderable),
    Fallback(FallbackRenderable),
}

impl Renderable {
    /// Load `path`, falling back to a sphere of `fallback_radius` on any failure.
    pub fn resolve(path: &Path, scale: f32, fallback_radius: f32, color: [f32; 4]) -> Self {
        match load_model(path, scale) {
            Ok(model) => {
                log::info!(
                    "Loaded model {} ({} triangles)",
                    path.display(),
                    model.mesh.triangle_count()
                );
                Renderable::Model(model)
            }
            Err(e) => {
                log::warn!("{}; using fallback sphere", e);
                Renderable::fallback(fallback_radius, color)
            }
        }
    }

    /// A procedural sphere.
    pub fn fallback(radius: f32, color: [f32; 4]) -> Self {
        let mut mesh = MeshData::sphere(radius, 32, 32);
        mesh.set_color(color);
        Renderable::Fallback(FallbackRenderable { mesh, radius, color })
    }

    pub fn mesh(&self) -> &MeshData {
        match self {
            Renderable::Model(m) => &m.mesh,
            Renderable::Fallback(f) => &f.mesh,
        }
    }

    /// World-space radius of a sphere enclosing the drawn geometry.
    pub fn hit_radius(&self) -> f32 {
        match self {
            Renderable::Model(m) => m.mesh.bounding_radius() * m.scale,
            Renderable::Fallback(f) => f.radius,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Renderable::Fallback(_))
    }
}

/// Import every triangle primitive in a glTF/GLB file into one mesh.
pub fn load_model(path: &Path, scale: f32) -> Result<ModelRenderable, LoadFailure> {
    if !path.exists() {
        return Err(LoadFailure::Missing(path.to_path_buf()));
    }
    let (document, buffers, _images) = gltf::import(path).map_err(|source| LoadFailure::Import {
        path: path.to_path_buf(),
        source,
    })?;

    let mut mesh = MeshData::new();
    for gltf_mesh in document.meshes() {
        for primitive in gltf_mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                continue;
            }
            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));
            let Some(positions) = reader.read_positions() else {
                continue;
            };
            let positions: Vec<[f32; 3]> = positions.collect();
            let normals: Vec<[f32; 3]> = reader
                .read_normals()
                .map(|n| n.collect())
                .unwrap_or_default();
            let uvs: Vec<[f32; 2]> = reader
                .read_tex_coords(0)
                .map(|t| t.into_f32().collect())
                .unwrap_or_default();

            let mut part = MeshData::new();
            for (i, position) in positions.iter().enumerate() {
                let normal = normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]);
                let uv = uvs.get(i).copied().unwrap_or([0.0, 0.0]);
                part.vertices.push(Vertex::new(*position, normal, uv));
            }
            part.indices = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..positions.len() as u32).collect(),
            };
            mesh.append(&part);
        }
    }

    if mesh.is_empty() {
        return Err(LoadFailure::Empty(path.to_path_buf()));
    }
    Ok(ModelRenderable {
        path: path.to_path_buf(),
        mesh,
        scale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_model_is_a_typed_failure() {
        let err = load_model(Path::new("does/not/exist.glb"), 1.0).unwrap_err();
        assert!(matches!(err, LoadFailure::Missing(_)));
    }

    #[test]
    fn resolve_falls_back_to_sphere() {
        let r = Renderable::resolve(Path::new("does/not/exist.glb"), 1.0, 3.0, [1.0, 0.8, 0.1, 1.0]);
        assert!(r.is_fallback());
        assert!((r.hit_radius() - 3.0).abs() < 1e-5);
        assert!((r.mesh().bounding_radius() - 3.0).abs() < 1e-4);
    }
}
