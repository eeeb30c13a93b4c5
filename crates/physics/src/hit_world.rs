//! Collider storage for ray hit-testing with Rapier3D.
//!
//! Nothing here is simulated: colliders are parentless spheres that the scene
//! moves every frame, and the query pipeline is rebuilt before rays are cast.

use crate::collision::TargetGroup;
use engine_core::Vec3;
use rapier3d::na::Vector3;
use rapier3d::prelude::{
    ColliderBuilder, ColliderHandle, ColliderSet, QueryPipeline, RigidBodySet,
};

/// Sphere colliders for every clickable or shootable thing in the scene.
pub struct HitWorld {
    pub(crate) rigid_body_set: RigidBodySet,
    pub(crate) collider_set: ColliderSet,
    pub(crate) query_pipeline: QueryPipeline,
    dirty: bool,
}

impl Default for HitWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl HitWorld {
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            query_pipeline: QueryPipeline::new(),
            dirty: true,
        }
    }

    /// Add a sphere target. `tag` is returned with every hit on it.
    pub fn add_sphere_target(
        &mut self,
        position: Vec3,
        radius: f32,
        group: TargetGroup,
        tag: u64,
    ) -> ColliderHandle {
        let collider = ColliderBuilder::ball(radius.max(0.01))
            .translation(Vector3::new(position.x, position.y, position.z))
            .collision_groups(group.collider_groups())
            .user_data(tag as u128)
            .build();
        self.dirty = true;
        self.collider_set.insert(collider)
    }

    /// Move a target.
    pub fn set_target_position(&mut self, handle: ColliderHandle, position: Vec3) {
        if let Some(collider) = self.collider_set.get_mut(handle) {
            collider.set_translation(Vector3::new(position.x, position.y, position.z));
            self.dirty = true;
        }
    }

    /// Enable or disable a target. Disabled targets are invisible to rays.
    pub fn set_target_enabled(&mut self, handle: ColliderHandle, enabled: bool) {
        if let Some(collider) = self.collider_set.get_mut(handle) {
            if collider.is_enabled() != enabled {
                collider.set_enabled(enabled);
                self.dirty = true;
            }
        }
    }

    pub fn target_count(&self) -> usize {
        self.collider_set.len()
    }

    /// Rebuild the query acceleration structure if anything moved. Call once
    /// per frame after the scene has published its transforms.
    pub fn refresh(&mut self) {
        if self.dirty {
            self.query_pipeline.update(&self.collider_set);
            self.dirty = false;
        }
    }
}
