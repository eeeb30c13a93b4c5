//! Ray queries for click selection and weapon hit detection.

use crate::{HitWorld, TargetGroup};
use engine_core::Vec3;
use rapier3d::na::{Point3, Vector3};
use rapier3d::prelude::{Collider, ColliderHandle, QueryFilter};

/// A ray in world space. `direction` is expected to be normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn point_at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }

    fn to_rapier(self) -> rapier3d::prelude::Ray {
        rapier3d::prelude::Ray::new(
            Point3::new(self.origin.x, self.origin.y, self.origin.z),
            Vector3::new(self.direction.x, self.direction.y, self.direction.z),
        )
    }
}

/// Result of a raycast query.
#[derive(Debug, Clone, Copy)]
pub struct RaycastHit {
    /// The collider that was hit.
    pub collider: ColliderHandle,
    /// Tag given when the target was added.
    pub tag: u64,
    /// Distance along the ray to the hit point.
    pub distance: f32,
    /// World position of the hit.
    pub point: Vec3,
}

impl HitWorld {
    /// Cast a ray against one group and return the nearest enabled hit.
    pub fn raycast(&self, ray: &Ray, max_distance: f32, group: TargetGroup) -> Option<RaycastHit> {
        let enabled = |_: ColliderHandle, c: &Collider| c.is_enabled();
        let filter = QueryFilter::default()
            .groups(group.query_groups())
            .predicate(&enabled);
        self.cast(ray, max_distance, filter)
    }

    /// Cast a ray against a single target, ignoring everything else.
    pub fn raycast_against(
        &self,
        target: ColliderHandle,
        ray: &Ray,
        max_distance: f32,
    ) -> Option<RaycastHit> {
        let only_target = |h: ColliderHandle, c: &Collider| h == target && c.is_enabled();
        let filter = QueryFilter::default().predicate(&only_target);
        self.cast(ray, max_distance, filter)
    }

    fn cast(&self, ray: &Ray, max_distance: f32, filter: QueryFilter) -> Option<RaycastHit> {
        if ray.direction.length_squared() < 1e-8 {
            return None;
        }
        let rapier_ray = ray.to_rapier();
        self.query_pipeline
            .cast_ray(
                &self.rigid_body_set,
                &self.collider_set,
                &rapier_ray,
                max_distance,
                true,
                filter,
            )
            .map(|(collider, toi)| {
                let tag = self
                    .collider_set
                    .get(collider)
                    .map(|c| c.user_data as u64)
                    .unwrap_or_default();
                RaycastHit {
                    collider,
                    tag,
                    distance: toi,
                    point: ray.point_at(toi),
                }
            })
    }
}
