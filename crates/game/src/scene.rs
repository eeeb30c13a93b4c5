//! The solar system scene: one hecs entity per body plus the UFO, each with
//! a transform, a renderable resolved at startup, and a hit collider.

use crate::catalog::BodyCatalog;
use crate::combat::{UFO_FALLBACK_RADIUS, UFO_MODEL_SCALE};
use crate::targeting::SceneQuery;
use engine_core::{Orbit, Transform};
use glam::{Quat, Vec3};
use hecs::{Entity, World};
use physics::{ColliderHandle, HitWorld, Ray, TargetGroup};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use renderer::{Renderable, StarInstance};
use std::path::Path;

/// Longest ray used for selection and weapon hits.
pub const RAY_RANGE: f32 = 2000.0;
pub const STAR_COUNT: usize = 5000;
pub const STAR_SHELL_RADIUS: f32 = 150.0;
pub const STAR_SHELL_DEPTH: f32 = 50.0;
const STAR_SEED: u64 = 0x5EED;
const UFO_MODEL_PATH: &str = "models/ufo.glb";
const UFO_COLOR: [f32; 4] = [0.6, 0.9, 0.6, 1.0];
/// Collider tag reserved for the UFO; bodies use their catalog index.
const UFO_TAG: u64 = u64::MAX;

/// A catalog body in the world.
#[derive(Debug, Clone)]
pub struct Body {
    pub name: String,
    /// Catalog index of the body this one orbits.
    pub parent: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
pub struct Ufo;

#[derive(Debug, Clone, Copy)]
pub struct HitTarget(pub ColliderHandle);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visible(pub bool);

/// Where the UFO should be drawn this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UfoPose {
    pub position: Vec3,
    pub yaw: f32,
    pub visible: bool,
}

pub struct Scene {
    world: World,
    hits: HitWorld,
    /// Body entities in catalog order, parents before children.
    bodies: Vec<Entity>,
    ufo: Entity,
    ufo_collider: ColliderHandle,
    stars: Vec<StarInstance>,
}

impl Scene {
    /// Compose the scene. Every model is resolved here, once; missing or
    /// broken models become fallback spheres.
    pub fn new(catalog: &BodyCatalog, asset_dir: &Path) -> Self {
        let mut world = World::new();
        let mut hits = HitWorld::new();
        let mut bodies = Vec::with_capacity(catalog.len());
        let mut positions: Vec<Vec3> = Vec::with_capacity(catalog.len());

        for (index, body) in catalog.bodies().iter().enumerate() {
            let renderable = Renderable::resolve(
                &asset_dir.join(&body.model_path),
                body.model_scale,
                body.display_radius,
                body.color,
            );
            let parent = body.parent.as_deref().and_then(|p| catalog.index_of(p));
            let center = parent
                .and_then(|i| positions.get(i).copied())
                .unwrap_or(Vec3::ZERO);
            let orbit = body
                .has_orbit()
                .then(|| Orbit::new(body.orbit_radius, body.orbit_speed));
            let position = match &orbit {
                Some(orbit) => center + orbit.offset(),
                None => body.position,
            };
            let collider = hits.add_sphere_target(
                position,
                renderable.hit_radius(),
                TargetGroup::Body,
                index as u64,
            );
            let transform = Transform::from_position_scale(position, body.model_scale);
            let tag = Body {
                name: body.name.clone(),
                parent,
            };
            let entity = match orbit {
                Some(orbit) => world.spawn((tag, transform, orbit, renderable, HitTarget(collider))),
                None => world.spawn((tag, transform, renderable, HitTarget(collider))),
            };
            positions.push(position);
            bodies.push(entity);
        }

        let ufo_renderable = Renderable::resolve(
            &asset_dir.join(UFO_MODEL_PATH),
            UFO_MODEL_SCALE,
            UFO_FALLBACK_RADIUS,
            UFO_COLOR,
        );
        let ufo_collider = hits.add_sphere_target(
            Vec3::ZERO,
            ufo_renderable.hit_radius(),
            TargetGroup::Ufo,
            UFO_TAG,
        );
        hits.set_target_enabled(ufo_collider, false);
        let ufo = world.spawn((
            Ufo,
            Transform::from_position_scale(Vec3::ZERO, UFO_MODEL_SCALE),
            ufo_renderable,
            HitTarget(ufo_collider),
            Visible(false),
        ));
        hits.refresh();

        log::info!("Scene composed with {} bodies", bodies.len());
        Self {
            world,
            hits,
            bodies,
            ufo,
            ufo_collider,
            stars: starfield(STAR_SEED, STAR_COUNT),
        }
    }

    /// Advance orbits, place the UFO, and sync colliders.
    pub fn update(&mut self, dt: f32, ufo: UfoPose) {
        let mut positions: Vec<Vec3> = Vec::with_capacity(self.bodies.len());
        for &entity in &self.bodies {
            let Ok((body, transform, orbit)) = self
                .world
                .query_one_mut::<(&Body, &mut Transform, Option<&mut Orbit>)>(entity)
            else {
                positions.push(Vec3::ZERO);
                continue;
            };
            if let Some(orbit) = orbit {
                let center = body
                    .parent
                    .and_then(|i| positions.get(i).copied())
                    .unwrap_or(Vec3::ZERO);
                orbit.advance(dt);
                transform.position = center + orbit.offset();
            }
            positions.push(transform.position);
        }

        if let Ok((transform, visible)) = self
            .world
            .query_one_mut::<(&mut Transform, &mut Visible)>(self.ufo)
        {
            transform.position = ufo.position;
            transform.rotation = Quat::from_rotation_y(ufo.yaw);
            visible.0 = ufo.visible;
        }
        self.hits.set_target_enabled(self.ufo_collider, ufo.visible);

        for (_, (transform, target)) in self.world.query::<(&Transform, &HitTarget)>().iter() {
            self.hits.set_target_position(target.0, transform.position);
        }
        self.hits.refresh();
    }

    /// Visit every visible entity with its label, transform and renderable.
    /// Bodies are labelled with their name; the UFO carries no label.
    pub fn visit_drawables(&self, mut f: impl FnMut(Option<&str>, &Transform, &Renderable)) {
        for (_, (body, transform, renderable, visible)) in self
            .world
            .query::<(Option<&Body>, &Transform, &Renderable, Option<&Visible>)>()
            .iter()
        {
            if visible.map(|v| v.0).unwrap_or(true) {
                f(body.map(|b| b.name.as_str()), transform, renderable);
            }
        }
    }

    pub fn fallback_count(&self) -> usize {
        self.world
            .query::<&Renderable>()
            .iter()
            .filter(|(_, r)| r.is_fallback())
            .count()
    }

    pub fn stars(&self) -> &[StarInstance] {
        &self.stars
    }
}

impl SceneQuery for Scene {
    fn resolve_click_target(&self, ray: &Ray) -> Option<String> {
        let hit = self.hits.raycast(ray, RAY_RANGE, TargetGroup::Body)?;
        let entity = *self.bodies.get(hit.tag as usize)?;
        let body = self.world.get::<&Body>(entity).ok()?;
        Some(body.name.clone())
    }

    fn raycast_ufo(&self, ray: &Ray) -> Option<Vec3> {
        self.hits
            .raycast_against(self.ufo_collider, ray, RAY_RANGE)
            .map(|hit| hit.point)
    }
}

/// Background stars scattered through a spherical shell.
pub fn starfield(seed: u64, count: usize) -> Vec<StarInstance> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let theta = rng.gen_range(0.0..std::f32::consts::TAU);
            let cos_phi: f32 = rng.gen_range(-1.0..1.0);
            let sin_phi = (1.0 - cos_phi * cos_phi).sqrt();
            let radius = STAR_SHELL_RADIUS + rng.gen_range(0.0..STAR_SHELL_DEPTH);
            let direction = Vec3::new(sin_phi * theta.cos(), cos_phi, sin_phi * theta.sin());
            StarInstance {
                position: (direction * radius).into(),
                brightness: rng.gen_range(0.5..1.0),
            }
        })
        .collect()
}
