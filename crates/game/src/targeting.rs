//! Click resolution: select a body or fire the weapon, never both.

use crate::mode::InteractionMode;
use glam::Vec3;
use physics::Ray;
use renderer::Camera;

/// Hit-testing the scene offers to the session.
pub trait SceneQuery {
    /// Name of the nearest body along `ray`.
    fn resolve_click_target(&self, ray: &Ray) -> Option<String>;

    /// Where `ray` meets the UFO's hit geometry.
    fn raycast_ufo(&self, ray: &Ray) -> Option<Vec3>;
}

/// The ray through the crosshair. With the pointer captured every click
/// lands at screen center.
pub fn camera_forward_ray(camera: &Camera) -> Ray {
    Ray::new(camera.position(), camera.forward())
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClickAction {
    Select(String),
    Fire { ray: Ray, hit: Option<Vec3> },
    None,
}

/// Decide what a primary click does in `mode`.
pub fn resolve_click(
    mode: InteractionMode,
    weapon_active: bool,
    scene: &dyn SceneQuery,
    ray: Ray,
) -> ClickAction {
    if mode == InteractionMode::Combat && weapon_active {
        return ClickAction::Fire {
            ray,
            hit: scene.raycast_ufo(&ray),
        };
    }
    if mode.allows_selection() {
        if let Some(name) = scene.resolve_click_target(&ray) {
            return ClickAction::Select(name);
        }
    }
    ClickAction::None
}
