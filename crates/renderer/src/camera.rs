//! First-person camera: mouse look, projection, and world-to-screen mapping.

use engine_core::Transform;
use glam::{Mat4, Vec2, Vec3, Vec4};

/// Pitch limit, kept short of straight up/down so the view never flips.
pub const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.1;

/// Camera with configurable FOV and clipping planes.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera transform (position and rotation).
    pub transform: Transform,
    /// Field of view in degrees.
    pub fov_degrees: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
    /// Radians of rotation per pixel of mouse motion.
    pub sensitivity: f32,
    /// Current pitch (up/down rotation) in radians.
    pitch: f32,
    /// Current yaw (left/right rotation) in radians.
    yaw: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            transform: Transform::default(),
            fov_degrees: 60.0,
            near: 0.1,
            far: 2000.0,
            aspect: 16.0 / 9.0,
            sensitivity: 0.002,
            pitch: 0.0,
            yaw: 0.0,
        }
    }
}

impl Camera {
    /// Create a new camera at the given position, looking down -Z.
    pub fn new(position: Vec3) -> Self {
        Self {
            transform: Transform::from_position(position),
            ..Default::default()
        }
    }

    /// Update aspect ratio (call on window resize).
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Apply a mouse-look delta in pixels.
    pub fn process_mouse(&mut self, delta_x: f32, delta_y: f32) {
        self.set_yaw_pitch(
            self.yaw - delta_x * self.sensitivity,
            self.pitch - delta_y * self.sensitivity,
        );
    }

    /// Set yaw and pitch directly (in radians) and rebuild rotation.
    pub fn set_yaw_pitch(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = pitch.clamp(-MAX_PITCH, MAX_PITCH);
        self.transform.rotation = Transform::yaw_pitch_rotation(self.yaw, self.pitch);
    }

    /// Get the view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        let eye = self.transform.position;
        Mat4::look_to_rh(eye, self.transform.forward(), self.transform.up())
    }

    /// Get the projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    /// Get the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a world point to pixel coordinates (origin top-left).
    /// Returns `None` for points behind the camera.
    pub fn world_to_screen(&self, point: Vec3, viewport: Vec2) -> Option<Vec2> {
        let clip = self.view_projection_matrix() * Vec4::new(point.x, point.y, point.z, 1.0);
        if clip.w <= 1e-5 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * viewport.x,
            (1.0 - ndc.y) * 0.5 * viewport.y,
        ))
    }

    /// Get camera position.
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Get camera forward direction.
    pub fn forward(&self) -> Vec3 {
        self.transform.forward()
    }

    pub fn right(&self) -> Vec3 {
        self.transform.right()
    }

    pub fn up(&self) -> Vec3 {
        self.transform.up()
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_is_clamped() {
        let mut cam = Camera::default();
        cam.process_mouse(0.0, -100_000.0);
        assert!((cam.pitch() - MAX_PITCH).abs() < 1e-6);
        cam.process_mouse(0.0, 200_000.0);
        assert!((cam.pitch() + MAX_PITCH).abs() < 1e-6);
    }

    #[test]
    fn point_ahead_projects_to_screen_center() {
        let cam = Camera::new(Vec3::new(0.0, 0.0, 10.0));
        let viewport = Vec2::new(1280.0, 720.0);
        let p = cam.world_to_screen(Vec3::ZERO, viewport).expect("in front");
        assert!((p - viewport * 0.5).length() < 0.5);
    }

    #[test]
    fn point_behind_is_not_projected() {
        let cam = Camera::new(Vec3::ZERO);
        assert!(cam
            .world_to_screen(Vec3::new(0.0, 0.0, 5.0), Vec2::new(800.0, 600.0))
            .is_none());
    }

    #[test]
    fn point_above_projects_above_center() {
        let cam = Camera::new(Vec3::new(0.0, 0.0, 10.0));
        let viewport = Vec2::new(800.0, 600.0);
        let p = cam
            .world_to_screen(Vec3::new(0.0, 2.0, 0.0), viewport)
            .expect("in front");
        assert!(p.y < 300.0);
    }
}
