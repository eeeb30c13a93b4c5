//! First-person flight: per-frame camera integration and moving/boost edges.

use glam::Vec3;
use input::FlightInput;
use renderer::Camera;

/// Base translation speed in world units per second.
pub const MOVE_SPEED: f32 = 25.0;
pub const BOOST_MULTIPLIER: f32 = 2.5;
/// Where the camera starts, looking at the Sun down -Z.
pub const START_POSITION: Vec3 = Vec3::new(0.0, 20.0, 100.0);
const BASE_SENSITIVITY: f32 = 0.002;

/// Edge-triggered flight state changes, for the movement audio loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlightEvent {
    MovementChanged { moving: bool, boosting: bool },
    /// Boost toggled while already moving.
    BoostChanged { boosting: bool },
}

/// Advance a camera by one tick of flight input. Look is applied before
/// translation so movement follows the newest orientation.
pub fn integrate(camera: &Camera, input: &FlightInput, dt: f32) -> Camera {
    let mut next = camera.clone();
    if input.look != glam::Vec2::ZERO {
        next.process_mouse(input.look.x, input.look.y);
    }
    let axes = input.local_axes();
    if axes != Vec3::ZERO {
        let speed = MOVE_SPEED * if input.boost { BOOST_MULTIPLIER } else { 1.0 };
        let direction = next.right() * axes.x + next.up() * axes.y + next.forward() * axes.z;
        next.transform.translate(direction * speed * dt);
    }
    next
}

/// Owns the player camera and gates it on pointer capture.
#[derive(Debug, Clone)]
pub struct FlightController {
    camera: Camera,
    captured: bool,
    moving: bool,
    boosting: bool,
    /// World units per second over the last tick.
    speed: f32,
}

impl FlightController {
    pub fn new(sensitivity: f32) -> Self {
        let mut camera = Camera::new(START_POSITION);
        camera.sensitivity = BASE_SENSITIVITY * sensitivity;
        Self {
            camera,
            captured: false,
            moving: false,
            boosting: false,
            speed: 0.0,
        }
    }

    /// Run one tick. Without pointer capture the camera is frozen.
    pub fn update(&mut self, input: &FlightInput, dt: f32) -> Option<FlightEvent> {
        if self.captured && dt > 0.0 {
            let next = integrate(&self.camera, input, dt);
            self.speed = (next.position() - self.camera.position()).length() / dt;
            self.camera = next;
        } else {
            self.speed = 0.0;
        }
        self.track(self.captured && input.any_direction(), input.boost)
    }

    /// Engage or release pointer capture. Releasing while moving reports a stop.
    pub fn set_captured(&mut self, captured: bool) -> Option<FlightEvent> {
        if self.captured == captured {
            return None;
        }
        self.captured = captured;
        if !captured {
            self.speed = 0.0;
            return self.track(false, self.boosting);
        }
        None
    }

    fn track(&mut self, moving: bool, boosting: bool) -> Option<FlightEvent> {
        let was_moving = self.moving;
        let was_boosting = self.boosting;
        self.moving = moving;
        self.boosting = boosting;
        if moving != was_moving {
            Some(FlightEvent::MovementChanged { moving, boosting })
        } else if moving && boosting != was_boosting {
            Some(FlightEvent::BoostChanged { boosting })
        } else {
            None
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.camera.set_aspect(width, height);
    }

    pub fn is_captured(&self) -> bool {
        self.captured
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }
}
