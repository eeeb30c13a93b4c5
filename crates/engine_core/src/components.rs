//! Common ECS components used across the scene and gameplay code.

use glam::Vec3;

/// Health component for damageable entities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Apply damage, clamping at zero. Returns true only on the hit that
    /// takes health from positive to zero.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.is_dead() {
            return false;
        }
        self.current = (self.current - amount).max(0.0);
        self.is_dead()
    }

    /// Restore to full.
    pub fn reset(&mut self) {
        self.current = self.max;
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    pub fn percentage(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.current / self.max
        }
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

/// Lifetime component for short-lived visuals (laser shots, hit flashes).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lifetime {
    pub remaining: f32,
}

impl Lifetime {
    pub fn new(seconds: f32) -> Self {
        Self { remaining: seconds }
    }

    /// Tick down; returns true once expired.
    pub fn update(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.remaining <= 0.0
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }
}

/// Circular orbit about +Y around a center (the origin or a parent body).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    pub radius: f32,
    /// Radians per second.
    pub speed: f32,
    /// Current angle in radians.
    pub angle: f32,
}

impl Orbit {
    pub fn new(radius: f32, speed: f32) -> Self {
        Self { radius, speed, angle: 0.0 }
    }

    pub fn advance(&mut self, dt: f32) {
        self.angle = (self.angle + self.speed * dt).rem_euclid(std::f32::consts::TAU);
    }

    /// Offset from the orbit center. Angle zero sits on +X, and a positive
    /// rotation about +Y carries +X toward -Z.
    pub fn offset(&self) -> Vec3 {
        Vec3::new(self.angle.cos() * self.radius, 0.0, -self.angle.sin() * self.radius)
    }
}
