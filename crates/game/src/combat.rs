//! UFO encounter: flight path, health, hit cooldown, weapon mode and laser shots.

use engine_core::{Health, Lifetime};
use glam::Vec3;

pub const UFO_MAX_HEALTH: f32 = 400.0;
pub const HIT_DAMAGE: f32 = 20.0;
/// Minimum combat time between two accepted hits.
pub const HIT_COOLDOWN: f32 = 0.5;
/// Slack on cooldown comparisons so summed frame steps that land on the
/// boundary count as elapsed.
const COOLDOWN_EPSILON: f64 = 1.0e-4;
/// Misses draw the laser out to this distance.
pub const LASER_RANGE: f32 = 100.0;
pub const LASER_VISIBLE_SECONDS: f32 = 0.25;
/// The UFO never strays further than this from the Sun.
pub const UFO_MAX_RADIUS: f32 = 120.0;
/// Path phase advanced per second of combat time.
pub const UFO_PHASE_RATE: f32 = 1.32;
pub const UFO_MODEL_SCALE: f32 = 0.09;
/// Hit radius used when the UFO model is unavailable.
pub const UFO_FALLBACK_RADIUS: f32 = 3.0;

const PATH_BASE_Y: f32 = 18.0;
const PATH_AMPLITUDE_Y: f32 = 22.0;
const PATH_SPREAD: f32 = UFO_MAX_RADIUS * 0.9;

/// Position on the UFO's closed flight path at `phase`, rescaled onto the
/// bounding sphere when it would leave it.
pub fn ufo_path(phase: f32) -> Vec3 {
    let t = phase;
    let x = (t * 1.2 + (t * 0.3).sin()).cos() * PATH_SPREAD * (t * 0.2 + (t * 0.13).cos()).sin();
    let y = PATH_BASE_Y + (t * 1.1 + (t * 0.5).cos()).sin() * PATH_AMPLITUDE_Y;
    let z = (t * 0.9 + (t * 0.2).cos()).sin() * PATH_SPREAD * (t * 0.2 + (t * 0.11).sin()).cos();
    let p = Vec3::new(x, y, z);
    let distance = p.length();
    if distance > UFO_MAX_RADIUS {
        p * (UFO_MAX_RADIUS / distance)
    } else {
        p
    }
}

/// Spin about +Y that follows the path phase.
pub fn ufo_yaw(phase: f32) -> f32 {
    phase * 1.2 + std::f32::consts::PI
}

/// A drawn laser beam. Cosmetic only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaserShot {
    pub origin: Vec3,
    pub endpoint: Vec3,
    pub hit: bool,
    lifetime: Lifetime,
}

impl LaserShot {
    pub fn remaining(&self) -> f32 {
        self.lifetime.remaining.max(0.0)
    }
}

/// What a hit attempt did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitOutcome {
    Damaged { health: f32 },
    /// This hit took the UFO to zero.
    Defeated,
    /// Inside the cooldown window; dropped.
    Cooldown,
    /// UFO already down or absent.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct CombatController {
    health: Health,
    active: bool,
    weapon_active: bool,
    /// Seconds since the encounter began, summed in f64.
    combat_time: f64,
    phase: f32,
    last_hit: Option<f64>,
    laser: Option<LaserShot>,
}

impl Default for CombatController {
    fn default() -> Self {
        Self::new()
    }
}

impl CombatController {
    pub fn new() -> Self {
        Self {
            health: Health::new(UFO_MAX_HEALTH),
            active: false,
            weapon_active: false,
            combat_time: 0.0,
            phase: 0.0,
            last_hit: None,
            laser: None,
        }
    }

    /// Bring the UFO in at full health.
    pub fn begin(&mut self) {
        *self = Self::new();
        self.active = true;
        log::info!("UFO inbound with {} health", self.health.current);
    }

    /// Remove the UFO for the rest of the session.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.weapon_active = false;
    }

    pub fn update(&mut self, dt: f32) {
        if self.active {
            self.combat_time += f64::from(dt);
            self.phase += UFO_PHASE_RATE * dt;
        }
        if let Some(laser) = &mut self.laser {
            if laser.lifetime.update(dt) {
                self.laser = None;
            }
        }
    }

    /// Flip weapon mode. Returns the new state, or `None` with no UFO present.
    pub fn toggle_weapon(&mut self) -> Option<bool> {
        if !self.active {
            return None;
        }
        self.weapon_active = !self.weapon_active;
        Some(self.weapon_active)
    }

    /// Fire along `direction`. `hit_point` is where the ray met the UFO, if
    /// it did. Returns `None` unless the weapon is armed.
    pub fn fire(&mut self, origin: Vec3, direction: Vec3, hit_point: Option<Vec3>) -> Option<HitOutcome> {
        if !self.active || !self.weapon_active {
            return None;
        }
        let endpoint = hit_point.unwrap_or(origin + direction.normalize_or_zero() * LASER_RANGE);
        self.laser = Some(LaserShot {
            origin,
            endpoint,
            hit: hit_point.is_some(),
            lifetime: Lifetime::new(LASER_VISIBLE_SECONDS),
        });
        Some(match hit_point {
            Some(_) => self.register_hit(),
            None => HitOutcome::Ignored,
        })
    }

    /// Apply one hit, honoring the cooldown.
    pub fn register_hit(&mut self) -> HitOutcome {
        if !self.active || self.health.is_dead() {
            return HitOutcome::Ignored;
        }
        if self.in_cooldown() {
            return HitOutcome::Cooldown;
        }
        self.last_hit = Some(self.combat_time);
        if self.health.take_damage(HIT_DAMAGE) {
            self.deactivate();
            log::info!("UFO destroyed");
            HitOutcome::Defeated
        } else {
            log::debug!("UFO hit, {} health left", self.health.current);
            HitOutcome::Damaged {
                health: self.health.current,
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_weapon_active(&self) -> bool {
        self.weapon_active
    }

    pub fn health(&self) -> Health {
        self.health
    }

    pub fn ufo_position(&self) -> Vec3 {
        ufo_path(self.phase)
    }

    pub fn ufo_yaw(&self) -> f32 {
        ufo_yaw(self.phase)
    }

    pub fn laser(&self) -> Option<&LaserShot> {
        self.laser.as_ref()
    }

    /// True for one cooldown window after an accepted hit.
    pub fn is_hit_flashing(&self) -> bool {
        self.in_cooldown()
    }

    fn in_cooldown(&self) -> bool {
        self.last_hit
            .map(|t| self.combat_time - t + COOLDOWN_EPSILON < f64::from(HIT_COOLDOWN))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn armed() -> CombatController {
        let mut combat = CombatController::new();
        combat.begin();
        assert_eq!(combat.toggle_weapon(), Some(true));
        combat
    }

    #[test]
    fn ufo_stays_inside_bounding_sphere() {
        let mut phase = 0.0;
        while phase < 5_000.0 {
            assert!(ufo_path(phase).length() <= UFO_MAX_RADIUS + 1e-3, "phase {}", phase);
            phase += 0.173;
        }
    }

    #[test]
    fn ufo_moves_with_combat_time() {
        let mut combat = CombatController::new();
        combat.begin();
        let start = combat.ufo_position();
        combat.update(1.0);
        assert!(combat.ufo_position().distance(start) > 1.0);
    }

    #[test]
    fn hits_inside_cooldown_are_dropped() {
        let mut combat = armed();
        assert_eq!(combat.register_hit(), HitOutcome::Damaged { health: 380.0 });
        combat.update(0.3);
        assert_eq!(combat.register_hit(), HitOutcome::Cooldown);
        assert_eq!(combat.health().current, 380.0);
        combat.update(0.25);
        assert_eq!(combat.register_hit(), HitOutcome::Damaged { health: 360.0 });
    }

    #[test]
    fn hit_exactly_one_cooldown_later_lands() {
        let mut combat = armed();
        combat.update(7.3);
        assert_eq!(combat.register_hit(), HitOutcome::Damaged { health: 380.0 });
        for _ in 0..5 {
            combat.update(0.1);
        }
        assert_eq!(combat.register_hit(), HitOutcome::Damaged { health: 360.0 });

        for _ in 0..30 {
            combat.update(1.0 / 60.0);
        }
        assert_eq!(combat.register_hit(), HitOutcome::Damaged { health: 340.0 });
    }

    #[test]
    fn twenty_spaced_hits_defeat_exactly_once() {
        let mut combat = armed();
        let mut defeats = 0;
        for i in 0..25 {
            let outcome = combat.register_hit();
            if outcome == HitOutcome::Defeated {
                defeats += 1;
                assert_eq!(i, 19);
            }
            combat.update(0.6);
        }
        assert_eq!(defeats, 1);
        assert_eq!(combat.health().current, 0.0);
        assert!(!combat.is_active());
        assert_eq!(combat.register_hit(), HitOutcome::Ignored);
    }

    #[test]
    fn miss_draws_laser_to_max_range() {
        let mut combat = armed();
        let outcome = combat.fire(Vec3::ZERO, Vec3::NEG_Z, None);
        assert_eq!(outcome, Some(HitOutcome::Ignored));
        let laser = combat.laser().unwrap();
        assert!(!laser.hit);
        assert!((laser.endpoint - Vec3::new(0.0, 0.0, -LASER_RANGE)).length() < 1e-4);
        assert_eq!(combat.health().current, UFO_MAX_HEALTH);
    }

    #[test]
    fn laser_fades_after_quarter_second() {
        let mut combat = armed();
        combat.fire(Vec3::ZERO, Vec3::X, Some(Vec3::new(10.0, 0.0, 0.0)));
        combat.update(0.2);
        assert!(combat.laser().is_some());
        combat.update(0.1);
        assert!(combat.laser().is_none());
    }

    #[test]
    fn unarmed_fire_does_nothing() {
        let mut combat = CombatController::new();
        combat.begin();
        assert_eq!(combat.fire(Vec3::ZERO, Vec3::X, Some(Vec3::X)), None);
        assert!(combat.laser().is_none());
    }

    #[test]
    fn weapon_toggles_back_and_forth() {
        let mut combat = armed();
        assert_eq!(combat.toggle_weapon(), Some(false));
        assert_eq!(combat.toggle_weapon(), Some(true));
        combat.deactivate();
        assert_eq!(combat.toggle_weapon(), None);
    }

    #[test]
    fn hit_flash_lasts_one_cooldown() {
        let mut combat = armed();
        combat.register_hit();
        assert!(combat.is_hit_flashing());
        combat.update(0.5);
        assert!(!combat.is_hit_flashing());
    }
}
