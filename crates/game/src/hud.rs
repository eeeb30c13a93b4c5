//! Per-frame HUD snapshot: everything the overlay draws, read from the session.

use crate::combat::{LaserShot, LASER_VISIBLE_SECONDS};
use crate::mode::{InteractionMode, Overlay};
use crate::session::Session;
use glam::{Vec2, Vec3};

/// One world unit expressed in kilometres, for the speed readout.
pub const KM_PER_UNIT: f32 = 1_500_000.0;
/// Pixels between the UFO and its health readout.
pub const UFO_LABEL_OFFSET: f32 = 40.0;
const GAUGE_STEP: f32 = 0.016;
const GAUGE_APPROACH: f32 = 0.2;
const GAUGE_SNAP: f32 = 1.0;

/// Smoothed speed readout: approaches the target by a fixed fraction every
/// step and snaps once close.
#[derive(Debug, Clone, Default)]
pub struct SpeedGauge {
    displayed: f32,
    accumulator: f32,
}

impl SpeedGauge {
    pub fn update(&mut self, target: f32, dt: f32) -> f32 {
        self.accumulator += dt;
        while self.accumulator >= GAUGE_STEP {
            self.accumulator -= GAUGE_STEP;
            let diff = target - self.displayed;
            if diff.abs() < GAUGE_SNAP {
                self.displayed = target;
            } else {
                self.displayed += diff * GAUGE_APPROACH;
            }
        }
        self.displayed
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DialogView {
    pub title: String,
    pub text: String,
    /// Shown once the text is complete.
    pub dismiss_hint: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UfoHealthView {
    pub current: f32,
    pub fraction: f32,
    /// Where the overhead readout goes; `None` while the UFO is behind the camera.
    pub screen_position: Option<Vec2>,
    pub flashing: bool,
}

/// The laser beam as drawn: fades out over its visible lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaserView {
    pub origin: Vec3,
    pub endpoint: Vec3,
    pub hit: bool,
    /// 1.0 when fired, 0.0 when the beam disappears.
    pub opacity: f32,
}

impl From<&LaserShot> for LaserView {
    fn from(shot: &LaserShot) -> Self {
        Self {
            origin: shot.origin,
            endpoint: shot.endpoint,
            hit: shot.hit,
            opacity: (shot.remaining() / LASER_VISIBLE_SECONDS).clamp(0.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HudSnapshot {
    pub mode: InteractionMode,
    /// Quest checklist, hidden during post-victory exploration.
    pub checklist: Option<Vec<(String, bool)>>,
    pub dialog: Option<DialogView>,
    pub banner: Option<&'static str>,
    pub ufo: Option<UfoHealthView>,
    pub crosshair_armed: bool,
    pub speed_km_s: f32,
    pub laser: Option<LaserView>,
    pub messages: Vec<String>,
    pub pointer_captured: bool,
}

#[derive(Debug, Default)]
pub struct Hud {
    gauge: SpeedGauge,
}

impl Hud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, session: &Session, viewport: Vec2, dt: f32) -> HudSnapshot {
        let mode = session.mode();
        let speed_km_s = self.gauge.update(session.flight().speed() * KM_PER_UNIT, dt);

        let checklist = (!mode.is_explore_only()).then(|| session.quest().checklist());

        let dialog = session.dialog().session().map(|d| DialogView {
            title: d.subject.clone(),
            text: d.revealed_text().to_string(),
            dismiss_hint: d.is_complete(),
        });

        let combat = session.combat();
        let ufo = combat.is_active().then(|| {
            let health = combat.health();
            UfoHealthView {
                current: health.current,
                fraction: health.percentage(),
                screen_position: ufo_label_position(session, viewport),
                flashing: combat.is_hit_flashing(),
            }
        });

        HudSnapshot {
            mode,
            checklist,
            dialog,
            banner: mode.overlay().and_then(banner_text),
            ufo,
            crosshair_armed: combat.is_weapon_active(),
            speed_km_s,
            laser: combat.laser().map(LaserView::from),
            messages: session
                .messages()
                .visible()
                .iter()
                .map(|m| m.text.clone())
                .collect(),
            pointer_captured: session.pointer_captured(),
        }
    }
}

fn ufo_label_position(session: &Session, viewport: Vec2) -> Option<Vec2> {
    session
        .flight()
        .camera()
        .world_to_screen(session.combat().ufo_position(), viewport)
        .map(|p| p - Vec2::new(0.0, UFO_LABEL_OFFSET))
}

fn banner_text(overlay: Overlay) -> Option<&'static str> {
    match overlay {
        Overlay::Dialog => None,
        Overlay::QuestPopup => Some("Quest complete! Every body in the solar system discovered."),
        Overlay::WarningPopup => Some("WARNING: UFO detected! Press F to toggle the laser."),
        Overlay::VictoryPopup => Some("Victory! [Enter/C] keep exploring   [R] retry"),
    }
}

/// One-line summary for the window title.
pub fn status_line(hud: &HudSnapshot) -> String {
    let mut line = format!("Solar Quest | {} | {:.0} km/s", hud.mode.name(), hud.speed_km_s);
    if let Some(checklist) = &hud.checklist {
        let found = checklist.iter().filter(|(_, d)| *d).count();
        line.push_str(&format!(" | discovered {}/{}", found, checklist.len()));
    }
    if let Some(ufo) = &hud.ufo {
        line.push_str(&format!(" | UFO {:.0}", ufo.current));
    }
    if let Some(dialog) = &hud.dialog {
        line.push_str(&format!(" | {}", dialog.title));
        if dialog.dismiss_hint {
            line.push_str(" [Space]");
        }
    }
    if let Some(banner) = hud.banner {
        line.push_str(&format!(" | {}", banner));
    }
    if let Some(message) = hud.messages.last() {
        line.push_str(&format!(" | {}", message));
    }
    if !hud.pointer_captured && !hud.mode.is_modal() {
        line.push_str(" | click to fly");
    }
    line
}
