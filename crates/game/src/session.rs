//! The mode orchestrator. Owns every gameplay controller and routes each
//! frame's input to the ones the current mode allows.
//!
//! A frame applies discrete input first (keys, clicks), then advances
//! continuous state (timers, flight, reveal, UFO, fades), so whatever the
//! player did is visible in the same frame.

use crate::catalog::BodyCatalog;
use crate::combat::{CombatController, HitOutcome};
use crate::config::GameConfig;
use crate::dialog::{DialogController, DialogEvent};
use crate::flight::{FlightController, FlightEvent};
use crate::messages::GameMessages;
use crate::mode::{InteractionMode, Resume};
use crate::quest::QuestTracker;
use crate::scene::UfoPose;
use crate::targeting::{camera_forward_ray, resolve_click, ClickAction, SceneQuery};
use audio::{AudioDirector, Cue, Layer};
use engine_core::Scheduler;
use glam::Vec3;
use input::InputState;
use physics::Ray;

/// Delay between the quest popup and the UFO warning.
pub const QUEST_WARNING_DELAY: f32 = 5.0;
/// Pointer capture engages this long after start or after a modal closes.
pub const POINTER_AUTO_LOCK_DELAY: f32 = 0.5;
pub const BATTLE_FADE_SECONDS: f32 = 0.4;
pub const VICTORY_FADE_SECONDS: f32 = 1.75;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Timer {
    QuestWarning,
    PointerAutoLock,
}

/// Notable things that happened during a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    ModeChanged {
        from: InteractionMode,
        to: InteractionMode,
    },
    Discovered(String),
    QuestCompleted,
    UfoHit { health: f32 },
    Victory,
    Restarted,
}

pub struct Session {
    catalog: BodyCatalog,
    mode: InteractionMode,
    flight: FlightController,
    dialog: DialogController,
    quest: QuestTracker,
    combat: CombatController,
    audio: AudioDirector,
    messages: GameMessages,
    timers: Scheduler<Timer>,
    quest_celebrated: bool,
    sensitivity: f32,
    events: Vec<SessionEvent>,
}

impl Session {
    pub fn new(catalog: BodyCatalog, config: &GameConfig, audio: AudioDirector) -> Self {
        let quest = QuestTracker::new(catalog.names());
        let mut session = Self {
            catalog,
            mode: InteractionMode::Flying,
            flight: FlightController::new(config.sensitivity),
            dialog: DialogController::new(config.typewriter_cps),
            quest,
            combat: CombatController::new(),
            audio,
            messages: GameMessages::new(),
            timers: Scheduler::new(),
            quest_celebrated: false,
            sensitivity: config.sensitivity,
            events: Vec::new(),
        };
        session.audio.set_master_volume(config.master_volume);
        session.audio.start_ambient();
        session
            .timers
            .schedule_once(Timer::PointerAutoLock, POINTER_AUTO_LOCK_DELAY);
        session
    }

    /// Run one frame and return what happened.
    pub fn update(&mut self, input: &InputState, scene: &dyn SceneQuery, dt: f32) -> Vec<SessionEvent> {
        if input.any_pressed() {
            self.audio.notify_user_input();
        }
        self.handle_input(input, scene);

        for timer in self.timers.advance(dt) {
            self.fire_timer(timer);
        }
        if let Some(event) = self.flight.update(&input.flight_input(), dt) {
            self.on_flight_event(event);
        }
        if let Some(event) = self.dialog.update(dt) {
            self.on_dialog_event(event);
        }
        self.combat.update(dt);
        self.audio.update(dt);
        self.messages.update(dt);

        std::mem::take(&mut self.events)
    }

    fn handle_input(&mut self, input: &InputState, scene: &dyn SceneQuery) {
        if input.is_release_pressed() {
            self.set_captured(false);
        }

        if self.mode == InteractionMode::Victory {
            if input.is_retry_pressed() {
                self.restart();
            } else if input.is_continue_pressed() {
                self.set_mode(InteractionMode::ExploreOnly);
            }
            return;
        }

        if input.is_weapon_toggle_pressed() {
            self.toggle_weapon();
        }
        if input.is_dismiss_pressed() {
            self.dismiss_dialog();
        }
        if input.is_primary_click() {
            if !self.flight.is_captured() {
                self.set_captured(true);
                return;
            }
            let ray = camera_forward_ray(self.flight.camera());
            match resolve_click(self.mode, self.combat.is_weapon_active(), scene, ray) {
                ClickAction::Select(name) => self.open_dialog(&name),
                ClickAction::Fire { ray, hit } => self.fire(ray, hit),
                ClickAction::None => {}
            }
        }
    }

    fn fire_timer(&mut self, timer: Timer) {
        match timer {
            Timer::QuestWarning => {
                if self.mode == InteractionMode::QuestCelebration {
                    self.begin_encounter();
                }
            }
            Timer::PointerAutoLock => self.set_captured(true),
        }
    }

    fn set_mode(&mut self, to: InteractionMode) {
        let from = self.mode;
        if from == to {
            return;
        }
        self.mode = to;
        log::info!("Mode {} -> {}", from.name(), to.name());

        if from == InteractionMode::QuestCelebration {
            self.timers.cancel(Timer::QuestWarning);
        }
        if to.is_modal() {
            self.timers.cancel(Timer::PointerAutoLock);
            self.set_captured(false);
        } else if from.is_modal() {
            self.timers
                .schedule_once(Timer::PointerAutoLock, POINTER_AUTO_LOCK_DELAY);
        }
        self.events.push(SessionEvent::ModeChanged { from, to });
    }

    /// Engage or release flight control. Engaging is refused behind a modal overlay.
    fn set_captured(&mut self, captured: bool) {
        if captured && self.mode.is_modal() {
            return;
        }
        if captured {
            self.timers.cancel(Timer::PointerAutoLock);
        }
        if let Some(event) = self.flight.set_captured(captured) {
            self.on_flight_event(event);
        }
    }

    fn on_flight_event(&mut self, event: FlightEvent) {
        match event {
            FlightEvent::MovementChanged { moving: true, boosting } => {
                self.audio.set_boost(boosting);
                self.audio.play_movement();
            }
            FlightEvent::MovementChanged { moving: false, .. } => {
                self.audio.stop_movement();
                self.audio.set_boost(false);
            }
            FlightEvent::BoostChanged { boosting } => self.audio.set_boost(boosting),
        }
    }

    fn on_dialog_event(&mut self, event: DialogEvent) {
        match event {
            DialogEvent::RevealStarted => self.audio.start_typewriter(),
            DialogEvent::RevealCompleted => self.audio.stop_typewriter(),
        }
    }

    fn open_dialog(&mut self, name: &str) {
        let description = match self.catalog.get(name) {
            Some(body) => body.description.clone(),
            None => {
                log::warn!("Clicked unknown body {}", name);
                return;
            }
        };
        self.audio.play_cue(Cue::Click);

        let resume = if self.mode == InteractionMode::ExploreOnly {
            Resume::ExploreOnly
        } else {
            Resume::Flying
        };
        if resume == Resume::Flying && self.quest.register_discovery(name) {
            self.messages.info(format!(
                "Discovered {} ({}/{})",
                name,
                self.quest.discovered_count(),
                self.quest.target_count()
            ));
            self.events.push(SessionEvent::Discovered(name.to_string()));
        }

        for event in self.dialog.open(name, &description) {
            self.on_dialog_event(event);
        }
        self.set_mode(InteractionMode::ReadingDialog { resume });
    }

    fn dismiss_dialog(&mut self) {
        let InteractionMode::ReadingDialog { resume } = self.mode else {
            return;
        };
        if self.dialog.close().is_none() {
            return;
        }
        self.audio.stop_typewriter();

        if resume == Resume::Flying && self.quest.is_complete() && !self.quest_celebrated {
            self.quest_celebrated = true;
            self.set_mode(InteractionMode::QuestCelebration);
            self.audio.play_cue(Cue::QuestCompleted);
            self.messages.success("Quest complete: every body discovered!");
            self.timers
                .schedule_once(Timer::QuestWarning, QUEST_WARNING_DELAY);
            self.events.push(SessionEvent::QuestCompleted);
        } else {
            self.set_mode(resume.mode());
        }
    }

    fn begin_encounter(&mut self) {
        self.combat.begin();
        self.set_mode(InteractionMode::Warning);
        self.audio.play_cue(Cue::Warning);
        self.audio
            .crossfade(Layer::Ambient, Layer::Battle, BATTLE_FADE_SECONDS);
        self.messages
            .warning("Warning: UFO approaching! Press F to arm the laser.");
    }

    fn toggle_weapon(&mut self) {
        if !self.mode.is_encounter() {
            return;
        }
        match self.combat.toggle_weapon() {
            Some(true) => self.set_mode(InteractionMode::Combat),
            Some(false) => self.set_mode(InteractionMode::Warning),
            None => {}
        }
    }

    fn fire(&mut self, ray: Ray, hit: Option<Vec3>) {
        self.audio.play_cue(Cue::Laser);
        match self.combat.fire(ray.origin, ray.direction, hit) {
            Some(HitOutcome::Damaged { health }) => {
                self.events.push(SessionEvent::UfoHit { health });
            }
            Some(HitOutcome::Defeated) => {
                self.events.push(SessionEvent::UfoHit { health: 0.0 });
                self.enter_victory();
            }
            _ => {}
        }
    }

    fn enter_victory(&mut self) {
        self.set_mode(InteractionMode::Victory);
        self.audio.play_cue(Cue::Victory);
        self.audio
            .crossfade(Layer::Battle, Layer::Ambient, VICTORY_FADE_SECONDS);
        self.messages.success("UFO destroyed!");
        self.events.push(SessionEvent::Victory);
    }

    /// Start over as if freshly launched.
    fn restart(&mut self) {
        log::info!("Restarting session");
        self.set_captured(false);
        let from = self.mode;
        self.mode = InteractionMode::Flying;
        self.flight = FlightController::new(self.sensitivity);
        self.dialog.reset();
        self.quest = QuestTracker::new(self.catalog.names());
        self.combat = CombatController::new();
        self.messages.clear();
        self.timers.clear();
        self.quest_celebrated = false;
        self.audio.reset();
        self.timers
            .schedule_once(Timer::PointerAutoLock, POINTER_AUTO_LOCK_DELAY);
        self.events.push(SessionEvent::ModeChanged {
            from,
            to: InteractionMode::Flying,
        });
        self.events.push(SessionEvent::Restarted);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.flight.set_aspect(width, height);
    }

    pub fn ufo_pose(&self) -> UfoPose {
        UfoPose {
            position: self.combat.ufo_position(),
            yaw: self.combat.ufo_yaw(),
            visible: self.combat.is_active(),
        }
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn pointer_captured(&self) -> bool {
        self.flight.is_captured()
    }

    pub fn flight(&self) -> &FlightController {
        &self.flight
    }

    pub fn dialog(&self) -> &DialogController {
        &self.dialog
    }

    pub fn quest(&self) -> &QuestTracker {
        &self.quest
    }

    pub fn combat(&self) -> &CombatController {
        &self.combat
    }

    pub fn audio(&self) -> &AudioDirector {
        &self.audio
    }

    pub fn messages(&self) -> &GameMessages {
        &self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::UFO_MAX_HEALTH;
    use crate::quest::QUEST_BODIES;
    use audio::SilentBackend;
    use input::{ElementState, KeyCode, MouseButton};

    #[derive(Default)]
    struct StubScene {
        body: Option<String>,
        ufo_hit: bool,
    }

    impl SceneQuery for StubScene {
        fn resolve_click_target(&self, _ray: &Ray) -> Option<String> {
            self.body.clone()
        }

        fn raycast_ufo(&self, ray: &Ray) -> Option<Vec3> {
            self.ufo_hit.then(|| ray.point_at(30.0))
        }
    }

    struct Harness {
        session: Session,
        input: InputState,
        scene: StubScene,
        events: Vec<SessionEvent>,
    }

    impl Harness {
        fn new() -> Self {
            let audio = AudioDirector::new(Box::new(SilentBackend));
            Self {
                session: Session::new(BodyCatalog::solar_system().unwrap(), &GameConfig::default(), audio),
                input: InputState::new(),
                scene: StubScene::default(),
                events: Vec::new(),
            }
        }

        fn step(&mut self, dt: f32) {
            let events = self.session.update(&self.input, &self.scene, dt);
            self.events.extend(events);
            self.input.begin_frame();
        }

        fn tap(&mut self, key: KeyCode) {
            self.input.process_keyboard(key, ElementState::Pressed);
            self.step(0.016);
            self.input.process_keyboard(key, ElementState::Released);
        }

        fn click(&mut self) {
            self.input
                .process_mouse_button(MouseButton::Left, ElementState::Pressed);
            self.step(0.016);
            self.input
                .process_mouse_button(MouseButton::Left, ElementState::Released);
        }

        /// Click a body, let the text finish, dismiss, and wait for the pointer.
        fn inspect(&mut self, name: &str) {
            self.scene.body = Some(name.to_string());
            self.click();
            assert!(matches!(self.session.mode(), InteractionMode::ReadingDialog { .. }));
            self.step(10.0);
            self.tap(KeyCode::Space);
            self.scene.body = None;
        }

        fn count(&self, wanted: &SessionEvent) -> usize {
            self.events.iter().filter(|e| *e == wanted).count()
        }

        fn play_until_warning(&mut self) {
            self.step(POINTER_AUTO_LOCK_DELAY + 0.1);
            for name in QUEST_BODIES {
                self.inspect(name);
                if self.session.mode() != InteractionMode::QuestCelebration {
                    self.step(POINTER_AUTO_LOCK_DELAY + 0.1);
                }
            }
            self.step(QUEST_WARNING_DELAY);
            self.step(0.5);
            assert_eq!(self.session.mode(), InteractionMode::Warning);
        }

        fn defeat_ufo(&mut self) {
            self.tap(KeyCode::KeyF);
            assert_eq!(self.session.mode(), InteractionMode::Combat);
            self.scene.ufo_hit = true;
            for _ in 0..20 {
                self.click();
                self.step(0.584);
            }
        }
    }

    #[test]
    fn pointer_auto_locks_after_start() {
        let mut h = Harness::new();
        h.step(0.2);
        assert!(!h.session.pointer_captured());
        h.step(0.4);
        assert!(h.session.pointer_captured());
    }

    #[test]
    fn click_without_capture_only_recaptures() {
        let mut h = Harness::new();
        h.scene.body = Some("Mars".into());
        h.click();
        assert!(h.session.pointer_captured());
        assert_eq!(h.session.mode(), InteractionMode::Flying);
        assert_eq!(h.session.quest().discovered_count(), 0);
    }

    #[test]
    fn dialog_releases_pointer_and_blocks_early_dismiss() {
        let mut h = Harness::new();
        h.step(0.6);
        h.scene.body = Some("Earth".into());
        h.click();
        assert!(!h.session.pointer_captured());
        assert!(h.session.audio().channel(Layer::Typewriter).is_playing);

        h.tap(KeyCode::Space);
        assert!(matches!(h.session.mode(), InteractionMode::ReadingDialog { .. }));

        h.step(10.0);
        assert!(!h.session.audio().channel(Layer::Typewriter).is_playing);
        h.tap(KeyCode::Space);
        assert_eq!(h.session.mode(), InteractionMode::Flying);
        h.step(0.6);
        assert!(h.session.pointer_captured());
    }

    #[test]
    fn mouse_look_turns_the_camera_in_the_same_frame() {
        let mut h = Harness::new();
        h.step(0.6);
        h.input.set_cursor_locked(true);
        let yaw = h.session.flight().camera().yaw();
        h.input.process_mouse_motion((40.0, 0.0));
        h.step(0.016);
        assert!(h.session.flight().camera().yaw() < yaw);
    }

    #[test]
    fn flying_with_capture_drives_movement_audio() {
        let mut h = Harness::new();
        h.step(0.6);
        h.input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        h.step(0.1);
        assert!(h.session.audio().channel(Layer::Movement).is_playing);
        assert!(h.session.flight().camera().position().z < crate::flight::START_POSITION.z);

        h.tap(KeyCode::Escape);
        assert!(!h.session.pointer_captured());
        assert!(!h.session.audio().channel(Layer::Movement).is_playing);
    }

    #[test]
    fn nine_bodies_do_not_complete_the_quest() {
        let mut h = Harness::new();
        h.step(0.6);
        for name in QUEST_BODIES.iter().skip(1) {
            h.inspect(name);
            h.step(0.6);
        }
        h.inspect("Mars");
        assert_eq!(h.session.mode(), InteractionMode::Flying);
        assert_eq!(h.count(&SessionEvent::QuestCompleted), 0);
    }

    #[test]
    fn completing_the_quest_leads_to_warning_after_delay() {
        let mut h = Harness::new();
        h.step(0.6);
        for name in QUEST_BODIES {
            h.inspect(name);
            if h.session.mode() == InteractionMode::Flying {
                h.step(0.6);
            }
        }
        assert_eq!(h.session.mode(), InteractionMode::QuestCelebration);
        assert_eq!(h.count(&SessionEvent::QuestCompleted), 1);

        h.step(4.0);
        assert_eq!(h.session.mode(), InteractionMode::QuestCelebration);
        h.step(1.0);
        assert_eq!(h.session.mode(), InteractionMode::Warning);
        assert_eq!(h.session.combat().health().current, UFO_MAX_HEALTH);
        assert!(h.session.ufo_pose().visible);

        h.step(0.5);
        let audio = h.session.audio();
        assert!(audio.channel(Layer::Battle).is_playing);
        assert!(!audio.channel(Layer::Ambient).is_playing);
    }

    #[test]
    fn weapon_key_toggles_between_warning_and_combat() {
        let mut h = Harness::new();
        h.play_until_warning();
        h.tap(KeyCode::KeyF);
        assert_eq!(h.session.mode(), InteractionMode::Combat);
        h.tap(KeyCode::KeyF);
        assert_eq!(h.session.mode(), InteractionMode::Warning);
        assert!(h.session.combat().is_active());
    }

    #[test]
    fn weapon_key_outside_encounter_is_ignored() {
        let mut h = Harness::new();
        h.step(0.6);
        h.tap(KeyCode::KeyF);
        assert_eq!(h.session.mode(), InteractionMode::Flying);
        assert!(!h.session.combat().is_weapon_active());
    }

    #[test]
    fn twenty_hits_win_exactly_once() {
        let mut h = Harness::new();
        h.play_until_warning();
        h.defeat_ufo();

        assert_eq!(h.session.mode(), InteractionMode::Victory);
        assert_eq!(h.session.combat().health().current, 0.0);
        assert_eq!(h.count(&SessionEvent::Victory), 1);
        assert!(!h.session.pointer_captured());
        assert!(!h.session.ufo_pose().visible);

        h.click();
        h.click();
        assert_eq!(h.count(&SessionEvent::Victory), 1);

        h.step(2.0);
        let audio = h.session.audio();
        assert!(audio.channel(Layer::Ambient).is_playing);
        assert!(!audio.channel(Layer::Battle).is_playing);
    }

    #[test]
    fn rapid_fire_is_limited_by_cooldown() {
        let mut h = Harness::new();
        h.play_until_warning();
        h.tap(KeyCode::KeyF);
        h.scene.ufo_hit = true;
        for _ in 0..10 {
            h.click();
        }
        assert_eq!(h.session.combat().health().current, UFO_MAX_HEALTH - 20.0);
    }

    #[test]
    fn explore_only_never_retriggers_the_quest() {
        let mut h = Harness::new();
        h.play_until_warning();
        h.defeat_ufo();
        h.tap(KeyCode::KeyC);
        assert_eq!(h.session.mode(), InteractionMode::ExploreOnly);
        h.step(0.6);
        assert!(h.session.pointer_captured());

        let before = h.session.quest().discovered_count();
        for name in QUEST_BODIES {
            h.inspect(name);
            assert_eq!(h.session.mode(), InteractionMode::ExploreOnly);
            h.step(QUEST_WARNING_DELAY + 1.0);
        }
        assert_eq!(h.session.quest().discovered_count(), before);
        assert_eq!(h.count(&SessionEvent::QuestCompleted), 1);
        assert!(!h.session.ufo_pose().visible);
        assert_eq!(h.session.mode(), InteractionMode::ExploreOnly);
    }

    #[test]
    fn retry_starts_a_fresh_session() {
        let mut h = Harness::new();
        h.play_until_warning();
        h.defeat_ufo();
        h.tap(KeyCode::KeyR);

        assert_eq!(h.count(&SessionEvent::Restarted), 1);
        assert_eq!(h.session.mode(), InteractionMode::Flying);
        assert_eq!(h.session.quest().discovered_count(), 0);
        assert!(!h.session.combat().is_active());
        assert!(!h.session.dialog().is_open());
        assert!(h.session.audio().channel(Layer::Ambient).is_playing);
        assert!(!h.session.audio().channel(Layer::Battle).is_playing);
        h.step(0.6);
        assert!(h.session.pointer_captured());
    }
}
