//! Solar Quest - first-person flight through a stylized solar system, with a
//! discovery quest and a UFO encounter at the end.

mod catalog;
mod combat;
mod config;
mod dialog;
mod events;
mod flight;
mod hud;
mod messages;
mod mode;
mod quest;
mod scene;
mod session;
mod targeting;

use anyhow::Result;
use audio::{AudioBackend, AudioDirector, KiraBackend, SilentBackend};
use catalog::BodyCatalog;
use config::GameConfig;
use engine_core::Time;
use glam::Vec2;
use hud::Hud;
use input::InputState;
use scene::Scene;
use session::{Session, SessionEvent};
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Fullscreen, Window, WindowId},
};

/// How often the window title is refreshed with the HUD line.
const TITLE_REFRESH_SECONDS: f32 = 0.1;

/// Everything the running game owns.
pub struct GameState {
    window: Arc<Window>,
    time: Time,
    input: InputState,
    scene: Scene,
    session: Session,
    hud: Hud,
    viewport: Vec2,
    title_timer: f32,
    running: bool,
}

impl GameState {
    fn new(window: Arc<Window>, config: &GameConfig) -> Result<Self> {
        let catalog = BodyCatalog::solar_system()?;
        let scene = Scene::new(&catalog, &config.asset_dir);
        let mut labels = Vec::new();
        scene.visit_drawables(|label, _, _| labels.extend(label.map(str::to_string)));
        log::info!(
            "Drawing {} ({} fallback), {} stars",
            labels.join(", "),
            scene.fallback_count(),
            scene.stars().len()
        );

        let backend: Box<dyn AudioBackend> = match KiraBackend::new(&config.asset_dir) {
            Ok(backend) => Box::new(backend),
            Err(e) => {
                log::warn!("Audio unavailable ({}), continuing without sound", e);
                Box::new(SilentBackend)
            }
        };
        let mut session = Session::new(catalog, config, AudioDirector::new(backend));

        let size = window.inner_size();
        session.resize(size.width, size.height);

        Ok(Self {
            window,
            time: Time::new(),
            input: InputState::new(),
            scene,
            session,
            hud: Hud::new(),
            viewport: Vec2::new(size.width as f32, size.height.max(1) as f32),
            title_timer: 0.0,
            running: true,
        })
    }

    /// One frame: session first, then the scene follows the published state.
    fn update(&mut self) {
        self.time.update();
        let dt = self.time.delta_seconds();

        for event in self.session.update(&self.input, &self.scene, dt) {
            match event {
                SessionEvent::ModeChanged { .. } | SessionEvent::UfoHit { .. } => {
                    log::debug!("{:?}", event)
                }
                other => log::info!("{:?}", other),
            }
        }
        self.sync_cursor();
        self.scene.update(dt, self.session.ufo_pose());

        let snapshot = self.hud.update(&self.session, self.viewport, dt);
        self.title_timer -= dt;
        if self.title_timer <= 0.0 {
            self.title_timer = TITLE_REFRESH_SECONDS;
            self.window.set_title(&hud::status_line(&snapshot));
        }

        // Clear input for next frame
        self.input.begin_frame();
    }
}

/// Application handler for winit.
struct App {
    state: Option<GameState>,
}

impl App {
    fn new() -> Self {
        Self { state: None }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            let config = GameConfig::load();
            let window_attrs = Window::default_attributes()
                .with_title("Solar Quest")
                .with_inner_size(winit::dpi::LogicalSize::new(config.window_width, config.window_height))
                .with_fullscreen(config.fullscreen.then_some(Fullscreen::Borderless(None)));

            let window = match event_loop.create_window(window_attrs) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            match GameState::new(window.clone(), &config) {
                Ok(state) => {
                    self.state = Some(state);
                    window.request_redraw();
                }
                Err(e) => {
                    log::error!("Failed to start session: {}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(state) = &mut self.state {
            if state.handle_window_event(event) || !state.running {
                event_loop.exit();
            }
        }
    }

    fn device_event(&mut self, _: &ActiveEventLoop, _: DeviceId, event: DeviceEvent) {
        if let Some(state) = &mut self.state {
            state.handle_device_event(event);
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║                       SOLAR QUEST                        ║");
    println!("╠══════════════════════════════════════════════════════════╣");
    println!("║  W/A/S/D  - Fly             │  Q/E    - Up / down         ║");
    println!("║  Mouse    - Look            │  Shift  - Boost             ║");
    println!("║  Click    - Inspect / fire  │  Space  - Close info        ║");
    println!("║  F        - Toggle laser    │  Escape - Release cursor    ║");
    println!("║  Enter/C  - Keep exploring  │  R      - Retry (victory)   ║");
    println!("╚══════════════════════════════════════════════════════════╝");

    log::info!("Starting Solar Quest");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app)?;

    Ok(())
}
