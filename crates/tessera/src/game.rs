//! # Game Session
//!
//! One connected session: owns the clock, camera, screens and options, and
//! drives every collaborator through its trait.
//!
//! ## Frame
//!
//! ```text
//! on_render_frame(delta)
//! ┌──────────────────────────────────────────────────────────────────┐
//! │ limiter → begin frame → bind index buffer → drain events         │
//! │ focus lost? → pause screen                                       │
//! │ clock.advance ──▶ network, entities, particles, animations       │
//! │               └─▶ camera ticks, maintenance sweep                │
//! │ view ← camera, frustum ← (projection, view)                      │
//! ├──────────────────────── world visible? ──────────────────────────┤
//! │ yes: entities, particles, pick, environment, highlight, map,     │
//! │      selections, weather, names, block input, held item         │
//! │ no:  invalidate pick                                             │
//! ├──────────────────────────────────────────────────────────────────┤
//! │ 2D: fps overlay, HUD (unless hidden), active screen → draw_ui    │
//! │ 3D restore → pending screenshot → end frame                      │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Teardown
//!
//! [`Game::teardown`] is the single exit path. It runs on explicit quit and
//! from `Drop`, releases in reverse acquisition order, and keeps going past
//! failures.

use std::path::PathBuf;

use chrono::Local;
use tessera_core::{
    release_all, ClockConfig, Disposable, DownloadCache, FpsLimitMethod, FpsLimiter, FrameClock,
    TeardownError, TeardownReport, TeardownResult,
};
use tessera_rendering::{
    screenshot, BlendFunc, BlockId, CameraController, CameraKind, CameraSettings, CompareFunc,
    FrameTime, Frustum, IndexBufferId, MatrixMode, PickedPos, Projection,
};
use tessera_shared::{Mat4, SCREENSHOT_DIR};
use tessera_ui::{
    ChatLog, ErrorScreen, Extent, FpsScreen, HudScreen, LoadingScreen, MouseButton, PauseScreen,
    Rect, Screen, ScreenHost, ScreenState, ScreenStateMachine, UIRenderer, WarningScreen,
};

use crate::collaborators::{Collaborators, InputHandler, Window};
use crate::dispatch::TickDispatcher;
use crate::error::{GameError, GameResult, OptionsError};
use crate::events::{self, EventReceiver, EventSender, SessionEvent};
use crate::options::Options;
use crate::stats::{FrameStats, FrameStatsAccumulator};

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Session tunables that are not user options.
#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    /// Frame clock frequencies and maintenance period.
    pub clock: ClockConfig,
    /// Options file.
    pub options_path: PathBuf,
    /// Screenshot output directory.
    pub screenshot_dir: PathBuf,
    /// Server host.
    pub server_address: String,
    /// Server port.
    pub server_port: u16,
    /// How far the player can reach, in blocks.
    pub reach_distance: f32,
    /// Session event queue capacity.
    pub event_capacity: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            clock: ClockConfig::default(),
            options_path: PathBuf::from("options.toml"),
            screenshot_dir: PathBuf::from(SCREENSHOT_DIR),
            server_address: String::from("127.0.0.1"),
            server_port: 25565,
            reach_distance: 5.0,
            event_capacity: events::DEFAULT_CAPACITY,
        }
    }
}

// =============================================================================
// SCREEN HOST
// =============================================================================

/// What the screen state machine may touch outside itself.
struct Host<'a> {
    input: &'a mut dyn InputHandler,
    window: &'a mut dyn Window,
}

impl<'a> Host<'a> {
    fn new(parts: &'a mut Collaborators) -> Self {
        Self {
            input: &mut *parts.input,
            window: &mut *parts.window,
        }
    }
}

impl ScreenHost for Host<'_> {
    fn screen_changed(&mut self, old: Option<&dyn Screen>, new: Option<&dyn Screen>) {
        self.input.screen_changed(old, new);
    }

    fn cursor_visible(&self) -> bool {
        self.window.cursor_visible()
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.window.set_cursor_visible(visible);
    }
}

// =============================================================================
// TEARDOWN
// =============================================================================

/// A named release step over borrowed session state.
struct Scoped<F> {
    name: &'static str,
    release: F,
}

impl<F: FnMut() -> TeardownResult<()>> Disposable for Scoped<F> {
    fn name(&self) -> &str {
        self.name
    }

    fn dispose(&mut self) -> TeardownResult<()> {
        (self.release)()
    }
}

fn persist_error(error: OptionsError) -> TeardownError {
    match error {
        OptionsError::Io { path, source } => TeardownError::Persist {
            what: path.display().to_string(),
            source,
        },
        other => TeardownError::Release {
            resource: String::from("options"),
            reason: other.to_string(),
        },
    }
}

// =============================================================================
// GAME
// =============================================================================

/// A running client session.
pub struct Game {
    config: GameConfig,
    options: Options,
    clock: FrameClock,
    limiter: FpsLimiter,
    camera: CameraController,
    projection: Projection,
    view: Mat4,
    frustum: Frustum,
    picked: PickedPos,
    screens: ScreenStateMachine,
    fps_screen: FpsScreen,
    ui: UIRenderer,
    chat: ChatLog,
    downloads: DownloadCache,
    window_size: Extent,
    default_ib: Option<IndexBufferId>,
    screenshot_requested: bool,
    hide_gui: bool,
    stats: FrameStatsAccumulator,
    events: EventReceiver,
    event_sender: EventSender,
    parts: Collaborators,
    torn_down: bool,
}

impl Game {
    /// Loads options, prepares the backend, shows the loading screen and
    /// starts connecting.
    ///
    /// A refused connection is not an error here: the session starts on the
    /// disconnect screen instead.
    pub fn start(config: GameConfig, mut parts: Collaborators) -> GameResult<Self> {
        let options = Options::load(&config.options_path)?;
        tracing::info!(
            "starting session for {}:{}",
            config.server_address,
            config.server_port
        );

        let default_ib = parts.backend.make_default_index_buffer()?;
        parts.backend.set_depth_test(true, CompareFunc::LessEqual);
        parts
            .backend
            .set_alpha_blend_func(BlendFunc::SourceAlpha, BlendFunc::InvSourceAlpha);
        parts.backend.set_alpha_test_func(CompareFunc::Greater, 0.5);

        let chat = ChatLog::new();
        let mut hud = HudScreen::new(chat.clone(), options.chat_lines());
        hud.init();
        let mut fps_screen = FpsScreen::new();
        fps_screen.init();

        let window_size = parts.window.client_size();
        let mut camera = CameraController::new(CameraSettings {
            field_of_view: options.field_of_view() as f32,
            view_distance: options.view_distance() as f32,
            sensitivity: options.sensitivity() as f32,
        });
        camera.set_viewport(window_size.width, window_size.height);

        let limiter = FpsLimiter::new(options.fps_limit());
        parts.backend.set_vsync(options.fps_limit().uses_vsync());

        let (event_sender, events) = events::channel(config.event_capacity);
        let mut game = Self {
            clock: FrameClock::new(config.clock.clone()),
            config,
            options,
            limiter,
            projection: camera.get_projection(),
            camera,
            view: Mat4::IDENTITY,
            frustum: Frustum::default(),
            picked: PickedPos::default(),
            screens: ScreenStateMachine::new(hud),
            fps_screen,
            ui: UIRenderer::new(),
            chat,
            downloads: DownloadCache::new(),
            window_size,
            default_ib: Some(default_ib),
            screenshot_requested: false,
            hide_gui: false,
            stats: FrameStatsAccumulator::new(),
            events,
            event_sender,
            parts,
            torn_down: false,
        };
        game.apply_options();

        let title = format!(
            "Connecting to {}:{}..",
            game.config.server_address, game.config.server_port
        );
        game.set_new_screen(Some(Box::new(LoadingScreen::new(title, "Waiting for handshake"))));

        let (address, port) = (game.config.server_address.clone(), game.config.server_port);
        if let Err(e) = game.parts.network.connect(&address, port) {
            tracing::error!("connect to {}:{} failed: {}", address, port, e);
            game.disconnect("Failed to connect", &e.to_string());
        }
        Ok(game)
    }

    // =========================================================================
    // FRAME
    // =========================================================================

    /// Renders one frame. `delta` is the wall-clock time since the previous
    /// frame in seconds.
    pub fn on_render_frame(&mut self, delta: f64) -> GameResult<FrameStats> {
        if self.torn_down {
            return Err(GameError::TornDown);
        }

        let slept = self.limiter.throttle(delta * 1000.0);
        self.parts.backend.begin_frame();
        if let Some(ib) = self.default_ib {
            self.parts.backend.bind_index_buffer(ib);
        }
        self.process_events();

        if !self.parts.window.focused() && !self.screens.screen_locked_input() {
            tracing::debug!("window lost focus, pausing");
            self.set_new_screen(Some(Box::new(PauseScreen::new())));
        }

        let report = {
            let parts = &mut self.parts;
            let mut dispatcher = TickDispatcher {
                network: &mut *parts.network,
                entities: &mut *parts.entities,
                particles: &mut *parts.particles,
                animations: &mut *parts.animations,
                camera: &mut self.camera,
                player: &mut *parts.player,
                downloads: &self.downloads,
            };
            self.clock.advance(delta, &mut dispatcher)
        };

        self.parts.backend.clear();
        let t = report.interpolation;
        self.view = self.camera.get_view(&*self.parts.player, t);
        self.parts.backend.set_matrix_mode(MatrixMode::Modelview);
        self.parts.backend.load_matrix(&self.view);
        self.frustum = Frustum::from_matrices(&self.projection.projection, &self.view);

        let world_visible = self.screens.world_visible();
        if world_visible {
            self.render_world(FrameTime { delta, t });
        } else {
            self.picked.set_as_invalid();
        }

        self.render_overlay(delta);

        if self.screenshot_requested {
            self.service_screenshot();
        }
        self.parts.backend.end_frame();

        let stats = FrameStats {
            delta,
            ticks: report.ticks,
            camera_ticks: report.camera_ticks,
            interpolation: t,
            world_visible,
            maintenance_ran: report.maintenance_ran,
            slept_ms: slept.map_or(0, |d| d.as_millis() as u64),
        };
        self.stats.record(&stats);
        Ok(stats)
    }

    fn render_world(&mut self, time: FrameTime) {
        let parts = &mut self.parts;
        parts.scene.render_entities(time);
        parts.scene.render_particles(time);
        self.camera.get_picked_block(
            &*parts.player,
            &*parts.map,
            self.config.reach_distance,
            &mut self.picked,
        );

        parts.scene.render_environment(time);
        if self.picked.valid && !self.hide_gui {
            parts.scene.render_picking(time, &self.picked);
        }
        parts.scene.render_map(time);
        parts.scene.render_selections(time);
        parts.scene.render_weather(time);
        parts.scene.render_entity_names(time);
        if self.options.show_hovered_names() {
            parts.scene.render_hovered_names(time);
        }

        // The input handler decides whether a screen swallows the clicks.
        let left = parts.input.is_mouse_pressed(MouseButton::Left);
        let middle = parts.input.is_mouse_pressed(MouseButton::Middle);
        let right = parts.input.is_mouse_pressed(MouseButton::Right);
        parts.input.pick_blocks(&self.picked, left, middle, right);

        if !self.hide_gui {
            parts.backend.set_matrix_mode(MatrixMode::Projection);
            parts.backend.load_matrix(&self.projection.held_item);
            parts.backend.set_matrix_mode(MatrixMode::Modelview);
            parts.scene.render_held_item(time);
            parts.backend.set_matrix_mode(MatrixMode::Projection);
            parts.backend.load_matrix(&self.projection.projection);
            parts.backend.set_matrix_mode(MatrixMode::Modelview);
        }
    }

    fn render_overlay(&mut self, delta: f64) {
        let size = self.parts.window.client_size();
        self.parts.backend.mode_2d(size);
        self.ui.begin_frame(Rect::window(size.width, size.height));
        self.ui.begin_layer(self.fps_screen.name());
        self.fps_screen.render(delta, &mut self.ui);
        self.screens.render(delta, &mut self.ui);
        self.parts.backend.draw_ui(self.ui.end_frame());
        self.parts.backend.mode_3d();
    }

    fn process_events(&mut self) {
        for event in self.events.drain() {
            match event {
                SessionEvent::Disconnected { title, reason } => self.disconnect(&title, &reason),
                SessionEvent::BlockChanged { x, y, z, block } => self.update_block(x, y, z, block),
                SessionEvent::ScreenshotRequested => self.screenshot_requested = true,
            }
        }
    }

    fn service_screenshot(&mut self) {
        self.screenshot_requested = false;
        let size = self.parts.window.client_size();
        match screenshot::capture(
            &mut *self.parts.backend,
            &self.config.screenshot_dir,
            size,
            &Local::now(),
        ) {
            Ok(file) => self.chat.add(format!("&eTaken screenshot as: {file}")),
            Err(e) => {
                tracing::error!("screenshot failed: {}", e);
                self.chat.add(format!("&cFailed to take screenshot: {e}"));
            }
        }
    }

    // =========================================================================
    // SCREENS
    // =========================================================================

    /// Replaces the active screen, `None` returns input to the HUD.
    ///
    /// Deferred while a warning is showing.
    pub fn set_new_screen(&mut self, screen: Option<Box<dyn Screen>>) {
        self.screens.set_new_screen(screen, &mut Host::new(&mut self.parts));
    }

    /// Shows a warning over everything else.
    pub fn show_warning(&mut self, warning: WarningScreen) {
        self.screens.show_warning(warning, &mut Host::new(&mut self.parts));
    }

    /// Closes the front warning. Returns false if none was showing.
    pub fn dismiss_warning(&mut self) -> bool {
        self.screens.dismiss_warning(&mut Host::new(&mut self.parts))
    }

    /// Rebuilds the HUD, e.g. after a scale change.
    pub fn refresh_hud(&mut self) {
        self.screens.refresh_hud();
    }

    /// Whether the current screen (or the HUD) takes all input.
    #[must_use]
    pub fn screen_locked_input(&self) -> bool {
        self.screens.screen_locked_input()
    }

    /// The active screen, or the HUD if none.
    #[must_use]
    pub fn current_screen(&self) -> &dyn Screen {
        self.screens.current_screen()
    }

    /// The active screen, if any.
    #[must_use]
    pub fn active_screen(&self) -> Option<&dyn Screen> {
        self.screens.active_screen()
    }

    /// Coarse screen state.
    #[must_use]
    pub fn screen_state(&self) -> ScreenState {
        self.screens.state()
    }

    /// The screen state machine.
    #[must_use]
    pub fn screens(&self) -> &ScreenStateMachine {
        &self.screens
    }

    /// Hides the HUD highlight and held item, for clean screenshots.
    pub fn set_hide_gui(&mut self, hide: bool) {
        self.hide_gui = hide;
    }

    /// Whether GUI elements in the 3D pass are hidden.
    #[must_use]
    pub fn hide_gui(&self) -> bool {
        self.hide_gui
    }

    // =========================================================================
    // SESSION
    // =========================================================================

    /// Shows the disconnect screen and throws the world away.
    ///
    /// There is no automatic reconnect.
    pub fn disconnect(&mut self, title: &str, reason: &str) {
        tracing::warn!("disconnected: {} ({})", title, reason);
        self.set_new_screen(Some(Box::new(ErrorScreen::new(title, reason))));
        self.parts.map.reset();
        self.parts.scene.reset();
        self.picked.set_as_invalid();
    }

    /// Applies a block change and redraws the affected chunk.
    pub fn update_block(&mut self, x: i32, y: i32, z: i32, block: BlockId) {
        let old_height = self.parts.map.light_height(x, z);
        self.parts.map.set_block(x, y, z, block);
        let new_height = self.parts.map.light_height(x, z);
        self.parts
            .scene
            .redraw_block(x, y, z, block, old_height, new_height);
    }

    /// The window's client area changed size.
    pub fn on_resize(&mut self) {
        let old = self.window_size;
        let new = self.parts.window.client_size();
        self.parts.backend.on_window_resize(new);
        self.camera.set_viewport(new.width, new.height);
        self.update_projection();
        self.screens.resize(old, new);
        self.window_size = new;
    }

    /// Captures a screenshot at the end of the next frame.
    pub fn request_screenshot(&mut self) {
        self.screenshot_requested = true;
    }

    /// Whether a screenshot is pending.
    #[must_use]
    pub fn screenshot_requested(&self) -> bool {
        self.screenshot_requested
    }

    /// Handle for posting events from other threads.
    #[must_use]
    pub fn event_sender(&self) -> EventSender {
        self.event_sender.clone()
    }

    // =========================================================================
    // CAMERA
    // =========================================================================

    /// Switches between first and third person. Returns the camera now active.
    pub fn set_camera(&mut self, third_person: bool) -> CameraKind {
        let allowed = self.third_person_allowed();
        self.camera.set_third_person(third_person, allowed)
    }

    /// Advances first person → chase → orbit → first person.
    pub fn cycle_camera(&mut self) -> CameraKind {
        let allowed = self.third_person_allowed();
        self.camera.cycle(allowed)
    }

    fn third_person_allowed(&self) -> bool {
        self.options.third_person_allowed() && self.parts.player.can_use_third_person()
    }

    /// Queues relative mouse motion for mouse look.
    pub fn add_mouse_delta(&mut self, dx: f32, dy: f32) {
        self.camera.add_mouse_delta(dx, dy);
    }

    fn update_projection(&mut self) {
        self.projection = self.camera.get_projection();
        let backend = &mut self.parts.backend;
        backend.set_matrix_mode(MatrixMode::Projection);
        backend.load_matrix(&self.projection.projection);
        backend.set_matrix_mode(MatrixMode::Modelview);
    }

    // =========================================================================
    // OPTIONS
    // =========================================================================

    /// Changes options and applies the result to the running session.
    pub fn change_options(&mut self, change: impl FnOnce(&mut Options)) {
        change(&mut self.options);
        self.apply_options();
    }

    /// Switches the frame limiter and toggles vsync to match.
    pub fn set_fps_limit_method(&mut self, method: FpsLimitMethod) {
        self.options.set_fps_limit(method);
        let vsync = self.limiter.set_method(method);
        self.parts.backend.set_vsync(vsync);
        tracing::info!("fps limit set to {:?}", method);
    }

    /// Sets the view distance and rebuilds the projection.
    pub fn set_view_distance(&mut self, distance: u32) {
        self.change_options(|options| options.set_view_distance(distance));
    }

    fn apply_options(&mut self) {
        let options = &self.options;
        self.camera.set_field_of_view(options.field_of_view() as f32);
        self.camera.set_view_distance(options.view_distance() as f32);
        self.camera.set_sensitivity(options.sensitivity() as f32);
        self.screens.hud_mut().set_layout(
            options.chat_lines(),
            options.hud_scale(),
            options.chat_scale(),
        );
        if self.limiter.method() != options.fps_limit() {
            let vsync = self.limiter.set_method(options.fps_limit());
            self.parts.backend.set_vsync(vsync);
        }
        if !options.third_person_allowed() && self.camera.kind().is_third_person() {
            self.camera.set_third_person(false, false);
        }
        self.update_projection();
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Session chat.
    #[must_use]
    pub fn chat(&self) -> &ChatLog {
        &self.chat
    }

    /// Download cache swept by maintenance.
    #[must_use]
    pub fn downloads(&self) -> &DownloadCache {
        &self.downloads
    }

    /// The block under the reticle as of the last frame.
    #[must_use]
    pub fn picked(&self) -> &PickedPos {
        &self.picked
    }

    /// Camera controller.
    #[must_use]
    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    /// Projection pair as last loaded.
    #[must_use]
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// View matrix of the last frame.
    #[must_use]
    pub fn view(&self) -> &Mat4 {
        &self.view
    }

    /// Frustum of the last frame.
    #[must_use]
    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    /// Frame clock.
    #[must_use]
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Frame limiter.
    #[must_use]
    pub fn limiter(&self) -> &FpsLimiter {
        &self.limiter
    }

    /// Totals over every frame so far.
    #[must_use]
    pub fn stats(&self) -> &FrameStatsAccumulator {
        &self.stats
    }

    /// Whether teardown already ran.
    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    // =========================================================================
    // TEARDOWN
    // =========================================================================

    /// Releases everything the session acquired. Later calls do nothing.
    ///
    /// Order is network, screens, scene renderer, index buffer, then options
    /// (saved only if changed). A failing step is logged and recorded in the
    /// report; the remaining steps still run.
    pub fn teardown(&mut self) -> TeardownReport {
        if self.torn_down {
            return TeardownReport::default();
        }
        self.torn_down = true;
        tracing::info!("tearing down session");

        let Self {
            config,
            options,
            screens,
            fps_screen,
            parts,
            default_ib,
            ..
        } = self;
        let options_path = config.options_path.clone();
        let default_ib = default_ib.take();

        let mut persist = Scoped {
            name: "options",
            release: || {
                if options.has_changed() {
                    options.save(&options_path).map_err(persist_error)
                } else {
                    Ok(())
                }
            },
        };
        let mut index_buffer = Scoped {
            name: "default index buffer",
            release: || match default_ib {
                Some(ib) => parts
                    .backend
                    .delete_index_buffer(ib)
                    .map_err(|e| TeardownError::Release {
                        resource: format!("index buffer {}", ib.0),
                        reason: e.to_string(),
                    }),
                None => Ok(()),
            },
        };
        let mut scene = Scoped {
            name: "scene renderer",
            release: || parts.scene.release(),
        };
        let mut ui = Scoped {
            name: "screens",
            release: || {
                screens.dispose_all();
                fps_screen.dispose();
                Ok(())
            },
        };
        let mut network = Scoped {
            name: "network session",
            release: || parts.network.dispose(),
        };

        // Acquisition order; released back to front.
        let mut resources: [&mut dyn Disposable; 5] =
            [&mut persist, &mut index_buffer, &mut scene, &mut ui, &mut network];
        let report = release_all(&mut resources);
        if report.is_clean() {
            tracing::info!("session released cleanly");
        } else {
            tracing::warn!("session released with {} failures", report.failures.len());
        }
        report
    }
}

impl Drop for Game {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("screens", &self.screens)
            .field("camera", &self.camera.kind())
            .field("fps_limit", &self.limiter.method())
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}
