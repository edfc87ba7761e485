//! # TESSERA Headless Client
//!
//! Runs the full frame loop with no GPU and no window.
//!
//! ## CRITICAL REQUIREMENTS
//! - NO GPU
//! - NO WINDOW
//! - Every session call goes through the same `Game` a real client uses
//!
//! ```bash
//! # Run 300 frames at 60 FPS with debug logging
//! RUST_LOG=tessera=debug ./tessera_client 300
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use tessera::collaborators::DeviceInput;
use tessera::core::{FpsLimitMethod, TeardownResult};
use tessera::rendering::{
    BackendError, BackendResult, BlendFunc, BlockAccess, BlockId, CameraSubject, CompareFunc,
    GraphicsBackend, IndexBufferId, MatrixMode, SceneRenderer, TextureId, AIR,
};
use tessera::shared::{Mat4, Vec3};
use tessera::ui::{Extent, UIBatch, WarningScreen};
use tessera::{Collaborators, Game, GameConfig, NetworkSession, SessionEvent, Simulated, Window, WorldMap};

/// Default number of frames to run.
const DEFAULT_FRAMES: u64 = 300;

const STONE: BlockId = 1;

// =============================================================================
// NULL BACKEND
// =============================================================================

/// Accepts every call and counts what it was asked to draw.
#[derive(Default)]
struct NullBackend {
    frames: u64,
    ui_batches: u64,
    next_ib: u32,
}

impl GraphicsBackend for NullBackend {
    fn begin_frame(&mut self) {}

    fn end_frame(&mut self) {
        self.frames += 1;
    }

    fn make_default_index_buffer(&mut self) -> BackendResult<IndexBufferId> {
        self.next_ib += 1;
        Ok(IndexBufferId(self.next_ib))
    }

    fn bind_index_buffer(&mut self, _ib: IndexBufferId) {}

    fn delete_index_buffer(&mut self, ib: IndexBufferId) -> BackendResult<()> {
        if ib.0 == 0 || ib.0 > self.next_ib {
            return Err(BackendError::InvalidHandle {
                kind: "index buffer",
                id: ib.0,
            });
        }
        Ok(())
    }

    fn delete_texture(&mut self, _texture: TextureId) -> BackendResult<()> {
        Ok(())
    }

    fn set_matrix_mode(&mut self, _mode: MatrixMode) {}

    fn load_matrix(&mut self, _matrix: &Mat4) {}

    fn clear(&mut self) {}

    fn set_depth_test(&mut self, _enabled: bool, _func: CompareFunc) {}

    fn set_alpha_blend_func(&mut self, _src: BlendFunc, _dst: BlendFunc) {}

    fn set_alpha_test_func(&mut self, _func: CompareFunc, _reference: f32) {}

    fn set_vsync(&mut self, enabled: bool) {
        tracing::debug!("vsync {}", if enabled { "on" } else { "off" });
    }

    fn on_window_resize(&mut self, _size: Extent) {}

    fn mode_2d(&mut self, _size: Extent) {}

    fn mode_3d(&mut self) {}

    fn draw_ui(&mut self, batches: &[UIBatch]) {
        self.ui_batches += batches.len() as u64;
    }

    fn take_screenshot(&mut self, _path: &Path, _size: Extent) -> BackendResult<()> {
        Err(BackendError::Device(String::from("headless backend has no back buffer")))
    }
}

struct NullScene;

impl SceneRenderer for NullScene {
    fn release(&mut self) -> TeardownResult<()> {
        tracing::debug!("scene released");
        Ok(())
    }
}

// =============================================================================
// OFFLINE WORLD
// =============================================================================

/// Stone floor at y = 0 plus whatever the session changes.
#[derive(Default)]
struct FlatWorld {
    edits: HashMap<(i32, i32, i32), BlockId>,
}

impl BlockAccess for FlatWorld {
    fn block_at(&self, x: i32, y: i32, z: i32) -> Option<BlockId> {
        if !(0..128).contains(&y) {
            return None;
        }
        let base = if y == 0 { STONE } else { AIR };
        Some(self.edits.get(&(x, y, z)).copied().unwrap_or(base))
    }
}

impl WorldMap for FlatWorld {
    fn light_height(&self, x: i32, z: i32) -> i32 {
        (0..128)
            .rev()
            .find(|&y| self.block_at(x, y, z).is_some_and(|b| b != AIR))
            .unwrap_or(-1)
    }

    fn set_block(&mut self, x: i32, y: i32, z: i32, block: BlockId) {
        self.edits.insert((x, y, z), block);
    }

    fn reset(&mut self) {
        self.edits.clear();
    }
}

/// Pretends to be connected and counts ticks.
#[derive(Default)]
struct Loopback {
    ticks: u64,
}

impl NetworkSession for Loopback {
    fn connect(&mut self, address: &str, port: u16) -> std::io::Result<()> {
        tracing::info!("loopback session for {}:{}", address, port);
        Ok(())
    }

    fn tick(&mut self, _period: f64) {
        self.ticks += 1;
    }
}

#[derive(Default)]
struct Counter(u64);

impl Simulated for Counter {
    fn tick(&mut self, _period: f64) {
        self.0 += 1;
    }
}

struct Player {
    position: Vec3,
    yaw: f32,
    pitch: f32,
}

impl CameraSubject for Player {
    fn eye_position(&self, _t: f32) -> Vec3 {
        self.position + Vec3::new(0.0, 1.62, 0.0)
    }

    fn orientation(&self) -> (f32, f32) {
        (self.yaw, self.pitch)
    }

    fn rotate(&mut self, yaw: f32, pitch: f32) {
        self.yaw += yaw;
        self.pitch = (self.pitch + pitch).clamp(-89.9, 89.9);
    }

    fn can_use_third_person(&self) -> bool {
        true
    }
}

struct HeadlessWindow {
    cursor_visible: bool,
}

impl Window for HeadlessWindow {
    fn focused(&self) -> bool {
        true
    }

    fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.cursor_visible = visible;
    }

    fn client_size(&self) -> Extent {
        Extent::new(854, 480)
    }
}

// =============================================================================
// MAIN
// =============================================================================

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let frames = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(DEFAULT_FRAMES);

    let parts = Collaborators {
        backend: Box::<NullBackend>::default(),
        scene: Box::new(NullScene),
        network: Box::<Loopback>::default(),
        entities: Box::<Counter>::default(),
        particles: Box::<Counter>::default(),
        animations: Box::<Counter>::default(),
        player: Box::new(Player {
            position: Vec3::new(0.5, 1.0, 0.5),
            yaw: 0.0,
            pitch: -45.0,
        }),
        map: Box::<FlatWorld>::default(),
        input: Box::<DeviceInput>::default(),
        window: Box::new(HeadlessWindow {
            cursor_visible: false,
        }),
    };

    let mut game = match Game::start(GameConfig::default(), parts) {
        Ok(game) => game,
        Err(e) => {
            tracing::error!("failed to start session: {}", e);
            std::process::exit(1);
        }
    };
    game.set_fps_limit_method(FpsLimitMethod::Limit60Fps);
    game.set_new_screen(None);

    let events = game.event_sender();
    let mut last = Instant::now();
    for frame in 0..frames {
        match frame {
            30 => {
                events.send(SessionEvent::BlockChanged { x: 0, y: 1, z: 0, block: STONE });
            }
            60 => {
                let camera = game.cycle_camera();
                tracing::info!("camera now {:?}", camera);
            }
            90 => game.show_warning(WarningScreen::new(
                "Headless run",
                vec![String::from("This client has no window.")],
            )),
            120 => {
                game.dismiss_warning();
            }
            150 => {
                events.send(SessionEvent::ScreenshotRequested);
            }
            _ => {}
        }

        let now = Instant::now();
        let delta = now.duration_since(last).as_secs_f64();
        last = now;
        if let Err(e) = game.on_render_frame(delta) {
            tracing::error!("frame {} failed: {}", frame, e);
            break;
        }
    }

    tracing::info!("{}", game.stats());
    if let Some(line) = game.chat().last() {
        tracing::info!("last chat line: {}", line.text);
    }
    let report = game.teardown();
    if !report.is_clean() {
        std::process::exit(2);
    }
}
