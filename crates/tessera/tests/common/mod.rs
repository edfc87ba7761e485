//! Recording doubles for every collaborator.
//!
//! All doubles share one [`Spy`], so a test can read back the exact call
//! order across backend, scene, network and input.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tessera::core::{TeardownError, TeardownResult};
use tessera::rendering::{
    BackendError, BackendResult, BlendFunc, BlockAccess, BlockId, CameraSubject, CompareFunc,
    FrameTime, GraphicsBackend, IndexBufferId, MatrixMode, PickedPos, SceneRenderer, TextureId, AIR,
};
use tessera::shared::{Mat4, Vec3};
use tessera::ui::{Extent, KeyBinding, MouseButton, Screen, UIBatch};
use tessera::{
    Collaborators, Game, GameConfig, InputHandler, NetworkSession, Simulated, Window, WorldMap,
};

pub const STONE: BlockId = 1;
pub const GLASS: BlockId = 20;

/// Everything the doubles saw, plus switches to make them fail.
#[derive(Debug)]
pub struct State {
    pub calls: Vec<String>,
    pub focused: bool,
    pub cursor_visible: bool,
    pub size: Extent,
    pub mouse_left: bool,
    pub can_use_third_person: bool,
    pub fail_connect: bool,
    pub fail_screenshot: bool,
    pub fail_ib_delete: bool,
    pub fail_scene_release: bool,
    pub vsync: Option<bool>,
    pub matrices: Vec<Mat4>,
    pub screen_changes: Vec<(Option<String>, Option<String>)>,
    pub picks: Vec<PickedPos>,
    pub redraws: Vec<(i32, i32, i32, BlockId, i32, i32)>,
    pub edits: HashMap<(i32, i32, i32), BlockId>,
    pub map_resets: u32,
    pub ui_layers: Vec<String>,
    pub ticks: u32,
    pub rotations: u32,
}

impl Default for State {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            focused: true,
            cursor_visible: false,
            size: Extent::new(800, 600),
            mouse_left: false,
            can_use_third_person: true,
            fail_connect: false,
            fail_screenshot: false,
            fail_ib_delete: false,
            fail_scene_release: false,
            vsync: None,
            matrices: Vec::new(),
            screen_changes: Vec::new(),
            picks: Vec::new(),
            redraws: Vec::new(),
            edits: HashMap::new(),
            map_resets: 0,
            ui_layers: Vec::new(),
            ticks: 0,
            rotations: 0,
        }
    }
}

/// Shared handle to [`State`].
#[derive(Clone, Default)]
pub struct Spy(pub Rc<RefCell<State>>);

impl Spy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call(&self, name: impl Into<String>) {
        self.0.borrow_mut().calls.push(name.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.0.borrow_mut().calls.clear();
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        f(&mut self.0.borrow_mut())
    }

    /// Position of `name` in the call log.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.0.borrow().calls.iter().position(|c| c == name)
    }

    pub fn count(&self, name: &str) -> usize {
        self.0.borrow().calls.iter().filter(|c| *c == name).count()
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            backend: Box::new(Backend(self.clone())),
            scene: Box::new(Scene(self.clone())),
            network: Box::new(Network(self.clone())),
            entities: Box::new(Ticker("entities", self.clone())),
            particles: Box::new(Ticker("particles", self.clone())),
            animations: Box::new(Ticker("animations", self.clone())),
            player: Box::new(Player(self.clone())),
            map: Box::new(Map(self.clone())),
            input: Box::new(Input(self.clone())),
            window: Box::new(FakeWindow(self.clone())),
        }
    }
}

/// Config writing everything under `dir`.
pub fn config_in(dir: &Path) -> GameConfig {
    GameConfig {
        options_path: dir.join("options.toml"),
        screenshot_dir: dir.join("screenshots"),
        ..GameConfig::default()
    }
}

/// A started session with the loading screen already closed.
pub fn playing(dir: &Path, spy: &Spy) -> Game {
    let mut game = Game::start(config_in(dir), spy.collaborators()).expect("session starts");
    game.set_new_screen(None);
    spy.clear_calls();
    game
}

// =============================================================================
// BACKEND
// =============================================================================

pub struct Backend(pub Spy);

impl GraphicsBackend for Backend {
    fn begin_frame(&mut self) {
        self.0.call("begin_frame");
    }

    fn end_frame(&mut self) {
        self.0.call("end_frame");
    }

    fn make_default_index_buffer(&mut self) -> BackendResult<IndexBufferId> {
        self.0.call("make_ib");
        Ok(IndexBufferId(7))
    }

    fn bind_index_buffer(&mut self, ib: IndexBufferId) {
        self.0.call(format!("bind_ib:{}", ib.0));
    }

    fn delete_index_buffer(&mut self, ib: IndexBufferId) -> BackendResult<()> {
        self.0.call(format!("delete_ib:{}", ib.0));
        if self.0.with(|s| s.fail_ib_delete) {
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

    fn load_matrix(&mut self, matrix: &Mat4) {
        self.0.with(|s| s.matrices.push(*matrix));
    }

    fn clear(&mut self) {
        self.0.call("clear");
    }

    fn set_depth_test(&mut self, enabled: bool, func: CompareFunc) {
        self.0.call(format!("depth:{enabled}:{func:?}"));
    }

    fn set_alpha_blend_func(&mut self, src: BlendFunc, dst: BlendFunc) {
        self.0.call(format!("blend:{src:?}:{dst:?}"));
    }

    fn set_alpha_test_func(&mut self, func: CompareFunc, reference: f32) {
        self.0.call(format!("alpha_test:{func:?}:{reference}"));
    }

    fn set_vsync(&mut self, enabled: bool) {
        self.0.with(|s| s.vsync = Some(enabled));
    }

    fn on_window_resize(&mut self, size: Extent) {
        self.0.call(format!("resize:{}x{}", size.width, size.height));
    }

    fn mode_2d(&mut self, _size: Extent) {
        self.0.call("mode_2d");
    }

    fn mode_3d(&mut self) {
        self.0.call("mode_3d");
    }

    fn draw_ui(&mut self, batches: &[UIBatch]) {
        self.0.call("draw_ui");
        self.0
            .with(|s| s.ui_layers = batches.iter().map(|b| b.layer.clone()).collect());
    }

    fn take_screenshot(&mut self, path: &Path, _size: Extent) -> BackendResult<()> {
        self.0.call("screenshot");
        if self.0.with(|s| s.fail_screenshot) {
            return Err(BackendError::Device(String::from("read back failed")));
        }
        std::fs::write(path, b"\x89PNG")?;
        Ok(())
    }
}

// =============================================================================
// SCENE
// =============================================================================

pub struct Scene(pub Spy);

impl SceneRenderer for Scene {
    fn render_entities(&mut self, _time: FrameTime) {
        self.0.call("entities");
    }

    fn render_entity_names(&mut self, _time: FrameTime) {
        self.0.call("names");
    }

    fn render_particles(&mut self, _time: FrameTime) {
        self.0.call("particles");
    }

    fn render_environment(&mut self, _time: FrameTime) {
        self.0.call("environment");
    }

    fn render_picking(&mut self, _time: FrameTime, picked: &PickedPos) {
        assert!(picked.valid, "highlight drawn for an invalid pick");
        self.0.call("picking");
    }

    fn render_map(&mut self, _time: FrameTime) {
        self.0.call("map");
    }

    fn render_selections(&mut self, _time: FrameTime) {
        self.0.call("selections");
    }

    fn render_weather(&mut self, _time: FrameTime) {
        self.0.call("weather");
    }

    fn render_hovered_names(&mut self, _time: FrameTime) {
        self.0.call("hovered_names");
    }

    fn render_held_item(&mut self, _time: FrameTime) {
        self.0.call("held_item");
    }

    fn redraw_block(&mut self, x: i32, y: i32, z: i32, block: BlockId, old_height: i32, new_height: i32) {
        self.0
            .with(|s| s.redraws.push((x, y, z, block, old_height, new_height)));
    }

    fn reset(&mut self) {
        self.0.call("scene_reset");
    }

    fn release(&mut self) -> TeardownResult<()> {
        self.0.call("scene_release");
        if self.0.with(|s| s.fail_scene_release) {
            return Err(TeardownError::Release {
                resource: String::from("chunk meshes"),
                reason: String::from("device lost"),
            });
        }
        Ok(())
    }
}

// =============================================================================
// SIMULATION
// =============================================================================

pub struct Network(pub Spy);

impl NetworkSession for Network {
    fn connect(&mut self, address: &str, port: u16) -> std::io::Result<()> {
        self.0.call(format!("connect:{address}:{port}"));
        if self.0.with(|s| s.fail_connect) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            ));
        }
        Ok(())
    }

    fn tick(&mut self, _period: f64) {
        self.0.call("tick:network");
        self.0.with(|s| s.ticks += 1);
    }

    fn dispose(&mut self) -> TeardownResult<()> {
        self.0.call("network_dispose");
        Ok(())
    }
}

pub struct Ticker(pub &'static str, pub Spy);

impl Simulated for Ticker {
    fn tick(&mut self, _period: f64) {
        self.1.call(format!("tick:{}", self.0));
    }
}

/// Stands at (0.5, 1, 0.5) looking straight down at the floor.
pub struct Player(pub Spy);

impl CameraSubject for Player {
    fn eye_position(&self, _t: f32) -> Vec3 {
        Vec3::new(0.5, 2.62, 0.5)
    }

    fn orientation(&self) -> (f32, f32) {
        (0.0, -89.0)
    }

    fn rotate(&mut self, _yaw: f32, _pitch: f32) {
        self.0.with(|s| s.rotations += 1);
    }

    fn can_use_third_person(&self) -> bool {
        self.0.with(|s| s.can_use_third_person)
    }
}

// =============================================================================
// WORLD
// =============================================================================

/// Stone floor at y = 0 plus recorded edits.
pub struct Map(pub Spy);

impl BlockAccess for Map {
    fn block_at(&self, x: i32, y: i32, z: i32) -> Option<BlockId> {
        if !(0..64).contains(&y) {
            return None;
        }
        let edit = self.0.with(|s| s.edits.get(&(x, y, z)).copied());
        Some(edit.unwrap_or(if y == 0 { STONE } else { AIR }))
    }
}

impl WorldMap for Map {
    fn light_height(&self, x: i32, z: i32) -> i32 {
        (0..64)
            .rev()
            .find(|&y| matches!(self.block_at(x, y, z), Some(b) if b != AIR && b != GLASS))
            .unwrap_or(-1)
    }

    fn set_block(&mut self, x: i32, y: i32, z: i32, block: BlockId) {
        self.0.with(|s| s.edits.insert((x, y, z), block));
    }

    fn reset(&mut self) {
        self.0.with(|s| {
            s.edits.clear();
            s.map_resets += 1;
        });
    }
}

// =============================================================================
// PLATFORM
// =============================================================================

pub struct Input(pub Spy);

impl InputHandler for Input {
    fn screen_changed(&mut self, old: Option<&dyn Screen>, new: Option<&dyn Screen>) {
        let name = |s: Option<&dyn Screen>| s.map(|s| s.name().to_owned());
        self.0
            .with(|s| s.screen_changes.push((name(old), name(new))));
    }

    fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        button == MouseButton::Left && self.0.with(|s| s.mouse_left)
    }

    fn is_key_down(&self, _binding: KeyBinding) -> bool {
        false
    }

    fn pick_blocks(&mut self, picked: &PickedPos, _left: bool, _middle: bool, _right: bool) {
        self.0.call("pick_blocks");
        self.0.with(|s| s.picks.push(*picked));
    }
}

pub struct FakeWindow(pub Spy);

impl Window for FakeWindow {
    fn focused(&self) -> bool {
        self.0.with(|s| s.focused)
    }

    fn cursor_visible(&self) -> bool {
        self.0.with(|s| s.cursor_visible)
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.0.with(|s| s.cursor_visible = visible);
    }

    fn client_size(&self) -> Extent {
        self.0.with(|s| s.size)
    }
}

/// Path of the only file in `dir`.
pub fn single_file(dir: &Path) -> PathBuf {
    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .expect("directory exists")
        .map(|e| e.expect("entry").path())
        .collect();
    assert_eq!(entries.len(), 1, "expected exactly one file in {}", dir.display());
    entries.remove(0)
}
