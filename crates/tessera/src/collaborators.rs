//! Narrow interfaces to the systems the session drives but does not own
//! the internals of.
//!
//! Every collaborator is handed to [`crate::Game`] as a boxed trait object
//! inside [`Collaborators`]. Nothing here is global.

use tessera_rendering::{BlockAccess, BlockId, CameraSubject, GraphicsBackend, PickedPos, SceneRenderer};
use tessera_core::TeardownResult;
use tessera_ui::{Extent, InputState, KeyBinding, KeyMap, MouseButton, Screen};

// =============================================================================
// SIMULATION
// =============================================================================

/// Connection to the server.
pub trait NetworkSession {
    /// Opens the connection. Must not block on the handshake.
    fn connect(&mut self, address: &str, port: u16) -> std::io::Result<()>;

    /// One fixed simulation step: flush outgoing, process incoming.
    fn tick(&mut self, period: f64);

    /// Closes the connection.
    fn dispose(&mut self) -> TeardownResult<()> {
        Ok(())
    }
}

/// Anything advanced once per simulation tick: the entity list, particles,
/// animated textures.
pub trait Simulated {
    /// One fixed step of `period` seconds.
    fn tick(&mut self, period: f64);
}

// =============================================================================
// WORLD
// =============================================================================

/// Voxel map storage.
pub trait WorldMap: BlockAccess {
    /// Height of the highest light-blocking block in column `(x, z)`.
    fn light_height(&self, x: i32, z: i32) -> i32;

    /// Replaces the block at `(x, y, z)`.
    fn set_block(&mut self, x: i32, y: i32, z: i32, block: BlockId);

    /// Drops all map data.
    fn reset(&mut self);
}

// =============================================================================
// PLATFORM
// =============================================================================

/// Keyboard and mouse, as seen by the game.
pub trait InputHandler {
    /// The active screen changed.
    fn screen_changed(&mut self, old: Option<&dyn Screen>, new: Option<&dyn Screen>);

    /// Whether a mouse button is held.
    fn is_mouse_pressed(&self, button: MouseButton) -> bool;

    /// Whether the key bound to `binding` is held.
    fn is_key_down(&self, binding: KeyBinding) -> bool;

    /// Place, delete or pick blocks with the held buttons.
    fn pick_blocks(&mut self, picked: &PickedPos, left: bool, middle: bool, right: bool);
}

/// The OS window.
pub trait Window {
    /// Whether the window has keyboard focus.
    fn focused(&self) -> bool;

    /// Whether the OS cursor is shown.
    fn cursor_visible(&self) -> bool;

    /// Shows or hides the OS cursor.
    fn set_cursor_visible(&mut self, visible: bool);

    /// Size of the drawable area.
    fn client_size(&self) -> Extent;
}

/// Everything the session talks to.
pub struct Collaborators {
    /// Graphics API.
    pub backend: Box<dyn GraphicsBackend>,
    /// World, entity and effect drawing.
    pub scene: Box<dyn SceneRenderer>,
    /// Server connection.
    pub network: Box<dyn NetworkSession>,
    /// Entity list.
    pub entities: Box<dyn Simulated>,
    /// Particle system.
    pub particles: Box<dyn Simulated>,
    /// Animated textures.
    pub animations: Box<dyn Simulated>,
    /// The local player the camera follows.
    pub player: Box<dyn CameraSubject>,
    /// Voxel map.
    pub map: Box<dyn WorldMap>,
    /// Keyboard and mouse.
    pub input: Box<dyn InputHandler>,
    /// OS window.
    pub window: Box<dyn Window>,
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

// =============================================================================
// DEVICE INPUT
// =============================================================================

/// [`InputHandler`] over polled device state and a key map.
///
/// Block interactions are counted rather than applied; the client binary
/// has no world editing of its own.
#[derive(Debug, Default)]
pub struct DeviceInput {
    /// Raw device state, fed by the window's event pump.
    pub state: InputState,
    /// Key bindings.
    pub keys: KeyMap,
    /// Name of the active screen, `None` when the HUD has input.
    pub active_screen: Option<String>,
    /// Block interactions requested so far.
    pub interactions: u64,
}

impl InputHandler for DeviceInput {
    fn screen_changed(&mut self, _old: Option<&dyn Screen>, new: Option<&dyn Screen>) {
        self.active_screen = new.map(|s| s.name().to_owned());
        // Keys held when a menu opens must not stay stuck down behind it.
        self.state.release_all();
    }

    fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        self.state.is_mouse_pressed(button)
    }

    fn is_key_down(&self, binding: KeyBinding) -> bool {
        self.state.is_binding_down(&self.keys, binding)
    }

    fn pick_blocks(&mut self, picked: &PickedPos, left: bool, middle: bool, right: bool) {
        if picked.valid && (left || middle || right) {
            self.interactions += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_ui::{Key, PauseScreen};

    #[test]
    fn test_device_input_resolves_bindings() {
        let mut input = DeviceInput::default();
        let key = input.keys.key(KeyBinding::Forward).expect("forward is bound");
        input.state.key_down(key);
        assert!(input.is_key_down(KeyBinding::Forward));
        assert!(!input.is_key_down(KeyBinding::Screenshot));
    }

    #[test]
    fn test_screen_change_releases_keys() {
        let mut input = DeviceInput::default();
        input.state.key_down(Key::W);
        let pause = PauseScreen::new();
        input.screen_changed(None, Some(&pause));
        assert_eq!(input.active_screen.as_deref(), Some("pause"));
        assert!(!input.state.is_key_down(Key::W));
    }

    #[test]
    fn test_interactions_need_valid_pick() {
        let mut input = DeviceInput::default();
        let mut picked = PickedPos::default();
        input.pick_blocks(&picked, true, false, false);
        assert_eq!(input.interactions, 0);

        picked.set_as_valid([0, 0, 0], 1, None, 1.0);
        input.pick_blocks(&picked, true, false, false);
        input.pick_blocks(&picked, false, false, false);
        assert_eq!(input.interactions, 1);
    }
}
