//! The `Screen` seam.
//!
//! A screen is a modal overlay (menu, loading bar, dialog). It is owned by
//! the [`ScreenStateMachine`](crate::ScreenStateMachine) while active and
//! sees exactly one `init` and one `dispose` over its life.

use crate::render::UIRenderer;

/// Window client size in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Extent {
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

impl Extent {
    /// Creates an extent.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// What a screen does to the rest of the frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenCapabilities {
    /// Keyboard and mouse go to the screen, not the world.
    pub handles_all_input: bool,
    /// The 3D world pass is skipped while the screen is up.
    pub blocks_world: bool,
    /// The HUD is not drawn under the screen.
    pub hides_hud: bool,
}

impl ScreenCapabilities {
    /// Translucent overlay that leaves the world playable.
    pub const OVERLAY: Self = Self {
        handles_all_input: false,
        blocks_world: false,
        hides_hud: false,
    };

    /// Menu drawn over a visible but frozen world.
    pub const MENU: Self = Self {
        handles_all_input: true,
        blocks_world: false,
        hides_hud: true,
    };

    /// Opaque screen that replaces the world entirely.
    pub const FULLSCREEN: Self = Self {
        handles_all_input: true,
        blocks_world: true,
        hides_hud: true,
    };
}

/// A modal UI screen.
pub trait Screen {
    /// Name used in logs and layer labels.
    fn name(&self) -> &str;

    /// Capability flags. Read every frame, may change over the screen's life.
    fn capabilities(&self) -> ScreenCapabilities;

    /// Builds widgets and acquires textures.
    fn init(&mut self) {}

    /// Releases everything `init` acquired.
    fn dispose(&mut self) {}

    /// Window was resized from `old` to `new`.
    fn resize(&mut self, _old: Extent, _new: Extent) {}

    /// Records this frame's overlay commands.
    fn render(&mut self, delta: f64, ui: &mut UIRenderer);
}

impl std::fmt::Debug for dyn Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Screen")
            .field("name", &self.name())
            .field("capabilities", &self.capabilities())
            .finish()
    }
}

/// The parts of the session a screen transition touches.
pub trait ScreenHost {
    /// The active screen changed. Either side may be `None` (HUD only).
    fn screen_changed(&mut self, old: Option<&dyn Screen>, new: Option<&dyn Screen>);

    /// Whether the OS cursor is currently shown.
    fn cursor_visible(&self) -> bool;

    /// Shows or hides the OS cursor.
    fn set_cursor_visible(&mut self, visible: bool);
}
