//! Warning dialogs.
//!
//! A warning sits on top of whatever screen was active and holds it aside.
//! Screens requested while warnings are up are parked in the same slot, so
//! dismissing the last warning brings back whichever came last.

use crate::layout::Rect;
use crate::render::UIRenderer;
use crate::screen::{Screen, ScreenCapabilities};
use crate::style::Color;

/// A queued warning dialog.
pub struct WarningScreen {
    title: String,
    body: Vec<String>,
    /// Screen to install once the queue drains. Only the front warning holds one.
    pub(crate) pending_replacement: Option<Box<dyn Screen>>,
    /// Cursor visibility to restore once the queue drains.
    pub(crate) saved_cursor_visible: bool,
    initialized: bool,
}

impl WarningScreen {
    /// Creates a dialog with a title and body lines.
    #[must_use]
    pub fn new(title: impl Into<String>, body: Vec<String>) -> Self {
        Self {
            title: title.into(),
            body,
            pending_replacement: None,
            saved_cursor_visible: false,
            initialized: false,
        }
    }

    /// Dialog title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Cursor visibility saved when the first warning was shown.
    #[must_use]
    pub fn saved_cursor_visible(&self) -> bool {
        self.saved_cursor_visible
    }

    /// Name of the screen parked behind this warning.
    #[must_use]
    pub fn pending_replacement_name(&self) -> Option<&str> {
        self.pending_replacement.as_deref().map(Screen::name)
    }

    /// Whether `init` ran and `dispose` has not.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

impl std::fmt::Debug for WarningScreen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WarningScreen")
            .field("title", &self.title)
            .field("pending_replacement", &self.pending_replacement_name())
            .field("saved_cursor_visible", &self.saved_cursor_visible)
            .finish_non_exhaustive()
    }
}

impl Screen for WarningScreen {
    fn name(&self) -> &str {
        "warning"
    }

    fn capabilities(&self) -> ScreenCapabilities {
        // A disposed dialog no longer captures input.
        ScreenCapabilities {
            handles_all_input: self.initialized,
            blocks_world: false,
            hides_hud: false,
        }
    }

    fn init(&mut self) {
        self.initialized = true;
    }

    fn dispose(&mut self) {
        self.initialized = false;
    }

    fn render(&mut self, _delta: f64, ui: &mut UIRenderer) {
        let screen = ui.viewport();
        ui.fill(screen, Color::MENU_BACKDROP);

        let height = 60.0 + 20.0 * self.body.len() as f32;
        let panel: Rect = screen.centered(screen.width.min(480.0), height);
        ui.fill(panel, Color::DIALOG);
        ui.text(&self.title, panel.x + 10.0, panel.y + 24.0, 16.0, Color::WHITE);
        for (i, line) in self.body.iter().enumerate() {
            let y = panel.y + 50.0 + 20.0 * i as f32;
            ui.text(line, panel.x + 10.0, y, 14.0, Color::WHITE);
        }
    }
}
