//! Heads-up display.
//!
//! The HUD always exists. It owns input whenever no screen is active, which
//! the state machine signals through [`HudScreen::gain_focus`] and
//! [`HudScreen::lose_focus`].

use crate::chat::ChatLog;
use crate::layout::Rect;
use crate::render::UIRenderer;
use crate::screen::{Extent, Screen, ScreenCapabilities};
use crate::style::Color;

/// Chat font size at scale 1.
const CHAT_FONT_SIZE: f32 = 14.0;

/// Crosshair arm length at scale 1.
const CROSSHAIR_SIZE: f32 = 8.0;

/// Session heads-up display: crosshair plus the recent chat lines.
#[derive(Debug)]
pub struct HudScreen {
    chat: ChatLog,
    chat_lines: usize,
    hud_scale: f32,
    chat_scale: f32,
    focused: bool,
    initialized: bool,
    /// Reused across frames.
    visible_lines: Vec<String>,
}

impl HudScreen {
    /// Creates a HUD reading from `chat`. It starts focused, as no screen is active.
    #[must_use]
    pub fn new(chat: ChatLog, chat_lines: usize) -> Self {
        Self {
            chat,
            chat_lines,
            hud_scale: 1.0,
            chat_scale: 1.0,
            focused: true,
            initialized: false,
            visible_lines: Vec::new(),
        }
    }

    /// The HUD regains input because the active screen went away.
    pub fn gain_focus(&mut self) {
        if !self.focused {
            tracing::debug!("hud gained focus");
            self.focused = true;
        }
    }

    /// A screen took over input.
    pub fn lose_focus(&mut self) {
        if self.focused {
            tracing::debug!("hud lost focus");
            self.focused = false;
        }
    }

    /// Whether the HUD currently owns input.
    #[must_use]
    pub fn has_focus(&self) -> bool {
        self.focused
    }

    /// Whether `init` ran and `dispose` has not.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Applies display options. Takes effect on the next `init`.
    pub fn set_layout(&mut self, chat_lines: usize, hud_scale: f32, chat_scale: f32) {
        self.chat_lines = chat_lines;
        self.hud_scale = hud_scale;
        self.chat_scale = chat_scale;
    }

    /// Chat lines shown.
    #[must_use]
    pub fn chat_lines(&self) -> usize {
        self.chat_lines
    }
}

impl Screen for HudScreen {
    fn name(&self) -> &str {
        "hud"
    }

    fn capabilities(&self) -> ScreenCapabilities {
        ScreenCapabilities::OVERLAY
    }

    fn init(&mut self) {
        self.visible_lines = Vec::with_capacity(self.chat_lines);
        self.initialized = true;
    }

    fn dispose(&mut self) {
        self.visible_lines = Vec::new();
        self.initialized = false;
    }

    fn resize(&mut self, old: Extent, new: Extent) {
        tracing::debug!(
            "hud resized {}x{} -> {}x{}",
            old.width,
            old.height,
            new.width,
            new.height
        );
    }

    fn render(&mut self, _delta: f64, ui: &mut UIRenderer) {
        let screen = ui.viewport();

        let arm = CROSSHAIR_SIZE * self.hud_scale;
        let (cx, cy) = screen.center();
        ui.fill(Rect::new(cx - arm, cy - 1.0, arm * 2.0, 2.0), Color::WHITE);
        ui.fill(Rect::new(cx - 1.0, cy - arm, 2.0, arm * 2.0), Color::WHITE);

        self.visible_lines.clear();
        self.visible_lines
            .extend(self.chat.recent(self.chat_lines).into_iter().map(|l| l.text));

        let line_height = CHAT_FONT_SIZE * self.chat_scale + 2.0;
        let area = screen.bottom_strip(line_height * self.chat_lines as f32, 4.0);
        let first_y = area.bottom() - line_height * self.visible_lines.len() as f32;
        for (i, line) in self.visible_lines.iter().enumerate() {
            let y = first_y + line_height * (i as f32 + 1.0);
            ui.text(line, area.x, y, CHAT_FONT_SIZE * self.chat_scale, Color::WHITE);
        }
    }
}
