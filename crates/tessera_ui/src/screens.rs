//! Built-in screens.

use crate::layout::Rect;
use crate::render::UIRenderer;
use crate::screen::{Screen, ScreenCapabilities};
use crate::style::Color;

// =============================================================================
// LOADING
// =============================================================================

/// Shown while connecting and while the map streams in.
#[derive(Debug, Clone)]
pub struct LoadingScreen {
    title: String,
    message: String,
    progress: f32,
}

impl LoadingScreen {
    /// Creates a loading screen at zero progress.
    #[must_use]
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            progress: 0.0,
        }
    }

    /// Sets progress in `0..=1`.
    pub fn set_progress(&mut self, progress: f32) {
        self.progress = progress.clamp(0.0, 1.0);
    }

    /// Current progress.
    #[must_use]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Title line.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
}

impl Screen for LoadingScreen {
    fn name(&self) -> &str {
        "loading"
    }

    fn capabilities(&self) -> ScreenCapabilities {
        ScreenCapabilities::FULLSCREEN
    }

    fn render(&mut self, _delta: f64, ui: &mut UIRenderer) {
        let screen = ui.viewport();
        ui.fill(screen, Color::BLACK);
        let (cx, cy) = screen.center();
        ui.text(&self.title, cx - 100.0, cy - 40.0, 16.0, Color::WHITE);
        ui.text(&self.message, cx - 100.0, cy - 20.0, 14.0, Color::WHITE);

        let bar = Rect::new(cx - 100.0, cy, 200.0, 4.0);
        ui.fill(bar, Color::rgb8(128, 128, 128));
        ui.fill(
            Rect::new(bar.x, bar.y, bar.width * self.progress, bar.height),
            Color::PROGRESS,
        );
    }
}

// =============================================================================
// ERROR
// =============================================================================

/// Terminal screen after a disconnect.
#[derive(Debug, Clone)]
pub struct ErrorScreen {
    title: String,
    reason: String,
}

impl ErrorScreen {
    /// Creates an error screen.
    #[must_use]
    pub fn new(title: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            reason: reason.into(),
        }
    }

    /// Headline.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Why the session ended.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl Screen for ErrorScreen {
    fn name(&self) -> &str {
        "error"
    }

    fn capabilities(&self) -> ScreenCapabilities {
        ScreenCapabilities::FULLSCREEN
    }

    fn init(&mut self) {
        tracing::info!("session ended: {} ({})", self.title, self.reason);
    }

    fn render(&mut self, _delta: f64, ui: &mut UIRenderer) {
        let screen = ui.viewport();
        ui.fill(screen, Color::rgba(0.25, 0.06, 0.06, 1.0));
        let (cx, cy) = screen.center();
        ui.text(&self.title, cx - 120.0, cy - 20.0, 16.0, Color::WHITE);
        ui.text(&self.reason, cx - 120.0, cy + 4.0, 14.0, Color::WHITE);
    }
}

// =============================================================================
// PAUSE
// =============================================================================

/// Game menu, installed when the window loses focus.
#[derive(Debug, Clone, Default)]
pub struct PauseScreen;

impl PauseScreen {
    /// Creates the pause menu.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Screen for PauseScreen {
    fn name(&self) -> &str {
        "pause"
    }

    fn capabilities(&self) -> ScreenCapabilities {
        ScreenCapabilities::MENU
    }

    fn render(&mut self, _delta: f64, ui: &mut UIRenderer) {
        let screen = ui.viewport();
        ui.fill(screen, Color::MENU_BACKDROP);
        let (cx, cy) = screen.center();
        ui.text("Game menu", cx - 40.0, cy - 60.0, 16.0, Color::WHITE);
        for (i, label) in ["Options", "Back to game", "Quit game"].iter().enumerate() {
            let button = Rect::new(cx - 100.0, cy - 30.0 + 30.0 * i as f32, 200.0, 24.0);
            ui.fill(button, Color::DIALOG);
            ui.text(label, button.x + 8.0, button.bottom() - 6.0, 14.0, Color::WHITE);
        }
    }
}

// =============================================================================
// FPS OVERLAY
// =============================================================================

/// Frame-rate counter drawn in the corner every frame.
#[derive(Debug, Clone, Default)]
pub struct FpsScreen {
    /// Seconds accumulated towards the next readout.
    accumulator: f64,
    /// Frames counted towards the next readout.
    frames: u32,
    /// Slowest frame in the current window.
    max_delta: f64,
    /// Last readout.
    text: String,
    fps: f64,
}

impl FpsScreen {
    /// Readout refresh interval in seconds.
    const REFRESH: f64 = 1.0;

    /// Creates an overlay with no readout yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last measured frames per second.
    #[must_use]
    pub fn frames_per_second(&self) -> f64 {
        self.fps
    }

    /// Text of the last readout.
    #[must_use]
    pub fn readout(&self) -> &str {
        &self.text
    }

    fn update(&mut self, delta: f64) {
        self.accumulator += delta;
        self.frames += 1;
        self.max_delta = self.max_delta.max(delta);

        if self.accumulator >= Self::REFRESH {
            self.fps = f64::from(self.frames) / self.accumulator;
            let min_fps = if self.max_delta > 0.0 { 1.0 / self.max_delta } else { self.fps };
            self.text = format!("FPS: {:.0} (min {:.0})", self.fps, min_fps);
            self.accumulator = 0.0;
            self.frames = 0;
            self.max_delta = 0.0;
        }
    }
}

impl Screen for FpsScreen {
    fn name(&self) -> &str {
        "fps"
    }

    fn capabilities(&self) -> ScreenCapabilities {
        ScreenCapabilities::OVERLAY
    }

    fn init(&mut self) {
        self.text = String::from("FPS: --");
    }

    fn dispose(&mut self) {
        self.text.clear();
    }

    fn render(&mut self, delta: f64, ui: &mut UIRenderer) {
        self.update(delta);
        ui.text(&self.text, 2.0, 14.0, 14.0, Color::WHITE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities() {
        assert!(LoadingScreen::new("a", "b").capabilities().blocks_world);
        assert!(ErrorScreen::new("a", "b").capabilities().hides_hud);
        let pause = PauseScreen::new().capabilities();
        assert!(pause.handles_all_input);
        assert!(!pause.blocks_world);
        assert!(!FpsScreen::new().capabilities().handles_all_input);
    }

    #[test]
    fn test_fps_readout() {
        let mut fps = FpsScreen::new();
        fps.init();
        let mut ui = UIRenderer::new();
        ui.begin_frame(Rect::window(320, 240));
        for _ in 0..60 {
            fps.render(1.0 / 60.0, &mut ui);
        }
        // Float accumulation may need one extra frame to cross the second.
        fps.render(1.0 / 60.0, &mut ui);
        assert!((fps.frames_per_second() - 60.0).abs() < 1.5);
        assert!(fps.readout().starts_with("FPS: "));
    }

    #[test]
    fn test_progress_is_clamped() {
        let mut loading = LoadingScreen::new("Connecting", "..");
        loading.set_progress(4.0);
        assert!((loading.progress() - 1.0).abs() < f32::EPSILON);
    }
}
