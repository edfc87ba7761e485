//! # Screen State Machine
//!
//! Owns the active screen, the warning queue and the HUD.
//!
//! ```text
//!                 set_new_screen(Some)            show_warning
//!  NoActiveScreen ───────────────────▶ ScreenActive ──────────▶ WarningQueued
//!        ▲  ◀─────────────────────────      │                   │  ▲      │
//!        │       set_new_screen(None)       │ show_warning      │  └──────┘
//!        │                                  └──────────────────▶│  show_warning /
//!        │                                                      │  set_new_screen (deferred)
//!        └──────────── dismiss last warning (pending = None) ◀──┘
//! ```
//!
//! While warnings are queued, replacement requests never take effect. The
//! requested screen is initialized and parked on the front warning, and any
//! screen parked earlier is disposed. Dismissing the last warning installs
//! whatever is parked. Screens are only ever disposed inside these
//! transition calls, never during rendering.

use std::collections::VecDeque;

use crate::hud::HudScreen;
use crate::render::UIRenderer;
use crate::screen::{Extent, Screen, ScreenHost};
use crate::warning::WarningScreen;

/// Coarse state, for callers and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    /// Only the HUD is up and it owns input.
    NoActiveScreen,
    /// A regular screen is active.
    ScreenActive,
    /// One or more warnings are queued; the front one is visible.
    WarningQueued,
}

/// What occupies the active slot.
enum ActiveScreen {
    /// A regular screen.
    Screen(Box<dyn Screen>),
    /// Non-empty warning queue, front visible.
    Warnings(VecDeque<WarningScreen>),
}

/// Modal screen manager.
pub struct ScreenStateMachine {
    hud: HudScreen,
    active: Option<ActiveScreen>,
}

impl ScreenStateMachine {
    /// Wraps an already initialized HUD.
    #[must_use]
    pub fn new(hud: HudScreen) -> Self {
        Self { hud, active: None }
    }

    /// Current coarse state.
    #[must_use]
    pub fn state(&self) -> ScreenState {
        match &self.active {
            None => ScreenState::NoActiveScreen,
            Some(ActiveScreen::Screen(_)) => ScreenState::ScreenActive,
            Some(ActiveScreen::Warnings(_)) => ScreenState::WarningQueued,
        }
    }

    /// The active screen, the front warning when warnings are queued.
    #[must_use]
    pub fn active_screen(&self) -> Option<&dyn Screen> {
        match &self.active {
            None => None,
            Some(ActiveScreen::Screen(screen)) => Some(&**screen),
            Some(ActiveScreen::Warnings(queue)) => queue.front().map(|w| w as &dyn Screen),
        }
    }

    /// The active screen, or the HUD if none.
    #[must_use]
    pub fn current_screen(&self) -> &dyn Screen {
        self.active_screen().unwrap_or(&self.hud)
    }

    /// Whether the current screen takes all input.
    #[must_use]
    pub fn screen_locked_input(&self) -> bool {
        self.current_screen().capabilities().handles_all_input
    }

    /// Whether the 3D pass runs this frame.
    #[must_use]
    pub fn world_visible(&self) -> bool {
        self.active_screen()
            .map_or(true, |screen| !screen.capabilities().blocks_world)
    }

    /// Whether the HUD is drawn under the active screen.
    #[must_use]
    pub fn hud_visible(&self) -> bool {
        self.active_screen()
            .map_or(true, |screen| !screen.capabilities().hides_hud)
    }

    /// The HUD.
    #[must_use]
    pub fn hud(&self) -> &HudScreen {
        &self.hud
    }

    /// Mutable HUD access, for option changes.
    pub fn hud_mut(&mut self) -> &mut HudScreen {
        &mut self.hud
    }

    /// Queued warnings, front first.
    pub fn warnings(&self) -> impl Iterator<Item = &WarningScreen> {
        let queue = match &self.active {
            Some(ActiveScreen::Warnings(queue)) => Some(queue),
            _ => None,
        };
        queue.into_iter().flatten()
    }

    /// Number of queued warnings.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Replaces the active screen. `None` returns input to the HUD.
    ///
    /// With warnings queued the request is deferred: `screen` is initialized
    /// and parked on the front warning, replacing (and disposing) whatever
    /// was parked before.
    pub fn set_new_screen(&mut self, screen: Option<Box<dyn Screen>>, host: &mut dyn ScreenHost) {
        if let Some(ActiveScreen::Warnings(queue)) = &mut self.active {
            if let Some(front) = queue.front_mut() {
                if let Some(mut parked) = front.pending_replacement.take() {
                    tracing::debug!("disposing deferred screen {}", parked.name());
                    parked.dispose();
                }
                let mut screen = screen;
                if let Some(s) = screen.as_mut() {
                    s.init();
                    tracing::debug!("deferring screen {} behind warning", s.name());
                }
                front.pending_replacement = screen;
                return;
            }
        }

        let old = match self.active.take() {
            Some(ActiveScreen::Screen(old)) => Some(old),
            // Warnings always leave through `dismiss_warning`.
            Some(ActiveScreen::Warnings(_)) | None => None,
        };
        self.install(old, screen, host);
    }

    /// Shows a warning dialog over everything else.
    ///
    /// The first warning holds the active screen aside and forces the cursor
    /// visible; later ones queue behind it and share its saved cursor state.
    pub fn show_warning(&mut self, mut warning: WarningScreen, host: &mut dyn ScreenHost) {
        tracing::debug!("showing warning '{}'", warning.title());
        match &mut self.active {
            Some(ActiveScreen::Warnings(queue)) => {
                if let Some(first) = queue.front() {
                    warning.saved_cursor_visible = first.saved_cursor_visible;
                }
                warning.init();
                queue.push_back(warning);
            }
            active => {
                warning.pending_replacement = match active.take() {
                    Some(ActiveScreen::Screen(screen)) => Some(screen),
                    Some(ActiveScreen::Warnings(_)) | None => None,
                };
                warning.saved_cursor_visible = host.cursor_visible();
                if !warning.saved_cursor_visible {
                    host.set_cursor_visible(true);
                }
                warning.init();
                *active = Some(ActiveScreen::Warnings(VecDeque::from([warning])));
            }
        }
    }

    /// Closes the front warning. Returns false if none was showing.
    ///
    /// The parked screen travels to the next warning. When the last warning
    /// closes, the saved cursor visibility is restored and the parked screen
    /// becomes active as-is; it was initialized when it was parked.
    pub fn dismiss_warning(&mut self, host: &mut dyn ScreenHost) -> bool {
        let Some(ActiveScreen::Warnings(queue)) = &mut self.active else {
            return false;
        };
        let Some(mut closed) = queue.pop_front() else {
            return false;
        };
        let parked = closed.pending_replacement.take();

        if let Some(next) = queue.front_mut() {
            tracing::debug!("warning '{}' closed, showing '{}'", closed.title(), next.title());
            next.pending_replacement = parked;
            closed.dispose();
            return true;
        }

        tracing::debug!("last warning '{}' closed", closed.title());
        self.active = None;
        host.screen_changed(Some(&closed as &dyn Screen), parked.as_deref());
        closed.dispose();
        host.set_cursor_visible(closed.saved_cursor_visible);
        self.commit(parked);
        true
    }

    /// Disposes and re-initializes the HUD in place.
    pub fn refresh_hud(&mut self) {
        self.hud.dispose();
        self.hud.init();
    }

    /// Forwards a window resize to every live screen and the HUD.
    pub fn resize(&mut self, old: Extent, new: Extent) {
        match &mut self.active {
            None => {}
            Some(ActiveScreen::Screen(screen)) => screen.resize(old, new),
            Some(ActiveScreen::Warnings(queue)) => {
                for warning in queue.iter_mut() {
                    warning.resize(old, new);
                    if let Some(parked) = warning.pending_replacement.as_mut() {
                        parked.resize(old, new);
                    }
                }
            }
        }
        self.hud.resize(old, new);
    }

    /// Records the HUD (unless hidden) and then the active screen.
    pub fn render(&mut self, delta: f64, ui: &mut UIRenderer) {
        if self.hud_visible() {
            ui.begin_layer(self.hud.name());
            self.hud.render(delta, ui);
        }
        match &mut self.active {
            None => {}
            Some(ActiveScreen::Screen(screen)) => {
                ui.begin_layer(screen.name());
                screen.render(delta, ui);
            }
            Some(ActiveScreen::Warnings(queue)) => {
                if let Some(front) = queue.front_mut() {
                    ui.begin_layer(front.name());
                    front.render(delta, ui);
                }
            }
        }
    }

    /// Disposes every screen this machine owns, HUD last.
    ///
    /// Safe to call more than once.
    pub fn dispose_all(&mut self) {
        match self.active.take() {
            None => {}
            Some(ActiveScreen::Screen(mut screen)) => screen.dispose(),
            Some(ActiveScreen::Warnings(queue)) => {
                for mut warning in queue {
                    if let Some(mut parked) = warning.pending_replacement.take() {
                        parked.dispose();
                    }
                    warning.dispose();
                }
            }
        }
        if self.hud.is_initialized() {
            self.hud.dispose();
        }
    }

    fn install(
        &mut self,
        old: Option<Box<dyn Screen>>,
        new: Option<Box<dyn Screen>>,
        host: &mut dyn ScreenHost,
    ) {
        host.screen_changed(old.as_deref(), new.as_deref());
        let had_screen = old.is_some();
        if let Some(mut old) = old {
            tracing::debug!("disposing screen {}", old.name());
            old.dispose();
        }

        if new.is_none() {
            self.hud.gain_focus();
        } else if !had_screen {
            self.hud.lose_focus();
        }

        let mut new = new;
        if let Some(screen) = new.as_mut() {
            tracing::debug!("installing screen {}", screen.name());
            screen.init();
        }
        self.active = new.map(ActiveScreen::Screen);
    }

    /// Installs a screen that is already initialized.
    fn commit(&mut self, screen: Option<Box<dyn Screen>>) {
        match &screen {
            None => self.hud.gain_focus(),
            Some(_) => self.hud.lose_focus(),
        }
        self.active = screen.map(ActiveScreen::Screen);
    }
}

impl std::fmt::Debug for ScreenStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenStateMachine")
            .field("state", &self.state())
            .field("active", &self.active_screen().map(Screen::name))
            .field("warnings", &self.warning_count())
            .field("hud", &self.hud)
            .finish()
    }
}
