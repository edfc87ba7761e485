//! # TESSERA UI
//!
//! Modal screens and the 2D overlay.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   SCREEN STATE MACHINE                    │
//! ├──────────────────────────────────────────────────────────┤
//! │  active slot: None │ Screen │ [Warning, Warning, ...]     │
//! │  HUD: always present, owns input when the slot is empty   │
//! ├──────────────────────────────────────────────────────────┤
//! │  render: HUD (unless hidden) → active → UIRenderer batches│
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Screens never see the graphics backend. They record [`RenderCommand`]s
//! and the session submits the resulting [`UIBatch`]es.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod chat;
pub mod hud;
pub mod input;
pub mod layout;
pub mod render;
pub mod screen;
pub mod screens;
pub mod state;
pub mod style;
pub mod warning;

pub use chat::{ChatLine, ChatLog};
pub use hud::HudScreen;
pub use input::{InputState, Key, KeyBinding, KeyMap, MouseButton};
pub use layout::Rect;
pub use render::{RenderCommand, UIBatch, UIRenderer, UIVertex};
pub use screen::{Extent, Screen, ScreenCapabilities, ScreenHost};
pub use screens::{ErrorScreen, FpsScreen, LoadingScreen, PauseScreen};
pub use state::{ScreenState, ScreenStateMachine};
pub use style::Color;
pub use warning::WarningScreen;
