//! # TESSERA
//!
//! The client session, integrating every unit.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              GAME SESSION                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐   │
//! │  │  tessera_core   │     │ tessera_render  │     │   tessera_ui    │   │
//! │  │                 │     │                 │     │                 │   │
//! │  │  • FrameClock   │────>│  • Camera       │     │  • Screens      │   │
//! │  │  • FpsLimiter   │     │  • Frustum      │     │  • Warnings     │   │
//! │  │  • Teardown     │     │  • Picking      │     │  • HUD / chat   │   │
//! │  └────────┬────────┘     └────────┬────────┘     └────────┬────────┘   │
//! │           │                       │                       │            │
//! │           └──────────────┬────────┴───────────────────────┘            │
//! │                          ▼                                             │
//! │                 ┌─────────────────┐        ┌──────────────────┐        │
//! │                 │      Game       │<───────│  SessionEvents   │        │
//! │                 │ on_render_frame │        │ (other threads)  │        │
//! │                 └────────┬────────┘        └──────────────────┘        │
//! │                          ▼                                             │
//! │     Collaborators: backend, scene, network, map, input, window         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `game`: Session lifecycle and frame orchestration
//! - `dispatch`: Tick fan-out to collaborators
//! - `collaborators`: Interfaces to external systems
//! - `events`: Cross-thread session events
//! - `options`: Persisted user settings
//! - `stats`: Frame statistics

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod collaborators;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod game;
pub mod options;
pub mod stats;

// Re-export the units
pub use tessera_core as core;
pub use tessera_rendering as rendering;
pub use tessera_shared as shared;
pub use tessera_ui as ui;

pub use collaborators::{
    Collaborators, DeviceInput, InputHandler, NetworkSession, Simulated, Window, WorldMap,
};
pub use dispatch::TickDispatcher;
pub use error::{GameError, GameResult, OptionsError};
pub use events::{EventReceiver, EventSender, SessionEvent};
pub use game::{Game, GameConfig};
pub use options::Options;
pub use stats::{FrameStats, FrameStatsAccumulator};
