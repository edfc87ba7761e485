//! # TESSERA Shared
//!
//! Common types used by every unit of the client core.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on a graphics, window or network crate.
//! If you need backend types, put them in `tessera_rendering`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod math;

pub use constants::{
    CAMERA_FREQUENCY, DOWNLOAD_MAX_AGE_SECS, MAINTENANCE_PERIOD_SECS, SCREENSHOT_DIR,
    TICK_FREQUENCY,
};
pub use math::{Mat4, Vec2, Vec3};
