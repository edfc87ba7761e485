//! # Engine Constants
//!
//! Timing and file-system values shared by every unit.
//!
//! **NOTE:** The tick frequency is part of the simulation contract with the
//! server. Changing it changes how fast the world runs.

// =============================================================================
// TIMING
// =============================================================================

/// Simulation ticks per second.
pub const TICK_FREQUENCY: u32 = 20;

/// Camera updates per second.
///
/// Camera ticks run finer than simulation ticks so mouse look stays smooth.
pub const CAMERA_FREQUENCY: u32 = 120;

/// Seconds between maintenance sweeps.
pub const MAINTENANCE_PERIOD_SECS: f64 = 30.0;

/// Downloads older than this many seconds are evicted by a maintenance sweep.
pub const DOWNLOAD_MAX_AGE_SECS: f64 = 10.0;

// =============================================================================
// OUTPUT
// =============================================================================

/// Directory screenshots are written to, relative to the working directory.
pub const SCREENSHOT_DIR: &str = "screenshots";

/// Near clip plane distance in blocks.
pub const NEAR_PLANE: f32 = 0.1;

/// Field of view used for the held-item projection, in degrees.
pub const HELD_ITEM_FOV: f32 = 70.0;
