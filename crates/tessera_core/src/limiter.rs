//! # FPS Limiter
//!
//! Software frame pacing. The limiter keeps a signed backlog of frame time
//! against a target frame length:
//!
//! - backlog ≥ target: the frame was already slow enough, pay one target off
//! - otherwise: sleep `ceil(target - backlog)` ms, backlog untouched
//!
//! The next frame's elapsed time includes the sleep, so it always pays the
//! target off. Fast frames therefore come in sleep/pay pairs, two frames per
//! target, and each method's target is twice its nominal frame length:
//!
//! ```text
//! Limit120Fps  1000 / 60 ms
//! Limit60Fps   1000 / 30 ms
//! Limit30Fps   1000 / 15 ms
//! ```
//!
//! A target of zero disables the limiter entirely (vsync or uncapped).

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How frame rate is limited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FpsLimitMethod {
    /// Pacing is delegated to the display's vertical sync.
    #[default]
    LimitVSync,
    /// Software limit at 120 frames per second.
    Limit120Fps,
    /// Software limit at 60 frames per second.
    Limit60Fps,
    /// Software limit at 30 frames per second.
    Limit30Fps,
    /// No limit at all.
    LimitNone,
}

impl FpsLimitMethod {
    /// Limiter target in milliseconds, zero when software limiting is off.
    ///
    /// Covers one sleep/pay frame pair, i.e. two nominal frames.
    #[must_use]
    pub fn frame_millis(self) -> f64 {
        match self {
            Self::LimitVSync | Self::LimitNone => 0.0,
            Self::Limit120Fps => 1000.0 / 60.0,
            Self::Limit60Fps => 1000.0 / 30.0,
            Self::Limit30Fps => 1000.0 / 15.0,
        }
    }

    /// Whether the backend should wait for vertical sync.
    #[must_use]
    pub const fn uses_vsync(self) -> bool {
        matches!(self, Self::LimitVSync)
    }
}

/// Backlog-based frame limiter.
#[derive(Clone, Debug, Default)]
pub struct FpsLimiter {
    /// Active method.
    method: FpsLimitMethod,
    /// Target frame length; zero disables throttling.
    target_frame_millis: f64,
    /// Signed backlog of frame time not yet paid off.
    carried_over_millis: f64,
}

impl FpsLimiter {
    /// Creates a limiter for `method`.
    #[must_use]
    pub fn new(method: FpsLimitMethod) -> Self {
        let mut limiter = Self::default();
        limiter.set_method(method);
        limiter
    }

    /// Switches method, clearing target and backlog together.
    ///
    /// Returns whether vsync should be enabled on the backend.
    pub fn set_method(&mut self, method: FpsLimitMethod) -> bool {
        *self = Self {
            method,
            target_frame_millis: method.frame_millis(),
            carried_over_millis: 0.0,
        };
        method.uses_vsync()
    }

    /// Books `elapsed_ms` and returns how long the caller should sleep.
    pub fn pace(&mut self, elapsed_ms: f64) -> Option<Duration> {
        if self.target_frame_millis <= 0.0 {
            return None;
        }

        if elapsed_ms.is_finite() && elapsed_ms > 0.0 {
            self.carried_over_millis += elapsed_ms;
        }

        if self.carried_over_millis >= self.target_frame_millis {
            self.carried_over_millis -= self.target_frame_millis;
            return None;
        }

        let sleep_ms = (self.target_frame_millis - self.carried_over_millis).ceil();
        Some(Duration::from_millis(sleep_ms as u64))
    }

    /// Books `elapsed_ms` and blocks the calling thread if the frame was fast.
    ///
    /// Returns the time slept.
    pub fn throttle(&mut self, elapsed_ms: f64) -> Option<Duration> {
        let sleep = self.pace(elapsed_ms)?;
        std::thread::sleep(sleep);
        Some(sleep)
    }

    /// Active method.
    #[must_use]
    pub fn method(&self) -> FpsLimitMethod {
        self.method
    }

    /// Target frame length in milliseconds.
    #[must_use]
    pub fn target_frame_millis(&self) -> f64 {
        self.target_frame_millis
    }

    /// Current backlog in milliseconds.
    #[must_use]
    pub fn carried_over_millis(&self) -> f64 {
        self.carried_over_millis
    }
}
