//! # TESSERA Core
//!
//! Timing and lifecycle plumbing for the client core.
//!
//! ## Modules
//!
//! - `clock`: Frame clock, fixed-period tick extraction
//! - `limiter`: Software FPS limiting
//! - `downloads`: Download cache swept by maintenance ticks
//! - `teardown`: Scoped resource release
//!
//! ## Threading
//!
//! Everything here except [`DownloadCache`] assumes it is driven from the one
//! thread that owns the frame loop. The cache is the hand-off point for
//! background downloads, so it is the only type with interior locking.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod clock;
pub mod downloads;
pub mod limiter;
pub mod teardown;

pub use clock::{ClockConfig, FrameClock, TickHandler, TickReport};
pub use downloads::{DownloadCache, DownloadedItem};
pub use limiter::{FpsLimitMethod, FpsLimiter};
pub use teardown::{release_all, Disposable, TeardownError, TeardownReport, TeardownResult};
