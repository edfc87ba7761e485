//! # Frame Clock
//!
//! Turns variable wall-clock frame deltas into fixed-period ticks.
//!
//! ```text
//! advance(elapsed):
//! ┌──────────────────────────────────────────────────────────────┐
//! │ 1. every accumulator += elapsed                              │
//! │ 2. maintenance ≥ period  → one sweep                         │
//! │ 3. while tick ≥ period   → tick(tick_period)                 │
//! │ 4. while camera ≥ period → camera_tick(tick_period)          │
//! │ 5. ticks > frequency / 3 → "falling behind" diagnostic       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Catch-up is uncapped: after a long stall every owed tick runs in the
//! same frame. Dropping simulated time would desync the client from the
//! server's tick count.

use tessera_shared::{
    CAMERA_FREQUENCY, DOWNLOAD_MAX_AGE_SECS, MAINTENANCE_PERIOD_SECS, TICK_FREQUENCY,
};

/// Configuration for the frame clock.
#[derive(Clone, Debug, PartialEq)]
pub struct ClockConfig {
    /// Simulation ticks per second.
    pub tick_frequency: u32,
    /// Camera ticks per second.
    pub camera_frequency: u32,
    /// Seconds between maintenance sweeps.
    pub maintenance_period: f64,
    /// Age threshold handed to each maintenance sweep, in seconds.
    pub maintenance_max_age: f64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            tick_frequency: TICK_FREQUENCY,
            camera_frequency: CAMERA_FREQUENCY,
            maintenance_period: MAINTENANCE_PERIOD_SECS,
            maintenance_max_age: DOWNLOAD_MAX_AGE_SECS,
        }
    }
}

/// Receiver of the work a frame clock extracts.
///
/// The session implements this by fanning out to its collaborators.
pub trait TickHandler {
    /// One fixed simulation step of `period` seconds.
    fn tick(&mut self, period: f64);

    /// One camera step. `period` is the simulation tick period.
    fn camera_tick(&mut self, period: f64);

    /// Periodic sweep; evict anything older than `max_age` seconds.
    fn maintenance(&mut self, max_age: f64);
}

/// What a single `advance` did.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Simulation ticks run this frame.
    pub ticks: u32,
    /// Camera ticks run this frame.
    pub camera_ticks: u32,
    /// Whether the maintenance sweep ran.
    pub maintenance_ran: bool,
    /// Interpolation fraction after catch-up, in `[0, 1)`.
    pub interpolation: f32,
    /// More ticks than a third of the tick frequency were needed.
    pub falling_behind: bool,
}

/// Fixed-timestep frame clock.
///
/// Each accumulator only grows by elapsed time and only shrinks by whole
/// periods, so none of them can go negative.
#[derive(Clone, Debug)]
pub struct FrameClock {
    /// Configuration.
    config: ClockConfig,
    /// Seconds per simulation tick.
    tick_period: f64,
    /// Seconds per camera tick.
    camera_period: f64,
    /// Total time handed to `advance`.
    accumulated_render_time: f64,
    /// Unconsumed simulation time.
    tick_accumulator: f64,
    /// Unconsumed maintenance time.
    maintenance_accumulator: f64,
    /// Unconsumed camera time.
    camera_accumulator: f64,
    /// Ticks run since creation.
    total_ticks: u64,
}

impl FrameClock {
    /// Creates a clock with all accumulators at zero.
    #[must_use]
    pub fn new(config: ClockConfig) -> Self {
        let tick_period = 1.0 / f64::from(config.tick_frequency.max(1));
        let camera_period = 1.0 / f64::from(config.camera_frequency.max(1));
        Self {
            config,
            tick_period,
            camera_period,
            accumulated_render_time: 0.0,
            tick_accumulator: 0.0,
            maintenance_accumulator: 0.0,
            camera_accumulator: 0.0,
            total_ticks: 0,
        }
    }

    /// Advances the clock by `elapsed` seconds, driving `handler`.
    ///
    /// Negative and non-finite deltas are treated as zero.
    pub fn advance<H: TickHandler + ?Sized>(&mut self, elapsed: f64, handler: &mut H) -> TickReport {
        let elapsed = if elapsed.is_finite() && elapsed > 0.0 {
            elapsed
        } else {
            0.0
        };

        self.accumulated_render_time += elapsed;
        self.tick_accumulator += elapsed;
        self.maintenance_accumulator += elapsed;
        self.camera_accumulator += elapsed;

        let mut report = TickReport::default();

        if self.maintenance_accumulator >= self.config.maintenance_period {
            self.maintenance_accumulator -= self.config.maintenance_period;
            handler.maintenance(self.config.maintenance_max_age);
            report.maintenance_ran = true;
        }

        while self.tick_accumulator >= self.tick_period {
            self.tick_accumulator -= self.tick_period;
            handler.tick(self.tick_period);
            report.ticks += 1;
        }
        self.total_ticks += u64::from(report.ticks);

        while self.camera_accumulator >= self.camera_period {
            self.camera_accumulator -= self.camera_period;
            handler.camera_tick(self.tick_period);
            report.camera_ticks += 1;
        }

        if report.ticks > self.config.tick_frequency / 3 {
            report.falling_behind = true;
            tracing::debug!("Falling behind (did {} ticks this frame)", report.ticks);
        }

        report.interpolation = self.interpolation();
        report
    }

    /// Fraction of the way from the last tick to the next.
    #[must_use]
    pub fn interpolation(&self) -> f32 {
        (self.tick_accumulator / self.tick_period) as f32
    }

    /// Seconds per simulation tick.
    #[must_use]
    pub fn tick_period(&self) -> f64 {
        self.tick_period
    }

    /// Seconds per camera tick.
    #[must_use]
    pub fn camera_period(&self) -> f64 {
        self.camera_period
    }

    /// Unconsumed simulation time.
    #[must_use]
    pub fn tick_accumulator(&self) -> f64 {
        self.tick_accumulator
    }

    /// Unconsumed camera time.
    #[must_use]
    pub fn camera_accumulator(&self) -> f64 {
        self.camera_accumulator
    }

    /// Unconsumed maintenance time.
    #[must_use]
    pub fn maintenance_accumulator(&self) -> f64 {
        self.maintenance_accumulator
    }

    /// Total time handed to `advance`.
    #[must_use]
    pub fn accumulated_render_time(&self) -> f64 {
        self.accumulated_render_time
    }

    /// Ticks run since creation.
    #[must_use]
    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ClockConfig {
        &self.config
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(ClockConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Call {
        Tick(f64),
        Camera(f64),
        Maintenance(f64),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl TickHandler for Recorder {
        fn tick(&mut self, period: f64) {
            self.calls.push(Call::Tick(period));
        }
        fn camera_tick(&mut self, period: f64) {
            self.calls.push(Call::Camera(period));
        }
        fn maintenance(&mut self, max_age: f64) {
            self.calls.push(Call::Maintenance(max_age));
        }
    }

    impl Recorder {
        fn ticks(&self) -> usize {
            self.calls.iter().filter(|c| matches!(c, Call::Tick(_))).count()
        }
    }

    #[test]
    fn test_two_ticks_from_a_tenth_of_a_second() {
        let mut clock = FrameClock::default();
        let mut rec = Recorder::default();
        assert!((clock.tick_period() - 0.05).abs() < f64::EPSILON);

        let report = clock.advance(0.1, &mut rec);

        assert_eq!(report.ticks, 2);
        assert_eq!(rec.ticks(), 2);
        assert!(clock.tick_accumulator().abs() < 1e-9);
        assert!(report.interpolation.abs() < 1e-6);
    }

    #[test]
    fn test_camera_ticks_use_tick_period() {
        let mut clock = FrameClock::default();
        let mut rec = Recorder::default();

        let report = clock.advance(0.02, &mut rec);

        assert_eq!(report.ticks, 0);
        assert_eq!(report.camera_ticks, 2);
        for call in &rec.calls {
            assert_eq!(*call, Call::Camera(clock.tick_period()));
        }
    }

    #[test]
    fn test_accumulators_never_negative() {
        let mut clock = FrameClock::default();
        let mut rec = Recorder::default();
        for i in 0..5_000 {
            let e = f64::from(i % 37) * 0.0013;
            clock.advance(e, &mut rec);
            assert!(clock.tick_accumulator() >= 0.0);
            assert!(clock.camera_accumulator() >= 0.0);
            assert!(clock.maintenance_accumulator() >= 0.0);
            assert!(clock.tick_accumulator() < clock.tick_period());
            assert!(clock.camera_accumulator() < clock.camera_period());
        }
    }

    #[test]
    fn test_total_ticks_match_elapsed_time() {
        let mut clock = FrameClock::default();
        let mut rec = Recorder::default();
        let frame = 0.016;
        let frames = 10_000;
        for _ in 0..frames {
            clock.advance(frame, &mut rec);
        }
        let expected = (f64::from(frames) * frame / clock.tick_period()).floor() as i64;
        let actual = clock.total_ticks() as i64;
        assert!((actual - expected).abs() <= 1, "expected ~{expected}, got {actual}");
    }

    #[test]
    fn test_maintenance_runs_once_per_period() {
        let mut clock = FrameClock::default();
        let mut rec = Recorder::default();

        let report = clock.advance(29.0, &mut rec);
        assert!(!report.maintenance_ran);

        let report = clock.advance(1.0, &mut rec);
        assert!(report.maintenance_ran);
        assert!(rec.calls.contains(&Call::Maintenance(DOWNLOAD_MAX_AGE_SECS)));

        let report = clock.advance(0.5, &mut rec);
        assert!(!report.maintenance_ran);
    }

    #[test]
    fn test_maintenance_runs_before_ticks() {
        let mut clock = FrameClock::default();
        let mut rec = Recorder::default();
        clock.advance(30.0, &mut rec);
        assert_eq!(rec.calls[0], Call::Maintenance(DOWNLOAD_MAX_AGE_SECS));
        assert!(matches!(rec.calls[1], Call::Tick(_)));
    }

    #[test]
    fn test_stall_is_caught_up_and_flagged() {
        let mut clock = FrameClock::default();
        let mut rec = Recorder::default();

        let report = clock.advance(2.0, &mut rec);

        assert!(report.ticks >= 39);
        assert!(report.falling_behind);
    }

    #[test]
    fn test_interpolation_fraction() {
        let mut clock = FrameClock::default();
        let mut rec = Recorder::default();
        let report = clock.advance(0.075, &mut rec);
        assert_eq!(report.ticks, 1);
        assert!((report.interpolation - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_bad_deltas_are_ignored() {
        let mut clock = FrameClock::default();
        let mut rec = Recorder::default();
        clock.advance(-1.0, &mut rec);
        clock.advance(f64::NAN, &mut rec);
        clock.advance(f64::INFINITY, &mut rec);
        assert!(rec.calls.is_empty());
        assert!(clock.accumulated_render_time().abs() < f64::EPSILON);
    }
}
