//! Per-frame statistics.

use std::fmt;

/// What one call to [`crate::Game::on_render_frame`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    /// Seconds since the previous frame.
    pub delta: f64,
    /// Simulation ticks run.
    pub ticks: u32,
    /// Camera ticks run.
    pub camera_ticks: u32,
    /// Interpolation fraction used for rendering.
    pub interpolation: f32,
    /// Whether the 3D pass ran.
    pub world_visible: bool,
    /// Whether a maintenance sweep ran.
    pub maintenance_ran: bool,
    /// Milliseconds the limiter slept before the frame.
    pub slept_ms: u64,
}

/// Rolling totals over many frames.
#[derive(Clone, Debug)]
pub struct FrameStatsAccumulator {
    /// Frames recorded.
    pub frames_recorded: u64,
    /// Sum of frame deltas in seconds.
    pub delta_sum: f64,
    /// Shortest frame.
    pub min_delta: f64,
    /// Longest frame.
    pub max_delta: f64,
    /// Simulation ticks run.
    pub ticks: u64,
    /// Camera ticks run.
    pub camera_ticks: u64,
    /// Frames in which the world was hidden behind a screen.
    pub frames_world_hidden: u64,
    /// Frames that needed more than one catch-up tick.
    pub frames_catching_up: u64,
}

impl FrameStatsAccumulator {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames_recorded: 0,
            delta_sum: 0.0,
            min_delta: f64::MAX,
            max_delta: 0.0,
            ticks: 0,
            camera_ticks: 0,
            frames_world_hidden: 0,
            frames_catching_up: 0,
        }
    }

    /// Records one frame.
    pub fn record(&mut self, stats: &FrameStats) {
        self.frames_recorded += 1;
        self.delta_sum += stats.delta;
        self.min_delta = self.min_delta.min(stats.delta);
        self.max_delta = self.max_delta.max(stats.delta);
        self.ticks += u64::from(stats.ticks);
        self.camera_ticks += u64::from(stats.camera_ticks);
        if !stats.world_visible {
            self.frames_world_hidden += 1;
        }
        if stats.ticks > 1 {
            self.frames_catching_up += 1;
        }
    }

    /// Average frame time in milliseconds.
    #[must_use]
    pub fn avg_frame_ms(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        self.delta_sum / self.frames_recorded as f64 * 1000.0
    }

    /// Average frames per second.
    #[must_use]
    pub fn avg_fps(&self) -> f64 {
        let avg_ms = self.avg_frame_ms();
        if avg_ms <= 0.0 {
            return 0.0;
        }
        1000.0 / avg_ms
    }

    /// Simulation ticks per second of recorded time.
    #[must_use]
    pub fn tick_rate(&self) -> f64 {
        if self.delta_sum <= 0.0 {
            return 0.0;
        }
        self.ticks as f64 / self.delta_sum
    }
}

impl Default for FrameStatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FrameStatsAccumulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.frames_recorded == 0 {
            return write!(f, "no frames recorded");
        }
        write!(
            f,
            "{} frames, avg {:.3} ms ({:.1} fps), min {:.3} ms, max {:.3} ms, \
             {} ticks ({:.1}/s), {} catching up, {} world hidden",
            self.frames_recorded,
            self.avg_frame_ms(),
            self.avg_fps(),
            self.min_delta * 1000.0,
            self.max_delta * 1000.0,
            self.ticks,
            self.tick_rate(),
            self.frames_catching_up,
            self.frames_world_hidden,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(delta: f64, ticks: u32, world_visible: bool) -> FrameStats {
        FrameStats {
            delta,
            ticks,
            world_visible,
            ..FrameStats::default()
        }
    }

    #[test]
    fn test_empty() {
        let acc = FrameStatsAccumulator::new();
        assert_eq!(acc.avg_fps(), 0.0);
        assert_eq!(acc.to_string(), "no frames recorded");
    }

    #[test]
    fn test_record() {
        let mut acc = FrameStatsAccumulator::new();
        acc.record(&frame(0.02, 0, true));
        acc.record(&frame(0.02, 1, true));
        acc.record(&frame(0.11, 2, false));

        assert_eq!(acc.frames_recorded, 3);
        assert_eq!(acc.ticks, 3);
        assert_eq!(acc.frames_catching_up, 1);
        assert_eq!(acc.frames_world_hidden, 1);
        assert!((acc.avg_frame_ms() - 50.0).abs() < 1e-9);
        assert!((acc.avg_fps() - 20.0).abs() < 1e-9);
        assert!((acc.max_delta - 0.11).abs() < 1e-12);
        assert!((acc.tick_rate() - 20.0).abs() < 1e-9);
    }
}
