//! Fixed-timestep loop driving the simulation.
//!
//! Frame time is accumulated and consumed in fixed steps, so the service sees
//! the same `delta_seconds` every step regardless of how frames are paced.
//! The headless harness feeds frame times explicitly.

use tracing::warn;

/// Maximum frame time accepted in one call. Longer frames are clamped and the
/// simulation slows down instead of running a burst of catch-up steps.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Accumulator-based fixed-step scheduler.
pub struct GameLoop {
    fixed_dt: f64,
    accumulator: f64,
    total_sim_time: f64,
    frame_count: u64,
    step_count: u64,
}

impl GameLoop {
    /// Creates a loop stepping at `tick_rate_hz`. A rate of zero is treated
    /// as one step per second.
    pub fn new(tick_rate_hz: u32) -> Self {
        Self {
            fixed_dt: 1.0 / f64::from(tick_rate_hz.max(1)),
            accumulator: 0.0,
            total_sim_time: 0.0,
            frame_count: 0,
            step_count: 0,
        }
    }

    /// Adds `frame_time` seconds and runs as many fixed steps as fit.
    ///
    /// `step_fn(fixed_dt, step_index)` is called zero or more times; step
    /// indices start at 0 and increase by one per step. Returns the number of
    /// steps run.
    pub fn advance(&mut self, frame_time: f64, mut step_fn: impl FnMut(f64, u64)) -> u32 {
        let mut frame_time = frame_time.max(0.0);
        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }

        self.accumulator += frame_time;

        let mut steps = 0;
        while self.accumulator >= self.fixed_dt {
            step_fn(self.fixed_dt, self.step_count);
            self.total_sim_time += self.fixed_dt;
            self.accumulator -= self.fixed_dt;
            self.step_count += 1;
            steps += 1;
        }

        self.frame_count += 1;
        steps
    }

    pub fn fixed_dt(&self) -> f64 {
        self.fixed_dt
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Total fixed steps executed.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Total simulated time in seconds.
    pub fn total_sim_time(&self) -> f64 {
        self.total_sim_time
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new(60)
    }
}
