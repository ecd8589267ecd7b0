//! Frame timing

use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds.
    pub dt: f32,

    /// Seconds since the clock was created (the lessons' `glfwGetTime`).
    pub elapsed: f32,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// Delta time is clamped so a stall (window drag, debugger) doesn't hand
/// the simulation a huge step.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    frame_index: u64,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            frame_index: 0,
            dt_max: Duration::from_millis(250),
        }
    }

    /// Resets the delta baseline (after a suspend or long reconfigure).
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now.saturating_duration_since(self.last).min(self.dt_max);
        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: now.saturating_duration_since(self.start).as_secs_f32(),
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed timestep accumulator
///
/// Turns variable frame times into a whole number of simulation steps,
/// capped so a slow frame can't snowball.
#[derive(Debug, Clone)]
pub struct FixedStep {
    step: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl FixedStep {
    pub fn new(step: f32, max_substeps: u32) -> Self {
        Self {
            step,
            max_substeps,
            accumulator: 0.0,
        }
    }

    /// Add frame time and return how many steps to run now
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.max(0.0);

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_substeps {
            self.accumulator -= self.step;
            steps += 1;
        }
        // Hit the cap: drop the backlog instead of carrying it forward
        if steps == self.max_substeps {
            self.accumulator = self.accumulator.min(self.step);
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_step_accumulates() {
        let mut fixed = FixedStep::new(0.01, 8);
        assert_eq!(fixed.advance(0.005), 0);
        assert_eq!(fixed.advance(0.006), 1);
        assert_eq!(fixed.advance(0.025), 2);
    }

    #[test]
    fn test_fixed_step_caps_substeps() {
        let mut fixed = FixedStep::new(0.01, 4);
        assert_eq!(fixed.advance(1.0), 4);
        // Backlog was dropped, so the next short frame runs at most one step
        assert!(fixed.advance(0.001) <= 1);
    }

    #[test]
    fn test_fixed_step_ignores_negative_time() {
        let mut fixed = FixedStep::new(0.01, 4);
        assert_eq!(fixed.advance(-5.0), 0);
        assert_eq!(fixed.advance(0.01), 1);
    }

    #[test]
    fn test_frame_clock_counts_frames() {
        let mut clock = FrameClock::new();
        let a = clock.tick();
        let b = clock.tick();
        assert_eq!(a.frame_index, 0);
        assert_eq!(b.frame_index, 1);
        assert!(b.elapsed >= a.elapsed);
        assert!(b.dt <= 0.25);
    }
}
