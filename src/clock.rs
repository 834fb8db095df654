use std::time::Instant;

use tracing::trace;

/// Longest frame the loop will simulate. Anything beyond (debugger pause,
/// window drag) is dropped instead of replayed.
pub const MAX_FRAME_DT: f32 = 0.25;

/// Shortest fixed step accepted. Zero, negative and NaN steps are raised to it.
pub const MIN_FIXED_STEP: f32 = 1e-4;

/// Wall-clock frame timer.
pub struct FrameTimer {
    last: Instant,
    pub dt: f32,
    pub elapsed: f32,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            dt: 0.0,
            elapsed: 0.0,
        }
    }

    pub fn tick(&mut self) {
        let now = Instant::now();
        self.dt = now.duration_since(self.last).as_secs_f32().min(MAX_FRAME_DT);
        self.elapsed += self.dt;
        self.last = now;
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Accumulator that turns variable frame times into a whole number of
/// fixed physics ticks, carrying the remainder to the next frame.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn from_hz(hz: u32) -> Self {
        Self::new(1.0 / hz.max(1) as f32)
    }

    pub fn new(step: f32) -> Self {
        Self {
            step: step.max(MIN_FIXED_STEP),
            accumulator: 0.0,
        }
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Add `frame_dt` and return how many fixed ticks are now due.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.min(MAX_FRAME_DT);
        let mut ticks = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            ticks += 1;
        }
        if ticks > 1 {
            trace!(ticks, "catching up fixed ticks");
        }
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slow_frames_run_several_ticks() {
        let mut clock = FixedTimestep::new(0.02);
        assert_eq!(clock.advance(0.05), 2);
        // 0.01 carried over.
        assert_eq!(clock.advance(0.011), 1);
    }

    #[test]
    fn fast_frames_carry_remainder() {
        let mut clock = FixedTimestep::from_hz(50);
        let ticks: u32 = (0..3).map(|_| clock.advance(0.008)).sum();
        // 0.024 accumulated: one tick, 0.004 left over.
        assert_eq!(ticks, 1);
        assert_eq!(clock.advance(0.015), 0);
        assert_eq!(clock.advance(0.002), 1);
    }

    #[test]
    fn huge_frames_are_clamped() {
        let mut clock = FixedTimestep::new(0.1);
        assert_eq!(clock.advance(10.0), 2);
    }

    #[test]
    fn degenerate_steps_are_raised_to_the_minimum() {
        for step in [0.0, -0.02, f32::NAN] {
            let mut clock = FixedTimestep::new(step);
            assert_eq!(clock.step(), MIN_FIXED_STEP);
            let ticks = clock.advance(0.01);
            assert!((99..=100).contains(&ticks), "ticks = {}", ticks);
        }
    }
}
