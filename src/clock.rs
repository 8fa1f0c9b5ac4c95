//! Fixed-step simulation clock
//!
//! The frame signal arrives at whatever rate the display runs. Elapsed time is
//! banked in an accumulator and paid out in uniform steps. Pausing cancels
//! the frame subscription but keeps the banked time.

/// Accumulator-driven fixed timestep
#[derive(Debug, Clone)]
pub struct SimulationClock {
    step: f32,
    max_frame_delta: f32,
    accumulator: f32,
    running: bool,
    last_time: Option<f64>,
}

impl SimulationClock {
    /// New clock, initially paused
    pub fn new(step: f32, max_frame_delta: f32) -> Self {
        Self {
            step,
            max_frame_delta,
            accumulator: 0.0,
            running: false,
            last_time: None,
        }
    }

    #[inline]
    pub fn step(&self) -> f32 {
        self.step
    }

    #[inline]
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Time of the last frame seen while running
    #[inline]
    pub fn last_time(&self) -> Option<f64> {
        self.last_time
    }

    /// Forget the last frame time so the next frame has zero delta. The bank
    /// is kept.
    pub fn restart_timing(&mut self) {
        self.last_time = None;
    }

    /// Resume. Returns true if the clock was paused, in which case the caller
    /// owes one immediate frame at `last_time`.
    pub fn run(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        true
    }

    /// Stop taking frames. Returns true if the clock was running.
    pub fn pause(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        true
    }

    /// Start a frame at absolute time `now` (seconds).
    ///
    /// Returns the real elapsed delta since the previous frame, or `None` while
    /// paused. Only up to `max_frame_delta` of it is banked.
    pub fn begin_frame(&mut self, now: f64) -> Option<f32> {
        if !self.running {
            return None;
        }
        let delta = match self.last_time {
            Some(last) => (now - last).max(0.0) as f32,
            None => 0.0,
        };
        self.last_time = Some(now);
        self.accumulator += delta.min(self.max_frame_delta);
        Some(delta)
    }

    /// Pay out one fixed step, if the bank holds more than a step and the clock
    /// is still running
    pub fn next_step(&mut self) -> Option<f32> {
        if self.running && self.accumulator > self.step {
            self.accumulator -= self.step;
            Some(self.step)
        } else {
            None
        }
    }
}
