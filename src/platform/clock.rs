//! Frame timing
//!
//! `FrameClock` turns host timestamps into clamped per-frame elapsed time.
//! `FixedStep` accumulates that time into a whole number of fixed ticks.

/// Elapsed time between host frames
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    max_frame_ms: f64,
}

impl FrameClock {
    pub fn new(max_frame_ms: f64) -> Self {
        Self {
            last_ms: None,
            max_frame_ms,
        }
    }

    /// Milliseconds since the previous call, clamped to `[0, max_frame_ms]`.
    /// The first call returns 0.
    pub fn advance(&mut self, now_ms: f64) -> f64 {
        let elapsed = match self.last_ms {
            Some(last) => (now_ms - last).clamp(0.0, self.max_frame_ms),
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        elapsed
    }
}

/// Fixed timestep accumulator
#[derive(Debug, Clone)]
pub struct FixedStep {
    period_ms: f64,
    accumulator: f64,
    max_substeps: u32,
}

impl FixedStep {
    pub fn new(period_ms: f64, max_substeps: u32) -> Self {
        Self {
            period_ms,
            accumulator: 0.0,
            max_substeps,
        }
    }

    /// Add elapsed time and return how many ticks to run now.
    ///
    /// Capped at `max_substeps`; time beyond the cap is dropped so a long
    /// stall does not snowball into later frames.
    pub fn advance(&mut self, elapsed_ms: f64) -> u32 {
        self.accumulator += elapsed_ms.max(0.0);
        let mut ticks = 0;
        while self.accumulator >= self.period_ms && ticks < self.max_substeps {
            self.accumulator -= self.period_ms;
            ticks += 1;
        }
        if ticks == self.max_substeps && self.accumulator >= self.period_ms {
            log::debug!("Dropping {:.1}ms of enemy tick backlog", self.accumulator);
            self.accumulator %= self.period_ms;
        }
        ticks
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
