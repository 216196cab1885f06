use tracing::debug;

/// Throttles a display-refresh callback down to a target frame rate.
///
/// Timestamps are milliseconds on any monotonic-ish clock. The accepted
/// timestamp advances in whole intervals so the remainder carries into the
/// next frame instead of drifting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTimer {
    interval: f64,
    then: f64,
}

impl FrameTimer {
    pub fn new(interval_ms: f64, now: f64) -> Self {
        Self {
            interval: interval_ms,
            then: now,
        }
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    pub fn last_accepted(&self) -> f64 {
        self.then
    }

    /// Returns the elapsed time when a frame is due and advances the timer,
    /// `None` when the frame should be skipped.
    pub fn poll(&mut self, now: f64) -> Option<f64> {
        let elapsed = now - self.then;
        if elapsed < 0.0 {
            debug!(now, then = self.then, "clock went backwards; rebasing frame timer");
            self.then = now;
            return None;
        }
        if elapsed < self.interval {
            return None;
        }
        self.then = now - (elapsed % self.interval);
        Some(elapsed)
    }
}
