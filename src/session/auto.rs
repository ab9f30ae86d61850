//! Elapsed-time accumulator for automatic stepping.

use std::time::Duration;

/// Decides how many stages are due given frame times from the host loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoStepper {
    interval: Duration,
    accumulated: Duration,
    enabled: bool,
}

impl AutoStepper {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            accumulated: Duration::ZERO,
            enabled: false,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turning the stepper on or off drops any partially accumulated time.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.accumulated = Duration::ZERO;
    }

    /// Add `elapsed` and return the number of steps now due.
    ///
    /// A zero interval yields one step per tick.
    pub fn tick(&mut self, elapsed: Duration) -> usize {
        if !self.enabled {
            return 0;
        }
        if self.interval.is_zero() {
            return 1;
        }

        self.accumulated += elapsed;
        let due = (self.accumulated.as_nanos() / self.interval.as_nanos()) as usize;
        self.accumulated -= self.interval * due as u32;
        due
    }
}

impl Default for AutoStepper {
    fn default() -> Self {
        Self::new(Duration::from_millis(50))
    }
}
