use std::time::{Duration, Instant};

use log::warn;

/// # Pacer
/// Keeps ticks on a fixed cadence.
///
/// Each deadline is the previous deadline plus one period, regardless of when `wait` was
/// called, so time spent doing work inside a tick doesn't accumulate as drift.
pub struct Pacer {
    period: Duration,
    deadline: Instant,
}

impl Pacer {
    pub fn new(period: Duration) -> Self {
        Pacer {
            period,
            deadline: Instant::now() + period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// When the current tick is due to end
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Sleep until the current deadline, then schedule the next one
    pub fn wait(&mut self) {
        let now = Instant::now();
        if now < self.deadline {
            spin_sleep::sleep(self.deadline - now);
        } else if now - self.deadline > self.period {
            // too far behind to catch up without a burst of ticks
            warn!(
                "running {:?} behind schedule, resynchronizing",
                now - self.deadline
            );
            self.deadline = now;
        }
        self.deadline += self.period;
    }

    /// Restart the cadence from now, e.g. after running unpaced
    pub fn resync(&mut self) {
        self.deadline = Instant::now() + self.period;
    }
}
