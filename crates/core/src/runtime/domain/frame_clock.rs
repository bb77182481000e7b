use std::time::{Duration, Instant};

/// Fixed-rate frame deadlines.
///
/// When a frame overruns its slot the schedule restarts from the current
/// time instead of firing a burst of catch-up frames.
#[derive(Clone, Debug)]
pub struct FrameClock {
    period: Duration,
    next: Instant,
}

impl FrameClock {
    pub fn new(fps: u32, start: Instant) -> Self {
        let period = Duration::from_secs_f64(1.0 / f64::from(fps.max(1)));
        Self {
            period,
            next: start + period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn deadline(&self) -> Instant {
        self.next
    }

    /// Time left until the current deadline.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }

    /// Move to the next slot. Returns true if `now` was already past it.
    pub fn advance(&mut self, now: Instant) -> bool {
        self.next += self.period;
        if self.next <= now {
            self.next = now + self.period;
            return true;
        }
        false
    }
}
