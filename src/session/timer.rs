use std::time::{Duration, Instant};

/// Per-question time limit, started when the question is shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Countdown {
    started_at: Instant,
    limit: Duration,
}

impl Countdown {
    pub fn start(now: Instant, limit: Duration) -> Self {
        Self {
            started_at: now,
            limit,
        }
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.limit.saturating_sub(self.elapsed(now))
    }

    pub fn expired(&self, now: Instant) -> bool {
        self.elapsed(now) >= self.limit
    }

    /// Share of the limit still left, from 1.0 down to 0.0.
    pub fn fraction_remaining(&self, now: Instant) -> f64 {
        if self.limit.is_zero() {
            return 0.0;
        }
        self.remaining(now).as_secs_f64() / self.limit.as_secs_f64()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Delay {
    until: Instant,
}

impl Delay {
    pub fn start(now: Instant, length: Duration) -> Self {
        Self { until: now + length }
    }

    pub fn elapsed(&self, now: Instant) -> bool {
        now >= self.until
    }
}
