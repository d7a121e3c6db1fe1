use std::time::{Duration, Instant};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Schedule of the recurring countdown refresh. Owning a `Ticker` means a tick
/// is scheduled; dropping it cancels the schedule.
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    next_due: Instant,
}

impl Ticker {
    pub fn start(period: Duration, now: Instant) -> Self {
        tracing::debug!(period_ms = period.as_millis() as u64, "countdown ticker started");
        Ticker {
            period,
            next_due: now + period,
        }
    }

    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }

    /// Returns true once per elapsed period. Periods missed while the loop was
    /// busy are skipped rather than replayed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        while self.next_due <= now {
            self.next_due += self.period;
        }
        true
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        tracing::debug!("countdown ticker released");
    }
}
