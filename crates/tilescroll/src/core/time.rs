/// Fixed-interval timer driven by a millisecond clock.
/// Ticks are scheduled on a fixed grid so slow frames never shift the cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalTimer {
    /// Milliseconds between ticks.
    interval_ms: u64,
    /// Clock time of the next tick.
    next_due_ms: u64,
}

impl IntervalTimer {
    /// Arm the timer; the first tick is due one interval after `now_ms`.
    pub fn new(interval_ms: u64, now_ms: u64) -> Self {
        let interval_ms = interval_ms.max(1);
        Self {
            interval_ms,
            next_due_ms: now_ms + interval_ms,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn next_due(&self) -> u64 {
        self.next_due_ms
    }

    pub fn is_due(&self, now_ms: u64) -> bool {
        self.next_due_ms <= now_ms
    }

    /// Consume the current tick and schedule the next one.
    pub fn fire(&mut self) {
        self.next_due_ms += self.interval_ms;
    }

    /// Number of ticks due at `now_ms`.
    pub fn overdue(&self, now_ms: u64) -> u64 {
        if now_ms < self.next_due_ms {
            0
        } else {
            (now_ms - self.next_due_ms) / self.interval_ms + 1
        }
    }

    /// Skip ticks beyond `max` so a stalled loop does not spiral.
    /// Returns the number of ticks dropped.
    pub fn drop_backlog(&mut self, now_ms: u64, max: u64) -> u64 {
        let due = self.overdue(now_ms);
        if due <= max {
            return 0;
        }
        let dropped = due - max;
        self.next_due_ms += dropped * self.interval_ms;
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_after_one_interval() {
        let t = IntervalTimer::new(40, 1000);
        assert!(!t.is_due(1039));
        assert!(t.is_due(1040));
    }

    #[test]
    fn fire_keeps_fixed_grid() {
        let mut t = IntervalTimer::new(40, 0);
        assert_eq!(t.overdue(95), 2);
        t.fire();
        t.fire();
        assert_eq!(t.next_due(), 120);
        assert_eq!(t.overdue(95), 0);
    }

    #[test]
    fn backlog_is_capped() {
        let mut t = IntervalTimer::new(10, 0);
        let dropped = t.drop_backlog(1000, 10);
        assert_eq!(dropped, 90);
        assert_eq!(t.overdue(1000), 10);
    }

    #[test]
    fn zero_interval_is_clamped() {
        let t = IntervalTimer::new(0, 5);
        assert_eq!(t.interval_ms(), 1);
    }
}
