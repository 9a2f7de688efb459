//! Coalesces bursts of edits into one action after a quiet period.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Record an edit at `now`, pushing any pending deadline back.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Drop the pending action, if any.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left until the pending action fires.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    /// `true` exactly once per burst, when the deadline has passed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_after_quiet_period() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(300));
        d.arm(t0);
        assert!(!d.fire(t0 + Duration::from_millis(299)));
        assert!(d.fire(t0 + Duration::from_millis(300)));
        assert!(!d.fire(t0 + Duration::from_millis(900)));
    }

    #[test]
    fn new_edit_pushes_deadline_back() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(300));
        d.arm(t0);
        d.arm(t0 + Duration::from_millis(200));
        assert!(!d.fire(t0 + Duration::from_millis(350)));
        assert_eq!(
            d.remaining(t0 + Duration::from_millis(350)),
            Some(Duration::from_millis(150))
        );
        assert!(d.fire(t0 + Duration::from_millis(500)));
    }

    #[test]
    fn cancel_drops_pending() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(10));
        d.arm(t0);
        d.cancel();
        assert!(!d.is_pending());
        assert!(!d.fire(t0 + Duration::from_secs(1)));
    }
}
