//! Debounced resize handling
//!
//! Every raw resize or orientation signal pushes the refresh deadline out by
//! the debounce interval. The host drives time through `poll`, usually from
//! its frame or timer callback.

use std::time::{Duration, Instant};

/// Debounce state for geometry refreshes
#[derive(Clone, Debug)]
pub struct ResizeCoordinator {
    debounce: Duration,
    deadline: Option<Instant>,
}

impl ResizeCoordinator {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            deadline: None,
        }
    }

    /// Cancel any pending refresh and schedule a new one from `now`
    ///
    /// Returns `true` if a pending refresh was replaced.
    pub fn schedule(&mut self, now: Instant) -> bool {
        self.deadline.replace(now + self.debounce).is_some()
    }

    /// Whether a refresh is scheduled
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// When the pending refresh is due
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Drop the pending refresh
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Consume the pending refresh if it is due at `now`
    pub fn poll(&mut self, now: Instant) -> bool {
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
    fn test_fires_once_after_burst() {
        let t0 = Instant::now();
        let mut resize = ResizeCoordinator::new(Duration::from_millis(60));

        assert!(!resize.schedule(t0));
        for i in 1..5 {
            assert!(resize.schedule(t0 + Duration::from_millis(10 * i)));
        }

        // last signal at +40ms, due at +100ms
        assert!(!resize.poll(t0 + Duration::from_millis(99)));
        assert!(resize.poll(t0 + Duration::from_millis(100)));
        assert!(!resize.poll(t0 + Duration::from_millis(500)));
    }

    #[test]
    fn test_cancel() {
        let t0 = Instant::now();
        let mut resize = ResizeCoordinator::new(Duration::from_millis(60));
        resize.schedule(t0);
        resize.cancel();
        assert!(!resize.is_pending());
        assert!(!resize.poll(t0 + Duration::from_secs(1)));
    }
}
