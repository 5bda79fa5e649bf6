//! Debounce as an explicit value, not a timer callback.
//!
//! Each debounce is `{window, deadline}` owned by the session. A
//! qualifying event arms it (cancel-and-restart, so only the trailing edge
//! of a burst does work), and the host's `tick` pump asks whether the
//! deadline has passed. This is the surface's only backpressure mechanism.

use std::time::Duration;

use web_time::Instant;

#[derive(Debug, Clone, Copy)]
pub struct Debounce {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Arm (or re-arm) the debounce: any pending deadline is implicitly
    /// cancelled and the window restarts from `now`.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once per armed period, when `now` has reached the
    /// deadline. Firing disarms.
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
