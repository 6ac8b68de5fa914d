//! # Debounced Autosave Timer
//!
//! Every edit pushes the deadline out to `now + delay`; the timer fires once
//! the document has been quiet for the whole delay. A burst of edits yields
//! a single save after the last one, never one in the middle of the burst.

use std::time::{Duration, Instant};
use tracing::debug;

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

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Restart the quiet period from `now`
    pub fn touch(&mut self, now: Instant) -> Instant {
        let deadline = now + self.delay;
        self.deadline = Some(deadline);
        deadline
    }

    /// Arm the timer to fire on the next poll at or after `at`
    pub fn fire_at(&mut self, at: Instant) {
        self.deadline = Some(at);
    }

    /// Drop a pending deadline; returns whether one was armed
    pub fn cancel(&mut self) -> bool {
        let was_armed = self.deadline.take().is_some();
        if was_armed {
            debug!("Cancelled pending autosave");
        }
        was_armed
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Disarm and return true if the deadline has passed
    pub fn take_due(&mut self, now: Instant) -> bool {
        if self.is_due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }
}
