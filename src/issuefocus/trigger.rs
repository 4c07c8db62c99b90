//! Triggers and burst coalescing.
//!
//! Every recompute is caused by a [`Trigger`]. Some want an immediate pass;
//! the others tolerate a short delay, which lets a burst of them collapse
//! into one pass. [`Debouncer`] holds at most one pending deadline and each
//! new delayed trigger moves it rather than adding another.

use crate::model::Preferences;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// First load of the page.
    InitialLoad,
    /// The persisted preference set changed; carries the new snapshot.
    PreferencesChanged(Preferences),
    /// Content was added to or changed on the current page.
    ContentMutated,
    /// The page was replaced by a different one.
    Navigated,
}

/// How long each trigger kind waits before its recompute runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerDelays {
    pub mutation: Duration,
    pub navigation: Duration,
}

impl Default for TriggerDelays {
    fn default() -> Self {
        Self {
            mutation: Duration::from_millis(100),
            navigation: Duration::from_millis(500),
        }
    }
}

impl TriggerDelays {
    /// `None` means "recompute now".
    pub fn delay_for(&self, trigger: &Trigger) -> Option<Duration> {
        match trigger {
            Trigger::InitialLoad | Trigger::PreferencesChanged(_) => None,
            Trigger::ContentMutated => Some(self.mutation),
            Trigger::Navigated => Some(self.navigation),
        }
    }
}

/// Single pending deadline, rescheduled by each new request.
#[derive(Debug, Default)]
pub struct Debouncer {
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push the pending recompute to `now + delay`, creating it if needed.
    pub fn schedule(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left until the pending deadline, zero if overdue.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// If the deadline has passed, clear it and return `true`.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
