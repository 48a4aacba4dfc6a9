//! A resettable delay that fires once after input goes quiet.

use std::time::{Duration, Instant};

/// Quiet period after the last keystroke before a search runs.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Holds the latest scheduled value until `delay` has passed without another
/// one arriving.
///
/// Every [`schedule`](Self::schedule) replaces the pending value and restarts
/// the delay; [`poll`](Self::poll) yields the value exactly once after the
/// deadline. Time is passed in by the caller so event loops and tests share
/// one clock.
///
/// # Examples
/// ```
/// use std::time::{Duration, Instant};
/// use forkful_ranker::Debouncer;
///
/// let start = Instant::now();
/// let mut input = Debouncer::new(Duration::from_millis(300));
/// input.schedule("p", start);
/// input.schedule("piz", start + Duration::from_millis(100));
/// assert_eq!(input.poll(start + Duration::from_millis(300)), None);
/// assert_eq!(input.poll(start + Duration::from_millis(400)), Some("piz"));
/// assert_eq!(input.poll(start + Duration::from_millis(900)), None);
/// ```
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

impl<T> Debouncer<T> {
    /// Create a debouncer with the given quiet period.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Quiet period required before a value fires.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace any pending value with `value` and restart the delay at `now`.
    pub fn schedule(&mut self, value: T, now: Instant) {
        let deadline = now.checked_add(self.delay).unwrap_or(now);
        self.pending = Some(Pending { value, deadline });
    }

    /// Take the pending value if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.pending.as_ref()?.deadline > now {
            return None;
        }
        self.pending.take().map(|pending| pending.value)
    }

    /// Take the pending value immediately, ignoring the deadline.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|pending| pending.value)
    }

    /// Drop the pending value without firing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Whether a value is waiting to fire.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value becomes due.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.deadline)
    }

    /// Time left until the pending value becomes due, zero once overdue.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
