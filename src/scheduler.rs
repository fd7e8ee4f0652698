//! Single-threaded timer scheduling for page state.
//!
//! Pages never touch wall-clock timers directly. Each page owns a
//! [`Scheduler`] and arms one-shot or repeating timers on it; the main loop
//! (or a headless runner) advances the scheduler with the time elapsed since
//! the page was mounted and feeds each due action into the page's reducer.
//!
//! ```text
//! main loop ──pop_due(elapsed)──▶ Scheduler ──A──▶ page.update(action)
//!                                    ▲                    │
//!                                    └─schedule_once/repeating
//! ```
//!
//! Dropping the scheduler discards every pending timer, which is how page
//! teardown cancels outstanding work.

use std::time::Duration;

/// Opaque handle to a scheduled timer, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Timer<A> {
    id: TimerId,
    due: Duration,
    period: Option<Duration>,
    action: A,
}

/// A cooperative timer queue over an injected monotonic clock.
///
/// Time is expressed as the [`Duration`] elapsed since an arbitrary origin
/// (page mount). The scheduler only moves forward; advancing to an earlier
/// time is a no-op.
#[derive(Debug, Clone)]
pub struct Scheduler<A> {
    now: Duration,
    next_id: u64,
    timers: Vec<Timer<A>>,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Scheduler<A> {
    /// Create an empty scheduler positioned at time zero.
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            timers: Vec::new(),
        }
    }

    /// Current scheduler time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Fire `action` once, `delay` after the current scheduler time.
    pub fn schedule_once(&mut self, delay: Duration, action: A) -> TimerId {
        self.insert(delay, None, action)
    }

    /// Fire `action` every `period`, starting one period from now.
    ///
    /// A zero period is bumped to one millisecond so the queue always drains.
    pub fn schedule_repeating(&mut self, period: Duration, action: A) -> TimerId {
        let period = period.max(Duration::from_millis(1));
        self.insert(period, Some(period), action)
    }

    fn insert(&mut self, delay: Duration, period: Option<Duration>, action: A) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            due: self.now + delay,
            period,
            action,
        });
        id
    }

    /// Cancel a pending timer. Returns `false` if it already fired or was
    /// cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Discard every pending timer.
    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    /// Whether the timer is still pending.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// Number of pending timers.
    pub fn pending(&self) -> usize {
        self.timers.len()
    }
}

impl<A: Clone> Scheduler<A> {
    /// Pop the earliest action due at or before `to`, moving the clock to its
    /// due time. Ties fire in scheduling order.
    ///
    /// Handlers may schedule new timers between calls; those are measured
    /// from the due time of the action that armed them.
    pub fn pop_due(&mut self, to: Duration) -> Option<A> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= to)
            .min_by(|(_, a), (_, b)| a.due.cmp(&b.due).then(a.id.0.cmp(&b.id.0)))
            .map(|(idx, _)| idx)?;

        let due = self.timers[idx].due;
        if due > self.now {
            self.now = due;
        }

        match self.timers[idx].period {
            Some(period) => {
                let timer = &mut self.timers[idx];
                timer.due += period;
                Some(timer.action.clone())
            }
            None => Some(self.timers.remove(idx).action),
        }
    }

    /// Advance the clock to `to` and return every action that came due, in
    /// due order.
    ///
    /// Repeating timers fire once per elapsed period.
    pub fn advance(&mut self, to: Duration) -> Vec<A> {
        let mut fired = Vec::new();
        while let Some(action) = self.pop_due(to) {
            fired.push(action);
        }
        self.advance_clock(to);
        fired
    }
}

impl<A> Scheduler<A> {
    /// Move the clock forward to `to` without firing anything.
    pub fn advance_clock(&mut self, to: Duration) {
        if to > self.now {
            self.now = to;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_once_fires_exactly_once() {
        let mut s = Scheduler::new();
        s.schedule_once(ms(500), "a");

        assert!(s.advance(ms(499)).is_empty());
        assert_eq!(s.advance(ms(500)), vec!["a"]);
        assert!(s.advance(ms(10_000)).is_empty());
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn test_repeating_fires_per_period() {
        let mut s = Scheduler::new();
        s.schedule_repeating(ms(100), 1);

        assert_eq!(s.advance(ms(350)), vec![1, 1, 1]);
        assert_eq!(s.advance(ms(400)), vec![1]);
        assert_eq!(s.pending(), 1);
    }

    #[test]
    fn test_cancel_discards_pending() {
        let mut s = Scheduler::new();
        let a = s.schedule_once(ms(10), "a");
        s.schedule_once(ms(20), "b");

        assert!(s.cancel(a));
        assert!(!s.cancel(a));
        assert_eq!(s.advance(ms(30)), vec!["b"]);
    }

    #[test]
    fn test_cancel_all() {
        let mut s = Scheduler::new();
        s.schedule_once(ms(10), "a");
        s.schedule_repeating(ms(10), "b");
        s.cancel_all();

        assert!(s.advance(ms(1_000)).is_empty());
    }

    #[test]
    fn test_due_order_and_ties() {
        let mut s = Scheduler::new();
        s.schedule_once(ms(30), "late");
        s.schedule_once(ms(10), "first");
        s.schedule_once(ms(10), "second");

        assert_eq!(s.advance(ms(30)), vec!["first", "second", "late"]);
    }

    #[test]
    fn test_delay_is_relative_to_current_time() {
        let mut s = Scheduler::new();
        s.advance(ms(5_000));
        s.schedule_once(ms(8_000), "chained");

        assert!(s.advance(ms(12_999)).is_empty());
        assert_eq!(s.advance(ms(13_000)), vec!["chained"]);
    }

    #[test]
    fn test_pop_due_lets_handlers_chain() {
        let mut s = Scheduler::new();
        s.schedule_once(ms(5_000), "first");

        assert_eq!(s.pop_due(ms(20_000)), Some("first"));
        assert_eq!(s.now(), ms(5_000));
        s.schedule_once(ms(8_000), "second");
        assert_eq!(s.pop_due(ms(20_000)), Some("second"));
        assert_eq!(s.now(), ms(13_000));
        assert_eq!(s.pop_due(ms(20_000)), None);
    }

    #[test]
    fn test_clock_never_moves_backwards() {
        let mut s: Scheduler<()> = Scheduler::new();
        s.advance(ms(100));
        s.advance(ms(50));
        assert_eq!(s.now(), ms(100));
    }
}
