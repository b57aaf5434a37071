//! Cancelable scheduled tasks driven by caller-supplied time.
//!
//! Nothing here reads a clock. Owners schedule a task for a deadline and
//! later hand in the current time; due tasks come back in deadline order.
//! Tests advance time simply by passing larger timestamps.

use std::time::Duration;

/// Handle to a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Scheduled<K> {
    id: TimerId,
    deadline: Duration,
    kind: K,
}

/// A small deadline queue of pending tasks.
#[derive(Debug, Clone)]
pub struct TimerQueue<K> {
    pending: Vec<Scheduled<K>>,
    next_id: u64,
}

impl<K> Default for TimerQueue<K> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            next_id: 1,
        }
    }
}

impl<K> TimerQueue<K> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `kind` to fire at `deadline`.
    pub fn schedule(&mut self, kind: K, deadline: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Scheduled { id, deadline, kind });
        id
    }

    /// Cancel a task. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != id);
        self.pending.len() != before
    }

    /// Cancel every pending task.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Whether a task is still waiting to fire.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|t| t.id == id)
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.iter().map(|t| t.deadline).min()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return every task due at or before `now`, earliest first.
    /// Ties keep scheduling order.
    pub fn pop_expired(&mut self, now: Duration) -> Vec<(TimerId, K)> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].deadline <= now {
                due.push(self.pending.remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by_key(|t| (t.deadline, t.id));
        due.into_iter().map(|t| (t.id, t.kind)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_fires_only_when_due() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule("long-press", ms(500));

        assert!(timers.pop_expired(ms(499)).is_empty());
        assert!(timers.is_pending(id));

        let fired = timers.pop_expired(ms(500));
        assert_eq!(fired, vec![(id, "long-press")]);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_cancel_prevents_firing() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule(1, ms(100));

        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));
        assert!(timers.pop_expired(ms(1000)).is_empty());
    }

    #[test]
    fn test_expired_in_deadline_order() {
        let mut timers = TimerQueue::new();
        let late = timers.schedule('b', ms(300));
        let early = timers.schedule('a', ms(100));
        let pending = timers.schedule('c', ms(900));

        let fired = timers.pop_expired(ms(400));
        assert_eq!(fired, vec![(early, 'a'), (late, 'b')]);
        assert_eq!(timers.next_deadline(), Some(ms(900)));
        assert!(timers.is_pending(pending));
    }

    #[test]
    fn test_cancel_all() {
        let mut timers = TimerQueue::new();
        timers.schedule((), ms(1));
        timers.schedule((), ms(2));
        timers.cancel_all();
        assert!(timers.is_empty());
        assert_eq!(timers.next_deadline(), None);
    }
}
