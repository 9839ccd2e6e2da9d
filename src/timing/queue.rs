//! One-shot timer table for the cooperative event loop

use std::collections::BTreeMap;
use std::time::Instant;

use ahash::AHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Pending one-shot timers ordered by deadline.
///
/// Timers with equal deadlines fire in the order they were scheduled.
#[derive(Debug)]
pub struct TimerQueue<E> {
    by_deadline: BTreeMap<(Instant, TimerId), E>,
    deadlines: AHashMap<TimerId, Instant>,
    next_id: u64,
}

impl<E> TimerQueue<E> {
    pub fn new() -> Self {
        Self {
            by_deadline: BTreeMap::new(),
            deadlines: AHashMap::new(),
            next_id: 0,
        }
    }

    pub fn schedule(&mut self, at: Instant, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.by_deadline.insert((at, id), event);
        self.deadlines.insert(id, at);
        id
    }

    /// Remove a pending timer. Cancelling a fired or unknown timer is a no-op.
    pub fn cancel(&mut self, id: TimerId) -> Option<E> {
        let at = self.deadlines.remove(&id)?;
        self.by_deadline.remove(&(at, id))
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id)
    }

    pub fn deadline(&self, id: TimerId) -> Option<Instant> {
        self.deadlines.get(&id).copied()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.by_deadline.keys().next().map(|(at, _)| *at)
    }

    /// Pop the earliest timer whose deadline is at or before `now`
    pub fn pop_due(&mut self, now: Instant) -> Option<(TimerId, Instant, E)> {
        let (&(at, id), _) = self.by_deadline.iter().next()?;
        if at > now {
            return None;
        }
        let event = self.by_deadline.remove(&(at, id))?;
        self.deadlines.remove(&id);
        Some((id, at, event))
    }

    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_deadline.clear();
        self.deadlines.clear();
    }
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}
