//! In-process publish/subscribe channels
//!
//! Both channels call subscribers synchronously, in subscription order,
//! before `publish`/`emit` returns. Nothing is queued or deferred.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber<T> = Box<dyn FnMut(&T)>;
type Listener<T> = Box<dyn FnMut(&mut T)>;

/// Channel that remembers the newest value and replays it to late subscribers
pub struct ReplayChannel<T> {
    latest: Option<T>,
    subscribers: Vec<(SubscriptionId, Subscriber<T>)>,
    next_id: u64,
}

impl<T> ReplayChannel<T> {
    pub fn new() -> Self {
        Self {
            latest: None,
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    /// Register a subscriber. If a value was already published it is
    /// delivered immediately.
    pub fn subscribe<F>(&mut self, mut subscriber: F) -> SubscriptionId
    where
        F: FnMut(&T) + 'static,
    {
        if let Some(latest) = &self.latest {
            subscriber(latest);
        }
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn publish(&mut self, value: T) {
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&value);
        }
        self.latest = Some(value);
    }

    pub fn latest(&self) -> Option<&T> {
        self.latest.as_ref()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<T> Default for ReplayChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Channel whose listeners may mutate the value in flight.
///
/// Each listener sees the changes made by the listeners before it.
pub struct Broadcast<T> {
    listeners: Vec<(SubscriptionId, Listener<T>)>,
    next_id: u64,
}

impl<T> Broadcast<T> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&mut T) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, value: &mut T) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(value);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<T> Default for Broadcast<T> {
    fn default() -> Self {
        Self::new()
    }
}
