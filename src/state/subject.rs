//! Minimal observer primitive.
//!
//! Contract: every `set` synchronously notifies all current subscribers
//! before it returns, and a late subscriber immediately receives the
//! latest value on subscribe. Callbacks must not call back into the
//! subject; all mutation happens on a single thread.

use std::sync::Mutex;

pub type SubscriptionId = u64;

type Callback<T> = Box<dyn Fn(&T) + Send>;

struct Inner<T> {
    value: T,
    subscribers: Vec<(SubscriptionId, Callback<T>)>,
    next_id: SubscriptionId,
}

/// A mutable value with synchronous change notification.
pub struct Subject<T> {
    inner: Mutex<Inner<T>>,
}

impl<T: Clone> Subject<T> {
    pub fn new(initial: T) -> Self {
        Self {
            inner: Mutex::new(Inner {
                value: initial,
                subscribers: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Snapshot of the current value.
    pub fn get(&self) -> T {
        self.inner.lock().expect("subject poisoned").value.clone()
    }

    /// Replace the value and notify every subscriber before returning.
    pub fn set(&self, value: T) {
        let mut inner = self.inner.lock().expect("subject poisoned");
        inner.value = value;
        for (_, callback) in &inner.subscribers {
            callback(&inner.value);
        }
    }

    /// Register a subscriber. It is immediately invoked with the latest
    /// value, then on every subsequent `set`.
    pub fn subscribe(&self, callback: impl Fn(&T) + Send + 'static) -> SubscriptionId {
        let mut inner = self.inner.lock().expect("subject poisoned");
        let id = inner.next_id;
        inner.next_id += 1;
        callback(&inner.value);
        inner.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscriber. Returns false for an unknown id.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.lock().expect("subject poisoned");
        let before = inner.subscribers.len();
        inner.subscribers.retain(|(sub_id, _)| *sub_id != id);
        inner.subscribers.len() != before
    }

    #[allow(dead_code)]
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().expect("subject poisoned").subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_set_notifies_before_returning() {
        let subject = Subject::new(0);
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_by_callback = seen.clone();
        subject.subscribe(move |v| seen_by_callback.store(*v, Ordering::SeqCst));

        subject.set(42);
        // The notification already happened by the time set returned
        assert_eq!(seen.load(Ordering::SeqCst), 42);
    }

    #[test]
    fn test_late_subscriber_receives_latest_value() {
        let subject = Subject::new(0);
        subject.set(7);

        let seen = Arc::new(AtomicUsize::new(0));
        let seen_by_callback = seen.clone();
        subject.subscribe(move |v| seen_by_callback.store(*v, Ordering::SeqCst));
        assert_eq!(seen.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn test_all_subscribers_notified() {
        let subject = Subject::new(0);
        let count = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            let count = count.clone();
            subject.subscribe(move |_| {
                count.fetch_add(1, Ordering::SeqCst);
            });
        }
        count.store(0, Ordering::SeqCst);

        subject.set(1);
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let subject = Subject::new(0);
        let count = Arc::new(AtomicUsize::new(0));
        let count_by_callback = count.clone();
        let id = subject.subscribe(move |_| {
            count_by_callback.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(subject.subscriber_count(), 1);

        assert!(subject.unsubscribe(id));
        assert!(!subject.unsubscribe(id));
        subject.set(1);
        // Only the initial replay on subscribe was seen
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(subject.subscriber_count(), 0);
    }
}
