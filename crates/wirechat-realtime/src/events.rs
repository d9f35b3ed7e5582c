//! Named-event subscription table.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use serde_json::Value;

/// Callback invoked with a pushed event payload.
pub type EventCallback = Arc<dyn Fn(&Value) + Send + Sync>;

/// Handle returned by `on`/`once`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

struct Subscription {
    id: SubscriptionId,
    once: bool,
    callback: EventCallback,
}

/// Per-event-name subscriber lists.
///
/// Independent subscribers to the same event each receive every
/// occurrence; `once` subscribers are removed after their first delivery.
#[derive(Default)]
pub struct EventRegistry {
    next_id: AtomicU64,
    handlers: DashMap<String, Vec<Subscription>>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to every occurrence of `event`.
    pub fn on(&self, event: &str, callback: EventCallback) -> SubscriptionId {
        self.insert(event, callback, false)
    }

    /// Subscribes to the next occurrence of `event` only.
    pub fn once(&self, event: &str, callback: EventCallback) -> SubscriptionId {
        self.insert(event, callback, true)
    }

    /// Removes one subscriber, or every subscriber of `event` when no id
    /// is given.
    pub fn off(&self, event: &str, id: Option<SubscriptionId>) {
        match id {
            Some(id) => {
                if let Some(mut subs) = self.handlers.get_mut(event) {
                    subs.retain(|sub| sub.id != id);
                }
            }
            None => {
                self.handlers.remove(event);
            }
        }
    }

    /// Removes every subscriber of every event.
    pub fn clear(&self) {
        self.handlers.clear();
    }

    /// Delivers `data` to every subscriber of `event`.
    ///
    /// Callbacks run outside the table lock, so a callback may subscribe
    /// or unsubscribe without deadlocking.
    pub fn dispatch(&self, event: &str, data: &Value) {
        let callbacks: Vec<EventCallback> = match self.handlers.get_mut(event) {
            Some(mut subs) => {
                let callbacks = subs.iter().map(|s| Arc::clone(&s.callback)).collect();
                subs.retain(|sub| !sub.once);
                callbacks
            }
            None => return,
        };
        for callback in callbacks {
            callback(data);
        }
    }

    fn insert(&self, event: &str, callback: EventCallback, once: bool) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        self.handlers
            .entry(event.to_string())
            .or_default()
            .push(Subscription { id, once, callback });
        id
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    fn counter() -> (Arc<Mutex<Vec<i64>>>, EventCallback) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: EventCallback = Arc::new(move |data: &Value| {
            sink.lock().expect("lock").push(data.as_i64().unwrap_or(-1));
        });
        (seen, callback)
    }

    #[test]
    fn test_independent_subscribers_each_receive_every_occurrence() {
        let registry = EventRegistry::new();
        let (seen_a, cb_a) = counter();
        let (seen_b, cb_b) = counter();
        registry.on("tick", cb_a);
        registry.on("tick", cb_b);

        registry.dispatch("tick", &Value::from(1));
        registry.dispatch("tick", &Value::from(2));

        assert_eq!(*seen_a.lock().expect("lock"), vec![1, 2]);
        assert_eq!(*seen_b.lock().expect("lock"), vec![1, 2]);
    }

    #[test]
    fn test_once_fires_a_single_time() {
        let registry = EventRegistry::new();
        let (seen, cb) = counter();
        registry.once("tick", cb);

        registry.dispatch("tick", &Value::from(1));
        registry.dispatch("tick", &Value::from(2));

        assert_eq!(*seen.lock().expect("lock"), vec![1]);
    }

    #[test]
    fn test_off_with_id_removes_one_subscriber() {
        let registry = EventRegistry::new();
        let (seen_a, cb_a) = counter();
        let (seen_b, cb_b) = counter();
        let id_a = registry.on("tick", cb_a);
        registry.on("tick", cb_b);

        registry.off("tick", Some(id_a));
        registry.dispatch("tick", &Value::from(7));

        assert!(seen_a.lock().expect("lock").is_empty());
        assert_eq!(*seen_b.lock().expect("lock"), vec![7]);
    }

    #[test]
    fn test_off_without_id_removes_all() {
        let registry = EventRegistry::new();
        let (seen, cb) = counter();
        registry.on("tick", cb);

        registry.off("tick", None);
        registry.dispatch("tick", &Value::from(7));

        assert!(seen.lock().expect("lock").is_empty());
    }

    #[test]
    fn test_dispatch_to_unknown_event_is_a_no_op() {
        let registry = EventRegistry::new();
        registry.dispatch("nobody-listens", &Value::Null);
    }
}
