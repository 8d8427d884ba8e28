//! New-order notifications from a realtime store.
//!
//! [`OrderNotificationListener`] subscribes once to the orders collection and
//! raises one [`OrderNotification`] per distinct order key, in first-seen
//! order. The seen-set is in memory by default, so a fresh listener will
//! notify again for orders the store replays on subscribe; pass a persisted
//! [`SeenOrders`] to carry the set across restarts.

pub mod firebase;
pub mod realtime;

pub use firebase::FirebaseStore;
pub use realtime::{ChildAdded, ChildAddedCallback, MemoryStore, RealtimeStore, Subscription};

use chrono::{DateTime, Local};
use serde::Deserialize;
use serde_json::Value;

use crate::api::models::CustomerRef;
use crate::error::RealtimeError;
use crate::storage::seen::SeenOrders;

/// Default collection path for orders.
pub const ORDERS_PATH: &str = "orders";

/// Summary of a newly added order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderNotification {
    pub order_id: String,
    pub customer: Option<String>,
    pub total: Option<f64>,
    pub item_count: Option<usize>,
    pub received_at: DateTime<Local>,
}

impl OrderNotification {
    /// Extract what is available from the event value; missing or
    /// malformed fields are left empty.
    pub fn from_event(event: &ChildAdded) -> Self {
        let value = &event.value;
        let customer = ["customerName", "customer"]
            .iter()
            .filter_map(|key| value.get(*key))
            .find_map(|v| CustomerRef::deserialize(v).ok().and_then(CustomerRef::into_name));
        let total = ["totalAmount", "total"]
            .iter()
            .filter_map(|key| value.get(*key))
            .find_map(|v| v.as_f64().or_else(|| v.as_str().and_then(|s| s.parse().ok())));
        let item_count = value.get("items").and_then(|items| match items {
            Value::Array(list) => Some(list.len()),
            Value::Object(map) => Some(map.len()),
            _ => None,
        });

        Self {
            order_id: event.key.clone(),
            customer,
            total,
            item_count,
            received_at: Local::now(),
        }
    }

    /// One-line message for toasts and logs.
    pub fn message(&self) -> String {
        let mut message = format!("New order {}", self.order_id);
        if let Some(customer) = &self.customer {
            message.push_str(&format!(" from {}", customer));
        }
        match (self.item_count, self.total) {
            (Some(count), Some(total)) => message.push_str(&format!(" ({} items, {:.2})", count, total)),
            (Some(count), None) => message.push_str(&format!(" ({} items)", count)),
            (None, Some(total)) => message.push_str(&format!(" ({:.2})", total)),
            (None, None) => {}
        }
        message
    }
}

/// Sink for new-order notifications.
pub trait Notifier {
    fn notify(&mut self, notification: &OrderNotification);

    /// Audio cue. Failures are non-fatal.
    fn play_sound(&mut self) -> std::io::Result<()>;
}

pub struct OrderNotificationListener<N: Notifier> {
    notifier: N,
    seen: SeenOrders,
    sound: bool,
    subscription: Option<Subscription>,
}

impl<N: Notifier> OrderNotificationListener<N> {
    pub fn new(notifier: N) -> Self {
        Self {
            notifier,
            seen: SeenOrders::in_memory(),
            sound: true,
            subscription: None,
        }
    }

    pub fn with_seen(mut self, seen: SeenOrders) -> Self {
        self.seen = seen;
        self
    }

    pub fn with_sound(mut self, sound: bool) -> Self {
        self.sound = sound;
        self
    }

    /// Subscribe to `path`. Events reach the callback, which should route
    /// them back to [`handle`](Self::handle) on the owning thread.
    pub fn subscribe<S>(&mut self, store: &S, path: &str, on_child_added: ChildAddedCallback) -> Result<(), RealtimeError>
    where
        S: RealtimeStore + ?Sized,
    {
        if let Some(existing) = &self.subscription {
            return Err(RealtimeError::AlreadySubscribed {
                path: existing.path().to_string(),
            });
        }
        let subscription = store.subscribe(path, on_child_added)?;
        log::debug!("Subscribed to new orders at '{}'", path);
        self.subscription = Some(subscription);
        Ok(())
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn unsubscribe(&mut self) {
        self.subscription = None;
    }

    /// Process one event; returns the notification if the order is new.
    pub fn handle(&mut self, event: &ChildAdded) -> Option<OrderNotification> {
        if !self.seen.insert(&event.key) {
            log::trace!("Order {} already notified", event.key);
            return None;
        }

        let notification = OrderNotification::from_event(event);
        log::info!("{}", notification.message());
        self.notifier.notify(&notification);
        if self.sound {
            if let Err(e) = self.notifier.play_sound() {
                log::debug!("Audio cue failed: {}", e);
            }
        }
        Some(notification)
    }

    pub fn seen(&self) -> &SeenOrders {
        &self.seen
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::mpsc;

    #[derive(Default)]
    struct RecordingNotifier {
        notified: Vec<String>,
        sounds: usize,
        fail_sound: bool,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&mut self, notification: &OrderNotification) {
            self.notified.push(notification.order_id.clone());
        }

        fn play_sound(&mut self) -> std::io::Result<()> {
            self.sounds += 1;
            if self.fail_sound {
                return Err(std::io::Error::other("no audio device"));
            }
            Ok(())
        }
    }

    fn event(key: &str) -> ChildAdded {
        ChildAdded::new(key, json!({}))
    }

    #[test]
    fn test_each_order_notified_once_in_first_seen_order() {
        let mut listener = OrderNotificationListener::new(RecordingNotifier::default());
        let fired: Vec<String> = ["A", "B", "A", "C"]
            .iter()
            .filter_map(|key| listener.handle(&event(key)))
            .map(|n| n.order_id)
            .collect();

        assert_eq!(fired, vec!["A", "B", "C"]);
        assert_eq!(listener.notifier().notified, vec!["A", "B", "C"]);
        assert_eq!(listener.notifier().sounds, 3);
    }

    #[test]
    fn test_audio_failure_is_swallowed() {
        let notifier = RecordingNotifier {
            fail_sound: true,
            ..Default::default()
        };
        let mut listener = OrderNotificationListener::new(notifier);
        assert!(listener.handle(&event("A")).is_some());
        assert_eq!(listener.notifier().notified, vec!["A"]);
    }

    #[test]
    fn test_sound_can_be_disabled() {
        let mut listener = OrderNotificationListener::new(RecordingNotifier::default()).with_sound(false);
        listener.handle(&event("A"));
        assert_eq!(listener.notifier().sounds, 0);
    }

    #[test]
    fn test_subscribes_at_most_once_and_unsubscribes() {
        let store = MemoryStore::new();
        let mut listener = OrderNotificationListener::new(RecordingNotifier::default());
        listener.subscribe(&store, ORDERS_PATH, Box::new(|_| {})).unwrap();
        assert!(listener.is_subscribed());

        let again = listener.subscribe(&store, ORDERS_PATH, Box::new(|_| {}));
        assert!(matches!(again, Err(RealtimeError::AlreadySubscribed { .. })));
        assert_eq!(store.subscriber_count(), 1);

        listener.unsubscribe();
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_replayed_orders_renotify_on_fresh_listener() {
        let store = MemoryStore::new();
        store.push(ORDERS_PATH, "A", json!({}));

        let run = |store: &MemoryStore| {
            let (tx, rx) = mpsc::channel();
            let mut listener = OrderNotificationListener::new(RecordingNotifier::default());
            listener
                .subscribe(store, ORDERS_PATH, Box::new(move |e| {
                    let _ = tx.send(e);
                }))
                .unwrap();
            store.push(ORDERS_PATH, "B", json!({}));
            for e in rx.try_iter() {
                listener.handle(&e);
            }
            listener.notifier().notified.clone()
        };

        assert_eq!(run(&store), vec!["A", "B"]);
        assert_eq!(run(&store), vec!["A", "B"]);
    }

    #[test]
    fn test_persisted_seen_set_prevents_renotify() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("seen.json");

        let mut first = OrderNotificationListener::new(RecordingNotifier::default())
            .with_seen(SeenOrders::load(&path).unwrap());
        first.handle(&event("A"));

        let mut second = OrderNotificationListener::new(RecordingNotifier::default())
            .with_seen(SeenOrders::load(&path).unwrap());
        assert!(second.handle(&event("A")).is_none());
        assert!(second.handle(&event("B")).is_some());
        assert_eq!(second.seen().len(), 2);
    }

    #[test]
    fn test_notification_summary() {
        let e = ChildAdded::new(
            "-Nx1",
            json!({"customer": {"name": "Ada"}, "totalAmount": "23.5", "items": [{}, {}]}),
        );
        let n = OrderNotification::from_event(&e);
        assert_eq!(n.customer.as_deref(), Some("Ada"));
        assert_eq!(n.total, Some(23.5));
        assert_eq!(n.item_count, Some(2));
        assert_eq!(n.message(), "New order -Nx1 from Ada (2 items, 23.50)");

        let fallback = OrderNotification::from_event(&ChildAdded::new(
            "-Nx2",
            json!({"customerName": 17, "customer": "Grace"}),
        ));
        assert_eq!(fallback.customer.as_deref(), Some("Grace"));

        let bare = OrderNotification::from_event(&ChildAdded::new("x", json!("garbage")));
        assert_eq!(bare.message(), "New order x");
    }
}
