//! Realtime data-store subscription interface.

use std::sync::{Arc, Mutex, MutexGuard};

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::RealtimeError;

/// One child-added event: the child's key under the subscribed path and its value.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildAdded {
    pub key: String,
    pub value: Value,
}

impl ChildAdded {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Callback invoked for every child-added event.
pub type ChildAddedCallback = Box<dyn FnMut(ChildAdded) + Send + 'static>;

/// A store that delivers "child added" events for a collection path.
///
/// As with snapshot-based realtime databases, a fresh subscription first
/// reports every existing child as added.
pub trait RealtimeStore {
    fn subscribe(&self, path: &str, on_child_added: ChildAddedCallback) -> Result<Subscription, RealtimeError>;
}

/// Live subscription handle. Dropping it unsubscribes.
pub struct Subscription {
    path: String,
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(path: impl Into<String>, cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            path: path.into(),
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            log::debug!("Unsubscribing from '{}'", self.path);
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("path", &self.path).finish()
    }
}

struct Subscriber {
    id: u64,
    path: String,
    callback: ChildAddedCallback,
}

#[derive(Default)]
struct MemoryInner {
    next_id: u64,
    subscribers: Vec<Subscriber>,
    collections: IndexMap<String, IndexMap<String, Value>>,
}

/// In-process realtime store.
///
/// Delivers events synchronously from [`push`](MemoryStore::push);
/// callbacks must not call back into the same store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Write a child. New keys are delivered to subscribers of `path`;
    /// overwriting an existing key is an update, not an add.
    pub fn push(&self, path: &str, key: &str, value: Value) {
        let mut inner = self.lock();
        let collection = inner.collections.entry(path.to_string()).or_default();
        let is_new = collection.insert(key.to_string(), value.clone()).is_none();
        if !is_new {
            return;
        }
        for subscriber in inner.subscribers.iter_mut().filter(|s| s.path == path) {
            (subscriber.callback)(ChildAdded::new(key, value.clone()));
        }
    }

    /// Remove a child.
    pub fn remove(&self, path: &str, key: &str) {
        if let Some(collection) = self.lock().collections.get_mut(path) {
            collection.shift_remove(key);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }
}

impl RealtimeStore for MemoryStore {
    fn subscribe(&self, path: &str, mut on_child_added: ChildAddedCallback) -> Result<Subscription, RealtimeError> {
        let mut inner = self.lock();

        if let Some(existing) = inner.collections.get(path) {
            for (key, value) in existing {
                on_child_added(ChildAdded::new(key.clone(), value.clone()));
            }
        }

        inner.next_id += 1;
        let id = inner.next_id;
        inner.subscribers.push(Subscriber {
            id,
            path: path.to_string(),
            callback: on_child_added,
        });
        drop(inner);

        let store = Arc::downgrade(&self.inner);
        Ok(Subscription::new(path, move || {
            if let Some(store) = store.upgrade() {
                let mut inner = store.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                inner.subscribers.retain(|s| s.id != id);
            }
        }))
    }
}
