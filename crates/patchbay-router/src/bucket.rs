//! Routing buckets

use patchbay_core::ListenerId;

use crate::ListenerSet;

/// One routing key and the listeners subscribed to it.
///
/// An empty bucket still marks the key as known; it differs from a key
/// that was never subscribed.
#[derive(Debug, Clone)]
pub struct Bucket<K, L = ListenerId> {
    key: K,
    listeners: ListenerSet<L>,
}

impl<K, L: Copy + Eq> Bucket<K, L> {
    pub fn new(key: K) -> Self {
        Self {
            key,
            listeners: ListenerSet::new(),
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn listeners(&self) -> &ListenerSet<L> {
        &self.listeners
    }

    pub fn insert(&mut self, listener: L) -> bool {
        self.listeners.insert(listener)
    }

    pub fn remove(&mut self, listener: L) -> bool {
        self.listeners.remove(listener)
    }

    pub fn contains(&self, listener: L) -> bool {
        self.listeners.contains(listener)
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }
}
