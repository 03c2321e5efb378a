//! Registered listeners
//!
//! The hub keeps weak handles only; the owner of a listener controls its
//! lifetime and removes it from the hub before dropping it.

use patchbay_core::ListenerId;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

use crate::ListenerSet;

/// Flat set of known listeners of one kind, in registration order
pub struct KnownListeners<T: ?Sized> {
    order: ListenerSet<ListenerId>,
    handles: HashMap<ListenerId, Weak<T>>,
}

impl<T: ?Sized> KnownListeners<T> {
    pub fn new() -> Self {
        Self {
            order: ListenerSet::new(),
            handles: HashMap::new(),
        }
    }

    /// Register a listener; returns None if it is already known
    pub fn insert(&mut self, listener: &Arc<T>) -> Option<ListenerId> {
        let id = ListenerId::of(listener);
        if !self.order.insert(id) {
            return None;
        }
        self.handles.insert(id, Arc::downgrade(listener));
        Some(id)
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        self.handles.remove(&id);
        self.order.remove(id)
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.order.contains(id)
    }

    /// Live handle for `id`; None if unknown or already dropped
    pub fn get(&self, id: ListenerId) -> Option<Arc<T>> {
        self.handles.get(&id).and_then(Weak::upgrade)
    }

    pub fn ids(&self) -> impl Iterator<Item = ListenerId> + '_ {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.handles.clear();
    }
}

impl<T: ?Sized> Default for KnownListeners<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_insert() {
        let mut known: KnownListeners<u32> = KnownListeners::new();
        let a = Arc::new(1);
        assert!(known.insert(&a).is_some());
        assert!(known.insert(&a.clone()).is_none());
        assert_eq!(known.len(), 1);
    }

    #[test]
    fn test_weak_handles() {
        let mut known: KnownListeners<u32> = KnownListeners::new();
        let a = Arc::new(1);
        let id = known.insert(&a).unwrap();
        assert_eq!(known.get(id).as_deref(), Some(&1));

        drop(a);
        assert!(known.contains(id));
        assert!(known.get(id).is_none());
        assert!(known.remove(id));
        assert!(known.is_empty());
    }
}
