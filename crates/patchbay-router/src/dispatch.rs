//! Event fan-out
//!
//! An event addressed to `key` reaches the global bucket first, then the
//! bucket for `key` if one exists. Membership is not de-duplicated across
//! the two buckets; the registry keeps a listener in at most one of them.

use std::borrow::Borrow;
use std::fmt;

use crate::{Registry, RoutingKey};

/// Delivery order for one event: global bucket, then the key's bucket
pub struct Targets<'a, L> {
    global: std::slice::Iter<'a, L>,
    specific: std::slice::Iter<'a, L>,
}

impl<L: Copy> Iterator for Targets<'_, L> {
    type Item = L;

    fn next(&mut self) -> Option<L> {
        self.global
            .next()
            .or_else(|| self.specific.next())
            .copied()
    }
}

/// Resolves delivery targets against a registry
pub struct Dispatcher<'a, K: RoutingKey, L> {
    registry: &'a Registry<K, L>,
}

impl<'a, K: RoutingKey, L: Copy + Eq + fmt::Debug> Dispatcher<'a, K, L> {
    pub fn new(registry: &'a Registry<K, L>) -> Self {
        Self { registry }
    }

    /// Listeners that should receive an event for `key`, in delivery order
    pub fn targets<Q>(&self, key: &Q) -> Targets<'a, L>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let registry = self.registry;
        // Addressing the global key itself must not visit it twice
        let specific: &[L] = match registry.bucket(key) {
            Some(bucket) if !bucket.key().is_global() => bucket.listeners().as_slice(),
            _ => &[],
        };

        Targets {
            global: registry.global().listeners().as_slice().iter(),
            specific: specific.iter(),
        }
    }

    /// Call `deliver` once per target; returns the number of deliveries.
    ///
    /// An unknown key with an empty global bucket delivers nothing.
    pub fn dispatch<Q, F>(&self, key: &Q, mut deliver: F) -> usize
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        F: FnMut(L),
    {
        let mut count = 0;
        for listener in self.targets(key) {
            deliver(listener);
            count += 1;
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchbay_core::{Channel, ListenerId};

    fn id(raw: usize) -> ListenerId {
        ListenerId::from_raw(raw)
    }

    #[test]
    fn test_global_then_specific() {
        let mut registry: Registry<String> = Registry::new();
        registry.listen_global(id(1)).unwrap();
        registry.listen_specific(id(2), "volume").unwrap();
        registry.listen_specific(id(3), "volume").unwrap();

        let targets: Vec<_> = Dispatcher::new(&registry).targets("volume").collect();
        assert_eq!(targets, vec![id(1), id(2), id(3)]);
    }

    #[test]
    fn test_unknown_key_with_empty_global_is_noop() {
        let registry: Registry<String> = Registry::new();
        let mut hits = 0;
        let count = Dispatcher::new(&registry).dispatch("nobody", |_| hits += 1);
        assert_eq!(count, 0);
        assert_eq!(hits, 0);
    }

    #[test]
    fn test_unknown_key_reaches_global() {
        let mut registry: Registry<Channel> = Registry::new();
        registry.listen_global(id(1)).unwrap();
        let count = Dispatcher::new(&registry).dispatch(&Channel::new(9), |_| {});
        assert_eq!(count, 1);
    }

    #[test]
    fn test_global_key_visited_once() {
        let mut registry: Registry<String> = Registry::new();
        registry.listen_global(id(1)).unwrap();
        assert_eq!(Dispatcher::new(&registry).dispatch("", |_| {}), 1);
    }

    #[test]
    fn test_no_dedup_across_buckets() {
        let mut registry: Registry<String> = Registry::new();
        registry.listen_global(id(1)).unwrap();
        // Bypass the mutual exclusion to model a transient double membership
        registry.ensure_key("volume").insert(id(1));

        let targets: Vec<_> = Dispatcher::new(&registry).targets("volume").collect();
        assert_eq!(targets, vec![id(1), id(1)]);
    }
}
