//! Subscription registry
//!
//! A registry maps routing keys to buckets of listeners. One reserved key
//! ([`RoutingKey::global`]) always exists; its listeners hear every event.
//!
//! A listener is either in the global bucket or in an explicit (possibly
//! empty) set of specific buckets, never both: joining a specific key leaves
//! the global bucket, and joining the global bucket leaves every specific
//! key.
//!
//! The registry stores positive membership only. "Everything except `k`" is
//! materialized by copying the listener into every other bucket that exists
//! at the time of the call, so keys created later are not heard.

use patchbay_core::{Channel, ListenerId, Result, RoutingError, GLOBAL_SOURCE};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use crate::Bucket;

/// Key type usable in a [`Registry`]
pub trait RoutingKey: Clone + Ord + fmt::Debug + fmt::Display {
    /// The reserved wildcard key
    fn global() -> Self;

    fn is_global(&self) -> bool {
        *self == Self::global()
    }
}

impl RoutingKey for String {
    fn global() -> Self {
        GLOBAL_SOURCE.to_string()
    }
}

impl RoutingKey for Channel {
    fn global() -> Self {
        Channel::ANY
    }
}

/// Subscription state for one listener capability kind
#[derive(Debug, Clone)]
pub struct Registry<K: RoutingKey, L = ListenerId> {
    buckets: BTreeMap<K, Bucket<K, L>>,
}

impl<K: RoutingKey, L: Copy + Eq + fmt::Debug> Registry<K, L> {
    /// Create a registry holding only the empty global bucket
    pub fn new() -> Self {
        let mut buckets = BTreeMap::new();
        buckets.insert(K::global(), Bucket::new(K::global()));
        Self { buckets }
    }

    /// Create an empty bucket for `key` if there is none
    pub fn ensure_key(&mut self, key: impl Into<K>) -> &mut Bucket<K, L> {
        let key = key.into();
        self.buckets
            .entry(key.clone())
            .or_insert_with(|| Bucket::new(key))
    }

    /// Drop a specific key and its memberships
    pub fn remove_key<Q>(&mut self, key: &Q) -> Result<()>
    where
        K: Borrow<Q>,
        Q: Ord + fmt::Display + ?Sized,
    {
        let global = K::global();
        if Borrow::<Q>::borrow(&global) == key {
            return Err(RoutingError::ReservedKey(key.to_string()));
        }
        match self.buckets.remove(key) {
            Some(_) => Ok(()),
            None => Err(RoutingError::UnknownKey(key.to_string())),
        }
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.buckets.contains_key(key)
    }

    pub fn bucket<Q>(&self, key: &Q) -> Option<&Bucket<K, L>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.buckets.get(key)
    }

    /// The reserved global bucket
    pub fn global(&self) -> &Bucket<K, L> {
        // The global bucket is inserted by `new`/`clear` and never removed
        &self.buckets[&K::global()]
    }

    fn global_mut(&mut self) -> &mut Bucket<K, L> {
        self.ensure_key(K::global())
    }

    /// All known keys, global first, in key order
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.buckets.keys()
    }

    /// Listeners of one bucket, in insertion order
    pub fn listeners<Q>(&self, key: &Q) -> Vec<L>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.buckets
            .get(key)
            .map(|bucket| bucket.listeners().iter().collect())
            .unwrap_or_default()
    }

    /// Number of buckets, including the global one
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// True when only the global bucket exists
    pub fn is_empty(&self) -> bool {
        self.buckets.len() == 1
    }

    /// Listen to every key
    pub fn listen_global(&mut self, listener: L) -> Result<()> {
        if self.global().contains(listener) {
            return Err(RoutingError::duplicate(
                "membership",
                format!("{:?} on global key", listener),
            ));
        }

        for bucket in self.buckets.values_mut() {
            bucket.remove(listener);
        }
        self.global_mut().insert(listener);
        Ok(())
    }

    /// Listen to one specific key, leaving the global bucket if needed
    pub fn listen_specific(&mut self, listener: L, key: impl Into<K>) -> Result<()> {
        let key = key.into();
        if key.is_global() {
            return self.listen_global(listener);
        }
        if self
            .bucket(&key)
            .is_some_and(|bucket| bucket.contains(listener))
        {
            return Err(RoutingError::duplicate(
                "membership",
                format!("{:?} on {}", listener, key),
            ));
        }

        self.global_mut().remove(listener);
        self.ensure_key(key).insert(listener);
        Ok(())
    }

    /// Stop hearing `key`; the global key means stop hearing anything.
    ///
    /// A listener in the global bucket is moved into every other bucket
    /// known right now, then taken out of `key`.
    pub fn ignore(&mut self, listener: L, key: impl Into<K>) {
        let key = key.into();
        if key.is_global() {
            self.ignore_all(listener);
            return;
        }

        self.ensure_key(key.clone());

        if self.global_mut().remove(listener) {
            for bucket in self.buckets.values_mut() {
                if !bucket.key().is_global() {
                    bucket.insert(listener);
                }
            }
        }

        if let Some(bucket) = self.buckets.get_mut(&key) {
            bucket.remove(listener);
        }
    }

    /// Remove a listener from every bucket; returns how many it left
    pub fn ignore_all(&mut self, listener: L) -> usize {
        self.buckets
            .values_mut()
            .filter_map(|bucket| bucket.remove(listener).then_some(()))
            .count()
    }

    /// Exact-bucket membership; does not consult the global bucket
    pub fn is_listening<Q>(&self, listener: L, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.buckets
            .get(key)
            .is_some_and(|bucket| bucket.contains(listener))
    }

    /// Empty every bucket but keep the keys
    pub fn clear_listeners(&mut self) {
        for bucket in self.buckets.values_mut() {
            bucket.clear();
        }
    }

    /// Back to the initial state: only an empty global bucket
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.buckets.insert(K::global(), Bucket::new(K::global()));
    }
}

impl<K: RoutingKey, L: Copy + Eq + fmt::Debug> Default for Registry<K, L> {
    fn default() -> Self {
        Self::new()
    }
}
