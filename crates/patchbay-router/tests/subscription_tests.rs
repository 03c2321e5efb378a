//! Subscription Tests
//!
//! Membership rules of the registry:
//! - Global vs specific mutual exclusion
//! - Ignoring one key while listening globally
//! - Removing a listener from everything
//! - Duplicate handling

use patchbay_core::{Channel, ListenerId, RoutingError};
use patchbay_router::{Dispatcher, Registry};

fn id(raw: usize) -> ListenerId {
    ListenerId::from_raw(raw)
}

fn registry_with(keys: &[&str]) -> Registry<String> {
    let mut registry = Registry::new();
    for key in keys {
        registry.ensure_key(*key);
    }
    registry
}

// ============================================================================
// Mutual exclusion
// ============================================================================

#[test]
fn test_listen_specific_implies_not_global() {
    for start_global in [false, true] {
        let mut registry = registry_with(&["a", "b"]);
        if start_global {
            registry.listen_global(id(1)).unwrap();
        }
        registry.listen_specific(id(1), "b").unwrap();

        assert!(registry.is_listening(id(1), "b"));
        assert!(!registry.is_listening(id(1), ""));
    }
}

#[test]
fn test_listen_specific_creates_key() {
    let mut registry: Registry<String> = Registry::new();
    registry.listen_specific(id(1), "fresh").unwrap();
    assert!(registry.contains_key("fresh"));
}

#[test]
fn test_is_listening_is_exact_bucket() {
    let mut registry = registry_with(&["a"]);
    registry.listen_global(id(1)).unwrap();
    // Hears "a" through the global bucket, but is not a member of it
    assert!(!registry.is_listening(id(1), "a"));
    assert!(!registry.is_listening(id(1), "missing"));
}

// ============================================================================
// Ignore
// ============================================================================

#[test]
fn test_ignore_from_global_joins_every_other_existing_key() {
    let keys = ["a", "b", "c", "d"];
    for ignored in keys {
        let mut registry = registry_with(&keys);
        registry.listen_global(id(7)).unwrap();
        registry.ignore(id(7), ignored);

        for key in keys {
            assert_eq!(registry.is_listening(id(7), key), key != ignored, "key {key}");
        }
        assert!(!registry.is_listening(id(7), ""));
    }
}

#[test]
fn test_ignore_does_not_disturb_other_listeners() {
    let mut registry = registry_with(&["a", "b"]);
    registry.listen_global(id(1)).unwrap();
    registry.listen_global(id(2)).unwrap();
    registry.ignore(id(1), "a");

    assert!(registry.is_listening(id(2), ""));
    assert!(!registry.is_listening(id(2), "b"));
    assert_eq!(registry.listeners(""), vec![id(2)]);
}

#[test]
fn test_ignore_unknown_specific_key_is_noop_membership() {
    let mut registry = registry_with(&["a"]);
    registry.listen_specific(id(1), "a").unwrap();
    registry.ignore(id(1), "b");
    assert!(registry.is_listening(id(1), "a"));
    assert!(!registry.is_listening(id(1), "b"));
}

#[test]
fn test_ignore_all_from_any_state() {
    let mut registry = registry_with(&["a", "b", "c"]);
    registry.listen_global(id(1)).unwrap();
    registry.ignore(id(1), "b");
    registry.listen_specific(id(2), "c").unwrap();

    registry.ignore_all(id(1));
    registry.ignore_all(id(2));
    registry.ignore_all(id(3));

    for key in registry.keys() {
        assert!(registry.listeners(key.as_str()).is_empty(), "key {key:?}");
    }
}

// ============================================================================
// Duplicates
// ============================================================================

#[test]
fn test_duplicate_listen_leaves_state_unchanged() {
    let mut registry = registry_with(&["a"]);
    registry.listen_specific(id(1), "a").unwrap();
    registry.listen_specific(id(2), "a").unwrap();

    let err = registry.listen_specific(id(1), "a").unwrap_err();
    assert!(!err.is_fatal());
    assert!(matches!(err, RoutingError::Duplicate { .. }));
    assert_eq!(registry.listeners("a"), vec![id(1), id(2)]);
}

// ============================================================================
// Scenario
// ============================================================================

#[test]
fn test_volume_tempo_scenario() {
    let a = id(1);
    let mut registry = registry_with(&["volume", "tempo"]);
    registry.listen_global(a).unwrap();

    let hits: Vec<_> = Dispatcher::new(&registry).targets("volume").collect();
    assert_eq!(hits, vec![a]);

    registry.ignore(a, "volume");
    assert!(registry.is_listening(a, "tempo"));

    assert_eq!(Dispatcher::new(&registry).dispatch("volume", |_| {}), 0);
    let hits: Vec<_> = Dispatcher::new(&registry).targets("tempo").collect();
    assert_eq!(hits, vec![a]);
}

#[test]
fn test_negative_channel_is_wildcard() {
    let mut negative: Registry<Channel> = Registry::new();
    let mut zero: Registry<Channel> = Registry::new();

    negative.listen_specific(id(1), Channel::new(-3)).unwrap();
    zero.listen_specific(id(1), Channel::new(0)).unwrap();

    assert_eq!(negative.listeners(&Channel::ANY), zero.listeners(&Channel::ANY));
    assert_eq!(negative.len(), zero.len());
}
