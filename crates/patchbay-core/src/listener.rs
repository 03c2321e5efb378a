//! Listener identity

use std::fmt;
use std::sync::Arc;

/// Handle identifying a registered listener.
///
/// Identity is the address of the listener's shared allocation, so two
/// clones of the same `Arc` name the same listener while two equal values
/// in separate allocations do not. Ids are only meaningful while the
/// listener is alive; owners remove a listener before dropping it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(usize);

impl ListenerId {
    pub fn of<T: ?Sized>(listener: &Arc<T>) -> Self {
        ListenerId(Arc::as_ptr(listener) as *const () as usize)
    }

    /// Raw id, for listeners that are not reference counted (tests, tools)
    pub const fn from_raw(raw: usize) -> Self {
        ListenerId(raw)
    }

    pub fn as_raw(self) -> usize {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:x}", self.0)
    }
}

/// Capability kind of a listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// bang/float/symbol/list/message/print
    Message,
    /// channel voice messages and raw MIDI bytes
    Midi,
}

impl fmt::Display for ListenerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenerKind::Message => f.write_str("message"),
            ListenerKind::Midi => f.write_str("midi"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_by_allocation() {
        let a = Arc::new(5u32);
        let b = Arc::new(5u32);
        assert_eq!(ListenerId::of(&a), ListenerId::of(&Arc::clone(&a)));
        assert_ne!(ListenerId::of(&a), ListenerId::of(&b));
    }

    #[test]
    fn test_identity_through_trait_object() {
        let a = Arc::new(String::from("x"));
        let dyn_a: Arc<dyn fmt::Debug + Send + Sync> = a.clone();
        assert_eq!(ListenerId::of(&a), ListenerId::of(&dyn_a));
    }
}
