//! Routing error types
//!
//! Everything except [`RoutingError::Engine`] is a reported, non-fatal
//! condition: the operation that produced it leaves routing state untouched.

use thiserror::Error;

use crate::ListenerId;

pub type Result<T> = std::result::Result<T, RoutingError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoutingError {
    /// Listener already known, source already subscribed, or listener
    /// already a member of the bucket
    #[error("duplicate {what}: {name}")]
    Duplicate { what: &'static str, name: String },

    /// Operation on behalf of a listener that was never added
    #[error("unknown listener: {0}")]
    UnknownListener(ListenerId),

    /// Source or channel key that was never subscribed
    #[error("unknown key: {0:?}")]
    UnknownKey(String),

    /// The reserved global key cannot be removed or subscribed
    #[error("reserved key: {0:?}")]
    ReservedKey(String),

    /// The engine refused an outbound command
    #[error("engine error: {0}")]
    Engine(String),
}

impl RoutingError {
    pub fn duplicate(what: &'static str, name: impl Into<String>) -> Self {
        RoutingError::Duplicate {
            what,
            name: name.into(),
        }
    }

    /// Only engine faults are fatal; the rest are reported and ignored
    pub fn is_fatal(&self) -> bool {
        matches!(self, RoutingError::Engine(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = RoutingError::duplicate("source", "volume");
        assert_eq!(err.to_string(), "duplicate source: volume");
        assert_eq!(
            RoutingError::UnknownKey("tempo".into()).to_string(),
            "unknown key: \"tempo\""
        );
    }

    #[test]
    fn test_fatality() {
        assert!(!RoutingError::UnknownKey("x".into()).is_fatal());
        assert!(!RoutingError::duplicate("listener", "1").is_fatal());
        assert!(RoutingError::Engine("gone".into()).is_fatal());
    }
}
