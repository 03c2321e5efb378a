//! MIDI channel numbering
//!
//! Listeners address channels 1-based (1-16), with `0` meaning "any
//! channel". The engine numbers channels from 0. The conversion between the
//! two lives here and is applied only where events cross the engine
//! boundary; routing tables always use the listener-facing number.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Listener-facing MIDI channel, `0` is the wildcard
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub struct Channel(i32);

impl Channel {
    /// Wildcard channel: every channel
    pub const ANY: Channel = Channel(0);

    /// Create a channel, clamping negative numbers to the wildcard.
    ///
    /// There is no upper bound check; the 1-16 range is a convention of the
    /// callers.
    pub fn new(channel: i32) -> Self {
        Channel(channel.max(0))
    }

    /// Convert a 0-based engine channel into the listener-facing number
    pub fn from_engine(raw: i32) -> Self {
        if raw < 0 {
            Channel::ANY
        } else {
            Channel(raw.saturating_add(1))
        }
    }

    /// 0-based channel number for outbound engine calls.
    ///
    /// The wildcard has no engine equivalent and maps to the first channel.
    pub fn to_engine(self) -> i32 {
        self.0.saturating_sub(1).max(0)
    }

    pub fn number(self) -> i32 {
        self.0
    }

    pub fn is_any(self) -> bool {
        self.0 == 0
    }
}

impl Default for Channel {
    fn default() -> Self {
        Channel::ANY
    }
}

impl From<i32> for Channel {
    fn from(channel: i32) -> Self {
        Channel::new(channel)
    }
}

impl From<Channel> for i32 {
    fn from(channel: Channel) -> Self {
        channel.0
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_any() {
            f.write_str("any")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Engine program numbers are 0-based, listeners see 1-128
pub fn program_from_engine(raw: i32) -> i32 {
    raw.saturating_add(1)
}

/// Inverse of [`program_from_engine`]
pub fn program_to_engine(program: i32) -> i32 {
    program.saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_clamps_to_wildcard() {
        assert_eq!(Channel::new(-3), Channel::ANY);
        assert_eq!(Channel::new(0), Channel::ANY);
        assert_eq!(Channel::new(5).number(), 5);
        assert_eq!(Channel::from(-1), Channel::ANY);
    }

    #[test]
    fn test_engine_boundary() {
        assert_eq!(Channel::from_engine(0).number(), 1);
        assert_eq!(Channel::from_engine(15).number(), 16);
        assert_eq!(Channel::from_engine(-1), Channel::ANY);
        assert_eq!(Channel::new(1).to_engine(), 0);
        assert_eq!(Channel::new(16).to_engine(), 15);
        assert_eq!(Channel::ANY.to_engine(), 0);
    }

    #[test]
    fn test_program_offset() {
        assert_eq!(program_from_engine(0), 1);
        assert_eq!(program_to_engine(1), 0);
    }

    #[test]
    fn test_engine_boundary_saturates() {
        assert_eq!(Channel::from_engine(i32::MAX).number(), i32::MAX);
        assert_eq!(Channel::from_engine(i32::MIN), Channel::ANY);
        assert_eq!(Channel::new(i32::MAX).to_engine(), i32::MAX - 1);
        assert_eq!(Channel::new(i32::MIN).to_engine(), 0);
        assert_eq!(program_from_engine(i32::MAX), i32::MAX);
        assert_eq!(program_to_engine(i32::MIN), i32::MIN);
    }

    #[test]
    fn test_no_upper_bound() {
        assert_eq!(Channel::new(42).number(), 42);
        assert_eq!(Channel::new(42).to_string(), "42");
        assert_eq!(Channel::ANY.to_string(), "any");
    }
}
