//! Patchbay Core
//!
//! Shared types for the Patchbay routing layer:
//! - Message payloads ([`Atom`], [`List`])
//! - Inbound engine events ([`PdEvent`]) and outbound commands ([`Outbound`])
//! - Channel numbering between the engine and listeners ([`channel`])
//! - Listener identity ([`ListenerId`])
//! - Routing conditions ([`RoutingError`])

pub mod channel;
pub mod error;
pub mod event;
pub mod listener;
pub mod types;

pub use channel::Channel;
pub use error::{Result, RoutingError};
pub use event::{EventKind, Outbound, PdEvent};
pub use listener::{ListenerId, ListenerKind};
pub use types::{Atom, List};

/// Reserved source name meaning "every source"
pub const GLOBAL_SOURCE: &str = "";

/// Number of MIDI channels addressable by listeners
pub const MIDI_CHANNELS: i32 = 16;
