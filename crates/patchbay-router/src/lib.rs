//! Patchbay Router
//!
//! The router sits between a signal-processing engine and the code that
//! wants to hear from it:
//! - Tracks which listener hears which source or MIDI channel ([`Registry`])
//! - Fans inbound events out to the right listeners ([`Dispatcher`])
//! - Owns listener registration and the engine handle ([`Hub`])
//! - Serializes mutation and dispatch across threads ([`SharedHub`])
//!
//! # Example
//!
//! ```
//! use patchbay_core::PdEvent;
//! use patchbay_router::{Hub, HubConfig, NullEngine, Receiver};
//! use std::sync::Arc;
//!
//! struct Printer;
//!
//! impl Receiver for Printer {
//!     fn on_float(&self, source: &str, value: f32) {
//!         println!("{source}: {value}");
//!     }
//! }
//!
//! let mut hub = Hub::new(HubConfig::default(), NullEngine);
//! let printer = Arc::new(Printer);
//! hub.subscribe("volume").unwrap();
//! let id = hub.add_receiver(printer.clone()).unwrap();
//! hub.receive_source(id, "volume").unwrap();
//!
//! hub.on_raw_event(&PdEvent::Float { dest: "volume".into(), value: 0.5 });
//! ```

pub mod bucket;
pub mod dispatch;
pub mod engine;
pub mod hub;
pub mod known;
pub mod receiver;
pub mod registry;
pub mod set;
pub mod shared;

pub use bucket::Bucket;
pub use dispatch::{Dispatcher, Targets};
pub use engine::{Engine, NullEngine};
pub use hub::{Hub, HubConfig, Route};
pub use receiver::{MidiReceiver, Receiver};
pub use registry::{Registry, RoutingKey};
pub use set::ListenerSet;
pub use shared::SharedHub;

pub use patchbay_core::{Result, RoutingError};
