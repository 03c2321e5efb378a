//! Engine boundary
//!
//! The engine produces inbound events (fed to [`crate::Hub::on_raw_event`])
//! and consumes the calls below. The hub never generates engine traffic on
//! its own; every call mirrors an explicit hub operation.

use patchbay_core::{ListenerKind, Outbound, Result};
use tracing::trace;

pub trait Engine: Send {
    /// Start or stop delivering events of one listener kind
    fn set_receiving(&mut self, kind: ListenerKind, enabled: bool);

    /// Ask the engine to forward messages sent to `source`
    fn subscribe(&mut self, source: &str);

    fn unsubscribe(&mut self, source: &str);

    fn unsubscribe_all(&mut self);

    /// Forward an outbound command (engine numbering, 0-based)
    fn send(&mut self, message: Outbound) -> Result<()>;
}

/// Engine that accepts and discards everything, for routing-only hosts
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEngine;

impl Engine for NullEngine {
    fn set_receiving(&mut self, kind: ListenerKind, enabled: bool) {
        trace!(%kind, enabled, "null engine: set receiving");
    }

    fn subscribe(&mut self, source: &str) {
        trace!(source, "null engine: subscribe");
    }

    fn unsubscribe(&mut self, source: &str) {
        trace!(source, "null engine: unsubscribe");
    }

    fn unsubscribe_all(&mut self) {}

    fn send(&mut self, message: Outbound) -> Result<()> {
        trace!(?message, "null engine: send");
        Ok(())
    }
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn set_receiving(&mut self, kind: ListenerKind, enabled: bool) {
        (**self).set_receiving(kind, enabled)
    }

    fn subscribe(&mut self, source: &str) {
        (**self).subscribe(source)
    }

    fn unsubscribe(&mut self, source: &str) {
        (**self).unsubscribe(source)
    }

    fn unsubscribe_all(&mut self) {
        (**self).unsubscribe_all()
    }

    fn send(&mut self, message: Outbound) -> Result<()> {
        (**self).send(message)
    }
}
