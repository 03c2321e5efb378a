//! Thread-safe hub handle
//!
//! Mutation and dispatch are serialized by one lock. Dispatch resolves its
//! targets under the lock and runs the callbacks after releasing it, so a
//! callback may call back into the hub (for example to ignore a source).

use parking_lot::{Mutex, MutexGuard};
use patchbay_core::PdEvent;
use std::sync::Arc;

use crate::{Engine, Hub, HubConfig};

pub struct SharedHub<E: Engine> {
    inner: Arc<Mutex<Hub<E>>>,
}

impl<E: Engine> SharedHub<E> {
    pub fn new(config: HubConfig, engine: E) -> Self {
        Self::from_hub(Hub::new(config, engine))
    }

    pub fn from_hub(hub: Hub<E>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(hub)),
        }
    }

    /// Lock the hub for subscription changes or outbound sends.
    ///
    /// Do not hold the guard across [`SharedHub::on_raw_event`]; the lock is
    /// not reentrant.
    pub fn lock(&self) -> MutexGuard<'_, Hub<E>> {
        self.inner.lock()
    }

    /// Run `f` with the hub locked
    pub fn with<R>(&self, f: impl FnOnce(&mut Hub<E>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Deliver an engine event; callbacks run without the lock held
    pub fn on_raw_event(&self, event: &PdEvent) -> usize {
        let route = self.inner.lock().route(event);
        route.deliver()
    }
}

impl<E: Engine> Clone for SharedHub<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
