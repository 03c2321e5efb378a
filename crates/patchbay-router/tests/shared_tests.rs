//! Shared Hub Tests
//!
//! Locking behaviour of `SharedHub`: callbacks run outside the lock and
//! dispatch can run from another thread.

use parking_lot::Mutex;
use patchbay_core::ListenerId;
use patchbay_router::{HubConfig, NullEngine, Receiver, SharedHub};
use patchbay_test_utils::{bang, float, RecordingReceiver};
use std::sync::Arc;
use std::thread;

/// Stops listening to its source from inside the callback
struct OneShot {
    hub: SharedHub<NullEngine>,
    id: Mutex<Option<ListenerId>>,
    hits: Mutex<u32>,
}

impl Receiver for OneShot {
    fn on_bang(&self, source: &str) {
        *self.hits.lock() += 1;
        if let Some(id) = *self.id.lock() {
            self.hub
                .lock()
                .ignore_source(id, source)
                .expect("ignore from callback");
        }
    }
}

#[test]
fn test_callback_can_reenter_hub() {
    let hub = SharedHub::new(HubConfig::default(), NullEngine);
    hub.with(|h| h.subscribe("trigger")).unwrap();

    let one_shot = Arc::new(OneShot {
        hub: hub.clone(),
        id: Mutex::new(None),
        hits: Mutex::new(0),
    });
    let id = hub.with(|h| h.add_receiver(one_shot.clone())).unwrap();
    *one_shot.id.lock() = Some(id);

    assert_eq!(hub.on_raw_event(&bang("trigger")), 1);
    assert_eq!(hub.on_raw_event(&bang("trigger")), 0);
    assert_eq!(*one_shot.hits.lock(), 1);

    hub.with(|h| h.remove_receiver(id)).unwrap();
}

#[test]
fn test_dispatch_from_engine_thread() {
    let hub = SharedHub::new(HubConfig::default(), NullEngine);
    hub.with(|h| h.subscribe("level")).unwrap();
    let r = RecordingReceiver::new();
    let id = hub.with(|h| h.add_receiver(r.clone())).unwrap();
    hub.with(|h| h.receive_source(id, "level")).unwrap();

    let engine_side = hub.clone();
    let worker = thread::spawn(move || {
        for i in 0..100 {
            engine_side.on_raw_event(&float("level", i as f32));
        }
    });
    worker.join().unwrap();

    assert_eq!(r.from_source("level").len(), 100);
    hub.with(|h| h.remove_receiver(id)).unwrap();
}
