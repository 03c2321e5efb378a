//! Listener registration and event routing
//!
//! The hub owns the known listeners, one registry for sources and one for
//! MIDI channels, and the engine. It is the only place where engine
//! numbering (0-based channels and programs) meets listener numbering.
//!
//! Routing conditions (duplicate, unknown listener, unknown key) are logged
//! and returned; they never change state. Only a failing engine send is
//! fatal.

use patchbay_core::{
    channel::{program_from_engine, program_to_engine},
    Channel, List, ListenerId, ListenerKind, Outbound, PdEvent, Result, RoutingError,
    GLOBAL_SOURCE,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::{known::KnownListeners, Dispatcher, Engine, MidiReceiver, Receiver, Registry};

/// Hub configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Name used in log output
    pub name: String,
    /// Log every inbound event at debug level
    pub log_events: bool,
    /// Newly added listeners hear every source/channel
    pub listen_global_on_add: bool,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            name: "Patchbay".to_string(),
            log_events: false,
            listen_global_on_add: true,
        }
    }
}

/// Routing hub between an engine and its listeners
pub struct Hub<E: Engine> {
    config: HubConfig,
    engine: E,
    receivers: KnownListeners<dyn Receiver>,
    midi_receivers: KnownListeners<dyn MidiReceiver>,
    sources: Registry<String>,
    channels: Registry<Channel>,
}

impl<E: Engine> Hub<E> {
    pub fn new(config: HubConfig, engine: E) -> Self {
        info!(hub = %config.name, "hub created");
        Self {
            config,
            engine,
            receivers: KnownListeners::new(),
            midi_receivers: KnownListeners::new(),
            sources: Registry::new(),
            channels: Registry::new(),
        }
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Source subscriptions
    pub fn sources(&self) -> &Registry<String> {
        &self.sources
    }

    /// MIDI channel subscriptions
    pub fn channels(&self) -> &Registry<Channel> {
        &self.channels
    }

    /// Drop every source and channel subscription.
    ///
    /// Listeners stay registered but hear nothing until they listen again.
    pub fn clear(&mut self) {
        self.unsubscribe_all();
        self.channels.clear();
    }

    fn report(&self, op: &'static str, result: Result<()>) -> Result<()> {
        if let Err(e) = &result {
            if e.is_fatal() {
                error!(hub = %self.config.name, op, "{}", e);
            } else {
                warn!(hub = %self.config.name, op, "ignoring: {}", e);
            }
        }
        result
    }

    // =========================================================================
    // Sources
    // =========================================================================

    /// Subscribe to a source and ask the engine to forward it
    pub fn subscribe(&mut self, source: &str) -> Result<()> {
        if self.sources.contains_key(source) {
            return self.report(
                "subscribe",
                Err(RoutingError::duplicate("source", source)),
            );
        }
        self.engine.subscribe(source);
        self.sources.ensure_key(source);
        debug!(hub = %self.config.name, source, "subscribed");
        Ok(())
    }

    /// Unsubscribe from a source; its listeners stop hearing it
    pub fn unsubscribe(&mut self, source: &str) -> Result<()> {
        if source == GLOBAL_SOURCE {
            return self.report(
                "unsubscribe",
                Err(RoutingError::ReservedKey(source.to_string())),
            );
        }
        if !self.sources.contains_key(source) {
            return self.report(
                "unsubscribe",
                Err(RoutingError::UnknownKey(source.to_string())),
            );
        }
        self.engine.unsubscribe(source);
        self.sources.remove_key(source)?;
        debug!(hub = %self.config.name, source, "unsubscribed");
        Ok(())
    }

    /// True if `source` is subscribed (the global source always is)
    pub fn exists(&self, source: &str) -> bool {
        self.sources.contains_key(source)
    }

    pub fn unsubscribe_all(&mut self) {
        self.engine.unsubscribe_all();
        self.sources.clear();
    }

    // =========================================================================
    // Message receivers
    // =========================================================================

    /// Register a receiver.
    ///
    /// The first receiver turns on message delivery in the engine.
    pub fn add_receiver(&mut self, receiver: Arc<dyn Receiver>) -> Result<ListenerId> {
        let Some(id) = self.receivers.insert(&receiver) else {
            let id = ListenerId::of(&receiver);
            return self
                .report(
                    "add_receiver",
                    Err(RoutingError::duplicate("receiver", id.to_string())),
                )
                .map(|()| id);
        };

        if self.receivers.len() == 1 {
            self.engine.set_receiving(ListenerKind::Message, true);
        }
        if self.config.listen_global_on_add {
            self.sources.listen_global(id)?;
        }
        debug!(hub = %self.config.name, receiver = %id, "receiver added");
        Ok(id)
    }

    /// Forget a receiver and drop all its subscriptions.
    ///
    /// Removing the last receiver turns off message delivery.
    pub fn remove_receiver(&mut self, id: ListenerId) -> Result<()> {
        if !self.receivers.contains(id) {
            return self.report("remove_receiver", Err(RoutingError::UnknownListener(id)));
        }
        self.sources.ignore_all(id);
        self.receivers.remove(id);

        if self.receivers.is_empty() {
            self.engine.set_receiving(ListenerKind::Message, false);
        }
        debug!(hub = %self.config.name, receiver = %id, "receiver removed");
        Ok(())
    }

    pub fn has_receiver(&self, id: ListenerId) -> bool {
        self.receivers.contains(id)
    }

    pub fn receiver_count(&self) -> usize {
        self.receivers.len()
    }

    /// Forget every receiver, keeping the subscribed sources
    pub fn clear_receivers(&mut self) {
        self.receivers.clear();
        self.sources.clear_listeners();
        self.engine.set_receiving(ListenerKind::Message, false);
    }

    /// Hear `source`; the global source means every source
    pub fn receive_source(&mut self, id: ListenerId, source: &str) -> Result<()> {
        let result = self
            .check_source(id, source)
            .and_then(|()| self.sources.listen_specific(id, source));
        self.report("receive_source", result)
    }

    /// Stop hearing `source`; the global source means every source
    pub fn ignore_source(&mut self, id: ListenerId, source: &str) -> Result<()> {
        let result = self.check_source(id, source);
        if result.is_ok() {
            self.sources.ignore(id, source);
        }
        self.report("ignore_source", result)
    }

    pub fn is_receiving_source(&self, id: ListenerId, source: &str) -> bool {
        self.sources.is_listening(id, source)
    }

    fn check_source(&self, id: ListenerId, source: &str) -> Result<()> {
        if !self.receivers.contains(id) {
            return Err(RoutingError::UnknownListener(id));
        }
        if !self.sources.contains_key(source) {
            return Err(RoutingError::UnknownKey(source.to_string()));
        }
        Ok(())
    }

    // =========================================================================
    // MIDI receivers
    // =========================================================================

    /// Register a MIDI receiver.
    ///
    /// The first one turns on MIDI delivery in the engine.
    pub fn add_midi_receiver(&mut self, receiver: Arc<dyn MidiReceiver>) -> Result<ListenerId> {
        let Some(id) = self.midi_receivers.insert(&receiver) else {
            let id = ListenerId::of(&receiver);
            return self
                .report(
                    "add_midi_receiver",
                    Err(RoutingError::duplicate("midi receiver", id.to_string())),
                )
                .map(|()| id);
        };

        if self.midi_receivers.len() == 1 {
            self.engine.set_receiving(ListenerKind::Midi, true);
        }
        if self.config.listen_global_on_add {
            self.channels.listen_global(id)?;
        }
        debug!(hub = %self.config.name, receiver = %id, "midi receiver added");
        Ok(id)
    }

    pub fn remove_midi_receiver(&mut self, id: ListenerId) -> Result<()> {
        if !self.midi_receivers.contains(id) {
            return self.report(
                "remove_midi_receiver",
                Err(RoutingError::UnknownListener(id)),
            );
        }
        self.channels.ignore_all(id);
        self.midi_receivers.remove(id);

        if self.midi_receivers.is_empty() {
            self.engine.set_receiving(ListenerKind::Midi, false);
        }
        debug!(hub = %self.config.name, receiver = %id, "midi receiver removed");
        Ok(())
    }

    pub fn has_midi_receiver(&self, id: ListenerId) -> bool {
        self.midi_receivers.contains(id)
    }

    pub fn midi_receiver_count(&self) -> usize {
        self.midi_receivers.len()
    }

    pub fn clear_midi_receivers(&mut self) {
        self.midi_receivers.clear();
        self.channels.clear_listeners();
        self.engine.set_receiving(ListenerKind::Midi, false);
    }

    /// Hear a 1-based channel; `0` or below means every channel.
    ///
    /// Channel buckets are created on demand.
    pub fn receive_midi_channel(&mut self, id: ListenerId, channel: i32) -> Result<()> {
        if !self.midi_receivers.contains(id) {
            return self.report(
                "receive_midi_channel",
                Err(RoutingError::UnknownListener(id)),
            );
        }
        let result = self.channels.listen_specific(id, Channel::new(channel));
        self.report("receive_midi_channel", result)
    }

    /// Stop hearing a 1-based channel; `0` or below means every channel
    pub fn ignore_midi_channel(&mut self, id: ListenerId, channel: i32) -> Result<()> {
        if !self.midi_receivers.contains(id) {
            return self.report(
                "ignore_midi_channel",
                Err(RoutingError::UnknownListener(id)),
            );
        }
        self.channels.ignore(id, Channel::new(channel));
        Ok(())
    }

    pub fn is_receiving_midi_channel(&self, id: ListenerId, channel: i32) -> bool {
        self.channels.is_listening(id, &Channel::new(channel))
    }

    // =========================================================================
    // Inbound
    // =========================================================================

    /// Resolve the listeners an engine event should reach.
    ///
    /// The returned route holds strong handles only, so it can be delivered
    /// after any lock around the hub is released.
    pub fn route<'e>(&self, event: &'e PdEvent) -> Route<'e> {
        if self.config.log_events {
            debug!(hub = %self.config.name, "{}", event);
        }

        let mut route = Route {
            event,
            receivers: Vec::new(),
            midi_receivers: Vec::new(),
        };

        match event {
            PdEvent::Print { .. } => {
                route.receivers = self
                    .receivers
                    .ids()
                    .filter_map(|id| self.live_receiver(id))
                    .collect();
            }
            PdEvent::MidiByte { .. } => {
                route.midi_receivers = self
                    .midi_receivers
                    .ids()
                    .filter_map(|id| self.live_midi_receiver(id))
                    .collect();
            }
            _ => {
                if let Some(dest) = event.dest() {
                    Dispatcher::new(&self.sources).dispatch(dest, |id| {
                        if let Some(r) = self.live_receiver(id) {
                            route.receivers.push(r);
                        }
                    });
                } else if let Some(raw) = event.channel() {
                    let channel = Channel::from_engine(raw);
                    Dispatcher::new(&self.channels).dispatch(&channel, |id| {
                        if let Some(r) = self.live_midi_receiver(id) {
                            route.midi_receivers.push(r);
                        }
                    });
                }
            }
        }

        route
    }

    /// Deliver one engine event to its listeners
    pub fn on_raw_event(&self, event: &PdEvent) -> usize {
        self.route(event).deliver()
    }

    fn live_receiver(&self, id: ListenerId) -> Option<Arc<dyn Receiver>> {
        let receiver = self.receivers.get(id);
        if receiver.is_none() {
            warn!(hub = %self.config.name, receiver = %id, "receiver dropped without removal");
        }
        receiver
    }

    fn live_midi_receiver(&self, id: ListenerId) -> Option<Arc<dyn MidiReceiver>> {
        let receiver = self.midi_receivers.get(id);
        if receiver.is_none() {
            warn!(hub = %self.config.name, receiver = %id, "midi receiver dropped without removal");
        }
        receiver
    }

    // =========================================================================
    // Outbound
    // =========================================================================

    fn send(&mut self, message: Outbound) -> Result<()> {
        let result = self.engine.send(message);
        self.report("send", result)
    }

    pub fn send_bang(&mut self, dest: &str) -> Result<()> {
        self.send(Outbound::Bang {
            dest: dest.to_string(),
        })
    }

    pub fn send_float(&mut self, dest: &str, value: f32) -> Result<()> {
        self.send(Outbound::Float {
            dest: dest.to_string(),
            value,
        })
    }

    pub fn send_symbol(&mut self, dest: &str, symbol: &str) -> Result<()> {
        self.send(Outbound::Symbol {
            dest: dest.to_string(),
            symbol: symbol.to_string(),
        })
    }

    pub fn send_list(&mut self, dest: &str, list: List) -> Result<()> {
        self.send(Outbound::List {
            dest: dest.to_string(),
            list,
        })
    }

    pub fn send_message(&mut self, dest: &str, msg: &str, list: List) -> Result<()> {
        self.send(Outbound::Message {
            dest: dest.to_string(),
            msg: msg.to_string(),
            list,
        })
    }

    /// MIDI sends take 1-based channels
    pub fn send_note_on(&mut self, channel: i32, pitch: i32, velocity: i32) -> Result<()> {
        self.send(Outbound::NoteOn {
            channel: Channel::new(channel).to_engine(),
            pitch,
            velocity,
        })
    }

    pub fn send_control_change(&mut self, channel: i32, controller: i32, value: i32) -> Result<()> {
        self.send(Outbound::ControlChange {
            channel: Channel::new(channel).to_engine(),
            controller,
            value,
        })
    }

    /// `program` is 1-based (1-128)
    pub fn send_program_change(&mut self, channel: i32, program: i32) -> Result<()> {
        self.send(Outbound::ProgramChange {
            channel: Channel::new(channel).to_engine(),
            program: program_to_engine(program),
        })
    }

    pub fn send_pitch_bend(&mut self, channel: i32, value: i32) -> Result<()> {
        self.send(Outbound::PitchBend {
            channel: Channel::new(channel).to_engine(),
            value,
        })
    }

    pub fn send_aftertouch(&mut self, channel: i32, value: i32) -> Result<()> {
        self.send(Outbound::Aftertouch {
            channel: Channel::new(channel).to_engine(),
            value,
        })
    }

    pub fn send_poly_aftertouch(&mut self, channel: i32, pitch: i32, value: i32) -> Result<()> {
        self.send(Outbound::PolyAftertouch {
            channel: Channel::new(channel).to_engine(),
            pitch,
            value,
        })
    }

    pub fn send_midi_byte(&mut self, port: i32, byte: i32) -> Result<()> {
        self.send(Outbound::MidiByte { port, byte })
    }
}

/// Resolved delivery for one inbound event
pub struct Route<'e> {
    event: &'e PdEvent,
    receivers: Vec<Arc<dyn Receiver>>,
    midi_receivers: Vec<Arc<dyn MidiReceiver>>,
}

impl Route<'_> {
    /// Number of callbacks `deliver` will make
    pub fn len(&self) -> usize {
        self.receivers.len() + self.midi_receivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run the callbacks, presenting 1-based channels and programs
    pub fn deliver(self) -> usize {
        let count = self.len();

        match self.event {
            PdEvent::Print { text } => {
                for r in &self.receivers {
                    r.on_print(text);
                }
            }
            PdEvent::Bang { dest } => {
                for r in &self.receivers {
                    r.on_bang(dest);
                }
            }
            PdEvent::Float { dest, value } => {
                for r in &self.receivers {
                    r.on_float(dest, *value);
                }
            }
            PdEvent::Symbol { dest, symbol } => {
                for r in &self.receivers {
                    r.on_symbol(dest, symbol);
                }
            }
            PdEvent::List { dest, list } => {
                for r in &self.receivers {
                    r.on_list(dest, list);
                }
            }
            PdEvent::Message { dest, msg, list } => {
                for r in &self.receivers {
                    r.on_message(dest, msg, list);
                }
            }
            PdEvent::NoteOn {
                channel,
                pitch,
                velocity,
            } => {
                let channel = Channel::from_engine(*channel).number();
                for r in &self.midi_receivers {
                    r.on_note_on(channel, *pitch, *velocity);
                }
            }
            PdEvent::ControlChange {
                channel,
                controller,
                value,
            } => {
                let channel = Channel::from_engine(*channel).number();
                for r in &self.midi_receivers {
                    r.on_control_change(channel, *controller, *value);
                }
            }
            PdEvent::ProgramChange { channel, value } => {
                let channel = Channel::from_engine(*channel).number();
                let program = program_from_engine(*value);
                for r in &self.midi_receivers {
                    r.on_program_change(channel, program);
                }
            }
            PdEvent::PitchBend { channel, value } => {
                let channel = Channel::from_engine(*channel).number();
                for r in &self.midi_receivers {
                    r.on_pitch_bend(channel, *value);
                }
            }
            PdEvent::Aftertouch { channel, value } => {
                let channel = Channel::from_engine(*channel).number();
                for r in &self.midi_receivers {
                    r.on_aftertouch(channel, *value);
                }
            }
            PdEvent::PolyAftertouch {
                channel,
                pitch,
                value,
            } => {
                let channel = Channel::from_engine(*channel).number();
                for r in &self.midi_receivers {
                    r.on_poly_aftertouch(channel, *pitch, *value);
                }
            }
            PdEvent::MidiByte { port, byte } => {
                for r in &self.midi_receivers {
                    r.on_midi_byte(*port, *byte);
                }
            }
        }

        count
    }
}
