//! Common test helpers for Patchbay tests
//!
//! - Receivers that record every callback ([`RecordingReceiver`],
//!   [`RecordingMidiReceiver`])
//! - An engine that records every call ([`RecordingEngine`])
//! - Event constructors

use parking_lot::Mutex;
use patchbay_core::{List, ListenerKind, Outbound, PdEvent, Result, RoutingError};
use patchbay_router::{Engine, MidiReceiver, Receiver};
use std::sync::Arc;

// ============================================================================
// Recording Receivers
// ============================================================================

/// One callback seen by a [`RecordingReceiver`]
#[derive(Debug, Clone, PartialEq)]
pub enum Received {
    Print(String),
    Bang(String),
    Float(String, f32),
    Symbol(String, String),
    List(String, List),
    Message(String, String, List),
}

impl Received {
    pub fn source(&self) -> Option<&str> {
        match self {
            Received::Print(_) => None,
            Received::Bang(s)
            | Received::Float(s, _)
            | Received::Symbol(s, _)
            | Received::List(s, _)
            | Received::Message(s, _, _) => Some(s),
        }
    }
}

/// Receiver that keeps every callback in order
#[derive(Default)]
pub struct RecordingReceiver {
    received: Mutex<Vec<Received>>,
}

impl RecordingReceiver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn received(&self) -> Vec<Received> {
        self.received.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.received.lock().len()
    }

    /// Callbacks addressed to `source`
    pub fn from_source(&self, source: &str) -> Vec<Received> {
        self.received
            .lock()
            .iter()
            .filter(|r| r.source() == Some(source))
            .cloned()
            .collect()
    }

    pub fn take(&self) -> Vec<Received> {
        std::mem::take(&mut *self.received.lock())
    }

    fn push(&self, r: Received) {
        self.received.lock().push(r);
    }
}

impl Receiver for RecordingReceiver {
    fn on_print(&self, text: &str) {
        self.push(Received::Print(text.to_string()));
    }

    fn on_bang(&self, source: &str) {
        self.push(Received::Bang(source.to_string()));
    }

    fn on_float(&self, source: &str, value: f32) {
        self.push(Received::Float(source.to_string(), value));
    }

    fn on_symbol(&self, source: &str, symbol: &str) {
        self.push(Received::Symbol(source.to_string(), symbol.to_string()));
    }

    fn on_list(&self, source: &str, list: &List) {
        self.push(Received::List(source.to_string(), list.clone()));
    }

    fn on_message(&self, source: &str, selector: &str, list: &List) {
        self.push(Received::Message(
            source.to_string(),
            selector.to_string(),
            list.clone(),
        ));
    }
}

/// One callback seen by a [`RecordingMidiReceiver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiReceived {
    NoteOn(i32, i32, i32),
    ControlChange(i32, i32, i32),
    ProgramChange(i32, i32),
    PitchBend(i32, i32),
    Aftertouch(i32, i32),
    PolyAftertouch(i32, i32, i32),
    MidiByte(i32, i32),
}

#[derive(Default)]
pub struct RecordingMidiReceiver {
    received: Mutex<Vec<MidiReceived>>,
}

impl RecordingMidiReceiver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn received(&self) -> Vec<MidiReceived> {
        self.received.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.received.lock().len()
    }

    pub fn take(&self) -> Vec<MidiReceived> {
        std::mem::take(&mut *self.received.lock())
    }

    fn push(&self, r: MidiReceived) {
        self.received.lock().push(r);
    }
}

impl MidiReceiver for RecordingMidiReceiver {
    fn on_note_on(&self, channel: i32, pitch: i32, velocity: i32) {
        self.push(MidiReceived::NoteOn(channel, pitch, velocity));
    }

    fn on_control_change(&self, channel: i32, controller: i32, value: i32) {
        self.push(MidiReceived::ControlChange(channel, controller, value));
    }

    fn on_program_change(&self, channel: i32, program: i32) {
        self.push(MidiReceived::ProgramChange(channel, program));
    }

    fn on_pitch_bend(&self, channel: i32, value: i32) {
        self.push(MidiReceived::PitchBend(channel, value));
    }

    fn on_aftertouch(&self, channel: i32, value: i32) {
        self.push(MidiReceived::Aftertouch(channel, value));
    }

    fn on_poly_aftertouch(&self, channel: i32, pitch: i32, value: i32) {
        self.push(MidiReceived::PolyAftertouch(channel, pitch, value));
    }

    fn on_midi_byte(&self, port: i32, byte: i32) {
        self.push(MidiReceived::MidiByte(port, byte));
    }
}

// ============================================================================
// Recording Engine
// ============================================================================

/// One call made by the hub into the engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    SetReceiving(ListenerKind, bool),
    Subscribe(String),
    Unsubscribe(String),
    UnsubscribeAll,
    Send(Outbound),
}

/// Engine that records every call; the log is shared so it stays readable
/// after the engine moves into a hub
#[derive(Clone, Default)]
pub struct RecordingEngine {
    calls: Arc<Mutex<Vec<EngineCall>>>,
    fail_sends: bool,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine whose sends all fail, to exercise the fatal path
    pub fn failing() -> Self {
        Self {
            calls: Arc::default(),
            fail_sends: true,
        }
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().clone()
    }

    pub fn sent(&self) -> Vec<Outbound> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                EngineCall::Send(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

impl Engine for RecordingEngine {
    fn set_receiving(&mut self, kind: ListenerKind, enabled: bool) {
        self.calls.lock().push(EngineCall::SetReceiving(kind, enabled));
    }

    fn subscribe(&mut self, source: &str) {
        self.calls
            .lock()
            .push(EngineCall::Subscribe(source.to_string()));
    }

    fn unsubscribe(&mut self, source: &str) {
        self.calls
            .lock()
            .push(EngineCall::Unsubscribe(source.to_string()));
    }

    fn unsubscribe_all(&mut self) {
        self.calls.lock().push(EngineCall::UnsubscribeAll);
    }

    fn send(&mut self, message: Outbound) -> Result<()> {
        if self.fail_sends {
            return Err(RoutingError::Engine("engine unavailable".to_string()));
        }
        self.calls.lock().push(EngineCall::Send(message));
        Ok(())
    }
}

// ============================================================================
// Event Constructors
// ============================================================================

pub fn bang(dest: &str) -> PdEvent {
    PdEvent::Bang {
        dest: dest.to_string(),
    }
}

pub fn float(dest: &str, value: f32) -> PdEvent {
    PdEvent::Float {
        dest: dest.to_string(),
        value,
    }
}

pub fn symbol(dest: &str, symbol: &str) -> PdEvent {
    PdEvent::Symbol {
        dest: dest.to_string(),
        symbol: symbol.to_string(),
    }
}

pub fn print(text: &str) -> PdEvent {
    PdEvent::Print {
        text: text.to_string(),
    }
}

/// Note on with an engine (0-based) channel
pub fn note_on(channel: i32, pitch: i32, velocity: i32) -> PdEvent {
    PdEvent::NoteOn {
        channel,
        pitch,
        velocity,
    }
}

pub fn midi_byte(port: i32, byte: i32) -> PdEvent {
    PdEvent::MidiByte { port, byte }
}
