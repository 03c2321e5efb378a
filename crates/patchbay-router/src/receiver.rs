//! Listener capabilities
//!
//! Every callback has an empty default body so a listener only implements
//! the events it cares about. Callbacks run on the thread that dispatches
//! the event and must not block.

use patchbay_core::List;

/// Listener for source-addressed messages
pub trait Receiver: Send + Sync {
    /// Text printed by the engine; every receiver gets it
    fn on_print(&self, _text: &str) {}

    fn on_bang(&self, _source: &str) {}

    fn on_float(&self, _source: &str, _value: f32) {}

    fn on_symbol(&self, _source: &str, _symbol: &str) {}

    fn on_list(&self, _source: &str, _list: &List) {}

    /// A typed message: `selector` followed by its arguments
    fn on_message(&self, _source: &str, _selector: &str, _list: &List) {}
}

/// Listener for MIDI events.
///
/// Channels are 1-based and programs run 1-128.
pub trait MidiReceiver: Send + Sync {
    fn on_note_on(&self, _channel: i32, _pitch: i32, _velocity: i32) {}

    fn on_control_change(&self, _channel: i32, _controller: i32, _value: i32) {}

    fn on_program_change(&self, _channel: i32, _program: i32) {}

    fn on_pitch_bend(&self, _channel: i32, _value: i32) {}

    fn on_aftertouch(&self, _channel: i32, _value: i32) {}

    fn on_poly_aftertouch(&self, _channel: i32, _pitch: i32, _value: i32) {}

    /// Raw byte from a MIDI port; delivered to every MIDI receiver
    fn on_midi_byte(&self, _port: i32, _byte: i32) {}
}
