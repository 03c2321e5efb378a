//! Engine events and commands
//!
//! Both directions use engine numbering: MIDI channels and programs are
//! 0-based here. Conversion to the listener-facing numbers happens when
//! an event is delivered (see [`crate::channel`]).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::channel::{program_from_engine, Channel};
use crate::List;

/// Event kinds produced by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Print,
    Bang,
    Float,
    Symbol,
    List,
    Message,
    NoteOn,
    ControlChange,
    ProgramChange,
    PitchBend,
    Aftertouch,
    PolyAftertouch,
    MidiByte,
}

impl EventKind {
    /// Events routed by MIDI channel rather than by source name
    pub fn is_midi(&self) -> bool {
        matches!(
            self,
            EventKind::NoteOn
                | EventKind::ControlChange
                | EventKind::ProgramChange
                | EventKind::PitchBend
                | EventKind::Aftertouch
                | EventKind::PolyAftertouch
                | EventKind::MidiByte
        )
    }

    /// Events delivered to every listener of their kind, ignoring buckets
    pub fn is_broadcast(&self) -> bool {
        matches!(self, EventKind::Print | EventKind::MidiByte)
    }
}

/// Inbound event raised by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PdEvent {
    Print {
        text: String,
    },
    Bang {
        dest: String,
    },
    Float {
        dest: String,
        value: f32,
    },
    Symbol {
        dest: String,
        symbol: String,
    },
    List {
        dest: String,
        #[serde(default)]
        list: List,
    },
    Message {
        dest: String,
        msg: String,
        #[serde(default)]
        list: List,
    },
    NoteOn {
        channel: i32,
        pitch: i32,
        velocity: i32,
    },
    ControlChange {
        channel: i32,
        controller: i32,
        value: i32,
    },
    ProgramChange {
        channel: i32,
        value: i32,
    },
    PitchBend {
        channel: i32,
        value: i32,
    },
    Aftertouch {
        channel: i32,
        value: i32,
    },
    PolyAftertouch {
        channel: i32,
        pitch: i32,
        value: i32,
    },
    MidiByte {
        port: i32,
        byte: i32,
    },
}

impl PdEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            PdEvent::Print { .. } => EventKind::Print,
            PdEvent::Bang { .. } => EventKind::Bang,
            PdEvent::Float { .. } => EventKind::Float,
            PdEvent::Symbol { .. } => EventKind::Symbol,
            PdEvent::List { .. } => EventKind::List,
            PdEvent::Message { .. } => EventKind::Message,
            PdEvent::NoteOn { .. } => EventKind::NoteOn,
            PdEvent::ControlChange { .. } => EventKind::ControlChange,
            PdEvent::ProgramChange { .. } => EventKind::ProgramChange,
            PdEvent::PitchBend { .. } => EventKind::PitchBend,
            PdEvent::Aftertouch { .. } => EventKind::Aftertouch,
            PdEvent::PolyAftertouch { .. } => EventKind::PolyAftertouch,
            PdEvent::MidiByte { .. } => EventKind::MidiByte,
        }
    }

    /// Source name for message events
    pub fn dest(&self) -> Option<&str> {
        match self {
            PdEvent::Bang { dest }
            | PdEvent::Float { dest, .. }
            | PdEvent::Symbol { dest, .. }
            | PdEvent::List { dest, .. }
            | PdEvent::Message { dest, .. } => Some(dest),
            _ => None,
        }
    }

    /// Raw 0-based channel for channel voice events
    pub fn channel(&self) -> Option<i32> {
        match self {
            PdEvent::NoteOn { channel, .. }
            | PdEvent::ControlChange { channel, .. }
            | PdEvent::ProgramChange { channel, .. }
            | PdEvent::PitchBend { channel, .. }
            | PdEvent::Aftertouch { channel, .. }
            | PdEvent::PolyAftertouch { channel, .. } => Some(*channel),
            _ => None,
        }
    }
}

impl fmt::Display for PdEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ch = |raw: &i32| Channel::from_engine(*raw).number();
        match self {
            PdEvent::Print { text } => write!(f, "print: {}", text),
            PdEvent::Bang { dest } => write!(f, "bang: {}", dest),
            PdEvent::Float { dest, value } => write!(f, "float: {} {}", dest, value),
            PdEvent::Symbol { dest, symbol } => write!(f, "symbol: {} {}", dest, symbol),
            PdEvent::List { dest, list } => write!(f, "list: {} {}", dest, list),
            PdEvent::Message { dest, msg, list } => {
                write!(f, "message: {} {} {}", dest, msg, list)
            }
            PdEvent::NoteOn {
                channel,
                pitch,
                velocity,
            } => write!(f, "note on: {} {} {}", ch(channel), pitch, velocity),
            PdEvent::ControlChange {
                channel,
                controller,
                value,
            } => write!(f, "control change: {} {} {}", ch(channel), controller, value),
            PdEvent::ProgramChange { channel, value } => {
                write!(f, "program change: {} {}", ch(channel), program_from_engine(*value))
            }
            PdEvent::PitchBend { channel, value } => {
                write!(f, "pitch bend: {} {}", ch(channel), value)
            }
            PdEvent::Aftertouch { channel, value } => {
                write!(f, "aftertouch: {} {}", ch(channel), value)
            }
            PdEvent::PolyAftertouch {
                channel,
                pitch,
                value,
            } => write!(f, "poly aftertouch: {} {} {}", ch(channel), pitch, value),
            PdEvent::MidiByte { port, byte } => write!(f, "midi byte: {} {}", port, byte),
        }
    }
}

/// Outbound command forwarded to the engine
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Bang {
        dest: String,
    },
    Float {
        dest: String,
        value: f32,
    },
    Symbol {
        dest: String,
        symbol: String,
    },
    List {
        dest: String,
        list: List,
    },
    Message {
        dest: String,
        msg: String,
        list: List,
    },
    NoteOn {
        channel: i32,
        pitch: i32,
        velocity: i32,
    },
    ControlChange {
        channel: i32,
        controller: i32,
        value: i32,
    },
    ProgramChange {
        channel: i32,
        program: i32,
    },
    PitchBend {
        channel: i32,
        value: i32,
    },
    Aftertouch {
        channel: i32,
        value: i32,
    },
    PolyAftertouch {
        channel: i32,
        pitch: i32,
        value: i32,
    },
    MidiByte {
        port: i32,
        byte: i32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let ev = PdEvent::MidiByte { port: 0, byte: 0xF8 };
        assert!(ev.kind().is_midi());
        assert!(ev.kind().is_broadcast());

        let ev = PdEvent::Float {
            dest: "volume".into(),
            value: 0.5,
        };
        assert!(!ev.kind().is_midi());
        assert_eq!(ev.dest(), Some("volume"));
        assert_eq!(ev.channel(), None);
    }

    #[test]
    fn test_display_presents_one_based() {
        let ev = PdEvent::ProgramChange {
            channel: 0,
            value: 4,
        };
        assert_eq!(ev.to_string(), "program change: 1 5");
    }

    #[test]
    fn test_display_extreme_numbers() {
        let ev = PdEvent::ProgramChange {
            channel: i32::MAX,
            value: i32::MAX,
        };
        assert_eq!(
            ev.to_string(),
            format!("program change: {} {}", i32::MAX, i32::MAX)
        );

        let ev = PdEvent::NoteOn {
            channel: i32::MIN,
            pitch: 60,
            velocity: 1,
        };
        assert_eq!(ev.to_string(), "note on: 0 60 1");
    }

    #[test]
    fn test_tagged_json() {
        let ev: PdEvent =
            serde_json::from_str(r#"{"kind":"note_on","channel":2,"pitch":60,"velocity":100}"#)
                .unwrap();
        assert_eq!(
            ev,
            PdEvent::NoteOn {
                channel: 2,
                pitch: 60,
                velocity: 100
            }
        );

        let ev: PdEvent = serde_json::from_str(r#"{"kind":"list","dest":"xy"}"#).unwrap();
        assert_eq!(ev.dest(), Some("xy"));
    }
}
