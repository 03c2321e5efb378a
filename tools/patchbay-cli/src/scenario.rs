//! Routing scenarios
//!
//! A scenario is a TOML document: sources to subscribe, listeners with
//! their subscriptions, and a sequence of engine events to replay.
//!
//! ```toml
//! subscribe = ["volume", "tempo"]
//!
//! [hub]
//! name = "demo"
//!
//! [[listeners]]
//! name = "mixer"
//! ignore = ["tempo"]
//!
//! [[events]]
//! kind = "float"
//! dest = "volume"
//! value = 0.5
//! ```

use anyhow::{Context, Result};
use parking_lot::Mutex;
use patchbay_core::{List, PdEvent};
use patchbay_router::{Hub, HubConfig, MidiReceiver, NullEngine, Receiver};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Default, Deserialize)]
pub struct Scenario {
    /// Sources subscribed before any listener is added
    #[serde(default)]
    pub subscribe: Vec<String>,
    #[serde(default)]
    pub hub: HubConfig,
    #[serde(default)]
    pub listeners: Vec<ListenerSpec>,
    #[serde(default)]
    pub events: Vec<PdEvent>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    #[default]
    Message,
    Midi,
}

#[derive(Debug, Deserialize)]
pub struct ListenerSpec {
    pub name: String,
    #[serde(default)]
    pub kind: Kind,
    /// Sources (message) to listen to after registration
    #[serde(default)]
    pub listen: Vec<String>,
    /// Sources (message) to ignore, applied after `listen`
    #[serde(default)]
    pub ignore: Vec<String>,
    /// 1-based channels (midi) to listen to
    #[serde(default)]
    pub channels: Vec<i32>,
    /// 1-based channels (midi) to ignore, applied after `channels`
    #[serde(default)]
    pub ignore_channels: Vec<i32>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing scenario {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

type Transcript = Arc<Mutex<Vec<String>>>;

/// Listener that writes one transcript line per callback
struct Printer {
    name: String,
    transcript: Transcript,
}

impl Printer {
    fn line(&self, text: String) {
        self.transcript.lock().push(format!("{} <- {}", self.name, text));
    }
}

impl Receiver for Printer {
    fn on_print(&self, text: &str) {
        self.line(format!("print {}", text));
    }

    fn on_bang(&self, source: &str) {
        self.line(format!("bang {}", source));
    }

    fn on_float(&self, source: &str, value: f32) {
        self.line(format!("float {} {}", source, value));
    }

    fn on_symbol(&self, source: &str, symbol: &str) {
        self.line(format!("symbol {} {}", source, symbol));
    }

    fn on_list(&self, source: &str, list: &List) {
        self.line(format!("list {} {}", source, list));
    }

    fn on_message(&self, source: &str, selector: &str, list: &List) {
        self.line(format!("message {} {} {}", source, selector, list));
    }
}

impl MidiReceiver for Printer {
    fn on_note_on(&self, channel: i32, pitch: i32, velocity: i32) {
        self.line(format!("note on {} {} {}", channel, pitch, velocity));
    }

    fn on_control_change(&self, channel: i32, controller: i32, value: i32) {
        self.line(format!("control change {} {} {}", channel, controller, value));
    }

    fn on_program_change(&self, channel: i32, program: i32) {
        self.line(format!("program change {} {}", channel, program));
    }

    fn on_pitch_bend(&self, channel: i32, value: i32) {
        self.line(format!("pitch bend {} {}", channel, value));
    }

    fn on_aftertouch(&self, channel: i32, value: i32) {
        self.line(format!("aftertouch {} {}", channel, value));
    }

    fn on_poly_aftertouch(&self, channel: i32, pitch: i32, value: i32) {
        self.line(format!("poly aftertouch {} {} {}", channel, pitch, value));
    }

    fn on_midi_byte(&self, port: i32, byte: i32) {
        self.line(format!("midi byte {} {}", port, byte));
    }
}

/// Replay a scenario and return the delivery transcript.
///
/// Routing conditions (duplicates, unknown keys) are logged by the hub and
/// do not stop the replay.
pub fn run(scenario: Scenario) -> Vec<String> {
    let transcript: Transcript = Arc::default();
    let mut hub = Hub::new(scenario.hub, NullEngine);

    for source in &scenario.subscribe {
        let _ = hub.subscribe(source);
    }

    // Keep the listeners alive for the whole replay
    let mut printers = Vec::new();
    for spec in &scenario.listeners {
        let printer = Arc::new(Printer {
            name: spec.name.clone(),
            transcript: Arc::clone(&transcript),
        });

        match spec.kind {
            Kind::Message => {
                let Ok(id) = hub.add_receiver(printer.clone()) else {
                    continue;
                };
                for source in &spec.listen {
                    let _ = hub.receive_source(id, source);
                }
                for source in &spec.ignore {
                    let _ = hub.ignore_source(id, source);
                }
            }
            Kind::Midi => {
                let Ok(id) = hub.add_midi_receiver(printer.clone()) else {
                    continue;
                };
                for channel in &spec.channels {
                    let _ = hub.receive_midi_channel(id, *channel);
                }
                for channel in &spec.ignore_channels {
                    let _ = hub.ignore_midi_channel(id, *channel);
                }
            }
        }
        debug!(listener = %spec.name, "listener ready");
        printers.push(printer);
    }

    for event in &scenario.events {
        let delivered = hub.on_raw_event(event);
        debug!(%event, delivered, "replayed");
    }
    info!(
        events = scenario.events.len(),
        deliveries = transcript.lock().len(),
        "scenario finished"
    );

    drop(printers);
    let lines = transcript.lock().clone();
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    const VOLUME_TEMPO: &str = r#"
subscribe = ["volume", "tempo"]

[hub]
name = "test"

[[listeners]]
name = "a"
ignore = ["volume"]

[[listeners]]
name = "keys"
kind = "midi"
channels = [2]

[[events]]
kind = "float"
dest = "volume"
value = 0.5

[[events]]
kind = "bang"
dest = "tempo"

[[events]]
kind = "note_on"
channel = 1
pitch = 60
velocity = 90

[[events]]
kind = "midi_byte"
port = 0
byte = 248
"#;

    #[test]
    fn test_parse_scenario() {
        let scenario = Scenario::parse(VOLUME_TEMPO).unwrap();
        assert_eq!(scenario.subscribe, vec!["volume", "tempo"]);
        assert_eq!(scenario.hub.name, "test");
        assert!(scenario.hub.listen_global_on_add);
        assert_eq!(scenario.listeners[1].kind, Kind::Midi);
        assert_eq!(scenario.events.len(), 4);
    }

    #[test]
    fn test_run_scenario() {
        let lines = run(Scenario::parse(VOLUME_TEMPO).unwrap());
        assert_eq!(
            lines,
            vec![
                "a <- bang tempo",
                "keys <- note on 2 60 90",
                "keys <- midi byte 0 248",
            ]
        );
    }

    #[test]
    fn test_empty_scenario() {
        assert!(run(Scenario::parse("").unwrap()).is_empty());
    }

    #[test]
    fn test_bad_event_kind_rejected() {
        let err = Scenario::parse("[[events]]\nkind = \"explode\"\n");
        assert!(err.is_err());
    }
}
