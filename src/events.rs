// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! Everything a widget tells its host travels as an [Emitted] on an
//! [EventBus]. A single receiver sees the events of every widget attached to
//! the bus.

use crate::{
    midi::{new_note_off, new_note_on, new_pitch_bend, MidiMessage},
    types::{Note, Velocity},
    uid::Uid,
};
use crossbeam_channel::{Receiver, Sender};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Recommended imports for easy onboarding.
pub mod prelude {
    pub use super::{
        CircleEvent, DialEvent, Emitted, EventBus, EventSink, NoteEvent, NoteSource, WidgetEvent,
    };
}

/// Where a note event came from.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NoteSource {
    /// Mouse, pen, or touch.
    Pointer,
    /// The physical computer keyboard.
    Keyboard,
    /// Synthesized by the widget itself, for example when a range change
    /// forces a held key to release.
    System,
}

/// Events emitted by the playable instruments.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum NoteEvent {
    #[allow(missing_docs)]
    NoteOn {
        note: Note,
        velocity: Velocity,
        source: NoteSource,
    },
    /// `velocity` is always zero.
    NoteOff {
        note: Note,
        velocity: Velocity,
        source: NoteSource,
    },
    /// `value` is in cents.
    PitchBend { value: i32, source: NoteSource },
}
impl NoteEvent {
    #[allow(missing_docs)]
    pub fn note_on(note: Note, velocity: Velocity, source: NoteSource) -> Self {
        Self::NoteOn {
            note,
            velocity,
            source,
        }
    }

    #[allow(missing_docs)]
    pub fn note_off(note: Note, source: NoteSource) -> Self {
        Self::NoteOff {
            note,
            velocity: 0,
            source,
        }
    }

    #[allow(missing_docs)]
    pub fn pitch_bend(value: i32, source: NoteSource) -> Self {
        Self::PitchBend { value, source }
    }

    /// The origin of this event.
    pub fn source(&self) -> NoteSource {
        match self {
            NoteEvent::NoteOn { source, .. }
            | NoteEvent::NoteOff { source, .. }
            | NoteEvent::PitchBend { source, .. } => *source,
        }
    }

    /// The equivalent MIDI message, for hosts that drive a MIDI synth.
    pub fn to_midi_message(&self) -> MidiMessage {
        match *self {
            NoteEvent::NoteOn { note, velocity, .. } => new_note_on(note, velocity),
            NoteEvent::NoteOff { note, velocity, .. } => new_note_off(note, velocity),
            NoteEvent::PitchBend { value, .. } => new_pitch_bend(value),
        }
    }
}

/// Events emitted by a [Dial](crate::dial::Dial).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DialEvent {
    /// Sent continuously while the user drags.
    Adjusted { value: f64 },
    /// Sent once when the drag ends.
    Changed { value: f64 },
}

/// Events emitted by a
/// [CircleOfFifths](crate::circle_of_fifths::CircleOfFifths).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CircleEvent {
    #[allow(missing_docs)]
    Selected { key: String },
}

/// Anything a widget can emit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WidgetEvent {
    #[allow(missing_docs)]
    Note(NoteEvent),
    #[allow(missing_docs)]
    Dial(DialEvent),
    #[allow(missing_docs)]
    Circle(CircleEvent),
}
impl From<NoteEvent> for WidgetEvent {
    fn from(value: NoteEvent) -> Self {
        Self::Note(value)
    }
}
impl From<DialEvent> for WidgetEvent {
    fn from(value: DialEvent) -> Self {
        Self::Dial(value)
    }
}
impl From<CircleEvent> for WidgetEvent {
    fn from(value: CircleEvent) -> Self {
        Self::Circle(value)
    }
}

/// A [WidgetEvent] tagged with the emitting widget.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Emitted {
    #[allow(missing_docs)]
    pub uid: Uid,
    #[allow(missing_docs)]
    pub event: WidgetEvent,
}

/// Both halves of the channel that widgets emit into. Hand each widget an
/// [EventSink] from [EventBus::sink()], and drain [EventBus::receiver()] once
/// per UI frame.
#[derive(Debug)]
pub struct EventBus {
    sender: Sender<Emitted>,
    receiver: Receiver<Emitted>,
}
impl Default for EventBus {
    fn default() -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self { sender, receiver }
    }
}
impl EventBus {
    /// Returns a sink that tags everything it sends with `uid`.
    pub fn sink(&self, uid: Uid) -> EventSink {
        EventSink {
            uid,
            sender: Some(self.sender.clone()),
        }
    }

    #[allow(missing_docs)]
    pub fn receiver(&self) -> &Receiver<Emitted> {
        &self.receiver
    }

    /// Removes and returns everything currently queued.
    pub fn drain(&self) -> Vec<Emitted> {
        self.receiver.try_iter().collect()
    }
}

/// The sending half that a widget holds. A default [EventSink] is detached and
/// silently discards what it's given, which is what a widget that hasn't been
/// mounted anywhere should do.
#[derive(Clone, Debug, Default)]
pub struct EventSink {
    uid: Uid,
    sender: Option<Sender<Emitted>>,
}
impl EventSink {
    /// The [Uid] stamped on outgoing events.
    pub fn uid(&self) -> Uid {
        self.uid
    }

    /// Whether this sink is connected to a bus.
    pub fn is_attached(&self) -> bool {
        self.sender.is_some()
    }

    /// Sends an event. A bus whose receiver has gone away is not an error.
    pub fn emit(&self, event: impl Into<WidgetEvent>) {
        let event = event.into();
        log::trace!("{} emits {:?}", self.uid, event);
        if let Some(sender) = &self.sender {
            if sender
                .send(Emitted {
                    uid: self.uid,
                    event,
                })
                .is_err()
            {
                log::trace!("{}: event bus has no receiver; dropping event", self.uid);
            }
        }
    }
}
