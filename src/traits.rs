// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! Contains the traits that define the behavior shared by the widgets.

use crate::{
    attributes::AttributeError,
    events::EventSink,
    input::{KeyInput, PointerInput},
    types::{Note, Velocity},
};

/// Quick import of all important traits.
pub mod prelude {
    pub use super::{HasAttributes, HasSettings, Instrument};
}

/// The uniform surface of every playable widget, so that a host can mount a
/// piano, a marimba, or a drum pad interchangeably.
///
/// Host-driven calls ([Instrument::note_on()], [Instrument::note_off()],
/// [Instrument::all_notes_off()]) change only what's displayed and never emit
/// events. User-driven calls ([Instrument::handle_key()],
/// [Instrument::handle_pointer()]) emit note events on the attached
/// [EventSink].
pub trait Instrument: std::fmt::Debug {
    /// Connects the instrument to an event bus.
    fn attach(&mut self, sink: EventSink);

    /// Whether physical-keyboard input currently produces notes.
    fn is_armed(&self) -> bool;

    /// Routes physical-keyboard input to this instrument.
    fn arm_keyboard(&mut self);

    /// Stops routing physical-keyboard input to this instrument. Any unit still
    /// held down from the keyboard is released with a synthetic note-off,
    /// because its key-up will never arrive.
    fn disarm_keyboard(&mut self);

    /// Shows `note` as pressed. Does nothing if the note isn't in range.
    fn note_on(&mut self, note: Note, velocity: Velocity);

    /// Shows `note` as released. Does nothing if the note isn't in range.
    fn note_off(&mut self, note: Note);

    /// Whether `note` is displayed as pressed. False for notes out of range.
    fn is_note_on(&self, note: Note) -> bool;

    /// Displays every unit as released, without emitting anything. Use this to
    /// recover if the display gets out of sync with the host.
    fn all_notes_off(&mut self);

    /// Releases every unit the user is holding, emitting a note-off with
    /// [NoteSource::System](crate::events::NoteSource::System) for each.
    fn auto_release(&mut self);

    /// Handles a physical-keyboard transition. Ignored unless armed.
    fn handle_key(&mut self, input: &KeyInput);

    /// Handles a pointer transition on one of the instrument's units.
    fn handle_pointer(&mut self, input: &PointerInput);

    /// The notes of the instrument's current units, in display order.
    fn notes(&self) -> Vec<Note>;

    /// Accepts host-supplied configuration. Payloads of the wrong shape are
    /// ignored.
    fn set_patch(&mut self, patch: &serde_json::Value);
}

/// A declarative, string-typed configuration surface, modeled after HTML
/// attributes. Bad values are dropped rather than reported, so that a typo in
/// markup can't break a page.
pub trait HasAttributes {
    /// Applies one attribute, reporting what went wrong.
    fn try_set_attribute(&mut self, name: &str, value: &str) -> Result<(), AttributeError>;

    /// Removes an attribute. Boolean attributes become false; others keep their
    /// current values.
    fn remove_attribute(&mut self, name: &str);

    /// Applies one attribute, logging and discarding any error.
    fn set_attribute(&mut self, name: &str, value: &str) {
        if let Err(e) = self.try_set_attribute(name, value) {
            log::debug!("ignoring attribute {name}=\"{value}\": {e}");
        }
    }
}

/// Some structs have configuration information that should persist, but it's
/// not necessarily the responsibility of the struct itself to persist it.
/// Implementing [HasSettings] lets the owner know when to save.
pub trait HasSettings {
    /// Whether the current state of this struct has been saved to disk.
    fn has_been_saved(&self) -> bool;
    /// Call this whenever the struct changes.
    fn needs_save(&mut self);
    /// Call this after a load() or a save().
    fn mark_clean(&mut self);
}
