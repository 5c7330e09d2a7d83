// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! The playable widgets, and the press/release bookkeeping they share.

pub use drums::{DrumPad, DrumPadUnit};
pub use marimba::{Marimba, MarimbaBar, MarimbaRow};
pub use piano::{Piano, PianoKey, PianoPatch};

use crate::{
    attributes::AttributeError,
    events::{EventSink, NoteEvent, NoteSource},
    input::{KeyInput, PhysicalKey, PointerInput},
    traits::{HasAttributes, Instrument},
    types::{Note, Velocity, DEFAULT_VELOCITY},
};
use delegate::delegate;

mod drums;
mod marimba;
mod piano;

/// Recommended imports for easy onboarding.
pub mod prelude {
    pub use super::{AnyInstrument, DrumPad, KeyState, Marimba, Piano, PianoKey};
}

/// The amount, in cents, that ArrowUp/ArrowDown bend the pitch.
pub const PITCH_BEND_CENTS: i32 = 200;

/// Logical press state of one key, bar, or pad.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct KeyState {
    note: Note,
    pressed: bool,
    velocity: Velocity,
    held_by: Option<NoteSource>,
}
impl KeyState {
    #[allow(missing_docs)]
    pub fn new(note: Note) -> Self {
        Self {
            note,
            pressed: false,
            velocity: 0,
            held_by: None,
        }
    }

    /// The unit's identity. Never changes.
    pub fn note(&self) -> Note {
        self.note
    }

    /// Whether the unit is displayed as pressed.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// The velocity of the most recent press. Zero when released.
    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    /// Who is holding the unit down, if it was pressed by the user.
    pub fn held_by(&self) -> Option<NoteSource> {
        self.held_by
    }

    fn show_pressed(&mut self, velocity: Velocity) {
        self.pressed = true;
        self.velocity = velocity;
    }

    fn show_released(&mut self) {
        self.pressed = false;
        self.velocity = 0;
    }
}

/// Anything that wraps a [KeyState].
pub trait HasKeyState {
    #[allow(missing_docs)]
    fn key_state(&self) -> &KeyState;
    #[allow(missing_docs)]
    fn key_state_mut(&mut self) -> &mut KeyState;
}
impl HasKeyState for KeyState {
    fn key_state(&self) -> &KeyState {
        self
    }

    fn key_state_mut(&mut self) -> &mut KeyState {
        self
    }
}

/// An ordered collection of units, unique by note, plus the rules for pressing
/// and releasing them.
///
/// A user press marks the unit as held by its source and emits note-on, unless
/// it's already held. A user release emits note-off only if the same source
/// holds the unit, so a stray pointer-leave or key-up can't produce an
/// unmatched note-off.
#[derive(Debug)]
pub(crate) struct KeyBank<U: HasKeyState> {
    units: Vec<U>,
}
impl<U: HasKeyState> Default for KeyBank<U> {
    fn default() -> Self {
        Self {
            units: Default::default(),
        }
    }
}
impl<U: HasKeyState> KeyBank<U> {
    pub(crate) fn new(units: Vec<U>) -> Self {
        debug_assert!(
            units
                .windows(2)
                .all(|w| w[0].key_state().note() < w[1].key_state().note()),
            "units must be in ascending note order"
        );
        Self { units }
    }

    pub(crate) fn units(&self) -> &[U] {
        &self.units
    }

    pub(crate) fn units_mut(&mut self) -> &mut [U] {
        &mut self.units
    }

    pub(crate) fn find(&self, note: Note) -> Option<&U> {
        self.index_of(note).map(|i| &self.units[i])
    }

    pub(crate) fn find_mut(&mut self, note: Note) -> Option<&mut U> {
        self.index_of(note).map(|i| &mut self.units[i])
    }

    fn index_of(&self, note: Note) -> Option<usize> {
        self.units
            .binary_search_by_key(&note, |u| u.key_state().note())
            .ok()
    }

    pub(crate) fn notes(&self) -> Vec<Note> {
        self.units.iter().map(|u| u.key_state().note()).collect()
    }

    pub(crate) fn note_on(&mut self, note: Note, velocity: Velocity) {
        if let Some(unit) = self.find_mut(note) {
            unit.key_state_mut().show_pressed(velocity);
        }
    }

    pub(crate) fn note_off(&mut self, note: Note) {
        if let Some(unit) = self.find_mut(note) {
            unit.key_state_mut().show_released();
        }
    }

    pub(crate) fn is_note_on(&self, note: Note) -> bool {
        self.find(note)
            .is_some_and(|unit| unit.key_state().is_pressed())
    }

    pub(crate) fn all_notes_off(&mut self) {
        self.units
            .iter_mut()
            .for_each(|unit| unit.key_state_mut().show_released());
    }

    /// A user press. Returns true if an event was emitted.
    pub(crate) fn press(
        &mut self,
        note: Note,
        velocity: Velocity,
        source: NoteSource,
        sink: &EventSink,
    ) -> bool {
        let Some(unit) = self.find_mut(note) else {
            return false;
        };
        let state = unit.key_state_mut();
        if state.held_by.is_some() {
            return false;
        }
        state.held_by = Some(source);
        state.show_pressed(velocity);
        sink.emit(NoteEvent::note_on(note, velocity, source));
        true
    }

    /// A user release. Returns true if an event was emitted.
    pub(crate) fn release(&mut self, note: Note, source: NoteSource, sink: &EventSink) -> bool {
        let Some(unit) = self.find_mut(note) else {
            return false;
        };
        let state = unit.key_state_mut();
        if state.held_by != Some(source) {
            return false;
        }
        state.held_by = None;
        state.show_released();
        sink.emit(NoteEvent::note_off(note, source));
        true
    }

    /// Releases everything held by `holder` (or by anyone, if `None`), emitting
    /// a system note-off for each.
    pub(crate) fn force_release(&mut self, holder: Option<NoteSource>, sink: &EventSink) {
        for unit in self.units.iter_mut() {
            let state = unit.key_state_mut();
            let matches = match (state.held_by, holder) {
                (None, _) => false,
                (Some(_), None) => true,
                (Some(held_by), Some(holder)) => held_by == holder,
            };
            if matches {
                state.held_by = None;
                state.show_released();
                sink.emit(NoteEvent::note_off(state.note, NoteSource::System));
            }
        }
    }

    /// The pointer half of the state machine, identical for every instrument.
    pub(crate) fn handle_pointer(&mut self, input: &PointerInput, sink: &EventSink) {
        match *input {
            PointerInput::Down(note) => {
                self.press(note, DEFAULT_VELOCITY, NoteSource::Pointer, sink);
            }
            PointerInput::Up(note) | PointerInput::Leave(note) => {
                self.release(note, NoteSource::Pointer, sink);
            }
            PointerInput::Enter { note, button_held } => {
                if button_held {
                    self.press(note, DEFAULT_VELOCITY, NoteSource::Pointer, sink);
                }
            }
        }
    }
}

/// Whether an armed instrument should act on this key event. Key-downs with
/// modifiers or from auto-repeat are ignored; key-ups always pass, so that a
/// held key can't get stuck.
pub(crate) fn accepts_key(armed: bool, input: &KeyInput) -> bool {
    armed && (!input.pressed || !(input.repeat || input.modifiers.any()))
}

/// ArrowUp/ArrowDown pitch bend. Returns true if the key was a bend key.
pub(crate) fn handle_bend_key(input: &KeyInput, sink: &EventSink) -> bool {
    let direction = match input.key {
        PhysicalKey::ArrowUp => 1,
        PhysicalKey::ArrowDown => -1,
        _ => return false,
    };
    let value = if input.pressed {
        direction * PITCH_BEND_CENTS
    } else {
        0
    };
    sink.emit(NoteEvent::pitch_bend(value, NoteSource::Keyboard));
    true
}

/// One of the built-in instruments. Lets a host keep a heterogeneous collection
/// without boxing.
#[derive(Debug)]
pub enum AnyInstrument {
    #[allow(missing_docs)]
    Piano(Piano),
    #[allow(missing_docs)]
    Marimba(Marimba),
    #[allow(missing_docs)]
    DrumPad(DrumPad),
}
impl Instrument for AnyInstrument {
    delegate! {
        to match self {
            AnyInstrument::Piano(i) => i,
            AnyInstrument::Marimba(i) => i,
            AnyInstrument::DrumPad(i) => i,
        } {
            fn attach(&mut self, sink: EventSink);
            fn is_armed(&self) -> bool;
            fn arm_keyboard(&mut self);
            fn disarm_keyboard(&mut self);
            fn note_on(&mut self, note: Note, velocity: Velocity);
            fn note_off(&mut self, note: Note);
            fn is_note_on(&self, note: Note) -> bool;
            fn all_notes_off(&mut self);
            fn auto_release(&mut self);
            fn handle_key(&mut self, input: &KeyInput);
            fn handle_pointer(&mut self, input: &PointerInput);
            fn notes(&self) -> Vec<Note>;
            fn set_patch(&mut self, patch: &serde_json::Value);
        }
    }
}
impl HasAttributes for AnyInstrument {
    delegate! {
        to match self {
            AnyInstrument::Piano(i) => i,
            AnyInstrument::Marimba(i) => i,
            AnyInstrument::DrumPad(i) => i,
        } {
            fn try_set_attribute(&mut self, name: &str, value: &str) -> Result<(), AttributeError>;
            fn remove_attribute(&mut self, name: &str);
        }
    }
}
impl AnyInstrument {
    /// A short, stable name for logs and settings.
    pub fn kind(&self) -> &'static str {
        match self {
            AnyInstrument::Piano(_) => "piano",
            AnyInstrument::Marimba(_) => "marimba",
            AnyInstrument::DrumPad(_) => "drums",
        }
    }
}
impl From<Piano> for AnyInstrument {
    fn from(value: Piano) -> Self {
        Self::Piano(value)
    }
}
impl From<Marimba> for AnyInstrument {
    fn from(value: Marimba) -> Self {
        Self::Marimba(value)
    }
}
impl From<DrumPad> for AnyInstrument {
    fn from(value: DrumPad) -> Self {
        Self::DrumPad(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        events::{EventBus, WidgetEvent},
        input::Modifiers,
        uid::Uid,
    };

    fn note_events(bus: &EventBus) -> Vec<NoteEvent> {
        bus.drain()
            .into_iter()
            .filter_map(|e| match e.event {
                WidgetEvent::Note(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn press_and_release_are_guarded() {
        let bus = EventBus::default();
        let sink = bus.sink(Uid(1));
        let mut bank = KeyBank::new((60..=64).map(KeyState::new).collect());

        assert!(bank.press(60, 90, NoteSource::Pointer, &sink));
        assert!(
            !bank.press(60, 90, NoteSource::Keyboard, &sink),
            "already held"
        );
        assert!(
            !bank.release(60, NoteSource::Keyboard, &sink),
            "held by someone else"
        );
        assert!(bank.release(60, NoteSource::Pointer, &sink));
        assert!(!bank.release(60, NoteSource::Pointer, &sink), "not held");
        assert!(!bank.press(99, 90, NoteSource::Pointer, &sink), "unknown");

        assert_eq!(
            note_events(&bus),
            vec![
                NoteEvent::note_on(60, 90, NoteSource::Pointer),
                NoteEvent::note_off(60, NoteSource::Pointer)
            ]
        );
    }

    #[test]
    fn host_release_keeps_user_hold() {
        let bus = EventBus::default();
        let sink = bus.sink(Uid(1));
        let mut bank = KeyBank::new((60..=64).map(KeyState::new).collect());

        bank.press(61, 90, NoteSource::Keyboard, &sink);
        bank.all_notes_off();
        assert!(!bank.is_note_on(61));
        assert!(
            bank.release(61, NoteSource::Keyboard, &sink),
            "the physical key-up still pairs with the earlier note-on"
        );
    }

    #[test]
    fn forced_release_filters_by_holder() {
        let bus = EventBus::default();
        let sink = bus.sink(Uid(1));
        let mut bank = KeyBank::new((60..=64).map(KeyState::new).collect());
        bank.press(60, 90, NoteSource::Keyboard, &sink);
        bank.press(62, 90, NoteSource::Pointer, &sink);
        bank.note_on(64, 90);
        let _ = bus.drain();

        bank.force_release(Some(NoteSource::Keyboard), &sink);
        assert_eq!(
            note_events(&bus),
            vec![NoteEvent::note_off(60, NoteSource::System)]
        );
        bank.force_release(None, &sink);
        assert_eq!(
            note_events(&bus),
            vec![NoteEvent::note_off(62, NoteSource::System)]
        );
        assert!(bank.is_note_on(64), "host presses aren't user holds");
    }

    #[test]
    fn key_acceptance() {
        assert!(!accepts_key(false, &KeyInput::down('a')));
        assert!(accepts_key(true, &KeyInput::down('a')));
        assert!(!accepts_key(true, &KeyInput::down('a').repeated()));
        let ctrl = Modifiers {
            ctrl: true,
            ..Default::default()
        };
        assert!(!accepts_key(true, &KeyInput::down('a').with_modifiers(ctrl)));
        assert!(accepts_key(true, &KeyInput::up('a').with_modifiers(ctrl)));
    }

    #[test]
    fn bend_keys() {
        let bus = EventBus::default();
        let sink = bus.sink(Uid(1));
        assert!(handle_bend_key(&KeyInput::down(PhysicalKey::ArrowUp), &sink));
        assert!(handle_bend_key(&KeyInput::down(PhysicalKey::ArrowDown), &sink));
        assert!(handle_bend_key(&KeyInput::up(PhysicalKey::ArrowDown), &sink));
        assert!(!handle_bend_key(&KeyInput::down('a'), &sink));
        assert_eq!(
            note_events(&bus),
            vec![
                NoteEvent::pitch_bend(200, NoteSource::Keyboard),
                NoteEvent::pitch_bend(-200, NoteSource::Keyboard),
                NoteEvent::pitch_bend(0, NoteSource::Keyboard),
            ]
        );
    }
}
