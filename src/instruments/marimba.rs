// Copyright (c) 2024 Mike Tsao. All rights reserved.

use super::{accepts_key, handle_bend_key, HasKeyState, KeyBank, KeyState};
use crate::{
    attributes::{parse_bool, AttributeError},
    events::{EventSink, NoteSource},
    input::{KeyInput, PhysicalKey, PointerInput},
    keymap::KeyMap,
    midi::is_black,
    traits::{HasAttributes, Instrument},
    types::{Note, Velocity, DEFAULT_VELOCITY},
};

/// Which row of the instrument a bar sits in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MarimbaRow {
    /// The naturals, nearest the player.
    Naturals,
    /// The accidentals, in their own row behind the naturals.
    Accidentals,
}

/// One bar of a [Marimba].
#[derive(Clone, Debug, PartialEq)]
pub struct MarimbaBar {
    state: KeyState,
    key_hint: Option<char>,
}
impl HasKeyState for MarimbaBar {
    fn key_state(&self) -> &KeyState {
        &self.state
    }

    fn key_state_mut(&mut self) -> &mut KeyState {
        &mut self.state
    }
}
impl MarimbaBar {
    #[allow(missing_docs)]
    pub fn note(&self) -> Note {
        self.state.note()
    }
    #[allow(missing_docs)]
    pub fn is_pressed(&self) -> bool {
        self.state.is_pressed()
    }
    #[allow(missing_docs)]
    pub fn state(&self) -> &KeyState {
        &self.state
    }
    #[allow(missing_docs)]
    pub fn key_hint(&self) -> Option<char> {
        self.key_hint
    }
    #[allow(missing_docs)]
    pub fn row(&self) -> MarimbaRow {
        if is_black(self.note()) {
            MarimbaRow::Accidentals
        } else {
            MarimbaRow::Naturals
        }
    }

    /// Position along the row, in bar widths. Accidentals sit halfway between
    /// their neighboring naturals, so the accidental row has gaps after E and B.
    pub fn column(&self) -> f32 {
        let naturals_below = (Marimba::MIN_NOTE..self.note())
            .filter(|n| !is_black(*n))
            .count() as f32;
        match self.row() {
            MarimbaRow::Naturals => naturals_below,
            MarimbaRow::Accidentals => naturals_below - 0.5,
        }
    }

    /// Relative bar length: 1.0 for the lowest bar, shrinking toward 0.6 for
    /// the highest.
    pub fn length(&self) -> f32 {
        let span = (Marimba::MAX_NOTE - Marimba::MIN_NOTE) as f32;
        1.0 - 0.4 * (self.note() - Marimba::MIN_NOTE) as f32 / span
    }
}

/// A marimba with a fixed range of two and a half octaves. Unlike [Piano],
/// there's no movable window; the physical keys always play the bottom of the
/// range.
///
/// [Piano]: super::Piano
#[derive(Debug)]
pub struct Marimba {
    armed: bool,
    bars: KeyBank<MarimbaBar>,
    sink: EventSink,
}
impl Default for Marimba {
    fn default() -> Self {
        let keymap = KeyMap::piano();
        let bars = (Self::MIN_NOTE..=Self::MAX_NOTE)
            .map(|note| MarimbaBar {
                state: KeyState::new(note),
                key_hint: keymap.key_at((note - Self::MIN_NOTE) as usize),
            })
            .collect();
        Self {
            armed: false,
            bars: KeyBank::new(bars),
            sink: Default::default(),
        }
    }
}
impl Marimba {
    /// The lowest bar (C3).
    pub const MIN_NOTE: Note = 48;
    /// The highest bar (F5).
    pub const MAX_NOTE: Note = 77;

    /// All bars, lowest first.
    pub fn bars(&self) -> &[MarimbaBar] {
        self.bars.units()
    }

    /// Bars in one row, lowest first.
    pub fn row(&self, row: MarimbaRow) -> impl Iterator<Item = &MarimbaBar> {
        self.bars().iter().filter(move |b| b.row() == row)
    }

    /// Number of natural bars, which sets the instrument's width.
    pub fn natural_count(&self) -> usize {
        self.row(MarimbaRow::Naturals).count()
    }

    #[allow(missing_docs)]
    pub fn bar(&self, note: Note) -> Option<&MarimbaBar> {
        self.bars.find(note)
    }

    #[allow(missing_docs)]
    pub fn shows_key_hints(&self) -> bool {
        self.armed
    }

    fn note_for_key(&self, key: &PhysicalKey) -> Option<Note> {
        let offset = KeyMap::piano().offset_of_key(key)?;
        let note = Self::MIN_NOTE as usize + offset;
        (note <= Self::MAX_NOTE as usize).then_some(note as Note)
    }
}
impl Instrument for Marimba {
    fn attach(&mut self, sink: EventSink) {
        self.sink = sink;
    }

    fn is_armed(&self) -> bool {
        self.armed
    }

    fn arm_keyboard(&mut self) {
        self.armed = true;
    }

    fn disarm_keyboard(&mut self) {
        self.bars
            .force_release(Some(NoteSource::Keyboard), &self.sink);
        self.armed = false;
    }

    fn note_on(&mut self, note: Note, velocity: Velocity) {
        self.bars.note_on(note, velocity);
    }

    fn note_off(&mut self, note: Note) {
        self.bars.note_off(note);
    }

    fn is_note_on(&self, note: Note) -> bool {
        self.bars.is_note_on(note)
    }

    fn all_notes_off(&mut self) {
        self.bars.all_notes_off();
    }

    fn auto_release(&mut self) {
        self.bars.force_release(None, &self.sink);
    }

    fn handle_key(&mut self, input: &KeyInput) {
        if !accepts_key(self.armed, input) || handle_bend_key(input, &self.sink) {
            return;
        }
        if let Some(note) = self.note_for_key(&input.key) {
            if input.pressed {
                self.bars
                    .press(note, DEFAULT_VELOCITY, NoteSource::Keyboard, &self.sink);
            } else {
                self.bars.release(note, NoteSource::Keyboard, &self.sink);
            }
        }
    }

    fn handle_pointer(&mut self, input: &PointerInput) {
        self.bars.handle_pointer(input, &self.sink);
    }

    fn notes(&self) -> Vec<Note> {
        self.bars.notes()
    }

    fn set_patch(&mut self, _patch: &serde_json::Value) {
        log::debug!("marimba has no patchable settings");
    }
}
impl HasAttributes for Marimba {
    fn try_set_attribute(&mut self, name: &str, value: &str) -> Result<(), AttributeError> {
        match name {
            "armed" => {
                if parse_bool(value) {
                    self.arm_keyboard();
                } else {
                    self.disarm_keyboard();
                }
                Ok(())
            }
            _ => Err(AttributeError::Unknown),
        }
    }

    fn remove_attribute(&mut self, name: &str) {
        if name == "armed" {
            self.disarm_keyboard();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        events::{EventBus, NoteEvent, WidgetEvent},
        midi::step,
        uid::Uid,
    };
    use float_cmp::approx_eq;

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
    fn fixed_range() {
        let marimba = Marimba::default();
        assert_eq!(marimba.notes(), (48..=77).collect::<Vec<Note>>());
        assert_eq!(marimba.natural_count(), 18);
        assert_eq!(marimba.row(MarimbaRow::Accidentals).count(), 12);
    }

    #[test]
    fn static_keymap() {
        let bus = EventBus::default();
        let mut marimba = Marimba::default();
        marimba.attach(bus.sink(Uid(2)));
        marimba.arm_keyboard();

        marimba.handle_key(&KeyInput::down('a'));
        marimba.handle_key(&KeyInput::down(']'));
        marimba.handle_key(&KeyInput::up('a'));
        marimba.handle_key(&KeyInput::down(PhysicalKey::ArrowRight));
        assert_eq!(
            note_events(&bus),
            vec![
                NoteEvent::note_on(48, DEFAULT_VELOCITY, NoteSource::Keyboard),
                NoteEvent::note_on(66, DEFAULT_VELOCITY, NoteSource::Keyboard),
                NoteEvent::note_off(48, NoteSource::Keyboard),
            ]
        );
        assert_eq!(marimba.bar(66).and_then(|b| b.key_hint()), Some(']'));
        assert_eq!(marimba.bar(67).and_then(|b| b.key_hint()), None);
    }

    #[test]
    fn pitch_bend() {
        let bus = EventBus::default();
        let mut marimba = Marimba::default();
        marimba.attach(bus.sink(Uid(2)));
        marimba.arm_keyboard();
        marimba.handle_key(&KeyInput::down(PhysicalKey::ArrowDown));
        marimba.handle_key(&KeyInput::up(PhysicalKey::ArrowDown));
        assert_eq!(
            note_events(&bus),
            vec![
                NoteEvent::pitch_bend(-200, NoteSource::Keyboard),
                NoteEvent::pitch_bend(0, NoteSource::Keyboard),
            ]
        );
    }

    #[test]
    fn out_of_range_is_a_no_op() {
        let mut marimba = Marimba::default();
        for note in [0, 47, 78, 127] {
            marimba.note_on(note, 90);
            assert!(!marimba.is_note_on(note));
            marimba.note_off(note);
        }
        marimba.note_on(60, 90);
        marimba.note_on(61, 90);
        marimba.all_notes_off();
        assert!(marimba.notes().iter().all(|n| !marimba.is_note_on(*n)));
    }

    #[test]
    fn layout() {
        let marimba = Marimba::default();
        let c = marimba.bar(48).unwrap();
        let c_sharp = marimba.bar(49).unwrap();
        let e = marimba.bar(52).unwrap();
        let f = marimba.bar(53).unwrap();
        let f_sharp = marimba.bar(54).unwrap();
        assert_eq!(c.row(), MarimbaRow::Naturals);
        assert_eq!(c_sharp.row(), MarimbaRow::Accidentals);
        assert!(approx_eq!(f32, c.column(), 0.0));
        assert!(approx_eq!(f32, c_sharp.column(), 0.5));
        assert!(approx_eq!(f32, e.column(), 2.0));
        assert!(approx_eq!(f32, f.column(), 3.0));
        assert!(
            approx_eq!(f32, f_sharp.column(), 3.5),
            "no accidental between E and F"
        );
        assert!(approx_eq!(f32, c.length(), 1.0));
        assert!(approx_eq!(f32, marimba.bar(77).unwrap().length(), 0.6));
        assert_eq!(step(f_sharp.note()), 6);
    }

    #[test]
    fn armed_attribute() {
        let mut marimba = Marimba::default();
        marimba.set_attribute("armed", "true");
        assert!(marimba.is_armed());
        assert!(marimba.shows_key_hints());
        marimba.set_attribute("armed", "false");
        assert!(!marimba.is_armed());
    }
}
