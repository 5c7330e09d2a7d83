// Copyright (c) 2024 Mike Tsao. All rights reserved.

use super::{accepts_key, handle_bend_key, HasKeyState, KeyBank, KeyState};
use crate::{
    attributes::{parse_bool, parse_int, AttributeError},
    events::{EventSink, NoteSource},
    input::{KeyInput, PhysicalKey, PointerInput},
    keymap::KeyMap,
    midi::{is_black, note_name, octave, octave_start, step},
    settings::PianoSettings,
    traits::{HasAttributes, Instrument},
    types::{Note, Velocity, DEFAULT_VELOCITY},
};
use serde::{Deserialize, Serialize};

/// One key of a [Piano].
#[derive(Clone, Debug, PartialEq)]
pub struct PianoKey {
    state: KeyState,
    key_hint: Option<char>,
}
impl HasKeyState for PianoKey {
    fn key_state(&self) -> &KeyState {
        &self.state
    }

    fn key_state_mut(&mut self) -> &mut KeyState {
        &mut self.state
    }
}
impl PianoKey {
    /// Horizontal position of each step within an octave, in white-key widths.
    /// White keys sit at whole numbers; black keys straddle the gaps, nudged
    /// the way they are on a real keyboard.
    pub const OFFSETS: [f32; 12] = [
        0.0, 0.6, 1.0, 1.75, 2.0, 3.0, 3.55, 4.0, 4.65, 5.0, 5.75, 6.0,
    ];

    fn new(note: Note) -> Self {
        Self {
            state: KeyState::new(note),
            key_hint: None,
        }
    }

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
    /// The physical key that currently plays this note, if any.
    pub fn key_hint(&self) -> Option<char> {
        self.key_hint
    }
    #[allow(missing_docs)]
    pub fn step(&self) -> u8 {
        step(self.note())
    }
    #[allow(missing_docs)]
    pub fn octave(&self) -> i8 {
        octave(self.note())
    }
    #[allow(missing_docs)]
    pub fn is_black(&self) -> bool {
        is_black(self.note())
    }

    /// Left edge of the key, given the octave at the left edge of the
    /// keyboard.
    pub fn x_position(&self, first_octave: i8, key_width: f32) -> f32 {
        let octave_index = (self.octave() - first_octave) as f32;
        (octave_index * 7.0 + Self::OFFSETS[self.step() as usize]) * key_width
    }

    /// The text to draw on the key, top to bottom.
    pub fn labels(&self, note_hints: bool, midi_hints: bool, key_hints: bool) -> Vec<String> {
        let mut labels = Vec::default();
        if key_hints {
            if let Some(hint) = self.key_hint {
                labels.push(hint.to_ascii_uppercase().to_string());
            }
        }
        if note_hints {
            labels.push(note_name(self.note()));
        }
        if midi_hints {
            labels.push(self.note().to_string());
        }
        labels
    }
}

/// Host-supplied configuration for a [Piano]. Every field is optional; fields
/// that are present are applied in the order min-note, max-note, key-range,
/// focus-octave.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PianoPatch {
    #[allow(missing_docs)]
    pub min_note: Option<i32>,
    #[allow(missing_docs)]
    pub max_note: Option<i32>,
    #[allow(missing_docs)]
    pub key_range: Option<i32>,
    #[allow(missing_docs)]
    pub focus_octave: Option<i32>,
}
impl PianoPatch {
    /// Reads a patch field by field, so that one bad field doesn't spoil the
    /// others. Numbers and numeric strings are accepted the same way integer
    /// attributes are. Returns None if `value` isn't an object.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        let object = value.as_object()?;
        let field = |name: &str| -> Option<i32> {
            let v = object.get(name)?;
            let parsed = match v {
                serde_json::Value::Number(n) => parse_int(&n.to_string()),
                serde_json::Value::String(s) => parse_int(s),
                _ => Err(AttributeError::NotANumber(v.to_string())),
            };
            match parsed {
                Ok(v) => Some(v),
                Err(e) => {
                    log::debug!("ignoring piano patch field {name}: {e}");
                    None
                }
            }
        };
        Some(Self {
            min_note: field("min-note"),
            max_note: field("max-note"),
            key_range: field("key-range"),
            focus_octave: field("focus-octave"),
        })
    }
}

/// A piano keyboard showing a window of `key_range` white keys that starts at
/// the C of the focus octave.
///
/// Any change to the range or the window releases whatever the user is
/// holding (with system note-offs) and rebuilds every key from scratch.
#[derive(Debug)]
pub struct Piano {
    min_note: Note,
    max_note: Note,
    key_range: u8,
    focus_octave: i8,
    note_hints: bool,
    midi_hints: bool,
    armed: bool,

    keys: KeyBank<PianoKey>,
    sink: EventSink,
}
impl Default for Piano {
    fn default() -> Self {
        Self::new_with(&PianoSettings::default())
    }
}
impl Piano {
    /// Lowest allowed value of the minimum note.
    pub const MIN_NOTE_RANGE: (i32, i32) = (0, 96);
    /// Allowed range of the maximum note.
    pub const MAX_NOTE_RANGE: (i32, i32) = (12, 108);
    /// Allowed range of the window width, in white keys.
    pub const KEY_RANGE_RANGE: (i32, i32) = (7, 56);

    #[allow(missing_docs)]
    pub fn new_with(settings: &PianoSettings) -> Self {
        let mut r = Self {
            min_note: 12,
            max_note: 107,
            key_range: 28,
            focus_octave: 2,
            note_hints: false,
            midi_hints: false,
            armed: false,
            keys: Default::default(),
            sink: Default::default(),
        };
        settings.apply_unbuilt(&mut r);
        r.focus_octave = r.clamp_octave(r.focus_octave as i32);
        r.rebuild();
        r
    }

    /// A snapshot of the current configuration.
    pub fn settings(&self) -> PianoSettings {
        PianoSettings {
            min_note: self.min_note,
            max_note: self.max_note,
            key_range: self.key_range,
            focus_octave: self.focus_octave,
            note_hints: self.note_hints,
            midi_hints: self.midi_hints,
        }
    }

    #[allow(missing_docs)]
    pub fn min_note(&self) -> Note {
        self.min_note
    }
    #[allow(missing_docs)]
    pub fn max_note(&self) -> Note {
        self.max_note
    }
    #[allow(missing_docs)]
    pub fn key_range(&self) -> u8 {
        self.key_range
    }
    #[allow(missing_docs)]
    pub fn focus_octave(&self) -> i8 {
        self.focus_octave
    }
    #[allow(missing_docs)]
    pub fn note_hints(&self) -> bool {
        self.note_hints
    }
    #[allow(missing_docs)]
    pub fn midi_hints(&self) -> bool {
        self.midi_hints
    }

    /// The octave containing the minimum note. Its C may be below the range,
    /// in which case the window starts at the minimum note instead.
    pub fn min_octave(&self) -> i8 {
        (self.min_note as i32 / 12 - 1) as i8
    }

    /// The highest octave the focus window may start at. One lower than the
    /// octave containing the maximum note if the physical-key window wouldn't
    /// fit above that octave's C.
    pub fn max_octave(&self) -> i8 {
        let mut max_octave = self.max_note as i32 / 12 - 1;
        let window_top = octave_start(max_octave as i8) + KeyMap::piano().len() as i32 - 1;
        if window_top > self.max_note as i32 {
            max_octave -= 1;
        }
        max_octave.max(self.min_octave() as i32) as i8
    }

    /// The first note of the visible window.
    pub fn window_start(&self) -> i32 {
        octave_start(self.focus_octave)
    }

    /// The visible keys, left to right.
    pub fn keys(&self) -> &[PianoKey] {
        self.keys.units()
    }

    #[allow(missing_docs)]
    pub fn key(&self, note: Note) -> Option<&PianoKey> {
        self.keys.find(note)
    }

    /// Number of white keys actually shown, which can be fewer than
    /// [Piano::key_range()] near the top of the range.
    pub fn white_key_count(&self) -> usize {
        self.keys().iter().filter(|k| !k.is_black()).count()
    }

    #[allow(missing_docs)]
    pub fn set_min_note(&mut self, note: i32) {
        let note = note
            .clamp(Self::MIN_NOTE_RANGE.0, Self::MIN_NOTE_RANGE.1)
            .min(self.max_note as i32) as Note;
        if note != self.min_note {
            self.change_range(|p| p.min_note = note);
        }
    }

    #[allow(missing_docs)]
    pub fn set_max_note(&mut self, note: i32) {
        let note = note
            .clamp(Self::MAX_NOTE_RANGE.0, Self::MAX_NOTE_RANGE.1)
            .max(self.min_note as i32) as Note;
        if note != self.max_note {
            self.change_range(|p| p.max_note = note);
        }
    }

    /// Sets the minimum note to the C of the given octave.
    pub fn set_min_octave(&mut self, octave: i32) {
        self.set_min_note(octave_start(octave.clamp(-1, 9) as i8));
    }

    /// Sets the maximum note to the B of the given octave.
    pub fn set_max_octave(&mut self, octave: i32) {
        self.set_max_note(octave_start(octave.clamp(-1, 9) as i8) + 11);
    }

    /// Sets the width of the window, in white keys.
    pub fn set_key_range(&mut self, key_range: i32) {
        let key_range = key_range.clamp(Self::KEY_RANGE_RANGE.0, Self::KEY_RANGE_RANGE.1) as u8;
        if key_range != self.key_range {
            self.change_range(|p| p.key_range = key_range);
        }
    }

    /// Moves the window. Clamped to [Piano::min_octave()]..=[Piano::max_octave()].
    pub fn set_focus_octave(&mut self, octave: i32) {
        let octave = self.clamp_octave(octave);
        if octave != self.focus_octave {
            self.change_range(|p| p.focus_octave = octave);
        }
    }

    #[allow(missing_docs)]
    pub fn set_note_hints(&mut self, enabled: bool) {
        self.note_hints = enabled;
    }

    #[allow(missing_docs)]
    pub fn set_midi_hints(&mut self, enabled: bool) {
        self.midi_hints = enabled;
    }

    /// Whether key hints should be drawn right now.
    pub fn shows_key_hints(&self) -> bool {
        self.armed
    }

    fn clamp_octave(&self, octave: i32) -> i8 {
        octave.clamp(self.min_octave() as i32, self.max_octave() as i32) as i8
    }

    fn change_range(&mut self, f: impl FnOnce(&mut Self)) {
        self.auto_release();
        f(self);
        self.focus_octave = self.clamp_octave(self.focus_octave as i32);
        self.rebuild();
    }

    fn rebuild(&mut self) {
        let mut keys = Vec::default();
        let mut whites = 0;
        let mut note = self.window_start();
        while note <= self.max_note as i32 && whites < self.key_range as usize {
            if note >= self.min_note as i32 {
                let key = PianoKey::new(note as Note);
                if !key.is_black() {
                    whites += 1;
                }
                keys.push(key);
            }
            note += 1;
        }
        self.keys = KeyBank::new(keys);
        self.assign_key_hints();
        log::debug!(
            "piano rebuilt: {} keys from {} (focus octave {})",
            self.keys.units().len(),
            self.window_start(),
            self.focus_octave
        );
    }

    fn assign_key_hints(&mut self) {
        let start = self.window_start();
        let keymap = KeyMap::piano();
        for key in self.keys.units_mut() {
            let offset = key.note() as i32 - start;
            key.key_hint = if offset >= 0 {
                keymap.key_at(offset as usize)
            } else {
                None
            };
        }
    }

    fn note_for_key(&self, key: &PhysicalKey) -> Option<Note> {
        let offset = KeyMap::piano().offset_of_key(key)?;
        Note::try_from(self.window_start() + offset as i32).ok()
    }

    /// Applies a host patch through the setters, in the order min-note,
    /// max-note, key-range, focus-octave.
    pub fn apply_patch(&mut self, patch: &PianoPatch) {
        if let Some(v) = patch.min_note {
            self.set_min_note(v);
        }
        if let Some(v) = patch.max_note {
            self.set_max_note(v);
        }
        if let Some(v) = patch.key_range {
            self.set_key_range(v);
        }
        if let Some(v) = patch.focus_octave {
            self.set_focus_octave(v);
        }
    }
}
impl Instrument for Piano {
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
        self.keys
            .force_release(Some(NoteSource::Keyboard), &self.sink);
        self.armed = false;
    }

    fn note_on(&mut self, note: Note, velocity: Velocity) {
        self.keys.note_on(note, velocity);
    }

    fn note_off(&mut self, note: Note) {
        self.keys.note_off(note);
    }

    fn is_note_on(&self, note: Note) -> bool {
        self.keys.is_note_on(note)
    }

    fn all_notes_off(&mut self) {
        self.keys.all_notes_off();
    }

    fn auto_release(&mut self) {
        self.keys.force_release(None, &self.sink);
    }

    fn handle_key(&mut self, input: &KeyInput) {
        if !accepts_key(self.armed, input) {
            return;
        }
        match input.key {
            PhysicalKey::ArrowLeft => {
                if input.pressed {
                    self.set_focus_octave(self.focus_octave as i32 - 1);
                }
            }
            PhysicalKey::ArrowRight => {
                if input.pressed {
                    self.set_focus_octave(self.focus_octave as i32 + 1);
                }
            }
            PhysicalKey::ArrowUp | PhysicalKey::ArrowDown => {
                handle_bend_key(input, &self.sink);
            }
            PhysicalKey::Char(_) => {
                if let Some(note) = self.note_for_key(&input.key) {
                    if input.pressed {
                        self.keys
                            .press(note, DEFAULT_VELOCITY, NoteSource::Keyboard, &self.sink);
                    } else {
                        self.keys.release(note, NoteSource::Keyboard, &self.sink);
                    }
                }
            }
            PhysicalKey::Other => {}
        }
    }

    fn handle_pointer(&mut self, input: &PointerInput) {
        self.keys.handle_pointer(input, &self.sink);
    }

    fn notes(&self) -> Vec<Note> {
        self.keys.notes()
    }

    fn set_patch(&mut self, patch: &serde_json::Value) {
        match PianoPatch::from_json(patch) {
            Some(patch) => self.apply_patch(&patch),
            None => log::debug!("ignoring piano patch that isn't an object"),
        }
    }
}
impl HasAttributes for Piano {
    fn try_set_attribute(&mut self, name: &str, value: &str) -> Result<(), AttributeError> {
        match name {
            "note-hints" => self.set_note_hints(parse_bool(value)),
            "midi-hints" => self.set_midi_hints(parse_bool(value)),
            "armed" => {
                if parse_bool(value) {
                    self.arm_keyboard();
                } else {
                    self.disarm_keyboard();
                }
            }
            "min-octave" => self.set_min_octave(parse_int(value)?),
            "max-octave" => self.set_max_octave(parse_int(value)?),
            "min-note" => self.set_min_note(parse_int(value)?),
            "max-note" => self.set_max_note(parse_int(value)?),
            "key-range" => self.set_key_range(parse_int(value)?),
            "focus-octave" => self.set_focus_octave(parse_int(value)?),
            _ => return Err(AttributeError::Unknown),
        }
        Ok(())
    }

    fn remove_attribute(&mut self, name: &str) {
        match name {
            "note-hints" => self.set_note_hints(false),
            "midi-hints" => self.set_midi_hints(false),
            "armed" => self.disarm_keyboard(),
            _ => {}
        }
    }
}
impl PianoSettings {
    // Copies settings into a piano that hasn't been built yet. Values are
    // clamped the same way the setters clamp them.
    fn apply_unbuilt(&self, piano: &mut Piano) {
        piano.max_note = (self.max_note as i32)
            .clamp(Piano::MAX_NOTE_RANGE.0, Piano::MAX_NOTE_RANGE.1) as Note;
        piano.min_note = (self.min_note as i32)
            .clamp(Piano::MIN_NOTE_RANGE.0, Piano::MIN_NOTE_RANGE.1)
            .min(piano.max_note as i32) as Note;
        piano.key_range = (self.key_range as i32)
            .clamp(Piano::KEY_RANGE_RANGE.0, Piano::KEY_RANGE_RANGE.1) as u8;
        piano.focus_octave = self.focus_octave;
        piano.note_hints = self.note_hints;
        piano.midi_hints = self.midi_hints;
    }
}
