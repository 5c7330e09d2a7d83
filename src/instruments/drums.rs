// Copyright (c) 2024 Mike Tsao. All rights reserved.

use super::{accepts_key, handle_bend_key, HasKeyState, KeyBank, KeyState};
use crate::{
    attributes::{parse_bool, AttributeError},
    events::{EventSink, NoteSource},
    input::{KeyInput, PointerInput},
    keymap::KeyMap,
    traits::{HasAttributes, Instrument},
    types::{Note, Velocity, DEFAULT_VELOCITY},
};
use serde_json::Value;

/// One pad of a [DrumPad].
#[derive(Clone, Debug, PartialEq)]
pub struct DrumPadUnit {
    state: KeyState,
    name: String,
    key_hint: Option<char>,
}
impl HasKeyState for DrumPadUnit {
    fn key_state(&self) -> &KeyState {
        &self.state
    }

    fn key_state_mut(&mut self) -> &mut KeyState {
        &mut self.state
    }
}
impl DrumPadUnit {
    /// The pad index, 0..=15.
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
    /// The sample name assigned by the most recent patch. Empty if none.
    pub fn name(&self) -> &str {
        &self.name
    }
    #[allow(missing_docs)]
    pub fn key_hint(&self) -> Option<char> {
        self.key_hint
    }
    /// Grid position as (row, column). Pads are laid out in two rows of
    /// eight, matching the two rows of physical keys.
    pub fn cell(&self) -> (usize, usize) {
        let index = self.note() as usize;
        (index / DrumPad::COLUMNS, index % DrumPad::COLUMNS)
    }
}

/// Sixteen fixed pads, each played by one physical key.
#[derive(Debug)]
pub struct DrumPad {
    armed: bool,
    pads: KeyBank<DrumPadUnit>,
    sink: EventSink,
}
impl Default for DrumPad {
    fn default() -> Self {
        let keymap = KeyMap::drums();
        let pads = (0..Self::PAD_COUNT as Note)
            .map(|note| DrumPadUnit {
                state: KeyState::new(note),
                name: String::default(),
                key_hint: keymap.key_at(note as usize),
            })
            .collect();
        Self {
            armed: false,
            pads: KeyBank::new(pads),
            sink: Default::default(),
        }
    }
}
impl DrumPad {
    #[allow(missing_docs)]
    pub const PAD_COUNT: usize = 16;
    #[allow(missing_docs)]
    pub const COLUMNS: usize = 8;

    #[allow(missing_docs)]
    pub fn pads(&self) -> &[DrumPadUnit] {
        self.pads.units()
    }

    #[allow(missing_docs)]
    pub fn pad(&self, index: Note) -> Option<&DrumPadUnit> {
        self.pads.find(index)
    }

    /// Relabels the pads from a patch of the shape
    /// `{nodes: [{type: "drums", samples: [{step, name}]}]}`. Returns false
    /// (and changes nothing) if the patch doesn't have that shape.
    pub fn relabel(&mut self, patch: &Value) -> bool {
        let Some(samples) = Self::drum_samples(patch) else {
            return false;
        };
        for pad in self.pads.units_mut() {
            pad.name.clear();
        }
        for sample in samples {
            let step = sample.get("step").and_then(Value::as_u64);
            let name = sample.get("name").and_then(Value::as_str);
            match (step, name) {
                (Some(step), Some(name)) => {
                    if let Some(pad) = Note::try_from(step)
                        .ok()
                        .and_then(|note| self.pads.find_mut(note))
                    {
                        pad.name = name.to_string();
                    }
                }
                _ => log::debug!("skipping malformed drum sample {sample}"),
            }
        }
        true
    }

    fn drum_samples(patch: &Value) -> Option<&Vec<Value>> {
        patch
            .get("nodes")?
            .as_array()?
            .iter()
            .filter(|node| node.get("type").and_then(Value::as_str) == Some("drums"))
            .find_map(|node| node.get("samples").and_then(Value::as_array))
    }
}
impl Instrument for DrumPad {
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
        self.pads
            .force_release(Some(NoteSource::Keyboard), &self.sink);
        self.armed = false;
    }

    fn note_on(&mut self, note: Note, velocity: Velocity) {
        self.pads.note_on(note, velocity);
    }

    fn note_off(&mut self, note: Note) {
        self.pads.note_off(note);
    }

    fn is_note_on(&self, note: Note) -> bool {
        self.pads.is_note_on(note)
    }

    fn all_notes_off(&mut self) {
        self.pads.all_notes_off();
    }

    fn auto_release(&mut self) {
        self.pads.force_release(None, &self.sink);
    }

    fn handle_key(&mut self, input: &KeyInput) {
        if !accepts_key(self.armed, input) || handle_bend_key(input, &self.sink) {
            return;
        }
        if let Some(index) = KeyMap::drums().offset_of_key(&input.key) {
            let note = index as Note;
            if input.pressed {
                self.pads
                    .press(note, DEFAULT_VELOCITY, NoteSource::Keyboard, &self.sink);
            } else {
                self.pads.release(note, NoteSource::Keyboard, &self.sink);
            }
        }
    }

    fn handle_pointer(&mut self, input: &PointerInput) {
        self.pads.handle_pointer(input, &self.sink);
    }

    fn notes(&self) -> Vec<Note> {
        self.pads.notes()
    }

    fn set_patch(&mut self, patch: &Value) {
        if !self.relabel(patch) {
            log::debug!("ignoring drum patch without a drums node");
        }
    }
}
impl HasAttributes for DrumPad {
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
        input::PhysicalKey,
        uid::Uid,
    };
    use serde_json::json;

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
    fn sixteen_pads() {
        let pads = DrumPad::default();
        assert_eq!(pads.notes(), (0..16).collect::<Vec<Note>>());
        assert_eq!(pads.pad(0).and_then(|p| p.key_hint()), Some('q'));
        assert_eq!(pads.pad(8).and_then(|p| p.key_hint()), Some('a'));
        assert_eq!(pads.pad(15).map(|p| p.cell()), Some((1, 7)));
        assert!(pads.pad(16).is_none());
    }

    #[test]
    fn patch_relabels_matching_pads() {
        let mut pads = DrumPad::default();
        pads.set_patch(&json!({"nodes": [{"type": "drums", "samples": [{"step": 3, "name": "Kick"}]}]}));
        for pad in pads.pads() {
            if pad.note() == 3 {
                assert_eq!(pad.name(), "Kick");
            } else {
                assert_eq!(pad.name(), "", "pad {} should be blank", pad.note());
            }
        }
    }

    #[test]
    fn later_patch_replaces_earlier_names() {
        let mut pads = DrumPad::default();
        pads.set_patch(&json!({"nodes": [{"type": "drums", "samples": [
            {"step": 0, "name": "Kick"}, {"step": 1, "name": "Snare"}]}]}));
        pads.set_patch(&json!({"nodes": [
            {"type": "synth"},
            {"type": "drums", "samples": [{"step": 1, "name": "Clap"}, {"step": 99, "name": "Nope"}, {"name": "No step"}]}
        ]}));
        assert_eq!(pads.pad(0).unwrap().name(), "");
        assert_eq!(pads.pad(1).unwrap().name(), "Clap");
    }

    #[test]
    fn malformed_patches_are_ignored() {
        let mut pads = DrumPad::default();
        pads.set_patch(&json!({"nodes": [{"type": "drums", "samples": [{"step": 2, "name": "Hat"}]}]}));
        for patch in [
            json!(null),
            json!("drums"),
            json!({"nodes": "nope"}),
            json!({"nodes": [{"type": "drums"}]}),
            json!({"nodes": [{"type": "drums", "samples": {"step": 1}}]}),
            json!({"nodes": [{"type": "bass", "samples": []}]}),
        ] {
            pads.set_patch(&patch);
            assert_eq!(pads.pad(2).unwrap().name(), "Hat", "{patch} changed names");
        }
    }

    #[test]
    fn keyboard_and_bend() {
        let bus = EventBus::default();
        let mut pads = DrumPad::default();
        pads.attach(bus.sink(Uid(3)));
        pads.arm_keyboard();

        pads.handle_key(&KeyInput::down('q'));
        pads.handle_key(&KeyInput::down('k'));
        pads.handle_key(&KeyInput::up('q'));
        pads.handle_key(&KeyInput::down(PhysicalKey::ArrowUp));
        pads.handle_key(&KeyInput::down('z'));
        assert_eq!(
            note_events(&bus),
            vec![
                NoteEvent::note_on(0, DEFAULT_VELOCITY, NoteSource::Keyboard),
                NoteEvent::note_on(15, DEFAULT_VELOCITY, NoteSource::Keyboard),
                NoteEvent::note_off(0, NoteSource::Keyboard),
                NoteEvent::pitch_bend(200, NoteSource::Keyboard),
            ]
        );
        assert!(pads.is_note_on(15));
    }

    #[test]
    fn pointer_leave_without_press_is_silent() {
        let bus = EventBus::default();
        let mut pads = DrumPad::default();
        pads.attach(bus.sink(Uid(3)));

        pads.handle_pointer(&PointerInput::Enter {
            note: 4,
            button_held: false,
        });
        pads.handle_pointer(&PointerInput::Leave(4));
        assert!(note_events(&bus).is_empty());

        pads.handle_pointer(&PointerInput::Down(4));
        pads.handle_pointer(&PointerInput::Leave(4));
        assert_eq!(
            note_events(&bus),
            vec![
                NoteEvent::note_on(4, DEFAULT_VELOCITY, NoteSource::Pointer),
                NoteEvent::note_off(4, NoteSource::Pointer),
            ]
        );
    }

    #[test]
    fn host_notes() {
        let mut pads = DrumPad::default();
        pads.note_on(5, 100);
        assert!(pads.is_note_on(5));
        assert_eq!(pads.pad(5).unwrap().state().velocity(), 100);
        pads.note_on(16, 100);
        assert!(!pads.is_note_on(16));
        pads.all_notes_off();
        assert!(!pads.is_note_on(5));
    }
}
