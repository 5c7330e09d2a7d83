// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! A ring of the twelve major keys, arranged so that neighbors differ by one
//! sharp or flat.

use crate::{
    attributes::{parse_int, AttributeError},
    events::{CircleEvent, EventSink},
    traits::HasAttributes,
};
use std::f32::consts::TAU;

/// One position on the circle.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct KeySlot {
    /// The major key, e.g. "F#".
    pub major: &'static str,
    /// Its relative minor, e.g. "D#m".
    pub minor: &'static str,
    /// Sharps (positive) or flats (negative) in the key signature.
    pub fifths: i8,
}

/// Clockwise from the top.
pub const KEYS: [KeySlot; 12] = [
    KeySlot { major: "C", minor: "Am", fifths: 0 },
    KeySlot { major: "G", minor: "Em", fifths: 1 },
    KeySlot { major: "D", minor: "Bm", fifths: 2 },
    KeySlot { major: "A", minor: "F#m", fifths: 3 },
    KeySlot { major: "E", minor: "C#m", fifths: 4 },
    KeySlot { major: "B", minor: "G#m", fifths: 5 },
    KeySlot { major: "F#", minor: "D#m", fifths: 6 },
    KeySlot { major: "Db", minor: "Bbm", fifths: -5 },
    KeySlot { major: "Ab", minor: "Fm", fifths: -4 },
    KeySlot { major: "Eb", minor: "Cm", fifths: -3 },
    KeySlot { major: "Bb", minor: "Gm", fifths: -2 },
    KeySlot { major: "F", minor: "Dm", fifths: -1 },
];

/// Selects one key from the circle.
#[derive(Debug, Default)]
pub struct CircleOfFifths {
    selected: usize,
    sink: EventSink,
}
impl CircleOfFifths {
    #[allow(missing_docs)]
    pub fn attach(&mut self, sink: EventSink) {
        self.sink = sink;
    }

    /// Index into [KEYS] of the current selection.
    pub fn selected(&self) -> usize {
        self.selected
    }

    #[allow(missing_docs)]
    pub fn selected_key(&self) -> &'static KeySlot {
        &KEYS[self.selected]
    }

    /// Changes the selection on behalf of the host. Out-of-range indexes wrap.
    /// Doesn't emit anything.
    pub fn set_selected(&mut self, index: usize) {
        self.selected = index % KEYS.len();
    }

    /// Changes the selection on behalf of the user. Emits
    /// [CircleEvent::Selected] if the selection actually changed.
    pub fn select(&mut self, index: usize) {
        let index = index % KEYS.len();
        if index != self.selected {
            self.selected = index;
            self.sink.emit(CircleEvent::Selected {
                key: KEYS[index].major.to_string(),
            });
        }
    }

    /// Looks up a major key by name, ignoring case.
    pub fn index_of(name: &str) -> Option<usize> {
        let name = name.trim();
        KEYS.iter()
            .position(|k| k.major.eq_ignore_ascii_case(name))
    }

    /// Which slot an angle falls in. `radians` is measured clockwise from
    /// straight up, and each slot is centered on its own angle.
    pub fn index_at_angle(radians: f32) -> usize {
        let slice = TAU / KEYS.len() as f32;
        let slot = (radians / slice).round() as i32;
        slot.rem_euclid(KEYS.len() as i32) as usize
    }

    /// The center angle of a slot, in the same convention as
    /// [CircleOfFifths::index_at_angle()].
    pub fn angle_of(index: usize) -> f32 {
        TAU * (index % KEYS.len()) as f32 / KEYS.len() as f32
    }
}
impl HasAttributes for CircleOfFifths {
    fn try_set_attribute(&mut self, name: &str, value: &str) -> Result<(), AttributeError> {
        match name {
            "selected" => {
                let index = match parse_int(value) {
                    Ok(i) if i >= 0 && (i as usize) < KEYS.len() => i as usize,
                    Ok(_) => return Err(AttributeError::InvalidChoice(value.to_string())),
                    Err(_) => Self::index_of(value)
                        .ok_or_else(|| AttributeError::InvalidChoice(value.to_string()))?,
                };
                self.set_selected(index);
                Ok(())
            }
            _ => Err(AttributeError::Unknown),
        }
    }

    fn remove_attribute(&mut self, _name: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        events::{EventBus, WidgetEvent},
        uid::Uid,
    };
    use float_cmp::approx_eq;

    #[test]
    fn neighbors_differ_by_one_accidental() {
        for (i, key) in KEYS.iter().enumerate() {
            let next = &KEYS[(i + 1) % KEYS.len()];
            let diff = (next.fifths - key.fifths).rem_euclid(12);
            assert_eq!(diff, 1, "{} -> {}", key.major, next.major);
        }
    }

    #[test]
    fn only_pointer_selection_emits() {
        let bus = EventBus::default();
        let mut circle = CircleOfFifths::default();
        circle.attach(bus.sink(Uid(5)));

        circle.set_selected(3);
        assert!(bus.drain().is_empty());
        circle.select(3);
        assert!(bus.drain().is_empty(), "unchanged selection");
        circle.select(11);
        let events = bus.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].event,
            WidgetEvent::from(CircleEvent::Selected {
                key: "F".to_string()
            })
        );
        assert_eq!(circle.selected_key().minor, "Dm");
    }

    #[test]
    fn hit_testing() {
        assert_eq!(CircleOfFifths::index_at_angle(0.0), 0);
        assert_eq!(CircleOfFifths::index_at_angle(TAU / 12.0), 1);
        assert_eq!(CircleOfFifths::index_at_angle(TAU / 30.0), 0);
        assert_eq!(CircleOfFifths::index_at_angle(-TAU / 12.0), 11);
        assert_eq!(CircleOfFifths::index_at_angle(TAU), 0);
        assert_eq!(CircleOfFifths::index_at_angle(TAU * 0.5), 6);
        assert!(approx_eq!(f32, CircleOfFifths::angle_of(13), TAU / 12.0));
    }

    #[test]
    fn attributes() {
        let mut circle = CircleOfFifths::default();
        circle.set_attribute("selected", "2");
        assert_eq!(circle.selected(), 2);
        circle.set_attribute("selected", "eb");
        assert_eq!(circle.selected(), 9);
        circle.set_attribute("selected", "12");
        circle.set_attribute("selected", "H");
        circle.set_attribute("selected", "-1");
        assert_eq!(circle.selected(), 9);
        assert!(matches!(
            circle.try_set_attribute("selected", "X#"),
            Err(AttributeError::InvalidChoice(_))
        ));
    }
}
