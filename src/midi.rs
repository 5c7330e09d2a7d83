// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! Note arithmetic shared by the pitched instruments, plus a thin bridge to
//! [midly] for hosts that want real MIDI messages.

use crate::types::{Note, Velocity};

pub use midly::{
    num::{u14, u7},
    MidiMessage, PitchBend,
};

/// Recommended imports for easy onboarding.
pub mod prelude {
    pub use super::{
        is_black, new_note_off, new_note_on, note_name, octave, octave_start, step, MidiMessage,
    };
}

/// Note names within an octave, starting at C.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Steps within an octave that are accidentals (the black keys on a piano).
pub const BLACK_STEPS: [u8; 5] = [1, 3, 6, 8, 10];

/// Position of the note within its octave, 0 (C) through 11 (B).
pub const fn step(note: Note) -> u8 {
    note % 12
}

/// The octave number, using the convention that MIDI note 60 is C4.
pub const fn octave(note: Note) -> i8 {
    (note / 12) as i8 - 1
}

/// Whether the note is an accidental.
pub fn is_black(note: Note) -> bool {
    BLACK_STEPS.contains(&step(note))
}

/// The MIDI note number of the C that starts the given octave. Octaves below
/// -1 saturate to note 0.
pub fn octave_start(octave: i8) -> i32 {
    ((octave as i32) + 1).max(0) * 12
}

/// A human-readable name, such as `C4` for MIDI note 60.
pub fn note_name(note: Note) -> String {
    format!("{}{}", NOTE_NAMES[step(note) as usize], octave(note))
}

/// Convenience function to make a note-on [MidiMessage].
pub fn new_note_on(note: Note, vel: Velocity) -> MidiMessage {
    MidiMessage::NoteOn {
        key: u7::from(note.min(127)),
        vel: u7::from(vel.min(127)),
    }
}

/// Convenience function to make a note-off [MidiMessage].
pub fn new_note_off(note: Note, vel: Velocity) -> MidiMessage {
    MidiMessage::NoteOff {
        key: u7::from(note.min(127)),
        vel: u7::from(vel.min(127)),
    }
}

/// Widgets bend in cents. At the conventional two-semitone bend range, +200
/// cents is the top of the 14-bit pitch-wheel range.
pub const PITCH_BEND_RANGE_CENTS: i32 = 200;

/// Converts a bend in cents to a pitch-wheel [MidiMessage].
pub fn new_pitch_bend(cents: i32) -> MidiMessage {
    let cents = cents.clamp(-PITCH_BEND_RANGE_CENTS, PITCH_BEND_RANGE_CENTS);
    let scaled = (cents as f64 / PITCH_BEND_RANGE_CENTS as f64) * 8191.0;
    MidiMessage::PitchBend {
        bend: PitchBend(u14::from((scaled.round() as i32 + 8192) as u16)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_note_properties() {
        assert_eq!(step(61), 1);
        assert_eq!(octave(60), 4);
        assert_eq!(octave(0), -1);
        assert!(is_black(61));
        assert!(!is_black(60));
        assert!(is_black(70));
        assert!(!is_black(71));
        assert_eq!(octave_start(2), 36);
        assert_eq!(octave_start(-1), 0);
        assert_eq!(octave_start(-3), 0);
    }

    #[test]
    fn names() {
        assert_eq!(note_name(60), "C4");
        assert_eq!(note_name(61), "C#4");
        assert_eq!(note_name(11), "B-1");
    }

    #[test]
    fn midi_messages() {
        assert_eq!(
            new_note_on(60, 200),
            MidiMessage::NoteOn {
                key: u7::from(60),
                vel: u7::from(127)
            },
            "velocity should saturate at 127"
        );
        assert_eq!(
            new_pitch_bend(0),
            MidiMessage::PitchBend {
                bend: PitchBend(u14::from(8192))
            }
        );
        assert_eq!(
            new_pitch_bend(200),
            MidiMessage::PitchBend {
                bend: PitchBend(u14::from(16383))
            }
        );
        assert_eq!(
            new_pitch_bend(-999),
            MidiMessage::PitchBend {
                bend: PitchBend(u14::from(1))
            }
        );
    }
}
