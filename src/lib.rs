// Copyright (c) 2024 Mike Tsao. All rights reserved.

#![warn(missing_docs)]

//! The `playkeys` crate provides on-screen musical instruments: a piano, a
//! marimba, and a drum pad, plus a rotary dial and a circle of fifths.
//!
//! Each widget is split into a toolkit-neutral core, which owns press state
//! and emits [NoteEvent](events::NoteEvent)s onto a shared
//! [EventBus](events::EventBus), and an optional egui rendering (the `egui`
//! feature) that draws the core and feeds pointer activity back into it.
//!
//! ```
//! use playkeys::prelude::*;
//!
//! let mut rack = InstrumentRack::default();
//! let piano = rack.mount(Piano::default());
//! rack.arm(piano);
//! rack.handle_key(&KeyInput::down('a'));
//! let events = rack.drain();
//! assert_eq!(events[0].uid, piano);
//! ```

pub mod attributes;
pub mod circle_of_fifths;
/// A rotary control for a single continuous value.
pub mod dial;
pub mod events;
pub mod input;
pub mod instruments;
/// Physical-keyboard layouts.
pub mod keymap;
pub mod midi;
pub mod rack;
pub mod settings;
pub mod traits;
/// Core numeric types.
pub mod types;
/// Unique identifiers for mounted widgets.
pub mod uid;

#[cfg(feature = "egui")]
pub mod egui;

/// A collection of imports that are useful to users of this crate.
pub mod prelude {
    pub use super::{
        circle_of_fifths::CircleOfFifths,
        dial::Dial,
        events::{
            CircleEvent, DialEvent, Emitted, EventBus, EventSink, NoteEvent, NoteSource,
            WidgetEvent,
        },
        input::prelude::*,
        instruments::prelude::*,
        keymap::KeyMap,
        midi::prelude::*,
        rack::InstrumentRack,
        settings::{ArmedInstrument, DialSettings, PianoSettings, Settings},
        traits::prelude::*,
        types::prelude::*,
        uid::{Uid, UidFactory},
    };
    #[cfg(feature = "egui")]
    pub use super::egui::prelude::*;
}
