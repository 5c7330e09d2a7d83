// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! egui renderings of the widgets. Each one borrows its core mutably for a
//! single frame, draws it, and feeds any pointer activity back into it.

pub use circle::CircleOfFifthsWidget;
pub use dial::DialWidget;
pub use drums::DrumPadWidget;
pub use input::{key_input_from_event, key_inputs};
pub use marimba::MarimbaWidget;
pub use piano::PianoWidget;

use crate::{
    input::{PointerInput, PointerTracker},
    instruments::KeyState,
    types::Note,
};
use eframe::{
    egui::{Id, Ui},
    epaint::{Color32, Stroke},
};

mod circle;
mod dial;
mod drums;
mod input;
mod marimba;
mod piano;

/// Recommended imports for easy onboarding.
pub mod prelude {
    pub use super::{
        key_input_from_event, key_inputs, CircleOfFifthsWidget, DialWidget, DrumPadWidget,
        MarimbaWidget, PianoWidget,
    };
}

// Pointer state survives between frames in egui's temporary memory, keyed by
// the widget's response id.
fn pointer_transitions(ui: &Ui, id: Id, hovered: Option<Note>) -> Vec<PointerInput> {
    let (down, pressed, released) = ui.input(|i| {
        (
            i.pointer.primary_down(),
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
        )
    });
    let mut tracker: PointerTracker = ui.data(|d| d.get_temp(id)).unwrap_or_default();
    let transitions = tracker.update(hovered, down, pressed, released);
    ui.data_mut(|d| d.insert_temp(id, tracker));
    transitions
}

fn unit_fill(ui: &Ui, state: &KeyState, resting: Color32) -> Color32 {
    if state.is_pressed() {
        ui.visuals().selection.bg_fill
    } else {
        resting
    }
}

fn unit_stroke(ui: &Ui) -> Stroke {
    ui.visuals().widgets.noninteractive.bg_stroke
}
