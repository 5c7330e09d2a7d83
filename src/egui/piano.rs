// Copyright (c) 2024 Mike Tsao. All rights reserved.

use super::{pointer_transitions, unit_fill, unit_stroke};
use crate::{
    instruments::{Piano, PianoKey},
    traits::Instrument,
};
use eframe::{
    egui::{vec2, Sense, Widget},
    emath::Align2,
    epaint::{pos2, Color32, FontId, Rect, Rounding},
};

/// Draws a [Piano]'s visible window and plays it with the pointer.
#[derive(Debug)]
pub struct PianoWidget<'a> {
    inner: &'a mut Piano,
}
impl<'a> PianoWidget<'a> {
    /// Height of a white key, in points.
    pub const HEIGHT: f32 = 96.0;
    const BLACK_WIDTH: f32 = 0.7;
    const BLACK_HEIGHT: f32 = 0.6;

    fn new(inner: &'a mut Piano) -> Self {
        Self { inner }
    }

    /// Instantiates a widget suitable for adding to a [Ui](eframe::egui::Ui).
    pub fn widget(inner: &'a mut Piano) -> impl eframe::egui::Widget + 'a {
        move |ui: &mut eframe::egui::Ui| PianoWidget::new(inner).ui(ui)
    }
}
impl<'a> eframe::egui::Widget for PianoWidget<'a> {
    fn ui(self, ui: &mut eframe::egui::Ui) -> eframe::egui::Response {
        let (rect, response) = ui.allocate_exact_size(
            vec2(ui.available_width(), Self::HEIGHT),
            Sense::click_and_drag(),
        );
        let key_width = rect.width() / self.inner.white_key_count().max(1) as f32;
        let first_octave = self.inner.focus_octave();
        let key_rect = |key: &PianoKey| {
            let left = rect.left() + key.x_position(first_octave, key_width);
            if key.is_black() {
                Rect::from_min_size(
                    pos2(left, rect.top()),
                    vec2(
                        key_width * Self::BLACK_WIDTH,
                        rect.height() * Self::BLACK_HEIGHT,
                    ),
                )
            } else {
                Rect::from_min_size(pos2(left, rect.top()), vec2(key_width, rect.height()))
            }
        };

        // Black keys sit on top, so they win the hit test.
        let hovered = ui
            .input(|i| i.pointer.hover_pos())
            .filter(|pos| rect.contains(*pos))
            .and_then(|pos| {
                let keys = self.inner.keys();
                keys.iter()
                    .filter(|k| k.is_black())
                    .chain(keys.iter().filter(|k| !k.is_black()))
                    .find(|k| key_rect(*k).contains(pos))
                    .map(|k| k.note())
            });
        for transition in pointer_transitions(ui, response.id, hovered) {
            self.inner.handle_pointer(&transition);
        }

        if ui.is_rect_visible(rect) {
            let painter = ui.painter_at(rect);
            let stroke = unit_stroke(ui);
            let (note_hints, midi_hints, key_hints) = (
                self.inner.note_hints(),
                self.inner.midi_hints(),
                self.inner.shows_key_hints(),
            );
            for black in [false, true] {
                for key in self.inner.keys().iter().filter(|k| k.is_black() == black) {
                    let r = key_rect(key);
                    let (resting, text) = if black {
                        (Color32::BLACK, Color32::WHITE)
                    } else {
                        (Color32::WHITE, Color32::BLACK)
                    };
                    painter.rect(
                        r,
                        Rounding::same(2.0),
                        unit_fill(ui, key.state(), resting),
                        stroke,
                    );
                    let labels = key.labels(note_hints, midi_hints, key_hints);
                    for (i, label) in labels.iter().rev().enumerate() {
                        painter.text(
                            pos2(r.center().x, r.bottom() - 4.0 - 12.0 * i as f32),
                            Align2::CENTER_BOTTOM,
                            label,
                            FontId::proportional(10.0),
                            text,
                        );
                    }
                }
            }
        }
        response
    }
}
