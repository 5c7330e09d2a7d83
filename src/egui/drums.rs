// Copyright (c) 2024 Mike Tsao. All rights reserved.

use super::{pointer_transitions, unit_fill, unit_stroke};
use crate::{
    instruments::{DrumPad, DrumPadUnit},
    traits::Instrument,
};
use eframe::{
    egui::{vec2, Sense, Widget},
    emath::Align2,
    epaint::{pos2, FontId, Rect, Rounding},
};

/// Draws a [DrumPad] as a grid of square pads.
#[derive(Debug)]
pub struct DrumPadWidget<'a> {
    inner: &'a mut DrumPad,
}
impl<'a> DrumPadWidget<'a> {
    const GAP: f32 = 4.0;

    fn new(inner: &'a mut DrumPad) -> Self {
        Self { inner }
    }

    /// Instantiates a widget suitable for adding to a [Ui](eframe::egui::Ui).
    pub fn widget(inner: &'a mut DrumPad) -> impl eframe::egui::Widget + 'a {
        move |ui: &mut eframe::egui::Ui| DrumPadWidget::new(inner).ui(ui)
    }
}
impl<'a> eframe::egui::Widget for DrumPadWidget<'a> {
    fn ui(self, ui: &mut eframe::egui::Ui) -> eframe::egui::Response {
        let rows = DrumPad::PAD_COUNT / DrumPad::COLUMNS;
        let cell = (ui.available_width() / DrumPad::COLUMNS as f32).min(64.0);
        let (rect, response) = ui.allocate_exact_size(
            vec2(cell * DrumPad::COLUMNS as f32, cell * rows as f32),
            Sense::click_and_drag(),
        );
        let pad_rect = |pad: &DrumPadUnit| {
            let (row, column) = pad.cell();
            Rect::from_min_size(
                pos2(
                    rect.left() + column as f32 * cell,
                    rect.top() + row as f32 * cell,
                ),
                vec2(cell, cell),
            )
            .shrink(Self::GAP / 2.0)
        };

        let hovered = ui
            .input(|i| i.pointer.hover_pos())
            .filter(|pos| rect.contains(*pos))
            .and_then(|pos| {
                self.inner
                    .pads()
                    .iter()
                    .find(|p| pad_rect(*p).contains(pos))
                    .map(|p| p.note())
            });
        for transition in pointer_transitions(ui, response.id, hovered) {
            self.inner.handle_pointer(&transition);
        }

        if ui.is_rect_visible(rect) {
            let painter = ui.painter_at(rect);
            let stroke = unit_stroke(ui);
            let text_color = ui.visuals().text_color();
            let key_hints = self.inner.is_armed();
            for pad in self.inner.pads() {
                let r = pad_rect(pad);
                painter.rect(
                    r,
                    Rounding::same(4.0),
                    unit_fill(ui, pad.state(), ui.visuals().faint_bg_color),
                    stroke,
                );
                painter.text(
                    r.center(),
                    Align2::CENTER_CENTER,
                    pad.name(),
                    FontId::proportional(10.0),
                    text_color,
                );
                if key_hints {
                    if let Some(hint) = pad.key_hint() {
                        painter.text(
                            r.left_top() + vec2(3.0, 2.0),
                            Align2::LEFT_TOP,
                            hint.to_ascii_uppercase(),
                            FontId::monospace(9.0),
                            text_color,
                        );
                    }
                }
            }
        }
        response
    }
}
