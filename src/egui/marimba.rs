// Copyright (c) 2024 Mike Tsao. All rights reserved.

use super::{pointer_transitions, unit_fill, unit_stroke};
use crate::{
    instruments::{Marimba, MarimbaBar, MarimbaRow},
    traits::Instrument,
};
use eframe::{
    egui::{vec2, Sense, Widget},
    emath::Align2,
    epaint::{pos2, Color32, FontId, Rect, Rounding},
};

/// Draws a [Marimba] as two rows of bars: naturals in front, accidentals
/// behind.
#[derive(Debug)]
pub struct MarimbaWidget<'a> {
    inner: &'a mut Marimba,
}
impl<'a> MarimbaWidget<'a> {
    /// Height of both rows together, in points.
    pub const HEIGHT: f32 = 120.0;
    const BAR_FILL: Color32 = Color32::from_rgb(0xa0, 0x6a, 0x3c);

    fn new(inner: &'a mut Marimba) -> Self {
        Self { inner }
    }

    /// Instantiates a widget suitable for adding to a [Ui](eframe::egui::Ui).
    pub fn widget(inner: &'a mut Marimba) -> impl eframe::egui::Widget + 'a {
        move |ui: &mut eframe::egui::Ui| MarimbaWidget::new(inner).ui(ui)
    }
}
impl<'a> eframe::egui::Widget for MarimbaWidget<'a> {
    fn ui(self, ui: &mut eframe::egui::Ui) -> eframe::egui::Response {
        let (rect, response) = ui.allocate_exact_size(
            vec2(ui.available_width(), Self::HEIGHT),
            Sense::click_and_drag(),
        );
        let column_width = rect.width() / self.inner.natural_count().max(1) as f32;
        let row_height = rect.height() / 2.0;
        let bar_rect = |bar: &MarimbaBar| {
            let top = match bar.row() {
                MarimbaRow::Accidentals => rect.top(),
                MarimbaRow::Naturals => rect.top() + row_height,
            };
            let height = row_height * bar.length();
            Rect::from_min_size(
                pos2(
                    rect.left() + (bar.column() + 0.05) * column_width,
                    top + (row_height - height) / 2.0,
                ),
                vec2(column_width * 0.9, height),
            )
        };

        let hovered = ui
            .input(|i| i.pointer.hover_pos())
            .filter(|pos| rect.contains(*pos))
            .and_then(|pos| {
                self.inner
                    .bars()
                    .iter()
                    .find(|b| bar_rect(*b).contains(pos))
                    .map(|b| b.note())
            });
        for transition in pointer_transitions(ui, response.id, hovered) {
            self.inner.handle_pointer(&transition);
        }

        if ui.is_rect_visible(rect) {
            let painter = ui.painter_at(rect);
            let stroke = unit_stroke(ui);
            let key_hints = self.inner.shows_key_hints();
            for bar in self.inner.bars() {
                let r = bar_rect(bar);
                painter.rect(
                    r,
                    Rounding::same(3.0),
                    unit_fill(ui, bar.state(), Self::BAR_FILL),
                    stroke,
                );
                if key_hints {
                    if let Some(hint) = bar.key_hint() {
                        painter.text(
                            r.center(),
                            Align2::CENTER_CENTER,
                            hint.to_ascii_uppercase(),
                            FontId::proportional(10.0),
                            Color32::WHITE,
                        );
                    }
                }
            }
        }
        response
    }
}
