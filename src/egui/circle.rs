// Copyright (c) 2024 Mike Tsao. All rights reserved.

use crate::circle_of_fifths::{CircleOfFifths, KEYS};
use eframe::{
    egui::{vec2, Sense, Widget},
    emath::Align2,
    epaint::{FontId, Vec2},
};

/// Draws a [CircleOfFifths] and selects a key on click.
#[derive(Debug)]
pub struct CircleOfFifthsWidget<'a> {
    inner: &'a mut CircleOfFifths,
}
impl<'a> CircleOfFifthsWidget<'a> {
    /// Diameter, in points.
    pub const SIZE: f32 = 180.0;

    fn new(inner: &'a mut CircleOfFifths) -> Self {
        Self { inner }
    }

    /// Instantiates a widget suitable for adding to a [Ui](eframe::egui::Ui).
    pub fn widget(inner: &'a mut CircleOfFifths) -> impl eframe::egui::Widget + 'a {
        move |ui: &mut eframe::egui::Ui| CircleOfFifthsWidget::new(inner).ui(ui)
    }

    fn direction(index: usize) -> Vec2 {
        let angle = CircleOfFifths::angle_of(index);
        vec2(angle.sin(), -angle.cos())
    }
}
impl<'a> eframe::egui::Widget for CircleOfFifthsWidget<'a> {
    fn ui(self, ui: &mut eframe::egui::Ui) -> eframe::egui::Response {
        let (rect, mut response) =
            ui.allocate_exact_size(vec2(Self::SIZE, Self::SIZE), Sense::click());
        let center = rect.center();
        let outer = Self::SIZE / 2.0;
        let inner = outer * 0.35;

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let offset = pos - center;
                if (inner..=outer).contains(&offset.length()) {
                    let before = self.inner.selected();
                    self.inner
                        .select(CircleOfFifths::index_at_angle(offset.x.atan2(-offset.y)));
                    if self.inner.selected() != before {
                        response.mark_changed();
                    }
                }
            }
        }

        if ui.is_rect_visible(rect) {
            let painter = ui.painter_at(rect);
            let visuals = ui.visuals();
            let stroke = visuals.widgets.noninteractive.bg_stroke;
            painter.circle_stroke(center, outer - 1.0, stroke);
            painter.circle_stroke(center, inner, stroke);

            let major_radius = outer * 0.8;
            let minor_radius = outer * 0.55;
            for (index, key) in KEYS.iter().enumerate() {
                let direction = Self::direction(index);
                let selected = index == self.inner.selected();
                if selected {
                    painter.circle_filled(
                        center + direction * major_radius,
                        13.0,
                        visuals.selection.bg_fill,
                    );
                }
                painter.text(
                    center + direction * major_radius,
                    Align2::CENTER_CENTER,
                    key.major,
                    FontId::proportional(13.0),
                    if selected {
                        visuals.selection.stroke.color
                    } else {
                        visuals.strong_text_color()
                    },
                );
                painter.text(
                    center + direction * minor_radius,
                    Align2::CENTER_CENTER,
                    key.minor,
                    FontId::proportional(9.0),
                    visuals.weak_text_color(),
                );
            }
        }
        response
    }
}
