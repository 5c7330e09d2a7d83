// Copyright (c) 2024 Mike Tsao. All rights reserved.

use crate::dial::Dial;
use eframe::{
    egui::{vec2, Sense, Widget},
    emath::Align2,
    epaint::{FontId, Stroke},
};

/// Draws a [Dial] as a knob and turns it with vertical drags.
#[derive(Debug)]
pub struct DialWidget<'a> {
    inner: &'a mut Dial,
}
impl<'a> DialWidget<'a> {
    /// Diameter of the knob, in points.
    pub const SIZE: f32 = 48.0;

    fn new(inner: &'a mut Dial) -> Self {
        Self { inner }
    }

    /// Instantiates a widget suitable for adding to a [Ui](eframe::egui::Ui).
    pub fn widget(inner: &'a mut Dial) -> impl eframe::egui::Widget + 'a {
        move |ui: &mut eframe::egui::Ui| DialWidget::new(inner).ui(ui)
    }
}
impl<'a> eframe::egui::Widget for DialWidget<'a> {
    fn ui(self, ui: &mut eframe::egui::Ui) -> eframe::egui::Response {
        let (rect, mut response) =
            ui.allocate_exact_size(vec2(Self::SIZE, Self::SIZE + 14.0), Sense::drag());

        if let Some(pos) = response.interact_pointer_pos() {
            if response.drag_started() {
                self.inner.begin_drag(pos.y);
            } else if response.dragged() {
                self.inner.drag_to(pos.y);
                response.mark_changed();
            }
        }
        if self.inner.is_dragging() && !response.dragged() {
            self.inner.end_drag();
        }

        if ui.is_rect_visible(rect) {
            let painter = ui.painter_at(rect);
            let visuals = ui.style().interact(&response);
            let radius = Self::SIZE / 2.0 - 2.0;
            let center = rect.center_top() + vec2(0.0, Self::SIZE / 2.0);
            painter.circle(center, radius, visuals.bg_fill, visuals.bg_stroke);

            let angle = self.inner.angle().to_radians();
            let direction = vec2(angle.sin(), -angle.cos());
            painter.line_segment(
                [center + direction * radius * 0.3, center + direction * radius],
                Stroke::new(2.0, visuals.fg_stroke.color),
            );
            painter.text(
                rect.center_bottom(),
                Align2::CENTER_BOTTOM,
                format!("{:.1}", self.inner.value()),
                FontId::proportional(10.0),
                visuals.text_color(),
            );
        }
        response
    }
}
