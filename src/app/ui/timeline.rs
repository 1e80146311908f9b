use eframe::egui::{self, Align2, Color32, FontId, Rect, Sense, Stroke, Ui, vec2};

use crate::util::month_label;

use super::super::ViewModel;

const KNOB_RADIUS: f32 = 9.0;
const TRACK_HEIGHT: f32 = 10.0;

impl ViewModel {
    pub(in crate::app) fn draw_timeline(&mut self, ui: &mut Ui, now: f64) {
        let start_year = self.catalog.horizon.start_year;
        let last_month = self.clock.last_month();

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            let toggle_label = if self.clock.is_paused() { "Play" } else { "Pause" };
            if ui.button(toggle_label).clicked() {
                self.clock.toggle_pause(now);
            }

            ui.label(month_label(start_year, 0));

            let desired = vec2(
                (ui.available_width() - 90.0).max(120.0),
                KNOB_RADIUS * 2.0 + 6.0,
            );
            let (rect, response) = ui.allocate_exact_size(desired, Sense::click_and_drag());
            self.handle_scrub_input(&response, rect, now);
            Self::paint_track(ui, rect, self.clock.fraction(now));

            ui.label(month_label(start_year, last_month));
        });

        ui.vertical_centered(|ui| {
            ui.label(
                egui::RichText::new(month_label(start_year, self.clock.display_month(now)))
                    .monospace(),
            );
        });
        ui.add_space(4.0);
    }

    /// Pointer-down on the track enters manual drag; every frame with the
    /// button held maps the pointer to a month, and release rebases autoplay
    /// from the dropped position.
    fn handle_scrub_input(&mut self, response: &egui::Response, rect: Rect, now: f64) {
        if response.is_pointer_button_down_on() {
            if !self.clock.is_dragging() {
                self.clock.begin_drag(now);
            }
            if let Some(pointer) = response.interact_pointer_pos() {
                let fraction = (pointer.x - rect.left()) / rect.width().max(1.0);
                self.clock.drag_to_fraction(fraction);
            }
        } else if self.clock.is_dragging() {
            self.clock.end_drag(now);
        }
    }

    fn paint_track(ui: &Ui, rect: Rect, fraction: f32) {
        let painter = ui.painter_at(rect);
        let track = Rect::from_min_size(
            rect.left_center() - vec2(0.0, TRACK_HEIGHT / 2.0),
            vec2(rect.width(), TRACK_HEIGHT),
        );

        painter.rect_filled(track, TRACK_HEIGHT / 2.0, Color32::from_rgb(68, 68, 68));

        let fraction = fraction.clamp(0.0, 1.0);
        if fraction > 0.0 {
            let filled = Rect::from_min_size(track.min, vec2(track.width() * fraction, TRACK_HEIGHT));
            painter.rect_filled(filled, TRACK_HEIGHT / 2.0, Color32::from_rgb(34, 224, 255));
        }

        let knob_center = track.left_center() + vec2(track.width() * fraction, 0.0);
        painter.circle_filled(knob_center, KNOB_RADIUS, Color32::from_rgb(34, 224, 255));
        painter.circle_stroke(knob_center, KNOB_RADIUS, Stroke::new(2.0, Color32::WHITE));

        painter.text(
            knob_center,
            Align2::CENTER_CENTER,
            "♪",
            FontId::proportional(11.0),
            Color32::from_rgb(10, 10, 10),
        );
    }
}
