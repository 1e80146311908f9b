use eframe::egui::{RichText, Ui};

use crate::util::{format_lifespan, month_label, short_title};

use super::super::ViewModel;
use super::super::lifecycle::LifecycleState;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Site Details");
        ui.add_space(6.0);

        let Some(selected) = &self.selected_point else {
            ui.label("Click a point in the scene to inspect a site.");
            return;
        };
        let Some(point) = self.points.get(selected.index) else {
            ui.label("Selected point no longer exists.");
            return;
        };

        let start_year = self.catalog.horizon.start_year;
        let title = point.title.clone();
        let id = point.id.clone();
        let category = point.category.clone();
        let sub_type = point.sub_type.clone();
        let first_seen = point.first_seen_month;
        let last_seen = point.last_seen_month;
        let state = point.lifecycle_state();
        let pile_slot = point.pile_slot;

        ui.label(RichText::new(short_title(&title)).strong().size(16.0));
        if !id.is_empty() {
            ui.small(id);
        }
        ui.add_space(6.0);

        ui.label(format!("Category: {category} | {sub_type}"));
        ui.label(format!(
            "First seen: {}",
            first_seen.map_or_else(|| "–".to_owned(), |month| month_label(start_year, month))
        ));
        ui.label(format!(
            "Last seen: {}",
            last_seen.map_or_else(|| "–".to_owned(), |month| month_label(start_year, month))
        ));
        ui.label(format!("Lifespan: {}", format_lifespan(first_seen, last_seen)));

        ui.add_space(6.0);
        let state_text = match state {
            LifecycleState::Orbiting => "orbiting",
            LifecycleState::Falling => "falling",
            LifecycleState::Settled => "settled in the pile",
        };
        ui.label(format!("State: {state_text}"));
        if let Some(slot) = pile_slot {
            ui.label(format!(
                "Pile slot: row {} of {}, column {}",
                slot.row + 1,
                slot.total_rows,
                slot.col + 1
            ));
        }

        ui.add_space(10.0);
        if ui.button("Deselect").clicked() {
            self.selected_point = None;
        }
    }
}
