use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{RichText, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use super::super::{SearchMatchCache, SelectionFilter, ViewModel};

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Filters");
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            ui.label("Search:");
            ui.text_edit_singleline(&mut self.search)
                .on_hover_text("Fuzzy-match site titles; matches stay bright in the scene.");
        });

        ui.separator();

        match self.filter.category.clone() {
            None => {
                for category in self.catalog.categories.clone() {
                    if ui.selectable_label(false, category.as_str()).clicked() {
                        self.filter.category = Some(category);
                        self.filter.sub_type = None;
                    }
                }
            }
            Some(category) => {
                if ui.button("← Back").clicked() {
                    self.filter = SelectionFilter::default();
                } else {
                    ui.add_space(4.0);
                    ui.label(RichText::new(category.as_str()).strong().size(18.0));
                    ui.add_space(4.0);

                    let sub_types = self
                        .catalog
                        .sub_types_by_category
                        .get(&category)
                        .map(|set| set.iter().cloned().collect::<Vec<_>>())
                        .unwrap_or_default();
                    for sub_type in sub_types {
                        let active = self.filter.sub_type.as_deref() == Some(sub_type.as_str());
                        if ui.selectable_label(active, sub_type.as_str()).clicked() {
                            self.filter.sub_type = if active { None } else { Some(sub_type) };
                        }
                    }

                    ui.separator();
                    self.draw_category_stats(ui, &category);
                }
            }
        }

        ui.separator();
        ui.checkbox(&mut self.show_connectors, "Connector strings")
            .on_hover_text("Draw the floating strings and links between site points.");
        ui.checkbox(&mut self.show_fps_bar, "FPS display")
            .on_hover_text("Show a live FPS readout in the header.");
    }

    fn draw_category_stats(&self, ui: &mut Ui, category: &str) {
        let Some(stats) = self.catalog.category_stats(category) else {
            ui.label("No sites in this category.");
            return;
        };

        ui.label(format!("Websites: {}", stats.site_count));
        ui.label(format!("Most common type: {}", stats.top_sub_type));
        match stats.average_lifespan_years {
            Some(years) => ui.label(format!("Average lifespan: {years:.1} yrs")),
            None => ui.label("Average lifespan: –"),
        };
        ui.label(format!("Earliest disappeared: {}", stats.earliest_loss_year));
        ui.label(format!("Latest disappeared: {}", stats.latest_loss_year));
        if let Some((year, count)) = stats.peak_loss_year {
            ui.label(format!("Peak year of loss: {year} ({count})"));
        }
    }

    /// Indices of points whose titles fuzzy-match the search box, cached per
    /// query since the point set never changes after load.
    pub(in crate::app) fn cached_search_matches(&mut self) -> Option<Arc<HashSet<usize>>> {
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        if let Some(cached) = &self.search_match_cache
            && cached.query == query
        {
            return Some(Arc::clone(&cached.matches));
        }

        let matcher = SkimMatcherV2::default();
        let matches = self
            .points
            .iter()
            .enumerate()
            .filter_map(|(index, point)| {
                matcher
                    .fuzzy_match(&point.title, query)
                    .map(|_score| index)
            })
            .collect::<HashSet<_>>();
        let matches = Arc::new(matches);

        self.search_match_cache = Some(SearchMatchCache {
            query: query.to_owned(),
            matches: Arc::clone(&matches),
        });

        Some(matches)
    }
}
