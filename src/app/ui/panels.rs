use std::collections::VecDeque;

use eframe::egui::{self, Align, Context, Layout};

use crate::data::SiteCatalog;
use crate::util::month_label;

use super::super::sync::{FileMonthChannel, MonthChannel, NullMonthChannel};
use super::super::{
    SceneConfig, SelectionFilter, TimelineClock, ViewModel, VizConfig, pile, points, scene,
};

impl ViewModel {
    pub(in crate::app) fn new(catalog: SiteCatalog, config: &VizConfig, now: f64) -> Self {
        let mut rng = rand::thread_rng();
        let mut points = points::create_points(&catalog.sites, &mut rng);
        pile::assign_pile_slots(&mut points, catalog.horizon.months);
        let (links, strings) = scene::build_connectors(points.len(), &mut rng);

        let clock = TimelineClock::new(
            catalog.horizon.months,
            config.speed_months_per_sec,
            config.dwell_secs,
            now,
        );
        let channel: Box<dyn MonthChannel> = match &config.sync_file {
            Some(path) => Box::new(FileMonthChannel::new(path.clone())),
            None => Box::new(NullMonthChannel),
        };

        Self {
            catalog,
            points,
            links,
            strings,
            clock,
            channel,
            fall_duration_months: config.fall_duration_months,
            scene_config: SceneConfig::default(),
            filter: SelectionFilter::default(),
            selected_point: None,
            search: String::new(),
            search_match_cache: None,
            show_connectors: true,
            show_fps_bar: true,
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        now: f64,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        self.update_fps_counter(ctx);
        self.advance_frame(now);
        let clock_value = self.clock.value(now);

        let start_year = self.catalog.horizon.start_year;
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("sitefall");
                    ui.separator();
                    ui.label(format!(
                        "{} – {}",
                        month_label(start_year, 0),
                        month_label(start_year, self.catalog.horizon.last_month()),
                    ));
                    ui.label(format!("sites: {}", self.catalog.site_count()));
                    ui.label(format!("categories: {}", self.catalog.categories.len()));
                    ui.label(format!(
                        "fallen: {}/{}",
                        self.fallen_count(),
                        self.qualifying_count()
                    ));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload dataset"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(fps_text) = self.fps_display_text() {
                            ui.label(fps_text);
                        }
                    });
                });
            });

        egui::TopBottomPanel::bottom("timeline")
            .resizable(false)
            .show(ctx, |ui| self.draw_timeline(ui, now));

        egui::SidePanel::left("filters")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Loading site dataset...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_scene(ui, now, clock_value);
            }
        });

        // The timeline and wobble never stop moving.
        ctx.request_repaint();
    }
}
