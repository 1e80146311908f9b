use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};

use crate::data::{Horizon, SiteCatalog, load_site_catalog};

mod clock;
mod lifecycle;
mod pile;
mod points;
mod render_utils;
mod scene;
mod sync;
mod ui;

use clock::TimelineClock;
use points::{SitePoint, Vec3};
use scene::{Connector, SceneConfig, SelectionFilter};
use sync::MonthChannel;

#[derive(Clone, Debug)]
pub struct VizConfig {
    pub dataset: PathBuf,
    pub start_year: i32,
    pub end_year: i32,
    pub speed_months_per_sec: f64,
    pub dwell_secs: f64,
    pub fall_duration_months: f64,
    pub sync_file: Option<PathBuf>,
}

pub struct SiteFallApp {
    config: VizConfig,
    state: AppState,
    reload_rx: Option<Receiver<Result<SiteCatalog, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<SiteCatalog, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    catalog: SiteCatalog,
    points: Vec<SitePoint>,
    links: Vec<Connector>,
    strings: Vec<Connector>,

    clock: TimelineClock,
    channel: Box<dyn MonthChannel>,
    fall_duration_months: f64,
    scene_config: SceneConfig,

    filter: SelectionFilter,
    selected_point: Option<SelectedPoint>,
    search: String,
    search_match_cache: Option<SearchMatchCache>,

    show_connectors: bool,
    show_fps_bar: bool,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
}

/// A clicked point: its draw position is captured at selection time and held
/// until deselected.
struct SelectedPoint {
    index: usize,
    frozen: Vec3,
}

struct SearchMatchCache {
    query: String,
    matches: Arc<HashSet<usize>>,
}

impl SiteFallApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: VizConfig) -> Self {
        let state = Self::start_load(config.clone());
        Self {
            config,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(config: VizConfig) -> Receiver<Result<SiteCatalog, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let horizon = Horizon::from_years(config.start_year, config.end_year);
            let result =
                load_site_catalog(&config.dataset, horizon).map_err(|error| error.to_string());
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(config: VizConfig) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(config),
        }
    }
}

impl eframe::App for SiteFallApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let now = ctx.input(|input| input.time);
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(catalog) => {
                            AppState::Ready(Box::new(ViewModel::new(catalog, &self.config, now)))
                        }
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading site dataset...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load site dataset");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.config.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, now, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.config.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(match result {
                                Ok(catalog) => AppState::Ready(Box::new(ViewModel::new(
                                    catalog,
                                    &self.config,
                                    now,
                                ))),
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(AppState::Error("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}

impl ViewModel {
    /// Frame pipeline, run once per update before any drawing: apply inbound
    /// sync, advance the clock (handling the horizon dwell/reset), run the
    /// lifecycle pass, project draw positions, then broadcast the month.
    fn advance_frame(&mut self, now: f64) {
        if let Some(month) = self.channel.poll() {
            self.clock.apply_external(month, now);
        }

        if self.clock.tick(now) {
            lifecycle::reset_lifecycle(&mut self.points);
        }

        let clock_value = self.clock.value(now);
        let skip = self.selected_point.as_ref().map(|selected| selected.index);
        lifecycle::update_lifecycle(
            &mut self.points,
            clock_value,
            self.clock.horizon_months(),
            self.fall_duration_months,
            skip,
        );
        scene::advance_draw_positions(
            &mut self.points,
            now,
            &self.scene_config,
            self.selected_point.as_ref(),
        );

        if let Some(month) = self.clock.take_publication(now) {
            self.channel.publish(month);
        }
    }

    fn fallen_count(&self) -> usize {
        self.points.iter().filter(|point| point.has_fallen).count()
    }

    fn qualifying_count(&self) -> usize {
        self.points
            .iter()
            .filter(|point| point.pile_slot.is_some())
            .count()
    }
}
