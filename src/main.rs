mod app;
mod data;
mod util;

use std::path::PathBuf;

use clap::Parser;

use app::{SiteFallApp, VizConfig};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// CSV dataset of archived sites.
    #[arg(default_value = "sites.csv")]
    dataset: PathBuf,

    #[arg(long, default_value_t = 1996)]
    start_year: i32,

    #[arg(long, default_value_t = 2024)]
    end_year: i32,

    /// Autoplay speed in months per second.
    #[arg(long, default_value_t = 2.0)]
    speed: f64,

    /// Seconds to hold at the end of the timeline before restarting.
    #[arg(long, default_value_t = 70.0)]
    dwell_secs: f64,

    /// How many timeline months one fall animation spans.
    #[arg(long, default_value_t = 2.4)]
    fall_duration: f64,

    /// Shared file for keeping several instances on the same month.
    #[arg(long)]
    sync_file: Option<PathBuf>,
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();
    let config = VizConfig {
        dataset: args.dataset,
        start_year: args.start_year,
        end_year: args.end_year.max(args.start_year),
        speed_months_per_sec: args.speed.max(0.001),
        dwell_secs: args.dwell_secs.max(0.0),
        fall_duration_months: args.fall_duration.max(0.1),
        sync_file: args.sync_file,
    };

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "sitefall",
        options,
        Box::new(move |cc| Ok(Box::new(SiteFallApp::new(cc, config)))),
    )
}
