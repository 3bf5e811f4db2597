mod app;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context as _, anyhow};
use clap::Parser;
use track_scatter::model::Units;
use track_scatter::plot::{FeatureSpecPair, GraphConfig};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Tracking graph as JSON. Without it a synthetic lineage is shown.
    #[arg(long)]
    graph: Option<PathBuf>,

    /// Initial plot configuration as JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 12)]
    demo_tracks: usize,

    #[arg(long, default_value_t = 60)]
    demo_frames: usize,

    #[arg(long, default_value = "µm")]
    space_units: String,

    #[arg(long, default_value = "frame")]
    time_units: String,
}

impl Args {
    fn source(&self) -> app::GraphSource {
        match &self.graph {
            Some(path) => app::GraphSource::File(path.clone()),
            None => app::GraphSource::Demo {
                tracks: self.demo_tracks,
                frames: self.demo_frames,
                units: Units {
                    space: self.space_units.clone(),
                    time: self.time_units.clone(),
                },
            },
        }
    }
}

fn read_config(path: Option<&PathBuf>) -> anyhow::Result<GraphConfig> {
    let Some(path) = path else {
        return Ok(GraphConfig {
            x: Some(FeatureSpecPair::vertex("Spot frame", "Spot frame")),
            y: Some(FeatureSpecPair::vertex("Spot position", "X")),
            draw_connected: true,
            ..GraphConfig::default()
        });
    };

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read plot config {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse plot config {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = read_config(args.config.as_ref())?;
    let source = args.source();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "track-scatter",
        options,
        Box::new(move |cc| Ok(Box::new(app::TrackScatterApp::new(cc, source, config)))),
    )
    .map_err(|error| anyhow!("viewer failed: {error}"))
}
