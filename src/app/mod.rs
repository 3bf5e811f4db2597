use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::Context as _;
use eframe::egui::{self, Context, Pos2, Vec2};
use track_scatter::model::{TrackingData, Units, demo_lineages, load_tracking_file};
use track_scatter::plot::{FeatureSpecPair, GraphConfig, PlotView};

mod canvas;
mod render_utils;
mod ui;

#[derive(Clone, Debug)]
pub enum GraphSource {
    File(PathBuf),
    Demo {
        tracks: usize,
        frames: usize,
        units: Units,
    },
}

impl GraphSource {
    fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Demo { tracks, frames, .. } => {
                format!("demo ({tracks} tracks, {frames} frames)")
            }
        }
    }

    fn load(&self) -> anyhow::Result<TrackingData> {
        match self {
            Self::File(path) => load_tracking_file(path)
                .with_context(|| format!("failed to load tracking graph {}", path.display())),
            Self::Demo {
                tracks,
                frames,
                units,
            } => Ok(demo_lineages(*tracks, *frames, units.clone())),
        }
    }
}

pub struct TrackScatterApp {
    source: GraphSource,
    initial_config: GraphConfig,
    state: AppState,
    reload_rx: Option<Receiver<Result<TrackingData, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<TrackingData, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    plot: PlotView,
    units: Units,
    config: GraphConfig,
    x_search: String,
    y_search: String,
    color_by: Option<FeatureSpecPair>,
    color_search: String,
    follow_context: bool,
    context_timepoint: i32,
    context_window: i32,
    max_timepoint: i32,
    pan: Vec2,
    scale: Vec2,
    fit_requested: bool,
    box_start: Option<Pos2>,
    config_pending: bool,
    last_rebuild_note: Option<String>,
    visible_point_count: usize,
}

impl TrackScatterApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        source: GraphSource,
        initial_config: GraphConfig,
    ) -> Self {
        let state = Self::start_load(source.clone());
        Self {
            source,
            initial_config,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(source: GraphSource) -> Receiver<Result<TrackingData, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = source.load().map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(source: GraphSource) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(source),
        }
    }

    fn ready(data: TrackingData, config: GraphConfig) -> AppState {
        AppState::Ready(Box::new(ViewModel::new(data, config)))
    }
}

impl eframe::App for TrackScatterApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(data) => Self::ready(data, self.initial_config.clone()),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading tracking graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
                ctx.request_repaint();
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load tracking graph");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.source.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(
                    ctx,
                    &self.source.describe(),
                    &mut reload_requested,
                    is_reloading,
                );

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.source.clone()));
                }

                let config = model.config.clone();
                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(match result {
                                Ok(data) => Self::ready(data, config),
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
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
