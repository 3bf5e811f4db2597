use std::sync::Arc;

use eframe::egui::{self, Align, Context, Layout, Vec2, vec2};
use log::warn;
use track_scatter::model::{
    Context as PlotContext, FeatureRegistry, FocusModel, HighlightModel, SelectionModel,
    TrackingData, ViewContext, read_model,
};
use track_scatter::plot::{
    ColorGenerator, FeatureColorGenerator, GraphConfig, NoColorGenerator, PlotView, RebuildOutcome,
};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn new(data: TrackingData, config: GraphConfig) -> Self {
        let TrackingData { graph, units } = data;
        let max_timepoint = graph
            .vertices()
            .map(|vertex| graph.spot(vertex).timepoint)
            .max()
            .unwrap_or(0)
            .max(0);

        let plot = PlotView::new(
            graph.into_shared(),
            SelectionModel::new().into_shared(),
            HighlightModel::new().into_shared(),
            FocusModel::new().into_shared(),
            FeatureRegistry::with_defaults(&units),
        );

        let mut model = Self {
            plot,
            units,
            config,
            x_search: String::new(),
            y_search: String::new(),
            color_by: None,
            color_search: String::new(),
            follow_context: false,
            context_timepoint: 0,
            context_window: 0,
            max_timepoint,
            pan: Vec2::ZERO,
            scale: vec2(1.0, 1.0),
            fit_requested: true,
            box_start: None,
            config_pending: false,
            last_rebuild_note: None,
            visible_point_count: 0,
        };
        model.replot();
        model
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        source: &str,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("track-scatter");
                    ui.separator();
                    let (spots, links) = {
                        let graph = read_model(self.plot.graph());
                        (graph.vertex_count(), graph.edge_count())
                    };
                    ui.label(format!("graph: {source}"));
                    ui.label(format!("spots: {spots}"));
                    ui.label(format!("links: {links}"));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload graph"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    if ui.button("Fit view").clicked() {
                        self.fit_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let snapshot = self.plot.snapshot();
                        ui.label(format!(
                            "plotted: {} spots, {} links  |  on screen: {}",
                            snapshot.point_count(),
                            snapshot.edges.len(),
                            self.visible_point_count
                        ));
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(330.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading tracking graph...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_plot(ui);
            }
        });
    }

    pub(in crate::app) fn replot(&mut self) {
        self.config_pending = false;
        match self.plot.rebuild_layout(&self.config) {
            RebuildOutcome::Published(_) => {
                self.fit_requested = true;
                self.last_rebuild_note = None;
            }
            RebuildOutcome::Skipped => {
                self.last_rebuild_note =
                    Some("Nothing plotted: pick a valid feature for at least one axis.".to_owned());
            }
        }
    }

    pub(in crate::app) fn apply_context(&mut self) {
        let context = self.follow_context.then(|| {
            Arc::new(ViewContext::at(self.context_timepoint).with_window(self.context_window))
                as Arc<dyn PlotContext>
        });
        self.plot.set_context(context);
    }

    pub(in crate::app) fn apply_color_by(&mut self) {
        let generator: Arc<dyn ColorGenerator> = match &self.color_by {
            None => Arc::new(NoColorGenerator),
            Some(spec) => match self
                .plot
                .features()
                .vertex_projection(&spec.feature, &spec.projection)
            {
                Ok(projection) => {
                    let graph = read_model(self.plot.graph());
                    Arc::new(FeatureColorGenerator::new(&graph, projection.clone()))
                }
                Err(error) => {
                    warn!("cannot color by {spec}: {error}");
                    Arc::new(NoColorGenerator)
                }
            },
        };
        self.plot.set_color_generator(generator);
    }
}
