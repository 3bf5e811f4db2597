use eframe::egui::{Align2, Color32, FontId, Painter, Rect, Sense, Stroke, Ui, vec2};
use track_scatter::model::read_model;
use track_scatter::plot::PlotSnapshot;

use super::super::ViewModel;
use super::super::render_utils::{
    AXIS_TEXT, circle_visible, draw_background, edge_visible, fit_view, rgba_color, style_color,
    world_to_screen,
};

pub(in crate::app) const POINT_RADIUS: f32 = 3.5;
const HIGHLIGHT_RADIUS: f32 = 5.5;
const HALO_RADIUS: f32 = 10.0;
const FIT_MARGIN: f32 = 56.0;

impl ViewModel {
    pub(in crate::app) fn draw_plot(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        draw_background(&painter, rect);

        let snapshot = self.plot.snapshot();
        if self.fit_requested {
            if let Some(bounds) = snapshot.layout.bounds {
                (self.pan, self.scale) = fit_view(
                    rect,
                    vec2(bounds.min_x, bounds.min_y),
                    vec2(bounds.max_x, bounds.max_y),
                    FIT_MARGIN,
                );
            }
            self.fit_requested = false;
        }

        self.handle_plot_zoom(ui, rect, &response);
        self.handle_plot_pan(&response);
        self.draw_axes(&painter, rect, &snapshot);

        if snapshot.point_count() == 0 {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                self.empty_plot_text(),
                FontId::proportional(14.0),
                AXIS_TEXT,
            );
        }

        let pan = self.pan;
        let scale = self.scale;
        let layout = &snapshot.layout;
        let colors = &snapshot.colors;

        for pair in layout.edge_indices.chunks_exact(2) {
            let (start, end) = (pair[0] as usize, pair[1] as usize);
            let (Some(source), Some(target)) = (
                layout.edge_positions.get(2 * start..2 * start + 2),
                layout.edge_positions.get(2 * end..2 * end + 2),
            ) else {
                continue;
            };
            if !source.iter().chain(target).all(|c| c.is_finite()) {
                continue;
            }

            let from = world_to_screen(rect, pan, scale, vec2(source[0], source[1]));
            let to = world_to_screen(rect, pan, scale, vec2(target[0], target[1]));
            if !edge_visible(rect, from, to, 1.0) {
                continue;
            }
            let color = colors
                .edges
                .get(4 * start..4 * start + 4)
                .map_or(Color32::GRAY, rgba_color);
            painter.line_segment([from, to], Stroke::new(1.2, color));
        }

        let mut visible_points = 0usize;
        for (slot, xy) in layout.positions.chunks_exact(2).enumerate() {
            if !(xy[0].is_finite() && xy[1].is_finite()) {
                continue;
            }
            let position = world_to_screen(rect, pan, scale, vec2(xy[0], xy[1]));
            if !circle_visible(rect, position, POINT_RADIUS) {
                continue;
            }
            let color = colors
                .vertices
                .get(4 * slot..4 * slot + 4)
                .map_or(Color32::GRAY, rgba_color);
            painter.circle_filled(position, POINT_RADIUS, color);
            visible_points += 1;
        }
        self.visible_point_count = visible_points;

        if let Some(highlight) = snapshot.highlight {
            let position = world_to_screen(
                rect,
                pan,
                scale,
                vec2(highlight.position[0], highlight.position[1]),
            );
            painter.circle_filled(position, HALO_RADIUS, style_color(highlight.halo));
            painter.circle_filled(position, HIGHLIGHT_RADIUS, style_color(highlight.color));
            painter.circle_stroke(
                position,
                HIGHLIGHT_RADIUS,
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 190)),
            );
        }

        self.handle_box_selection(ui, rect, &response, &painter);
        self.handle_hover(ui, rect, &response, &snapshot);
        self.handle_focus_nearest(ui, rect, &response);
        self.draw_hover_text(&painter, rect, &snapshot);
    }

    fn empty_plot_text(&self) -> &'static str {
        if self.plot.config().is_none() {
            "Pick at least one axis and press Plot."
        } else {
            "No spots in the current subset."
        }
    }

    fn draw_hover_text(&self, painter: &Painter, rect: Rect, snapshot: &PlotSnapshot) {
        let Some(highlight) = snapshot.highlight else {
            return;
        };

        let graph = read_model(self.plot.graph());
        if !graph.contains_vertex(highlight.vertex) {
            return;
        }
        let spot = graph.spot(highlight.vertex);
        let text = format!(
            "{}  |  t {}  |  x {:.3}  y {:.3}",
            spot.label, spot.timepoint, highlight.position[0], highlight.position[1]
        );
        drop(graph);

        painter.text(
            rect.left_top() + vec2(10.0, 10.0),
            Align2::LEFT_TOP,
            text,
            FontId::proportional(13.0),
            Color32::from_gray(240),
        );
    }
}
