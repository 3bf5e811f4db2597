use eframe::egui::{self, Color32, Painter, PointerButton, Rect, Stroke, Ui, Vec2, vec2};
use log::debug;
use track_scatter::model::{VertexId, write_model};
use track_scatter::plot::PlotSnapshot;

use super::super::ViewModel;
use super::super::render_utils::{draw_box, screen_to_world, world_to_screen};
use super::view::POINT_RADIUS;

const HOVER_SLACK: f32 = 4.0;
const MIN_SCALE: f32 = 1e-6;
const MAX_SCALE: f32 = 1e6;

impl ViewModel {
    pub(in crate::app) fn handle_plot_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = screen_to_world(rect, self.pan, self.scale, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.scale = (self.scale * zoom_factor)
            .max(vec2(MIN_SCALE, MIN_SCALE))
            .min(vec2(MAX_SCALE, MAX_SCALE));
        self.pan = pointer - world_to_screen(rect, Vec2::ZERO, self.scale, world_before);
    }

    pub(in crate::app) fn handle_plot_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(PointerButton::Secondary)
            || response.dragged_by(PointerButton::Middle)
        {
            self.pan += response.drag_delta();
        }
    }

    pub(in crate::app) fn handle_box_selection(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
        painter: &Painter,
    ) {
        if response.drag_started_by(PointerButton::Primary) {
            self.box_start = response.interact_pointer_pos();
        }

        let Some(start) = self.box_start else {
            if response.clicked_by(PointerButton::Primary) && self.plot.clear_selection() {
                ui.ctx().request_repaint();
            }
            return;
        };

        let current = ui
            .input(|input| input.pointer.latest_pos())
            .unwrap_or(start);
        draw_box(
            painter,
            [start, current],
            Stroke::new(1.0, Color32::from_rgb(103, 196, 255)),
        );

        if response.drag_stopped_by(PointerButton::Primary) {
            self.box_start = None;
            let add = ui.input(|input| input.modifiers.shift);
            let a = screen_to_world(rect, self.pan, self.scale, start);
            let b = screen_to_world(rect, self.pan, self.scale, current);
            let count = self.plot.select_within(
                f64::from(a.x),
                f64::from(a.y),
                f64::from(b.x),
                f64::from(b.y),
                add,
            );
            debug!("box selection picked {count} spots");
        } else if !response.dragged_by(PointerButton::Primary) {
            self.box_start = None;
        }
        ui.ctx().request_repaint();
    }

    pub(in crate::app) fn handle_hover(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
        snapshot: &PlotSnapshot,
    ) {
        let reach = POINT_RADIUS + HOVER_SLACK;
        let hovered = response
            .hover_pos()
            .filter(|_| self.box_start.is_none())
            .and_then(|pointer| {
                let a = screen_to_world(rect, self.pan, self.scale, pointer - vec2(reach, reach));
                let b = screen_to_world(rect, self.pan, self.scale, pointer + vec2(reach, reach));
                self.plot
                    .vertices_within(
                        f64::from(a.x),
                        f64::from(a.y),
                        f64::from(b.x),
                        f64::from(b.y),
                    )
                    .into_iter()
                    .filter_map(|vertex| {
                        let position = snapshot.layout.position(snapshot.slot_of(vertex)?)?;
                        let screen =
                            world_to_screen(rect, self.pan, self.scale, Vec2::from(position));
                        let distance = screen.distance(pointer);
                        (distance <= reach).then_some((vertex, distance))
                    })
                    .min_by(|a, b| a.1.total_cmp(&b.1))
                    .map(|(vertex, _)| vertex)
            });

        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }
        self.set_highlighted(hovered);
    }

    pub(in crate::app) fn handle_focus_nearest(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.double_clicked_by(PointerButton::Primary) {
            return;
        }
        let Some(pointer) = response.interact_pointer_pos() else {
            return;
        };

        let world = screen_to_world(rect, self.pan, self.scale, pointer);
        let Some(vertex) = self
            .plot
            .nearest_vertex(f64::from(world.x), f64::from(world.y))
        else {
            return;
        };

        write_model(self.plot.focus()).focus(Some(vertex));
        let snapshot = self.plot.snapshot();
        if let Some(position) = snapshot
            .slot_of(vertex)
            .and_then(|slot| snapshot.layout.position(slot))
        {
            self.pan = -(world_to_screen(rect, Vec2::ZERO, self.scale, Vec2::from(position))
                - rect.center());
        }
        ui.ctx().request_repaint();
    }

    pub(in crate::app) fn set_highlighted(&mut self, vertex: Option<VertexId>) {
        if write_model(self.plot.highlight()).highlight(vertex) {
            self.plot.update_highlight();
        }
    }
}
