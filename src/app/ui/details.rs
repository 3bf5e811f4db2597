use eframe::egui::{RichText, Ui};
use track_scatter::model::{ModelGraph, VertexId, read_model};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Plot Details");
        ui.add_space(6.0);

        let snapshot = self.plot.snapshot();
        let unplaced = snapshot
            .layout
            .positions
            .chunks_exact(2)
            .filter(|xy| !(xy[0].is_finite() && xy[1].is_finite()))
            .count();
        ui.label(format!("X: {}", label_or_dash(&snapshot.x_label)));
        ui.label(format!("Y: {}", label_or_dash(&snapshot.y_label)));
        ui.label(format!("Plotted spots: {}", snapshot.point_count()));
        ui.label(format!("Plotted links: {}", snapshot.edges.len()));
        ui.label(format!("Spots without a value: {unplaced}"))
            .on_hover_text("Undefined on at least one axis, for example a link feature on a spot with several links.");

        ui.separator();
        let (selected_spots, selected_links) = {
            let selection = read_model(self.plot.selection());
            (
                selection.selected_vertices().len(),
                selection.selected_edges().len(),
            )
        };
        ui.label(RichText::new("Selection").strong());
        ui.label(format!("{selected_spots} spots, {selected_links} links"));
        ui.small("Drag to box-select, shift-drag to add, click to clear.");
        if ui.button("Clear selection").clicked() {
            self.plot.clear_selection();
        }

        let focused = read_model(self.plot.focus()).focused();
        let highlighted = read_model(self.plot.highlight()).highlighted();
        let graph = read_model(self.plot.graph());

        ui.separator();
        ui.label(RichText::new("Focused spot").strong());
        match focused {
            Some(vertex) if graph.contains_vertex(vertex) => {
                self.spot_summary(ui, &graph, vertex);
            }
            _ => {
                ui.label("Double-click the plot to focus the nearest spot.");
            }
        }

        ui.separator();
        ui.label(RichText::new("Under the pointer").strong());
        match highlighted {
            Some(vertex) if graph.contains_vertex(vertex) => {
                self.spot_summary(ui, &graph, vertex);
            }
            _ => {
                ui.label("-");
            }
        }
    }

    fn spot_summary(&self, ui: &mut Ui, graph: &ModelGraph, vertex: VertexId) {
        let spot = graph.spot(vertex);
        let space = &self.units.space;
        ui.label(RichText::new(&spot.label).monospace());
        ui.label(format!("Frame: {} {}", spot.timepoint, self.units.time));
        ui.label(format!(
            "Position: ({:.2}, {:.2}, {:.2}) {space}",
            spot.position[0], spot.position[1], spot.position[2]
        ));
        ui.label(format!("Radius: {:.2} {space}", spot.radius));
        ui.label(format!(
            "Links: {} in, {} out",
            graph.incoming_edges(vertex).len(),
            graph.outgoing_edges(vertex).len()
        ));
    }
}

fn label_or_dash(label: &str) -> &str {
    if label.is_empty() { "-" } else { label }
}
