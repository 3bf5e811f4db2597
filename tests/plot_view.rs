use std::sync::Arc;
use std::thread;

use track_scatter::model::{
    Context, FeatureRegistry, FocusModel, HighlightModel, ModelGraph, SelectionModel, Units,
    VertexId, ViewContext, demo_lineages, read_model, write_model,
};
use track_scatter::plot::{
    ColorGenerator, FeatureSpecPair, GraphConfig, ItemSource, PlotStyle, PlotView, RebuildOutcome,
    unpack_argb,
};

fn view_over(graph: ModelGraph) -> PlotView {
    PlotView::new(
        graph.into_shared(),
        SelectionModel::new().into_shared(),
        HighlightModel::new().into_shared(),
        FocusModel::new().into_shared(),
        FeatureRegistry::with_defaults(&Units::default()),
    )
}

fn frame_vs_x(item_source: ItemSource) -> GraphConfig {
    GraphConfig {
        x: Some(FeatureSpecPair::vertex("Spot frame", "Spot frame")),
        y: Some(FeatureSpecPair::vertex("Spot position", "X")),
        item_source,
        draw_connected: true,
    }
}

fn assert_aligned(view: &PlotView) {
    let snapshot = view.snapshot();
    let count = snapshot.point_count();
    assert_eq!(view.positions().len(), 2 * count);
    assert_eq!(view.vertex_colors().len(), 4 * count);
    assert_eq!(snapshot.index.len(), count);

    let links = snapshot.edges.len();
    assert_eq!(view.edge_positions().len(), 4 * links);
    assert_eq!(view.edge_indices().len(), 2 * links);
    assert_eq!(view.edge_colors().len(), 8 * links);
}

/// Colors every spot with one packed value.
struct Constant(u32);

impl ColorGenerator for Constant {
    fn vertex_color(&self, _graph: &ModelGraph, _vertex: VertexId) -> u32 {
        self.0
    }

    fn edge_color(
        &self,
        _graph: &ModelGraph,
        _edge: track_scatter::model::EdgeId,
        _source: VertexId,
        _target: VertexId,
    ) -> u32 {
        self.0
    }
}

#[test]
fn every_source_keeps_arrays_aligned() {
    let mut view = view_over(demo_lineages(4, 20, Units::default()).graph);
    {
        let mut selection = write_model(view.selection());
        selection.set_vertex_selected(VertexId(3), true);
        selection.set_vertex_selected(VertexId(40), true);
    }

    for source in ItemSource::ALL {
        view.rebuild_layout(&frame_vs_x(source));
        assert_aligned(&view);
    }

    view.set_context(Some(Arc::new(ViewContext::at(10).with_window(2))));
    view.rebuild_layout(&frame_vs_x(ItemSource::Context));
    assert_aligned(&view);

    let empty = view_over(ModelGraph::new());
    assert_aligned(&empty);
}

#[test]
fn reversed_corners_select_the_same_spots() {
    let mut view = view_over(demo_lineages(3, 30, Units::default()).graph);
    view.rebuild_layout(&frame_vs_x(ItemSource::Context));

    let forward = view.vertices_within(5.0, -1e4, 20.0, 1e4);
    assert!(!forward.is_empty());
    assert_eq!(forward, view.vertices_within(20.0, 1e4, 5.0, -1e4));
    assert_eq!(forward, view.vertices_within(5.0, 1e4, 20.0, -1e4));

    let positions = view.positions();
    let snapshot = view.snapshot();
    for vertex in &forward {
        let slot = snapshot.slot_of(*vertex).expect("plotted");
        let (x, y) = (positions[2 * slot], positions[2 * slot + 1]);
        assert!((5.0..=20.0).contains(&x));
        assert!(y.is_finite());
    }
}

#[test]
fn identical_rebuilds_are_bit_identical() {
    let mut view = view_over(demo_lineages(5, 25, Units::default()).graph);
    write_model(view.selection()).set_vertex_selected(VertexId(7), true);
    let config = frame_vs_x(ItemSource::TrackOfSelection);

    view.rebuild_layout(&config);
    let first = view.snapshot();
    view.rebuild_layout(&config);
    let second = view.snapshot();

    assert!(second.revision > first.revision);
    let bits = |values: &[f32]| values.iter().map(|v| v.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(&first.layout.positions), bits(&second.layout.positions));
    assert_eq!(bits(&first.layout.edge_positions), bits(&second.layout.edge_positions));
    assert_eq!(bits(&first.colors.vertices), bits(&second.colors.vertices));
    assert_eq!(bits(&first.colors.edges), bits(&second.colors.edges));
    assert_eq!(first.vertices, second.vertices);
}

#[test]
fn generator_zero_uses_style_and_selection_wins() {
    let mut graph = ModelGraph::new();
    let a = graph.add_vertex(0, [0.0; 3], 1.0);
    let b = graph.add_vertex(1, [1.0, 0.0, 0.0], 1.0);
    graph.add_edge(a, b);

    let style = PlotStyle::default();
    let mut view = view_over(graph).with_style(style.clone());
    view.rebuild_layout(&frame_vs_x(ItemSource::Context));
    assert_eq!(&view.vertex_colors()[..4], &style.vertex);
    assert_eq!(&view.vertex_colors()[4..], &style.vertex);
    assert_eq!(&view.edge_colors()[..4], &style.edge);

    view.set_color_generator(Arc::new(Constant(0xff20_4060)));
    assert_eq!(&view.vertex_colors()[..4], &unpack_argb(0xff20_4060));

    write_model(view.selection()).set_vertex_selected(b, true);
    view.on_selection_changed();
    assert_eq!(&view.vertex_colors()[..4], &unpack_argb(0xff20_4060));
    assert_eq!(&view.vertex_colors()[4..], &style.selected_vertex);
}

#[test]
fn link_feature_needs_exactly_one_link_in_direction() {
    let mut graph = ModelGraph::new();
    let mother = graph.add_vertex(0, [0.0; 3], 1.0);
    let only_child = graph.add_vertex(1, [3.0, 4.0, 0.0], 1.0);
    let grandchild_a = graph.add_vertex(2, [3.0, 5.0, 0.0], 1.0);
    let grandchild_b = graph.add_vertex(2, [3.0, 2.0, 0.0], 1.0);
    graph.add_edge(mother, only_child);
    graph.add_edge(only_child, grandchild_a);
    graph.add_edge(only_child, grandchild_b);

    let mut view = view_over(graph);
    let config = GraphConfig {
        x: Some(FeatureSpecPair::vertex("Spot frame", "Spot frame")),
        y: Some(FeatureSpecPair::edge(
            "Link displacement",
            "Link displacement",
            false,
        )),
        item_source: ItemSource::Context,
        draw_connected: false,
    };
    view.rebuild_layout(&config);

    let snapshot = view.snapshot();
    let y = |vertex: VertexId| {
        let slot = snapshot.slot_of(vertex).expect("plotted");
        view.positions()[2 * slot + 1]
    };
    assert_eq!(y(mother), 5.0);
    assert!(y(only_child).is_nan());
    assert!(y(grandchild_a).is_nan());
    assert_eq!(snapshot.index.len(), 4);
    assert_eq!(view.vertices_within(-1.0, -100.0, 10.0, 100.0).len(), 1);
    assert_eq!(view.y_label(), "Link displacement (pixel)");
}

#[test]
fn missing_axes_skip_the_rebuild() {
    let mut view = view_over(demo_lineages(2, 10, Units::default()).graph);
    assert!(matches!(
        view.rebuild_layout(&frame_vs_x(ItemSource::Context)),
        RebuildOutcome::Published(_)
    ));
    let before = view.snapshot();

    let unset = GraphConfig::default();
    assert_eq!(view.rebuild_layout(&unset), RebuildOutcome::Skipped);

    let unknown = GraphConfig {
        x: Some(FeatureSpecPair::vertex("Spot mass", "Spot mass")),
        ..GraphConfig::default()
    };
    assert_eq!(view.rebuild_layout(&unknown), RebuildOutcome::Skipped);

    let after = view.snapshot();
    assert_eq!(after.revision, before.revision);
    assert_eq!(view.positions().len(), 2 * before.point_count());
}

#[test]
fn one_unknown_axis_is_plotted_as_undefined() {
    let mut view = view_over(demo_lineages(2, 10, Units::default()).graph);
    let config = GraphConfig {
        x: Some(FeatureSpecPair::vertex("Spot frame", "Spot frame")),
        y: Some(FeatureSpecPair::vertex("Spot mass", "Spot mass")),
        ..GraphConfig::default()
    };
    view.rebuild_layout(&config);

    assert!(view.positions().chunks_exact(2).all(|xy| xy[1].is_nan()));
    assert_eq!(view.y_label(), "");
    assert!(view.vertices_within(-1e9, -1e9, 1e9, 1e9).is_empty());
}

#[test]
fn context_changes_only_follow_context_plots() {
    let graph = demo_lineages(3, 20, Units::default()).graph;
    let at_frame_five = graph
        .vertices()
        .filter(|&v| graph.spot(v).timepoint == 5)
        .count();
    let mut view = view_over(graph);

    view.rebuild_layout(&frame_vs_x(ItemSource::Context));
    let everything = view.snapshot().point_count();
    let context: Arc<dyn Context> = Arc::new(ViewContext::at(5));
    assert!(matches!(
        view.set_context(Some(Arc::clone(&context))),
        RebuildOutcome::Published(_)
    ));
    assert_eq!(view.snapshot().point_count(), at_frame_five);
    assert!(at_frame_five < everything);

    view.rebuild_layout(&frame_vs_x(ItemSource::KeepCurrent));
    assert_eq!(
        view.set_context(Some(Arc::new(ViewContext::at(9)))),
        RebuildOutcome::Skipped
    );
    assert_eq!(view.snapshot().point_count(), at_frame_five);
}

#[test]
fn box_selection_takes_spots_links_and_focus() {
    let mut graph = ModelGraph::new();
    let a = graph.add_vertex(0, [0.0; 3], 1.0);
    let b = graph.add_vertex(1, [1.0, 0.0, 0.0], 1.0);
    let c = graph.add_vertex(2, [10.0, 0.0, 0.0], 1.0);
    let ab = graph.add_edge(a, b);
    let bc = graph.add_edge(b, c);
    let mut view = view_over(graph);
    view.rebuild_layout(&frame_vs_x(ItemSource::Context));

    assert_eq!(view.select_within(1.5, 2.0, -0.5, -1.0, false), 2);
    {
        let selection = read_model(view.selection());
        assert!(selection.is_vertex_selected(a) && selection.is_vertex_selected(b));
        assert!(!selection.is_vertex_selected(c));
        assert!(selection.is_edge_selected(ab));
        assert!(!selection.is_edge_selected(bc));
    }
    assert!(read_model(view.focus()).focused().is_some());
    assert_eq!(&view.vertex_colors()[..4], &view.style().selected_vertex);

    view.select_within(1.5, 9.0, 2.5, 11.0, true);
    assert_eq!(read_model(view.selection()).selected_vertices().len(), 3);

    view.select_within(1.5, 9.0, 2.5, 11.0, false);
    assert_eq!(read_model(view.selection()).selected_vertices().len(), 1);

    assert!(view.clear_selection());
    assert!(read_model(view.selection()).is_empty());
}

#[test]
fn highlight_follows_the_highlight_model() {
    let mut graph = ModelGraph::new();
    let a = graph.add_vertex(3, [2.0, 0.0, 0.0], 1.0);
    let mut view = view_over(graph);
    view.rebuild_layout(&frame_vs_x(ItemSource::Context));
    assert!(view.snapshot().highlight.is_none());

    write_model(view.highlight()).highlight(Some(a));
    view.update_highlight();
    let highlight = view.snapshot().highlight.expect("highlighted spot is plotted");
    assert_eq!(highlight.vertex, a);
    assert_eq!(highlight.position, [3.0, 2.0]);
    assert_eq!(highlight.halo, view.style().highlight_halo);

    assert_eq!(view.nearest_vertex(100.0, 100.0), Some(a));
}

#[test]
fn renderer_sees_whole_snapshots_while_rebuilding() {
    let mut view = view_over(demo_lineages(6, 40, Units::default()).graph);
    let snapshots = view.snapshots();
    write_model(view.selection()).set_vertex_selected(VertexId(0), true);

    let reader = thread::spawn(move || {
        let mut seen = 0;
        for _ in 0..2_000 {
            let snapshot = snapshots.latest();
            let count = snapshot.point_count();
            assert_eq!(snapshot.layout.positions.len(), 2 * count);
            assert_eq!(snapshot.colors.vertices.len(), 4 * count);
            assert_eq!(snapshot.index.len(), count);
            seen = seen.max(snapshot.revision);
        }
        seen
    });

    for round in 0..100 {
        let source = if round % 2 == 0 {
            ItemSource::Context
        } else {
            ItemSource::TrackOfSelection
        };
        view.rebuild_layout(&frame_vs_x(source));
        view.update_colors();
    }

    let seen = reader.join().expect("reader thread");
    assert!(seen <= view.snapshot().revision);
}

#[test]
fn incoming_link_feature_reads_the_parent_link() {
    let mut graph = ModelGraph::new();
    let root = graph.add_vertex(0, [0.0; 3], 1.0);
    let mother = graph.add_vertex(1, [3.0, 4.0, 0.0], 1.0);
    let daughter_a = graph.add_vertex(2, [3.0, 6.0, 0.0], 1.0);
    let daughter_b = graph.add_vertex(2, [3.0, 1.0, 0.0], 1.0);
    graph.add_edge(root, mother);
    graph.add_edge(mother, daughter_a);
    graph.add_edge(mother, daughter_b);

    let mut view = view_over(graph);
    let config = GraphConfig {
        x: Some(FeatureSpecPair::vertex("Spot frame", "Spot frame")),
        y: Some(FeatureSpecPair::edge(
            "Link displacement",
            "Link displacement",
            true,
        )),
        item_source: ItemSource::Context,
        draw_connected: false,
    };
    view.rebuild_layout(&config);

    let snapshot = view.snapshot();
    let y = |vertex: VertexId| {
        let slot = snapshot.slot_of(vertex).expect("plotted");
        view.positions()[2 * slot + 1]
    };
    assert!(y(root).is_nan());
    assert_eq!(y(mother), 5.0);
    assert_eq!(y(daughter_a), 2.0);
    assert_eq!(y(daughter_b), 3.0);
}

#[test]
fn extreme_timepoints_plot_without_overflow() {
    let mut graph = ModelGraph::new();
    let first = graph.add_vertex(i32::MIN, [0.0; 3], 1.0);
    let last = graph.add_vertex(i32::MAX, [1.0, 0.0, 0.0], 1.0);
    graph.add_edge(first, last);

    let mut view = view_over(graph);
    let config = GraphConfig {
        x: Some(FeatureSpecPair::vertex("Spot position", "X")),
        y: Some(FeatureSpecPair::edge("Link delta T", "Link delta T", true)),
        item_source: ItemSource::Context,
        draw_connected: true,
    };
    assert!(matches!(
        view.rebuild_layout(&config),
        RebuildOutcome::Published(_)
    ));
    let snapshot = view.snapshot();
    let slot = snapshot.slot_of(last).expect("plotted");
    assert_eq!(view.positions()[2 * slot + 1], 4_294_967_295.0_f64 as f32);

    view.set_context(Some(Arc::new(ViewContext::at(5))));
    assert_eq!(view.snapshot().point_count(), 0);
    view.set_context(Some(Arc::new(ViewContext::at(i32::MAX))));
    assert_eq!(view.snapshot().point_count(), 1);
}
