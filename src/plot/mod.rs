mod color;
mod config;
mod index;
pub mod kdtree;
mod layout;
mod snapshot;
pub mod subset;
mod view;

pub use color::{
    ColorGenerator, FeatureColorGenerator, Highlight, NO_COLOR, NoColorGenerator, PlotColors,
    PlotStyle, Rgba, compute_colors, compute_highlight, edge_color, pack_argb, unpack_argb,
    vertex_color,
};
pub use config::{
    AxisProjection, FeatureSpecPair, FeatureTarget, GraphConfig, ItemSource, axis_label,
};
pub use index::VertexIndex;
pub use layout::{LayoutBounds, PlotLayout, compute_layout};
pub use snapshot::{PlotSnapshot, SnapshotCell};
pub use view::{PlotView, RebuildOutcome};
