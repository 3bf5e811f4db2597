mod context;
mod features;
mod graph;
mod load;
mod selection;

pub use context::{Context, Region, ViewContext};
pub use features::{FeatureError, FeatureRegistry, Projection, Units};
pub use graph::{EdgeId, Link, ModelGraph, SharedGraph, Spot, VertexId};
pub use load::{LoadError, TrackingData, demo_lineages, load_tracking_file, parse_tracking_json};
pub use selection::{
    FocusModel, HighlightModel, SelectionModel, SharedFocus, SharedHighlight, SharedSelection,
};
pub use selection::{read_model, write_model};
