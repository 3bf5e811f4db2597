//! Feature scatter plot over cell-tracking graphs.
//!
//! [`model`] holds the tracking graph and the models shared with other
//! views; [`plot`] turns a subset of the graph into a point cloud, a spatial
//! index and colors.

pub mod model;
pub mod plot;
pub mod util;
