//! Compute layer for the grouping engine.
//!
//! - Kd-tree splitting of geometry collections
//! - Point-in-polygon classification
//! - Input validation

pub mod containment;
pub mod kd_tree;
pub mod validation;

pub use containment::PolygonIndex;
pub use kd_tree::{KdTreeSplitter, SpatialSplitter};
