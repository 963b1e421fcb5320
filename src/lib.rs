//! Spatial grouping engine for tile generation.
//!
//! Partitions a large collection of geometries into spatially coherent groups,
//! each destined to become one tile:
//!
//! - **Kd-tree split**: balanced recursive median split bounded by a maximum
//!   group size
//! - **Polygon grouping**: geometries are grouped by the GeoJSON polygon that
//!   contains their centroid, then consolidated by a grid merge that keeps
//!   polygon groups and plain groups apart
//!
//! ```rust
//! use tilegroup::{GeometryCollection, GroupingConfig, GroupingEngine, Point3d};
//!
//! let geometries: GeometryCollection<Point3d> = (0..2000)
//!     .map(|i| Point3d::new((i % 50) as f64, (i / 50) as f64, 0.0))
//!     .collect();
//!
//! let engine = GroupingEngine::new(GroupingConfig::default())?;
//! let groups = engine.group(geometries, None)?;
//! assert!(groups.iter().all(|g| g.len() <= 500));
//! # Ok::<(), tilegroup::TileGroupError>(())
//! ```

pub mod catalog;
pub mod collection;
pub mod compute;
pub mod config;
pub mod engine;
pub mod error;
pub mod group;

pub use catalog::{PolygonCatalog, load_polygons, rings_from_geojson};
pub use collection::{Geometry, GeometryCollection, PointGeometry};
pub use compute::{KdTreeSplitter, PolygonIndex, SpatialSplitter};
pub use config::{CatalogOptions, FileMatch, GroupingConfig, MalformedPolicy};
pub use engine::{GroupingEngine, merge_groups_in_cells, partition_by_polygons};
pub use error::{Result, TileGroupError};
pub use group::{CellKey, Group};

pub use tilegroup_types::point::Point3d;
pub use tilegroup_types::polygon::PolygonRing;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {
    pub use crate::{
        Geometry, GeometryCollection, Group, GroupingConfig, GroupingEngine, Point3d,
        PolygonCatalog, PolygonRing, Result, TileGroupError,
    };
}
