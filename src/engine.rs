//! Grouping engine: turns a geometry collection into tile groups.
//!
//! Two strategies are available:
//!
//! 1. **Kd-tree split** (no polygons): the collection is split into pieces of
//!    at most `max_group_size` geometries and each piece becomes a plain group.
//!    No merge pass runs.
//! 2. **Polygon containment**: each geometry goes to the first polygon whose
//!    interior holds its centroid. Geometries inside the same polygon form one
//!    polygon group; every other geometry becomes a singleton plain group.
//!    The grid-merge pass then coalesces groups falling in the same grid cell,
//!    never mixing polygon groups with plain ones.
//!
//! ## Example
//!
//! ```rust
//! use tilegroup::{GeometryCollection, GroupingConfig, GroupingEngine, Point3d, PolygonRing};
//!
//! let square = PolygonRing::new(vec![
//!     Point3d::new(-10.0, -10.0, 0.0),
//!     Point3d::new(10.0, -10.0, 0.0),
//!     Point3d::new(10.0, 10.0, 0.0),
//!     Point3d::new(-10.0, 10.0, 0.0),
//! ])
//! .unwrap();
//!
//! let geometries = GeometryCollection::new(vec![
//!     Point3d::new(0.0, 0.0, 0.0),
//!     Point3d::new(1.0, 1.0, 0.0),
//!     Point3d::new(400.0, 400.0, 0.0),
//! ]);
//!
//! let engine = GroupingEngine::new(GroupingConfig::default())?;
//! let groups = engine.group_by_polygons(geometries, &[square])?;
//! assert_eq!(groups.len(), 2);
//! # Ok::<(), tilegroup::TileGroupError>(())
//! ```

use crate::catalog::PolygonCatalog;
use crate::collection::{Geometry, GeometryCollection};
use crate::compute::containment::PolygonIndex;
use crate::compute::kd_tree::{KdTreeSplitter, SpatialSplitter};
use crate::compute::validation::{validate_cell_size, validate_centroids};
use crate::config::GroupingConfig;
use crate::error::{Result, TileGroupError};
use crate::group::{CellKey, Group};
use rustc_hash::FxHashMap;
use std::path::Path;
use tilegroup_types::polygon::PolygonRing;

/// Orchestrates kd-tree grouping, polygon grouping and the grid merge.
///
/// The engine holds configuration only; every call works on its own input
/// and returns freshly built groups.
#[derive(Debug, Clone)]
pub struct GroupingEngine<S = KdTreeSplitter> {
    config: GroupingConfig,
    catalog: PolygonCatalog,
    splitter: S,
}

impl GroupingEngine<KdTreeSplitter> {
    /// Create an engine using the built-in kd-tree splitter.
    pub fn new(config: GroupingConfig) -> Result<Self> {
        config.validate().map_err(TileGroupError::Config)?;
        Ok(Self {
            catalog: PolygonCatalog::new(config.catalog.clone()),
            config,
            splitter: KdTreeSplitter,
        })
    }
}

impl<S> GroupingEngine<S> {
    /// Replace the spatial splitter used when no polygons are given.
    pub fn with_splitter<T>(self, splitter: T) -> GroupingEngine<T> {
        GroupingEngine {
            config: self.config,
            catalog: self.catalog,
            splitter,
        }
    }

    pub fn config(&self) -> &GroupingConfig {
        &self.config
    }

    pub fn catalog(&self) -> &PolygonCatalog {
        &self.catalog
    }

    /// Group `collection`, by polygons when `polygon_dir` is given and by
    /// kd-tree split otherwise.
    pub fn group<G>(
        &self,
        collection: GeometryCollection<G>,
        polygon_dir: Option<&Path>,
    ) -> Result<Vec<Group<G>>>
    where
        G: Geometry,
        S: SpatialSplitter<G>,
    {
        match polygon_dir {
            Some(dir) => self.group_from_directory(collection, dir),
            None => self.group_by_kd_tree(collection),
        }
    }

    /// Split the collection with the spatial splitter; one plain group per piece.
    pub fn group_by_kd_tree<G>(&self, collection: GeometryCollection<G>) -> Result<Vec<Group<G>>>
    where
        G: Geometry,
        S: SpatialSplitter<G>,
    {
        let total = collection.len();
        let groups = self
            .splitter
            .split(collection, self.config.max_group_size)?
            .into_iter()
            .filter(|piece| !piece.is_empty())
            .map(Group::new)
            .collect::<Result<Vec<_>>>()?;

        log::debug!("Split {} geometries into {} groups", total, groups.len());
        Ok(groups)
    }

    /// Load polygons from `dir` and group by containment.
    pub fn group_from_directory<G: Geometry>(
        &self,
        collection: GeometryCollection<G>,
        dir: &Path,
    ) -> Result<Vec<Group<G>>> {
        let rings = self.catalog.load(dir)?;
        self.group_by_polygons(collection, &rings)
    }

    /// Group by polygon containment, then run the grid merge.
    pub fn group_by_polygons<G: Geometry>(
        &self,
        collection: GeometryCollection<G>,
        rings: &[PolygonRing],
    ) -> Result<Vec<Group<G>>> {
        let groups = partition_by_polygons(collection, rings)?;
        merge_groups_in_cells(groups, self.config.cell_size)
    }
}

/// Distribute geometries into polygon groups and singleton plain groups.
///
/// Polygon groups come first, in the order their polygon was first hit, and
/// are followed by one singleton per unassigned geometry in input order. No
/// merging happens here.
pub fn partition_by_polygons<G: Geometry>(
    collection: GeometryCollection<G>,
    rings: &[PolygonRing],
) -> Result<Vec<Group<G>>> {
    let centroids = collection.centroids();
    validate_centroids(&centroids)?;

    let index = PolygonIndex::new(rings);
    let assignments = index.classify(&centroids);

    let mut slots: FxHashMap<usize, usize> = FxHashMap::default();
    let mut buckets: Vec<(usize, Vec<G>)> = Vec::new();
    let mut unassigned: Vec<G> = Vec::new();

    for (geometry, assignment) in collection.into_iter().zip(assignments) {
        match assignment {
            Some(polygon) => {
                let slot = *slots.entry(polygon).or_insert_with(|| {
                    buckets.push((polygon, Vec::new()));
                    buckets.len() - 1
                });
                buckets[slot].1.push(geometry);
            }
            None => unassigned.push(geometry),
        }
    }

    log::debug!(
        "{} polygons hold geometries, {} geometries outside every polygon",
        buckets.len(),
        unassigned.len()
    );

    let mut groups = Vec::with_capacity(buckets.len() + unassigned.len());
    for (polygon, members) in buckets {
        let ring = rings[polygon].points().to_vec();
        groups.push(Group::with_polygon(GeometryCollection::new(members), ring)?);
    }
    for geometry in unassigned {
        groups.push(Group::new(GeometryCollection::new(vec![geometry]))?);
    }
    Ok(groups)
}

/// Merge groups whose centroids round to the same grid cell.
///
/// Groups are bucketed by `(rounded centroid, has_polygon)`; each bucket turns
/// into exactly one group via [`Group::merge`]. Buckets are emitted in the
/// order their first group appeared, but callers should rely on contents only.
///
/// # Errors
///
/// `InvalidCellSize` if `cell_size` is not finite and positive. Nothing is
/// merged in that case.
pub fn merge_groups_in_cells<G: Geometry>(
    groups: Vec<Group<G>>,
    cell_size: f64,
) -> Result<Vec<Group<G>>> {
    validate_cell_size(cell_size)?;

    let input = groups.len();
    let mut slots: FxHashMap<CellKey, usize> = FxHashMap::default();
    let mut cells: Vec<Vec<Group<G>>> = Vec::new();

    for group in groups {
        let key = group.cell_key(cell_size)?;
        let slot = *slots.entry(key).or_insert_with(|| {
            cells.push(Vec::new());
            cells.len() - 1
        });
        cells[slot].push(group);
    }

    let merged = cells
        .into_iter()
        .map(Group::merge)
        .collect::<Result<Vec<_>>>()?;

    log::debug!(
        "Grid merge (cell size {}) reduced {} groups to {}",
        cell_size,
        input,
        merged.len()
    );
    Ok(merged)
}
