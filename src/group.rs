//! Tile groups: clusters of geometries destined for a single tile.
//!
//! A group built from polygon containment remembers the ring of the polygon
//! it came from. When polygon groups are merged, every source ring is kept and
//! the merged group records which of its geometries came from which ring.

use crate::collection::{Geometry, GeometryCollection};
use crate::compute::validation::validate_cell_size;
use crate::error::{Result, TileGroupError};
use tilegroup_types::point::Point3d;

/// Merge-grid bucket: integer cell coordinates plus the polygon flag.
///
/// Cell `[i, j, k]` is centered on `cell_size * [i, j, k]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellKey {
    pub cell: [i64; 3],
    pub has_polygon: bool,
}

impl CellKey {
    /// World-space center of this cell.
    pub fn center(&self, cell_size: f64) -> Point3d {
        let [i, j, k] = self.cell;
        Point3d::new(
            cell_size * i as f64,
            cell_size * j as f64,
            cell_size * k as f64,
        )
    }
}

/// Index of the grid cell nearest to `coordinate`, ties going to the even cell.
fn cell_index(coordinate: f64, cell_size: f64) -> f64 {
    (coordinate / cell_size).round_ties_even()
}

/// A cluster of geometries, optionally carrying polygon metadata.
///
/// Groups are immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Group<G> {
    geometries: GeometryCollection<G>,
    centroid: Point3d,
    has_polygon: bool,
    polygon_point_sets: Vec<Vec<Point3d>>,
    member_polygon_index: Vec<Vec<usize>>,
}

impl<G: Geometry> Group<G> {
    /// A plain group with no polygon attached.
    pub fn new(geometries: GeometryCollection<G>) -> Result<Self> {
        let centroid = geometries.centroid().ok_or(TileGroupError::EmptyGroup)?;
        Ok(Self {
            geometries,
            centroid,
            has_polygon: false,
            polygon_point_sets: Vec::new(),
            member_polygon_index: Vec::new(),
        })
    }

    /// A group made of the geometries found inside one polygon.
    ///
    /// `ring` is the polygon's open exterior ring. Every geometry is recorded
    /// as belonging to that ring.
    pub fn with_polygon(geometries: GeometryCollection<G>, ring: Vec<Point3d>) -> Result<Self> {
        let centroid = geometries.centroid().ok_or(TileGroupError::EmptyGroup)?;
        let members = (0..geometries.len()).collect();
        Ok(Self {
            geometries,
            centroid,
            has_polygon: true,
            polygon_point_sets: vec![ring],
            member_polygon_index: vec![members],
        })
    }

    /// Merge groups that share a polygon flag into one group.
    ///
    /// Geometries are concatenated in the order of `parts`. For polygon groups
    /// the point sets are concatenated too, and each member index entry is
    /// shifted to the position its geometries now occupy.
    ///
    /// ```rust
    /// use tilegroup::{Group, GeometryCollection, Point3d};
    ///
    /// let ring = vec![
    ///     Point3d::new(0.0, 0.0, 0.0),
    ///     Point3d::new(9.0, 0.0, 0.0),
    ///     Point3d::new(9.0, 9.0, 0.0),
    /// ];
    /// let a = Group::with_polygon(
    ///     GeometryCollection::new(vec![Point3d::new(6.0, 1.0, 0.0), Point3d::new(7.0, 2.0, 0.0)]),
    ///     ring.clone(),
    /// )?;
    /// let b = Group::with_polygon(
    ///     GeometryCollection::new(vec![Point3d::new(8.0, 1.0, 0.0)]),
    ///     ring,
    /// )?;
    ///
    /// let merged = Group::merge(vec![a, b])?;
    /// assert_eq!(merged.len(), 3);
    /// assert_eq!(merged.polygon_point_sets().len(), 2);
    /// assert_eq!(merged.member_polygon_index(), &[vec![0, 1], vec![2]]);
    /// # Ok::<(), tilegroup::TileGroupError>(())
    /// ```
    pub fn merge(parts: Vec<Group<G>>) -> Result<Self> {
        let has_polygon = match parts.first() {
            Some(first) => first.has_polygon,
            None => return Err(TileGroupError::EmptyGroup),
        };
        if parts.iter().any(|g| g.has_polygon != has_polygon) {
            return Err(TileGroupError::InvalidInput(
                "Cannot merge polygon groups with plain groups".to_string(),
            ));
        }

        let mut collections = Vec::with_capacity(parts.len());
        let mut polygon_point_sets: Vec<Vec<Point3d>> = Vec::new();
        let mut member_polygon_index: Vec<Vec<usize>> = Vec::new();
        let mut offset = 0usize;

        for part in parts {
            if has_polygon {
                polygon_point_sets.extend(part.polygon_point_sets);
                member_polygon_index.extend(part.member_polygon_index.into_iter().map(|members| {
                    members
                        .into_iter()
                        .map(|i| i + offset)
                        .collect::<Vec<_>>()
                }));
            }
            offset += part.geometries.len();
            collections.push(part.geometries);
        }

        let geometries = GeometryCollection::concat(collections);
        let centroid = geometries.centroid().ok_or(TileGroupError::EmptyGroup)?;
        Ok(Self {
            geometries,
            centroid,
            has_polygon,
            polygon_point_sets,
            member_polygon_index,
        })
    }
}

impl<G> Group<G> {
    /// Centroid of the owned collection.
    pub fn centroid(&self) -> Point3d {
        self.centroid
    }

    /// Centroid snapped to the nearest point of a `cell_size` grid.
    ///
    /// Each axis becomes `cell_size * round(coordinate / cell_size)`, with
    /// halfway values going to the even multiple.
    ///
    /// ```rust
    /// use tilegroup::{Group, GeometryCollection, Point3d};
    ///
    /// let group = Group::new(GeometryCollection::new(vec![Point3d::new(149.0, 451.0, -20.0)]))?;
    /// assert_eq!(group.rounded_centroid(300.0)?, Point3d::new(0.0, 600.0, 0.0));
    /// assert!(group.rounded_centroid(0.0).is_err());
    /// # Ok::<(), tilegroup::TileGroupError>(())
    /// ```
    pub fn rounded_centroid(&self, cell_size: f64) -> Result<Point3d> {
        validate_cell_size(cell_size)?;
        let [x, y, z] = self
            .centroid
            .coords()
            .map(|c| cell_size * cell_index(c, cell_size));
        Ok(Point3d::new(x, y, z))
    }

    /// Merge-grid key of this group.
    pub fn cell_key(&self, cell_size: f64) -> Result<CellKey> {
        validate_cell_size(cell_size)?;
        // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
        const LIMIT: f64 = i64::MAX as f64;

        let mut cell = [0i64; 3];
        for (slot, c) in cell.iter_mut().zip(self.centroid.coords()) {
            let index = cell_index(c, cell_size);
            if !(-LIMIT..LIMIT).contains(&index) {
                return Err(TileGroupError::InvalidInput(format!(
                    "Centroid coordinate {} is out of grid range for cell size {}",
                    c, cell_size
                )));
            }
            *slot = index as i64;
        }
        Ok(CellKey {
            cell,
            has_polygon: self.has_polygon,
        })
    }

    pub fn geometries(&self) -> &GeometryCollection<G> {
        &self.geometries
    }

    pub fn into_geometries(self) -> GeometryCollection<G> {
        self.geometries
    }

    pub fn has_polygon(&self) -> bool {
        self.has_polygon
    }

    /// Rings of the polygons merged into this group, empty for plain groups.
    pub fn polygon_point_sets(&self) -> &[Vec<Point3d>] {
        &self.polygon_point_sets
    }

    /// Entry `k` lists the geometry positions that came from ring `k`.
    pub fn member_polygon_index(&self) -> &[Vec<usize>] {
        &self.member_polygon_index
    }

    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }
}
